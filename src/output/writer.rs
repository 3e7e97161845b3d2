//! CSV artifact writer
//!
//! Serializes a [`Table`] to `<work_dir>/<stem>_<YYYYMMDD_HHMMSS>.csv`.

use crate::error::{Error, Result};
use crate::normalize::Table;
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Timestamp format embedded in artifact names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build the artifact filename for a given instant
///
/// Format: `{stem}_{YYYYMMDD_HHMMSS}.csv`
///
/// Example: `products_20251014_093005.csv`
pub fn artifact_filename(stem: &str, timestamp: &DateTime<Local>) -> String {
    format!("{stem}_{}.csv", timestamp.format(TIMESTAMP_FORMAT))
}

/// Serialize a table to CSV bytes
///
/// Header first, then one line per row, no index column. An empty table
/// encodes to zero bytes. Rows without any columns are written as a single
/// empty field (`""`) so every record still occupies a line.
pub fn encode_csv(table: &Table) -> Result<Vec<u8>> {
    if table.num_columns() == 0 && table.is_empty() {
        return Ok(Vec::new());
    }

    let columnless = table.num_columns() == 0;
    let quote_style = if columnless {
        csv::QuoteStyle::Always
    } else {
        csv::QuoteStyle::Necessary
    };

    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(quote_style)
        .from_writer(Vec::new());

    if columnless {
        wtr.write_record([""])?;
        for _ in table.rows() {
            wtr.write_record([""])?;
        }
    } else {
        wtr.write_record(table.columns())?;
        for row in table.rows() {
            wtr.write_record(row)?;
        }
    }

    wtr.into_inner()
        .map_err(|e| Error::Csv(csv::Error::from(e.into_error())))
}

/// A CSV file written to local disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Full path of the file
    pub path: PathBuf,
    /// File name, reused as the remote object name
    pub filename: String,
    /// Data rows written (header excluded)
    pub rows: usize,
    /// Bytes written
    pub bytes: u64,
}

/// Writes tables as timestamped CSV files under a working directory
#[derive(Debug, Clone)]
pub struct LocalWriter {
    work_dir: PathBuf,
    file_stem: String,
}

impl LocalWriter {
    /// Create a writer for a directory and file stem
    pub fn new(work_dir: impl Into<PathBuf>, file_stem: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            file_stem: file_stem.into(),
        }
    }

    /// Staging directory
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Write a table stamped with the current local time
    pub fn write(&self, table: &Table) -> Result<Artifact> {
        self.write_at(table, &Local::now())
    }

    /// Write a table stamped with the given instant
    ///
    /// The file is created exclusively: an existing file with the same name
    /// is an error, never overwritten.
    pub fn write_at(&self, table: &Table, timestamp: &DateTime<Local>) -> Result<Artifact> {
        fs::create_dir_all(&self.work_dir).map_err(|e| Error::io(&self.work_dir, e))?;

        let filename = artifact_filename(&self.file_stem, timestamp);
        let path = self.work_dir.join(&filename);
        let data = encode_csv(table)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;

        let written = file.write_all(&data).and_then(|()| file.sync_all());
        if let Err(e) = written {
            drop(file);
            // Never leave a truncated artifact behind
            let _ = fs::remove_file(&path);
            return Err(Error::io(&path, e));
        }

        debug!(
            "Wrote {} rows ({} bytes) to {}",
            table.num_rows(),
            data.len(),
            path.display()
        );

        Ok(Artifact {
            path,
            filename,
            rows: table.num_rows(),
            bytes: data.len() as u64,
        })
    }
}
