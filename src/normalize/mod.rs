//! Normalize module
//!
//! Flattens the raw JSON payload into a [`Table`]: one row per record,
//! nested fields as dotted columns, missing fields as empty cells.

mod flatten;
mod types;

pub use flatten::{flatten_record, normalize, render_cell, PATH_SEPARATOR};
pub use types::Table;
