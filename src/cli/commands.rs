//! CLI arguments

use clap::Parser;
use std::path::PathBuf;

/// Extract the product catalog to CSV and stage it in object storage
#[derive(Parser, Debug, Default)]
#[command(name = "fakestore-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); built-in defaults when omitted
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Skip TLS certificate verification on the fetch
    #[arg(long)]
    pub insecure: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["fakestore-extract"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.insecure);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_all_arguments() {
        let cli = Cli::try_parse_from([
            "fakestore-extract",
            "-C",
            "pipeline.yaml",
            "--insecure",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("pipeline.yaml")));
        assert!(cli.insecure);
        assert!(cli.verbose);
    }

    #[test]
    fn test_rejects_positional() {
        assert!(Cli::try_parse_from(["fakestore-extract", "extra"]).is_err());
    }
}
