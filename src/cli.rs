use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ownerfi-filter")]
#[command(about = "Owner-financing and cash-deal listing classifier", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a single description
    Classify {
        /// Listing description text
        #[arg(short, long, required = true)]
        text: String,

        /// List price
        #[arg(long)]
        price: Option<f64>,

        /// Estimated market value
        #[arg(long)]
        estimate: Option<f64>,

        /// Custom pattern table (JSON)
        #[arg(long)]
        patterns: Option<PathBuf>,
    },

    /// Classify a listing file or folder and keep the matches
    Filter {
        /// Listing JSON file or folder of JSON files
        #[arg(required = true)]
        input: PathBuf,

        /// Output file or directory (default: next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (json/excel/both)
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,

        /// Write every listing, not only the kept ones
        #[arg(long)]
        all: bool,

        /// Scan subfolders too
        #[arg(short = 'r', long)]
        recursive: bool,

        /// Custom pattern table (JSON)
        #[arg(long)]
        patterns: Option<PathBuf>,
    },

    /// Show the builtin pattern table
    Patterns {
        /// Write the table to this file instead of stdout
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show/edit configuration
    Config {
        /// Show configuration
        #[arg(long)]
        show: bool,

        /// Look-behind window in characters
        #[arg(long)]
        set_window: Option<usize>,

        /// Negation distance in characters
        #[arg(long)]
        set_distance: Option<usize>,

        /// Deep-discount threshold (percent of estimate)
        #[arg(long)]
        set_threshold: Option<f64>,

        /// Default custom pattern table
        #[arg(long)]
        set_patterns: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Excel,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use json, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
