use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("folder not found: {0}")]
    FolderNotFound(String),

    #[error("no listings found in {0}")]
    NoListingsFound(String),

    #[error("invalid listing file {path}: {reason}")]
    InvalidListingFile { path: String, reason: String },

    #[error("Excel generation failed: {0}")]
    ExcelGeneration(String),

    #[error("pattern table error: {0}")]
    Classifier(#[from] ownerfi_common::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
