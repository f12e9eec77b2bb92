use crawlscope_resolver::ResolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Redirect analysis failed: {0}")]
    ResolverError(#[from] ResolverError),

    #[error("Crawl export is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AuditError>;
