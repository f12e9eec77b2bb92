use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    #[error("Duplicate redirect source: {0}")]
    DuplicateSource(String),

    #[error("Invalid resolver configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ResolverError>;
