use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unsupported query type: {0}")]
    UnsupportedQuery(String),
    #[error("invalid stored query: {0}")]
    InvalidQuery(String),
    #[error("invalid refresh interval: {0}")]
    InvalidRefreshInterval(String),
    #[error("Alert ID and Resolution State are required")]
    MissingUpdateFields,
    #[error("invalid id: {0}")]
    InvalidId(String),
}
