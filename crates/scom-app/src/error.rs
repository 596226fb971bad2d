use scom_core::error::DomainError;
use scom_core::validation::InvalidBuffer;
use scom_ports::error::PortError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("port error: {0}")]
    Port(#[from] PortError),
    #[error("{0}")]
    Config(#[from] InvalidBuffer),
}
