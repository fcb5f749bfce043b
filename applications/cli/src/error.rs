/// CLI error types
use cinevault_client::ApiError;
use cinevault_core::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(#[from] CoreError),

    #[error("Client error: {0}")]
    Client(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
