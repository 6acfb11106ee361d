use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Storage error: {0}")]
    StorageError(#[from] unifile_storage::StorageError),

    #[error("Config error: {0}")]
    ConfigError(#[from] unifile_config::ConfigError),

    /// Precondition failure: the destination exists and overwriting was not
    /// allowed. Raised before any data moves.
    #[error("Destination already exists and overwrite is disabled: {0}")]
    DestinationExists(String),
}
