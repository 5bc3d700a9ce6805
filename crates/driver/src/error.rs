//! Storage error types.

use teldrive_client::ClientError;
use teldrive_transfer::TransferError;
use teldrive_upload::UploadError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("not a file: {0}")]
    NotFile(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
