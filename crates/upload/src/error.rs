//! Upload error types.

use teldrive_client::ClientError;
use teldrive_transfer::TransferError;

/// Errors that abort an upload.
///
/// Registry lookup failures are not here: they degrade to "no stored
/// parts" and the upload continues.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("unsupported size: stream length must be known")]
    UnsupportedSize,

    #[error("invalid upload: {0}")]
    Invalid(#[from] TransferError),

    #[error("reading chunk {part_no} failed: {source}")]
    ChunkRead {
        part_no: u32,
        #[source]
        source: TransferError,
    },

    #[error("uploading chunk {part_no} failed: {source}")]
    ChunkTransfer {
        part_no: u32,
        #[source]
        source: ClientError,
    },

    #[error("uploading chunk {part_no} failed: no part id returned")]
    MissingPartId { part_no: u32 },

    #[error("incomplete manifest: {0}")]
    Manifest(String),

    #[error("create file failed: {0}")]
    Commit(#[source] ClientError),

    #[error("cancelled")]
    Cancelled,
}

impl UploadError {
    /// Chunk sequence number the error refers to, if any.
    pub fn part_no(&self) -> Option<u32> {
        match self {
            UploadError::ChunkRead { part_no, .. }
            | UploadError::ChunkTransfer { part_no, .. }
            | UploadError::MissingPartId { part_no } => Some(*part_no),
            _ => None,
        }
    }
}
