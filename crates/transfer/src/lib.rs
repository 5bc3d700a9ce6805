//! Building blocks of a resumable chunked upload.
//!
//! Everything here is transport-agnostic: session identity, chunk
//! planning and naming, exact-length streaming over a non-seekable source,
//! and progress accounting. The uploader crate drives them against the
//! remote API.

mod identity;
mod naming;
mod plan;
mod progress;
mod source;
mod types;
mod validation;

pub use identity::{join_remote_path, md5_hex, normalize_dir, upload_id};
pub use naming::{chunk_name, random_chunk_name};
pub use plan::{ChunkPlan, PlannedChunk};
pub use progress::{ProgressReporter, ProgressTracker};
pub use source::{BoundedSource, ChunkBody};
pub use types::UploadSession;
pub use validation::validate_object_name;

/// Default chunk size in MiB.
pub const DEFAULT_CHUNK_SIZE_MB: u64 = 500;

/// Largest chunk size in MiB; Telegram stores at most 2000 MiB per message.
pub const MAX_CHUNK_SIZE_MB: u64 = 2000;

/// Bytes per configured chunk-size unit.
pub const MIB: u64 = 1024 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source ended early: expected {expected} bytes, got {actual}")]
    UnexpectedEof { expected: u64, actual: u64 },

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("invalid name: {0}")]
    InvalidName(String),
}
