//! Resumable chunked upload to TelDrive.
//!
//! This crate implements the **upload core**: it has no knowledge of the
//! concrete HTTP backend and talks to the remote only through
//! [`PartStore`], which [`teldrive_client::ApiClient`] implements.
//!
//! # Pipeline
//!
//! 1. **Identify**: derive the session id from destination, name, size
//!    and owner
//! 2. **Plan**: split the size into fixed-size chunks
//! 3. **Lookup**: ask the remote which parts it already holds
//! 4. **Transfer**: skip stored chunks, upload the rest in order
//! 5. **Commit**: create the file from the ordered part manifest

pub mod commit;
pub mod engine;
pub mod error;
pub mod registry;
pub mod store;
pub mod uploader;

#[cfg(test)]
mod testing;

// Re-export primary types for convenience.
pub use commit::{CommittedFile, build_manifest};
pub use engine::{ChunkEngine, ChunkOutcome};
pub use error::UploadError;
pub use registry::existing_parts;
pub use store::{PartStore, StoreFuture};
pub use uploader::{UploadOptions, UploadRequest, Uploader};
