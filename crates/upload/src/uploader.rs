//! Upload orchestrator.

use chrono::{DateTime, Utc};
use teldrive_transfer::{
    BoundedSource, ChunkPlan, DEFAULT_CHUNK_SIZE_MB, MIB, ProgressReporter, ProgressTracker,
    UploadSession, join_remote_path, validate_object_name,
};
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::commit::{CommittedFile, commit};
use crate::engine::{ChunkEngine, cancellable, check_cancelled};
use crate::error::UploadError;
use crate::registry::existing_parts;
use crate::store::PartStore;

/// Settings applied to every upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOptions {
    /// Channel the parts are stored in.
    pub channel_id: i64,
    /// Chunk size in bytes.
    pub chunk_size: u64,
    /// Give each chunk a random name instead of `<file>.part.NNN`.
    pub random_chunk_name: bool,
    /// Ask the server to encrypt stored parts.
    pub encrypt: bool,
    /// Advisory only: chunks are always sent one after another.
    pub concurrency: usize,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            channel_id: 0,
            chunk_size: DEFAULT_CHUNK_SIZE_MB * MIB,
            random_chunk_name: true,
            encrypt: false,
            concurrency: 4,
        }
    }
}

/// One file to upload.
pub struct UploadRequest<R> {
    /// Destination folder (`"/"` for the root).
    pub dest_dir: String,
    pub file_name: String,
    /// Total length of `reader`; `None` is rejected.
    pub size: Option<u64>,
    pub mod_time: Option<DateTime<Utc>>,
    pub reader: R,
}

/// Runs resumable uploads against a [`PartStore`].
pub struct Uploader<'a> {
    store: &'a dyn PartStore,
    options: UploadOptions,
}

impl<'a> Uploader<'a> {
    pub fn new(store: &'a dyn PartStore, options: UploadOptions) -> Self {
        Self { store, options }
    }

    /// Uploads `req.reader` and creates the file on behalf of `owner_id`.
    ///
    /// Parts stored by an earlier, interrupted run with the same
    /// destination, name, size and owner are skipped. Stops at the first
    /// fatal error without creating the file.
    pub async fn put<R: AsyncRead + Unpin + Send + 'static>(
        &self,
        owner_id: i64,
        req: UploadRequest<R>,
        progress: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<CommittedFile, UploadError> {
        let size = req.size.ok_or(UploadError::UnsupportedSize)?;
        validate_object_name(&req.file_name)?;
        check_cancelled(cancel)?;

        let plan = ChunkPlan::new(size, self.options.chunk_size)?;
        let session = UploadSession::derive(
            &req.dest_dir,
            &req.file_name,
            owner_id,
            self.options.channel_id,
            self.options.encrypt,
            plan,
        );
        info!(
            upload_id = %session.id,
            file = %req.file_name,
            size,
            chunks = plan.total_chunks(),
            "starting upload"
        );
        if self.options.concurrency > 1 {
            debug!(
                concurrency = self.options.concurrency,
                "chunks are uploaded sequentially"
            );
        }

        let existing = cancellable(cancel, existing_parts(self.store, &session.id)).await?;
        if !existing.is_empty() {
            info!(
                upload_id = %session.id,
                stored = existing.len(),
                "resuming upload"
            );
        }

        let mut tracker = ProgressTracker::new(progress, size);
        let source = BoundedSource::new(req.reader);
        let engine = ChunkEngine::new(
            self.store,
            &session,
            self.options.random_chunk_name,
            cancel,
        );
        let parts = engine.run(&source, &existing, &mut tracker).await?;
        if plan.total_chunks() == 0 {
            tracker.complete_empty();
        }

        let path = join_remote_path(&req.dest_dir, &req.file_name);
        commit(self.store, &session, &path, req.mod_time, parts, cancel).await
    }
}
