//! Chunk transfer engine.
//!
//! Walks the chunk plan in ascending order. Each chunk either ends
//! [`ChunkOutcome::Skipped`] (the remote already holds it: its bytes are
//! discarded from the source) or [`ChunkOutcome::Committed`] (its bytes
//! are streamed to the remote). The first failure aborts the walk.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use teldrive_protocol::{PartFile, UploadPartQuery};
use teldrive_transfer::{BoundedSource, PlannedChunk, ProgressTracker, UploadSession, chunk_name};
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::UploadError;
use crate::store::PartStore;

/// Final state of one planned chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    /// Already stored remotely; reused without sending bytes.
    Skipped(PartFile),
    /// Uploaded during this run.
    Committed(PartFile),
}

impl ChunkOutcome {
    pub fn into_part(self) -> PartFile {
        match self {
            ChunkOutcome::Skipped(p) | ChunkOutcome::Committed(p) => p,
        }
    }
}

/// Transfers the chunks of one session.
pub struct ChunkEngine<'a> {
    store: &'a dyn PartStore,
    session: &'a UploadSession,
    randomize_names: bool,
    cancel: &'a CancellationToken,
}

impl<'a> ChunkEngine<'a> {
    pub fn new(
        store: &'a dyn PartStore,
        session: &'a UploadSession,
        randomize_names: bool,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            store,
            session,
            randomize_names,
            cancel,
        }
    }

    /// Processes every planned chunk and returns the parts in plan order.
    ///
    /// `existing` holds parts the remote already has, keyed by sequence
    /// number. Progress is reported after each chunk.
    pub async fn run<R: AsyncRead + Unpin + Send + 'static>(
        &self,
        source: &BoundedSource<R>,
        existing: &HashMap<u32, PartFile>,
        tracker: &mut ProgressTracker<'_>,
    ) -> Result<Vec<PartFile>, UploadError> {
        let mut parts = Vec::with_capacity(self.session.total_chunks() as usize);

        for chunk in self.session.plan.chunks() {
            check_cancelled(self.cancel)?;

            let started = Instant::now();
            let outcome = self
                .process(chunk, source, existing.get(&chunk.part_no))
                .await?;
            let fraction = tracker.advance(chunk.len);

            match &outcome {
                ChunkOutcome::Skipped(part) => debug!(
                    upload_id = %self.session.id,
                    part_no = chunk.part_no,
                    part_id = part.part_id,
                    bytes = chunk.len,
                    progress = fraction,
                    "chunk already stored, skipped"
                ),
                ChunkOutcome::Committed(part) => debug!(
                    upload_id = %self.session.id,
                    part_no = chunk.part_no,
                    part_id = part.part_id,
                    bytes = chunk.len,
                    progress = fraction,
                    bytes_per_sec = throughput(chunk.len, started.elapsed()),
                    "chunk uploaded"
                ),
            }
            parts.push(outcome.into_part());
        }

        Ok(parts)
    }

    async fn process<R: AsyncRead + Unpin + Send + 'static>(
        &self,
        chunk: PlannedChunk,
        source: &BoundedSource<R>,
        stored: Option<&PartFile>,
    ) -> Result<ChunkOutcome, UploadError> {
        let part_no = chunk.part_no;

        if let Some(part) = stored {
            if self.reusable(part, chunk.len) {
                cancellable(self.cancel, source.discard_exactly(chunk.len))
                    .await?
                    .map_err(|source| UploadError::ChunkRead { part_no, source })?;
                return Ok(ChunkOutcome::Skipped(part.clone()));
            }
            warn!(
                upload_id = %self.session.id,
                part_no,
                stored_size = part.size,
                planned_size = chunk.len,
                stored_channel = part.channel_id,
                stored_encrypted = part.encrypted,
                "stored part does not match this upload, uploading again"
            );
        }

        let query = UploadPartQuery {
            part_name: chunk_name(
                &self.session.file_name,
                part_no,
                self.session.total_chunks(),
                self.randomize_names,
            ),
            file_name: self.session.file_name.clone(),
            part_no,
            channel_id: self.session.channel_id,
            encrypted: self.session.encrypted,
        };

        let start = source.consumed();
        let body = cancellable(self.cancel, source.chunk(chunk.len)).await?;
        let result = cancellable(
            self.cancel,
            self.store.upload_part(&self.session.id, &query, body),
        )
        .await?;

        // The body must have been sent in full, whatever the store answered.
        let sent = source.ensure_advanced(start, chunk.len);
        let mut part = match result {
            Ok(part) => {
                sent.map_err(|source| UploadError::ChunkRead { part_no, source })?;
                part
            }
            Err(err) => {
                if source.exhausted()
                    && let Err(short) = sent
                {
                    return Err(UploadError::ChunkRead {
                        part_no,
                        source: short,
                    });
                }
                return Err(UploadError::ChunkTransfer {
                    part_no,
                    source: err,
                });
            }
        };

        if part.part_id == 0 {
            return Err(UploadError::MissingPartId { part_no });
        }

        // The upload response only guarantees id and salt.
        part.part_no = part_no;
        part.size = chunk.len;
        part.channel_id = self.session.channel_id;
        part.encrypted = self.session.encrypted;
        if part.name.is_empty() {
            part.name = query.part_name;
        }

        Ok(ChunkOutcome::Committed(part))
    }

    /// A stored part is reused only if it holds this chunk as this
    /// session would upload it.
    fn reusable(&self, part: &PartFile, len: u64) -> bool {
        part.size == len
            && part.encrypted == self.session.encrypted
            && part.channel_id == self.session.channel_id
    }
}

fn throughput(bytes: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { (bytes as f64 / secs) as u64 } else { 0 }
}

pub(crate) fn check_cancelled(cancel: &CancellationToken) -> Result<(), UploadError> {
    if cancel.is_cancelled() {
        Err(UploadError::Cancelled)
    } else {
        Ok(())
    }
}

/// Runs `fut` unless `cancel` fires first.
pub(crate) async fn cancellable<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, UploadError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(UploadError::Cancelled),
        out = fut => Ok(out),
    }
}
