use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::task::{Context, Poll, ready};

use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::TransferError;

/// Exact-length access to a sequential, non-seekable byte source.
///
/// Chunks are lent out as streaming [`ChunkBody`] readers, so at most one
/// read buffer is in memory whatever the chunk size. Skipped chunks are
/// drained with [`discard_exactly`](Self::discard_exactly). Nothing is ever
/// re-read, so the position stays in step with the chunk plan.
pub struct BoundedSource<R> {
    inner: Arc<Mutex<R>>,
    state: Arc<SourceState>,
}

#[derive(Default)]
struct SourceState {
    consumed: AtomicU64,
    exhausted: AtomicBool,
}

impl<R: AsyncRead + Unpin + Send + 'static> BoundedSource<R> {
    /// Wraps `inner`, positioned at its start.
    pub fn new(inner: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
            state: Arc::default(),
        }
    }

    /// Lends the next `n` bytes as a body that can be sent over the wire.
    ///
    /// The body holds the source until it has yielded `n` bytes or is
    /// dropped. If the source ends first, the body fails with
    /// [`io::ErrorKind::UnexpectedEof`] and [`exhausted`](Self::exhausted)
    /// turns true.
    pub async fn chunk(&self, n: u64) -> ChunkBody {
        let reader: Option<Box<dyn AsyncRead + Send + Unpin>> = if n == 0 {
            None
        } else {
            let guard = Arc::clone(&self.inner).lock_owned().await;
            Some(Box::new(LentReader(guard).take(n)))
        };
        ChunkBody {
            reader,
            len: n,
            remaining: n,
            state: Arc::clone(&self.state),
        }
    }

    /// Consumes and drops exactly `n` bytes.
    pub async fn discard_exactly(&self, n: u64) -> Result<(), TransferError> {
        let mut inner = self.inner.lock().await;
        let mut limited = (&mut *inner).take(n);
        let skipped = tokio::io::copy(&mut limited, &mut tokio::io::sink()).await?;
        self.state.consumed.fetch_add(skipped, Ordering::SeqCst);
        if skipped < n {
            self.state.exhausted.store(true, Ordering::SeqCst);
            return Err(TransferError::UnexpectedEof {
                expected: n,
                actual: skipped,
            });
        }
        Ok(())
    }

    /// Bytes consumed so far (streamed or discarded).
    pub fn consumed(&self) -> u64 {
        self.state.consumed.load(Ordering::SeqCst)
    }

    /// True once the source ended before a requested length was reached.
    pub fn exhausted(&self) -> bool {
        self.state.exhausted.load(Ordering::SeqCst)
    }

    /// Checks that exactly `expected` bytes were consumed since `start`.
    pub fn ensure_advanced(&self, start: u64, expected: u64) -> Result<(), TransferError> {
        let actual = self.consumed().saturating_sub(start);
        if actual != expected {
            return Err(TransferError::UnexpectedEof { expected, actual });
        }
        Ok(())
    }
}

struct LentReader<R>(OwnedMutexGuard<R>);

impl<R: AsyncRead + Unpin> AsyncRead for LentReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut *self.get_mut().0).poll_read(cx, buf)
    }
}

/// Streaming body of one chunk, borrowed from a [`BoundedSource`].
pub struct ChunkBody {
    reader: Option<Box<dyn AsyncRead + Send + Unpin>>,
    len: u64,
    remaining: u64,
    state: Arc<SourceState>,
}

impl ChunkBody {
    /// Declared length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsyncRead for ChunkBody {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let Some(reader) = this.reader.as_mut() else {
            return Poll::Ready(Ok(()));
        };

        let before = buf.filled().len();
        ready!(Pin::new(reader).poll_read(cx, buf))?;
        let read = (buf.filled().len() - before) as u64;
        this.remaining -= read;
        this.state.consumed.fetch_add(read, Ordering::SeqCst);

        if this.remaining == 0 {
            // Hands the source back for the next chunk.
            this.reader = None;
        } else if read == 0 && buf.remaining() > 0 {
            this.reader = None;
            this.state.exhausted.store(true, Ordering::SeqCst);
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "source ended after {} of {} chunk bytes",
                    this.len - this.remaining,
                    this.len
                ),
            )));
        }
        Poll::Ready(Ok(()))
    }
}
