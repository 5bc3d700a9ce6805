//! Storage capability set.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use teldrive_transfer::ProgressReporter;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use crate::error::StorageError;
use crate::object::Object;

/// Boxed future returned by [`Storage`] methods.
pub type StorageFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// A resolved download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    /// User-Agent the link must be fetched with.
    pub user_agent: String,
}

/// A file to upload: metadata plus a forward-only byte stream.
pub struct FileStream {
    pub name: String,
    /// Exact stream length; `None` is rejected by [`Storage::put`].
    pub size: Option<u64>,
    pub mod_time: Option<DateTime<Utc>>,
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl FileStream {
    pub fn new(
        name: impl Into<String>,
        size: Option<u64>,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mod_time: None,
            reader: Box::new(reader),
        }
    }

    pub fn with_mod_time(mut self, mod_time: DateTime<Utc>) -> Self {
        self.mod_time = Some(mod_time);
        self
    }
}

impl std::fmt::Debug for FileStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStream")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("mod_time", &self.mod_time)
            .finish_non_exhaustive()
    }
}

/// Operations a storage backend offers on its objects.
///
/// Names passed to `make_dir`, `rename` and `put` must be single path
/// components.
pub trait Storage: Send + Sync {
    /// The root folder.
    fn root(&self) -> Object;

    /// Children of a folder.
    fn list<'a>(&'a self, dir: &'a Object) -> StorageFuture<'a, Vec<Object>>;

    fn make_dir<'a>(&'a self, parent: &'a Object, name: &'a str) -> StorageFuture<'a, Object>;

    fn remove<'a>(&'a self, obj: &'a Object) -> StorageFuture<'a, ()>;

    fn rename<'a>(&'a self, obj: &'a Object, new_name: &'a str) -> StorageFuture<'a, Object>;

    fn move_to<'a>(&'a self, obj: &'a Object, dst_dir: &'a Object) -> StorageFuture<'a, Object>;

    /// Resolves a download link. Folders have none.
    fn link<'a>(&'a self, obj: &'a Object) -> StorageFuture<'a, Link>;

    /// Uploads `file` into `dst_dir`, resuming an earlier interrupted
    /// upload of the same file where possible.
    fn put<'a>(
        &'a self,
        dst_dir: &'a Object,
        file: FileStream,
        progress: &'a dyn ProgressReporter,
        cancel: &'a CancellationToken,
    ) -> StorageFuture<'a, Object>;
}
