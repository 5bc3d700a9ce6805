//! Remote part storage seam.

use std::future::Future;
use std::pin::Pin;

use teldrive_client::{ApiClient, ClientError};
use teldrive_protocol::{CreateFileRequest, FileInfo, PartFile, UploadPartQuery};
use teldrive_transfer::ChunkBody;

/// Boxed future returned by [`PartStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ClientError>> + Send + 'a>>;

/// Remote operations the uploader needs.
///
/// Implemented by [`ApiClient`]; tests substitute an in-memory store.
pub trait PartStore: Send + Sync {
    /// Lists parts already stored for `upload_id`.
    ///
    /// Unknown sessions yield an empty list rather than an error.
    fn list_parts<'a>(&'a self, upload_id: &'a str) -> StoreFuture<'a, Vec<PartFile>>;

    /// Streams one chunk and returns the stored part.
    ///
    /// The body is read as it is sent; it is not fully consumed if the
    /// call fails early.
    fn upload_part<'a>(
        &'a self,
        upload_id: &'a str,
        query: &'a UploadPartQuery,
        body: ChunkBody,
    ) -> StoreFuture<'a, PartFile>;

    /// Creates the logical file from its manifest.
    fn create_file<'a>(&'a self, req: &'a CreateFileRequest) -> StoreFuture<'a, FileInfo>;
}

impl PartStore for ApiClient {
    fn list_parts<'a>(&'a self, upload_id: &'a str) -> StoreFuture<'a, Vec<PartFile>> {
        Box::pin(ApiClient::list_parts(self, upload_id))
    }

    fn upload_part<'a>(
        &'a self,
        upload_id: &'a str,
        query: &'a UploadPartQuery,
        body: ChunkBody,
    ) -> StoreFuture<'a, PartFile> {
        let len = body.len();
        Box::pin(ApiClient::upload_part(self, upload_id, query, body, len))
    }

    fn create_file<'a>(&'a self, req: &'a CreateFileRequest) -> StoreFuture<'a, FileInfo> {
        Box::pin(ApiClient::create_file(self, req))
    }
}
