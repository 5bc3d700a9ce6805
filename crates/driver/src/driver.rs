//! TelDrive implementation of [`Storage`].

use teldrive_client::{ApiClient, USER_AGENT};
use teldrive_transfer::{ProgressReporter, join_remote_path, normalize_dir, validate_object_name};
use teldrive_upload::{UploadOptions, UploadRequest, Uploader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::DriverConfig;
use crate::error::StorageError;
use crate::object::{Object, base_name, parent_path};
use crate::storage::{FileStream, Link, Storage, StorageFuture};

/// Storage driver backed by a TelDrive server.
pub struct TelDrive {
    client: ApiClient,
    options: UploadOptions,
}

impl TelDrive {
    /// Validates `config` and builds the HTTP client.
    ///
    /// Call [`init`](Self::init) before uploading.
    pub fn new(config: &DriverConfig) -> Result<Self, StorageError> {
        config.validate()?;
        let client = ApiClient::new(&config.client_config())?;
        Ok(Self::with_client(client, config.upload_options()))
    }

    pub fn with_client(client: ApiClient, options: UploadOptions) -> Self {
        Self { client, options }
    }

    /// Authenticates and learns the owner id used for upload sessions.
    pub async fn init(&mut self) -> Result<(), StorageError> {
        let session = self.client.init().await?;
        info!(user = %session.user_name, "connected to TelDrive");
        Ok(())
    }

    /// Resolves an absolute path to its object by listing the parent.
    pub async fn stat(&self, path: &str) -> Result<Object, StorageError> {
        let name = base_name(path);
        if name.is_empty() {
            return Ok(Object::root());
        }
        let parent = parent_path(path);
        self.list_dir(parent)
            .await?
            .into_iter()
            .find(|o| o.name == name)
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn list_dir(&self, dir_path: &str) -> Result<Vec<Object>, StorageError> {
        let items = self.client.list(normalize_dir(dir_path)).await?;
        debug!(path = dir_path, count = items.len(), "listed folder");
        Ok(items
            .into_iter()
            .map(|info| Object::from_info(info, dir_path))
            .collect())
    }

    async fn make_dir_at(&self, parent: &Object, name: &str) -> Result<Object, StorageError> {
        validate_object_name(name)?;
        let path = join_remote_path(&parent.path, name);
        let info = self.client.make_dir(&path).await?;
        info!(path = %path, id = %info.id, "folder created");
        Ok(Object {
            id: info.id,
            name: name.to_string(),
            path,
            size: 0,
            parent_id: info.parent_id,
            modified: info.updated_at,
            is_folder: true,
        })
    }

    async fn remove_object(&self, obj: &Object) -> Result<(), StorageError> {
        self.client.delete(std::slice::from_ref(&obj.id)).await?;
        info!(path = %obj.path, id = %obj.id, "object removed");
        Ok(())
    }

    async fn rename_object(&self, obj: &Object, new_name: &str) -> Result<Object, StorageError> {
        validate_object_name(new_name)?;
        self.client.rename(&obj.id, new_name).await?;
        let renamed = Object {
            name: new_name.to_string(),
            path: join_remote_path(obj.dir_path(), new_name),
            ..obj.clone()
        };
        info!(from = %obj.path, to = %renamed.path, "object renamed");
        Ok(renamed)
    }

    async fn move_object(&self, obj: &Object, dst_dir: &Object) -> Result<Object, StorageError> {
        self.client
            .move_objects(std::slice::from_ref(&obj.id), &dst_dir.id)
            .await?;
        let moved = Object {
            parent_id: dst_dir.id.clone(),
            path: join_remote_path(&dst_dir.path, &obj.name),
            ..obj.clone()
        };
        info!(from = %obj.path, to = %moved.path, "object moved");
        Ok(moved)
    }

    async fn download_link(&self, obj: &Object) -> Result<Link, StorageError> {
        if obj.is_folder {
            return Err(StorageError::NotFile(obj.path.clone()));
        }
        let url = self.client.download_url(&obj.id).await?;
        Ok(Link {
            url,
            user_agent: USER_AGENT.to_string(),
        })
    }

    async fn upload(
        &self,
        dst_dir: &Object,
        file: FileStream,
        progress: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<Object, StorageError> {
        let owner_id = self.client.user_id()?;
        let uploader = Uploader::new(&self.client, self.options.clone());
        let req = UploadRequest {
            dest_dir: dst_dir.path.clone(),
            file_name: file.name,
            size: file.size,
            mod_time: file.mod_time,
            reader: file.reader,
        };
        let committed = uploader.put(owner_id, req, progress, cancel).await?;

        Ok(Object {
            id: committed.id,
            name: committed.name,
            path: committed.path,
            size: committed.size,
            parent_id: committed.parent_id,
            modified: committed.updated_at,
            is_folder: false,
        })
    }
}

impl Storage for TelDrive {
    fn root(&self) -> Object {
        Object::root()
    }

    fn list<'a>(&'a self, dir: &'a Object) -> StorageFuture<'a, Vec<Object>> {
        Box::pin(self.list_dir(&dir.path))
    }

    fn make_dir<'a>(&'a self, parent: &'a Object, name: &'a str) -> StorageFuture<'a, Object> {
        Box::pin(self.make_dir_at(parent, name))
    }

    fn remove<'a>(&'a self, obj: &'a Object) -> StorageFuture<'a, ()> {
        Box::pin(self.remove_object(obj))
    }

    fn rename<'a>(&'a self, obj: &'a Object, new_name: &'a str) -> StorageFuture<'a, Object> {
        Box::pin(self.rename_object(obj, new_name))
    }

    fn move_to<'a>(&'a self, obj: &'a Object, dst_dir: &'a Object) -> StorageFuture<'a, Object> {
        Box::pin(self.move_object(obj, dst_dir))
    }

    fn link<'a>(&'a self, obj: &'a Object) -> StorageFuture<'a, Link> {
        Box::pin(self.download_link(obj))
    }

    fn put<'a>(
        &'a self,
        dst_dir: &'a Object,
        file: FileStream,
        progress: &'a dyn ProgressReporter,
        cancel: &'a CancellationToken,
    ) -> StorageFuture<'a, Object> {
        Box::pin(self.upload(dst_dir, file, progress, cancel))
    }
}
