use chrono::{DateTime, Utc};
use teldrive_protocol::FileInfo;
use teldrive_transfer::join_remote_path;

/// Id of the root folder.
pub const ROOT_ID: &str = "root";

/// A file or folder in the drive, addressed by id and absolute path.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub id: String,
    pub name: String,
    /// Absolute path, `/` for the root.
    pub path: String,
    pub size: u64,
    pub parent_id: String,
    pub modified: Option<DateTime<Utc>>,
    pub is_folder: bool,
}

impl Object {
    pub fn root() -> Self {
        Self {
            id: ROOT_ID.into(),
            name: String::new(),
            path: "/".into(),
            size: 0,
            parent_id: String::new(),
            modified: None,
            is_folder: true,
        }
    }

    /// Builds the record of a child of the folder at `dir_path`.
    pub fn from_info(info: FileInfo, dir_path: &str) -> Self {
        let is_folder = info.is_folder();
        Self {
            path: join_remote_path(dir_path, &info.name),
            id: info.id,
            name: info.name,
            size: info.size,
            parent_id: info.parent_id,
            modified: info.updated_at,
            is_folder,
        }
    }

    /// Path of the folder containing this object.
    pub fn dir_path(&self) -> &str {
        parent_path(&self.path)
    }
}

/// Parent folder of an absolute path; the root is its own parent.
pub fn parent_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &trimmed[..i],
    }
}

/// Last component of a path, empty for the root.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or_default()
}
