//! Wire types for the TelDrive REST API.
//!
//! Field names follow the server's camelCase JSON. Types here carry no
//! behavior beyond small helpers; the client and uploader crates own the
//! request flow.

pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use messages::{
    CreateFileRequest, DeleteRequest, FilePart, MakeDirRequest, MoveRequest, PartFile,
    RenameRequest, UploadPartQuery,
};
pub use types::{FileInfo, ListResponse, ListMeta, ObjectKind, SessionInfo};
