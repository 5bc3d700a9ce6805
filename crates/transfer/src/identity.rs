use md5::{Digest, Md5};

/// Computes MD5 of `text` and returns the lowercase hex digest.
pub fn md5_hex(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Normalizes a remote directory path for identity purposes.
///
/// The root (`"/"` or `""`) becomes the empty string and trailing slashes
/// are dropped, so `/docs/` and `/docs` derive the same session.
pub fn normalize_dir(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "" } else { trimmed }
}

/// Joins a remote directory and a child name into an absolute path.
pub fn join_remote_path(dir: &str, name: &str) -> String {
    let dir = normalize_dir(dir).trim_start_matches('/');
    if dir.is_empty() {
        format!("/{name}")
    } else {
        format!("/{dir}/{name}")
    }
}

/// Derives the upload session id for a logical upload.
///
/// The same destination, name, size and owner always produce the same
/// 32-character id, which is what lets an interrupted upload find its
/// parts again after a restart.
pub fn upload_id(dest_dir: &str, file_name: &str, file_size: u64, owner_id: i64) -> String {
    let dir = normalize_dir(dest_dir);
    md5_hex(&format!("{dir}:{file_name}:{file_size}:{owner_id}"))
}
