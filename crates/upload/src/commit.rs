//! Manifest assembly and the final create-file call.

use chrono::{DateTime, Utc};
use teldrive_protocol::{CreateFileRequest, FilePart, ObjectKind, PartFile};
use teldrive_transfer::UploadSession;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::engine::cancellable;
use crate::error::UploadError;
use crate::store::PartStore;

/// The logical file created by a successful commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedFile {
    pub id: String,
    pub name: String,
    pub path: String,
    pub parent_id: String,
    pub size: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Orders parts by sequence number and extracts their manifest entries.
///
/// Fails unless the parts cover exactly `1..=total_chunks`, each once.
pub fn build_manifest(
    mut parts: Vec<PartFile>,
    total_chunks: u32,
) -> Result<Vec<FilePart>, UploadError> {
    parts.sort_by_key(|p| p.part_no);

    if parts.len() != total_chunks as usize {
        return Err(UploadError::Manifest(format!(
            "expected {total_chunks} parts, have {}",
            parts.len()
        )));
    }
    for (expected, part) in (1..=total_chunks).zip(&parts) {
        if part.part_no != expected {
            return Err(UploadError::Manifest(format!(
                "part {expected} missing or duplicated"
            )));
        }
    }

    Ok(parts.iter().map(FilePart::from).collect())
}

/// Creates the file at `path` from the session's parts.
///
/// On failure the parts stay stored remotely; a later run with the same
/// identity reuses them.
pub async fn commit(
    store: &dyn PartStore,
    session: &UploadSession,
    path: &str,
    mod_time: Option<DateTime<Utc>>,
    parts: Vec<PartFile>,
    cancel: &CancellationToken,
) -> Result<CommittedFile, UploadError> {
    let manifest = build_manifest(parts, session.total_chunks())?;

    let req = CreateFileRequest {
        name: session.file_name.clone(),
        kind: ObjectKind::File,
        path: path.to_string(),
        mime_type: String::new(),
        size: session.total_size(),
        channel_id: session.channel_id,
        encrypted: session.encrypted,
        parts: manifest,
        parent_id: String::new(),
        updated_at: mod_time,
    };

    let info = cancellable(cancel, store.create_file(&req))
        .await?
        .map_err(UploadError::Commit)?;

    info!(
        upload_id = %session.id,
        file_id = %info.id,
        path,
        parts = req.parts.len(),
        "file created"
    );

    Ok(CommittedFile {
        id: info.id,
        name: session.file_name.clone(),
        path: path.to_string(),
        parent_id: info.parent_id,
        size: session.total_size(),
        updated_at: info.updated_at.or(mod_time),
    })
}

#[cfg(test)]
mod tests {
    use teldrive_transfer::ChunkPlan;

    use super::*;
    use crate::testing::{MockStore, commit_time, stored_part};

    fn session(size: u64, chunk: u64, encrypted: bool) -> UploadSession {
        let plan = ChunkPlan::new(size, chunk).unwrap();
        UploadSession::derive("/docs", "data.bin", 1, 77, encrypted, plan)
    }

    #[test]
    fn manifest_sorted_by_part_no() {
        let parts = vec![
            stored_part(3, 30, 2),
            stored_part(1, 10, 4),
            stored_part(2, 20, 4),
        ];
        let manifest = build_manifest(parts, 3).unwrap();
        let ids: Vec<i64> = manifest.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn manifest_carries_salt() {
        let mut part = stored_part(1, 10, 4);
        part.salt = "pepper".into();
        let manifest = build_manifest(vec![part], 1).unwrap();
        assert_eq!(manifest[0].salt.as_deref(), Some("pepper"));
    }

    #[test]
    fn manifest_rejects_missing_part() {
        let parts = vec![stored_part(1, 10, 4), stored_part(3, 30, 2)];
        assert!(matches!(
            build_manifest(parts, 3),
            Err(UploadError::Manifest(_))
        ));
    }

    #[test]
    fn manifest_rejects_duplicate_part() {
        let parts = vec![
            stored_part(1, 10, 4),
            stored_part(1, 11, 4),
            stored_part(3, 30, 2),
        ];
        let err = build_manifest(parts, 3).unwrap_err();
        assert!(err.to_string().contains("part 2"));
    }

    #[test]
    fn empty_manifest_for_zero_chunks() {
        assert!(build_manifest(Vec::new(), 0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn commit_sends_single_create() {
        let store = MockStore::new();
        let s = session(10, 4, false);
        let parts = vec![
            stored_part(2, 20, 4),
            stored_part(1, 10, 4),
            stored_part(3, 30, 2),
        ];
        let local_time = Utc::now();

        let file = commit(
            &store,
            &s,
            "/docs/data.bin",
            Some(local_time),
            parts,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        let creates = store.creates();
        assert_eq!(creates.len(), 1);
        let req = &creates[0];
        assert_eq!(req.name, "data.bin");
        assert_eq!(req.kind, ObjectKind::File);
        assert_eq!(req.path, "/docs/data.bin");
        assert_eq!(req.size, 10);
        assert_eq!(req.channel_id, 77);
        assert!(!req.encrypted);
        assert_eq!(req.updated_at, Some(local_time));
        let ids: Vec<i64> = req.parts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);

        assert_eq!(file.id, "file-1");
        assert_eq!(file.parent_id, "parent-1");
        assert_eq!(file.size, 10);
        assert_eq!(file.name, "data.bin");
        assert_eq!(file.updated_at, Some(commit_time()));
    }

    #[tokio::test]
    async fn commit_failure_is_fatal() {
        let store = MockStore::new();
        store.fail_create(500);
        let s = session(4, 4, true);

        let err = commit(
            &store,
            &s,
            "/docs/data.bin",
            None,
            vec![stored_part(1, 10, 4)],
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, UploadError::Commit(_)));
        assert!(store.creates()[0].encrypted);
    }

    #[tokio::test]
    async fn incomplete_parts_never_reach_remote() {
        let store = MockStore::new();
        let s = session(10, 4, false);

        let err = commit(
            &store,
            &s,
            "/docs/data.bin",
            None,
            vec![stored_part(1, 10, 4)],
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, UploadError::Manifest(_)));
        assert!(store.creates().is_empty());
    }
}
