use crate::identity::upload_id;
use crate::plan::ChunkPlan;

/// Identity and parameters of one logical upload.
///
/// Nothing here is persisted locally: the remote service keys its stored
/// parts by [`id`](Self::id), so re-deriving the session from the same
/// inputs is enough to resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub id: String,
    pub file_name: String,
    pub channel_id: i64,
    pub encrypted: bool,
    pub plan: ChunkPlan,
}

impl UploadSession {
    /// Derives the session for uploading `file_name` (sized by `plan`)
    /// into `dest_dir` on behalf of `owner_id`.
    pub fn derive(
        dest_dir: &str,
        file_name: &str,
        owner_id: i64,
        channel_id: i64,
        encrypted: bool,
        plan: ChunkPlan,
    ) -> Self {
        Self {
            id: upload_id(dest_dir, file_name, plan.total_size(), owner_id),
            file_name: file_name.to_string(),
            channel_id,
            encrypted,
            plan,
        }
    }

    /// Total number of chunks in this session.
    pub fn total_chunks(&self) -> u32 {
        self.plan.total_chunks()
    }

    /// Total source size in bytes.
    pub fn total_size(&self) -> u64 {
        self.plan.total_size()
    }
}
