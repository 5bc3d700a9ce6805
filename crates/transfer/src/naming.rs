use uuid::Uuid;

use crate::identity::md5_hex;

/// Returns a fresh, unpredictable chunk name (MD5 hex of a random UUID).
pub fn random_chunk_name() -> String {
    md5_hex(&Uuid::new_v4().to_string())
}

/// Derives the remote name of chunk `part_no`.
///
/// - `randomize`: a random 32-char hex name per chunk.
/// - more than one chunk: `<file>.part.<NNN>`.
/// - single chunk: the file name itself.
pub fn chunk_name(file_name: &str, part_no: u32, total_chunks: u32, randomize: bool) -> String {
    if randomize {
        random_chunk_name()
    } else if total_chunks > 1 {
        format!("{file_name}.part.{part_no:03}")
    } else {
        file_name.to_string()
    }
}
