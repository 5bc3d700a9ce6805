//! Lookup of parts already stored for a session.

use std::collections::HashMap;

use teldrive_protocol::PartFile;
use tracing::{debug, warn};

use crate::store::PartStore;

/// Returns stored parts of `upload_id` keyed by sequence number.
///
/// Best effort: a failed lookup is logged and treated as "nothing stored",
/// so the upload starts over instead of aborting. Entries without a part
/// id or sequence number are ignored; for duplicate sequence numbers the
/// last entry wins.
pub async fn existing_parts(store: &dyn PartStore, upload_id: &str) -> HashMap<u32, PartFile> {
    let parts = match store.list_parts(upload_id).await {
        Ok(parts) => parts,
        Err(e) => {
            warn!(upload_id, error = %e, "stored part lookup failed, uploading every chunk");
            return HashMap::new();
        }
    };

    let mut existing = HashMap::with_capacity(parts.len());
    for part in parts {
        if part.part_no == 0 || part.part_id == 0 {
            debug!(upload_id, part_no = part.part_no, "ignoring incomplete stored part");
            continue;
        }
        existing.insert(part.part_no, part);
    }
    existing
}
