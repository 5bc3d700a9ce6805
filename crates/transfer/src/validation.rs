use crate::TransferError;

/// Validates a single remote object name (file or folder).
///
/// Rejects:
/// - Empty names
/// - `.` and `..`
/// - Names containing a path separator or NUL
pub fn validate_object_name(name: &str) -> Result<(), TransferError> {
    if name.is_empty() {
        return Err(TransferError::InvalidName("empty name".into()));
    }

    if name == "." || name == ".." {
        return Err(TransferError::InvalidName(format!(
            "relative component not allowed: {name}"
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(TransferError::InvalidName(format!(
            "path separator not allowed: {name}"
        )));
    }

    if name.contains('\0') {
        return Err(TransferError::InvalidName("NUL byte not allowed".into()));
    }

    Ok(())
}
