use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ObjectKind, null_as_default};

// ---------------------------------------------------------------------------
// Upload parts
// ---------------------------------------------------------------------------

/// A part stored remotely for an upload session.
///
/// Returned both by `GET /api/uploads/{id}` (as a list) and by a
/// successful chunk upload (as a single object).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartFile {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub part_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub part_no: u32,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_zero_u32"
    )]
    pub total_parts: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub channel_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub encrypted: bool,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub salt: String,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

/// Query string of `POST /api/uploads/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPartQuery {
    pub part_name: String,
    pub file_name: String,
    pub part_no: u32,
    pub channel_id: i64,
    pub encrypted: bool,
}

// ---------------------------------------------------------------------------
// File creation
// ---------------------------------------------------------------------------

/// Reference to a stored part inside a file manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePart {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

impl From<&PartFile> for FilePart {
    fn from(part: &PartFile) -> Self {
        Self {
            id: part.part_id,
            salt: (!part.salt.is_empty()).then(|| part.salt.clone()),
        }
    }
}

/// Body of `POST /api/files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub size: u64,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub channel_id: i64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub encrypted: bool,
    #[serde(default)]
    pub parts: Vec<FilePart>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}

// ---------------------------------------------------------------------------
// Object management
// ---------------------------------------------------------------------------

/// Body of `POST /api/files/folder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakeDirRequest {
    pub path: String,
}

/// Body of `DELETE /api/files`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub ids: Vec<String>,
}

/// Body of `PATCH /api/files/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

/// Body of `POST /api/files/move`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub destination_parent: String,
    pub ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_file_list_from_server() {
        let json = r#"[
            {"name":"a.part.001","partId":11,"partNo":1,"totalParts":2,"size":5,"channelId":7,"encrypted":false,"salt":""},
            {"name":"a.part.002","partId":12,"partNo":2,"totalParts":2,"size":3,"channelId":7,"encrypted":true,"salt":"s2"}
        ]"#;
        let parts: Vec<PartFile> = serde_json::from_str(json).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].part_id, 11);
        assert_eq!(parts[1].part_no, 2);
        assert_eq!(parts[1].salt, "s2");
    }

    #[test]
    fn part_upload_response_partial_fields() {
        let part: PartFile = serde_json::from_str(r#"{"partId":99,"salt":"x"}"#).unwrap();
        assert_eq!(part.part_id, 99);
        assert_eq!(part.part_no, 0);
    }

    #[test]
    fn part_null_strings_decode_as_empty() {
        let part: PartFile = serde_json::from_str(r#"{"partId":11,"salt":null}"#).unwrap();
        assert_eq!(part.part_id, 11);
        assert!(part.salt.is_empty());

        let json = r#"[{"name":null,"partId":12,"partNo":1,"size":4,"channelId":7,"encrypted":null,"salt":null}]"#;
        let parts: Vec<PartFile> = serde_json::from_str(json).unwrap();
        assert!(parts[0].name.is_empty());
        assert!(!parts[0].encrypted);
        assert_eq!(FilePart::from(&parts[0]).salt, None);
    }

    #[test]
    fn file_part_drops_empty_salt() {
        let part = PartFile {
            part_id: 5,
            ..Default::default()
        };
        let fp = FilePart::from(&part);
        assert_eq!(fp.salt, None);
        assert_eq!(serde_json::to_string(&fp).unwrap(), r#"{"id":5}"#);
    }

    #[test]
    fn file_part_keeps_salt() {
        let part = PartFile {
            part_id: 5,
            salt: "abc".into(),
            ..Default::default()
        };
        let fp = FilePart::from(&part);
        assert_eq!(fp.salt.as_deref(), Some("abc"));
    }

    #[test]
    fn create_file_request_shape() {
        let req = CreateFileRequest {
            name: "a.bin".into(),
            kind: ObjectKind::File,
            path: "/docs/a.bin".into(),
            mime_type: String::new(),
            size: 10,
            channel_id: 123,
            encrypted: false,
            parts: vec![FilePart { id: 1, salt: None }],
            parent_id: String::new(),
            updated_at: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["type"], "file");
        assert_eq!(v["channelId"], 123);
        assert_eq!(v["parts"][0]["id"], 1);
        assert!(v.get("encrypted").is_none());
        assert!(v.get("mimeType").is_none());
        assert!(v.get("updatedAt").is_none());
    }

    #[test]
    fn create_file_request_keeps_empty_parts() {
        let req = CreateFileRequest {
            name: "empty".into(),
            kind: ObjectKind::File,
            path: "/empty".into(),
            mime_type: String::new(),
            size: 0,
            channel_id: 1,
            encrypted: true,
            parts: Vec::new(),
            parent_id: String::new(),
            updated_at: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["parts"], serde_json::json!([]));
        assert_eq!(v["encrypted"], true);
        assert!(v.get("size").is_none());
    }

    #[test]
    fn move_request_camel_case() {
        let req = MoveRequest {
            destination_parent: "d".into(),
            ids: vec!["a".into()],
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["destinationParent"], "d");
    }

    #[test]
    fn upload_query_camel_case() {
        let q = UploadPartQuery {
            part_name: "n".into(),
            file_name: "f".into(),
            part_no: 3,
            channel_id: 9,
            encrypted: true,
        };
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["partName"], "n");
        assert_eq!(v["partNo"], 3);
        assert_eq!(v["channelId"], 9);
    }
}
