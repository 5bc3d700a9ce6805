fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use teldrive_protocol::{
        CreateFileRequest, FileInfo, ListResponse, MoveRequest, ObjectKind, PartFile, SessionInfo,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (order-independent). Returns the parsed value.
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  server: {fixture}\n  rust:   {reserialized}"
        );
        parsed
    }

    #[test]
    fn fixture_session() {
        let session = roundtrip_test::<SessionInfo>("session.json");
        assert_eq!(session.user_id, 5123456789);
    }

    #[test]
    fn fixture_list_response() {
        let list = roundtrip_test::<ListResponse>("list_response.json");
        assert_eq!(list.items.len(), 2);
        assert!(!list.items[0].is_folder());
        assert_eq!(list.items[1].kind, ObjectKind::Folder);
        assert_eq!(list.meta.count, 2);
    }

    #[test]
    fn fixture_upload_parts() {
        let parts = roundtrip_test::<Vec<PartFile>>("upload_parts.json");
        assert_eq!(parts[0].channel_id, -1001234567890);
        assert_eq!(parts[0].salt, "c2FsdC0x");
        // Missing salt decodes as empty.
        assert!(parts[1].salt.is_empty());
    }

    #[test]
    fn fixture_create_file_request() {
        let req = roundtrip_test::<CreateFileRequest>("create_file_request.json");
        assert_eq!(req.kind, ObjectKind::File);
        let ids: Vec<i64> = req.parts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3301, 3302, 3303]);
        assert!(req.parent_id.is_empty());
    }

    #[test]
    fn fixture_create_file_response() {
        let info = roundtrip_test::<FileInfo>("create_file_response.json");
        assert_eq!(info.parent_id, "6a1f0c2e-9d3b-4e5f-8a7b-1c2d3e4f5a6b");
        assert!(info.updated_at.is_some());
    }

    #[test]
    fn fixture_move_request() {
        let req = roundtrip_test::<MoveRequest>("move_request.json");
        assert_eq!(req.ids.len(), 1);
    }

    #[test]
    fn server_extra_fields_are_ignored() {
        let json = r#"{"id":"x","name":"n","type":"file","size":1,"starred":true,"category":"document"}"#;
        let info: FileInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.id, "x");
    }

    #[test]
    fn server_null_salt_is_accepted() {
        let part: PartFile = serde_json::from_str(r#"{"partId":11,"salt":null}"#).unwrap();
        assert_eq!(part.part_id, 11);
        assert!(part.salt.is_empty());
    }
}
