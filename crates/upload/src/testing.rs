//! In-memory [`PartStore`] and helpers shared by the crate's tests.

use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use chrono::{DateTime, TimeZone, Utc};
use teldrive_client::ClientError;
use teldrive_protocol::{CreateFileRequest, FileInfo, ObjectKind, PartFile, UploadPartQuery};
use teldrive_transfer::ChunkBody;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

use crate::store::{PartStore, StoreFuture};

/// A recorded chunk upload.
#[derive(Debug, Clone)]
pub(crate) struct UploadCall {
    pub upload_id: String,
    pub query: UploadPartQuery,
    pub data: Vec<u8>,
}

#[derive(Default)]
struct State {
    stored: HashMap<String, Vec<PartFile>>,
    next_id: i64,
    uploads: Vec<UploadCall>,
    creates: Vec<CreateFileRequest>,
    events: Vec<String>,
    fail_lookup: bool,
    fail_part: Option<(u32, u16)>,
    zero_id_part: Option<u32>,
    stall_part: Option<u32>,
    fail_create: Option<u16>,
}

/// Behaves like the remote: uploaded parts are kept per session and
/// returned by later lookups, so interrupted runs can be resumed.
pub(crate) struct MockStore {
    state: Mutex<State>,
}

pub(crate) fn commit_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Channel the crate's test sessions upload to.
pub(crate) const TEST_CHANNEL: i64 = 77;

/// A plain part stored on [`TEST_CHANNEL`].
pub(crate) fn stored_part(part_no: u32, part_id: i64, size: u64) -> PartFile {
    PartFile {
        name: format!("stored-{part_no}"),
        part_id,
        part_no,
        total_parts: 0,
        size,
        channel_id: TEST_CHANNEL,
        encrypted: false,
        salt: String::new(),
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                ..Default::default()
            }),
        }
    }

    pub fn seed(&self, upload_id: &str, parts: Vec<PartFile>) {
        let mut s = self.state.lock().unwrap();
        s.stored.insert(upload_id.to_string(), parts);
    }

    pub fn fail_lookup(&self) {
        self.state.lock().unwrap().fail_lookup = true;
    }

    pub fn fail_part(&self, part_no: u32, status: u16) {
        self.state.lock().unwrap().fail_part = Some((part_no, status));
    }

    pub fn zero_id_part(&self, part_no: u32) {
        self.state.lock().unwrap().zero_id_part = Some(part_no);
    }

    /// Accepts the body of `part_no` but never answers.
    pub fn stall_part(&self, part_no: u32) {
        self.state.lock().unwrap().stall_part = Some(part_no);
    }

    pub fn fail_create(&self, status: u16) {
        self.state.lock().unwrap().fail_create = Some(status);
    }

    pub fn clear_failures(&self) {
        let mut s = self.state.lock().unwrap();
        s.fail_lookup = false;
        s.fail_part = None;
        s.zero_id_part = None;
        s.stall_part = None;
        s.fail_create = None;
    }

    pub fn log(&self, event: String) {
        self.state.lock().unwrap().events.push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn uploads(&self) -> Vec<UploadCall> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn uploaded_part_nos(&self) -> Vec<u32> {
        self.uploads().iter().map(|u| u.query.part_no).collect()
    }

    pub fn clear_uploads(&self) {
        self.state.lock().unwrap().uploads.clear();
    }

    pub fn creates(&self) -> Vec<CreateFileRequest> {
        self.state.lock().unwrap().creates.clone()
    }

    pub fn stored(&self, upload_id: &str) -> Vec<PartFile> {
        let s = self.state.lock().unwrap();
        s.stored.get(upload_id).cloned().unwrap_or_default()
    }
}

fn api_error(status: u16) -> ClientError {
    ClientError::Api {
        status,
        body: "mock failure".into(),
    }
}

impl PartStore for MockStore {
    fn list_parts<'a>(&'a self, upload_id: &'a str) -> StoreFuture<'a, Vec<PartFile>> {
        Box::pin(async move {
            let mut s = self.state.lock().unwrap();
            s.events.push("list".into());
            if s.fail_lookup {
                return Err(api_error(503));
            }
            Ok(s.stored.get(upload_id).cloned().unwrap_or_default())
        })
    }

    fn upload_part<'a>(
        &'a self,
        upload_id: &'a str,
        query: &'a UploadPartQuery,
        mut body: ChunkBody,
    ) -> StoreFuture<'a, PartFile> {
        Box::pin(async move {
            let mut data = Vec::new();
            let read = body.read_to_end(&mut data).await;

            let reply = {
                let mut s = self.state.lock().unwrap();
                s.events.push(format!("upload:{}", query.part_no));
                s.uploads.push(UploadCall {
                    upload_id: upload_id.to_string(),
                    query: query.clone(),
                    data: data.clone(),
                });

                // A truncated body is rejected like a server would.
                if let Err(e) = read {
                    return Err(ClientError::Api {
                        status: 400,
                        body: e.to_string(),
                    });
                }
                if let Some((part_no, status)) = s.fail_part
                    && part_no == query.part_no
                {
                    return Err(api_error(status));
                }

                if s.stall_part == Some(query.part_no) {
                    None
                } else {
                    s.next_id += 1;
                    let part_id = if s.zero_id_part == Some(query.part_no) {
                        0
                    } else {
                        s.next_id
                    };
                    let part = PartFile {
                        name: query.part_name.clone(),
                        part_id,
                        part_no: query.part_no,
                        total_parts: 0,
                        size: data.len() as u64,
                        channel_id: query.channel_id,
                        encrypted: query.encrypted,
                        salt: if query.encrypted {
                            format!("salt-{}", query.part_no)
                        } else {
                            String::new()
                        },
                    };
                    if part_id != 0 {
                        s.stored
                            .entry(upload_id.to_string())
                            .or_default()
                            .push(part.clone());
                    }
                    // The server answers with id and salt only.
                    Some(PartFile {
                        part_id: part.part_id,
                        salt: part.salt,
                        ..Default::default()
                    })
                }
            };

            match reply {
                Some(part) => Ok(part),
                None => std::future::pending().await,
            }
        })
    }

    fn create_file<'a>(&'a self, req: &'a CreateFileRequest) -> StoreFuture<'a, FileInfo> {
        Box::pin(async move {
            let mut s = self.state.lock().unwrap();
            s.events.push("create".into());
            s.creates.push(req.clone());
            if let Some(status) = s.fail_create {
                return Err(api_error(status));
            }
            Ok(FileInfo {
                id: "file-1".into(),
                name: String::new(),
                mime_type: String::new(),
                size: 0,
                parent_id: "parent-1".into(),
                kind: ObjectKind::File,
                updated_at: Some(commit_time()),
            })
        })
    }
}

/// Deterministic test payload of `len` bytes.
pub(crate) fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Reader that counts how many bytes were pulled from it.
pub(crate) struct CountingReader {
    inner: std::io::Cursor<Vec<u8>>,
    count: Arc<AtomicU64>,
}

impl CountingReader {
    pub fn new(data: Vec<u8>) -> (Self, Arc<AtomicU64>) {
        let count = Arc::new(AtomicU64::new(0));
        (
            Self {
                inner: std::io::Cursor::new(data),
                count: Arc::clone(&count),
            },
            count,
        )
    }
}

impl AsyncRead for CountingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let res = Pin::new(&mut self.inner).poll_read(cx, buf);
        let read = buf.filled().len() - before;
        self.count.fetch_add(read as u64, Ordering::SeqCst);
        res
    }
}

pub(crate) fn consumed(count: &Arc<AtomicU64>) -> u64 {
    count.load(Ordering::SeqCst)
}
