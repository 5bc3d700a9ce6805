//! TelDrive REST client.
//!
//! Async HTTP client using `reqwest` with cookie authentication.

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Body, Response, StatusCode};
use serde::de::DeserializeOwned;
use teldrive_protocol::{
    CreateFileRequest, DeleteRequest, FileInfo, ListResponse, MakeDirRequest, MoveRequest,
    PartFile, RenameRequest, SessionInfo, UploadPartQuery,
};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::ClientError;

/// User-Agent sent with every request and attached to download links.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

/// Page size used when listing a folder.
const LIST_LIMIT: u32 = 1000;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `https://drive.example.com`.
    pub api_host: String,
    /// Alternate base URL for chunk uploads. `None` uses `api_host`.
    pub upload_host: Option<String>,
    /// Value of the `access_token` cookie.
    pub access_token: String,
}

/// TelDrive API client.
pub struct ApiClient {
    http: reqwest::Client,
    api_host: String,
    upload_host: String,
    session: Option<SessionInfo>,
}

impl ApiClient {
    /// Builds the HTTP client. Call [`init`](Self::init) before uploading.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("access_token={}", config.access_token))
                .map_err(|_| ClientError::InvalidToken)?,
        );

        // Download links are answered with a redirect whose target we return.
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()?;

        let api_host = config.api_host.trim_end_matches('/').to_string();
        let upload_host = config
            .upload_host
            .as_deref()
            .map(|h| h.trim_end_matches('/'))
            .filter(|h| !h.is_empty())
            .unwrap_or(&api_host)
            .to_string();

        Ok(Self {
            http,
            api_host,
            upload_host,
            session: None,
        })
    }

    /// Performs the session handshake and remembers the owner id.
    pub async fn init(&mut self) -> Result<&SessionInfo, ClientError> {
        let session = self.session().await?;
        debug!(user = %session.user_name, user_id = session.user_id, "session established");
        Ok(self.session.insert(session))
    }

    /// Owner id learned during [`init`](Self::init).
    pub fn user_id(&self) -> Result<i64, ClientError> {
        self.session
            .as_ref()
            .map(|s| s.user_id)
            .ok_or(ClientError::NotInitialized)
    }

    /// Base URL used for chunk uploads.
    pub fn upload_host(&self) -> &str {
        &self.upload_host
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_host, endpoint)
    }

    /// Fetches the authenticated session.
    pub async fn session(&self) -> Result<SessionInfo, ClientError> {
        let resp = self.http.get(self.url("/api/auth/session")).send().await?;
        parse_json(resp).await
    }

    /// Lists the children of `path` (`""` for the root).
    pub async fn list(&self, path: &str) -> Result<Vec<FileInfo>, ClientError> {
        let resp = self
            .http
            .get(self.url("/api/files"))
            .query(&[
                ("path", path.to_string()),
                ("page", "1".to_string()),
                ("limit", LIST_LIMIT.to_string()),
            ])
            .send()
            .await?;
        let list: ListResponse = parse_json(resp).await?;
        Ok(list.items)
    }

    /// Creates a folder at `path`.
    pub async fn make_dir(&self, path: &str) -> Result<FileInfo, ClientError> {
        let body = MakeDirRequest {
            path: path.to_string(),
        };
        let resp = self
            .http
            .post(self.url("/api/files/folder"))
            .json(&body)
            .send()
            .await?;
        parse_json(resp).await
    }

    /// Deletes objects by id.
    pub async fn delete(&self, ids: &[String]) -> Result<(), ClientError> {
        let body = DeleteRequest { ids: ids.to_vec() };
        let resp = self
            .http
            .delete(self.url("/api/files"))
            .json(&body)
            .send()
            .await?;
        ensure_ok(resp).await.map(drop)
    }

    /// Renames an object.
    pub async fn rename(&self, id: &str, name: &str) -> Result<(), ClientError> {
        let body = RenameRequest {
            name: name.to_string(),
        };
        let resp = self
            .http
            .patch(self.url(&format!("/api/files/{id}")))
            .json(&body)
            .send()
            .await?;
        ensure_ok(resp).await.map(drop)
    }

    /// Moves objects under a new parent folder.
    pub async fn move_objects(
        &self,
        ids: &[String],
        destination_parent: &str,
    ) -> Result<(), ClientError> {
        let body = MoveRequest {
            destination_parent: destination_parent.to_string(),
            ids: ids.to_vec(),
        };
        let resp = self
            .http
            .post(self.url("/api/files/move"))
            .json(&body)
            .send()
            .await?;
        ensure_ok(resp).await.map(drop)
    }

    /// Resolves the download URL of a file from the redirect target.
    pub async fn download_url(&self, id: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .get(self.url("/api/files/download"))
            .query(&[("id", id)])
            .send()
            .await?;
        let status = resp.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(api_error(resp).await);
        }

        resp.headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ClientError::MissingLocation(id.to_string()))
    }

    /// Returns parts already stored for an upload session.
    ///
    /// Any non-200 answer means the session has no usable parts and yields
    /// an empty list; only transport and decode failures are errors.
    pub async fn list_parts(&self, upload_id: &str) -> Result<Vec<PartFile>, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/uploads/{upload_id}")))
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK {
            debug!(upload_id, status = status.as_u16(), "no stored parts");
            return Ok(Vec::new());
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Streams one chunk of `len` bytes and returns the stored part.
    ///
    /// The body is sent as it is read, with an explicit `Content-Length`.
    pub async fn upload_part<B>(
        &self,
        upload_id: &str,
        query: &UploadPartQuery,
        body: B,
        len: u64,
    ) -> Result<PartFile, ClientError>
    where
        B: AsyncRead + Send + 'static,
    {
        let url = format!("{}/api/uploads/{upload_id}", self.upload_host);
        let resp = self
            .http
            .post(url)
            .query(query)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, len)
            .body(Body::wrap_stream(ReaderStream::new(body)))
            .send()
            .await?;
        parse_json(resp).await
    }

    /// Creates the logical file from its ordered parts.
    pub async fn create_file(&self, req: &CreateFileRequest) -> Result<FileInfo, ClientError> {
        let resp = self
            .http
            .post(self.url("/api/files"))
            .json(req)
            .send()
            .await?;
        parse_json(resp).await
    }
}

/// Returns the response if its status is 200, else an API error.
async fn ensure_ok(resp: Response) -> Result<Response, ClientError> {
    if resp.status() != StatusCode::OK {
        return Err(api_error(resp).await);
    }
    Ok(resp)
}

async fn api_error(resp: Response) -> ClientError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    ClientError::Api { status, body }
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let resp = ensure_ok(resp).await?;
    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
