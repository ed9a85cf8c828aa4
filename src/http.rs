#![doc = "HTTP transport for the remote CMS: bridges the core `Transport` trait to reqwest."]
//
//! # HTTP Transport (CLI <-> Core)
//!
//! [`HttpTransport`] implements [`article_sync_core::contract::Transport`]
//! against the content service:
//!
//! - URLs are `<service url>/<path>`, e.g. `https://cms.example.com/articles/42`.
//! - Every request carries HTTP basic auth (username/password) and the
//!   `X-Auth-Key` header.
//! - Request bodies are JSON; image uploads are multipart with a single
//!   `file` part whose content type is guessed from the extension.
//! - 404 becomes [`SyncError::NotFound`]; any other non-success status becomes
//!   [`SyncError::Transport`] carrying the status and response text.
//!
//! No retries happen here.

use std::path::Path;

use async_trait::async_trait;
use article_sync_core::contract::{RequestMethod, Transport};
use article_sync_core::{ServiceCredentials, SyncError};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};

/// Header carrying the service auth key.
pub const AUTH_KEY_HEADER: &str = "X-Auth-Key";

/// Multipart field name for uploaded files.
pub const UPLOAD_FIELD: &str = "file";

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, SyncError> {
        let client = Client::builder()
            .user_agent(concat!("article-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Configuration(format!("could not build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn authorize(&self, request: RequestBuilder, credentials: &ServiceCredentials) -> RequestBuilder {
        request
            .basic_auth(&credentials.username, Some(&credentials.password))
            .header(AUTH_KEY_HEADER, &credentials.auth_key)
    }
}

/// Joins the service URL and a relative path with exactly one slash.
pub fn endpoint_url(service_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        service_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub fn to_reqwest_method(method: RequestMethod) -> Method {
    match method {
        RequestMethod::Get => Method::GET,
        RequestMethod::Post => Method::POST,
        RequestMethod::Put => Method::PUT,
        RequestMethod::Delete => Method::DELETE,
    }
}

async fn read_response(path: &str, response: Response) -> Result<Vec<u8>, SyncError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        tracing::warn!(path, "Remote store returned 404");
        return Err(SyncError::NotFound(path.to_string()));
    }
    if !status.is_success() {
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
        tracing::error!(status = %status, path, "Remote store returned error. Response body: {text}");
        return Err(SyncError::Transport {
            status: Some(status.as_u16()),
            message: text,
        });
    }

    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| SyncError::transport(format!("failed to read response body: {e}")))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        credentials: &ServiceCredentials,
        method: RequestMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, SyncError> {
        let url = endpoint_url(&credentials.service_url, path);
        tracing::info!(method = %method, url = %url, "Sending request");

        let mut request = self.authorize(
            self.client.request(to_reqwest_method(method), &url),
            credentials,
        );
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = ?e, url = %url, "Request failed");
            SyncError::transport(e.to_string())
        })?;
        read_response(path, response).await
    }

    async fn upload(
        &self,
        credentials: &ServiceCredentials,
        endpoint: &str,
        file: &Path,
    ) -> Result<Vec<u8>, SyncError> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| SyncError::io(file, e))?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(file).first_or_octet_stream();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime.essence_str())
            .map_err(|e| SyncError::transport(format!("invalid content type {mime}: {e}")))?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD, part);

        let url = endpoint_url(&credentials.service_url, endpoint);
        tracing::info!(url = %url, file = %file_name, content_type = %mime, "Uploading file");

        let response = self
            .authorize(self.client.post(&url), credentials)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, url = %url, "Upload failed");
                SyncError::transport(e.to_string())
            })?;
        read_response(endpoint, response).await
    }
}
