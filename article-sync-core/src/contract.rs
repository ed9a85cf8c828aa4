//! # contract: collaborator interfaces for the article pipeline
//!
//! The core never talks to a terminal, a socket or the disk directly. It goes
//! through three narrow traits instead:
//!
//! - [`Prompter`]: asks the operator for a value, offering a default.
//! - [`Transport`]: performs one authenticated request against the remote
//!   store, or uploads a file.
//! - [`FileStore`]: reads and writes local documents.
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall`, so flows can be driven
//!   deterministically in unit and integration tests. The mocks are exported
//!   behind the `test-export-mocks` feature.
//!
//! ## Implementations
//! - The binary crate ships the terminal prompter and the HTTP transport.
//! - [`crate::files::LocalFiles`] is the std filesystem store.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[allow(unused_imports)]
use mockall::{automock, predicate::*};

use crate::credentials::ServiceCredentials;
use crate::error::SyncError;

/// Request methods the remote store understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interactive input collaborator.
///
/// Implementations show `default` and return it when the operator just
/// presses enter. A `required` prompt must never return an empty string.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Prompter: Send + Sync {
    fn ask_string(&self, prompt: &str, default: &str, required: bool) -> Result<String, SyncError>;

    fn ask_date(&self, prompt: &str, default: DateTime<Utc>) -> Result<DateTime<Utc>, SyncError>;

    fn ask_csv(&self, prompt: &str, default: &[String]) -> Result<Vec<String>, SyncError>;
}

/// Authenticated request collaborator for the remote store.
///
/// `path` is relative to the service URL (e.g. `articles/42`). Implementations
/// own timeouts; the core never retries. A 404 must surface as
/// [`SyncError::NotFound`].
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the raw response body.
    async fn send(
        &self,
        credentials: &ServiceCredentials,
        method: RequestMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, SyncError>;

    /// Uploads the bytes of `file` to `endpoint` and returns the raw response body.
    async fn upload(
        &self,
        credentials: &ServiceCredentials,
        endpoint: &str,
        file: &Path,
    ) -> Result<Vec<u8>, SyncError>;
}

/// Local document storage collaborator. Errors are surfaced as-is.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait FileStore: Send + Sync {
    fn read(&self, path: &Path) -> Result<Vec<u8>, SyncError>;

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), SyncError>;
}
