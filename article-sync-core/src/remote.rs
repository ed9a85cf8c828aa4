//! Remote store operations: create-or-update routing, fetch, delete and image
//! upload. Every call is a single attempt; failures come back as values.

use std::path::Path;

use tracing::{error, info};

use crate::article::{Article, Image};
use crate::contract::{RequestMethod, Transport};
use crate::credentials::ServiceCredentials;
use crate::error::SyncError;

/// Collection path for articles.
pub const ARTICLES: &str = "articles";
/// Upload endpoint and public path prefix for images.
pub const IMAGES: &str = "images";

/// Chooses create or update purely from whether the article has an id.
pub fn save_route(article: &Article) -> (RequestMethod, String) {
    if article.is_persisted() {
        (RequestMethod::Put, article_path(&article.id))
    } else {
        (RequestMethod::Post, ARTICLES.to_string())
    }
}

pub fn article_path(id: &str) -> String {
    format!("{ARTICLES}/{id}")
}

/// Public URL of an uploaded image.
pub fn banner_url(service_url: &str, image: &Image) -> String {
    format!("{}/{IMAGES}/{}", service_url.trim_end_matches('/'), image.id)
}

/// Article operations against the remote store, over any [`Transport`].
pub struct RemoteStore<T> {
    transport: T,
}

impl<T: Transport> RemoteStore<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Creates or updates the article. The article is not modified from the
    /// response; the returned result is the only success signal.
    pub async fn save(
        &self,
        credentials: &ServiceCredentials,
        article: &Article,
    ) -> Result<(), SyncError> {
        let (method, path) = save_route(article);
        let body = serde_json::to_value(article)
            .map_err(|e| SyncError::Serialization(format!("article payload: {e}")))?;

        info!(%method, path = %path, title = %article.title, "[REMOTE] Saving article");
        match self
            .transport
            .send(credentials, method, &path, Some(body))
            .await
        {
            Ok(_) => {
                info!(%method, path = %path, "[REMOTE] Article saved");
                Ok(())
            }
            Err(e) => {
                error!(%method, path = %path, error = %e, "[REMOTE][ERROR] Article save failed");
                Err(e)
            }
        }
    }

    pub async fn fetch(
        &self,
        credentials: &ServiceCredentials,
        id: &str,
    ) -> Result<Article, SyncError> {
        let path = article_path(id);
        info!(path = %path, "[REMOTE] Fetching article");
        let bytes = self
            .transport
            .send(credentials, RequestMethod::Get, &path, None)
            .await
            .map_err(|e| {
                error!(path = %path, error = %e, "[REMOTE][ERROR] Fetch failed");
                e
            })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            error!(path = %path, error = %e, "[REMOTE][ERROR] Fetched payload is not an article");
            SyncError::transport(format!("invalid article payload from {path}: {e}"))
        })
    }

    pub async fn delete(&self, credentials: &ServiceCredentials, id: &str) -> Result<(), SyncError> {
        let path = article_path(id);
        info!(path = %path, "[REMOTE] Deleting article");
        self.transport
            .send(credentials, RequestMethod::Delete, &path, None)
            .await
            .map(|_| ())
            .map_err(|e| {
                error!(path = %path, error = %e, "[REMOTE][ERROR] Delete failed");
                e
            })
    }

    /// Uploads a local image file. Any failure, transport or decode, is an
    /// [`SyncError::Upload`].
    pub async fn upload_image(
        &self,
        credentials: &ServiceCredentials,
        local_path: &Path,
    ) -> Result<Image, SyncError> {
        info!(file = %local_path.display(), "[REMOTE] Uploading image");
        let bytes = self
            .transport
            .upload(credentials, IMAGES, local_path)
            .await
            .map_err(|e| SyncError::Upload(format!("{}: {e}", local_path.display())))?;

        let image: Image = serde_json::from_slice(&bytes)
            .map_err(|e| SyncError::Upload(format!("invalid image response: {e}")))?;
        if image.id.is_empty() {
            return Err(SyncError::Upload("image response carried no id".to_string()));
        }
        info!(image_id = %image.id, file = %local_path.display(), "[REMOTE] Image uploaded");
        Ok(image)
    }
}
