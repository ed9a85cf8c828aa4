//! High-level flows: compose reconciliation, remote sync and the document
//! codec into the operator-facing workflows.
//!
//! # Flows
//! - [`ArticleSync::save_article`]: reconcile → remote save → local document write
//! - [`ArticleSync::update_article`]: fetch by id → save
//! - [`ArticleSync::load_article`]: read local document → save
//! - [`ArticleSync::delete_article`]: prompt for id → remote delete
//! - [`ArticleSync::get_article`]: prompt for id → remote fetch
//! - [`ArticleSync::export_article`]: fetch by id → local document write
//!
//! # Error Handling
//! A missing auth key ends every flow with [`SyncError::Configuration`] before
//! anything else happens. During Save the local document is written even when
//! the remote call failed, as a best-effort backup; both results are handed
//! back in [`SaveOutcome`] so neither failure is lost. Update stops when its
//! initial fetch fails. Load never fails on a bad document: it falls back to
//! a default article and prompts for everything.
//!
//! # Concurrency
//! One article per flow, one request in flight. Credentials are owned here
//! and only mutated while they are being resolved.

use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::article::Article;
use crate::contract::{FileStore, Prompter, Transport};
use crate::credentials::ServiceCredentials;
use crate::document;
use crate::error::SyncError;
use crate::reconcile::reconcile;
use crate::remote::RemoteStore;

/// Result of a Save: the reconciled article plus the separate outcomes of the
/// remote write and the local document write.
#[derive(Debug)]
pub struct SaveOutcome {
    pub article: Article,
    pub remote: Result<(), SyncError>,
    /// Path of the written document on success.
    pub local: Result<PathBuf, SyncError>,
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        self.remote.is_ok() && self.local.is_ok()
    }

    /// Collapses the outcome; the remote error wins over the local one.
    pub fn into_result(self) -> Result<Article, SyncError> {
        let SaveOutcome {
            article,
            remote,
            local,
        } = self;
        remote?;
        local?;
        Ok(article)
    }
}

/// Runs the article workflows against one set of collaborators.
pub struct ArticleSync<P, T, F> {
    credentials: ServiceCredentials,
    articles_dir: PathBuf,
    prompter: P,
    remote: RemoteStore<T>,
    files: F,
}

impl<P, T, F> ArticleSync<P, T, F>
where
    P: Prompter,
    T: Transport,
    F: FileStore,
{
    pub fn new(
        credentials: ServiceCredentials,
        articles_dir: impl Into<PathBuf>,
        prompter: P,
        transport: T,
        files: F,
    ) -> Self {
        Self {
            credentials,
            articles_dir: articles_dir.into(),
            prompter,
            remote: RemoteStore::new(transport),
            files,
        }
    }

    pub fn credentials(&self) -> &ServiceCredentials {
        &self.credentials
    }

    /// Where the document for `data_source` lives.
    pub fn document_path(&self, data_source: &str) -> PathBuf {
        self.articles_dir.join(data_source)
    }

    pub async fn save_article(
        &mut self,
        mut article: Article,
        bypass_prompts: bool,
    ) -> Result<SaveOutcome, SyncError> {
        self.credentials.resolve(&self.prompter)?;
        reconcile(
            &mut article,
            bypass_prompts,
            &self.credentials,
            &self.prompter,
            &self.remote,
        )
        .await?;

        let remote = self.remote.save(&self.credentials, &article).await;
        if let Err(e) = &remote {
            warn!(error = %e, "[SAVE] Remote save failed, still writing the local document");
        }

        let local = self.write_document(&article);
        Ok(SaveOutcome {
            article,
            remote,
            local,
        })
    }

    pub async fn update_article(&mut self, bypass_prompts: bool) -> Result<SaveOutcome, SyncError> {
        let article = self.get_article().await?;
        self.save_article(article, bypass_prompts).await
    }

    pub async fn load_article(&mut self, bypass_prompts: bool) -> Result<SaveOutcome, SyncError> {
        self.credentials.require_auth_key()?;
        let file_name = self
            .prompter
            .ask_string("Import File location", "", false)?;
        let defaults = Article::default();
        let path = self.document_path(&file_name);

        let bytes = match self.files.read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "[LOAD] Could not read document, starting from defaults");
                return self.save_article(defaults, false).await;
            }
        };

        match document::decode(&bytes, defaults.clone()) {
            Ok(mut article) => {
                info!(path = %path.display(), title = %article.title, "[LOAD] Document imported");
                article.data_source = file_name;
                self.save_article(article, bypass_prompts).await
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "[LOAD] Could not decode document, starting from defaults");
                self.save_article(defaults, false).await
            }
        }
    }

    /// Returns the id of the deleted article.
    pub async fn delete_article(&mut self) -> Result<String, SyncError> {
        self.credentials.require_auth_key()?;
        let id = self.ask_article_id()?;
        self.credentials.resolve(&self.prompter)?;
        self.remote.delete(&self.credentials, &id).await?;
        info!(id = %id, "[DELETE] Article deleted");
        Ok(id)
    }

    pub async fn get_article(&mut self) -> Result<Article, SyncError> {
        self.credentials.require_auth_key()?;
        let id = self.ask_article_id()?;
        self.credentials.resolve(&self.prompter)?;
        self.remote.fetch(&self.credentials, &id).await
    }

    /// Fetches an article and writes it as a local document without touching
    /// the remote record.
    pub async fn export_article(&mut self) -> Result<(Article, PathBuf), SyncError> {
        let mut article = self.get_article().await?;
        article.data_source =
            self.prompter
                .ask_string("Export file name", &article.data_source, true)?;
        let path = self.write_document(&article)?;
        Ok((article, path))
    }

    fn ask_article_id(&self) -> Result<String, SyncError> {
        let id = self.prompter.ask_string("Article Id", "", true)?;
        let id = id.trim();
        if id.is_empty() {
            return Err(SyncError::Validation("article id is required".to_string()));
        }
        Ok(id.to_string())
    }

    fn write_document(&self, article: &Article) -> Result<PathBuf, SyncError> {
        if article.data_source.trim().is_empty() {
            let err = SyncError::Validation(
                "data source is empty, no local document path to write".to_string(),
            );
            warn!(error = %err, "[SAVE] Skipping local document");
            return Err(err);
        }

        let path = self.document_path(&article.data_source);
        info!(path = %path.display(), "[SAVE] Saving document");
        let bytes = document::encode(article).map_err(|e| {
            error!(path = %path.display(), error = %e, "[SAVE][ERROR] Could not encode document");
            e
        })?;
        self.files.write(&path, &bytes).map_err(|e| {
            error!(path = %path.display(), error = %e, "[SAVE][ERROR] Could not write document");
            e
        })?;
        Ok(path)
    }
}
