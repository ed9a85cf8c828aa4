#![doc = "article-sync-core: core logic library for article-sync."]

//! This crate holds the article model, the frontmatter document codec, field
//! reconciliation and the remote synchronisation flows. Terminal input and
//! HTTP live in the binary crate behind the traits in [`contract`].
//!
//! # Usage
//! Build an [`synchronise::ArticleSync`] from credentials, an articles
//! directory and the three collaborators, then call one of its flows.

pub mod article;
pub mod contract;
pub mod credentials;
pub mod document;
pub mod error;
pub mod files;
pub mod list_codec;
pub mod reconcile;
pub mod remote;
pub mod synchronise;

pub use article::{Article, Image};
pub use credentials::ServiceCredentials;
pub use error::SyncError;
pub use synchronise::{ArticleSync, SaveOutcome};
