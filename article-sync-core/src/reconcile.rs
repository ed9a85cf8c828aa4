//! Field reconciliation: fill an article from operator input before it is
//! persisted.
//!
//! A field is prompted for when it is empty or when prompts are not bypassed.
//! Publish date, categories and tags are the exception: an epoch date or an
//! empty list is a legitimate value, so they are only asked for when prompts
//! are not bypassed. The current value is always offered as the default.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::article::Article;
use crate::contract::{Prompter, Transport};
use crate::credentials::ServiceCredentials;
use crate::error::SyncError;
use crate::remote::{banner_url, RemoteStore};

/// Upper bound on banner answers before the previous banner is kept.
pub const MAX_BANNER_ATTEMPTS: usize = 5;

pub async fn reconcile<P, T>(
    article: &mut Article,
    bypass_prompts: bool,
    credentials: &ServiceCredentials,
    prompter: &P,
    remote: &RemoteStore<T>,
) -> Result<(), SyncError>
where
    P: Prompter + ?Sized,
    T: Transport,
{
    let ask_all = !bypass_prompts;
    debug!(bypass_prompts, id = %article.id, "[RECONCILE] Reconciling article fields");

    if ask_all || article.title.is_empty() {
        article.title = prompter.ask_string("Article Title", &article.title, true)?;
    }

    if ask_all {
        article.publish_date = prompter.ask_date("Publish Date", article.publish_date)?;
    }

    if ask_all || article.url.is_empty() {
        article.url = prompter.ask_string("Permalink", &article.url, true)?;
    }

    if ask_all || article.banner.is_empty() {
        article.banner = resolve_banner(&article.banner, credentials, prompter, remote).await?;
    }

    if ask_all || article.data_source.is_empty() {
        article.data_source = prompter.ask_string("Data source", &article.data_source, false)?;
    }

    if ask_all || article.author.is_empty() {
        article.author = prompter.ask_string("Author Name", &article.author, true)?;
    }

    if ask_all {
        article.categories = prompter.ask_csv("Categories (csv)", &article.categories)?;
    }

    if ask_all {
        article.tags = prompter.ask_csv("Tags (csv)", &article.tags)?;
    }

    info!(title = %article.title, url = %article.url, "[RECONCILE] Article fields reconciled");
    Ok(())
}

/// Asks for a banner until it is settled.
///
/// Empty answer: no banner. An `http(s)://` answer is already remote and kept
/// as-is. Anything else is a local image path that gets uploaded; a failed
/// upload re-prompts.
async fn resolve_banner<P, T>(
    current: &str,
    credentials: &ServiceCredentials,
    prompter: &P,
    remote: &RemoteStore<T>,
) -> Result<String, SyncError>
where
    P: Prompter + ?Sized,
    T: Transport,
{
    for attempt in 1..=MAX_BANNER_ATTEMPTS {
        let answer = prompter.ask_string("Banner Url", current, false)?;
        let answer = answer.trim();

        if answer.is_empty() {
            return Ok(String::new());
        }
        if is_remote_url(answer) {
            return Ok(answer.to_string());
        }

        match remote.upload_image(credentials, Path::new(answer)).await {
            Ok(image) => return Ok(banner_url(&credentials.service_url, &image)),
            Err(e) => {
                warn!(attempt, file = %answer, error = %e, "[RECONCILE] Could not save image, please try again");
            }
        }
    }

    warn!(
        attempts = MAX_BANNER_ATTEMPTS,
        banner = %current,
        "[RECONCILE] Giving up on banner upload, keeping the previous banner"
    );
    Ok(current.to_string())
}

fn is_remote_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
