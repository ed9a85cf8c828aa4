/// `load_config` module: reads the optional YAML config file and injects secrets from the environment.
///
/// # Responsibilities
/// - Parse the user-supplied YAML file (no secrets) into typed structs
/// - Overlay environment variables: `SERVICE_USERNAME`, `SERVICE_PASSWORD`,
///   `SERVICE_URL`, `AUTH_KEY`, `ARTICLES_DIR` (environment wins over the file)
/// - Produce the [`AppConfig`] the CLI hands to the core flows
///
/// A missing auth key is not an error here; the CLI checks it as a startup
/// precondition so the message is the same with or without a config file.
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use article_sync_core::credentials::AUTH_KEY_ENV;
use article_sync_core::ServiceCredentials;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const USERNAME_ENV: &str = "SERVICE_USERNAME";
pub const PASSWORD_ENV: &str = "SERVICE_PASSWORD";
pub const SERVICE_URL_ENV: &str = "SERVICE_URL";
pub const ARTICLES_DIR_ENV: &str = "ARTICLES_DIR";

/// Shape of the YAML config file.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub articles_dir: Option<PathBuf>,
    #[serde(default)]
    pub service: ServiceSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Everything the CLI needs to build the article flows.
#[derive(Debug)]
pub struct AppConfig {
    /// Directory that document names (`dataSource`) are resolved against.
    pub articles_dir: PathBuf,
    pub credentials: ServiceCredentials,
}

impl AppConfig {
    pub fn trace_loaded(&self) {
        info!(
            articles_dir = %self.articles_dir.display(),
            service_url = %self.credentials.service_url,
            "Loaded AppConfig"
        );
        debug!(?self, "AppConfig loaded (full debug)");
    }
}

/// Loads the config file at `path` (if any) and overlays the environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let file = match path {
        Some(path) => read_file_config(path)?,
        None => {
            debug!("No config file given, using environment only");
            FileConfig::default()
        }
    };

    let credentials = ServiceCredentials {
        username: env_value(USERNAME_ENV)
            .or(file.service.username)
            .unwrap_or_default(),
        password: env_value(PASSWORD_ENV).unwrap_or_default(),
        service_url: env_value(SERVICE_URL_ENV)
            .or(file.service.url)
            .unwrap_or_default(),
        auth_key: env_value(AUTH_KEY_ENV).unwrap_or_default(),
    };

    let articles_dir = env_value(ARTICLES_DIR_ENV)
        .map(PathBuf::from)
        .or(file.articles_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok(AppConfig {
        articles_dir,
        credentials,
    })
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = fs::read_to_string(path)
        .map_err(|e| {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            e
        })
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_yaml::from_str(&content)
        .map_err(|e| {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            e
        })
        .with_context(|| format!("Failed to parse config YAML {}", path.display()))
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
