use tracing::{debug, info};

use crate::contract::Prompter;
use crate::error::SyncError;

/// Name of the environment variable holding the service auth key.
pub const AUTH_KEY_ENV: &str = "AUTH_KEY";

/// Process-wide service credentials.
///
/// Filled from configuration at startup; blank username, password or service
/// URL are prompted for on first use and then kept for the rest of the run.
/// The auth key is never prompted for.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub username: String,
    pub password: String,
    pub service_url: String,
    pub auth_key: String,
}

impl std::fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("username", &self.username)
            .field("password_set", &!self.password.is_empty())
            .field("service_url", &self.service_url)
            .field("auth_key_set", &!self.auth_key.is_empty())
            .finish()
    }
}

impl ServiceCredentials {
    /// Startup precondition: the auth key has to come from the environment.
    pub fn require_auth_key(&self) -> Result<(), SyncError> {
        if self.auth_key.trim().is_empty() {
            return Err(SyncError::Configuration(format!(
                "{AUTH_KEY_ENV} environment variable must be set"
            )));
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty()
            && !self.password.is_empty()
            && !self.service_url.is_empty()
            && !self.auth_key.is_empty()
    }

    /// Prompts for whichever of username, password and service URL is still
    /// blank. Fields that are already set are left alone, so repeated calls
    /// within one run ask at most once per field.
    pub fn resolve<P: Prompter + ?Sized>(&mut self, prompter: &P) -> Result<(), SyncError> {
        self.require_auth_key()?;

        if self.username.is_empty() {
            self.username = prompter.ask_string("Username", "", true)?;
        }
        if self.password.is_empty() {
            self.password = prompter.ask_string("Password", "", true)?;
        }
        if self.service_url.is_empty() {
            self.service_url = prompter.ask_string("Service Url", "", true)?;
        }

        if self.is_complete() {
            info!(service_url = %self.service_url, username = %self.username, "[AUTH] Service credentials resolved");
        } else {
            debug!(credentials = ?self, "[AUTH] Credentials still incomplete after prompting");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_never_contains_secrets() {
        let credentials = ServiceCredentials {
            username: "jane".into(),
            password: "hunter2".into(),
            service_url: "https://cms.example.com".into(),
            auth_key: "k-secret".into(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("jane"));
        assert!(rendered.contains("password_set: true"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("k-secret"));
    }

    #[test]
    fn blank_auth_key_fails_the_startup_check() {
        let credentials = ServiceCredentials {
            auth_key: "  ".into(),
            ..ServiceCredentials::default()
        };
        let err = credentials.require_auth_key().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains(AUTH_KEY_ENV));
    }
}
