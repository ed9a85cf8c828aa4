//! Error kinds shared by every layer of the article pipeline.
//!
//! Only [`SyncError::Configuration`] is meant to abort a run. Every other
//! variant is handed back to the calling flow as a value so it can decide
//! whether to carry on (Save still writes the local document after a failed
//! remote call) or stop (Update stops when the initial fetch fails).

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// A required credential or setting is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required field was left empty.
    #[error("validation error: {0}")]
    Validation(String),

    /// The input collaborator could not read an answer (e.g. no terminal).
    #[error("input error: {0}")]
    Input(String),

    /// The remote call failed or returned a non-success status.
    #[error("transport error{}: {}", .status.map(|s| format!(" (status {s})")).unwrap_or_default(), .message)]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The remote store has no record at the addressed path.
    #[error("not found: {0}")]
    NotFound(String),

    /// An image upload failed in transport or while decoding its response.
    #[error("upload error: {0}")]
    Upload(String),

    /// The document header could not be rendered.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The bytes could not be read as header plus body.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("i/o error on {}: {}", .path.display(), .message)]
    Io { path: PathBuf, message: String },
}

impl SyncError {
    pub fn transport(message: impl Into<String>) -> Self {
        SyncError::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// True for the kinds that should end the process rather than be reported.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Configuration(_))
    }
}
