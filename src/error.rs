use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Rejected before any work starts.
    #[error("{0}")]
    Validation(String),

    #[error("unsupported language: {0}")]
    UnknownLanguage(String),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("settings error: {0}")]
    Settings(String),

    #[error("encoding error: {0}")]
    Encoding(String),
}

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// One failed adapter call. Recovered by the batch translator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Translation failed: {message}")]
pub struct TranslationError {
    pub message: String,
}

impl TranslationError {
    pub fn new(message: impl Into<String>) -> Self {
        TranslationError {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        TranslationError::new(err.to_string())
    }
}
