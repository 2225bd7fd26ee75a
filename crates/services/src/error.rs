//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use tutor_core::model::QuestionSetError;

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("session base cannot be empty")]
    EmptySessionBase,
    #[error("invalid URL {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        source: url::ParseError,
    },
}

/// Errors emitted while locating and loading a question set.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("enter a session code")]
    EmptyCode,
    /// `code` is stored upper-cased, the way the learner sees it.
    #[error("Session \"{code}\" not found on server.")]
    NotFound { code: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("session mapping is not a JSON object of code to URL: {0}")]
    Mapping(serde_json::Error),
    #[error("invalid session location: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    QuestionSet(#[from] QuestionSetError),
}

/// Errors emitted by `ReportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("failed to serialize session report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
