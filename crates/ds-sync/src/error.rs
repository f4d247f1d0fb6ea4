use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The source document could not be obtained.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no access token or file key configured")]
    MissingCredentials,
    #[error("access token rejected (HTTP {0})")]
    Auth(u16),
    #[error("file `{0}` not found")]
    NotFound(String),
    #[error("unexpected HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl SourceError {
    /// Short stable tag, reported with degraded runs.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::MissingCredentials => "missing-credentials",
            SourceError::Auth(_) => "auth",
            SourceError::NotFound(_) => "not-found",
            SourceError::Status { .. } => "status",
            SourceError::Timeout(_) => "timeout",
            SourceError::Network(_) => "network",
            SourceError::Decode(_) => "decode",
            SourceError::Io(_) => "io",
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            SourceError::Timeout(timeout)
        } else {
            SourceError::Network(err)
        }
    }
}

/// Generated artifacts could not be written.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot stage {file}: {source}")]
    Stage { file: String, source: io::Error },
    #[error("cannot replace {file}: {source}")]
    Persist { file: String, source: io::Error },
}

/// A full sync run failed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
    #[error("cannot render artifacts: {0}")]
    Render(#[from] serde_json::Error),
    #[error("cannot write artifacts: {0}")]
    Write(#[from] WriteError),
    #[error("artifact writer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// An environment variable held an unusable value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got `{value}`")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
