//! Source providers: where the source document comes from.

use crate::config::SyncConfig;
use crate::error::SourceError;
use crate::mock::mock_snapshot;
use async_trait::async_trait;
use ds_core::model::{LocalVariables, SourceDocument, decode_json};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;

/// One fetched source: the document plus optional local variables.
#[derive(Debug, Clone)]
pub struct SourceSnapshot {
    pub document: SourceDocument,
    pub variables: Option<LocalVariables>,
}

/// Where a run's data actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceOrigin {
    Remote,
    LocalFile,
    Mock,
}

#[async_trait]
pub trait SourceProvider: Send + Sync {
    fn origin(&self) -> SourceOrigin;

    /// Human-readable description for logs.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<SourceSnapshot, SourceError>;
}

// ─── Remote ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct Credentials {
    token: String,
    file_key: String,
}

/// Fetches the file and its local variables from the design tool's REST API.
pub struct RemoteSource {
    client: reqwest::Client,
    api_base: String,
    timeout: Duration,
    credentials: Option<Credentials>,
}

impl RemoteSource {
    /// Build from configuration. Missing credentials are not an error
    /// here; `fetch` reports them so the caller can fall back.
    pub fn new(config: &SyncConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SourceError::Network)?;
        let credentials = match (&config.access_token, &config.file_key) {
            (Some(token), Some(file_key)) => Some(Credentials {
                token: token.clone(),
                file_key: file_key.clone(),
            }),
            _ => None,
        };
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            timeout: config.timeout,
            credentials,
        })
    }

    fn credentials(&self) -> Result<&Credentials, SourceError> {
        self.credentials
            .as_ref()
            .ok_or(SourceError::MissingCredentials)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let creds = self.credentials()?;
        let url = format!("{}{path}", self.api_base);
        log::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .header("X-Figma-Token", &creds.token)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::from_reqwest(e, self.timeout))?;

        match status.as_u16() {
            200..=299 => Ok(decode_json(&body)?),
            code @ (401 | 403) => Err(SourceError::Auth(code)),
            404 => Err(SourceError::NotFound(creds.file_key.clone())),
            code => Err(SourceError::Status {
                status: code,
                body: String::from_utf8_lossy(&body).chars().take(200).collect(),
            }),
        }
    }

    /// The raw file JSON, untouched, for saving to disk.
    pub async fn fetch_raw(&self) -> Result<serde_json::Value, SourceError> {
        let key = &self.credentials()?.file_key;
        self.get(&format!("/files/{key}")).await
    }
}

#[async_trait]
impl SourceProvider for RemoteSource {
    fn origin(&self) -> SourceOrigin {
        SourceOrigin::Remote
    }

    fn describe(&self) -> String {
        match &self.credentials {
            Some(c) => format!("{}/files/{}", self.api_base, c.file_key),
            None => format!("{} (unconfigured)", self.api_base),
        }
    }

    async fn fetch(&self) -> Result<SourceSnapshot, SourceError> {
        let key = &self.credentials()?.file_key;
        let document_path = format!("/files/{key}");
        let variables_path = format!("/files/{key}/variables/local");

        let (document, variables) = tokio::join!(
            self.get::<SourceDocument>(&document_path),
            self.get::<LocalVariables>(&variables_path),
        );
        let document = document?;
        let variables = match variables {
            Ok(vars) => Some(vars),
            Err(err) => {
                log::warn!("local variables unavailable, continuing without them: {err}");
                None
            }
        };

        log::info!(
            "fetched `{}` ({} pages, last modified {})",
            document.name,
            document.pages().len(),
            document.last_modified.as_deref().unwrap_or("unknown")
        );
        Ok(SourceSnapshot {
            document,
            variables,
        })
    }
}

// ─── Local file ──────────────────────────────────────────────────────────

/// Reads a previously downloaded file JSON.
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceProvider for LocalFileSource {
    fn origin(&self) -> SourceOrigin {
        SourceOrigin::LocalFile
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<SourceSnapshot, SourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let document: SourceDocument = decode_json(&bytes)?;
        Ok(SourceSnapshot {
            document,
            variables: None,
        })
    }
}

// ─── Mock ────────────────────────────────────────────────────────────────

/// Always yields the built-in mock document.
pub struct MockSource;

#[async_trait]
impl SourceProvider for MockSource {
    fn origin(&self) -> SourceOrigin {
        SourceOrigin::Mock
    }

    fn describe(&self) -> String {
        "built-in mock document".to_string()
    }

    async fn fetch(&self) -> Result<SourceSnapshot, SourceError> {
        Ok(mock_snapshot())
    }
}
