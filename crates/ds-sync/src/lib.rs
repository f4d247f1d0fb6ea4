//! Design Sync orchestration.
//!
//! Fetches a source document, extracts tokens with `ds-core`, writes the
//! generated artifacts atomically and notifies listeners. A failing source
//! degrades to the built-in mock document unless strict mode is on.

pub mod config;
pub mod error;
pub mod mock;
pub mod notify;
pub mod pipeline;
pub mod source;
pub mod webhook;
pub mod writer;

pub use config::SyncConfig;
pub use error::{ConfigError, SourceError, SyncError, SyncResult, WriteError};
pub use mock::{mock_document, mock_snapshot};
pub use notify::{BroadcastNotifier, LogNotifier, Notifier, TOKENS_UPDATED, TokensUpdated};
pub use pipeline::{DegradedReason, Pipeline, SyncOutcome, SyncReport};
pub use source::{
    LocalFileSource, MockSource, RemoteSource, SourceOrigin, SourceProvider, SourceSnapshot,
};
pub use webhook::{SIGNATURE_HEADER, SignatureError, sign, verify_signature};
pub use writer::{WriteReport, write_artifacts};
