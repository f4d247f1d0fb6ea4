//! Live-update notification.

use chrono::{DateTime, Utc};
use ds_core::tokens::{TokenSet, TokenStats};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

pub const TOKENS_UPDATED: &str = "tokens-updated";

/// Broadcast after every successful write.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensUpdated {
    pub kind: &'static str,
    pub timestamp: DateTime<Utc>,
    pub summary_counts: TokenStats,
    pub degraded: bool,
    pub token_set: TokenSet,
}

impl TokensUpdated {
    pub fn new(tokens: TokenSet, degraded: bool) -> Self {
        Self {
            kind: TOKENS_UPDATED,
            timestamp: Utc::now(),
            summary_counts: tokens.stats(),
            degraded,
            token_set: tokens,
        }
    }
}

/// Fire-and-forget publisher. Implementations must not block.
pub trait Notifier: Send + Sync {
    fn publish(&self, event: &TokensUpdated);
}

/// Fans events out to every subscriber of a broadcast channel. Publishing
/// with no subscribers is fine; slow subscribers lose the oldest events.
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Arc<TokensUpdated>>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<TokensUpdated>> {
        self.tx.subscribe()
    }

    pub fn subscribers(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(16)
    }
}

impl Notifier for BroadcastNotifier {
    fn publish(&self, event: &TokensUpdated) {
        match self.tx.send(Arc::new(event.clone())) {
            Ok(n) => log::info!("notified {n} subscriber(s) of {}", event.kind),
            Err(_) => log::debug!("no subscribers for {}", event.kind),
        }
    }
}

/// Logs the event summary; used by one-shot CLI runs.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn publish(&self, event: &TokensUpdated) {
        log::info!(
            "{} at {}: {}{}",
            event.kind,
            event.timestamp.to_rfc3339(),
            event.summary_counts,
            if event.degraded { " (degraded)" } else { "" }
        );
    }
}
