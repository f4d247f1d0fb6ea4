//! Pipeline orchestrator: source → walk → artifacts → notify.
//!
//! One parameterized pipeline. Behaviour varies through the registered
//! extractor set and the source provider passed to each run, never through
//! separate code paths.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::mock::mock_snapshot;
use crate::notify::{Notifier, TokensUpdated};
use crate::source::{SourceOrigin, SourceProvider, SourceSnapshot};
use crate::writer::{WriteReport, write_artifacts};
use ds_core::emitter::render_artifacts;
use ds_core::extract::extract_variables;
use ds_core::lint::{LintDiagnostic, LintSeverity, lint_walk};
use ds_core::tokens::{TokenSet, TokenStats};
use ds_core::walk::{ExtractorSet, WalkStats, walk_document};
use serde::Serialize;
use std::sync::Arc;

/// Why a run used mock data instead of the real source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegradedReason {
    /// Stable tag, e.g. `auth` or `missing-credentials`.
    pub kind: &'static str,
    pub message: String,
}

/// Result of extracting one token set.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub tokens: TokenSet,
    pub stats: TokenStats,
    pub origin: SourceOrigin,
    /// `Some` when the run fell back to mock data.
    pub degraded: Option<DegradedReason>,
    pub diagnostics: Vec<LintDiagnostic>,
    pub walk: WalkStats,
}

impl SyncOutcome {
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Result of a full sync: the outcome plus what hit the disk.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    pub write: WriteReport,
}

pub struct Pipeline {
    config: SyncConfig,
    extractors: ExtractorSet,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Pipeline {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            extractors: ExtractorSet::standard(),
            notifier: None,
        }
    }

    #[must_use]
    pub fn with_extractors(mut self, extractors: ExtractorSet) -> Self {
        if extractors.is_empty() {
            log::warn!("no extractors configured; document nodes will contribute no tokens");
        }
        self.extractors = extractors;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Fetch and extract. A source failure falls back to the mock document
    /// and marks the outcome degraded, unless `strict_source` is set.
    pub async fn run(&self, source: &dyn SourceProvider) -> SyncResult<SyncOutcome> {
        log::info!(
            "fetching source from {} (extractors: {})",
            source.describe(),
            self.extractors.names().join(", ")
        );
        match source.fetch().await {
            Ok(snapshot) => Ok(self.extract(&snapshot, source.origin(), None)),
            Err(err) if self.config.strict_source => {
                log::error!("source unavailable ({}): {err}", err.kind());
                Err(SyncError::SourceUnavailable(err))
            }
            Err(err) => {
                log::warn!(
                    "source unavailable ({}): {err}; DEGRADED run using the built-in mock document",
                    err.kind()
                );
                let reason = DegradedReason {
                    kind: err.kind(),
                    message: err.to_string(),
                };
                Ok(self.extract(&mock_snapshot(), SourceOrigin::Mock, Some(reason)))
            }
        }
    }

    /// Walk a snapshot into a token set. Variables are applied after the
    /// walk, so they win key collisions.
    pub fn extract(
        &self,
        snapshot: &SourceSnapshot,
        origin: SourceOrigin,
        degraded: Option<DegradedReason>,
    ) -> SyncOutcome {
        let keys = self.config.key_style;
        let mut walk = walk_document(&snapshot.document, &self.extractors, keys);
        if let Some(variables) = &snapshot.variables {
            for (id, contribution) in extract_variables(variables, keys) {
                walk.absorb(&id, contribution);
            }
        }

        let diagnostics = lint_walk(&walk);
        for diag in &diagnostics {
            match diag.severity {
                LintSeverity::Warning => log::warn!("{diag}"),
                LintSeverity::Info => log::debug!("{diag}"),
            }
        }

        let walk_stats = walk.stats;
        let tokens = walk.into_tokens();
        let stats = tokens.stats();
        log::info!(
            "extracted {stats} from `{}` ({} nodes visited)",
            snapshot.document.name,
            walk_stats.visited
        );

        SyncOutcome {
            tokens,
            stats,
            origin,
            degraded,
            diagnostics,
            walk: walk_stats,
        }
    }

    /// Run, render, write and publish. Only rendering and writing failures
    /// (and source failures in strict mode) abort the sync.
    pub async fn sync(&self, source: &dyn SourceProvider) -> SyncResult<SyncReport> {
        let outcome = self.run(source).await?;
        let artifacts = render_artifacts(&outcome.tokens, &self.config.artifacts)?;

        let dir = self.config.out_dir.clone();
        let write =
            tokio::task::spawn_blocking(move || write_artifacts(&artifacts, &dir)).await??;
        log::info!(
            "artifacts in {}: {} written, {} unchanged",
            write.dir.display(),
            write.written.len(),
            write.unchanged.len()
        );

        if let Some(notifier) = &self.notifier {
            notifier.publish(&TokensUpdated::new(
                outcome.tokens.clone(),
                outcome.is_degraded(),
            ));
        }

        Ok(SyncReport { outcome, write })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::notify::BroadcastNotifier;
    use async_trait::async_trait;
    use ds_core::model::{
        LocalVariables, Node, NodeKind, Rgba, SourceDocument, Variable, VariableType,
        VariableValue, VariablesMeta,
    };
    use std::collections::BTreeMap;

    struct FailingSource;

    #[async_trait]
    impl SourceProvider for FailingSource {
        fn origin(&self) -> SourceOrigin {
            SourceOrigin::Remote
        }
        fn describe(&self) -> String {
            "failing".into()
        }
        async fn fetch(&self) -> Result<SourceSnapshot, SourceError> {
            Err(SourceError::Auth(403))
        }
    }

    struct StaticSource(SourceSnapshot);

    #[async_trait]
    impl SourceProvider for StaticSource {
        fn origin(&self) -> SourceOrigin {
            SourceOrigin::Remote
        }
        fn describe(&self) -> String {
            "static".into()
        }
        async fn fetch(&self) -> Result<SourceSnapshot, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn config(dir: &std::path::Path) -> SyncConfig {
        SyncConfig {
            out_dir: dir.to_path_buf(),
            ..SyncConfig::default()
        }
    }

    fn snapshot_with_variables() -> SourceSnapshot {
        let document = SourceDocument::with_pages(
            "vars",
            vec![Node::new("1:0", "Page", NodeKind::Canvas).with_children(vec![
                Node::new("1:1", "Primary", NodeKind::Rectangle).with_fill(Rgba::rgb(1.0, 0.0, 0.0)),
            ])],
        );
        let variable = Variable {
            name: "Primary".into(),
            resolved_type: VariableType::Color,
            values_by_mode: BTreeMap::from([(
                "1:0".to_string(),
                VariableValue::Color(Rgba::rgb(0.0, 0.0, 1.0)),
            )]),
        };
        SourceSnapshot {
            document,
            variables: Some(LocalVariables {
                meta: VariablesMeta {
                    variables: BTreeMap::from([("VariableID:1".to_string(), variable)]),
                },
            }),
        }
    }

    #[tokio::test]
    async fn auth_failure_falls_back_to_mock_and_is_degraded() {
        let pipeline = Pipeline::new(SyncConfig::default());
        let outcome = pipeline.run(&FailingSource).await.unwrap();
        assert!(outcome.is_degraded());
        assert_eq!(outcome.origin, SourceOrigin::Mock);
        assert_eq!(outcome.degraded.as_ref().unwrap().kind, "auth");
        assert!(!outcome.tokens.is_empty());
        assert!(outcome.stats.colors > 0);
    }

    #[tokio::test]
    async fn strict_mode_surfaces_source_failure() {
        let pipeline = Pipeline::new(SyncConfig {
            strict_source: true,
            ..SyncConfig::default()
        });
        let err = pipeline.run(&FailingSource).await.unwrap_err();
        assert!(matches!(err, SyncError::SourceUnavailable(SourceError::Auth(403))));
    }

    #[tokio::test]
    async fn variables_win_over_document_nodes() {
        let pipeline = Pipeline::new(SyncConfig::default());
        let outcome = pipeline
            .run(&StaticSource(snapshot_with_variables()))
            .await
            .unwrap();
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.tokens.colors["primary"], "#0000ff");
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].rule, "name-collision");
        assert_eq!(outcome.diagnostics[0].node_id, "VariableID:1");
    }

    #[tokio::test]
    async fn subset_of_extractors() {
        let pipeline = Pipeline::new(SyncConfig::default())
            .with_extractors(ExtractorSet::empty().with(ds_core::extract::TypographyExtractor));
        let outcome = pipeline.run(&crate::source::MockSource).await.unwrap();
        assert!(outcome.tokens.colors.is_empty());
        assert_eq!(outcome.stats.typography, 3);
        assert_eq!(pipeline.extractors.names(), vec!["typography"]);
    }

    #[tokio::test]
    async fn sync_writes_and_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = BroadcastNotifier::new(4);
        let mut rx = notifier.subscribe();
        let pipeline = Pipeline::new(config(dir.path())).with_notifier(Arc::new(notifier));

        let report = pipeline.sync(&FailingSource).await.unwrap();
        assert_eq!(report.write.written.len(), 6);
        assert!(dir.path().join("index.js").exists());

        let event = rx.recv().await.unwrap();
        assert!(event.degraded);
        assert_eq!(event.summary_counts, report.outcome.stats);

        let again = pipeline.sync(&FailingSource).await.unwrap();
        assert!(again.write.written.is_empty());
        assert_eq!(again.write.unchanged.len(), 6);
    }

    #[tokio::test]
    async fn write_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let pipeline = Pipeline::new(config(&blocker));
        let err = pipeline.sync(&crate::source::MockSource).await.unwrap_err();
        assert!(matches!(err, SyncError::Write(_)));
    }
}
