//! Lint diagnostics for a completed walk.
//!
//! Reports naming collisions and skipped nodes without touching the token
//! set. The orchestrator logs these after every run.

use crate::walk::WalkOutput;
use std::fmt;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Should be fixed in the source document.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic for a source node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
    /// The node (or variable) this diagnostic refers to.
    pub node_id: String,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "name-collision", "malformed-node").
    pub rule: &'static str,
}

impl fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.rule, self.node_id, self.message)
    }
}

// ─── Public API ──────────────────────────────────────────────────────────

/// Run all lint rules over a walk's output.
#[must_use]
pub fn lint_walk(walk: &WalkOutput) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_collisions(walk, &mut diags);
    lint_malformed(walk, &mut diags);
    diags
}

// ─── Rules ───────────────────────────────────────────────────────────────

/// Warn when two sources normalized to the same key in one category.
fn lint_collisions(walk: &WalkOutput, diags: &mut Vec<LintDiagnostic>) {
    for c in &walk.collisions {
        diags.push(LintDiagnostic {
            node_id: c.kept.clone(),
            message: format!(
                "{} key `{}` replaces the entry from `{}`; rename one of them in the source.",
                c.category, c.key, c.replaced
            ),
            severity: LintSeverity::Warning,
            rule: "name-collision",
        });
    }
}

/// Report nodes an extractor had to skip.
fn lint_malformed(walk: &WalkOutput, diags: &mut Vec<LintDiagnostic>) {
    for m in &walk.malformed {
        diags.push(LintDiagnostic {
            node_id: m.node_id.clone(),
            message: format!("`{}` skipped by {}: {}", m.node_name, m.extractor, m.reason),
            severity: LintSeverity::Info,
            rule: "malformed-node",
        });
    }
}
