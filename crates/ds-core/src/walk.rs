//! Tree walker: visits every node once and feeds registered extractors.
//!
//! Traversal is depth-first pre-order over an explicit stack, so arbitrarily
//! deep documents never overflow the call stack. Pages are visited in
//! document order and children in their given order; that order is the
//! collision-resolution order (last extracted wins).

use crate::extract::{
    ColorExtractor, ComponentExtractor, Malformed, SpacingExtractor, TypographyExtractor,
};
use crate::model::{Node, SourceDocument};
use crate::name::KeyStyle;
use crate::tokens::{Contribution, TokenCategory, TokenSet};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Extractor seam ──────────────────────────────────────────────────────

/// Contributions produced by one extractor for one node.
pub type Contributions = SmallVec<[Contribution; 4]>;

/// A per-node token extractor. Implementations are pure: they look at one
/// node and return zero or more contributions, or report why the node is
/// unusable for them.
pub trait Extractor: Send + Sync {
    /// Short stable name used in diagnostics.
    fn name(&self) -> &'static str;

    fn extract(&self, node: &Node, keys: KeyStyle) -> Result<Contributions, Malformed>;
}

/// An ordered set of extractors run against every node.
pub struct ExtractorSet {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorSet {
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Colors, spacing, typography and components, in that order.
    pub fn standard() -> Self {
        Self::empty()
            .with(ColorExtractor)
            .with(SpacingExtractor)
            .with(TypographyExtractor)
            .with(ComponentExtractor)
    }

    #[must_use]
    pub fn with(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Extractor names in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self::standard()
    }
}

// ─── Traversal ───────────────────────────────────────────────────────────

/// Pre-order iterator over a document's pages and all their descendants.
pub struct Preorder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Preorder<'a> {
    pub fn new(roots: &'a [Node]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Iterate every node below the document root (pages included).
pub fn nodes(document: &SourceDocument) -> Preorder<'_> {
    Preorder::new(document.pages())
}

// ─── Walk output ─────────────────────────────────────────────────────────

/// Two contributions landed on the same key; the later one was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub category: TokenCategory,
    pub key: String,
    /// Origin (node id or variable id) of the replaced entry.
    pub replaced: String,
    /// Origin of the entry that was kept.
    pub kept: String,
}

/// A node an extractor had to skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedNode {
    pub node_id: String,
    pub node_name: String,
    pub extractor: &'static str,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub pages: usize,
    pub visited: usize,
    pub contributions: usize,
}

/// Everything one walk produced.
#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    pub tokens: TokenSet,
    pub stats: WalkStats,
    pub collisions: Vec<Collision>,
    pub malformed: Vec<MalformedNode>,
    owners: HashMap<(TokenCategory, String), String>,
}

impl WalkOutput {
    /// Apply a contribution originating from `origin`, recording a
    /// collision when it replaces an existing entry.
    pub fn absorb(&mut self, origin: &str, contribution: Contribution) {
        let slot = (contribution.category(), contribution.key().to_string());
        self.stats.contributions += 1;
        if self.tokens.apply(contribution) {
            let replaced = self.owners.get(&slot).cloned().unwrap_or_default();
            log::trace!(
                "{} key `{}` from {replaced} replaced by {origin}",
                slot.0,
                slot.1
            );
            self.collisions.push(Collision {
                category: slot.0,
                key: slot.1.clone(),
                replaced,
                kept: origin.to_string(),
            });
        }
        self.owners.insert(slot, origin.to_string());
    }

    pub fn into_tokens(self) -> TokenSet {
        self.tokens
    }
}

/// Walk every page of `document`, running each extractor on each node.
pub fn walk_document(
    document: &SourceDocument,
    extractors: &ExtractorSet,
    keys: KeyStyle,
) -> WalkOutput {
    let mut out = WalkOutput {
        stats: WalkStats {
            pages: document.pages().len(),
            ..WalkStats::default()
        },
        ..WalkOutput::default()
    };

    for node in nodes(document) {
        out.stats.visited += 1;
        for extractor in &extractors.extractors {
            match extractor.extract(node, keys) {
                Ok(contributions) => {
                    for contribution in contributions {
                        out.absorb(&node.id, contribution);
                    }
                }
                Err(Malformed { reason }) => {
                    log::debug!(
                        "{} skipped node {} ({:?}): {reason}",
                        extractor.name(),
                        node.id,
                        node.name
                    );
                    out.malformed.push(MalformedNode {
                        node_id: node.id.clone(),
                        node_name: node.name.clone(),
                        extractor: extractor.name(),
                        reason,
                    });
                }
            }
        }
    }

    out
}
