//! Quick structural summary of a source document.

use crate::coerce::color_to_css;
use crate::model::SourceDocument;
use crate::walk::nodes;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    pub name: String,
    pub last_modified: Option<String>,
    pub pages: usize,
    pub nodes: usize,
    pub components: usize,
    /// Distinct CSS colors across all solid fills.
    pub unique_colors: BTreeSet<String>,
}

impl DocumentSummary {
    pub fn of(document: &SourceDocument) -> Self {
        let mut summary = DocumentSummary {
            name: document.name.clone(),
            last_modified: document.last_modified.clone(),
            pages: document.pages().len(),
            ..Self::default()
        };
        for node in nodes(document) {
            summary.nodes += 1;
            if node.kind.is_component() {
                summary.components += 1;
            }
            summary
                .unique_colors
                .extend(node.solid_fills().map(|(_, c)| color_to_css(Some(c))));
        }
        summary
    }
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}`: {} pages, {} nodes, {} components, {} unique colors",
            self.name,
            self.pages,
            self.nodes,
            self.components,
            self.unique_colors.len()
        )
    }
}
