//! Component classification by an ordered name-pattern rule table.

use crate::model::NodeKind;
use serde::Serialize;
use std::fmt;

/// The fixed component taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Button,
    Input,
    Card,
    Modal,
    Navigation,
    Icon,
    Other,
}

impl ComponentCategory {
    pub const ALL: [ComponentCategory; 7] = [
        ComponentCategory::Button,
        ComponentCategory::Input,
        ComponentCategory::Card,
        ComponentCategory::Modal,
        ComponentCategory::Navigation,
        ComponentCategory::Icon,
        ComponentCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentCategory::Button => "button",
            ComponentCategory::Input => "input",
            ComponentCategory::Card => "card",
            ComponentCategory::Modal => "modal",
            ComponentCategory::Navigation => "navigation",
            ComponentCategory::Icon => "icon",
            ComponentCategory::Other => "other",
        }
    }

    /// Group name used by the generated `componentsByType` map.
    pub fn group_name(self) -> &'static str {
        match self {
            ComponentCategory::Button => "buttons",
            ComponentCategory::Input => "inputs",
            ComponentCategory::Card => "cards",
            ComponentCategory::Modal => "modals",
            ComponentCategory::Navigation => "navigation",
            ComponentCategory::Icon => "icons",
            ComponentCategory::Other => "other",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the classification table. A rule matches when the lowercased
/// display name contains any of `patterns`, or when `kind` accepts the
/// node kind.
pub struct CategoryRule {
    pub category: ComponentCategory,
    pub patterns: &'static [&'static str],
    pub kind: Option<fn(NodeKind) -> bool>,
}

impl CategoryRule {
    fn matches(&self, lowered_name: &str, kind: NodeKind) -> bool {
        self.patterns.iter().any(|p| lowered_name.contains(p))
            || self.kind.is_some_and(|accepts| accepts(kind))
    }
}

/// Evaluated top to bottom; the first matching rule wins.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: ComponentCategory::Button,
        patterns: &["button", "btn"],
        kind: None,
    },
    CategoryRule {
        category: ComponentCategory::Input,
        patterns: &["input", "field", "textbox"],
        kind: None,
    },
    CategoryRule {
        category: ComponentCategory::Card,
        patterns: &["card", "item"],
        kind: None,
    },
    CategoryRule {
        category: ComponentCategory::Modal,
        patterns: &["modal", "dialog", "popup"],
        kind: None,
    },
    CategoryRule {
        category: ComponentCategory::Navigation,
        patterns: &["nav", "menu", "header"],
        kind: None,
    },
    CategoryRule {
        category: ComponentCategory::Icon,
        patterns: &["icon"],
        kind: Some(NodeKind::is_vector_like),
    },
];

/// Classify a component by display name (case-insensitive) and node kind.
pub fn classify_component(display_name: &str, kind: NodeKind) -> ComponentCategory {
    let lowered = display_name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.matches(&lowered, kind))
        .map_or(ComponentCategory::Other, |rule| rule.category)
}
