//! The Token Set: four category maps produced by one pipeline run.
//!
//! Maps are `BTreeMap`s so iteration, serialization and therefore every
//! generated artifact are ordered by key regardless of traversal order.

use crate::classify::ComponentCategory;
use crate::coerce::serialize_compact_opt;
use crate::model::FontWeight;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ─── Token values ────────────────────────────────────────────────────────

/// A text style record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyToken {
    pub font_family: String,
    pub font_size: String,
    pub font_weight: FontWeight,
    pub line_height: String,
    pub letter_spacing: String,
}

/// CSS properties derived from a component's paints, radius and effects.
/// Each property is present only when derivable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStyles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
}

impl ComponentStyles {
    /// `(css-property, value)` pairs in a fixed order.
    pub fn css_properties(&self) -> Vec<(&'static str, &str)> {
        [
            ("background-color", &self.background_color),
            ("border-color", &self.border_color),
            ("border-width", &self.border_width),
            ("border-radius", &self.border_radius),
            ("box-shadow", &self.box_shadow),
        ]
        .into_iter()
        .filter_map(|(prop, value)| value.as_deref().map(|v| (prop, v)))
        .collect()
    }
}

/// A component descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentToken {
    pub id: String,
    pub display_name: String,
    pub category: ComponentCategory,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_compact_opt"
    )]
    pub width: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_compact_opt"
    )]
    pub height: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_compact_opt"
    )]
    pub corner_radius: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_compact_opt"
    )]
    pub opacity: Option<f64>,
    pub styles: ComponentStyles,
}

// ─── Categories & contributions ──────────────────────────────────────────

/// The four token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    Colors,
    Spacing,
    Typography,
    Components,
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenCategory::Colors => "colors",
            TokenCategory::Spacing => "spacing",
            TokenCategory::Typography => "typography",
            TokenCategory::Components => "components",
        })
    }
}

/// One `(key, value)` entry contributed by an extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum Contribution {
    Color(String, String),
    Spacing(String, String),
    Typography(String, TypographyToken),
    Component(String, ComponentToken),
}

impl Contribution {
    pub fn category(&self) -> TokenCategory {
        match self {
            Contribution::Color(..) => TokenCategory::Colors,
            Contribution::Spacing(..) => TokenCategory::Spacing,
            Contribution::Typography(..) => TokenCategory::Typography,
            Contribution::Component(..) => TokenCategory::Components,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Contribution::Color(k, _)
            | Contribution::Spacing(k, _)
            | Contribution::Typography(k, _)
            | Contribution::Component(k, _) => k,
        }
    }
}

// ─── Token set ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenSet {
    pub colors: BTreeMap<String, String>,
    pub spacing: BTreeMap<String, String>,
    pub typography: BTreeMap<String, TypographyToken>,
    pub components: BTreeMap<String, ComponentToken>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a contribution, replacing any previous entry under the same
    /// key. Returns `true` when an entry was replaced.
    pub fn apply(&mut self, contribution: Contribution) -> bool {
        match contribution {
            Contribution::Color(k, v) => self.colors.insert(k, v).is_some(),
            Contribution::Spacing(k, v) => self.spacing.insert(k, v).is_some(),
            Contribution::Typography(k, v) => self.typography.insert(k, v).is_some(),
            Contribution::Component(k, v) => self.components.insert(k, v).is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.spacing.is_empty()
            && self.typography.is_empty()
            && self.components.is_empty()
    }

    /// Components grouped by category, every category present.
    pub fn components_by_category(
        &self,
    ) -> BTreeMap<ComponentCategory, BTreeMap<&str, &ComponentToken>> {
        let mut groups: BTreeMap<ComponentCategory, BTreeMap<&str, &ComponentToken>> =
            ComponentCategory::ALL
                .iter()
                .map(|c| (*c, BTreeMap::new()))
                .collect();
        for (key, component) in &self.components {
            groups
                .entry(component.category)
                .or_default()
                .insert(key.as_str(), component);
        }
        groups
    }

    pub fn stats(&self) -> TokenStats {
        TokenStats {
            colors: self.colors.len(),
            spacing: self.spacing.len(),
            typography: self.typography.len(),
            components: self.components.len(),
            components_by_category: self
                .components_by_category()
                .into_iter()
                .map(|(category, members)| (category, members.len()))
                .collect(),
        }
    }
}

/// Per-category counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    pub colors: usize,
    pub spacing: usize,
    pub typography: usize,
    pub components: usize,
    pub components_by_category: BTreeMap<ComponentCategory, usize>,
}

impl TokenStats {
    pub fn total(&self) -> usize {
        self.colors + self.spacing + self.typography + self.components
    }
}

impl fmt::Display for TokenStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} colors, {} spacing, {} typography, {} components",
            self.colors, self.spacing, self.typography, self.components
        )
    }
}
