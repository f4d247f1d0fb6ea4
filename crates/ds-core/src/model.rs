//! Source document data model.
//!
//! Mirrors the subset of the design tool's file JSON that the token
//! pipeline reads: a tree of nodes (pages → frames → components → leaves)
//! carrying paints, geometry, auto-layout metrics and text styles. Every
//! field except the node kind is optional on the wire. Absent, `null` or
//! wrongly typed values fall back to their defaults, so one odd node never
//! fails the whole document; extractors then skip what they cannot use.
//!
//! Nesting depth is unbounded: [`decode_json`] lifts the parser's recursion
//! limit and grows the stack on demand, and dropping a [`Node`] is
//! iterative.

use crate::coerce::serialize_compact;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DefaultOnError, serde_as};
use std::collections::BTreeMap;

/// Decode design-tool JSON without a nesting limit.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

// ─── Document ────────────────────────────────────────────────────────────

/// A complete source document as returned by `GET /v1/files/{key}`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub name: String,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub last_modified: Option<String>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub version: Option<String>,
    /// The `DOCUMENT` root. Its children are the pages.
    #[serde(default)]
    pub document: Node,
}

impl SourceDocument {
    /// Build a document from a list of pages.
    pub fn with_pages(name: &str, pages: Vec<Node>) -> Self {
        Self {
            name: name.to_string(),
            last_modified: None,
            version: None,
            document: Node::new("0:0", "Document", NodeKind::Document).with_children(pages),
        }
    }

    /// Top-level pages in document order.
    pub fn pages(&self) -> &[Node] {
        &self.document.children
    }
}

// ─── Colors & Paint ──────────────────────────────────────────────────────

/// RGBA color with 0–1 float channels. Alpha is optional on the wire;
/// the three color channels are not.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default)]
    pub a: Option<f64>,
}

impl Rgba {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: None }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Effective alpha: absent means fully opaque.
    pub fn alpha(&self) -> f64 {
        self.a.unwrap_or(1.0)
    }
}

/// Fill or stroke paint. Only solid paints carry a usable color; gradients,
/// images, anything newer and entries that fail to decode collapse into
/// `Other`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Paint {
    Solid {
        #[serde(default)]
        color: Option<Rgba>,
    },
    #[default]
    #[serde(other)]
    Other,
}

impl Paint {
    pub const fn solid(color: Rgba) -> Self {
        Paint::Solid { color: Some(color) }
    }

    /// The paint's color if it is a solid paint with a color attached.
    pub fn solid_color(&self) -> Option<&Rgba> {
        match self {
            Paint::Solid { color } => color.as_ref(),
            Paint::Other => None,
        }
    }
}

// ─── Effects ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Vector {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Node effect. Only drop shadows contribute to derived styles.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    DropShadow {
        #[serde(default)]
        offset: Option<Vector>,
        #[serde(default)]
        radius: Option<f64>,
        #[serde(default)]
        color: Option<Rgba>,
    },
    #[default]
    #[serde(other)]
    Other,
}

// ─── Geometry ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// ─── Text ────────────────────────────────────────────────────────────────

/// Font weight: numeric on the wire, but named weights are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(f64),
    Named(String),
}

impl Serialize for FontWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FontWeight::Numeric(n) => serialize_compact(*n, serializer),
            FontWeight::Named(name) => serializer.serialize_str(name),
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::Numeric(400.0)
    }
}

/// Text style descriptor, present only on text leaves.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub line_height_px: Option<f64>,
    pub letter_spacing: Option<f64>,
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// The node-kind tag (`type` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    /// A page.
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Text,
    Vector,
    Rectangle,
    Ellipse,
    Line,
    Star,
    RegularPolygon,
    BooleanOperation,
    Slice,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    /// Frame-like containers and named components carry layout metrics.
    pub fn carries_layout(self) -> bool {
        matches!(self, NodeKind::Frame | NodeKind::Component)
    }

    /// Exactly a named component (not a component set, not an instance).
    pub fn is_component(self) -> bool {
        self == NodeKind::Component
    }

    pub fn is_text(self) -> bool {
        self == NodeKind::Text
    }

    /// Vector geometry kinds that classify as icons.
    pub fn is_vector_like(self) -> bool {
        matches!(
            self,
            NodeKind::Vector
                | NodeKind::BooleanOperation
                | NodeKind::Star
                | NodeKind::RegularPolygon
                | NodeKind::Line
        )
    }
}

/// A single node in the source document tree.
///
/// Each field is decoded on its own: a value of the wrong type becomes the
/// field's default (a bad paint or effect entry becomes `Other`) instead of
/// failing the document.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub id: String,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub name: String,
    #[serde(rename = "type", default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub kind: NodeKind,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub absolute_bounding_box: Option<BoundingBox>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError<Vec<DefaultOnError>>")]
    pub fills: Vec<Paint>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError<Vec<DefaultOnError>>")]
    pub strokes: Vec<Paint>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub stroke_weight: Option<f64>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub opacity: Option<f64>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError<Vec<DefaultOnError>>")]
    pub effects: Vec<Effect>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub item_spacing: Option<f64>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub padding_left: Option<f64>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub padding_right: Option<f64>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub padding_top: Option<f64>,
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub padding_bottom: Option<f64>,
    /// A style that does not decode leaves the text node without one.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnError")]
    pub style: Option<TypeStyle>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Node>,
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl Node {
    pub fn new(id: &str, name: &str, kind: NodeKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            absolute_bounding_box: None,
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: None,
            corner_radius: None,
            opacity: None,
            effects: Vec::new(),
            item_spacing: None,
            padding_left: None,
            padding_right: None,
            padding_top: None,
            padding_bottom: None,
            style: None,
            children: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.absolute_bounding_box = Some(BoundingBox {
            x: 0.0,
            y: 0.0,
            width,
            height,
        });
        self
    }

    pub fn with_fill(mut self, color: Rgba) -> Self {
        self.fills.push(Paint::solid(color));
        self
    }

    pub fn with_stroke(mut self, color: Rgba, weight: f64) -> Self {
        self.strokes.push(Paint::solid(color));
        self.stroke_weight = Some(weight);
        self
    }

    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    pub fn with_layout(mut self, gap: f64, pad_x: f64, pad_y: f64) -> Self {
        self.item_spacing = Some(gap);
        self.padding_left = Some(pad_x);
        self.padding_right = Some(pad_x);
        self.padding_top = Some(pad_y);
        self.padding_bottom = Some(pad_y);
        self
    }

    pub fn with_shadow(mut self, x: f64, y: f64, radius: f64, color: Rgba) -> Self {
        self.effects.push(Effect::DropShadow {
            offset: Some(Vector { x, y }),
            radius: Some(radius),
            color: Some(color),
        });
        self
    }

    pub fn with_text_style(mut self, style: TypeStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Solid fill colors in fill order, paired with their index in `fills`.
    pub fn solid_fills(&self) -> impl Iterator<Item = (usize, &Rgba)> {
        self.fills
            .iter()
            .enumerate()
            .filter_map(|(i, paint)| paint.solid_color().map(|c| (i, c)))
    }

    pub fn width(&self) -> Option<f64> {
        self.absolute_bounding_box.map(|b| b.width)
    }

    pub fn height(&self) -> Option<f64> {
        self.absolute_bounding_box.map(|b| b.height)
    }
}

// ─── Local variables ─────────────────────────────────────────────────────

/// Response of `GET /v1/files/{key}/variables/local`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocalVariables {
    pub meta: VariablesMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VariablesMeta {
    /// Variable id → variable. Ordered so extraction is deterministic.
    #[serde(deserialize_with = "null_as_default")]
    pub variables: BTreeMap<String, Variable>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub resolved_type: VariableType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values_by_mode: BTreeMap<String, VariableValue>,
}

impl Variable {
    /// Value for the first mode (lowest mode id).
    pub fn default_value(&self) -> Option<&VariableValue> {
        self.values_by_mode.values().next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    Color,
    Float,
    String,
    Boolean,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A variable's value in one mode. Aliases to other variables are kept
/// opaque and never resolved.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Color(Rgba),
    Float(f64),
    Boolean(bool),
    Text(String),
    Alias(serde_json::Value),
}

// ─── Serde helpers ───────────────────────────────────────────────────────

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
