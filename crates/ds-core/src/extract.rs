//! Per-node extractors for the four token categories, plus the variable
//! extractor applied after the document walk.

use crate::classify::classify_component;
use crate::coerce::{color_to_css, is_common_size, px};
use crate::model::{Effect, LocalVariables, Node, Rgba, VariableType, VariableValue};
use crate::name::{KeyStyle, suffixed_key, token_key};
use crate::tokens::{ComponentStyles, ComponentToken, Contribution, TypographyToken};
use crate::walk::{Contributions, Extractor};
use smallvec::smallvec;

/// Why an extractor skipped a node it would otherwise have used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Malformed {
    pub reason: &'static str,
}

impl Malformed {
    pub const NO_NAME: Malformed = Malformed {
        reason: "no usable name",
    };
    pub const TEXT_WITHOUT_STYLE: Malformed = Malformed {
        reason: "text node without a style descriptor",
    };
    pub const NO_FONT_FAMILY: Malformed = Malformed {
        reason: "text style without a font family",
    };
}

/// Shadow color used when a drop shadow carries none.
pub const DEFAULT_SHADOW_COLOR: Rgba = Rgba::rgba(0.0, 0.0, 0.0, 0.1);

// ─── Spacing suffixes ────────────────────────────────────────────────────

/// The suffixes a spacing key may carry. The stylesheet dispatches utility
/// rules on the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingSuffix {
    Width,
    Height,
    PaddingX,
    PaddingY,
    Gap,
    Radius,
}

impl SpacingSuffix {
    pub const ALL: [SpacingSuffix; 6] = [
        SpacingSuffix::Width,
        SpacingSuffix::Height,
        SpacingSuffix::PaddingX,
        SpacingSuffix::PaddingY,
        SpacingSuffix::Gap,
        SpacingSuffix::Radius,
    ];

    fn camel(self) -> &'static str {
        match self {
            SpacingSuffix::Width => "Width",
            SpacingSuffix::Height => "Height",
            SpacingSuffix::PaddingX => "PaddingX",
            SpacingSuffix::PaddingY => "PaddingY",
            SpacingSuffix::Gap => "Gap",
            SpacingSuffix::Radius => "Radius",
        }
    }

    fn snake(self) -> &'static str {
        match self {
            SpacingSuffix::Width => "_width",
            SpacingSuffix::Height => "_height",
            SpacingSuffix::PaddingX => "_padding_x",
            SpacingSuffix::PaddingY => "_padding_y",
            SpacingSuffix::Gap => "_gap",
            SpacingSuffix::Radius => "_radius",
        }
    }

    /// Append this suffix to a rendered base key, shortening the base so
    /// the key stays within the identifier cap.
    pub fn append(self, base: &str, style: KeyStyle) -> String {
        match style {
            KeyStyle::Camel => suffixed_key(base, self.camel()),
            KeyStyle::Snake => suffixed_key(base, self.snake()),
        }
    }

    /// Recognize the suffix of a spacing key in either key style.
    pub fn of(key: &str) -> Option<SpacingSuffix> {
        Self::split(key).map(|(suffix, _)| suffix)
    }

    /// Split a spacing key into its suffix and the base key before it.
    pub fn split(key: &str) -> Option<(SpacingSuffix, &str)> {
        Self::ALL.into_iter().find_map(|s| {
            key.strip_suffix(s.camel())
                .or_else(|| key.strip_suffix(s.snake()))
                .filter(|base| !base.is_empty())
                .map(|base| (s, base))
        })
    }
}

// ─── Colors ──────────────────────────────────────────────────────────────

/// One color per solid fill, keyed by the node name. When a node has more
/// than one fill, fill `i > 0` gets a `_{i+1}` suffix.
pub struct ColorExtractor;

impl Extractor for ColorExtractor {
    fn name(&self) -> &'static str {
        "colors"
    }

    fn extract(&self, node: &Node, keys: KeyStyle) -> Result<Contributions, Malformed> {
        let mut solids = node.solid_fills().peekable();
        if solids.peek().is_none() {
            return Ok(Contributions::new());
        }
        let base = token_key(&node.name, keys).ok_or(Malformed::NO_NAME)?;
        let multiple = node.fills.len() > 1;

        Ok(solids
            .map(|(index, color)| {
                let key = if multiple && index > 0 {
                    suffixed_key(&base, &format!("_{}", index + 1))
                } else {
                    base.clone()
                };
                Contribution::Color(key, color_to_css(Some(color)))
            })
            .collect())
    }
}

// ─── Spacing ─────────────────────────────────────────────────────────────

/// Geometry and auto-layout metrics of frames and components.
pub struct SpacingExtractor;

impl SpacingExtractor {
    fn measurements(node: &Node) -> Vec<(SpacingSuffix, f64)> {
        let positive = |v: Option<f64>| v.filter(|v| *v > 0.0);
        let mut out = Vec::with_capacity(6);

        if let Some(width) = node.width().filter(|w| *w > 0.0 && is_common_size(*w)) {
            out.push((SpacingSuffix::Width, width.round()));
        }
        if let Some(height) = node.height().filter(|h| *h > 0.0 && is_common_size(*h)) {
            out.push((SpacingSuffix::Height, height.round()));
        }
        if let Some(pad) = positive(node.padding_left) {
            out.push((SpacingSuffix::PaddingX, pad));
        }
        if let Some(pad) = positive(node.padding_top) {
            out.push((SpacingSuffix::PaddingY, pad));
        }
        if let Some(gap) = positive(node.item_spacing) {
            out.push((SpacingSuffix::Gap, gap));
        }
        if let Some(radius) = positive(node.corner_radius) {
            out.push((SpacingSuffix::Radius, radius));
        }
        out
    }
}

impl Extractor for SpacingExtractor {
    fn name(&self) -> &'static str {
        "spacing"
    }

    fn extract(&self, node: &Node, keys: KeyStyle) -> Result<Contributions, Malformed> {
        if !node.kind.carries_layout() {
            return Ok(Contributions::new());
        }
        let measurements = Self::measurements(node);
        if measurements.is_empty() {
            return Ok(Contributions::new());
        }
        let base = token_key(&node.name, keys).ok_or(Malformed::NO_NAME)?;

        Ok(measurements
            .into_iter()
            .map(|(suffix, value)| Contribution::Spacing(suffix.append(&base, keys), px(value)))
            .collect())
    }
}

// ─── Typography ──────────────────────────────────────────────────────────

/// One text style per text leaf.
pub struct TypographyExtractor;

impl Extractor for TypographyExtractor {
    fn name(&self) -> &'static str {
        "typography"
    }

    fn extract(&self, node: &Node, keys: KeyStyle) -> Result<Contributions, Malformed> {
        if !node.kind.is_text() {
            return Ok(Contributions::new());
        }
        let style = node.style.as_ref().ok_or(Malformed::TEXT_WITHOUT_STYLE)?;
        let font_family = style
            .font_family
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .ok_or(Malformed::NO_FONT_FAMILY)?;
        let key = token_key(&node.name, keys).ok_or(Malformed::NO_NAME)?;

        let token = TypographyToken {
            font_family: font_family.to_string(),
            font_size: style.font_size.map_or_else(|| "16px".to_string(), px),
            font_weight: style.font_weight.clone().unwrap_or_default(),
            line_height: style
                .line_height_px
                .map_or_else(|| "normal".to_string(), px),
            letter_spacing: style
                .letter_spacing
                .filter(|ls| *ls != 0.0)
                .map_or_else(|| "normal".to_string(), px),
        };
        Ok(smallvec![Contribution::Typography(key, token)])
    }
}

// ─── Components ──────────────────────────────────────────────────────────

/// One descriptor per named component.
pub struct ComponentExtractor;

impl Extractor for ComponentExtractor {
    fn name(&self) -> &'static str {
        "components"
    }

    fn extract(&self, node: &Node, keys: KeyStyle) -> Result<Contributions, Malformed> {
        if !node.kind.is_component() {
            return Ok(Contributions::new());
        }
        let key = token_key(&node.name, keys).ok_or(Malformed::NO_NAME)?;

        let token = ComponentToken {
            id: node.id.clone(),
            display_name: node.name.clone(),
            category: classify_component(&node.name, node.kind),
            width: node.width(),
            height: node.height(),
            corner_radius: node.corner_radius.filter(|r| *r > 0.0),
            opacity: node.opacity.filter(|o| *o != 1.0),
            styles: derive_styles(node),
        };
        Ok(smallvec![Contribution::Component(key, token)])
    }
}

/// CSS properties derivable from a node's paints, radius and effects.
pub fn derive_styles(node: &Node) -> ComponentStyles {
    let background_color = node.solid_fills().next().map(|(_, c)| color_to_css(Some(c)));

    let stroke = node.strokes.iter().find_map(|p| p.solid_color());
    let border_color = stroke.map(|c| color_to_css(Some(c)));
    let border_width = stroke.map(|_| px(node.stroke_weight.unwrap_or(1.0)));

    let border_radius = node.corner_radius.filter(|r| *r > 0.0).map(px);

    let shadows: Vec<String> = node
        .effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::DropShadow {
                offset,
                radius,
                color,
            } => {
                let offset = offset.unwrap_or_default();
                let color = color.unwrap_or(DEFAULT_SHADOW_COLOR);
                Some(format!(
                    "{} {} {} {}",
                    px(offset.x),
                    px(offset.y),
                    px(radius.unwrap_or(0.0)),
                    color_to_css(Some(&color))
                ))
            }
            Effect::Other => None,
        })
        .collect();
    let box_shadow = (!shadows.is_empty()).then(|| shadows.join(", "));

    ComponentStyles {
        background_color,
        border_color,
        border_width,
        border_radius,
        box_shadow,
    }
}

// ─── Variables ───────────────────────────────────────────────────────────

const SPACING_KEYWORDS: &[&str] = &[
    "spacing", "gap", "margin", "padding", "size", "width", "height", "radius",
];

/// Keywords whose values are kept regardless of magnitude.
const UNGATED_KEYWORDS: &[&str] = &["padding", "gap", "radius"];

/// Contributions from the file's local variables, each paired with its
/// variable id. Only the first mode is read; aliases are skipped.
pub fn extract_variables(variables: &LocalVariables, keys: KeyStyle) -> Vec<(String, Contribution)> {
    let mut out = Vec::new();

    for (id, variable) in &variables.meta.variables {
        let display = variable.name.replace('/', " ");
        let Some(key) = token_key(&display, keys) else {
            log::debug!("variable {id} has no usable name");
            continue;
        };

        match (variable.resolved_type, variable.default_value()) {
            (VariableType::Color, Some(VariableValue::Color(color))) => {
                out.push((id.clone(), Contribution::Color(key, color_to_css(Some(color)))));
            }
            (VariableType::Float, Some(VariableValue::Float(value))) => {
                let lowered = variable.name.to_lowercase();
                if !SPACING_KEYWORDS.iter().any(|k| lowered.contains(k)) {
                    continue;
                }
                let ungated = UNGATED_KEYWORDS.iter().any(|k| lowered.contains(k));
                if ungated || is_common_size(*value) {
                    out.push((id.clone(), Contribution::Spacing(key, px(*value))));
                }
            }
            (_, Some(VariableValue::Alias(_))) => {
                log::debug!("variable {id} ({}) is an alias; skipped", variable.name);
            }
            _ => {}
        }
    }

    out
}
