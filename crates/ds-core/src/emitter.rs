//! Emitter: Token Set → generated artifacts.
//!
//! Rendering is pure and deterministic: maps are walked in key order and no
//! run-varying content (timestamps, counters) is written, so an unchanged
//! token set always renders to the same bytes. Artifacts come back in
//! dependency order: the four category modules, the stylesheet, and the
//! index module that imports the others last.

use crate::classify::ComponentCategory;
use crate::coerce::{format_num, px};
use crate::extract::SpacingSuffix;
use crate::model::FontWeight;
use crate::tokens::{TokenSet, TypographyToken};
use serde::Serialize;
use std::fmt::Write;

// ─── Configuration ───────────────────────────────────────────────────────

/// Naming of the generated files and their exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactConfig {
    /// Prefix for exports (`mepColors`), CSS variables (`--mep-color-*`)
    /// and classes (`.mep-bg-*`). Must be a lowercase ASCII identifier.
    pub prefix: String,
    /// Extension of the generated code modules.
    pub extension: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            prefix: "mep".to_string(),
            extension: "js".to_string(),
        }
    }
}

impl ArtifactConfig {
    pub fn file_name(&self, kind: ArtifactKind) -> String {
        match kind {
            ArtifactKind::Stylesheet => format!("{}-design-system.css", self.prefix),
            other => format!("{}.{}", other.stem(), self.extension),
        }
    }

    /// Export name of a category module: `mep` + `Colors` → `mepColors`.
    pub fn export_name(&self, kind: ArtifactKind) -> String {
        let stem = kind.stem();
        let mut chars = stem.chars();
        let capitalized: String = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .into_iter()
            .chain(chars)
            .collect();
        format!("{}{capitalized}", self.prefix)
    }
}

// ─── Artifacts ───────────────────────────────────────────────────────────

/// The fixed artifact layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Colors,
    Spacing,
    Typography,
    Components,
    Stylesheet,
    Index,
}

impl ArtifactKind {
    /// Dependency order: leaves first, the aggregating index last.
    pub const ORDER: [ArtifactKind; 6] = [
        ArtifactKind::Colors,
        ArtifactKind::Spacing,
        ArtifactKind::Typography,
        ArtifactKind::Components,
        ArtifactKind::Stylesheet,
        ArtifactKind::Index,
    ];

    fn stem(self) -> &'static str {
        match self {
            ArtifactKind::Colors => "colors",
            ArtifactKind::Spacing => "spacing",
            ArtifactKind::Typography => "typography",
            ArtifactKind::Components => "components",
            ArtifactKind::Stylesheet => "design-system",
            ArtifactKind::Index => "index",
        }
    }
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub contents: String,
}

/// Render every artifact for `tokens`, in dependency order.
pub fn render_artifacts(
    tokens: &TokenSet,
    config: &ArtifactConfig,
) -> serde_json::Result<Vec<Artifact>> {
    ArtifactKind::ORDER
        .into_iter()
        .map(|kind| {
            let contents = match kind {
                ArtifactKind::Colors => emit_module(config, kind, "colors", &tokens.colors)?,
                ArtifactKind::Spacing => emit_module(config, kind, "spacing", &tokens.spacing)?,
                ArtifactKind::Typography => {
                    emit_module(config, kind, "typography", &tokens.typography)?
                }
                ArtifactKind::Components => emit_components_module(config, tokens)?,
                ArtifactKind::Stylesheet => emit_stylesheet(config, tokens),
                ArtifactKind::Index => emit_index(config),
            };
            Ok(Artifact {
                kind,
                file_name: config.file_name(kind),
                contents,
            })
        })
        .collect()
}

// ─── Category modules ────────────────────────────────────────────────────

fn emit_module<T: Serialize>(
    config: &ArtifactConfig,
    kind: ArtifactKind,
    label: &str,
    map: &T,
) -> serde_json::Result<String> {
    let name = config.export_name(kind);
    let mut out = String::with_capacity(512);
    let _ = writeln!(out, "// Generated design tokens: {label}. Do not edit by hand.");
    out.push('\n');
    let _ = writeln!(out, "export const {name} = {};", serde_json::to_string_pretty(map)?);
    out.push('\n');
    let _ = writeln!(out, "export default {name};");
    Ok(out)
}

fn emit_components_module(config: &ArtifactConfig, tokens: &TokenSet) -> serde_json::Result<String> {
    let name = config.export_name(ArtifactKind::Components);
    let mut out = String::with_capacity(1024);
    out.push_str("// Generated design tokens: components. Do not edit by hand.\n\n");
    let _ = writeln!(
        out,
        "export const {name} = {};",
        serde_json::to_string_pretty(&tokens.components)?
    );
    out.push('\n');
    out.push_str("const byCategory = (category) =>\n");
    let _ = writeln!(
        out,
        "  Object.fromEntries(Object.entries({name}).filter(([, c]) => c.category === category));"
    );
    out.push('\n');
    out.push_str("export const componentsByType = {\n");
    for category in ComponentCategory::ALL {
        let _ = writeln!(
            out,
            "  {}: byCategory('{}'),",
            category.group_name(),
            category.as_str()
        );
    }
    out.push_str("};\n\n");
    let _ = writeln!(out, "export default {name};");
    Ok(out)
}

// ─── Stylesheet ──────────────────────────────────────────────────────────

fn emit_stylesheet(config: &ArtifactConfig, tokens: &TokenSet) -> String {
    let p = &config.prefix;
    let mut out = String::with_capacity(4096);
    out.push_str("/* Generated design system stylesheet. Do not edit by hand. */\n\n");

    out.push_str(":root {\n");
    for (key, value) in &tokens.colors {
        let _ = writeln!(out, "  --{p}-color-{key}: {value};");
    }
    for (key, value) in &tokens.spacing {
        let _ = writeln!(out, "  --{p}-spacing-{key}: {value};");
    }
    out.push_str("}\n");

    out.push_str("\n/* Color utilities */\n");
    for key in tokens.colors.keys() {
        let var = format!("var(--{p}-color-{key})");
        let _ = writeln!(out, ".{p}-bg-{key} {{ background-color: {var}; }}");
        let _ = writeln!(out, ".{p}-text-{key} {{ color: {var}; }}");
        let _ = writeln!(out, ".{p}-border-{key} {{ border-color: {var}; }}");
    }

    out.push_str("\n/* Spacing utilities */\n");
    for key in tokens.spacing.keys() {
        emit_spacing_rule(&mut out, p, key);
    }

    out.push_str("\n/* Typography */\n");
    for (key, style) in &tokens.typography {
        emit_typography_block(&mut out, p, key, style);
    }

    out.push_str("\n/* Components */\n");
    for (key, component) in &tokens.components {
        let _ = writeln!(out, ".{p}-component-{key} {{");
        for (prop, value) in component.styles.css_properties() {
            let _ = writeln!(out, "  {prop}: {value};");
        }
        if let Some(width) = component.width {
            let _ = writeln!(out, "  width: {};", px(width));
        }
        if let Some(height) = component.height {
            let _ = writeln!(out, "  height: {};", px(height));
        }
        if let Some(opacity) = component.opacity {
            let _ = writeln!(out, "  opacity: {};", format_num(opacity));
        }
        out.push_str("}\n");
    }

    out.push_str("\n/* Helpers */\n");
    for (class, decl) in [
        ("hidden", "display: none"),
        ("block", "display: block"),
        ("flex", "display: flex"),
        ("grid", "display: grid"),
        ("relative", "position: relative"),
        ("absolute", "position: absolute"),
    ] {
        let _ = writeln!(out, ".{p}-{class} {{ {decl} !important; }}");
    }
    let _ = writeln!(out, ".{p}-transition {{ transition: all 0.2s ease; }}");

    out
}

/// One utility rule per spacing key, chosen by the key's suffix.
fn emit_spacing_rule(out: &mut String, p: &str, key: &str) {
    let var = format!("var(--{p}-spacing-{key})");
    let Some((suffix, base)) = SpacingSuffix::split(key) else {
        let _ = writeln!(out, ".{p}-{key} {{ margin: {var}; }}");
        return;
    };
    let (class, props): (&str, &[&str]) = match suffix {
        SpacingSuffix::Width => ("w", &["width"][..]),
        SpacingSuffix::Height => ("h", &["height"][..]),
        SpacingSuffix::PaddingX => ("px", &["padding-left", "padding-right"][..]),
        SpacingSuffix::PaddingY => ("py", &["padding-top", "padding-bottom"][..]),
        SpacingSuffix::Gap => ("gap", &["gap"][..]),
        SpacingSuffix::Radius => ("rounded", &["border-radius"][..]),
    };
    let _ = write!(out, ".{p}-{class}-{base} {{");
    for prop in props {
        let _ = write!(out, " {prop}: {var};");
    }
    out.push_str(" }\n");
}

fn emit_typography_block(out: &mut String, p: &str, key: &str, style: &TypographyToken) {
    let _ = writeln!(out, ".{p}-typography-{key} {{");
    let _ = writeln!(out, "  font-family: {};", css_font_family(&style.font_family));
    let _ = writeln!(out, "  font-size: {};", style.font_size);
    let _ = writeln!(out, "  font-weight: {};", css_font_weight(&style.font_weight));
    let _ = writeln!(out, "  line-height: {};", style.line_height);
    let _ = writeln!(out, "  letter-spacing: {};", style.letter_spacing);
    out.push_str("}\n");
}

/// Quote a family name unless it is a single bare identifier.
fn css_font_family(family: &str) -> String {
    let bare = family
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if bare && !family.starts_with(|c: char| c.is_ascii_digit()) {
        family.to_string()
    } else {
        format!("\"{}\"", family.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

fn css_font_weight(weight: &FontWeight) -> String {
    match weight {
        FontWeight::Numeric(n) => format_num(*n),
        FontWeight::Named(name) => name.clone(),
    }
}

// ─── Index module ────────────────────────────────────────────────────────

fn emit_index(config: &ArtifactConfig) -> String {
    let p = &config.prefix;
    let colors = config.export_name(ArtifactKind::Colors);
    let spacing = config.export_name(ArtifactKind::Spacing);
    let typography = config.export_name(ArtifactKind::Typography);
    let components = config.export_name(ArtifactKind::Components);
    let module = |kind| format!("./{}", config.file_name(kind));

    let mut out = String::with_capacity(2048);
    out.push_str("// Generated design token index. Do not edit by hand.\n\n");
    let _ = writeln!(out, "import {{ {colors} }} from '{}';", module(ArtifactKind::Colors));
    let _ = writeln!(out, "import {{ {spacing} }} from '{}';", module(ArtifactKind::Spacing));
    let _ = writeln!(
        out,
        "import {{ {typography} }} from '{}';",
        module(ArtifactKind::Typography)
    );
    let _ = writeln!(
        out,
        "import {{ {components}, componentsByType }} from '{}';",
        module(ArtifactKind::Components)
    );
    out.push('\n');
    let _ = writeln!(
        out,
        "export {{ {colors}, {spacing}, {typography}, {components}, componentsByType }};"
    );

    out.push_str("\nexport const applyTokens = () => {\n");
    out.push_str("  if (typeof document === 'undefined') return;\n");
    out.push_str("  const root = document.documentElement;\n");
    for (map, category) in [(&colors, "color"), (&spacing, "spacing")] {
        let _ = writeln!(out, "  Object.entries({map}).forEach(([key, value]) => {{");
        let _ = writeln!(out, "    root.style.setProperty(`--{p}-{category}-${{key}}`, value);");
        out.push_str("  });\n");
    }
    out.push_str("};\n");

    out.push_str("\nexport const stats = () => ({\n");
    let _ = writeln!(out, "  colors: Object.keys({colors}).length,");
    let _ = writeln!(out, "  spacing: Object.keys({spacing}).length,");
    let _ = writeln!(out, "  typography: Object.keys({typography}).length,");
    let _ = writeln!(out, "  components: Object.keys({components}).length,");
    out.push_str("  componentsByType: Object.fromEntries(\n");
    out.push_str(
        "    Object.entries(componentsByType).map(([group, members]) => [group, Object.keys(members).length])\n",
    );
    out.push_str("  ),\n");
    out.push_str("});\n");

    let _ = writeln!(out, "\nexport const {p}Tokens = {{");
    let _ = writeln!(out, "  colors: {colors},");
    let _ = writeln!(out, "  spacing: {spacing},");
    let _ = writeln!(out, "  typography: {typography},");
    let _ = writeln!(out, "  components: {components},");
    out.push_str("};\n\n");
    let _ = writeln!(out, "export default {p}Tokens;");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{ComponentStyles, ComponentToken, Contribution};
    use pretty_assertions::assert_eq;

    fn sample() -> TokenSet {
        let mut set = TokenSet::new();
        set.apply(Contribution::Color("primary".into(), "#22c55e".into()));
        set.apply(Contribution::Spacing("cardPaddingX".into(), "24px".into()));
        set.apply(Contribution::Spacing("cardGap".into(), "12px".into()));
        set.apply(Contribution::Spacing("gutter".into(), "16px".into()));
        set.apply(Contribution::Typography(
            "labelSmall".into(),
            TypographyToken {
                font_family: "Open Sans".into(),
                font_size: "11px".into(),
                font_weight: FontWeight::Numeric(500.0),
                line_height: "16px".into(),
                letter_spacing: "normal".into(),
            },
        ));
        set.apply(Contribution::Component(
            "buttonPrimary".into(),
            ComponentToken {
                id: "1:2".into(),
                display_name: "Button Primary".into(),
                category: ComponentCategory::Button,
                width: Some(120.0),
                height: Some(40.0),
                corner_radius: Some(8.0),
                opacity: None,
                styles: ComponentStyles {
                    background_color: Some("#22c55e".into()),
                    border_radius: Some("8px".into()),
                    ..ComponentStyles::default()
                },
            },
        ));
        set
    }

    fn render(kind: ArtifactKind) -> String {
        render_artifacts(&sample(), &ArtifactConfig::default())
            .unwrap()
            .into_iter()
            .find(|a| a.kind == kind)
            .unwrap()
            .contents
    }

    #[test]
    fn file_layout_and_order() {
        let artifacts = render_artifacts(&sample(), &ArtifactConfig::default()).unwrap();
        let names: Vec<_> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "colors.js",
                "spacing.js",
                "typography.js",
                "components.js",
                "mep-design-system.css",
                "index.js",
            ]
        );
    }

    #[test]
    fn colors_module() {
        assert_eq!(
            render(ArtifactKind::Colors),
            "// Generated design tokens: colors. Do not edit by hand.\n\n\
             export const mepColors = {\n  \"primary\": \"#22c55e\"\n};\n\n\
             export default mepColors;\n"
        );
    }

    #[test]
    fn components_module_groups_by_type() {
        let js = render(ArtifactKind::Components);
        assert!(js.contains("export const mepComponents = {\n  \"buttonPrimary\": {"));
        assert!(js.contains("\"width\": 120,"));
        assert!(js.contains("  buttons: byCategory('button'),\n"));
        assert!(js.contains("  other: byCategory('other'),\n"));
    }

    #[test]
    fn stylesheet_rules() {
        let css = render(ArtifactKind::Stylesheet);
        assert!(css.contains("  --mep-color-primary: #22c55e;\n"));
        assert!(css.contains("  --mep-spacing-cardGap: 12px;\n"));
        assert!(css.contains(".mep-bg-primary { background-color: var(--mep-color-primary); }"));
        assert!(css.contains(".mep-text-primary { color: var(--mep-color-primary); }"));
        assert!(css.contains(".mep-border-primary { border-color: var(--mep-color-primary); }"));
        assert!(css.contains(
            ".mep-px-card { padding-left: var(--mep-spacing-cardPaddingX); padding-right: var(--mep-spacing-cardPaddingX); }"
        ));
        assert!(css.contains(".mep-gap-card { gap: var(--mep-spacing-cardGap); }"));
        assert!(css.contains(".mep-gutter { margin: var(--mep-spacing-gutter); }"));
        assert!(css.contains(".mep-typography-labelSmall {\n  font-family: \"Open Sans\";\n"));
        assert!(css.contains("  font-weight: 500;\n"));
        assert!(css.contains(
            ".mep-component-buttonPrimary {\n  background-color: #22c55e;\n  border-radius: 8px;\n  width: 120px;\n  height: 40px;\n}\n"
        ));
    }

    #[test]
    fn index_imports_every_module() {
        let js = render(ArtifactKind::Index);
        assert!(js.contains("import { mepColors } from './colors.js';"));
        assert!(js.contains("import { mepComponents, componentsByType } from './components.js';"));
        assert!(js.contains("export const applyTokens = () => {"));
        assert!(js.contains("root.style.setProperty(`--mep-color-${key}`, value);"));
        assert!(js.contains("export const stats = () => ({"));
        assert!(js.trim_end().ends_with("export default mepTokens;"));
    }

    #[test]
    fn custom_prefix_and_extension() {
        let config = ArtifactConfig {
            prefix: "acme".into(),
            extension: "mjs".into(),
        };
        let artifacts = render_artifacts(&TokenSet::new(), &config).unwrap();
        assert_eq!(artifacts[0].file_name, "colors.mjs");
        assert_eq!(artifacts[4].file_name, "acme-design-system.css");
        assert!(artifacts[0].contents.contains("export const acmeColors = {};"));
        assert!(artifacts[5].contents.contains("from './spacing.mjs';"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = render_artifacts(&sample(), &ArtifactConfig::default()).unwrap();
        let b = render_artifacts(&sample(), &ArtifactConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn font_family_quoting() {
        assert_eq!(css_font_family("Ubuntu"), "Ubuntu");
        assert_eq!(css_font_family("Open Sans"), "\"Open Sans\"");
        assert_eq!(css_font_family("3Dumb"), "\"3Dumb\"");
    }
}
