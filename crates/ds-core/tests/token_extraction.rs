//! Integration tests: source JSON → walk → token set → artifacts.
//!
//! Exercises the full `ds-core` pipeline against a realistic design file.

use ds_core::classify::ComponentCategory;
use ds_core::emitter::{ArtifactConfig, render_artifacts};
use ds_core::lint::lint_walk;
use ds_core::model::{FontWeight, Node, NodeKind, Rgba, SourceDocument, TypeStyle};
use ds_core::name::KeyStyle;
use ds_core::tokens::{ComponentStyles, TypographyToken};
use ds_core::walk::{ExtractorSet, WalkOutput, walk_document};
use pretty_assertions::assert_eq;

fn fixture() -> SourceDocument {
    serde_json::from_str(include_str!("fixtures/design_file.json")).unwrap()
}

fn walk(doc: &SourceDocument) -> WalkOutput {
    walk_document(doc, &ExtractorSet::standard(), KeyStyle::Camel)
}

// ─── End-to-end scenarios ────────────────────────────────────────────────

#[test]
fn button_primary_component() {
    let doc = SourceDocument::with_pages(
        "scenario",
        vec![Node::new("1:0", "Page", NodeKind::Canvas).with_children(vec![
            Node::new("1:1", "Button Primary", NodeKind::Component)
                .with_fill(Rgba::rgb(0.133, 0.773, 0.369))
                .with_size(120.0, 40.0)
                .with_corner_radius(8.0),
        ])],
    );
    let tokens = walk(&doc).into_tokens();

    let button = &tokens.components["buttonPrimary"];
    assert_eq!(button.category, ComponentCategory::Button);
    assert_eq!(button.width, Some(120.0));
    assert_eq!(button.height, Some(40.0));
    assert_eq!(button.styles.background_color.as_deref(), Some("#22c55e"));
    assert_eq!(button.styles.border_radius.as_deref(), Some("8px"));
}

#[test]
fn label_small_typography() {
    let doc = SourceDocument::with_pages(
        "scenario",
        vec![Node::new("1:0", "Page", NodeKind::Canvas).with_children(vec![
            Node::new("1:1", "Label Small", NodeKind::Text).with_text_style(TypeStyle {
                font_family: Some("Ubuntu".into()),
                font_size: Some(11.0),
                font_weight: Some(FontWeight::Numeric(500.0)),
                line_height_px: Some(16.0),
                letter_spacing: None,
            }),
        ])],
    );
    let tokens = walk(&doc).into_tokens();

    assert_eq!(
        tokens.typography["labelSmall"],
        TypographyToken {
            font_family: "Ubuntu".into(),
            font_size: "11px".into(),
            font_weight: FontWeight::Numeric(500.0),
            line_height: "16px".into(),
            letter_spacing: "normal".into(),
        }
    );
    let json = serde_json::to_value(&tokens.typography["labelSmall"]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "fontFamily": "Ubuntu",
            "fontSize": "11px",
            "fontWeight": 500,
            "lineHeight": "16px",
            "letterSpacing": "normal"
        })
    );
}

// ─── Fixture document ────────────────────────────────────────────────────

#[test]
fn fixture_token_set() {
    let out = walk(&fixture());
    let tokens = &out.tokens;

    let colors: Vec<(&str, &str)> = tokens
        .colors
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        colors,
        vec![
            ("buttonPrimary", "#22c55e"),
            ("overlay", "rgba(0, 0, 0, 0.5)"),
            ("overlay_3", "#ffffff"),
            ("primary", "#22c55e"),
        ]
    );

    let spacing: Vec<&str> = tokens.spacing.keys().map(String::as_str).collect();
    assert_eq!(
        spacing,
        vec![
            "buttonPrimaryHeight",
            "buttonPrimaryRadius",
            "cardGap",
            "cardHeight",
            "cardPaddingX",
            "cardPaddingY",
            "cardRadius",
            "statehoverHeight",
        ]
    );
    assert_eq!(tokens.spacing["cardHeight"], "47px");
    assert_eq!(tokens.spacing["cardPaddingY"], "16px");

    let components: Vec<&str> = tokens.components.keys().map(String::as_str).collect();
    assert_eq!(components, vec!["buttonPrimary", "statehover"]);
    assert_eq!(
        tokens.components["buttonPrimary"].styles,
        ComponentStyles {
            background_color: Some("#22c55e".into()),
            border_radius: Some("8px".into()),
            box_shadow: Some("0px 4px 6px rgba(0, 0, 0, 0.1)".into()),
            ..ComponentStyles::default()
        }
    );
    assert_eq!(
        tokens.components["statehover"].category,
        ComponentCategory::Other
    );

    let stats = tokens.stats();
    assert_eq!((stats.colors, stats.spacing, stats.typography, stats.components), (4, 8, 1, 2));
    assert_eq!(stats.components_by_category[&ComponentCategory::Button], 1);
}

#[test]
fn fixture_walk_reports_malformed_text_and_no_collisions() {
    let out = walk(&fixture());
    assert_eq!(out.stats.pages, 2);
    assert_eq!(out.stats.visited, 11);
    assert!(out.collisions.is_empty());
    assert_eq!(out.malformed.len(), 1);
    assert_eq!(out.malformed[0].node_id, "1:4");

    let diags = lint_walk(&out);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].rule, "malformed-node");
}

// ─── Properties ──────────────────────────────────────────────────────────

#[test]
fn collisions_resolve_last_extracted_wins() {
    let doc = SourceDocument::with_pages(
        "collide",
        vec![
            Node::new("1:0", "A", NodeKind::Canvas).with_children(vec![
                Node::new("1:1", "Brand / Primary", NodeKind::Rectangle)
                    .with_fill(Rgba::rgb(1.0, 0.0, 0.0)),
            ]),
            Node::new("2:0", "B", NodeKind::Canvas).with_children(vec![
                Node::new("2:1", "brand primary", NodeKind::Rectangle)
                    .with_fill(Rgba::rgb(0.0, 1.0, 0.0)),
            ]),
        ],
    );
    for _ in 0..3 {
        let out = walk(&doc);
        assert_eq!(out.tokens.colors.len(), 1);
        assert_eq!(out.tokens.colors["brandPrimary"], "#00ff00");
        assert_eq!(out.collisions.len(), 1);
        assert_eq!(out.collisions[0].kept, "2:1");
    }
}

#[test]
fn every_key_is_code_safe() {
    let out = walk(&fixture());
    let t = &out.tokens;
    let keys = t
        .colors
        .keys()
        .chain(t.spacing.keys())
        .chain(t.typography.keys())
        .chain(t.components.keys());
    for key in keys {
        assert!(!key.is_empty());
        assert!(!key.starts_with(|c: char| c.is_ascii_digit()), "{key}");
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'), "{key}");
        assert!(!key.contains("__"), "{key}");
    }
}

#[test]
fn regeneration_is_byte_identical() {
    let config = ArtifactConfig::default();
    let first = render_artifacts(&walk(&fixture()).tokens, &config).unwrap();
    let second = render_artifacts(&walk(&fixture()).tokens, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn snake_key_style() {
    let out = walk_document(&fixture(), &ExtractorSet::standard(), KeyStyle::Snake);
    assert!(out.tokens.components.contains_key("button_primary"));
    assert!(out.tokens.spacing.contains_key("card_padding_x"));
    assert!(out.tokens.typography.contains_key("label_small"));
}
