//! The built-in mock document used when the real source is unavailable.
//!
//! Built in code rather than parsed from embedded JSON so constructing it
//! can never fail.

use crate::source::SourceSnapshot;
use ds_core::model::{FontWeight, Node, NodeKind, Rgba, SourceDocument, TypeStyle};

pub const MOCK_DOCUMENT_NAME: &str = "Design System (mock)";

const PRIMARY: Rgba = Rgba::rgb(0.133, 0.773, 0.369);
const SECONDARY: Rgba = Rgba::rgb(0.231, 0.51, 0.965);
const BACKGROUND: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
const SURFACE: Rgba = Rgba::rgb(0.973, 0.98, 0.988);
const TEXT: Rgba = Rgba::rgb(0.059, 0.09, 0.165);
const BORDER: Rgba = Rgba::rgb(0.886, 0.91, 0.941);
const SHADOW: Rgba = Rgba::rgba(0.0, 0.0, 0.0, 0.1);

fn text_style(size: f64, weight: f64, line_height: f64) -> TypeStyle {
    TypeStyle {
        font_family: Some("Ubuntu".to_string()),
        font_size: Some(size),
        font_weight: Some(FontWeight::Numeric(weight)),
        line_height_px: Some(line_height),
        letter_spacing: None,
    }
}

/// The fixed mock document.
pub fn mock_document() -> SourceDocument {
    let colors = Node::new("10:1", "Colors", NodeKind::Frame).with_children(vec![
        Node::new("10:2", "Primary", NodeKind::Rectangle).with_fill(PRIMARY),
        Node::new("10:3", "Secondary", NodeKind::Rectangle).with_fill(SECONDARY),
        Node::new("10:4", "Background", NodeKind::Rectangle).with_fill(BACKGROUND),
        Node::new("10:5", "Surface", NodeKind::Rectangle).with_fill(SURFACE),
        Node::new("10:6", "Text Primary", NodeKind::Rectangle).with_fill(TEXT),
    ]);

    let typography = Node::new("11:1", "Typography", NodeKind::Frame).with_children(vec![
        Node::new("11:2", "Heading Large", NodeKind::Text).with_text_style(text_style(32.0, 700.0, 40.0)),
        Node::new("11:3", "Body", NodeKind::Text).with_text_style(text_style(16.0, 400.0, 24.0)),
        Node::new("11:4", "Label Small", NodeKind::Text).with_text_style(text_style(11.0, 500.0, 16.0)),
    ]);

    let components = Node::new("12:1", "Components", NodeKind::Frame)
        .with_layout(24.0, 32.0, 32.0)
        .with_children(vec![
            Node::new("12:2", "Button Primary", NodeKind::Component)
                .with_size(120.0, 40.0)
                .with_fill(PRIMARY)
                .with_corner_radius(8.0)
                .with_layout(8.0, 16.0, 8.0),
            Node::new("12:3", "Button Secondary", NodeKind::Component)
                .with_size(120.0, 40.0)
                .with_fill(BACKGROUND)
                .with_stroke(SECONDARY, 1.0)
                .with_corner_radius(8.0),
            Node::new("12:4", "Input Field", NodeKind::Component)
                .with_size(240.0, 40.0)
                .with_fill(BACKGROUND)
                .with_stroke(BORDER, 1.0)
                .with_corner_radius(6.0),
            Node::new("12:5", "Project Card", NodeKind::Component)
                .with_size(320.0, 240.0)
                .with_fill(SURFACE)
                .with_corner_radius(12.0)
                .with_layout(16.0, 24.0, 24.0)
                .with_shadow(0.0, 4.0, 6.0, SHADOW),
            Node::new("12:6", "Nav Header", NodeKind::Component)
                .with_size(1280.0, 64.0)
                .with_fill(BACKGROUND)
                .with_layout(32.0, 48.0, 16.0),
        ]);

    SourceDocument::with_pages(
        MOCK_DOCUMENT_NAME,
        vec![Node::new("0:1", "Design System", NodeKind::Canvas)
            .with_children(vec![colors, typography, components])],
    )
}

pub fn mock_snapshot() -> SourceSnapshot {
    SourceSnapshot {
        document: mock_document(),
        variables: None,
    }
}
