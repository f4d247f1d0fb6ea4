//! Value coercers: raw paints and numbers → CSS-ready strings.

use crate::model::Rgba;
use serde::Serializer;

/// Standard design-system sizes. A measured width or height is only kept
/// as a spacing token when it sits within [`COMMON_SIZE_TOLERANCE`] of one.
pub const COMMON_SIZES: [f64; 22] = [
    8.0, 12.0, 16.0, 20.0, 24.0, 32.0, 40.0, 48.0, 56.0, 64.0, 80.0, 96.0, 112.0, 128.0, 144.0,
    160.0, 176.0, 192.0, 208.0, 224.0, 240.0, 256.0,
];

pub const COMMON_SIZE_TOLERANCE: f64 = 2.0;

/// Fallback for a missing or unusable color.
pub const FALLBACK_COLOR: &str = "#000000";

/// A raw size value: a pixel number or a literal CSS string.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSize {
    Px(f64),
    Literal(String),
}

/// Convert a 0–1 channel to a byte via `round(channel * 255)`.
pub fn channel_to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// `#rrggbb` for opaque colors, `rgba(r, g, b, a)` when alpha < 1.
/// A missing color yields [`FALLBACK_COLOR`].
pub fn color_to_css(color: Option<&Rgba>) -> String {
    let Some(color) = color else {
        return FALLBACK_COLOR.to_string();
    };

    let r = channel_to_byte(color.r);
    let g = channel_to_byte(color.g);
    let b = channel_to_byte(color.b);
    let a = color.alpha();

    if a < 1.0 {
        format!("rgba({r}, {g}, {b}, {a})")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// `"{n}px"` for numbers, literal strings pass through unchanged.
pub fn size_to_css(value: &RawSize) -> String {
    match value {
        RawSize::Px(n) => format!("{}px", format_num(*n)),
        RawSize::Literal(s) => s.clone(),
    }
}

/// Shorthand for `size_to_css(&RawSize::Px(n))`.
pub fn px(n: f64) -> String {
    size_to_css(&RawSize::Px(n))
}

/// Whether `value` is within ±2 of a standard size.
pub fn is_common_size(value: f64) -> bool {
    COMMON_SIZES
        .iter()
        .any(|size| (value - size).abs() <= COMMON_SIZE_TOLERANCE)
}

/// Format a float without trailing zeros; float noise past two decimals
/// is dropped (`-0.30000001192092896` → `-0.3`).
pub fn format_num(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let s = format!("{n:.2}");
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" { "0".to_string() } else { s.to_string() }
    }
}

/// Serialize a float as an integer when it has no fractional part, so
/// `120.0` lands in JSON as `120`.
pub fn serialize_compact<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n == n.trunc() && n.abs() < 1e15 {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

pub(crate) fn serialize_compact_opt<S: Serializer>(
    n: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match n {
        Some(n) => serialize_compact(*n, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_color_is_hex() {
        let c = Rgba::rgb(0.133, 0.773, 0.369);
        assert_eq!(color_to_css(Some(&c)), "#22c55e");
        assert_eq!(color_to_css(Some(&Rgba::rgba(1.0, 1.0, 1.0, 1.0))), "#ffffff");
        assert_eq!(color_to_css(Some(&Rgba::rgb(0.0, 0.0, 0.0))), "#000000");
    }

    #[test]
    fn hex_channels_are_rounded_and_padded() {
        for step in 0..=20 {
            let v = step as f64 / 20.0;
            let css = color_to_css(Some(&Rgba::rgb(v, v, v)));
            assert_eq!(css.len(), 7);
            let byte = (v * 255.0).round() as u8;
            assert_eq!(&css[1..3], format!("{byte:02x}"));
        }
    }

    #[test]
    fn translucent_color_keeps_alpha_unrounded() {
        let c = Rgba::rgba(0.0, 0.0, 0.0, 0.123456);
        assert_eq!(color_to_css(Some(&c)), "rgba(0, 0, 0, 0.123456)");
        let half = Rgba::rgba(1.0, 0.0, 0.0, 0.5);
        assert_eq!(color_to_css(Some(&half)), "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn missing_color_falls_back() {
        assert_eq!(color_to_css(None), FALLBACK_COLOR);
    }

    #[test]
    fn sizes() {
        assert_eq!(size_to_css(&RawSize::Px(16.0)), "16px");
        assert_eq!(size_to_css(&RawSize::Px(11.5)), "11.5px");
        assert_eq!(size_to_css(&RawSize::Px(-0.30000001192092896)), "-0.3px");
        assert_eq!(size_to_css(&RawSize::Literal("1.5rem".into())), "1.5rem");
    }

    #[test]
    fn common_size_boundaries() {
        assert!(is_common_size(24.0));
        assert!(is_common_size(25.0));
        assert!(is_common_size(26.0));
        assert!(!is_common_size(27.0));
        assert!(is_common_size(30.0));
        assert!(!is_common_size(300.0));
        assert!(!is_common_size(0.0));
    }
}
