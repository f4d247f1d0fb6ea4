//! Name normalization: free-text design labels → code-safe identifiers.

use std::fmt;
use std::str::FromStr;

/// Maximum length of a normalized identifier, in characters.
pub const MAX_IDENTIFIER_LEN: usize = 50;

/// A normalized identifier: lowercase ASCII letters, digits and single
/// underscores, never starting with a digit or underscore, never longer
/// than [`MAX_IDENTIFIER_LEN`]. Rendered keys keep that bound, including
/// keys extended by [`suffixed_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the identifier as a token map key in the given style.
    pub fn render(&self, style: KeyStyle) -> String {
        match style {
            KeyStyle::Snake => self.0.clone(),
            KeyStyle::Camel => {
                let mut out = String::with_capacity(self.0.len());
                for (i, segment) in self.0.split('_').enumerate() {
                    if i == 0 {
                        out.push_str(segment);
                        continue;
                    }
                    let mut chars = segment.chars();
                    if let Some(first) = chars.next() {
                        out.push(first.to_ascii_uppercase());
                        out.push_str(chars.as_str());
                    }
                }
                out
            }
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How identifiers are rendered as token map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStyle {
    /// `button_primary` → `buttonPrimary`.
    #[default]
    Camel,
    /// `button_primary` stays `button_primary`.
    Snake,
}

impl FromStr for KeyStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "camel" | "camelcase" => Ok(KeyStyle::Camel),
            "snake" | "snake_case" => Ok(KeyStyle::Snake),
            other => Err(format!("unknown key style '{other}' (expected camel or snake)")),
        }
    }
}

/// Normalize a display name into an [`Identifier`].
///
/// Lowercases, drops everything outside `[a-z0-9]` and whitespace, joins
/// whitespace-separated words with `_`, prefixes a leading digit with `n`,
/// and caps the result at [`MAX_IDENTIFIER_LEN`]. Returns `None` when
/// nothing usable remains.
pub fn normalize_name(raw: &str) -> Option<Identifier> {
    let lowered = raw.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    let mut ident = kept.split_whitespace().collect::<Vec<_>>().join("_");
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, 'n');
    }
    while ident.contains("__") {
        ident = ident.replace("__", "_");
    }

    // ASCII only from here on, so byte truncation is char-safe.
    ident.truncate(MAX_IDENTIFIER_LEN);
    let ident = ident.trim_matches('_');

    if ident.is_empty() {
        None
    } else {
        Some(Identifier(ident.to_string()))
    }
}

/// Normalize and render in one step.
pub fn token_key(raw: &str, style: KeyStyle) -> Option<String> {
    normalize_name(raw).map(|id| id.render(style))
}

/// Append `suffix` to a rendered key, shortening the key first so the
/// result never exceeds [`MAX_IDENTIFIER_LEN`]. A shortened snake key never
/// ends in `_` before the suffix.
pub fn suffixed_key(key: &str, suffix: &str) -> String {
    let room = MAX_IDENTIFIER_LEN.saturating_sub(suffix.len());
    let base = if key.len() > room {
        // Rendered keys are ASCII, so any byte index is a char boundary.
        key.get(..room).unwrap_or(key).trim_end_matches('_')
    } else {
        key
    };
    format!("{base}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> Option<String> {
        normalize_name(s).map(|id| id.as_str().to_string())
    }

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(norm("Button Primary").as_deref(), Some("button_primary"));
        assert_eq!(norm("  Label \t Small\n").as_deref(), Some("label_small"));
    }

    #[test]
    fn strips_punctuation_and_non_ascii() {
        assert_eq!(norm("Card / Hover (v2)").as_deref(), Some("card_hover_v2"));
        assert_eq!(norm("Título Émoji 🎨").as_deref(), Some("ttulo_moji"));
        assert_eq!(norm("snake_case_name").as_deref(), Some("snakecasename"));
    }

    #[test]
    fn leading_digit_gets_prefix() {
        assert_eq!(norm("100 Gray").as_deref(), Some("n100_gray"));
        assert_eq!(norm("  2xl").as_deref(), Some("n2xl"));
    }

    #[test]
    fn empty_or_symbol_only_is_none() {
        assert_eq!(norm(""), None);
        assert_eq!(norm("   "), None);
        assert_eq!(norm("---///"), None);
    }

    #[test]
    fn truncates_to_cap_without_trailing_underscore() {
        let long = "word ".repeat(30);
        let id = norm(&long).unwrap();
        assert!(id.len() <= MAX_IDENTIFIER_LEN);
        assert!(!id.ends_with('_'));
        assert!(!id.contains("__"));
    }

    #[test]
    fn camel_rendering() {
        let id = normalize_name("Button Primary").unwrap();
        assert_eq!(id.render(KeyStyle::Camel), "buttonPrimary");
        assert_eq!(id.render(KeyStyle::Snake), "button_primary");

        let digits = normalize_name("3 Col Grid").unwrap();
        assert_eq!(digits.render(KeyStyle::Camel), "n3ColGrid");
    }

    #[test]
    fn suffixed_keys_stay_within_cap() {
        let long = "a ".repeat(40);
        for style in [KeyStyle::Camel, KeyStyle::Snake] {
            let key = token_key(&long, style).unwrap();
            for suffix in ["_padding_x", "PaddingX", "_gap", "_12"] {
                let out = suffixed_key(&key, suffix);
                assert!(out.len() <= MAX_IDENTIFIER_LEN, "{out} ({})", out.len());
                assert!(out.ends_with(suffix));
                assert!(!out.contains("__"), "{out}");
            }
        }
        assert_eq!(suffixed_key("card", "_gap"), "card_gap");
    }

    #[test]
    fn key_style_from_str() {
        assert_eq!("camel".parse::<KeyStyle>(), Ok(KeyStyle::Camel));
        assert_eq!(" Snake ".parse::<KeyStyle>(), Ok(KeyStyle::Snake));
        assert!("kebab".parse::<KeyStyle>().is_err());
    }
}
