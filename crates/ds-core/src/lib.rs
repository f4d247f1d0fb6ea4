pub mod classify;
pub mod coerce;
pub mod emitter;
pub mod extract;
pub mod lint;
pub mod model;
pub mod name;
pub mod summary;
pub mod tokens;
pub mod walk;

pub use classify::{ComponentCategory, classify_component};
pub use coerce::{RawSize, color_to_css, is_common_size, size_to_css};
pub use emitter::{Artifact, ArtifactConfig, ArtifactKind, render_artifacts};
pub use extract::{
    ColorExtractor, ComponentExtractor, Malformed, SpacingExtractor, TypographyExtractor,
    extract_variables,
};
pub use lint::{LintDiagnostic, LintSeverity, lint_walk};
pub use model::*;
pub use name::{Identifier, KeyStyle, MAX_IDENTIFIER_LEN, normalize_name, suffixed_key, token_key};
pub use summary::DocumentSummary;
pub use tokens::{
    ComponentStyles, ComponentToken, Contribution, TokenCategory, TokenSet, TokenStats,
    TypographyToken,
};
pub use walk::{Extractor, ExtractorSet, WalkOutput, WalkStats, walk_document};
