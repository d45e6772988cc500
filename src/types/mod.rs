pub mod color;
pub mod component;
pub mod error;
pub mod harvest;
pub mod tokens;

pub use color::{Hsl, Rgba, normalize_color};
pub use component::{ComponentKind, VariantGuess};
pub use error::{HarvestError, InspectError, Result, ResultExt, SyntaxIssue, SyntaxIssueKind};
pub use harvest::{
    BorderSection, ColorCount, ColorSection, ComponentBlueprint, FontSpec, HarvestMetadata,
    HarvestRecord, Histogram, NEUTRAL_STEPS, SemanticColor, SemanticColors, ShadowBucket,
    ShadowSection, SpacingSection, StyleProfile, TypographySection,
};
pub use tokens::TokenMap;

// =============================================================================
// Domain Newtypes
// =============================================================================

use std::fmt;

/// Type-safe wrapper for project slugs
///
/// Always lowercase ASCII alphanumerics separated by single dashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectSlug(String);

impl ProjectSlug {
    /// Derive a slug from a human project name
    pub fn from_name(name: &str) -> Option<Self> {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;

        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }

        if slug.is_empty() { None } else { Some(Self(slug)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProjectSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProjectSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
