//! Token Vocabulary
//!
//! The closed set of token names the mapper may emit. Names are written
//! without the CSS prefix: `color-primary-hover` becomes
//! `--{prefix}-color-primary-hover`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::constants::aggregate::{RADIUS_STEPS, SPACING_LADDER};

/// Semantic color roles that get a full state ramp
pub const COLOR_ROLES: [&str; 6] = ["primary", "success", "warning", "danger", "info", "link"];

/// State suffixes derived from each role's base color
pub const COLOR_STATES: [&str; 7] = [
    "",
    "-hover",
    "-active",
    "-disabled",
    "-light-default",
    "-light-hover",
    "-light-active",
];

/// Named spacing aliases with their nominal pixel value
pub const SPACING_NAMES: [(&str, u32); 9] = [
    ("super-tight", 2),
    ("extra-tight", 4),
    ("tight", 8),
    ("base-tight", 12),
    ("base", 16),
    ("base-loose", 20),
    ("loose", 24),
    ("extra-loose", 32),
    ("super-loose", 40),
];

pub const SHADOW_NAMES: [&str; 5] = ["sm", "md", "lg", "xl", "elevated"];

static VOCABULARY: LazyLock<BTreeSet<String>> = LazyLock::new(build);

fn build() -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for role in COLOR_ROLES {
        for state in COLOR_STATES {
            names.insert(format!("color-{role}{state}"));
        }
    }
    for i in 0..10 {
        names.insert(format!("color-grey-{i}"));
    }
    for i in 0..5 {
        names.insert(format!("color-bg-{i}"));
    }
    for i in 0..3 {
        names.insert(format!("color-fill-{i}"));
    }
    for i in 0..4 {
        names.insert(format!("color-text-{i}"));
    }
    for name in [
        "color-border",
        "color-focus-border",
        "color-disabled-text",
        "color-disabled-bg",
        "color-disabled-border",
    ] {
        names.insert(name.to_string());
    }

    for step in RADIUS_STEPS.iter().chain(["circle", "full"].iter()) {
        names.insert(format!("border-radius-{step}"));
    }
    names.insert("border-thickness".to_string());

    for (name, _) in SPACING_NAMES {
        names.insert(format!("spacing-{name}"));
    }
    for px in SPACING_LADDER {
        names.insert(format!("spacing-{px}"));
    }

    for name in SHADOW_NAMES {
        names.insert(format!("shadow-{name}"));
    }

    for name in [
        "font-family-regular",
        "font-family-heading",
        "font-size-small",
        "font-size-regular",
        "font-weight-regular",
        "font-weight-bold",
        "line-height-regular",
    ] {
        names.insert(name.to_string());
    }
    for level in 1..=6 {
        names.insert(format!("font-size-header-{level}"));
    }

    names
}

/// Whether `name` belongs to the vocabulary
pub fn is_known(name: &str) -> bool {
    VOCABULARY.contains(name)
}

/// Every known token name, sorted
pub fn all() -> impl Iterator<Item = &'static str> {
    VOCABULARY.iter().map(String::as_str)
}

/// Display category used to group tokens in emitted files
pub fn category(name: &str) -> &'static str {
    if name.starts_with("color-") {
        "color"
    } else if name.starts_with("spacing-") {
        "spacing"
    } else if name.starts_with("border-") {
        "border"
    } else if name.starts_with("shadow-") {
        "shadow"
    } else {
        "typography"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        assert!(is_known("color-primary"));
        assert!(is_known("color-primary-hover"));
        assert!(is_known("color-grey-9"));
        assert!(is_known("spacing-base"));
        assert!(is_known("spacing-96"));
        assert!(is_known("border-radius-circle"));
        assert!(is_known("font-size-header-6"));
    }

    #[test]
    fn test_unknown_names() {
        assert!(!is_known("color-brand"));
        assert!(!is_known("spacing-7"));
        assert!(!is_known("--semi-color-primary"));
        assert!(!is_known("color-grey-10"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(category("color-bg-0"), "color");
        assert_eq!(category("border-thickness"), "border");
        assert_eq!(category("line-height-regular"), "typography");
    }

    #[test]
    fn test_vocabulary_sorted_and_unique() {
        let names: Vec<_> = all().collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }
}
