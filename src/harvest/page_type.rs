//! Page-type label
//!
//! A free-text guess used for documentation only: URL path hints first,
//! then the mix of sampled tags and classified components.

use std::collections::BTreeMap;

use super::sampler::StyleSample;
use crate::types::{ComponentBlueprint, ComponentKind};

const URL_HINTS: [(&str, &str); 9] = [
    ("/docs", "documentation"),
    ("/documentation", "documentation"),
    ("/dashboard", "dashboard"),
    ("/admin", "dashboard"),
    ("/pricing", "pricing"),
    ("/login", "auth"),
    ("/signin", "auth"),
    ("/signup", "auth"),
    ("/blog", "article"),
];

pub fn detect(
    source: &str,
    samples: &[StyleSample],
    components: &BTreeMap<ComponentKind, ComponentBlueprint>,
) -> String {
    let path = source
        .split_once("://")
        .map(|(_, rest)| rest.find('/').map(|i| &rest[i..]).unwrap_or(""))
        .unwrap_or(source)
        .to_ascii_lowercase();
    for (hint, label) in URL_HINTS {
        if path.starts_with(hint) || path.contains(&format!("{}/", hint)) {
            return label.to_string();
        }
    }

    let has = |kind: ComponentKind| components.contains_key(&kind);

    let label = if has(ComponentKind::Table)
        && (has(ComponentKind::Navigation) || count_tags(samples, &["aside"]) > 0)
    {
        "dashboard"
    } else if count_tags(samples, &["pre", "code"]) >= 3 {
        "documentation"
    } else if count_tags(samples, &["input", "select", "textarea"]) >= 3 && !has(ComponentKind::Table) {
        "form"
    } else if count_tags(samples, &["article"]) > 0 || count_tags(samples, &["p"]) >= 10 {
        "article"
    } else if count_tags(samples, &["h1"]) > 0 && has(ComponentKind::Button) {
        "landing"
    } else {
        "unknown"
    };
    label.to_string()
}

fn count_tags(samples: &[StyleSample], tags: &[&str]) -> usize {
    samples
        .iter()
        .filter(|s| tags.contains(&s.tag.as_str()))
        .count()
}
