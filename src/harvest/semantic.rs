//! Semantic color guesses
//!
//! Each role is filled by the first rule that produces a chromatic color.
//! Every guess records the rule name and a confidence so downstream readers
//! can tell a button background from a hue-range fallback.
//!
//! Status colors prefer the foreground of class-hinted elements over their
//! background; tinted badge backgrounds are a common source of wrong picks.

use std::collections::BTreeMap;

use super::sampler::StyleSample;
use crate::types::{
    ColorSection, ComponentBlueprint, ComponentKind, Rgba, SemanticColor, SemanticColors,
    color::{hue_family, psychology},
};

/// Class fragments that mark status elements, per role
const STATUS_HINTS: [(&str, &[&str]); 4] = [
    ("success", &["success", "positive"]),
    ("warning", &["warning", "warn", "caution"]),
    ("danger", &["danger", "error", "destructive", "critical"]),
    ("info", &["info", "notice"]),
];

/// Hue families accepted by the fallback rule, per role
const STATUS_HUES: [(&str, &[&str]); 4] = [
    ("success", &["green"]),
    ("warning", &["orange", "yellow"]),
    ("danger", &["red"]),
    ("info", &["cyan", "blue"]),
];

pub struct SemanticGuesser {
    neutral_tolerance: u8,
}

impl SemanticGuesser {
    pub fn new(neutral_tolerance: u8) -> Self {
        Self { neutral_tolerance }
    }

    pub fn guess(
        &self,
        samples: &[StyleSample],
        components: &BTreeMap<ComponentKind, ComponentBlueprint>,
        colors: &ColorSection,
    ) -> SemanticColors {
        let mut out = SemanticColors {
            link: self.link_color(samples),
            ..Default::default()
        };

        out.primary = self
            .button_primary(components)
            .or_else(|| {
                out.link
                    .as_ref()
                    .map(|link| semantic(&link.value, 0.6, "link-color"))
            })
            .or_else(|| {
                colors
                    .chromatic
                    .first()
                    .map(|c| semantic(&c.hex, 0.4, "most-frequent-chromatic"))
            });

        let primary_hex = out.primary.as_ref().map(|p| p.value.clone());
        for (role, fragments) in STATUS_HINTS {
            let guess = self
                .class_hinted(samples, fragments)
                .or_else(|| hue_range(role, colors, primary_hex.as_deref()));
            if let Some(slot) = out.slot_mut(role) {
                *slot = guess;
            }
        }

        out
    }

    fn is_chromatic(&self, color: &Rgba) -> bool {
        color.is_visible() && !color.is_neutral(self.neutral_tolerance)
    }

    /// Background of the first primary or default button with a saturated fill
    fn button_primary(
        &self,
        components: &BTreeMap<ComponentKind, ComponentBlueprint>,
    ) -> Option<SemanticColor> {
        let button = components.get(&ComponentKind::Button)?;
        ["primary", "default"].iter().find_map(|variant| {
            button
                .profiles
                .iter()
                .filter(|p| p.variant.name == *variant)
                .filter_map(|p| p.background.as_deref())
                .find(|hex| Rgba::parse(hex).is_some_and(|c| self.is_chromatic(&c)))
                .map(|hex| semantic(hex, 0.9, "button-background"))
        })
    }

    /// Most common saturated text color of anchors
    fn link_color(&self, samples: &[StyleSample]) -> Option<SemanticColor> {
        mode(
            samples
                .iter()
                .filter(|s| s.tag == "a")
                .filter_map(|s| s.color)
                .filter(|c| self.is_chromatic(c)),
        )
        .map(|hex| semantic(&hex, 0.8, "anchor-text"))
    }

    fn class_hinted(&self, samples: &[StyleSample], fragments: &[&str]) -> Option<SemanticColor> {
        let hinted: Vec<&StyleSample> = samples
            .iter()
            .filter(|s| fragments.iter().any(|f| s.has_class_fragment(f)))
            .collect();

        mode(
            hinted
                .iter()
                .filter_map(|s| s.color)
                .filter(|c| self.is_chromatic(c)),
        )
        .map(|hex| semantic(&hex, 0.7, "class-hint-text"))
        .or_else(|| {
            mode(
                hinted
                    .iter()
                    .filter_map(|s| s.background)
                    .filter(|c| self.is_chromatic(c)),
            )
            .map(|hex| semantic(&hex, 0.6, "class-hint-background"))
        })
    }
}

/// Most frequent chromatic color whose hue family suits the role
fn hue_range(role: &str, colors: &ColorSection, primary: Option<&str>) -> Option<SemanticColor> {
    let (_, families) = STATUS_HUES.iter().find(|(r, _)| *r == role)?;
    colors
        .chromatic
        .iter()
        .filter(|c| Some(c.hex.as_str()) != primary)
        .find(|c| {
            Rgba::parse(&c.hex).is_some_and(|rgba| families.contains(&hue_family(&rgba.to_hsl())))
        })
        .map(|c| semantic(&c.hex, 0.5, "hue-range"))
}

/// Most frequent hex; ties go to the smallest hex
fn mode(colors: impl Iterator<Item = Rgba>) -> Option<String> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for color in colors {
        *counts.entry(color.to_hex()).or_default() += 1;
    }
    super::aggregate::dominant(&counts)
}

fn semantic(hex: &str, confidence: f32, rule: &str) -> SemanticColor {
    let note = Rgba::parse(hex)
        .map(|c| psychology(&c.to_hsl()))
        .unwrap_or_default();
    SemanticColor {
        value: hex.to_string(),
        confidence,
        rule: rule.to_string(),
        psychology: note.to_string(),
    }
}
