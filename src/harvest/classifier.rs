//! Component Classifier
//!
//! A data-driven matcher table: every [`ComponentKind`] carries an ordered
//! selector list, class-name variant hints and computed-style fallback
//! rules. The first selector with any match wins; instances are capped and
//! each gets a variant guess with the rule that produced it.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::constants::aggregate::DEFAULT_NEUTRAL_TOLERANCE;
use crate::constants::classifier::{
    CLASS_HINT_CONFIDENCE, DEFAULT_VARIANT_CONFIDENCE, LIGHT_BACKGROUND_LUMINANCE,
    STYLE_RULE_CONFIDENCE,
};
use crate::snapshot::{ElementHandle, PageInspector, StyleRecord};
use crate::types::{ComponentBlueprint, ComponentKind, Rgba, StyleProfile, VariantGuess};

/// Computed-style fallback predicates, evaluated in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleRule {
    /// No visible background, visible border
    TransparentBordered,
    /// No visible background, no border
    Transparent,
    /// Saturated background color
    ChromaticBackground,
    /// Light grey background
    LightNeutralBackground,
    /// Has a box shadow
    Shadowed,
    /// Has a visible border
    Bordered,
}

impl StyleRule {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TransparentBordered => "transparent-bordered",
            Self::Transparent => "transparent",
            Self::ChromaticBackground => "chromatic-background",
            Self::LightNeutralBackground => "light-neutral-background",
            Self::Shadowed => "shadowed",
            Self::Bordered => "bordered",
        }
    }

    /// `neutral_tolerance` is the channel spread still counted as grey
    pub fn matches(&self, style: &StyleRecord, neutral_tolerance: u8) -> bool {
        let background = style.color("background-color").filter(Rgba::is_visible);
        let bordered = has_border(style);
        match self {
            Self::TransparentBordered => background.is_none() && bordered,
            Self::Transparent => background.is_none() && !bordered,
            Self::ChromaticBackground => {
                background.is_some_and(|c| !c.is_neutral(neutral_tolerance))
            }
            Self::LightNeutralBackground => background.is_some_and(|c| {
                c.is_neutral(neutral_tolerance)
                    && c.relative_luminance() >= LIGHT_BACKGROUND_LUMINANCE
                    && c != Rgba::WHITE
            }),
            Self::Shadowed => style.get("box-shadow").is_some_and(|s| s != "none"),
            Self::Bordered => bordered,
        }
    }
}

fn has_border(style: &StyleRecord) -> bool {
    let width = style
        .px("border-top-width")
        .or_else(|| style.px("border-width"))
        .unwrap_or(0.0);
    let hidden = matches!(
        style
            .get("border-top-style")
            .or_else(|| style.get("border-style")),
        Some("none" | "hidden")
    );
    let visible = style
        .color("border-top-color")
        .or_else(|| style.color("border-color"))
        .is_none_or(|c| c.is_visible());
    width > 0.0 && !hidden && visible
}

/// One row of the matcher table
#[derive(Debug, Clone, Copy)]
pub struct ComponentRule {
    pub kind: ComponentKind,
    /// Tried in order; the first with any match wins
    pub selectors: &'static [&'static str],
    /// `(class fragment, variant)`, first fragment found wins
    pub variant_hints: &'static [(&'static str, &'static str)],
    /// `(rule, variant)` fallbacks when no hint matched
    pub style_rules: &'static [(StyleRule, &'static str)],
}

const STATUS_HINTS: &[(&str, &str)] = &[
    ("success", "success"),
    ("warning", "warning"),
    ("warn", "warning"),
    ("danger", "danger"),
    ("error", "danger"),
    ("destructive", "danger"),
    ("info", "info"),
];

pub const COMPONENT_RULES: &[ComponentRule] = &[
    ComponentRule {
        kind: ComponentKind::Button,
        selectors: &[
            "button",
            "[role=button]",
            "input[type=submit]",
            "input[type=button]",
            "a.btn",
            ".btn",
        ],
        variant_hints: &[
            ("primary", "primary"),
            ("secondary", "secondary"),
            ("tertiary", "tertiary"),
            ("outline", "outline"),
            ("ghost", "ghost"),
            ("borderless", "ghost"),
            ("link", "link"),
            ("danger", "danger"),
            ("destructive", "danger"),
        ],
        style_rules: &[
            (StyleRule::TransparentBordered, "outline"),
            (StyleRule::Transparent, "ghost"),
            (StyleRule::ChromaticBackground, "primary"),
            (StyleRule::LightNeutralBackground, "secondary"),
        ],
    },
    ComponentRule {
        kind: ComponentKind::Input,
        selectors: &[
            "input[type=text]",
            "input[type=email]",
            "input[type=password]",
            "input[type=search]",
            "input[type=number]",
            "input[type=url]",
            "textarea",
        ],
        variant_hints: &[("error", "error"), ("invalid", "error"), ("borderless", "borderless")],
        style_rules: &[
            (StyleRule::Bordered, "outlined"),
            (StyleRule::LightNeutralBackground, "filled"),
        ],
    },
    ComponentRule {
        kind: ComponentKind::Select,
        selectors: &["select", "[role=combobox]", "[role=listbox]"],
        variant_hints: &[("borderless", "borderless")],
        style_rules: &[
            (StyleRule::Bordered, "outlined"),
            (StyleRule::LightNeutralBackground, "filled"),
        ],
    },
    ComponentRule {
        kind: ComponentKind::Checkbox,
        selectors: &["input[type=checkbox]", "[role=checkbox]"],
        variant_hints: &[("card", "card")],
        style_rules: &[],
    },
    ComponentRule {
        kind: ComponentKind::Card,
        selectors: &[".card", "[class*=card]", "article"],
        variant_hints: &[("elevated", "elevated"), ("shadow", "elevated"), ("bordered", "outlined")],
        style_rules: &[
            (StyleRule::Shadowed, "elevated"),
            (StyleRule::Bordered, "outlined"),
            (StyleRule::LightNeutralBackground, "filled"),
        ],
    },
    ComponentRule {
        kind: ComponentKind::Table,
        selectors: &["table", "[role=grid]", "[role=table]"],
        variant_hints: &[("striped", "striped"), ("bordered", "bordered"), ("compact", "compact")],
        style_rules: &[(StyleRule::Bordered, "bordered")],
    },
    ComponentRule {
        kind: ComponentKind::Navigation,
        selectors: &["nav", "[role=navigation]", "header ul"],
        variant_hints: &[("sidebar", "vertical"), ("vertical", "vertical"), ("navbar", "horizontal")],
        style_rules: &[(StyleRule::ChromaticBackground, "inverted")],
    },
    ComponentRule {
        kind: ComponentKind::Tabs,
        selectors: &["[role=tablist]", ".tabs", "[class*=tabs]"],
        variant_hints: &[("card", "card"), ("pill", "button"), ("line", "line")],
        style_rules: &[],
    },
    ComponentRule {
        kind: ComponentKind::Tag,
        selectors: &[".tag", ".badge", ".chip", "[class*=badge]", "[class*=tag]"],
        variant_hints: STATUS_HINTS,
        style_rules: &[
            (StyleRule::ChromaticBackground, "solid"),
            (StyleRule::Bordered, "outline"),
            (StyleRule::LightNeutralBackground, "light"),
        ],
    },
    ComponentRule {
        kind: ComponentKind::Alert,
        selectors: &["[role=alert]", ".alert", "[class*=alert]", ".notification"],
        variant_hints: STATUS_HINTS,
        style_rules: &[(StyleRule::ChromaticBackground, "colored")],
    },
    ComponentRule {
        kind: ComponentKind::Modal,
        selectors: &["[role=dialog]", "dialog", ".modal", "[class*=modal]"],
        variant_hints: &[("fullscreen", "fullscreen"), ("drawer", "drawer"), ("sidesheet", "drawer")],
        style_rules: &[(StyleRule::Shadowed, "elevated")],
    },
];

/// Look up the matcher row for a component kind
pub fn rule_for(kind: ComponentKind) -> Option<&'static ComponentRule> {
    COMPONENT_RULES.iter().find(|r| r.kind == kind)
}

/// Class hints first, then style rules, then `default`
pub fn infer_variant(
    rule: &ComponentRule,
    classes: &[String],
    style: &StyleRecord,
    neutral_tolerance: u8,
) -> VariantGuess {
    let lowered: Vec<String> = classes.iter().map(|c| c.to_ascii_lowercase()).collect();
    for (fragment, variant) in rule.variant_hints {
        if lowered.iter().any(|c| c.contains(fragment)) {
            return VariantGuess::new(*variant, CLASS_HINT_CONFIDENCE, format!("class:{}", fragment));
        }
    }

    for (style_rule, variant) in rule.style_rules {
        if style_rule.matches(style, neutral_tolerance) {
            return VariantGuess::new(
                *variant,
                STYLE_RULE_CONFIDENCE,
                format!("style:{}", style_rule.name()),
            );
        }
    }

    VariantGuess::new("default", DEFAULT_VARIANT_CONFIDENCE, "default")
}

pub struct ComponentClassifier {
    max_instances: usize,
    neutral_tolerance: u8,
}

impl ComponentClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            max_instances: config.max_instances.max(1),
            neutral_tolerance: DEFAULT_NEUTRAL_TOLERANCE,
        }
    }

    /// Use the aggregator's grey threshold for the style rules
    pub fn with_neutral_tolerance(mut self, tolerance: u8) -> Self {
        self.neutral_tolerance = tolerance;
        self
    }

    /// Classify every kind in the matcher table
    pub fn classify(&self, page: &dyn PageInspector) -> BTreeMap<ComponentKind, ComponentBlueprint> {
        COMPONENT_RULES
            .iter()
            .filter_map(|rule| {
                self.classify_kind(page, rule)
                    .map(|blueprint| (rule.kind, blueprint))
            })
            .collect()
    }

    /// Blueprint for one row, or `None` when nothing matched
    pub fn classify_kind(
        &self,
        page: &dyn PageInspector,
        rule: &ComponentRule,
    ) -> Option<ComponentBlueprint> {
        let (selector, handles) = rule.selectors.iter().find_map(|selector| {
            match page.query_all(selector) {
                Ok(handles) if !handles.is_empty() => Some((*selector, handles)),
                Ok(_) => None,
                Err(e) => {
                    warn!("Dropping selector for {}: {}", rule.kind, e);
                    None
                }
            }
        })?;

        let profiles: Vec<StyleProfile> = handles
            .into_iter()
            .take(self.max_instances)
            .filter_map(|handle| self.profile(page, rule, handle))
            .collect();

        if profiles.is_empty() {
            return None;
        }

        debug!(
            "{} matched '{}' ({} profiles)",
            rule.kind,
            selector,
            profiles.len()
        );
        Some(ComponentBlueprint {
            selector: selector.to_string(),
            profiles,
        })
    }

    fn profile(
        &self,
        page: &dyn PageInspector,
        rule: &ComponentRule,
        handle: ElementHandle,
    ) -> Option<StyleProfile> {
        let style = match page.computed_style(handle) {
            Ok(style) => style,
            Err(e) => {
                debug!("Skipping {} instance: {}", rule.kind, e);
                return None;
            }
        };
        let classes: Vec<String> = page
            .attribute(handle, "class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        let variant = infer_variant(rule, &classes, &style, self.neutral_tolerance);
        let visible_hex = |property: &str| {
            style
                .color(property)
                .filter(Rgba::is_visible)
                .map(|c| c.to_hex())
        };

        Some(StyleProfile {
            variant,
            background: visible_hex("background-color"),
            color: visible_hex("color"),
            border_color: if has_border(&style) {
                visible_hex("border-top-color").or_else(|| visible_hex("border-color"))
            } else {
                None
            },
            border_width_px: if has_border(&style) {
                style
                    .px("border-top-width")
                    .or_else(|| style.px("border-width"))
            } else {
                None
            },
            border_radius: style
                .get("border-radius")
                .filter(|r| *r != "0px" && *r != "0")
                .map(str::to_string),
            padding: padding_of(&style),
            font_size_px: style.px("font-size"),
            font_weight: style.get("font-weight").and_then(|w| match w {
                "normal" => Some(400),
                "bold" => Some(700),
                other => other.parse::<f32>().ok().map(|w| w.round() as u16),
            }),
            height_px: page
                .bounding_box(handle)
                .map(|rect| rect.height)
                .filter(|h| *h > 0.0),
            box_shadow: style
                .get("box-shadow")
                .filter(|s| *s != "none")
                .map(str::to_string),
            classes,
        })
    }
}

fn padding_of(style: &StyleRecord) -> Option<String> {
    let sides: Vec<&str> = ["top", "right", "bottom", "left"]
        .iter()
        .filter_map(|side| style.get(&format!("padding-{}", side)))
        .collect();
    let value = if sides.len() == 4 {
        if sides[0] == sides[2] && sides[1] == sides[3] {
            if sides[0] == sides[1] {
                sides[0].to_string()
            } else {
                format!("{} {}", sides[0], sides[1])
            }
        } else {
            sides.join(" ")
        }
    } else {
        style.get("padding")?.to_string()
    };
    (!value.split_whitespace().all(|v| v == "0px" || v == "0")).then_some(value)
}
