//! Component type tags and inferred variants

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of component types the classifier knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Button,
    Input,
    Select,
    Checkbox,
    Card,
    Table,
    Navigation,
    Tabs,
    Tag,
    Alert,
    Modal,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 11] = [
        Self::Button,
        Self::Input,
        Self::Select,
        Self::Checkbox,
        Self::Card,
        Self::Table,
        Self::Navigation,
        Self::Tabs,
        Self::Tag,
        Self::Alert,
        Self::Modal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Input => "input",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Card => "card",
            Self::Table => "table",
            Self::Navigation => "navigation",
            Self::Tabs => "tabs",
            Self::Tag => "tag",
            Self::Alert => "alert",
            Self::Modal => "modal",
        }
    }

    /// PascalCase name used for generated source identifiers
    pub fn pascal_name(&self) -> &'static str {
        match self {
            Self::Button => "Button",
            Self::Input => "Input",
            Self::Select => "Select",
            Self::Checkbox => "Checkbox",
            Self::Card => "Card",
            Self::Table => "Table",
            Self::Navigation => "Navigation",
            Self::Tabs => "Tabs",
            Self::Tag => "Tag",
            Self::Alert => "Alert",
            Self::Modal => "Modal",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "nav" => return Ok(Self::Navigation),
            "badge" => return Ok(Self::Tag),
            "dialog" => return Ok(Self::Modal),
            _ => {}
        }
        Self::ALL
            .iter()
            .find(|k| k.as_str() == lower)
            .copied()
            .ok_or_else(|| {
                format!(
                    "Unknown component '{}'. Valid values: {}",
                    s,
                    Self::ALL
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

/// A best-guess variant label with the rule that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantGuess {
    pub name: String,
    /// 0.0 - 1.0
    pub confidence: f32,
    /// Name of the rule that fired, e.g. `class:outline` or `style:transparent-bordered`
    pub rule: String,
}

impl VariantGuess {
    pub fn new(name: impl Into<String>, confidence: f32, rule: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            confidence: confidence.clamp(0.0, 1.0),
            rule: rule.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_component_kind() {
        assert_eq!("button".parse::<ComponentKind>(), Ok(ComponentKind::Button));
        assert_eq!("Nav".parse::<ComponentKind>(), Ok(ComponentKind::Navigation));
        assert_eq!("badge".parse::<ComponentKind>(), Ok(ComponentKind::Tag));
        assert!("carousel".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn test_serde_kebab_case() {
        let json = serde_json::to_string(&ComponentKind::Navigation).unwrap();
        assert_eq!(json, "\"navigation\"");
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(VariantGuess::new("primary", 1.7, "x").confidence, 1.0);
    }
}
