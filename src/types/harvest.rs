//! Harvest Record
//!
//! The output of one extraction pass (or a merge of several). Produced once,
//! read many times. Every section defaults when missing so older or partial
//! files load as "not extracted" instead of failing.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use super::component::{ComponentKind, VariantGuess};
use super::error::Result;

/// Current harvest file schema version
pub const SCHEMA_VERSION: &str = "1.0";

/// Neutral ramp step keys, lightest first
pub const NEUTRAL_STEPS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Value → sample count
pub type Histogram<K> = BTreeMap<K, u32>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestRecord {
    pub metadata: HarvestMetadata,
    pub colors: ColorSection,
    pub typography: TypographySection,
    pub spacing: SpacingSection,
    pub borders: BorderSection,
    pub shadows: ShadowSection,
    #[serde(deserialize_with = "known_components")]
    pub components: BTreeMap<ComponentKind, ComponentBlueprint>,
}

/// Blueprints for component kinds this build does not know are dropped
fn known_components<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<ComponentKind, ComponentBlueprint>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut components = BTreeMap::new();
    for (name, value) in raw {
        let Ok(kind) = name.parse::<ComponentKind>() else {
            warn!("Ignoring unknown component kind '{}'", name);
            continue;
        };
        let blueprint = serde_json::from_value(value).map_err(serde::de::Error::custom)?;
        components.entry(kind).or_insert(blueprint);
    }
    Ok(components)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestMetadata {
    pub id: String,
    pub schema_version: String,
    /// Primary source URL or identifier
    pub source: String,
    /// All contributing sources (more than one after a merge)
    pub sources: Vec<String>,
    pub title: Option<String>,
    pub extracted_at: Option<DateTime<Utc>>,
    /// Free-text heuristic label, e.g. "landing" or "dashboard"
    pub page_type: String,
    pub total_elements: usize,
    pub sampled_elements: usize,
    pub skipped_elements: usize,
}

impl Default for HarvestMetadata {
    fn default() -> Self {
        Self {
            id: String::new(),
            schema_version: SCHEMA_VERSION.to_string(),
            source: String::new(),
            sources: Vec::new(),
            title: None,
            extracted_at: None,
            page_type: "unknown".to_string(),
            total_elements: 0,
            sampled_elements: 0,
            skipped_elements: 0,
        }
    }
}

// =============================================================================
// Colors
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSection {
    /// Normalized `#RRGGBB` → count
    pub background: Histogram<String>,
    pub text: Histogram<String>,
    pub border: Histogram<String>,
    /// Steps "0" (lightest) .. "9" (darkest); absent steps were not extracted
    pub neutral_scale: BTreeMap<String, String>,
    /// Chromatic colors above the occurrence threshold, most frequent first
    pub chromatic: Vec<ColorCount>,
    pub dominant_background: Option<String>,
    pub dominant_text: Option<String>,
    pub semantic: SemanticColors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCount {
    pub hex: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticColors {
    pub primary: Option<SemanticColor>,
    pub success: Option<SemanticColor>,
    pub warning: Option<SemanticColor>,
    pub danger: Option<SemanticColor>,
    pub info: Option<SemanticColor>,
    pub link: Option<SemanticColor>,
}

impl SemanticColors {
    pub const ROLES: [&'static str; 6] = ["primary", "success", "warning", "danger", "info", "link"];

    pub fn get(&self, role: &str) -> Option<&SemanticColor> {
        match role {
            "primary" => self.primary.as_ref(),
            "success" => self.success.as_ref(),
            "warning" => self.warning.as_ref(),
            "danger" => self.danger.as_ref(),
            "info" => self.info.as_ref(),
            "link" => self.link.as_ref(),
            _ => None,
        }
    }

    pub fn slot_mut(&mut self, role: &str) -> Option<&mut Option<SemanticColor>> {
        match role {
            "primary" => Some(&mut self.primary),
            "success" => Some(&mut self.success),
            "warning" => Some(&mut self.warning),
            "danger" => Some(&mut self.danger),
            "info" => Some(&mut self.info),
            "link" => Some(&mut self.link),
            _ => None,
        }
    }

    /// Iterate over populated roles in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SemanticColor)> {
        Self::ROLES
            .iter()
            .filter_map(|role| self.get(role).map(|c| (*role, c)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticColor {
    pub value: String,
    pub confidence: f32,
    /// Rule that produced the guess, e.g. `button-background`
    pub rule: String,
    pub psychology: String,
}

// =============================================================================
// Typography
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographySection {
    /// "h1" .. "h6"
    pub headings: BTreeMap<String, FontSpec>,
    pub body: Option<FontSpec>,
    /// Rounded px → count
    pub size_histogram: Histogram<u32>,
    pub family_histogram: Histogram<String>,
    /// Ascending px sizes seen often enough to count as a scale
    pub size_scale: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f32,
    pub weight: u16,
    #[serde(default)]
    pub line_height: Option<String>,
}

// =============================================================================
// Spacing, Borders, Shadows
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingSection {
    /// Rounded px → count (padding, margin and gap combined)
    pub histogram: Histogram<u32>,
    /// Subset of the canonical ladder, strictly increasing
    pub scale: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSection {
    /// Raw radius string → count
    pub radius_histogram: Histogram<String>,
    /// Named step (`extra-small`, `small`, ..., `circle`, `full`) → value
    pub radius_scale: BTreeMap<String, String>,
    /// Rounded px → count, zero widths excluded
    pub width_histogram: Histogram<u32>,
    pub dominant_width: Option<String>,
    pub dominant_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSection {
    /// Raw `box-shadow` string → count
    pub histogram: Histogram<String>,
    /// `sm` | `md` | `lg` | `xl` → bucket
    pub buckets: BTreeMap<String, ShadowBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowBucket {
    pub value: String,
    pub blur_px: f32,
    pub count: u32,
}

// =============================================================================
// Components
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentBlueprint {
    /// Selector that matched first
    pub selector: String,
    pub profiles: Vec<StyleProfile>,
}

impl ComponentBlueprint {
    /// Profiles grouped by inferred variant name
    pub fn variants(&self) -> BTreeMap<&str, Vec<&StyleProfile>> {
        let mut grouped: BTreeMap<&str, Vec<&StyleProfile>> = BTreeMap::new();
        for profile in &self.profiles {
            grouped
                .entry(profile.variant.name.as_str())
                .or_default()
                .push(profile);
        }
        grouped
    }

    /// First profile for a variant, if any
    pub fn representative(&self, variant: &str) -> Option<&StyleProfile> {
        self.profiles.iter().find(|p| p.variant.name == variant)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub variant: VariantGuess,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub border_color: Option<String>,
    #[serde(default)]
    pub border_width_px: Option<f32>,
    #[serde(default)]
    pub border_radius: Option<String>,
    #[serde(default)]
    pub padding: Option<String>,
    #[serde(default)]
    pub font_size_px: Option<f32>,
    #[serde(default)]
    pub font_weight: Option<u16>,
    #[serde(default)]
    pub height_px: Option<f32>,
    #[serde(default)]
    pub box_shadow: Option<String>,
}

// =============================================================================
// Record Operations
// =============================================================================

#[derive(Serialize)]
struct FingerprintView<'a> {
    colors: &'a ColorSection,
    typography: &'a TypographySection,
    spacing: &'a SpacingSection,
    borders: &'a BorderSection,
    shadows: &'a ShadowSection,
    components: &'a BTreeMap<ComponentKind, ComponentBlueprint>,
}

impl HarvestRecord {
    /// Load a record from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the record as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// SHA-256 over the extracted sections, ignoring metadata
    pub fn fingerprint(&self) -> Result<String> {
        let view = FingerprintView {
            colors: &self.colors,
            typography: &self.typography,
            spacing: &self.spacing,
            borders: &self.borders,
            shadows: &self.shadows,
            components: &self.components,
        };
        let bytes = serde_json::to_vec(&view)?;
        Ok(format!("{:x}", Sha256::digest(&bytes)))
    }

    /// Extracted, but most sections came back empty
    pub fn is_sparse(&self) -> bool {
        let populated = [
            !self.colors.neutral_scale.is_empty() || !self.colors.chromatic.is_empty(),
            self.typography.body.is_some() || !self.typography.headings.is_empty(),
            !self.spacing.scale.is_empty(),
            !self.borders.radius_scale.is_empty() || !self.shadows.buckets.is_empty(),
            !self.components.is_empty(),
        ];
        populated.iter().filter(|p| **p).count() < 3
    }
}
