//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Each pipeline stage receives its own section at construction time.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{aggregate, classifier, codegen, renderer, sampler, tokens};
use crate::types::{HarvestError, Result};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Element sampling limits
    pub sampler: SamplerConfig,

    /// Histogram thresholds and scale reduction
    pub aggregate: AggregateConfig,

    /// Component classification
    pub classifier: ClassifierConfig,

    /// Token naming and shade derivation
    pub tokens: TokensConfig,

    /// Generated component source
    pub codegen: CodegenConfig,

    /// External page renderer
    pub renderer: RendererConfig,

    /// Multi-page extraction
    pub crawl: CrawlConfig,

    /// Workspace layout
    pub workspace: WorkspaceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            sampler: SamplerConfig::default(),
            aggregate: AggregateConfig::default(),
            classifier: ClassifierConfig::default(),
            tokens: TokensConfig::default(),
            codegen: CodegenConfig::default(),
            renderer: RendererConfig::default(),
            crawl: CrawlConfig::default(),
            workspace: WorkspaceConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `HarvestError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.sampler.max_elements == 0 {
            return Err(HarvestError::Config(
                "sampler.max_elements must be greater than 0".to_string(),
            ));
        }

        if self.aggregate.min_color_occurrences == 0 || self.aggregate.min_spacing_repeats == 0 {
            return Err(HarvestError::Config(
                "aggregate occurrence thresholds must be at least 1".to_string(),
            ));
        }

        if self.classifier.max_instances == 0 {
            return Err(HarvestError::Config(
                "classifier.max_instances must be greater than 0".to_string(),
            ));
        }

        let t = &self.tokens;
        if !(t.hover_shift > 0.0 && t.hover_shift < t.active_shift && t.active_shift < 1.0) {
            return Err(HarvestError::Config(format!(
                "tokens shifts must satisfy 0 < hover_shift < active_shift < 1, got {} and {}",
                t.hover_shift, t.active_shift
            )));
        }
        if !(0.0..1.0).contains(&t.disabled_alpha) || t.disabled_alpha == 0.0 {
            return Err(HarvestError::Config(format!(
                "tokens.disabled_alpha must be between 0.0 and 1.0 (exclusive), got {}",
                t.disabled_alpha
            )));
        }
        if let Some(bad) = t.light_mix.iter().find(|m| !(**m > 0.0 && **m < 1.0)) {
            return Err(HarvestError::Config(format!(
                "tokens.light_mix values must be between 0.0 and 1.0 (exclusive), got {}",
                bad
            )));
        }
        if !t
            .prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(HarvestError::Config(format!(
                "tokens.prefix '{}' may only contain letters, digits, '-' and '_'",
                t.prefix
            )));
        }

        let prefix = &self.codegen.component_prefix;
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric())
            || prefix.chars().next().is_some_and(|c| !c.is_ascii_uppercase())
        {
            return Err(HarvestError::Config(format!(
                "codegen.component_prefix '{}' must be PascalCase alphanumerics",
                prefix
            )));
        }

        if self.renderer.timeout_secs == 0 {
            return Err(HarvestError::Config(
                "renderer.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Pipeline Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Elements inspected per page; larger pages are stride-subsampled
    pub max_elements: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_elements: sampler::DEFAULT_MAX_ELEMENTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Colors seen fewer times are dropped as noise
    pub min_color_occurrences: u32,

    /// Maximum RGB channel spread for a neutral color
    pub neutral_tolerance: u8,

    /// Spacing values seen fewer times are ignored
    pub min_spacing_repeats: u32,

    /// Snap distance to the spacing ladder in px
    pub spacing_tolerance_px: u32,

    pub max_shadow_buckets: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            min_color_occurrences: aggregate::DEFAULT_MIN_COLOR_OCCURRENCES,
            neutral_tolerance: aggregate::DEFAULT_NEUTRAL_TOLERANCE,
            min_spacing_repeats: aggregate::DEFAULT_MIN_SPACING_REPEATS,
            spacing_tolerance_px: aggregate::DEFAULT_SPACING_TOLERANCE_PX,
            max_shadow_buckets: aggregate::DEFAULT_MAX_SHADOW_BUCKETS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Instances sampled per component type
    pub max_instances: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_instances: classifier::DEFAULT_MAX_INSTANCES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokensConfig {
    /// CSS custom-property prefix (`--{prefix}-color-primary`)
    pub prefix: String,

    /// Lightness drop for hover (0.0 - 1.0)
    pub hover_shift: f64,

    /// Lightness drop for active (0.0 - 1.0)
    pub active_shift: f64,

    /// Alpha for disabled colors
    pub disabled_alpha: f64,

    /// Mix toward white for light-default, light-hover, light-active
    pub light_mix: [f64; 3],
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            prefix: tokens::DEFAULT_PREFIX.to_string(),
            hover_shift: tokens::DEFAULT_HOVER_SHIFT,
            active_shift: tokens::DEFAULT_ACTIVE_SHIFT,
            disabled_alpha: tokens::DEFAULT_DISABLED_ALPHA,
            light_mix: tokens::DEFAULT_LIGHT_MIX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Prefix for generated component names (`UiButton`)
    pub component_prefix: String,

    /// Run syntax checks on generated source before returning it
    pub validate_syntax: bool,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            component_prefix: codegen::DEFAULT_COMPONENT_PREFIX.to_string(),
            validate_syntax: true,
        }
    }
}

// =============================================================================
// Renderer & Crawl
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Command that prints a page snapshot as JSON, e.g. `node`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments; `{url}` is replaced with the target
    pub args: Vec<String>,

    /// Render timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: renderer::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Fixed pause between pages in milliseconds
    pub delay_ms: u64,
}

// =============================================================================
// Workspace Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Data directory (registry and projects), relative to the workspace root
    pub data_dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".harvest"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
