//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/harvestkit/config.toml)
//! 3. Project config (.harvest/config.toml)
//! 4. Environment variables (HARVEST_* prefix, `__` separates sections)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{HarvestError, Result};

/// Project directory name under the workspace root
pub const PROJECT_DIR: &str = ".harvest";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the current directory:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_in(Path::new("."))
    }

    /// Load configuration for the workspace rooted at `root`
    pub fn load_in(root: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path(root);
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // HARVEST_TOKENS__PREFIX -> tokens.prefix
        figment = figment.merge(Env::prefixed("HARVEST_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| HarvestError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| HarvestError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/harvestkit/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("harvestkit"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path(root: &Path) -> PathBuf {
        Self::project_dir(root).join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir(root: &Path) -> PathBuf {
        root.join(PROJECT_DIR)
    }

    /// Check if the workspace is initialized
    pub fn is_project_initialized(root: &Path) -> bool {
        Self::project_dir(root).exists()
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            HarvestError::Config("Cannot determine global config directory".to_string())
        })?;

        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_global_config())?;
            info!("Created global config: {}", config_path.display());
        } else {
            info!("Global config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Initialize project configuration under `root`
    pub fn init_project(root: &Path, force: bool) -> Result<PathBuf> {
        let project_dir = Self::project_dir(root);

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(project_dir.join("projects"))?;
        fs::create_dir_all(project_dir.join("harvests"))?;

        let config_path = project_dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_project_config())?;
            info!("Created project config: {}", config_path.display());
        }

        Ok(project_dir)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn default_global_config() -> String {
        r#"# harvestkit global configuration
# User-wide defaults. Settings in .harvest/config.toml override these.

version = "1.0"

[tokens]
prefix = "semi"

# Command that prints a page snapshot as JSON; {url} is substituted
[renderer]
# command = "node"
# args = ["scripts/snapshot.js", "{url}"]
timeout_secs = 60
"#
        .to_string()
    }

    fn default_project_config() -> String {
        r#"# harvestkit project configuration
# Project-specific settings that override global defaults.

version = "1.0"

[sampler]
max_elements = 1500

[aggregate]
min_color_occurrences = 2
neutral_tolerance = 12
min_spacing_repeats = 2
spacing_tolerance_px = 2
max_shadow_buckets = 5

[classifier]
max_instances = 10

[tokens]
prefix = "semi"
hover_shift = 0.08
active_shift = 0.16
disabled_alpha = 0.4
light_mix = [0.88, 0.8, 0.72]

[codegen]
component_prefix = "Ui"
validate_syntax = true

[crawl]
delay_ms = 0
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_project_layout() {
        let temp = TempDir::new().unwrap();
        ConfigLoader::init_project(temp.path(), false).unwrap();

        assert!(ConfigLoader::is_project_initialized(temp.path()));
        assert!(temp.path().join(".harvest/config.toml").exists());
        assert!(temp.path().join(".harvest/projects").is_dir());
    }

    #[test]
    fn test_default_project_config_parses() {
        let temp = TempDir::new().unwrap();
        ConfigLoader::init_project(temp.path(), false).unwrap();

        let config =
            ConfigLoader::load_from_file(&ConfigLoader::project_config_path(temp.path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[tokens]\nprefix = \"acme\"\n\n[crawl]\ndelay_ms = 250\n").unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.tokens.prefix, "acme");
        assert_eq!(config.crawl.delay_ms, 250);
        assert_eq!(config.sampler.max_elements, 1500);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[renderer]\ntimeout_secs = 0\n").unwrap();

        assert!(matches!(
            ConfigLoader::load_from_file(&path),
            Err(HarvestError::Config(_))
        ));
    }
}
