//! Config Command
//!
//! Manage harvest configuration.
//!
//! Usage:
//!   harvest config show [-g] [-f toml|json|yaml]
//!   harvest config path
//!   harvest config init [-g] [--force]

use crate::cli::{CommandContext, Output};
use crate::config::ConfigLoader;
use crate::types::{HarvestError, Result};

/// Show the merged configuration, or the raw global file
pub fn show(global: bool, format: &str) -> Result<()> {
    if global {
        match ConfigLoader::global_config_path() {
            Some(path) if path.exists() => {
                println!("# Global Config: {}\n", path.display());
                println!("{}", std::fs::read_to_string(&path)?);
            }
            Some(_) => {
                println!("No global config found.");
                println!("Run 'harvest config init --global' to create one.");
            }
            None => println!("Cannot determine global config directory."),
        }
        return Ok(());
    }

    let config = CommandContext::load()?.config;
    let rendered = match format {
        "toml" | "text" => toml::to_string_pretty(&config)
            .map_err(|e| HarvestError::Config(format!("Failed to render config: {}", e)))?,
        "json" => serde_json::to_string_pretty(&config)?,
        "yaml" => serde_yaml::to_string(&config)?,
        other => {
            return Err(HarvestError::Config(format!(
                "Invalid format '{}'. Valid values: toml, json, yaml",
                other
            )));
        }
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    let root = std::env::current_dir()?;
    let out = Output::new();

    match ConfigLoader::global_config_path() {
        Some(path) => out.field(
            "Global",
            format!(
                "{}{}",
                path.display(),
                if path.exists() { "" } else { " (missing)" }
            ),
        ),
        None => out.field("Global", "(unavailable)"),
    }
    let project = ConfigLoader::project_config_path(&root);
    out.field(
        "Project",
        format!(
            "{}{}",
            project.display(),
            if project.exists() { "" } else { " (missing)" }
        ),
    );
    out.field("Env", "HARVEST_<SECTION>__<KEY>, e.g. HARVEST_TOKENS__PREFIX");
    Ok(())
}

pub fn init(global: bool, force: bool) -> Result<()> {
    let out = Output::new();
    if global {
        let path = ConfigLoader::init_global(force)?;
        out.success("Initialized global configuration");
        out.field("Config", path.display());
    } else {
        let root = std::env::current_dir()?;
        let dir = ConfigLoader::init_project(&root, force)?;
        out.success("Initialized project configuration");
        out.field("Directory", dir.display());
        out.field("Config", ConfigLoader::project_config_path(&root).display());
    }
    Ok(())
}
