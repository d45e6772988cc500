//! Init Command
//!
//! Initialize a harvest workspace in the current directory.

use crate::cli::{CommandContext, Output};
use crate::config::ConfigLoader;
use crate::storage::Workspace;
use crate::storage::project::REGISTRY_FILE;
use crate::types::{HarvestError, Result};

pub fn run(force: bool) -> Result<()> {
    let root = std::env::current_dir()?;

    if ConfigLoader::is_project_initialized(&root) && !force {
        return Err(HarvestError::Config(
            "Already initialized. Use --force to overwrite.".to_string(),
        ));
    }

    let dir = ConfigLoader::init_project(&root, force)?;

    // Global config is optional; never overwrite it from here
    if let Err(e) = ConfigLoader::init_global(false) {
        tracing::debug!("Global config init skipped: {}", e);
    }

    let ctx = CommandContext::load()?;
    let workspace = Workspace::open(&ctx.root, ctx.config)?;

    let out = Output::new();
    out.success(&format!("Initialized harvest workspace in {}", dir.display()));
    out.field("Registry", workspace.data_dir().join(REGISTRY_FILE).display());
    println!();
    println!("Next steps:");
    println!("  1. harvest project create <name>");
    println!("  2. harvest extract <url> --project <name>");
    println!("     (or --snapshot <file.json> for a captured page)");

    Ok(())
}
