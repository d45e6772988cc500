//! Status Command
//!
//! Display workspace status.

use crate::cli::{CommandContext, Output};
use crate::storage::project::REGISTRY_FILE;
use crate::types::Result;

pub fn run(format: &str, detailed: bool) -> Result<()> {
    let ctx = CommandContext::load()?;
    let json_output = format == "json";

    if !ctx.is_initialized() {
        if json_output {
            println!("{{\"status\": \"not_initialized\"}}");
        } else {
            println!("Harvest Status");
            println!("══════════════════════════════════════");
            println!("Not initialized. Run 'harvest init' first.");
        }
        // Informational only
        return Ok(());
    }

    let workspace = ctx.workspace()?;
    let projects = workspace.list()?;
    let total_harvests: usize = projects.iter().map(|p| p.harvest_count).sum();

    if json_output {
        let status = serde_json::json!({
            "status": "initialized",
            "data_dir": workspace.data_dir(),
            "projects": projects
                .iter()
                .map(|p| serde_json::json!({ "slug": p.project.slug, "harvests": p.harvest_count }))
                .collect::<Vec<_>>(),
            "harvests": total_harvests,
            "token_prefix": ctx.config.tokens.prefix,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let out = Output::new();
    println!("Harvest Status");
    println!("══════════════════════════════════════");
    out.field("Projects", projects.len());
    out.field("Harvests", total_harvests);
    out.field("Token prefix", &ctx.config.tokens.prefix);

    if !projects.is_empty() {
        println!();
        for summary in &projects {
            println!("  {:<24} {} harvest(s)", summary.project.slug, summary.harvest_count);
        }
    }

    if detailed {
        println!();
        println!("Paths:");
        out.field("Data", workspace.data_dir().display());
        out.field("Registry", workspace.data_dir().join(REGISTRY_FILE).display());
        out.field("Config", ctx.data_dir().join("config.toml").display());
        out.field(
            "Renderer",
            ctx.config.renderer.command.as_deref().unwrap_or("(not configured)"),
        );
    }

    Ok(())
}
