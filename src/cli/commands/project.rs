//! Project Command
//!
//! Manage registered projects.
//!
//! Usage:
//!   harvest project create "Acme Site"
//!   harvest project add acme-site harvest.json [more.json ...]
//!   harvest project list [-f json]
//!   harvest project show acme-site
//!   harvest project delete acme-site

use std::path::PathBuf;

use crate::cli::{CommandContext, Output, read_record};
use crate::types::{HarvestError, Result};

pub fn create(name: &str) -> Result<()> {
    let workspace = CommandContext::load()?.workspace()?;
    let project = workspace.create_project(name)?;

    let out = Output::new();
    out.success(&format!("Created project {}", project.slug));
    out.field("Directory", workspace.project_dir(&project).display());
    Ok(())
}

pub fn add(slug: &str, inputs: &[PathBuf]) -> Result<()> {
    let workspace = CommandContext::load()?.workspace()?;
    let out = Output::new();
    let mut added = 0;

    for input in inputs {
        let record = read_record(input)?;
        match workspace.add_harvest(slug, &record) {
            Ok((entry, summary)) => {
                added += 1;
                out.success(&format!(
                    "Added {} ({}), {} tokens, {} components",
                    input.display(),
                    entry.source,
                    summary.token_count,
                    summary.components.len()
                ));
            }
            Err(e @ HarvestError::DuplicateHarvest { .. }) => {
                out.warning(&format!("Skipped {}: {}", input.display(), e));
            }
            Err(e) => return Err(e),
        }
    }

    if added == 0 {
        out.info("Nothing new to add");
    }
    Ok(())
}

pub fn list(format: &str) -> Result<()> {
    let workspace = CommandContext::load()?.workspace()?;
    let projects = workspace.list()?;

    if format == "json" {
        let json: Vec<_> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "slug": p.project.slug,
                    "name": p.project.name,
                    "path": p.project.path,
                    "created_at": p.project.created_at,
                    "harvests": p.harvest_count,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let out = Output::new();
    if projects.is_empty() {
        out.info("No projects. Run 'harvest project create <name>' to add one.");
        return Ok(());
    }
    out.section("Projects");
    for summary in &projects {
        println!(
            "  {:<24} {:>3} harvest(s)  {}",
            summary.project.slug, summary.harvest_count, summary.project.name
        );
    }
    Ok(())
}

pub fn show(slug: &str) -> Result<()> {
    let workspace = CommandContext::load()?.workspace()?;
    let details = workspace.show(slug)?;

    let out = Output::new();
    out.header(&details.project.name);
    out.field("Slug", &details.project.slug);
    out.field("Directory", details.dir.display());
    out.field("Created", &details.project.created_at);

    out.section("Harvests");
    if details.harvests.is_empty() {
        println!("  (none)");
    }
    for harvest in &details.harvests {
        println!(
            "  {}  {:<10} {}  {}",
            &harvest.fingerprint[..harvest.fingerprint.len().min(12)],
            harvest.page_type,
            harvest.added_at,
            harvest.source
        );
    }
    Ok(())
}

pub fn delete(slug: &str, yes: bool) -> Result<()> {
    let workspace = CommandContext::load()?.workspace()?;
    let details = workspace.show(slug)?;

    if !yes {
        return Err(HarvestError::Config(format!(
            "Refusing to delete {} ({} harvests) without --yes",
            slug,
            details.harvests.len()
        )));
    }
    workspace.delete(slug)?;
    Output::new().success(&format!("Deleted project {}", slug));
    Ok(())
}
