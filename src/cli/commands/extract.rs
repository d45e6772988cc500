//! Extract Command
//!
//! Render (or load) pages, harvest them and save the record.
//!
//! Usage:
//!   harvest extract https://acme.test/ https://acme.test/pricing
//!   harvest extract --snapshot page.json -o harvest.json
//!   harvest extract https://acme.test/ --project acme

use std::path::PathBuf;

use tokio::runtime::Runtime;

use crate::cli::{CommandContext, Output};
use crate::harvest::Harvester;
use crate::snapshot::{CommandRenderer, FileSource, SnapshotSource};
use crate::types::{HarvestError, HarvestRecord, Result};

pub struct ExtractOptions {
    pub targets: Vec<String>,
    /// Targets are snapshot JSON files instead of URLs
    pub snapshot: bool,
    pub output: Option<PathBuf>,
    pub project: Option<String>,
    pub delay_ms: Option<u64>,
}

pub fn run(options: ExtractOptions) -> Result<()> {
    if options.targets.is_empty() {
        return Err(HarvestError::Config("No targets given".to_string()));
    }

    let mut ctx = CommandContext::load()?;
    if let Some(delay) = options.delay_ms {
        ctx.config.crawl.delay_ms = delay;
    }

    let source: Box<dyn SnapshotSource> = if options.snapshot {
        Box::new(FileSource::new())
    } else {
        Box::new(CommandRenderer::new(&ctx.config.renderer)?)
    };
    tracing::debug!("Using {} source", source.name());

    let harvester = Harvester::new(&ctx.config);
    let runtime = Runtime::new()?;
    let record = runtime.block_on(harvester.harvest_many(source.as_ref(), &options.targets))?;

    let out = Output::new();
    if let Some(slug) = &options.project {
        report(&out, &record);
        let workspace = ctx.workspace()?;
        let (entry, summary) = workspace.add_harvest(slug, &record)?;
        out.success(&format!(
            "Added harvest {} to project {} ({} files regenerated)",
            entry.id,
            slug,
            summary.files.len()
        ));
        return Ok(());
    }

    let path = match options.output {
        Some(path) => path,
        None if ctx.is_initialized() => ctx
            .data_dir()
            .join("harvests")
            .join(format!("{}.json", record.metadata.id)),
        None => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            return Ok(());
        }
    };
    report(&out, &record);
    record.save(&path)?;
    out.success(&format!("Saved harvest to {}", path.display()));
    Ok(())
}

fn report(out: &Output, record: &HarvestRecord) {
    let meta = &record.metadata;
    out.header(meta.title.as_deref().unwrap_or(&meta.source));
    out.field("Sources", meta.sources.len());
    out.field("Page type", &meta.page_type);
    out.field(
        "Elements",
        format!(
            "{} sampled / {} total ({} skipped)",
            meta.sampled_elements, meta.total_elements, meta.skipped_elements
        ),
    );
    out.field("Components", record.components.len());
    if record.is_sparse() {
        out.warning("Sparse extraction: several sections came back empty");
    }
}
