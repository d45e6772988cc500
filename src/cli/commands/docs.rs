//! Docs Command
//!
//! Render the design-system document or the HTML swatch preview.

use std::path::Path;

use crate::cli::{CommandContext, Output, read_record, write_output};
use crate::emit::{render_html, render_markdown};
use crate::tokens::TokenMapper;
use crate::types::{HarvestError, Result};

pub fn run(input: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let ctx = CommandContext::load()?;
    let record = read_record(input)?;
    let tokens = TokenMapper::new(&ctx.config.tokens).map(&record)?;

    let rendered = match format {
        "md" | "markdown" => render_markdown(&record, &tokens),
        "html" => render_html(&record, &tokens),
        other => {
            return Err(HarvestError::Config(format!(
                "Invalid format '{}'. Valid values: md, html",
                other
            )));
        }
    };
    write_output(output, &rendered)?;

    if let Some(path) = output {
        Output::new().success(&format!("Wrote {}", path.display()));
    }
    Ok(())
}
