//! Tokens Command
//!
//! Map a harvest record onto the token vocabulary and print it as CSS or JSON.

use std::path::Path;

use crate::cli::{CommandContext, Output, read_record, write_output};
use crate::emit::{render_css, render_json};
use crate::tokens::TokenMapper;
use crate::types::{HarvestError, Result};

pub fn run(input: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let ctx = CommandContext::load()?;
    let record = read_record(input)?;
    let tokens = TokenMapper::new(&ctx.config.tokens).map(&record)?;

    let rendered = match format {
        "css" => render_css(&tokens),
        "json" => render_json(&tokens)?,
        other => {
            return Err(HarvestError::Config(format!(
                "Invalid format '{}'. Valid values: css, json",
                other
            )));
        }
    };
    write_output(output, &rendered)?;

    if let Some(path) = output {
        Output::new().success(&format!("Wrote {} tokens to {}", tokens.len(), path.display()));
    }
    Ok(())
}
