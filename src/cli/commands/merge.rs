//! Merge Command
//!
//! Combine harvests of several pages into one record.

use std::path::{Path, PathBuf};

use crate::cli::{CommandContext, Output, read_record, write_output};
use crate::harvest::merge_records;
use crate::types::Result;

pub fn run(inputs: &[PathBuf], output: Option<&Path>) -> Result<()> {
    let ctx = CommandContext::load()?;
    let records = inputs
        .iter()
        .map(|path| read_record(path))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_records(&records, &ctx.config.aggregate)?;
    write_output(output, &serde_json::to_string_pretty(&merged)?)?;

    if let Some(path) = output {
        Output::new().success(&format!(
            "Merged {} harvests ({} elements sampled) into {}",
            records.len(),
            merged.metadata.sampled_elements,
            path.display()
        ));
    }
    Ok(())
}
