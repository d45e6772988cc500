//! Generate Command
//!
//! Emit React components styled with the record's tokens.
//!
//! Usage:
//!   harvest generate harvest.json button        # one component to stdout
//!   harvest generate harvest.json -o src/ui     # every detected component
//!   harvest generate harvest.json --all -o ui   # every known component kind

use std::path::Path;
use std::str::FromStr;

use crate::cli::{CommandContext, Output, read_record, write_output};
use crate::emit::ComponentGenerator;
use crate::tokens::TokenMapper;
use crate::types::{ComponentKind, HarvestError, Result};

pub struct GenerateOptions<'a> {
    pub input: &'a Path,
    pub kind: Option<&'a str>,
    pub all: bool,
    pub out_dir: &'a Path,
}

pub fn run(options: GenerateOptions<'_>) -> Result<()> {
    let ctx = CommandContext::load()?;
    let record = read_record(options.input)?;
    let tokens = TokenMapper::new(&ctx.config.tokens).map(&record)?;
    let generator = ComponentGenerator::new(&ctx.config.codegen);

    if let Some(kind) = options.kind {
        let kind = ComponentKind::from_str(kind).map_err(HarvestError::UnknownComponent)?;
        let component = generator.generate(kind, &tokens, record.components.get(&kind))?;
        return write_output(None, &component.source);
    }

    let components = generator.generate_for_record(&tokens, &record, options.all)?;
    let out = Output::new();
    if components.is_empty() {
        out.warning("No components detected; pass --all to generate every kind");
        return Ok(());
    }

    for component in &components {
        let path = options.out_dir.join(&component.file_name);
        write_output(Some(&path), &component.source)?;
        out.path(&path);
    }
    let index = options.out_dir.join("index.ts");
    write_output(Some(&index), &generator.render_index(&components)?)?;
    out.success(&format!(
        "Generated {} components in {}",
        components.len(),
        options.out_dir.display()
    ));
    Ok(())
}
