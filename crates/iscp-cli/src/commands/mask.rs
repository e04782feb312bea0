use anyhow::Result;
use iscp_engine::Pipeline;
use std::path::{Path, PathBuf};

use super::Context;

pub fn handle(
    ctx: &Context,
    input: PathBuf,
    output: Option<PathBuf>,
    email_column: Option<String>,
    phone_column: Option<String>,
) -> Result<()> {
    let mut config = ctx.load_config()?;

    let output = output.unwrap_or_else(|| default_output(&input));
    config.dataset.input = input;
    config.output.spreadsheet = output;
    if let Some(column) = email_column {
        config.dataset.email_column = column;
    }
    if let Some(column) = phone_column {
        config.dataset.phone_column = column;
    }

    let cleaned = Pipeline::new(config, &ctx.workdir).clean()?;

    println!("✓ Masked {} rows", cleaned.rows);
    println!("  Emails masked: {}", cleaned.masking.emails_masked);
    println!("  Phones masked: {}", cleaned.masking.phones_masked);
    println!("  Output: {}", cleaned.spreadsheet.display());

    Ok(())
}

/// `data/people.csv` -> `data/people_cleaned.xlsx`
fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    input.with_file_name(format!("{}_cleaned.xlsx", stem))
}
