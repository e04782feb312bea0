use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use iscp_security::MaskSummary;
use serde::Serialize;
use time::OffsetDateTime;

/// A file produced by the run
#[derive(Debug, Clone, Serialize)]
pub struct OutputFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub blake3: String,
}

impl OutputFile {
    pub fn inspect(path: &Path) -> Result<Self> {
        let content =
            std::fs::read(path).with_context(|| format!("Failed to read output {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            size_bytes: content.len() as u64,
            blake3: blake3::hash(&content).to_hex().to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishSummary {
    pub url: String,
    pub initialized: bool,
    pub committed: bool,
}

/// Summary of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub columns: usize,
    pub masking: MaskSummary,
    pub outputs: Vec<OutputFile>,
    pub archive_entries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<PublishSummary>,
    #[serde(with = "time::serde::timestamp")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::timestamp")]
    pub finished_at: OffsetDateTime,
}

impl RunReport {
    pub fn output(&self, path: &Path) -> Option<&OutputFile> {
        self.outputs.iter().find(|o| o.path == path)
    }
}
