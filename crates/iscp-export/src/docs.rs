//! Static project documents: architecture diagram and README

use std::path::Path;

use crate::error::Result;

/// Mermaid flowchart of the system architecture
pub const ARCHITECTURE_DIAGRAM: &str = r#"
flowchart LR
    Client["Security Engineer (Browser)"]
    Frontend["Frontend (Next.js + Tailwind)"]
    Backend["Backend (Express + MCP)"]
    DB[(SQLite Database)]
    Services["External Services/Tools"]

    Client --> Frontend
    Frontend --> Backend
    Backend --> DB
    Backend --> Services
"#;

/// File names listed in the README contents section
#[derive(Debug, Clone)]
pub struct ReadmeContext {
    pub spreadsheet: String,
    pub diagram: String,
    pub readme: String,
}

impl Default for ReadmeContext {
    fn default() -> Self {
        Self {
            spreadsheet: "iscp_pii_dataset_cleaned.xlsx".to_string(),
            diagram: "architecture.mmd".to_string(),
            readme: "README.md".to_string(),
        }
    }
}

pub fn render_readme(ctx: &ReadmeContext) -> String {
    format!(
        r#"
# ISCP PII Project

## Overview
This project demonstrates:
- Cleaning Personally Identifiable Information (PII) from datasets
- System architecture documentation using Mermaid diagrams
- Packaged project for GitHub deployment

## Contents
- `{}` → Cleaned dataset with masked PII
- `{}` → System architecture diagram
- `{}` → Project documentation
"#,
        ctx.spreadsheet, ctx.diagram, ctx.readme
    )
}

pub fn write_diagram(path: &Path) -> Result<()> {
    std::fs::write(path, ARCHITECTURE_DIAGRAM)?;
    tracing::info!(path = %path.display(), "Wrote architecture diagram");
    Ok(())
}

pub fn write_readme(path: &Path, ctx: &ReadmeContext) -> Result<()> {
    std::fs::write(path, render_readme(ctx))?;
    tracing::info!(path = %path.display(), "Wrote README");
    Ok(())
}
