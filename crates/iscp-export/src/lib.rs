//! Output writers for iscp
//!
//! This crate provides:
//! - Spreadsheet export of a masked dataset
//! - The static architecture diagram and project README
//! - Release archive creation

pub mod archive;
pub mod docs;
pub mod error;
pub mod spreadsheet;

pub use archive::build_archive;
pub use docs::{ARCHITECTURE_DIAGRAM, ReadmeContext, render_readme, write_diagram, write_readme};
pub use error::{ExportError, Result};
pub use spreadsheet::write_xlsx;
