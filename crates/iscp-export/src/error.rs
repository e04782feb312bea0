//! Error types for iscp-export

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset too large for a worksheet: {rows} rows x {columns} columns")]
    TooLarge { rows: usize, columns: usize },

    #[error("Archive input not found: {0}")]
    MissingInput(PathBuf),

    #[error("Archive input has no file name: {0}")]
    InvalidInput(PathBuf),
}
