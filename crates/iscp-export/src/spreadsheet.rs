//! XLSX export

use std::path::Path;

use iscp_core::{Cell, Dataset};
use rust_xlsxwriter::{Format, FormatBorder, Workbook};

use crate::error::{ExportError, Result};

pub const SHEET_NAME: &str = "Sheet1";

const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Largest integer an Excel number (f64) holds exactly
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Write the dataset as a single worksheet: bold header row, one row per
/// record, no index column. Empty cells are left blank.
pub fn write_xlsx(dataset: &Dataset, path: &Path) -> Result<()> {
    let rows = dataset.len() + 1;
    let columns = dataset.columns().len();
    if rows > MAX_ROWS || columns > MAX_COLUMNS {
        return Err(ExportError::TooLarge {
            rows: dataset.len(),
            columns,
        });
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold().set_border(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in dataset.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header)?;
    }

    for (index, record) in dataset.records().iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, cell) in record.cells().iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Integer(n) if n.unsigned_abs() <= MAX_EXACT_INTEGER => {
                    worksheet.write_number(row, col, *n as f64)?;
                }
                Cell::Integer(n) => {
                    worksheet.write_string(row, col, n.to_string())?;
                }
                Cell::Float(f) => {
                    worksheet.write_number(row, col, *f)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
            }
        }
    }

    workbook.save(path)?;

    tracing::info!(
        path = %path.display(),
        rows = dataset.len(),
        columns,
        "Wrote spreadsheet"
    );

    Ok(())
}
