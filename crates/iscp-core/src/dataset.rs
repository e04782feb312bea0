//! In-memory table loaded from delimited text

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{CoreError, Result};

/// A single typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing value (empty field in the source file)
    Empty,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Textual representation, `None` for missing values.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Empty => None,
            Cell::Integer(n) => Some(Cow::Owned(n.to_string())),
            Cell::Float(f) => Some(Cow::Owned(format_float(*f))),
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }
}

/// Integral floats keep a trailing `.0` so they stay distinguishable from integers.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

/// One row of the dataset, one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    cells: Vec<Cell>,
}

impl Record {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Replace the cell at `index`. Out-of-range indexes are ignored so a
    /// record can never grow a column.
    pub fn set(&mut self, index: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = cell;
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Ordered sequence of records sharing a common column set.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, checking that column names are unique and every
    /// record has exactly one cell per column.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(CoreError::DuplicateColumn(column.clone()));
            }
        }

        for (row, record) in records.iter().enumerate() {
            if record.len() != columns.len() {
                return Err(CoreError::RaggedRow {
                    row: row + 1,
                    expected: columns.len(),
                    found: record.len(),
                });
            }
        }

        Ok(Self { columns, records })
    }

    /// Load a CSV file with the default loader settings.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        DatasetLoader::new().load_path(path)
    }

    /// Load CSV content from any reader with the default loader settings.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        DatasetLoader::new().load_reader(reader)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (`row`, `column`) by column name.
    pub fn value(&self, row: usize, column: &str) -> Result<Option<&Cell>> {
        let index = self
            .column_index(column)
            .ok_or_else(|| CoreError::UnknownColumn(column.to_string()))?;
        Ok(self.records.get(row).and_then(|r| r.get(index)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// CSV loader with configurable delimiter and trimming.
pub struct DatasetLoader {
    delimiter: u8,
    trim: bool,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn load_path(&self, path: &Path) -> Result<Dataset> {
        let file = File::open(path).map_err(|source| CoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = self.load_reader(file)?;

        tracing::debug!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.columns().len(),
            "Loaded dataset"
        );

        Ok(dataset)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            // Short rows are padded below; long rows are rejected
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut raw_rows: Vec<StringRecord> = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() > columns.len() {
                return Err(CoreError::RaggedRow {
                    row: index + 1,
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            raw_rows.push(record);
        }

        let kinds: Vec<ColumnKind> = (0..columns.len())
            .map(|col| ColumnKind::infer(raw_rows.iter().map(|r| r.get(col).unwrap_or(""))))
            .collect();

        let records = raw_rows
            .iter()
            .map(|raw| {
                let cells = kinds
                    .iter()
                    .enumerate()
                    .map(|(col, kind)| kind.parse(raw.get(col).unwrap_or("")))
                    .collect();
                Record::new(cells)
            })
            .collect();

        Dataset::new(columns, records)
    }
}

/// Type shared by every non-empty value of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    /// A column is numeric only when every non-empty value is written in the
    /// canonical form of its number, so leading zeros and signs are kept.
    fn infer<'a>(values: impl Iterator<Item = &'a str>) -> Self {
        let mut kind = ColumnKind::Integer;
        let mut any = false;

        for raw in values.filter(|v| !v.is_empty()) {
            any = true;
            if kind == ColumnKind::Integer && !is_canonical_integer(raw) {
                kind = ColumnKind::Float;
            }
            if kind == ColumnKind::Float && !is_canonical_integer(raw) && !is_canonical_float(raw) {
                return ColumnKind::Text;
            }
        }

        if any { kind } else { ColumnKind::Text }
    }

    fn parse(self, raw: &str) -> Cell {
        if raw.is_empty() {
            return Cell::Empty;
        }
        match self {
            ColumnKind::Integer => raw
                .parse()
                .map(Cell::Integer)
                .unwrap_or_else(|_| Cell::Text(raw.to_string())),
            ColumnKind::Float => raw
                .parse()
                .map(Cell::Float)
                .unwrap_or_else(|_| Cell::Text(raw.to_string())),
            ColumnKind::Text => Cell::Text(raw.to_string()),
        }
    }
}

fn is_canonical_integer(raw: &str) -> bool {
    raw.parse::<i64>().is_ok_and(|n| n.to_string() == raw)
}

fn is_canonical_float(raw: &str) -> bool {
    // Rejects "inf", "NaN" and friends which f64::from_str accepts
    if !raw.bytes().all(|b| b.is_ascii_digit() || b == b'.' || b == b'-') {
        return false;
    }
    raw.parse::<f64>()
        .is_ok_and(|f| format_float(f) == raw)
}
