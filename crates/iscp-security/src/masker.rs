use std::borrow::Cow;

use iscp_core::{Cell, Dataset};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    // Local part stops at the first '@'; the domain keeps everything after it.
    // A single trailing newline is allowed after the match and kept as-is.
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^(?P<local>[^@\n]+)@(?P<domain>.+)(?P<eol>\n?)$").unwrap();
    static ref PHONE_PATTERN: Regex = Regex::new(r"\d{6}(?P<eol>\n?)$").unwrap();
}

const EMAIL_REPLACEMENT: &str = "***@${domain}${eol}";
const PHONE_REPLACEMENT: &str = "******${eol}";

pub const DEFAULT_EMAIL_COLUMN: &str = "email";
pub const DEFAULT_PHONE_COLUMN: &str = "phone";

/// Number of values rewritten by a masking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskSummary {
    pub rows: usize,
    pub emails_masked: usize,
    pub phones_masked: usize,
}

/// Irreversible masking of the email and phone columns of a dataset
pub struct PiiMasker {
    email_column: String,
    phone_column: String,
}

impl PiiMasker {
    pub fn new() -> Self {
        Self::with_columns(DEFAULT_EMAIL_COLUMN, DEFAULT_PHONE_COLUMN)
    }

    pub fn with_columns(email_column: impl Into<String>, phone_column: impl Into<String>) -> Self {
        Self {
            email_column: email_column.into(),
            phone_column: phone_column.into(),
        }
    }

    /// `local@domain` becomes `***@domain`. Values without an `@` (or with an
    /// empty local part or domain) are returned unchanged. The split happens
    /// at the first `@`, not the last one a greedy `(.+)@(.+)` would pick.
    pub fn mask_email(value: &str) -> Cow<'_, str> {
        EMAIL_PATTERN.replace(value, EMAIL_REPLACEMENT)
    }

    /// The trailing six digits become `******`; anything shorter or not
    /// ending in six digits is returned unchanged.
    pub fn mask_phone(value: &str) -> Cow<'_, str> {
        PHONE_PATTERN.replace(value, PHONE_REPLACEMENT)
    }

    /// Mask every record. Absent columns and missing values are skipped; the
    /// row count and column set are never changed.
    pub fn mask_dataset(&self, mut dataset: Dataset) -> (Dataset, MaskSummary) {
        let email_index = dataset.column_index(&self.email_column);
        let phone_index = dataset.column_index(&self.phone_column);

        let mut summary = MaskSummary {
            rows: dataset.len(),
            ..Default::default()
        };

        if email_index.is_none() {
            tracing::debug!(column = %self.email_column, "Email column absent, skipping");
        }
        if phone_index.is_none() {
            tracing::debug!(column = %self.phone_column, "Phone column absent, skipping");
        }

        for record in dataset.records_mut() {
            if let Some(index) = email_index
                && let Some(masked) = record.get(index).and_then(|c| mask_cell(c, Self::mask_email))
            {
                record.set(index, masked);
                summary.emails_masked += 1;
            }

            if let Some(index) = phone_index
                && let Some(masked) = record.get(index).and_then(|c| mask_cell(c, Self::mask_phone))
            {
                record.set(index, masked);
                summary.phones_masked += 1;
            }
        }

        (dataset, summary)
    }
}

impl Default for PiiMasker {
    fn default() -> Self {
        Self::new()
    }
}

/// Stringify the cell and apply `mask`; `None` when nothing was replaced.
fn mask_cell(cell: &Cell, mask: fn(&str) -> Cow<'_, str>) -> Option<Cell> {
    let text = cell.to_text()?;
    match mask(&text) {
        Cow::Owned(masked) => Some(Cell::Text(masked)),
        Cow::Borrowed(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iscp_core::Record;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_email_masking() {
        assert_eq!(PiiMasker::mask_email("alice@example.com"), "***@example.com");
        assert_eq!(PiiMasker::mask_email("a.b+tag@mail.co.uk"), "***@mail.co.uk");
    }

    #[test]
    fn test_email_without_at_unchanged() {
        assert!(matches!(PiiMasker::mask_email("not-an-email"), Cow::Borrowed(_)));
        assert_eq!(PiiMasker::mask_email(""), "");
    }

    #[test]
    fn test_email_multiple_at_keeps_everything_after_first() {
        assert_eq!(PiiMasker::mask_email("a@b@c.com"), "***@b@c.com");
    }

    #[test]
    fn test_email_empty_parts_unchanged() {
        assert_eq!(PiiMasker::mask_email("@example.com"), "@example.com");
        assert_eq!(PiiMasker::mask_email("alice@"), "alice@");
    }

    #[test]
    fn test_phone_masking() {
        assert_eq!(PiiMasker::mask_phone("15551234567"), "15551******");
        assert_eq!(PiiMasker::mask_phone("+91-98765-432109"), "+91-98765-******");
        assert_eq!(PiiMasker::mask_phone("123456"), "******");
    }

    #[test]
    fn test_trailing_newline_kept() {
        assert_eq!(PiiMasker::mask_phone("5551234567\n"), "5551******\n");
        assert_eq!(PiiMasker::mask_email("alice@x.com\n"), "***@x.com\n");
        assert_eq!(PiiMasker::mask_phone("12345\n"), "12345\n");
        // Only one newline may follow the digits
        assert_eq!(PiiMasker::mask_phone("123456\n\n"), "123456\n\n");
        assert_eq!(PiiMasker::mask_email("alice@\n"), "alice@\n");
    }

    #[test]
    fn test_phone_not_masked() {
        assert_eq!(PiiMasker::mask_phone("12345"), "12345");
        assert_eq!(PiiMasker::mask_phone("555-1234"), "555-1234");
        assert_eq!(PiiMasker::mask_phone("1234567x"), "1234567x");
        assert!(matches!(PiiMasker::mask_phone("12-34-56"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_mask_dataset() {
        let ds = Dataset::new(
            vec!["name".into(), "email".into(), "phone".into()],
            vec![
                Record::new(vec![text("Alice"), text("alice@example.com"), Cell::Integer(15551234567)]),
                Record::new(vec![text("Bob"), text("bob"), Cell::Integer(12345)]),
                Record::new(vec![text("Carol"), Cell::Empty, Cell::Empty]),
            ],
        )
        .unwrap();

        let (masked, summary) = PiiMasker::new().mask_dataset(ds);

        assert_eq!(masked.len(), 3);
        assert_eq!(masked.columns(), &["name", "email", "phone"]);
        assert_eq!(
            masked.records()[0].cells(),
            &[text("Alice"), text("***@example.com"), text("15551******")]
        );
        // Unmatched values keep their original cell
        assert_eq!(
            masked.records()[1].cells(),
            &[text("Bob"), text("bob"), Cell::Integer(12345)]
        );
        assert_eq!(masked.records()[2].cells(), &[text("Carol"), Cell::Empty, Cell::Empty]);
        assert_eq!(
            summary,
            MaskSummary {
                rows: 3,
                emails_masked: 1,
                phones_masked: 1
            }
        );
    }

    #[test]
    fn test_float_phone_is_stringified() {
        let ds = Dataset::new(
            vec!["phone".into()],
            vec![Record::new(vec![Cell::Float(1234567.0)])],
        )
        .unwrap();

        // "1234567.0" does not end in six digits
        let (masked, summary) = PiiMasker::new().mask_dataset(ds);
        assert_eq!(masked.records()[0].cells(), &[Cell::Float(1234567.0)]);
        assert_eq!(summary.phones_masked, 0);
    }

    #[test]
    fn test_no_pii_columns_identity() {
        let ds = Dataset::new(
            vec!["id".into(), "city".into()],
            vec![Record::new(vec![Cell::Integer(1), text("Pune")])],
        )
        .unwrap();

        let (masked, summary) = PiiMasker::new().mask_dataset(ds.clone());

        assert_eq!(masked, ds);
        assert_eq!(summary.emails_masked + summary.phones_masked, 0);
    }

    #[test]
    fn test_custom_columns() {
        let ds = Dataset::new(
            vec!["contact_email".into()],
            vec![Record::new(vec![text("x@y.org")])],
        )
        .unwrap();

        let (masked, _) = PiiMasker::with_columns("contact_email", "mobile").mask_dataset(ds);
        assert_eq!(masked.records()[0].cells(), &[text("***@y.org")]);
    }
}
