//! PII masking and secret redaction

pub mod masker;
pub mod redactor;

pub use masker::{MaskSummary, PiiMasker};
pub use redactor::{RedactionInfo, Redactor};
