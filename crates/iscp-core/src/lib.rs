//! Core domain models for iscp
//!
//! This crate contains:
//! - The in-memory table (Dataset, Record, Cell)
//! - CSV loading with per-column type inference
//! - Core error types

pub mod dataset;
pub mod error;

pub use dataset::{Cell, Dataset, DatasetLoader, Record};
pub use error::{CoreError, Result};
