//! Parsers for uploaded equipment CSV files and persisted timestamps
//!
//! # Error Handling Strategy
//!
//! CSV ingest follows a **graceful degradation** approach:
//!
//! - **Field failures**: Numbers keep their leading numeric prefix (`3.2bar` reads as 3.2). A
//!   missing value, or one with no numeric prefix, is replaced with a safe default (`0` for
//!   numbers, `"Unknown"` for text) and recorded as a [`RowWarning`]. A malformed row never
//!   aborts the import.
//!
//! - **User feedback**: Warnings are logged and returned alongside the rows so the caller can
//!   surface how many fields were defaulted.
//!
//! - **File-level rejection** (wrong extension, empty file, oversized file) happens one layer up
//!   in [`crate::ingest`], before any text reaches this parser.

pub mod deserializers;
pub mod equipment_csv;

pub use equipment_csv::{ParsedCsv, RowWarning, WarningKind, parse_equipment_csv};
