//! CHEM-VIS - Chemical equipment CSV dashboard
//!
//! This library turns equipment CSV uploads (name, type, flowrate, pressure, temperature) into
//! summary statistics, charts and a sortable table. It supports:
//!
//! - Parsing equipment CSV text with per-field defaulting and warnings
//! - A rolling upload history persisted in a key-value store
//! - A mocked login with "remember me" session persistence
//! - Exporting a paginated PDF (or SVG) report of a dataset
//! - A terminal dashboard and a command line on top of the above
//!
//! # Example
//!
//! ```
//! use chemvis::ingest_text;
//!
//! let upload = ingest_text(
//!     "plant.csv",
//!     "name,type,flowrate,pressure,temperature\nP-101,Pump,10,5,80\nV-201,Valve,5,2,60\n",
//! )?;
//! assert_eq!(upload.entry.summary.total_equipment_count, 2);
//! assert_eq!(upload.entry.summary.average_flowrate, 7.5);
//! # Ok::<(), chemvis::ingest::IngestError>(())
//! ```

pub mod analytics;
pub mod auth;
pub mod cli;
pub mod config;
pub mod history;
pub mod ingest;
pub mod models;
pub mod parsers;
pub mod presentation;
pub mod report;
pub mod storage;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use analytics::summarize;
pub use config::AppConfig;
pub use history::HistoryStore;
pub use ingest::{ingest_file, ingest_text};
pub use models::{DatasetEntry, EquipmentRecord, SummaryStatistics};
pub use parsers::parse_equipment_csv;
pub use report::{ReportFormat, export_report};
