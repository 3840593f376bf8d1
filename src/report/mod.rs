//! Report export
//!
//! [`layout::layout_report`] turns the active dataset into a paginated [`document::Document`];
//! [`pdf::render_pdf`] draws it as one PDF page per document page, [`svg::render_svg`] as a
//! single SVG with the pages stacked. [`export_report`] runs layout and rendering off the
//! calling thread under a timeout and writes `CHEMVIS_Report_<id>.<pdf|svg>` atomically.

pub mod document;
pub mod layout;
pub mod pdf;
pub mod svg;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::models::{DatasetEntry, EquipmentRecord};
use crate::utils::run_with_timeout;

pub use layout::{layout_report, report_filename};
pub use pdf::render_pdf;
pub use svg::render_svg;

/// Output file format of an exported report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Paginated PDF, one A4 page per report page
    #[default]
    Pdf,
    /// One SVG canvas with the pages stacked
    Svg,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Svg => "svg",
        }
    }

    fn render(self, doc: &document::Document) -> Result<Vec<u8>, ReportError> {
        match self {
            ReportFormat::Pdf => render_pdf(doc),
            ReportFormat::Svg => render_svg(doc).map(String::into_bytes),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ReportFormat::Pdf),
            "svg" => Ok(ReportFormat::Svg),
            other => Err(format!("unknown report format '{}' (expected pdf or svg)", other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to render report: {0}")]
    Render(String),

    #[error("Failed to write report {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Report export timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),
}

/// Everything a report shows, owned so export can run on a worker thread
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub entry: DatasetEntry,
    pub rows: Vec<EquipmentRecord>,
    /// Username printed in the header; `GUEST` when absent
    pub operator: Option<String>,
}

/// Lay out, render and write the report into `out_dir`, returning the file path
///
/// A worker that outlives the timeout may still finish writing the file later.
pub fn export_report(
    request: ReportRequest,
    out_dir: &Path,
    format: ReportFormat,
    timeout: Duration,
) -> Result<PathBuf, ReportError> {
    let path = out_dir.join(report_filename(request.entry.id, format));
    let target = path.clone();
    let rows = request.rows.len();

    debug!(id = request.entry.id, rows, %format, "Exporting report");
    let written = run_with_timeout(timeout, move || -> Result<usize, ReportError> {
        let doc = layout_report(&request);
        let bytes = format.render(&doc)?;
        write_atomic(&target, &bytes)?;
        Ok(doc.page_count())
    })
    .unwrap_or(Err(ReportError::Timeout(timeout)))?;

    info!(path = %path.display(), pages = written, rows, "Exported report");
    Ok(path)
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io { path: path.to_path_buf(), source };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }

    // Write atomically (temp file + rename)
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);
    fs::write(&temp, contents).map_err(io_err)?;
    fs::rename(&temp, path).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;
    use crate::analytics::summarize;

    fn request(count: u64) -> ReportRequest {
        let rows: Vec<EquipmentRecord> = (1..=count)
            .map(|id| EquipmentRecord {
                id,
                equipment_name: format!("P-{}", id),
                equipment_type: "Pump".to_string(),
                flowrate: id as f64,
                pressure: 2.0,
                temperature: 60.0,
            })
            .collect();
        let entry = DatasetEntry {
            id: 1_700_000_000_123,
            filename: "plant.csv".to_string(),
            timestamp: Utc::now(),
            summary: summarize(&rows),
        };
        ReportRequest { entry, rows, operator: None }
    }

    fn export(count: u64, out_dir: &Path, format: ReportFormat) -> Result<PathBuf, ReportError> {
        export_report(request(count), out_dir, format, Duration::from_secs(30))
    }

    #[test]
    fn test_export_writes_named_pdf_by_default() {
        let temp = TempDir::new().unwrap();
        let path = export(3, temp.path(), ReportFormat::default()).unwrap();

        assert_eq!(path.file_name().unwrap(), "CHEMVIS_Report_1700000000123.pdf");
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(!temp.path().join("CHEMVIS_Report_1700000000123.pdf.tmp").exists());
    }

    #[test]
    fn test_export_writes_named_svg() {
        let temp = TempDir::new().unwrap();
        let path = export(3, temp.path(), ReportFormat::Svg).unwrap();

        assert_eq!(path.file_name().unwrap(), "CHEMVIS_Report_1700000000123.svg");
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("CHEM-VIS ANALYSIS REPORT"));
        assert!(svg.contains("Page 2 of 2"));
        assert!(!temp.path().join("CHEMVIS_Report_1700000000123.svg.tmp").exists());
    }

    #[test]
    fn test_export_single_row() {
        let temp = TempDir::new().unwrap();
        assert!(export(1, temp.path(), ReportFormat::Pdf).unwrap().exists());
    }

    #[test]
    fn test_export_without_rows() {
        let temp = TempDir::new().unwrap();
        let path = export(0, temp.path(), ReportFormat::Svg).unwrap();
        assert!(fs::read_to_string(path).unwrap().contains("DETAILED EQUIPMENT LOG"));
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("reports").join("2024");
        assert!(export(2, &out, ReportFormat::Pdf).is_ok());
        assert!(out.is_dir());
    }

    #[test]
    fn test_export_into_file_path_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let err = export(2, &blocker, ReportFormat::Pdf).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("pdf".parse::<ReportFormat>(), Ok(ReportFormat::Pdf));
        assert_eq!("SVG".parse::<ReportFormat>(), Ok(ReportFormat::Svg));
        assert!("png".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::default().to_string(), "pdf");
    }
}
