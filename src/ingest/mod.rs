//! File upload pipeline: validate, read, parse, summarize
//!
//! Nothing here touches stored state; the caller hands the resulting [`Upload`] to
//! [`crate::history::HistoryStore::record`].

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use crate::analytics::summarize;
use crate::config::DEFAULT_MAX_UPLOAD_BYTES;
use crate::models::{DatasetEntry, EquipmentRecord};
use crate::parsers::{RowWarning, parse_equipment_csv};
use crate::utils::{display_file_name, has_csv_extension, run_with_timeout};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Please upload a valid CSV file ({} is not a .csv file)", .0.display())]
    NotCsv(PathBuf),

    #[error("{} contains no data rows", .0.display())]
    Empty(PathBuf),

    #[error("File too large: {} ({size} bytes, max {max} bytes)", .path.display())]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Timed out reading {} after {}s", .path.display(), .timeout.as_secs_f32())]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub max_bytes: u64,
    pub read_timeout: Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { max_bytes: DEFAULT_MAX_UPLOAD_BYTES, read_timeout: Duration::from_secs(10) }
    }
}

/// A parsed upload ready to be recorded
#[derive(Debug, Clone)]
pub struct Upload {
    pub entry: DatasetEntry,
    pub rows: Vec<EquipmentRecord>,
    pub warnings: Vec<RowWarning>,
}

/// Validate and parse a CSV file from disk
///
/// The extension is checked before the file is opened. Invalid UTF-8 is replaced rather than
/// rejected.
pub fn ingest_file(path: &Path, options: &IngestOptions) -> Result<Upload, IngestError> {
    if !has_csv_extension(path) {
        return Err(IngestError::NotCsv(path.to_path_buf()));
    }

    let bytes = read_bounded(path, options)?;
    let text = String::from_utf8_lossy(&bytes);
    debug!(path = %path.display(), bytes = bytes.len(), "Read upload");

    ingest_text(&display_file_name(path), &text).map_err(|e| match e {
        IngestError::Empty(_) => IngestError::Empty(path.to_path_buf()),
        other => other,
    })
}

/// Parse already-loaded CSV text into an upload named `filename`
pub fn ingest_text(filename: &str, text: &str) -> Result<Upload, IngestError> {
    let parsed = parse_equipment_csv(text);
    if parsed.rows.is_empty() {
        return Err(IngestError::Empty(PathBuf::from(filename)));
    }

    let summary = summarize(&parsed.rows);
    let now = Utc::now();
    let entry = DatasetEntry {
        id: now.timestamp_millis(),
        filename: filename.to_string(),
        timestamp: now,
        summary,
    };

    info!(
        filename,
        rows = parsed.rows.len(),
        warnings = parsed.warnings.len(),
        "Parsed upload"
    );

    Ok(Upload { entry, rows: parsed.rows, warnings: parsed.warnings })
}

fn read_bounded(path: &Path, options: &IngestOptions) -> Result<Vec<u8>, IngestError> {
    let owned = path.to_path_buf();
    let max = options.max_bytes;

    run_with_timeout(options.read_timeout, move || read_limited(&owned, max)).unwrap_or_else(
        || Err(IngestError::Timeout { path: path.to_path_buf(), timeout: options.read_timeout }),
    )
}

fn read_limited(path: &Path, max: u64) -> Result<Vec<u8>, IngestError> {
    let io_err = |source| IngestError::Io { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(io_err)?;
    let size = file.metadata().map_err(io_err)?.len();
    if size > max {
        return Err(IngestError::TooLarge { path: path.to_path_buf(), size, max });
    }

    // The file may grow after the metadata check; never read past the limit
    let mut bytes = Vec::with_capacity(size as usize);
    file.take(max + 1).read_to_end(&mut bytes).map_err(io_err)?;
    if bytes.len() as u64 > max {
        let size = bytes.len() as u64;
        return Err(IngestError::TooLarge { path: path.to_path_buf(), size, max });
    }

    Ok(bytes)
}
