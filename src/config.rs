//! Application configuration
//!
//! Resolution order, later wins:
//! 1. Built-in defaults
//! 2. TOML file: `--config`, else `$CHEMVIS_CONFIG`, else `<config_dir>/chemvis/config.toml`
//!    when it exists
//! 3. Environment: `CHEMVIS_DATA_DIR`, `CHEMVIS_SESSION_DIR`, `CHEMVIS_REPORT_DIR`
//! 4. Command-line flags (applied by the CLI)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::report::ReportFormat;
use crate::utils::environment::{
    default_config_path, default_report_dir, default_session_dir, get_data_dir,
};

/// Default upload size limit: 10MB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Could not determine a data directory: {0}")]
    NoDataDir(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub data_dir: Option<PathBuf>,
    pub session_dir: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    /// `pdf` (default) or `svg`
    pub report_format: ReportFormat,
    pub history_capacity: usize,
    pub max_upload_bytes: u64,
    pub read_timeout_secs: u64,
    pub export_timeout_secs: u64,
    /// Simulated latency of the mock login, 0 to disable
    pub auth_latency_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            session_dir: None,
            report_dir: None,
            report_format: ReportFormat::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            read_timeout_secs: 10,
            export_timeout_secs: 30,
            auth_latency_ms: 0,
        }
    }
}

impl AppConfig {
    /// Load from file and environment
    ///
    /// An explicitly named file must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = env::var_os("CHEMVIS_CONFIG").map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = Self::from_toml_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply `CHEMVIS_*` directory overrides from a variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        if let Some(dir) = non_empty("CHEMVIS_DATA_DIR") {
            self.data_dir = Some(dir);
        }
        if let Some(dir) = non_empty("CHEMVIS_SESSION_DIR") {
            self.session_dir = Some(dir);
        }
        if let Some(dir) = non_empty("CHEMVIS_REPORT_DIR") {
            self.report_dir = Some(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidValue("history_capacity", "must be at least 1".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue("max_upload_bytes", "must be positive".into()));
        }
        if self.read_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("read_timeout_secs", "must be positive".into()));
        }
        if self.export_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "export_timeout_secs",
                "must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_data_dir().map_err(|e| ConfigError::NoDataDir(e.to_string())),
        }
    }

    /// Durable key-value scope
    pub fn store_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join("store"))
    }

    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join("chemvis.log"))
    }

    pub fn session_dir(&self) -> PathBuf {
        self.session_dir.clone().unwrap_or_else(default_session_dir)
    }

    pub fn report_dir(&self) -> PathBuf {
        self.report_dir.clone().unwrap_or_else(default_report_dir)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_secs)
    }

    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }
}
