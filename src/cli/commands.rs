use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::auth::{AuthProvider, Credentials, MockAuthProvider, SessionStore};
use crate::config::AppConfig;
use crate::history::{ActiveDataset, HistoryStore};
use crate::ingest::{IngestOptions, Upload, ingest_file};
use crate::models::{DatasetEntry, Session, SummaryStatistics};
use crate::presentation::{SortField, SortOrder, TableSort, format_value, metric_cards};
use crate::report::{ReportFormat, ReportRequest, export_report};
use crate::storage::{Storage, StorageScope};
use crate::tui::{DashboardOptions, format_timestamp, run_dashboard};
use crate::utils::{format_path_with_tilde, sanitize_cell};

#[derive(Parser)]
#[command(name = "chemvis")]
#[command(version = "0.1.0")]
#[command(about = "Chemical equipment CSV dashboard and report exporter", long_about = None)]
pub struct Cli {
    /// Directory for durable state (history, remembered sessions, log file)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for this terminal's session state
    #[arg(long, global = true, value_name = "DIR")]
    pub session_dir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with a username and password
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, default_value = "")]
        password: String,
        /// Keep the session after this terminal closes
        #[arg(long)]
        remember: bool,
    },
    /// Start a guest session without credentials
    Guest,
    /// Clear the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Summarize a CSV file without storing it
    Stats { file: PathBuf },
    /// Upload a CSV file into the history
    Upload { file: PathBuf },
    /// List retained uploads, newest first
    History {
        /// Delete every retained upload and its rows
        #[arg(long)]
        clear: bool,
    },
    /// Print the equipment table of a dataset (default: most recent)
    Show {
        id: Option<i64>,
        /// Column to sort by: name, type, flowrate, pressure, temperature
        #[arg(long, default_value = "name")]
        sort: SortField,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Export a dataset report as PDF or SVG (default: most recent)
    Export {
        id: Option<i64>,
        /// Output directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Report format: pdf or svg (default: config `report_format`, else pdf)
        #[arg(long)]
        format: Option<ReportFormat>,
    },
    /// Open the interactive dashboard
    Dashboard,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(dir) = &cli.session_dir {
        config.session_dir = Some(dir.clone());
    }

    init_logging(&config, cli.verbose, matches!(command, Commands::Dashboard))?;
    debug!(?config, "Loaded configuration");

    let ctx = CliContext::open(config)?;
    match command {
        Commands::Login { username, password, remember } => {
            ctx.login(username, password, *remember)
        }
        Commands::Guest => ctx.guest(),
        Commands::Logout => ctx.logout(),
        Commands::Whoami => ctx.whoami(),
        Commands::Stats { file } => ctx.stats(file),
        Commands::Upload { file } => ctx.upload(file),
        Commands::History { clear } => ctx.history(*clear),
        Commands::Show { id, sort, desc } => {
            let order = if *desc { SortOrder::Desc } else { SortOrder::Asc };
            ctx.show(*id, TableSort::new(*sort, order))
        }
        Commands::Export { id, out, format } => ctx.export(*id, out.as_deref(), *format),
        Commands::Dashboard => ctx.dashboard(),
    }
}

/// Stderr for one-shot commands; the log file while the dashboard owns the terminal
fn init_logging(config: &AppConfig, verbose: bool, to_file: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = if to_file {
        let path = config.log_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init()
    };

    // A subscriber installed earlier in the process keeps receiving events
    if let Err(e) = installed {
        debug!("Logging already initialised, keeping the existing subscriber: {}", e);
    }
    Ok(())
}

/// Config plus the storage it points at, shared by every command
struct CliContext {
    config: AppConfig,
    storage: Storage,
}

impl CliContext {
    fn open(config: AppConfig) -> Result<Self> {
        let storage = Storage::open(&config.store_dir()?, &config.session_dir());
        Ok(Self { config, storage })
    }

    fn provider(&self) -> MockAuthProvider {
        MockAuthProvider::with_latency(self.config.auth_latency())
    }

    fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            max_bytes: self.config.max_upload_bytes,
            read_timeout: self.config.read_timeout(),
        }
    }

    fn history_store(&self) -> HistoryStore {
        HistoryStore::open(self.storage.clone(), self.config.history_capacity)
    }

    fn require_session(&self) -> Result<Session> {
        let mut sessions = SessionStore::new(self.storage.clone());
        self.provider()
            .restore_session(&mut sessions)
            .ok_or_else(|| anyhow!("Not signed in. Run `chemvis login` or `chemvis guest` first"))
    }

    fn login(&self, username: &str, password: &str, remember: bool) -> Result<()> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
            remember,
        };
        let session = self.provider().login(&credentials)?;
        self.establish(session)
    }

    fn guest(&self) -> Result<()> {
        self.establish(self.provider().guest())
    }

    fn establish(&self, session: Session) -> Result<()> {
        let mut sessions = SessionStore::new(self.storage.clone());
        let session = sessions.establish(session)?;
        println!(
            "Signed in as {} ({})",
            sanitize_cell(&session.user.username),
            scope_label(session)
        );
        Ok(())
    }

    fn logout(&self) -> Result<()> {
        SessionStore::new(self.storage.clone()).logout()?;
        println!("Signed out");
        Ok(())
    }

    fn whoami(&self) -> Result<()> {
        let mut sessions = SessionStore::new(self.storage.clone());
        match self.provider().restore_session(&mut sessions) {
            Some(session) => {
                let role = if session.user.is_guest { "guest" } else { "operator" };
                println!(
                    "{} [{}] id {} ({})",
                    sanitize_cell(&session.user.username),
                    role,
                    session.user.id,
                    scope_label(&session)
                );
            }
            None => println!("Not signed in"),
        }
        Ok(())
    }

    fn stats(&self, file: &Path) -> Result<()> {
        let upload = ingest_file(file, &self.ingest_options())?;
        print_upload(&upload);
        Ok(())
    }

    fn upload(&self, file: &Path) -> Result<()> {
        self.require_session()?;
        let upload = ingest_file(file, &self.ingest_options())?;
        print_upload(&upload);

        let mut history = self.history_store();
        let entries = history.record(upload.entry, upload.rows)?;
        if let Some(recorded) = entries.first() {
            println!();
            println!("Stored as dataset {} ({} retained)", recorded.id, entries.len());
        }
        Ok(())
    }

    fn history(&self, clear: bool) -> Result<()> {
        self.require_session()?;
        let mut history = self.history_store();
        if clear {
            let removed = history.entries().len();
            history.clear()?;
            println!("Cleared {} upload(s)", removed);
            return Ok(());
        }
        if history.is_empty() {
            println!("No uploads yet");
            return Ok(());
        }

        println!("{:<15} {:<22} {:>6}  File", "ID", "Uploaded", "Units");
        for entry in history.entries() {
            println!(
                "{:<15} {:<22} {:>6}  {}",
                entry.id,
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.summary.total_equipment_count,
                sanitize_cell(&entry.filename)
            );
        }
        println!();
        println!("{}/{} retained", history.entries().len(), history.capacity());
        Ok(())
    }

    fn dataset(&self, id: Option<i64>) -> Result<ActiveDataset> {
        let mut history = self.history_store();
        let active = match id {
            Some(id) => history.select(id).cloned(),
            None => history.active().cloned(),
        };
        active.ok_or_else(|| match id {
            Some(id) => anyhow!("No dataset {} in history", id),
            None => anyhow!("No uploads yet. Run `chemvis upload <file>` first"),
        })
    }

    fn show(&self, id: Option<i64>, sort: TableSort) -> Result<()> {
        self.require_session()?;
        let dataset = self.dataset(id)?;

        println!(
            "{} · uploaded {}",
            sanitize_cell(&dataset.entry.filename),
            format_timestamp(&dataset.entry.timestamp)
        );
        println!();

        let header = |field: SortField| {
            format!("{}{}", field.header(), sort.indicator(field).unwrap_or(""))
        };
        println!(
            "{:<20} {:<14} {:>17} {:>16} {:>18}",
            header(SortField::Name),
            header(SortField::Type),
            header(SortField::Flowrate),
            header(SortField::Pressure),
            header(SortField::Temperature)
        );
        for record in sort.apply(&dataset.rows) {
            println!(
                "{:<20} {:<14} {:>17} {:>16} {:>18}",
                sanitize_cell(&record.equipment_name),
                sanitize_cell(&record.equipment_type),
                format_value(record.flowrate),
                format_value(record.pressure),
                format_value(record.temperature)
            );
        }
        if dataset.rows.is_empty() {
            println!("(rows unavailable)");
        }
        Ok(())
    }

    fn export(
        &self,
        id: Option<i64>,
        out: Option<&Path>,
        format: Option<ReportFormat>,
    ) -> Result<()> {
        let session = self.require_session()?;
        let dataset = self.dataset(id)?;
        if dataset.rows.is_empty() {
            bail!("Dataset {} has no rows to export", dataset.entry.id);
        }

        let out_dir = out.map(Path::to_path_buf).unwrap_or_else(|| self.config.report_dir());
        let request = ReportRequest {
            entry: dataset.entry,
            rows: dataset.rows,
            operator: Some(session.user.username),
        };
        let format = format.unwrap_or(self.config.report_format);
        let path = export_report(request, &out_dir, format, self.config.export_timeout())
            .context("Failed to export report")?;

        println!("Report written to {}", format_path_with_tilde(&path));
        Ok(())
    }

    fn dashboard(self) -> Result<()> {
        let options = DashboardOptions {
            ingest: self.ingest_options(),
            report_dir: self.config.report_dir(),
            report_format: self.config.report_format,
            export_timeout: self.config.export_timeout(),
        };
        let history = self.history_store();
        let sessions = SessionStore::new(self.storage.clone());

        run_dashboard(Box::new(self.provider()), sessions, history, options)
    }
}

fn scope_label(session: &Session) -> &'static str {
    match session.scope {
        StorageScope::Durable => "remembered",
        StorageScope::Session => "this terminal only",
    }
}

fn print_upload(upload: &Upload) {
    print_summary(&upload.entry, &upload.entry.summary);

    if !upload.warnings.is_empty() {
        warn!(count = upload.warnings.len(), "Fields defaulted while parsing");
        println!();
        println!("Warnings ({}):", upload.warnings.len());
        for warning in &upload.warnings {
            println!("  {}", sanitize_cell(&warning.to_string()));
        }
    }
}

fn print_summary(entry: &DatasetEntry, summary: &SummaryStatistics) {
    println!("Equipment Summary: {}", sanitize_cell(&entry.filename));
    println!("================================");
    for card in metric_cards(summary) {
        println!("{}: {}", card.title, card.value);
    }

    println!();
    println!("Distribution by type:");
    for (kind, count) in &summary.distribution_by_type {
        let kind = if kind.is_empty() { "(blank)".into() } else { sanitize_cell(kind) };
        println!("  {}: {}", kind, count);
    }
}
