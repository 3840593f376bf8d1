//! Dashboard application state and event handling.
//!
//! The `App` owns the session store, history store and every piece of screen state, and runs
//! the event loop via `run()`. Two screens exist:
//!
//! - **Login**: username/password form with a "remember me" toggle and a guest shortcut
//! - **Dashboard**: history sidebar, analytics and table tabs, upload prompt and report export
//!
//! Errors surface either as a modal [`Alert`] (rejected uploads, failed exports) or as a
//! transient [`StatusMessage`] toast.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{error, info};

use super::events::{Action, InputMode, poll_event};
use super::rendering::{DashboardView, LoginView, RenderState, ScreenView, render_ui};
use crate::auth::{AuthProvider, Credentials, SessionStore};
use crate::history::HistoryStore;
use crate::ingest::{IngestOptions, ingest_file};
use crate::models::Session;
use crate::presentation::{SortField, TableSort};
use crate::report::{ReportFormat, ReportRequest, export_report};
use crate::utils::format_path_with_tilde;

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Rows scrolled by PgUp/PgDn in the equipment table
const TABLE_PAGE: usize = 10;
const MAX_INPUT_LEN: usize = 256;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    /// Finished, but with something the user should check
    Warning,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Blocking message that stays up until dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analytics,
    Table,
}

impl Tab {
    fn toggled(self) -> Self {
        match self {
            Tab::Analytics => Tab::Table,
            Tab::Table => Tab::Analytics,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub remember: bool,
    pub focus: LoginField,
    pub error: Option<String>,
}

impl LoginForm {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }
}

/// Where uploads come from and where reports go
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub ingest: IngestOptions,
    pub report_dir: PathBuf,
    pub report_format: ReportFormat,
    pub export_timeout: Duration,
}

pub struct App {
    provider: Box<dyn AuthProvider>,
    sessions: SessionStore,
    history: HistoryStore,
    options: DashboardOptions,
    screen: Screen,
    login: LoginForm,
    tab: Tab,
    selected_idx: usize,
    table_sort: TableSort,
    table_offset: usize,
    upload_prompt: Option<String>,
    alert: Option<Alert>,
    status_message: Option<StatusMessage>,
    /// Set while an export is queued; the export runs after the busy frame is drawn
    pending_export: bool,
    should_quit: bool,
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    /// Build the app, rehydrating any stored session
    pub fn new(
        provider: Box<dyn AuthProvider>,
        mut sessions: SessionStore,
        history: HistoryStore,
        options: DashboardOptions,
    ) -> Self {
        let screen = match provider.restore_session(&mut sessions) {
            Some(_) => Screen::Dashboard,
            None => Screen::Login,
        };

        Self {
            provider,
            sessions,
            history,
            options,
            screen,
            login: LoginForm::default(),
            tab: Tab::default(),
            selected_idx: 0,
            table_sort: TableSort::default(),
            table_offset: 0,
            upload_prompt: None,
            alert: None,
            status_message: None,
            pending_export: false,
            should_quit: false,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    fn input_mode(&self) -> InputMode {
        if self.alert.is_some() {
            InputMode::Alert
        } else if self.screen == Screen::Login {
            InputMode::Login
        } else if self.upload_prompt.is_some() {
            InputMode::Prompt
        } else {
            InputMode::Dashboard
        }
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn toast_success(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Success, STATUS_SUCCESS_DURATION_MS);
    }

    fn toast_warning(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Warning, STATUS_ERROR_DURATION_MS);
    }

    fn toast_error(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Error, STATUS_ERROR_DURATION_MS);
    }

    fn show_alert(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.alert = Some(Alert { title: title.into(), message: message.into() });
        self.needs_redraw = true;
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        let should_clear = self
            .status_message
            .as_ref()
            .map(|msg| Instant::now() >= msg.expires_at)
            .unwrap_or(false);
        if should_clear {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.check_and_clear_expired_status();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                terminal.draw(|f| render_ui(f, &self.render_state()))?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            if self.pending_export {
                self.run_export();
                continue;
            }

            let action = poll_event(Duration::from_millis(100), self.input_mode())?;
            self.handle_action(action);
        }

        Ok(())
    }

    fn render_state(&self) -> RenderState<'_> {
        let screen = match (self.screen, self.sessions.current()) {
            (Screen::Dashboard, Some(session)) => ScreenView::Dashboard(DashboardView {
                user: &session.user,
                history: self.history.entries(),
                capacity: self.history.capacity(),
                selected_idx: self.selected_idx,
                active: self.history.active(),
                tab: self.tab,
                sort: self.table_sort,
                table_offset: self.table_offset,
                upload_prompt: self.upload_prompt.as_deref(),
                busy: self.pending_export.then_some("Building report…"),
            }),
            _ => ScreenView::Login(LoginView { form: &self.login }),
        };

        RenderState {
            screen,
            alert: self.alert.as_ref(),
            status_message: self.status_message.as_ref(),
        }
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        if action == Action::Quit {
            self.should_quit = true;
            return;
        }

        match self.input_mode() {
            InputMode::Alert => {
                if action == Action::Cancel {
                    self.alert = None;
                    self.needs_redraw = true;
                }
            }
            InputMode::Login => self.handle_login_action(action),
            InputMode::Prompt => self.handle_prompt_action(action),
            InputMode::Dashboard => self.handle_dashboard_action(action),
        }
    }

    fn handle_login_action(&mut self, action: Action) {
        match action {
            Action::Input(c) => {
                let field = self.login.focused_mut();
                if field.len() < MAX_INPUT_LEN {
                    field.push(c);
                }
            }
            Action::DeleteChar => {
                self.login.focused_mut().pop();
            }
            Action::NextField => {
                self.login.focus = match self.login.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            Action::ToggleRemember => self.login.remember = !self.login.remember,
            Action::Submit => self.submit_login(),
            Action::Guest => {
                let session = self.provider.guest();
                self.start_session(session);
            }
            _ => return,
        }
        self.needs_redraw = true;
    }

    fn submit_login(&mut self) {
        let credentials = Credentials {
            username: self.login.username.clone(),
            password: self.login.password.clone(),
            remember: self.login.remember,
        };

        match self.provider.login(&credentials) {
            Ok(session) => self.start_session(session),
            Err(e) => self.login.error = Some(e.to_string()),
        }
    }

    fn start_session(&mut self, session: Session) {
        match self.sessions.establish(session) {
            Ok(session) => {
                let greeting = format!("✓ Signed in as {}", session.user.username);
                self.screen = Screen::Dashboard;
                self.login = LoginForm::default();
                self.selected_idx = 0;
                self.toast_success(greeting);
            }
            Err(e) => {
                error!("Failed to persist session: {:#}", e);
                self.login.error = Some(format!("Unable to save session: {}", e));
            }
        }
    }

    fn handle_prompt_action(&mut self, action: Action) {
        let Some(input) = self.upload_prompt.as_mut() else {
            return;
        };

        match action {
            Action::Input(c) => {
                if input.len() < MAX_INPUT_LEN * 4 {
                    input.push(c);
                }
            }
            Action::DeleteChar => {
                input.pop();
            }
            Action::Cancel => self.upload_prompt = None,
            Action::Submit => {
                let path = expand_tilde(input.trim());
                self.upload_prompt = None;
                if !path.as_os_str().is_empty() {
                    self.upload(path);
                }
            }
            _ => return,
        }
        self.needs_redraw = true;
    }

    fn upload(&mut self, path: PathBuf) {
        let upload = match ingest_file(&path, &self.options.ingest) {
            Ok(upload) => upload,
            Err(e) => {
                error!("Upload rejected: {}", e);
                self.show_alert("Upload failed", e.to_string());
                return;
            }
        };

        let filename = upload.entry.filename.clone();
        let row_count = upload.rows.len();
        let warnings = upload.warnings.len();

        let recorded = self.history.record(upload.entry, upload.rows).map(|_| ());
        if let Err(e) = recorded {
            error!("Failed to record upload: {:#}", e);
            self.show_alert("Upload failed", format!("{:#}", e));
            return;
        }

        self.selected_idx = 0;
        self.table_offset = 0;
        if warnings > 0 {
            self.toast_warning(format!(
                "⚠ Loaded {} ({} rows, {} fields defaulted)",
                filename, row_count, warnings
            ));
        } else {
            self.toast_success(format!("✓ Loaded {} ({} rows)", filename, row_count));
        }
    }

    fn handle_dashboard_action(&mut self, action: Action) {
        match action {
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::PageUp => self.scroll_table(-(TABLE_PAGE as isize)),
            Action::PageDown => self.scroll_table(TABLE_PAGE as isize),
            Action::Submit => self.open_selected(),
            Action::SwitchTab => {
                self.tab = self.tab.toggled();
                self.needs_redraw = true;
            }
            Action::SortColumn(column) => {
                if let Some(field) = SortField::from_column(column) {
                    self.table_sort.select(field);
                    self.table_offset = 0;
                    self.needs_redraw = true;
                }
            }
            Action::StartUpload => {
                self.upload_prompt = Some(String::new());
                self.needs_redraw = true;
            }
            Action::Export => self.queue_export(),
            Action::Logout => self.logout(),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let total = self.history.entries().len();
        if total == 0 {
            self.selected_idx = 0;
            return;
        }

        let old_idx = self.selected_idx;
        let new_idx = (self.selected_idx as isize + delta).max(0) as usize;
        self.selected_idx = new_idx.min(total - 1);

        if old_idx != self.selected_idx {
            self.needs_redraw = true;
        }
    }

    fn scroll_table(&mut self, delta: isize) {
        let rows = self.history.active().map_or(0, |a| a.rows.len());
        let max_offset = rows.saturating_sub(1);
        let new_offset = (self.table_offset as isize + delta).max(0) as usize;
        self.table_offset = new_offset.min(max_offset);
        self.needs_redraw = true;
    }

    fn open_selected(&mut self) {
        let Some(id) = self.history.entries().get(self.selected_idx).map(|e| e.id) else {
            return;
        };

        match self.history.select(id) {
            Some(active) if active.rows.is_empty() => {
                let name = active.entry.filename.clone();
                self.toast_error(format!("✗ Rows for {} are unavailable", name));
            }
            Some(_) => {}
            None => self.toast_error("✗ Dataset is no longer in history"),
        }
        self.table_offset = 0;
        self.needs_redraw = true;
    }

    fn queue_export(&mut self) {
        match self.history.active() {
            None => self.toast_error("✗ Upload or select a dataset first"),
            Some(active) if active.rows.is_empty() => {
                self.toast_error("✗ Active dataset has no rows to export")
            }
            Some(_) => {
                self.pending_export = true;
                self.needs_redraw = true;
            }
        }
    }

    /// Export the active dataset; the busy flag is cleared on every path
    fn run_export(&mut self) {
        self.pending_export = false;
        self.needs_redraw = true;

        let Some(active) = self.history.active() else {
            return;
        };
        let request = ReportRequest {
            entry: active.entry.clone(),
            rows: active.rows.clone(),
            operator: self.sessions.current().map(|s| s.user.username.clone()),
        };

        let DashboardOptions { report_dir, report_format, export_timeout, .. } = &self.options;
        match export_report(request, report_dir, *report_format, *export_timeout) {
            Ok(path) => {
                info!(path = %path.display(), "Report exported from dashboard");
                self.toast_success(format!("✓ Report saved to {}", format_path_with_tilde(&path)));
            }
            Err(e) => {
                error!("Report export failed: {}", e);
                self.show_alert("Export failed", format!("Failed to export report: {}", e));
            }
        }
    }

    fn logout(&mut self) {
        if let Err(e) = self.sessions.logout() {
            error!("Logout did not clear storage: {:#}", e);
            self.show_alert("Logout incomplete", format!("{:#}", e));
        }
        self.screen = Screen::Login;
        self.login = LoginForm::default();
        self.upload_prompt = None;
        self.needs_redraw = true;
    }
}

fn expand_tilde(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    use super::*;
    use crate::auth::MockAuthProvider;
    use crate::storage::{Storage, StorageScope};

    const CSV: &str = "name,type,flowrate,pressure,temperature\n\
                       P-101,Pump,10,5,80\n\
                       P-102,Pump,12.5,6,85\n\
                       V-201,Valve,5,2,60\n";

    struct Fixture {
        temp: TempDir,
        storage: Storage,
    }

    impl Fixture {
        fn new() -> Self {
            Self { temp: TempDir::new().unwrap(), storage: Storage::in_memory() }
        }

        fn app(&self) -> App {
            let options = DashboardOptions {
                ingest: IngestOptions::default(),
                report_dir: self.temp.path().join("reports"),
                report_format: ReportFormat::Pdf,
                export_timeout: Duration::from_secs(30),
            };
            App::new(
                Box::new(MockAuthProvider::new()),
                SessionStore::new(self.storage.clone()),
                HistoryStore::open(self.storage.clone(), 5),
                options,
            )
        }

        fn csv(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.temp.path().join(name);
            fs::write(&path, contents).unwrap();
            path
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::Input(c));
        }
    }

    fn signed_in(fixture: &Fixture) -> App {
        let mut app = fixture.app();
        app.handle_action(Action::Guest);
        assert_eq!(app.screen(), Screen::Dashboard);
        app
    }

    fn upload(app: &mut App, path: &std::path::Path) {
        app.handle_action(Action::StartUpload);
        type_text(app, &path.to_string_lossy());
        app.handle_action(Action::Submit);
    }

    #[test]
    fn test_starts_on_login_without_session() {
        let fixture = Fixture::new();
        let app = fixture.app();
        assert_eq!(app.screen(), Screen::Login);
        assert_eq!(app.input_mode(), InputMode::Login);
    }

    #[test]
    fn test_admin_login_with_remember() {
        let fixture = Fixture::new();
        let mut app = fixture.app();

        type_text(&mut app, "admin");
        app.handle_action(Action::NextField);
        type_text(&mut app, "admin123");
        app.handle_action(Action::ToggleRemember);
        app.handle_action(Action::Submit);

        assert_eq!(app.screen(), Screen::Dashboard);
        let session = app.sessions.current().unwrap();
        assert_eq!(session.scope, StorageScope::Durable);
        assert!(!session.user.is_guest);
        assert!(app.login.password.is_empty());
    }

    #[test]
    fn test_wrong_password_shows_inline_error() {
        let fixture = Fixture::new();
        let mut app = fixture.app();

        type_text(&mut app, "admin");
        app.handle_action(Action::NextField);
        type_text(&mut app, "wrong");
        app.handle_action(Action::Submit);

        assert_eq!(app.screen(), Screen::Login);
        assert_eq!(
            app.login.error.as_deref(),
            Some("Invalid username or password. Please try again.")
        );
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_session_restored_on_start() {
        let fixture = Fixture::new();
        let _first = signed_in(&fixture);

        let second = fixture.app();
        assert_eq!(second.screen(), Screen::Dashboard);
    }

    #[test]
    fn test_upload_records_and_activates() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);
        let path = fixture.csv("plant.csv", CSV);

        upload(&mut app, &path);

        assert!(app.alert.is_none());
        assert_eq!(app.history.entries().len(), 1);
        let active = app.history.active().unwrap();
        assert_eq!(active.entry.filename, "plant.csv");
        assert_eq!(active.rows.len(), 3);
        assert_eq!(app.status_message.as_ref().unwrap().message_type, MessageType::Success);
    }

    #[test]
    fn test_upload_with_defaulted_fields_warns() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);
        let path = fixture.csv("dirty.csv", "Name,Type,F,P,T\nP-1,Pump,abc,5,80\n");

        upload(&mut app, &path);

        assert_eq!(app.history.entries().len(), 1);
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.message_type, MessageType::Warning);
        assert_eq!(status.text, "⚠ Loaded dirty.csv (1 rows, 1 fields defaulted)");
    }

    #[test]
    fn test_non_csv_upload_raises_alert() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);
        let path = fixture.csv("plant.txt", CSV);

        upload(&mut app, &path);

        let alert = app.alert.as_ref().unwrap();
        assert!(alert.message.starts_with("Please upload a valid CSV file"));
        assert!(app.history.is_empty());
        assert_eq!(app.input_mode(), InputMode::Alert);

        // Only dismissal gets through while the alert is open
        app.handle_action(Action::StartUpload);
        assert!(app.upload_prompt.is_none());
        app.handle_action(Action::Cancel);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_upload_prompt_cancel() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);

        app.handle_action(Action::StartUpload);
        assert_eq!(app.input_mode(), InputMode::Prompt);
        type_text(&mut app, "abc");
        app.handle_action(Action::Cancel);

        assert!(app.upload_prompt.is_none());
        assert!(app.history.is_empty());
    }

    #[test]
    fn test_history_navigation_selects_entry() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);
        upload(&mut app, &fixture.csv("first.csv", CSV));
        upload(&mut app, &fixture.csv("second.csv", "h\nX-1,Mixer,1,1,1\n"));
        assert_eq!(app.history.active().unwrap().entry.filename, "second.csv");

        app.handle_action(Action::MoveDown);
        app.handle_action(Action::Submit);
        assert_eq!(app.history.active().unwrap().entry.filename, "first.csv");

        app.handle_action(Action::MoveDown);
        assert_eq!(app.selected_idx, 1);
    }

    #[test]
    fn test_sort_column_toggles() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);

        app.handle_action(Action::SortColumn(3));
        assert_eq!(app.table_sort.field, SortField::Flowrate);
        app.handle_action(Action::SortColumn(3));
        assert_eq!(app.table_sort.order, crate::presentation::SortOrder::Desc);
    }

    #[test]
    fn test_switch_tab() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);
        app.handle_action(Action::SwitchTab);
        assert_eq!(app.tab, Tab::Table);
        app.handle_action(Action::SwitchTab);
        assert_eq!(app.tab, Tab::Analytics);
    }

    #[test]
    fn test_table_scroll_is_bounded() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);
        upload(&mut app, &fixture.csv("plant.csv", CSV));

        app.handle_action(Action::PageDown);
        assert_eq!(app.table_offset, 2);
        app.handle_action(Action::PageUp);
        assert_eq!(app.table_offset, 0);
    }

    #[test]
    fn test_export_without_dataset_is_error_toast() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);

        app.handle_action(Action::Export);
        assert!(!app.pending_export);
        assert_eq!(app.status_message.as_ref().unwrap().message_type, MessageType::Error);
    }

    #[test]
    fn test_export_writes_report() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);
        upload(&mut app, &fixture.csv("plant.csv", CSV));

        app.handle_action(Action::Export);
        assert!(app.pending_export);
        app.run_export();

        assert!(!app.pending_export);
        let id = app.history.active().unwrap().entry.id;
        let name = format!("CHEMVIS_Report_{}.pdf", id);
        let report = fixture.temp.path().join("reports").join(name);
        assert!(fs::read(&report).unwrap().starts_with(b"%PDF-"));
        assert!(app.status_message.as_ref().unwrap().text.contains("Report saved"));
    }

    #[test]
    fn test_logout_returns_to_login_and_clears_session() {
        let fixture = Fixture::new();
        let mut app = signed_in(&fixture);

        app.handle_action(Action::Logout);
        assert_eq!(app.screen(), Screen::Login);
        assert!(fixture.app().screen() == Screen::Login);
    }

    #[test]
    fn test_quit_from_any_mode() {
        let fixture = Fixture::new();
        let mut app = fixture.app();
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_status_message_expiry() {
        let fixture = Fixture::new();
        let mut app = fixture.app();

        app.set_status("Test", MessageType::Success, 10);
        std::thread::sleep(Duration::from_millis(20));
        app.check_and_clear_expired_status();
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_status_message_kept_until_expiry() {
        let fixture = Fixture::new();
        let mut app = fixture.app();

        app.set_status("Test", MessageType::Error, STATUS_ERROR_DURATION_MS);
        app.check_and_clear_expired_status();
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_render_state_draws_each_screen() {
        let fixture = Fixture::new();
        let mut app = fixture.app();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal.draw(|f| render_ui(f, &app.render_state())).unwrap();
        app.handle_action(Action::Guest);
        upload(&mut app, &fixture.csv("plant.csv", CSV));
        terminal.draw(|f| render_ui(f, &app.render_state())).unwrap();
        app.handle_action(Action::SwitchTab);
        terminal.draw(|f| render_ui(f, &app.render_state())).unwrap();
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/tmp/a.csv"), PathBuf::from("/tmp/a.csv"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/a.csv"), home.join("a.csv"));
        }
    }
}
