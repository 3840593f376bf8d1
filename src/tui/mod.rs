//! Interactive terminal dashboard
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use anyhow::Result;
pub use app::{App, DashboardOptions};
pub use events::{Action, InputMode, key_to_action};
pub use terminal::TerminalManager;
pub use timestamps::format_timestamp;
use tracing::info;

use crate::auth::{AuthProvider, SessionStore};
use crate::history::HistoryStore;

/// Run the dashboard until the user quits
pub fn run_dashboard(
    provider: Box<dyn AuthProvider>,
    sessions: SessionStore,
    history: HistoryStore,
    options: DashboardOptions,
) -> Result<()> {
    let mut app = App::new(provider, sessions, history, options);
    let mut manager = TerminalManager::new()?;

    info!("Dashboard started");
    let res = app.run(manager.terminal_mut());
    manager.restore()?;
    info!("Dashboard closed");

    res
}
