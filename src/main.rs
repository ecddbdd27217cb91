//! Binary entry point that glues the SQLite-backed task store to the TUI.
use todo_manager::{init_logging, open_db, run_app, App, AppConfig, TaskStore};

/// Resolve paths, start logging, open the database and run the event loop.
///
/// A failed migration aborts startup here instead of leaving the UI running
/// against a table that may not exist.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_home()?;
    config.ensure_dirs()?;
    let _logger = init_logging(&config.log_level, &config.log_dir)?;

    let conn = open_db(&config.db_path)?;
    let mut app = App::new(TaskStore::new(conn));
    run_app(&mut app)
}
