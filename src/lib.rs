//! Core library surface for the terminal to-do list manager.
//!
//! The `bin` target only wires these pieces together: resolve the config,
//! start logging, open and migrate the SQLite store, then run the TUI.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

pub use config::AppConfig;
pub use db::{open_db, open_db_in_memory, MigrationOutcome, StoreError};
pub use logging::init_logging;
pub use models::{Partition, Task, TaskSnapshot};
pub use store::TaskStore;
pub use ui::{run_app, App};
