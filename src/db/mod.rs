//! Persistence module split across logical submodules.

mod connection;
mod tasks;

use thiserror::Error;

pub use connection::{
    migrate_if_needed, open_db, open_db_in_memory, schema_version, MigrationOutcome,
    SCHEMA_VERSION,
};
pub use tasks::{delete_task, insert_task, list_tasks, load_snapshot, mark_done};

/// Domain-level failures raised by the persistence layer. SQLite errors travel
/// as `anyhow` context chains instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Task description is required.")]
    EmptyValue,
}
