use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{error, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Schema version written to `PRAGMA user_version` once the `items` table
/// exists.
pub const SCHEMA_VERSION: i64 = 1;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of checking the stored schema version on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The table was created and the version counter written.
    Applied { from: i64, to: i64 },
    /// Nothing to do; the stored version was already at or past the target.
    UpToDate { version: i64 },
}

/// Open the SQLite file at `path`, switch it to WAL and run the schema
/// migration before handing the connection out.
pub fn open_db(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database at {}", path.display()))?;
    bootstrap(conn, "file", started_at)
}

/// In-memory variant of [`open_db`], used by tests.
pub fn open_db_in_memory() -> Result<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    bootstrap(conn, "memory", started_at)
}

fn bootstrap(conn: Connection, mode: &str, started_at: Instant) -> Result<Connection> {
    let result = configure(&conn).and_then(|()| migrate_if_needed(&conn));
    match result {
        Ok(outcome) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={} migration={:?}",
                mode,
                started_at.elapsed().as_millis(),
                outcome
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error={:#}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn configure(conn: &Connection) -> Result<()> {
    // In-memory databases answer "memory" here; only files switch to WAL.
    let journal_mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "wal", |row| row.get(0))
        .context("failed to set journal mode")?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set busy timeout")?;
    info!("event=db_configure module=db status=ok journal_mode={journal_mode}");
    Ok(())
}

/// Bring the schema up to [`SCHEMA_VERSION`]. Must finish before anything
/// queries the `items` table.
pub fn migrate_if_needed(conn: &Connection) -> Result<MigrationOutcome> {
    let current = schema_version(conn)?;
    if current >= SCHEMA_VERSION {
        if current > SCHEMA_VERSION {
            warn!(
                "event=db_migrate module=db status=skipped db_version={} latest_supported={}",
                current, SCHEMA_VERSION
            );
        }
        return Ok(MigrationOutcome::UpToDate { version: current });
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .context("failed to begin migration transaction")?;
    tx.execute(
        "CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            done INTEGER NOT NULL DEFAULT 0,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create items table")?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)
        .context("failed to write schema version")?;
    tx.commit().context("failed to commit migration")?;

    info!(
        "event=db_migrate module=db status=ok from={} to={}",
        current, SCHEMA_VERSION
    );
    Ok(MigrationOutcome::Applied {
        from: current,
        to: SCHEMA_VERSION,
    })
}

/// Read `PRAGMA user_version`; SQLite reports 0 for a fresh file.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read schema version")
}
