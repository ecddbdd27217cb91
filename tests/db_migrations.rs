use rusqlite::Connection;
use todo_manager::db::{
    migrate_if_needed, open_db, open_db_in_memory, schema_version, MigrationOutcome,
    SCHEMA_VERSION,
};

#[test]
fn open_db_in_memory_creates_items_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    assert!(table_exists(&conn, "items"));
}

#[test]
fn first_launch_migrates_and_second_launch_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite");

    let conn = Connection::open(&path).unwrap();
    assert_eq!(
        migrate_if_needed(&conn).unwrap(),
        MigrationOutcome::Applied {
            from: 0,
            to: SCHEMA_VERSION
        }
    );
    assert!(table_exists(&conn, "items"));
    drop(conn);

    let conn = Connection::open(&path).unwrap();
    assert_eq!(
        migrate_if_needed(&conn).unwrap(),
        MigrationOutcome::UpToDate {
            version: SCHEMA_VERSION
        }
    );
}

#[test]
fn reopening_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.sqlite");

    let conn = open_db(&path).unwrap();
    conn.execute("INSERT INTO items (done, value) VALUES (0, 'Buy milk')", [])
        .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn file_databases_use_wal_journal() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("todo.sqlite")).unwrap();

    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn newer_schema_version_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 7;").unwrap();

    assert_eq!(
        migrate_if_needed(&conn).unwrap(),
        MigrationOutcome::UpToDate { version: 7 }
    );
    assert_eq!(schema_version(&conn).unwrap(), 7);
    assert!(!table_exists(&conn, "items"));
}

fn table_exists(conn: &Connection, table_name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            )",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}
