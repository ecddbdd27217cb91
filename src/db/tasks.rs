use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

use super::StoreError;
use crate::models::{Partition, Task, TaskSnapshot};

/// Fetch one partition, newest first, keeping only values that contain
/// `search`. An empty search keeps everything.
pub fn list_tasks(conn: &Connection, done: bool, search: &str) -> Result<Vec<Task>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, done, value
             FROM items
             WHERE done = ?1 AND value LIKE ?2 ESCAPE '\\'
             ORDER BY id DESC",
        )
        .context("failed to prepare task query")?;

    let tasks = stmt
        .query_map(params![done, like_pattern(search)], task_from_row)
        .context("failed to load tasks")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect tasks")?;

    Ok(tasks)
}

/// Read both partitions inside one read transaction. Under WAL both queries
/// see the same snapshot without blocking writers on other connections.
pub fn load_snapshot(conn: &Connection, search: &str) -> Result<TaskSnapshot> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Deferred)
        .context("failed to begin snapshot transaction")?;
    let todo = list_tasks(&tx, Partition::Todo.done_flag(), search)?;
    let done = list_tasks(&tx, Partition::Completed.done_flag(), search)?;
    tx.commit().context("failed to finish snapshot transaction")?;
    Ok(TaskSnapshot { todo, done })
}

/// Insert a new open task and return it. The value is stored trimmed.
pub fn insert_task(conn: &Connection, value: &str) -> Result<Task> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::EmptyValue.into());
    }

    conn.execute(
        "INSERT INTO items (done, value) VALUES (?1, ?2)",
        params![false, value],
    )
    .context("failed to insert task")?;

    Ok(Task {
        id: conn.last_insert_rowid(),
        done: false,
        value: value.to_string(),
    })
}

/// Flag a task as completed. Unknown ids are ignored.
pub fn mark_done(conn: &Connection, id: i64) -> Result<()> {
    conn.execute(
        "UPDATE items SET done = ?1 WHERE id = ?2",
        params![true, id],
    )
    .context("failed to mark task done")?;
    Ok(())
}

/// Remove a task from either partition. Unknown ids are ignored.
pub fn delete_task(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM items WHERE id = ?1", params![id])
        .context("failed to delete task")?;
    Ok(())
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        done: row.get(1)?,
        value: row.get(2)?,
    })
}

/// Wrap `search` in `%` wildcards, escaping characters `LIKE` would otherwise
/// interpret.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("milk"), "%milk%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
