use anyhow::Result;
use log::debug;
use rusqlite::Connection;

use crate::db::{delete_task, insert_task, load_snapshot, mark_done};
use crate::models::{Task, TaskSnapshot};

/// Owns the SQLite connection and counts successful mutations. Screens keep
/// the revision they last read and re-read when it moves, so no screen needs a
/// handle on another screen to learn about changes.
pub struct TaskStore {
    conn: Connection,
    revision: u64,
}

impl TaskStore {
    /// Wrap a connection that has already been migrated.
    pub fn new(conn: Connection) -> Self {
        Self { conn, revision: 0 }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self, search: &str) -> Result<TaskSnapshot> {
        load_snapshot(&self.conn, search)
    }

    pub fn insert(&mut self, value: &str) -> Result<Task> {
        let task = insert_task(&self.conn, value)?;
        self.bump("insert", task.id);
        Ok(task)
    }

    pub fn mark_done(&mut self, id: i64) -> Result<()> {
        mark_done(&self.conn, id)?;
        self.bump("mark_done", id);
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        delete_task(&self.conn, id)?;
        self.bump("delete", id);
        Ok(())
    }

    fn bump(&mut self, op: &str, id: i64) {
        self.revision += 1;
        debug!(
            "event=store_mutation module=store status=ok op={} task_id={} revision={}",
            op, id, self.revision
        );
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::db::open_db_in_memory;

    #[test]
    fn revision_moves_on_every_successful_mutation() {
        let mut store = TaskStore::new(open_db_in_memory().unwrap());
        assert_eq!(store.revision(), 0);

        let task = store.insert("Buy milk").unwrap();
        assert_eq!(store.revision(), 1);

        store.mark_done(task.id).unwrap();
        store.delete(task.id).unwrap();
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn rejected_insert_leaves_revision_alone() {
        let mut store = TaskStore::new(open_db_in_memory().unwrap());
        assert!(store.insert("   ").is_err());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn reads_do_not_move_revision() {
        let mut store = TaskStore::new(open_db_in_memory().unwrap());
        store.insert("Walk dog").unwrap();
        let snapshot = store.snapshot("").unwrap();
        assert_eq!(snapshot.todo.len(), 1);
        assert_eq!(store.revision(), 1);
    }
}
