//! Domain models that mirror the SQLite `items` table and get passed throughout
//! the TUI. They stay light-weight data holders so the other layers can focus
//! on presentation and persistence logic.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One to-do item. Rows are never edited in place: `done` flips once and the
/// row is eventually deleted.
pub struct Task {
    /// Primary key assigned by SQLite. Never reused, even after the newest row
    /// is deleted.
    pub id: i64,
    /// Whether the task sits in the Completed partition.
    pub done: bool,
    /// Free-text label typed on the Add Task screen, stored trimmed.
    pub value: String,
}

impl Task {
    pub fn partition(&self) -> Partition {
        if self.done {
            Partition::Completed
        } else {
            Partition::Todo
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// The two display buckets of the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Todo,
    Completed,
}

impl Partition {
    /// Value stored in the `done` column for this bucket.
    pub fn done_flag(self) -> bool {
        matches!(self, Partition::Completed)
    }

    pub fn heading(self) -> &'static str {
        match self {
            Partition::Todo => "Todo",
            Partition::Completed => "Completed",
        }
    }
}

/// Both partitions read inside one transaction, so they always agree with
/// each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub todo: Vec<Task>,
    pub done: Vec<Task>,
}

impl TaskSnapshot {
    pub fn len(&self) -> usize {
        self.todo.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todo.is_empty() && self.done.is_empty()
    }
}
