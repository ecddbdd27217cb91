use anyhow::Result;
use log::debug;

use crate::models::{Partition, Task, TaskSnapshot};
use crate::store::TaskStore;

use super::forms::TextInput;

/// Name capture shown on launch.
pub(crate) struct EntryScreen {
    pub(crate) name: TextInput,
}

impl EntryScreen {
    pub(crate) fn new() -> Self {
        Self {
            name: TextInput::with_placeholder("Enter your name"),
        }
    }

    /// GET STARTED is disabled while the trimmed name is empty.
    pub(crate) fn can_start(&self) -> bool {
        !self.name.is_blank()
    }

    /// Trimmed name to hand to the task list, or `None` while disabled.
    pub(crate) fn submit(&self) -> Option<String> {
        self.can_start().then(|| self.name.trimmed().to_string())
    }
}

/// Single-field form that creates a task.
pub(crate) struct AddTaskScreen {
    pub(crate) job: TextInput,
}

impl AddTaskScreen {
    pub(crate) fn new() -> Self {
        Self {
            job: TextInput::with_placeholder("Input your job"),
        }
    }

    /// FINISH is disabled while the trimmed description is empty.
    pub(crate) fn can_finish(&self) -> bool {
        !self.job.is_blank()
    }

    pub(crate) fn submit(&self) -> Option<String> {
        self.can_finish().then(|| self.job.trimmed().to_string())
    }
}

/// Issued before reading the store; carries the search text the read used.
pub(crate) struct RefreshTicket {
    generation: u64,
    search: String,
}

impl RefreshTicket {
    pub(crate) fn search(&self) -> &str {
        &self.search
    }
}

/// Task list controller. Both partitions are always a store read; nothing is
/// patched locally after a mutation.
pub(crate) struct TaskListScreen {
    pub(crate) user_name: String,
    pub(crate) search: TextInput,
    pub(crate) search_focused: bool,
    pub(crate) todo: Vec<Task>,
    pub(crate) done: Vec<Task>,
    /// Cursor over Todo rows followed by Completed rows.
    pub(crate) selected: usize,
    seen_revision: Option<u64>,
    issued_generation: u64,
    applied_generation: u64,
}

impl TaskListScreen {
    pub(crate) fn new(user_name: String) -> Self {
        Self {
            user_name,
            search: TextInput::with_placeholder("Search"),
            search_focused: false,
            todo: Vec::new(),
            done: Vec::new(),
            selected: 0,
            seen_revision: None,
            issued_generation: 0,
            applied_generation: 0,
        }
    }

    pub(crate) fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued_generation += 1;
        RefreshTicket {
            generation: self.issued_generation,
            search: self.search.value.clone(),
        }
    }

    /// Accept `snapshot` unless a newer ticket has already been applied.
    pub(crate) fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        snapshot: TaskSnapshot,
        revision: u64,
    ) -> bool {
        if ticket.generation <= self.applied_generation {
            debug!(
                "event=list_refresh module=ui status=discarded generation={} applied={}",
                ticket.generation, self.applied_generation
            );
            return false;
        }

        self.applied_generation = ticket.generation;
        self.seen_revision = Some(revision);
        self.todo = snapshot.todo;
        self.done = snapshot.done;
        self.ensure_in_bounds();
        true
    }

    pub(crate) fn refresh(&mut self, store: &TaskStore) -> Result<()> {
        let ticket = self.begin_refresh();
        let snapshot = store.snapshot(ticket.search())?;
        self.apply_refresh(ticket, snapshot, store.revision());
        Ok(())
    }

    /// True when the store changed since the last accepted read, or when
    /// nothing has been read yet.
    pub(crate) fn is_stale(&self, store: &TaskStore) -> bool {
        self.seen_revision != Some(store.revision())
    }

    pub(crate) fn row_count(&self) -> usize {
        self.todo.len() + self.done.len()
    }

    pub(crate) fn current_task(&self) -> Option<&Task> {
        if self.selected < self.todo.len() {
            self.todo.get(self.selected)
        } else {
            self.done.get(self.selected - self.todo.len())
        }
    }

    pub(crate) fn current_partition(&self) -> Option<Partition> {
        self.current_task().map(Task::partition)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let new = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.row_count().saturating_sub(1);
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        let len = self.row_count();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_db_in_memory;

    fn task(id: i64, done: bool, value: &str) -> Task {
        Task {
            id,
            done,
            value: value.to_string(),
        }
    }

    #[test]
    fn entry_forward_action_follows_trimmed_input() {
        let mut entry = EntryScreen::new();
        assert!(!entry.can_start());
        assert_eq!(entry.submit(), None);

        for ch in "  Ana ".chars() {
            entry.name.push_char(ch);
        }
        assert!(entry.can_start());
        assert_eq!(entry.submit().as_deref(), Some("Ana"));
    }

    #[test]
    fn add_task_finish_disabled_for_whitespace() {
        let mut add = AddTaskScreen::new();
        add.job.push_char('\t');
        add.job.push_char(' ');
        assert!(!add.can_finish());
        assert_eq!(add.submit(), None);

        add.job.push_char('x');
        assert_eq!(add.submit().as_deref(), Some("x"));
    }

    #[test]
    fn stale_refresh_is_discarded() {
        let mut list = TaskListScreen::new("Ana".into());

        list.search.push_char('m');
        let older = list.begin_refresh();
        list.search.push_char('i');
        let newer = list.begin_refresh();
        assert_eq!(newer.search(), "mi");

        let fresh = TaskSnapshot {
            todo: vec![task(2, false, "milk")],
            done: Vec::new(),
        };
        let stale = TaskSnapshot {
            todo: vec![task(2, false, "milk"), task(1, false, "mop")],
            done: Vec::new(),
        };

        assert!(list.apply_refresh(newer, fresh, 1));
        assert!(!list.apply_refresh(older, stale, 1));
        assert_eq!(list.todo.len(), 1);
        assert_eq!(list.todo[0].value, "milk");
    }

    #[test]
    fn cursor_spans_both_partitions_and_clamps() {
        let mut list = TaskListScreen::new("Ana".into());
        let ticket = list.begin_refresh();
        list.apply_refresh(
            ticket,
            TaskSnapshot {
                todo: vec![task(3, false, "c"), task(2, false, "b")],
                done: vec![task(1, true, "a")],
            },
            0,
        );

        list.select_last();
        assert_eq!(list.current_task().map(|t| t.id), Some(1));
        assert_eq!(list.current_partition(), Some(Partition::Completed));

        list.move_selection(-10);
        assert_eq!(list.current_task().map(|t| t.id), Some(3));

        list.selected = 2;
        let ticket = list.begin_refresh();
        list.apply_refresh(
            ticket,
            TaskSnapshot {
                todo: vec![task(3, false, "c")],
                done: Vec::new(),
            },
            1,
        );
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn staleness_follows_store_revision() {
        let mut store = TaskStore::new(open_db_in_memory().unwrap());
        let mut list = TaskListScreen::new("Ana".into());
        assert!(list.is_stale(&store));

        list.refresh(&store).unwrap();
        assert!(!list.is_stale(&store));

        store.insert("Buy milk").unwrap();
        assert!(list.is_stale(&store));

        list.refresh(&store).unwrap();
        assert_eq!(list.todo.len(), 1);
        assert!(!list.is_stale(&store));
    }
}
