use super::screens::{AddTaskScreen, EntryScreen, TaskListScreen};

/// A screen on the navigation stack together with its controller state.
pub(crate) enum Route {
    Entry(EntryScreen),
    TaskList(TaskListScreen),
    AddTask(AddTaskScreen),
}

impl Route {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Route::Entry(_) => "entry",
            Route::TaskList(_) => "task_list",
            Route::AddTask(_) => "add_task",
        }
    }
}

/// Screen stack with push/replace/pop semantics. The stack is never empty.
pub(crate) struct Navigator {
    stack: Vec<Route>,
}

impl Navigator {
    pub(crate) fn new(root: Route) -> Self {
        Self { stack: vec![root] }
    }

    pub(crate) fn push(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Swap the top entry, so going back skips the replaced screen.
    pub(crate) fn replace(&mut self, route: Route) {
        self.stack.pop();
        self.stack.push(route);
    }

    /// Drop the top entry. Returns `None` at the root.
    pub(crate) fn pop(&mut self) -> Option<Route> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn current(&self) -> &Route {
        &self.stack[self.stack.len() - 1]
    }

    pub(crate) fn current_mut(&mut self) -> &mut Route {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}
