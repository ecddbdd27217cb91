use anyhow::Result;
use crossterm::event::KeyCode;
use log::{error, info};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::{Partition, Task};
use crate::store::TaskStore;

use super::forms::TextInput;
use super::helpers::{button_line, centered_rect, cursor_column, surface_error};
use super::navigation::{Navigator, Route};
use super::screens::{AddTaskScreen, EntryScreen, TaskListScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows taken by the greeting above the search bar.
const HEADER_HEIGHT: u16 = 3;
/// Rows taken by the bordered search bar.
const SEARCH_HEIGHT: u16 = 3;
const NAME_ICON: &str = "@";
const JOB_ICON: &str = "+";

/// What a key press asks the application to do once the screen controller has
/// updated its own state.
enum Action {
    None,
    Quit,
    Back,
    Start(String),
    OpenAddTask,
    SearchChanged,
    MarkDone(Task),
    Delete(Task),
    Insert(String),
    Status(&'static str, StatusKind),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the store, the screen stack and the footer.
pub struct App {
    store: TaskStore,
    nav: Navigator,
    status: Option<StatusMessage>,
}

impl App {
    /// Start on the Entry screen.
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            nav: Navigator::new(Route::Entry(EntryScreen::new())),
            status: None,
        }
    }

    /// Feed one key press to the current screen. Returns `true` when the
    /// application should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let action = match self.nav.current_mut() {
            Route::Entry(entry) => entry_key(entry, code),
            Route::TaskList(list) => list_key(list, code),
            Route::AddTask(add) => add_task_key(add, code),
        };
        self.apply(action)
    }

    fn apply(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::None => {}
            Action::Quit => return Ok(true),
            Action::Back => {
                if self.nav.pop().is_none() {
                    return Ok(true);
                }
                self.log_navigation();
                self.clear_status();
                self.refresh_list(false);
            }
            Action::Start(user_name) => {
                self.nav
                    .replace(Route::TaskList(TaskListScreen::new(user_name)));
                self.log_navigation();
                self.clear_status();
                self.refresh_list(true);
            }
            Action::OpenAddTask => {
                self.nav.push(Route::AddTask(AddTaskScreen::new()));
                self.log_navigation();
                self.clear_status();
            }
            Action::SearchChanged => self.refresh_list(true),
            Action::MarkDone(task) => match self.store.mark_done(task.id) {
                Ok(()) => {
                    self.set_status(format!("Completed \"{task}\"."), StatusKind::Info);
                    self.refresh_list(true);
                }
                Err(err) => self.report_error("mark_done", err),
            },
            Action::Delete(task) => match self.store.delete(task.id) {
                Ok(()) => {
                    self.set_status(format!("Deleted \"{task}\"."), StatusKind::Info);
                    self.refresh_list(true);
                }
                Err(err) => self.report_error("delete", err),
            },
            Action::Insert(value) => match self.store.insert(&value) {
                Ok(task) => {
                    self.nav.pop();
                    self.set_status(format!("Added \"{task}\"."), StatusKind::Info);
                    self.refresh_list(false);
                }
                Err(err) => self.report_error("insert", err),
            },
            Action::Status(text, kind) => self.set_status(text, kind),
        }
        Ok(false)
    }

    /// Re-read the task list if it is on top. Without `force`, only a list
    /// that missed a store change is re-read.
    fn refresh_list(&mut self, force: bool) {
        let result = match self.nav.current_mut() {
            Route::TaskList(list) if force || list.is_stale(&self.store) => {
                list.refresh(&self.store)
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            self.report_error("refresh", err);
        }
    }

    fn log_navigation(&self) {
        info!(
            "event=navigate module=ui status=ok to={} depth={}",
            self.nav.current().name(),
            self.nav.depth()
        );
    }

    fn report_error(&mut self, op: &str, err: anyhow::Error) {
        error!("event=task_op module=ui status=error op={} error={:#}", op, err);
        self.set_status(surface_error(&err), StatusKind::Error);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.nav.current() {
            Route::Entry(entry) => self.draw_entry(frame, content_area, entry),
            Route::TaskList(list) => self.draw_task_list(frame, content_area, list),
            Route::AddTask(add) => self.draw_add_task(frame, content_area, add),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }
    }

    fn draw_entry(&self, frame: &mut Frame, area: Rect, entry: &EntryScreen) {
        self.draw_single_field_form(
            frame,
            area,
            "MANAGE YOUR TASK",
            &entry.name,
            NAME_ICON,
            button_line("GET STARTED →", entry.can_start()),
        );
    }

    fn draw_add_task(&self, frame: &mut Frame, area: Rect, add: &AddTaskScreen) {
        self.draw_single_field_form(
            frame,
            area,
            "ADD YOUR JOB",
            &add.job,
            JOB_ICON,
            button_line("FINISH →", add.can_finish()),
        );
    }

    /// Title, one bordered input and an action button, centered on screen.
    fn draw_single_field_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        input: &TextInput,
        icon: &str,
        button: Line<'static>,
    ) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(popup_area);

        let heading = Paragraph::new(Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(heading, rows[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(rows[1]);
        frame.render_widget(
            Paragraph::new(input.build_line(icon, true)).block(block),
            rows[1],
        );

        frame.render_widget(
            Paragraph::new(button).alignment(Alignment::Center),
            rows[3],
        );

        let prefix = icon.chars().count() + 1;
        frame.set_cursor_position((cursor_column(inner, prefix + input.value_len()), inner.y));
    }

    fn draw_task_list(&self, frame: &mut Frame, area: Rect, list: &TaskListScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Min(0),
            ])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("Hi {}", list.user_name),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Have a great day ahead",
                Style::default().fg(Color::Gray),
            )),
        ]);
        frame.render_widget(header, chunks[0]);

        let search_style = if list.search_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let search_block = Block::default()
            .borders(Borders::ALL)
            .border_style(search_style);
        let search_inner = search_block.inner(chunks[1]);
        frame.render_widget(
            Paragraph::new(list.search.build_line("?", list.search_focused)).block(search_block),
            chunks[1],
        );
        if list.search_focused {
            frame.set_cursor_position((
                cursor_column(search_inner, 2 + list.search.value_len()),
                search_inner.y,
            ));
        }

        let (lines, selected_line) = task_list_lines(list);
        let height = chunks[2].height as usize;
        let scroll = match selected_line {
            Some(line) if height > 0 && line >= height => line + 1 - height,
            _ => 0,
        };
        // One task per row; long values are clipped so the scroll math holds.
        let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(lines).scroll((scroll, 0));
        frame.render_widget(paragraph, chunks[2]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let disabled_style = Style::default().fg(Color::DarkGray);
        match self.nav.current() {
            Route::Entry(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Get started   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Quit"),
            ]),
            Route::AddTask(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Finish   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back"),
            ]),
            Route::TaskList(list) if list.search_focused => Line::from(vec![
                Span::styled("[Enter/Esc]", key_style),
                Span::raw(" Done searching   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate"),
            ]),
            Route::TaskList(list) => {
                let done_style = match list.current_partition() {
                    Some(Partition::Todo) => key_style,
                    _ => disabled_style,
                };
                Line::from(vec![
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Navigate   "),
                    Span::styled("[Space]", done_style),
                    Span::raw(" Done   "),
                    Span::styled("[d]", key_style),
                    Span::raw(" Delete   "),
                    Span::styled("[e]", disabled_style),
                    Span::styled(" Edit   ", disabled_style),
                    Span::styled("[+]", key_style),
                    Span::raw(" Add   "),
                    Span::styled("[/]", key_style),
                    Span::raw(" Search   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ])
            }
        }
    }
}

fn entry_key(entry: &mut EntryScreen, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Enter => entry.submit().map_or(Action::None, Action::Start),
        KeyCode::Backspace => {
            entry.name.backspace();
            Action::None
        }
        KeyCode::Char(ch) => {
            entry.name.push_char(ch);
            Action::None
        }
        _ => Action::None,
    }
}

fn add_task_key(add: &mut AddTaskScreen, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc => Action::Back,
        KeyCode::Enter => add.submit().map_or(Action::None, Action::Insert),
        KeyCode::Backspace => {
            add.job.backspace();
            Action::None
        }
        KeyCode::Char(ch) => {
            add.job.push_char(ch);
            Action::None
        }
        _ => Action::None,
    }
}

fn list_key(list: &mut TaskListScreen, code: KeyCode) -> Action {
    if list.search_focused {
        return match code {
            KeyCode::Esc | KeyCode::Enter => {
                list.search_focused = false;
                Action::None
            }
            KeyCode::Up => {
                list.move_selection(-1);
                Action::None
            }
            KeyCode::Down => {
                list.move_selection(1);
                Action::None
            }
            KeyCode::Backspace => {
                if list.search.backspace() {
                    Action::SearchChanged
                } else {
                    Action::None
                }
            }
            KeyCode::Char(ch) => {
                if list.search.push_char(ch) {
                    Action::SearchChanged
                } else {
                    Action::None
                }
            }
            _ => Action::None,
        };
    }

    match code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc | KeyCode::Left => Action::Back,
        KeyCode::Up => {
            list.move_selection(-1);
            Action::None
        }
        KeyCode::Down => {
            list.move_selection(1);
            Action::None
        }
        KeyCode::PageUp => {
            list.move_selection(-5);
            Action::None
        }
        KeyCode::PageDown => {
            list.move_selection(5);
            Action::None
        }
        KeyCode::Home => {
            list.select_first();
            Action::None
        }
        KeyCode::End => {
            list.select_last();
            Action::None
        }
        KeyCode::Char('/') | KeyCode::Char('f') => {
            list.search_focused = true;
            Action::None
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => match list.current_task() {
            Some(task) if !task.done => Action::MarkDone(task.clone()),
            Some(_) => Action::Status("Task is already completed.", StatusKind::Error),
            None => Action::Status("No task selected.", StatusKind::Error),
        },
        KeyCode::Char('d') | KeyCode::Delete => match list.current_task() {
            Some(task) => Action::Delete(task.clone()),
            None => Action::Status("No task selected to delete.", StatusKind::Error),
        },
        KeyCode::Char('e') => Action::Status("Editing tasks is not available.", StatusKind::Info),
        KeyCode::Char('+') | KeyCode::Char('a') => Action::OpenAddTask,
        _ => Action::None,
    }
}

/// Lines for both sections plus the index of the line holding the cursor.
fn task_list_lines(list: &TaskListScreen) -> (Vec<Line<'static>>, Option<usize>) {
    let heading_style = Style::default().add_modifier(Modifier::BOLD);
    let empty_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let mut lines = Vec::with_capacity(list.row_count() + 5);
    let mut selected_line = None;
    let sections = [
        (Partition::Todo, &list.todo, "No tasks found", 0),
        (
            Partition::Completed,
            &list.done,
            "No completed tasks",
            list.todo.len(),
        ),
    ];

    for (partition, tasks, empty_text, offset) in sections {
        if partition == Partition::Completed {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(partition.heading(), heading_style)));
        if tasks.is_empty() {
            lines.push(Line::from(Span::styled(empty_text, empty_style)));
            continue;
        }
        for (idx, task) in tasks.iter().enumerate() {
            let is_selected = offset + idx == list.selected;
            if is_selected {
                selected_line = Some(lines.len());
            }
            lines.push(task_line(task, is_selected));
        }
    }

    (lines, selected_line)
}

fn task_line(task: &Task, selected: bool) -> Line<'static> {
    let marker = if selected { "▶ " } else { "  " };
    let (checkbox, style) = if task.done {
        ("[✓] ", Style::default().fg(Color::Green))
    } else {
        ("[ ] ", Style::default())
    };
    let style = if selected {
        style.fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        style
    };
    Line::from(vec![
        Span::styled(marker, style),
        Span::styled(checkbox, style),
        Span::styled(task.value.clone(), style),
    ])
}
