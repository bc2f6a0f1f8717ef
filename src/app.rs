//! Presentation state and key handling.
//!
//! `App` borrows the [`Tracker`] for the whole session, turns key events into
//! tracker calls and keeps the purely visual state (focused pane, cursors,
//! open form, modal dialog). Rendering lives in `ui`.

use crate::confirm::{Answer, ConfirmRequest, DeleteOutcome};
use crate::error::ValidationError;
use crate::filter::{ProjectFilter, TaskFilter};
use crate::form::{FormState, ProjectDraft, TaskDraft};
use crate::project::Project;
use crate::task::Task;
use crate::tracker::Tracker;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Tasks,
    Projects,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Task(String),
    Project(String),
}

/// Blocking dialogs drawn over everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Alert(String),
    Confirm {
        request: ConfirmRequest,
        target: DeleteTarget,
    },
}

pub struct App<'a> {
    tracker: &'a mut Tracker,
    pane: Pane,
    task_cursor: usize,
    /// 0 is the "All projects" entry.
    project_cursor: usize,
    task_form: FormState<TaskDraft>,
    project_form: FormState<ProjectDraft>,
    modal: Option<Modal>,
    notice: Option<String>,
    today: NaiveDate,
    should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(tracker: &'a mut Tracker, today: NaiveDate) -> Self {
        Self {
            tracker,
            pane: Pane::Tasks,
            task_cursor: 0,
            project_cursor: 0,
            task_form: FormState::Idle,
            project_form: FormState::Idle,
            modal: None,
            notice: None,
            today,
            should_quit: false,
        }
    }

    pub fn tracker(&self) -> &Tracker {
        self.tracker
    }

    pub fn pane(&self) -> Pane {
        self.pane
    }

    pub fn task_cursor(&self) -> usize {
        self.task_cursor
    }

    pub fn project_cursor(&self) -> usize {
        self.project_cursor
    }

    pub fn task_form(&self) -> &FormState<TaskDraft> {
        &self.task_form
    }

    pub fn project_form(&self) -> &FormState<ProjectDraft> {
        &self.project_form
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tracker.visible_tasks().get(self.task_cursor).copied()
    }

    /// `None` when the "All projects" entry is selected.
    pub fn selected_project(&self) -> Option<&Project> {
        let idx = self.project_cursor.checked_sub(1)?;
        self.tracker.projects().list().get(idx).copied()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if self.modal.is_some() {
            self.handle_modal_key(key);
        } else if self.task_form.is_open() {
            self.handle_task_form_key(key);
        } else if self.project_form.is_open() {
            self.handle_project_form_key(key);
        } else {
            self.handle_list_key(key);
        }
        self.clamp_cursors();
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match self.modal.take() {
            Some(Modal::Alert(message)) => {
                if !matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.modal = Some(Modal::Alert(message));
                }
            }
            Some(Modal::Confirm { request, target }) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.run_delete(target, Answer(true));
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.run_delete(target, Answer(false));
                }
                _ => self.modal = Some(Modal::Confirm { request, target }),
            },
            None => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        self.notice = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.pane = match self.pane {
                    Pane::Tasks => Pane::Projects,
                    Pane::Projects => Pane::Tasks,
                };
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(true),
            KeyCode::Char('f') => self.set_filter(self.tracker.active_filter().next()),
            KeyCode::Char('F') => self.set_filter(self.tracker.active_filter().prev()),
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                self.set_filter(TaskFilter::CYCLE[idx]);
            }
            _ => match self.pane {
                Pane::Tasks => self.handle_task_list_key(key),
                Pane::Projects => self.handle_project_list_key(key),
            },
        }
    }

    fn handle_task_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => {
                let project = match self.tracker.active_project() {
                    ProjectFilter::Project(id) => Some(id.clone()),
                    ProjectFilter::All => None,
                };
                self.task_form.open_create(TaskDraft::blank(project));
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task() {
                    let id = task.id.clone();
                    let draft = TaskDraft::from_task(task);
                    self.task_form.open_edit(id, draft);
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
                    self.tracker.toggle_task(&id);
                    // The list re-sorts completed tasks last; follow the task.
                    let visible = self.tracker.visible_tasks();
                    if let Some(pos) = visible.iter().position(|t| t.id == id) {
                        self.task_cursor = pos;
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
                    return;
                };
                if let Some(request) = self.tracker.tasks().delete_request(&id) {
                    self.modal = Some(Modal::Confirm {
                        request,
                        target: DeleteTarget::Task(id),
                    });
                }
            }
            _ => {}
        }
    }

    fn handle_project_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let filter = match self.selected_project() {
                    Some(project) => ProjectFilter::Project(project.id.clone()),
                    None => ProjectFilter::All,
                };
                self.tracker.select_project(filter);
                self.task_cursor = 0;
            }
            KeyCode::Char('n') => self.project_form.open_create(ProjectDraft::default()),
            KeyCode::Char('e') => {
                if let Some(project) = self.selected_project() {
                    let id = project.id.clone();
                    let draft = ProjectDraft::from_project(project);
                    self.project_form.open_edit(id, draft);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let Some(id) = self.selected_project().map(|p| p.id.clone()) else {
                    return;
                };
                let request = self
                    .tracker
                    .projects()
                    .delete_request(&id, self.tracker.tasks());
                match request {
                    Some(request) => {
                        self.modal = Some(Modal::Confirm {
                            request,
                            target: DeleteTarget::Project(id),
                        });
                    }
                    // Nothing references it; no question to ask.
                    None => self.run_delete(DeleteTarget::Project(id), Answer(true)),
                }
            }
            _ => {}
        }
    }

    fn handle_task_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.task_form.cancel(),
            KeyCode::Enter => self.submit_task_form(),
            KeyCode::Tab => self.with_task_draft(TaskDraft::next_field),
            KeyCode::BackTab => self.with_task_draft(TaskDraft::prev_field),
            KeyCode::Backspace => self.with_task_draft(TaskDraft::backspace),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                let projects = self.tracker.projects().list();
                if let Some(draft) = self.task_form.draft_mut() {
                    draft.cycle(forward, &projects);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(draft) = self.task_form.draft_mut() {
                    draft.push_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_project_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.project_form.cancel(),
            KeyCode::Enter => self.submit_project_form(),
            KeyCode::Backspace => {
                if let Some(draft) = self.project_form.draft_mut() {
                    draft.backspace();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(draft) = self.project_form.draft_mut() {
                    draft.push_char(c);
                }
            }
            _ => {}
        }
    }

    fn with_task_draft(&mut self, f: impl FnOnce(&mut TaskDraft)) {
        if let Some(draft) = self.task_form.draft_mut() {
            f(draft);
        }
    }

    fn submit_task_form(&mut self) {
        let tracker = &mut *self.tracker;
        let result = self.task_form.submit(|id, draft| -> Result<(), ValidationError> {
            let fields = draft.to_fields()?;
            match id {
                None => tracker.create_task(fields).map(|_| ()),
                Some(id) => tracker.update_task(id, fields).map(|_| ()),
            }
        });
        self.report(result);
    }

    fn submit_project_form(&mut self) {
        let tracker = &mut *self.tracker;
        let result = self.project_form.submit(|id, draft| match id {
            None => tracker.create_project(&draft.name).map(|_| ()),
            Some(id) => tracker.rename_project(id, &draft.name).map(|_| ()),
        });
        self.report(result);
    }

    fn report(&mut self, result: Result<(), ValidationError>) {
        if let Err(err) = result {
            debug!("event=form_submit status=invalid error={err}");
            self.modal = Some(Modal::Alert(err.to_string()));
        }
    }

    fn run_delete(&mut self, target: DeleteTarget, answer: Answer) {
        let outcome = match &target {
            DeleteTarget::Task(id) => self.tracker.delete_task(id, answer),
            DeleteTarget::Project(id) => self.tracker.delete_project(id, answer),
        };
        self.notice = match (target, outcome) {
            (DeleteTarget::Project(_), DeleteOutcome::Deleted { orphaned }) if orphaned > 0 => {
                Some(format!("Project deleted; {orphaned} task(s) now have no project"))
            }
            (DeleteTarget::Project(_), DeleteOutcome::Deleted { .. }) => {
                Some("Project deleted".to_string())
            }
            (DeleteTarget::Task(_), DeleteOutcome::Deleted { .. }) => {
                Some("Task deleted".to_string())
            }
            (_, DeleteOutcome::Cancelled) => Some("Delete cancelled".to_string()),
            (_, DeleteOutcome::NotFound) => None,
        };
    }

    fn set_filter(&mut self, filter: TaskFilter) {
        self.tracker.set_filter(filter);
        self.task_cursor = 0;
    }

    fn move_cursor(&mut self, down: bool) {
        let cursor = match self.pane {
            Pane::Tasks => &mut self.task_cursor,
            Pane::Projects => &mut self.project_cursor,
        };
        *cursor = if down {
            cursor.saturating_add(1)
        } else {
            cursor.saturating_sub(1)
        };
    }

    fn clamp_cursors(&mut self) {
        let tasks = self.tracker.visible_tasks().len();
        self.task_cursor = self.task_cursor.min(tasks.saturating_sub(1));
        // Projects plus the "All projects" row.
        let projects = self.tracker.projects().list().len();
        self.project_cursor = self.project_cursor.min(projects);
    }
}
