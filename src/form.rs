//! Create/edit form state machine shared by the task and project forms.
//!
//! `Idle` → `Creating` | `Editing` → submit → `Idle` on success, unchanged
//! on a validation error; cancel always returns to `Idle`.

use crate::error::ValidationError;
use crate::project::Project;
use crate::task::{Priority, Task, TaskFields};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState<D> {
    Idle,
    Creating(D),
    Editing { id: String, draft: D },
}

impl<D> Default for FormState<D> {
    fn default() -> Self {
        FormState::Idle
    }
}

impl<D> FormState<D> {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Idle)
    }

    pub fn open_create(&mut self, draft: D) {
        *self = FormState::Creating(draft);
    }

    pub fn open_edit(&mut self, id: impl Into<String>, draft: D) {
        *self = FormState::Editing {
            id: id.into(),
            draft,
        };
    }

    pub fn cancel(&mut self) {
        *self = FormState::Idle;
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            FormState::Idle => None,
            FormState::Creating(draft) | FormState::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match self {
            FormState::Idle => None,
            FormState::Creating(draft) | FormState::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn editing_id(&self) -> Option<&str> {
        match self {
            FormState::Editing { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Runs `apply` with the target id (`None` when creating) and the draft.
    /// Only a successful apply closes the form.
    pub fn submit<E>(
        &mut self,
        apply: impl FnOnce(Option<&str>, &D) -> Result<(), E>,
    ) -> Result<(), E> {
        let result = match self {
            FormState::Idle => return Ok(()),
            FormState::Creating(draft) => apply(None, draft),
            FormState::Editing { id, draft } => apply(Some(id.as_str()), draft),
        };
        if result.is_ok() {
            *self = FormState::Idle;
        }
        result
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskField {
    #[default]
    Title,
    Description,
    DueDate,
    Priority,
    Project,
}

impl TaskField {
    const ORDER: [TaskField; 5] = [
        TaskField::Title,
        TaskField::Description,
        TaskField::DueDate,
        TaskField::Priority,
        TaskField::Project,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskField::Title => "Title",
            TaskField::Description => "Description",
            TaskField::DueDate => "Due (YYYY-MM-DD)",
            TaskField::Priority => "Priority",
            TaskField::Project => "Project",
        }
    }

    fn shift(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward { idx + 1 } else { idx + len - 1 };
        Self::ORDER[next % len]
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            TaskField::Title | TaskField::Description | TaskField::DueDate
        )
    }
}

/// Raw text of the task form before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    pub project_id: Option<String>,
    pub focus: TaskField,
}

impl TaskDraft {
    /// Blank draft, pre-assigned to the project currently being viewed.
    pub fn blank(project_id: Option<String>) -> Self {
        Self {
            project_id,
            ..Self::default()
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            priority: task.priority,
            project_id: task.project_id.clone(),
            focus: TaskField::Title,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.shift(true);
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.shift(false);
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    /// Steps the priority or project selector under focus.
    pub fn cycle(&mut self, forward: bool, projects: &[&Project]) {
        match self.focus {
            TaskField::Priority => {
                self.priority = if forward {
                    self.priority.next()
                } else {
                    self.priority.prev()
                };
            }
            TaskField::Project => self.cycle_project(forward, projects),
            _ => {}
        }
    }

    fn cycle_project(&mut self, forward: bool, projects: &[&Project]) {
        // Slot 0 is "no project".
        let slots = projects.len() + 1;
        let current = self
            .project_id
            .as_deref()
            .and_then(|id| projects.iter().position(|p| p.id == id))
            .map_or(0, |idx| idx + 1);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        self.project_id = next.checked_sub(1).map(|idx| projects[idx].id.clone());
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            TaskField::Title => Some(&mut self.title),
            TaskField::Description => Some(&mut self.description),
            TaskField::DueDate => Some(&mut self.due_date),
            TaskField::Priority | TaskField::Project => None,
        }
    }

    /// Validates the raw text into store fields.
    pub fn to_fields(&self) -> Result<TaskFields, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let due = self.due_date.trim();
        let due_date = if due.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(due, "%Y-%m-%d")
                    .map_err(|_| ValidationError::InvalidDueDate(due.to_string()))?,
            )
        };
        Ok(TaskFields {
            title: self.title.clone(),
            description: Some(self.description.clone()),
            due_date,
            priority: self.priority,
            project_id: self.project_id.clone(),
        })
    }
}

/// Raw text of the project form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
}

impl ProjectDraft {
    pub fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.name.push(c);
    }

    pub fn backspace(&mut self) {
        self.name.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_submit_keeps_form_open() {
        let mut form: FormState<TaskDraft> = FormState::default();
        form.open_create(TaskDraft::blank(None));
        let result = form.submit(|_, draft| draft.to_fields().map(|_| ()));
        assert_eq!(result, Err(ValidationError::EmptyTitle));
        assert!(matches!(form, FormState::Creating(_)));

        form.draft_mut().unwrap().title = "ok".into();
        assert_eq!(form.submit(|_, draft| draft.to_fields().map(|_| ())), Ok(()));
        assert_eq!(form, FormState::Idle);
    }

    #[test]
    fn editing_passes_target_id() {
        let mut form = FormState::default();
        form.open_edit("t-1", ProjectDraft::default());
        let mut seen = None;
        form.submit(|id, _| {
            seen = id.map(str::to_string);
            Ok::<_, ValidationError>(())
        })
        .unwrap();
        assert_eq!(seen.as_deref(), Some("t-1"));
        assert!(!form.is_open());
    }

    #[test]
    fn cancel_discards_draft() {
        let mut form = FormState::default();
        form.open_create(ProjectDraft {
            name: "half".into(),
        });
        form.cancel();
        assert!(form.draft().is_none());
    }

    #[test]
    fn typing_goes_to_focused_text_field() {
        let mut draft = TaskDraft::blank(None);
        draft.push_char('a');
        draft.next_field();
        draft.push_char('b');
        draft.next_field();
        for c in "2024-02-30".chars() {
            draft.push_char(c);
        }
        draft.next_field();
        draft.push_char('z');
        assert_eq!(draft.title, "a");
        assert_eq!(draft.description, "b");
        assert_eq!(
            draft.to_fields(),
            Err(ValidationError::InvalidDueDate("2024-02-30".into()))
        );
        draft.prev_field();
        draft.backspace();
        draft.backspace();
        draft.push_char('2');
        draft.push_char('9');
        assert_eq!(
            draft.to_fields().unwrap().due_date,
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn project_selector_wraps_through_none() {
        let home = Project::new("Home");
        let work = Project::new("Work");
        let projects = vec![&home, &work];
        let mut draft = TaskDraft::blank(None);
        draft.focus = TaskField::Project;
        draft.cycle(true, &projects);
        assert_eq!(draft.project_id.as_deref(), Some(home.id.as_str()));
        draft.cycle(true, &projects);
        draft.cycle(true, &projects);
        assert_eq!(draft.project_id, None);
        draft.cycle(false, &projects);
        assert_eq!(draft.project_id.as_deref(), Some(work.id.as_str()));
    }
}
