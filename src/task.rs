use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight, higher first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A to-do item as persisted under the `tarefas` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a fresh pending task from validated fields.
    pub fn new(fields: TaskFields) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: fields.title.trim().to_string(),
            description: normalize_optional(fields.description),
            due_date: fields.due_date,
            priority: fields.priority,
            project_id: fields.project_id,
            completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    /// Overwrites only the fields the patch carries.
    pub(crate) fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = normalize_optional(description);
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(project_id) = patch.project_id {
            self.project_id = project_id;
        }
    }
}

/// Partial update for an existing task. `None` leaves a field untouched;
/// `Some(None)` clears an optional one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub project_id: Option<Option<String>>,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn project(mut self, project_id: Option<String>) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub(crate) fn has_blank_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| t.trim().is_empty())
    }
}

/// A full form submission replaces every editable field.
impl From<TaskFields> for TaskPatch {
    fn from(fields: TaskFields) -> Self {
        Self {
            title: Some(fields.title),
            description: Some(fields.description),
            due_date: Some(fields.due_date),
            priority: Some(fields.priority),
            project_id: Some(fields.project_id),
        }
    }
}

/// User-editable subset of a task, as submitted by the task form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub project_id: Option<String>,
}

impl TaskFields {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn in_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let task = Task::new(
            TaskFields::titled("Buy milk")
                .with_priority(Priority::High)
                .in_project("p1")
                .due(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
        );
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["priority"], "high");
        assert_eq!(json["projectId"], "p1");
        assert_eq!(json["dueDate"], "2024-03-01");
        assert_eq!(json["completed"], false);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let raw = r#"{"id":"a","title":"t","createdAt":"2024-01-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.completed);
        assert!(task.project_id.is_none());
        assert!(task.description.is_none());
    }

    #[test]
    fn blank_description_is_dropped() {
        let mut fields = TaskFields::titled("  spaced  ");
        fields.description = Some("   ".into());
        let task = Task::new(fields);
        assert_eq!(task.title, "spaced");
        assert!(task.description.is_none());
    }

    #[test]
    fn overdue_only_when_pending_and_past_due() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut task = Task::new(TaskFields::titled("x").due(today.pred_opt().unwrap()));
        assert!(task.is_overdue(today));
        task.completed = true;
        assert!(!task.is_overdue(today));
        task.completed = false;
        task.due_date = Some(today);
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn patch_keeps_fields_it_does_not_carry() {
        let mut fields = TaskFields::titled("a").in_project("p");
        fields.description = Some("keep me".into());
        let mut task = Task::new(fields);
        task.apply(TaskPatch::default().title(" b "));
        assert_eq!(task.title, "b");
        assert_eq!(task.description.as_deref(), Some("keep me"));
        assert_eq!(task.project_id.as_deref(), Some("p"));

        task.apply(TaskPatch::default().project(None));
        assert!(task.project_id.is_none());
        assert_eq!(task.description.as_deref(), Some("keep me"));
    }

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
        assert_eq!(Priority::Low.next().next().next(), Priority::Low);
        assert_eq!(Priority::High.prev(), Priority::Medium);
    }
}
