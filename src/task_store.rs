use crate::confirm::{Confirm, ConfirmRequest, DeleteOutcome};
use crate::error::ValidationError;
use crate::filter::{ProjectFilter, TaskFilter};
use crate::storage::{Storage, TASKS_KEY};
use crate::task::{Task, TaskFields, TaskPatch};
use chrono::NaiveDate;
use log::info;
use std::cmp::Reverse;

/// Counters shown in the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
}

/// Owns the task list and writes it back after every mutation.
pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Storage,
}

impl TaskStore {
    pub fn load(storage: Storage) -> Self {
        let tasks: Vec<Task> = storage.load(TASKS_KEY, Vec::new());
        info!("event=tasks_load count={}", tasks.len());
        Self { tasks, storage }
    }

    /// Every task in insertion order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Visible tasks: pending before completed, then high to low priority.
    /// The sort is stable so ties keep insertion order.
    pub fn list(&self, project: &ProjectFilter, filter: TaskFilter) -> Vec<&Task> {
        let mut visible: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| project.matches(t) && filter.matches(t))
            .collect();
        visible.sort_by_key(|t| (t.completed, Reverse(t.priority.rank())));
        visible
    }

    pub fn create(&mut self, fields: TaskFields) -> Result<&Task, ValidationError> {
        if fields.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let task = Task::new(fields);
        info!(
            "event=task_create status=ok id={} priority={}",
            task.id, task.priority
        );
        self.tasks.push(task);
        self.persist();
        let idx = self.tasks.len() - 1;
        Ok(&self.tasks[idx])
    }

    /// Merges `patch` into `id`, keeping every field the patch leaves out.
    /// A full `TaskFields` converts into a patch that replaces them all.
    /// Returns `Ok(false)` when the task no longer exists.
    pub fn update(
        &mut self,
        id: &str,
        patch: impl Into<TaskPatch>,
    ) -> Result<bool, ValidationError> {
        let patch = patch.into();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        if patch.has_blank_title() {
            return Err(ValidationError::EmptyTitle);
        }
        task.apply(patch);
        info!("event=task_update status=ok id={id}");
        self.persist();
        Ok(true)
    }

    /// Flips completion and returns the new value.
    pub fn toggle_completed(&mut self, id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        info!("event=task_toggle id={id} completed={completed}");
        self.persist();
        Some(completed)
    }

    /// The question asked before deleting `id`, if it exists.
    pub fn delete_request(&self, id: &str) -> Option<ConfirmRequest> {
        self.get(id).map(|task| {
            ConfirmRequest::new(
                "Delete task",
                format!("Delete task \"{}\"? This cannot be undone.", task.title),
            )
        })
    }

    pub fn delete(&mut self, id: &str, mut confirm: impl Confirm) -> DeleteOutcome {
        let Some(request) = self.delete_request(id) else {
            return DeleteOutcome::NotFound;
        };
        if !confirm.confirm(&request) {
            info!("event=task_delete status=cancelled id={id}");
            return DeleteOutcome::Cancelled;
        }
        self.tasks.retain(|t| t.id != id);
        info!("event=task_delete status=ok id={id}");
        self.persist();
        DeleteOutcome::Deleted { orphaned: 0 }
    }

    pub fn count_for_project(&self, project_id: &str) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(project_id))
            .count()
    }

    /// Detaches every task from `project_id` and returns how many changed.
    pub fn orphan_project(&mut self, project_id: &str) -> usize {
        let mut orphaned = 0;
        for task in &mut self.tasks {
            if task.project_id.as_deref() == Some(project_id) {
                task.project_id = None;
                orphaned += 1;
            }
        }
        if orphaned > 0 {
            info!("event=tasks_orphan project_id={project_id} count={orphaned}");
            self.persist();
        }
        orphaned
    }

    pub fn stats(&self, project: &ProjectFilter, today: NaiveDate) -> TaskStats {
        self.tasks
            .iter()
            .filter(|t| project.matches(t))
            .fold(TaskStats::default(), |mut stats, task| {
                stats.total += 1;
                if task.completed {
                    stats.completed += 1;
                } else {
                    stats.pending += 1;
                }
                if task.is_overdue(today) {
                    stats.overdue += 1;
                }
                stats
            })
    }

    fn persist(&self) {
        self.storage.save(TASKS_KEY, &self.tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::Answer;
    use crate::task::Priority;

    fn store() -> TaskStore {
        TaskStore::load(Storage::in_memory())
    }

    fn add(store: &mut TaskStore, title: &str, priority: Priority) -> String {
        store
            .create(TaskFields::titled(title).with_priority(priority))
            .unwrap()
            .id
            .clone()
    }

    fn titles(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.into_iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn create_assigns_defaults() {
        let mut store = store();
        let task = store.create(TaskFields::titled("Write report")).unwrap();
        assert!(!task.completed);
        assert!(!task.id.is_empty());
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut store = store();
        assert_eq!(
            store.create(TaskFields::titled("   ")).unwrap_err(),
            ValidationError::EmptyTitle
        );
        assert!(store.all().is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut store = store();
        let a = add(&mut store, "a", Priority::Low);
        let b = add(&mut store, "b", Priority::Low);
        assert_ne!(a, b);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let mut store = store();
        let id = add(&mut store, "x", Priority::Low);
        assert_eq!(store.toggle_completed(&id), Some(true));
        assert_eq!(store.toggle_completed(&id), Some(false));
        assert!(!store.get(&id).unwrap().completed);
        assert_eq!(store.toggle_completed("nope"), None);
    }

    #[test]
    fn list_orders_pending_first_then_priority() {
        let mut store = store();
        add(&mut store, "low", Priority::Low);
        add(&mut store, "high", Priority::High);
        let done_high = add(&mut store, "done-high", Priority::High);
        add(&mut store, "medium", Priority::Medium);
        add(&mut store, "high-2", Priority::High);
        add(&mut store, "done-low", Priority::Low);
        store.toggle_completed(&done_high);
        let last = store.all().last().unwrap().id.clone();
        store.toggle_completed(&last);

        let listed = store.list(&ProjectFilter::All, TaskFilter::All);
        assert_eq!(
            titles(listed),
            vec!["high", "high-2", "medium", "low", "done-high", "done-low"]
        );
    }

    #[test]
    fn list_applies_single_filter() {
        let mut store = store();
        let a = add(&mut store, "a", Priority::High);
        add(&mut store, "b", Priority::Low);
        store.toggle_completed(&a);

        let pending = store.list(&ProjectFilter::All, TaskFilter::Pending);
        assert_eq!(titles(pending), vec!["b"]);
        let completed = store.list(&ProjectFilter::All, TaskFilter::Completed);
        assert_eq!(titles(completed), vec!["a"]);
        let high = store.list(&ProjectFilter::All, TaskFilter::Priority(Priority::High));
        assert_eq!(titles(high), vec!["a"]);
    }

    #[test]
    fn update_merges_fields_and_ignores_unknown_id() {
        let mut store = store();
        let id = add(&mut store, "draft", Priority::Low);
        let fields = TaskFields::titled("final").with_priority(Priority::High);
        assert_eq!(store.update(&id, fields.clone()), Ok(true));
        let task = store.get(&id).unwrap();
        assert_eq!(task.title, "final");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(store.update("missing", fields), Ok(false));
        assert_eq!(
            store.update(&id, TaskFields::titled("")),
            Err(ValidationError::EmptyTitle)
        );
        assert_eq!(store.get(&id).unwrap().title, "final");
    }

    #[test]
    fn title_only_update_keeps_description_and_project() {
        let mut store = store();
        let mut fields = TaskFields::titled("a").in_project("p");
        fields.description = Some("keep me".into());
        let id = store.create(fields).unwrap().id.clone();
        assert_eq!(store.update(&id, TaskPatch::default().title("b")), Ok(true));
        let task = store.get(&id).unwrap();
        assert_eq!(task.title, "b");
        assert_eq!(task.description.as_deref(), Some("keep me"));
        assert_eq!(task.project_id.as_deref(), Some("p"));
        assert_eq!(
            store.update(&id, TaskPatch::default().title("  ")),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn delete_respects_confirmation() {
        let mut store = store();
        let id = add(&mut store, "doomed", Priority::Low);
        let mut asked = Vec::new();
        let outcome = store.delete(&id, |req: &ConfirmRequest| {
            asked.push(req.message.clone());
            false
        });
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(asked.len(), 1);
        assert!(asked[0].contains("doomed"));
        assert!(store.get(&id).is_some());

        assert!(store.delete(&id, Answer(true)).is_deleted());
        assert!(store.get(&id).is_none());
        assert_eq!(store.delete(&id, Answer(true)), DeleteOutcome::NotFound);
    }

    #[test]
    fn orphan_project_clears_references() {
        let mut store = store();
        store.create(TaskFields::titled("a").in_project("p")).unwrap();
        store.create(TaskFields::titled("b").in_project("p")).unwrap();
        store.create(TaskFields::titled("c").in_project("q")).unwrap();
        assert_eq!(store.count_for_project("p"), 2);
        assert_eq!(store.orphan_project("p"), 2);
        assert_eq!(store.count_for_project("p"), 0);
        assert_eq!(store.count_for_project("q"), 1);
    }

    #[test]
    fn stats_count_scope() {
        let mut store = store();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let past = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        store.create(TaskFields::titled("late").due(past)).unwrap();
        let done = add(&mut store, "done", Priority::Low);
        store.toggle_completed(&done);
        store.create(TaskFields::titled("other").in_project("p")).unwrap();

        let all = store.stats(&ProjectFilter::All, today);
        assert_eq!(
            all,
            TaskStats {
                total: 3,
                pending: 2,
                completed: 1,
                overdue: 1
            }
        );
        let scoped = store.stats(&ProjectFilter::Project("p".into()), today);
        assert_eq!(scoped.total, 1);
    }
}
