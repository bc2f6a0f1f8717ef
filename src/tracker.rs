//! Application context: both stores plus the transient view state.
//!
//! Built once at startup and lent to the presentation layer. The active
//! project and active filter live here and are never persisted.

use crate::confirm::{Confirm, DeleteOutcome};
use crate::error::ValidationError;
use crate::filter::{ProjectFilter, TaskFilter};
use crate::project::Project;
use crate::project_store::ProjectStore;
use crate::storage::Storage;
use crate::task::{Task, TaskFields, TaskPatch};
use crate::task_store::{TaskStats, TaskStore};
use chrono::NaiveDate;
use log::{debug, warn};

pub struct Tracker {
    tasks: TaskStore,
    projects: ProjectStore,
    active_project: ProjectFilter,
    active_filter: TaskFilter,
}

impl Tracker {
    pub fn open(storage: Storage) -> Self {
        Self {
            tasks: TaskStore::load(storage.clone()),
            projects: ProjectStore::load(storage),
            active_project: ProjectFilter::All,
            active_filter: TaskFilter::All,
        }
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn active_project(&self) -> &ProjectFilter {
        &self.active_project
    }

    pub fn active_filter(&self) -> TaskFilter {
        self.active_filter
    }

    /// Selects the project whose tasks are shown. Unknown ids fall back to
    /// showing everything.
    pub fn select_project(&mut self, project: ProjectFilter) {
        self.active_project = match project {
            ProjectFilter::Project(id) if self.projects.get(&id).is_none() => {
                warn!("event=select_project status=unknown id={id}");
                ProjectFilter::All
            }
            other => other,
        };
        debug!("event=select_project active={:?}", self.active_project);
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.active_filter = filter;
        debug!("event=set_filter active={filter}");
    }

    /// Tasks under the active project and filter, in display order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.list(&self.active_project, self.active_filter)
    }

    pub fn stats(&self, today: NaiveDate) -> TaskStats {
        self.tasks.stats(&self.active_project, today)
    }

    pub fn project_name(&self, id: &str) -> Option<&str> {
        self.projects.get(id).map(|p| p.name.as_str())
    }

    pub fn create_task(&mut self, fields: TaskFields) -> Result<&Task, ValidationError> {
        let fields = self.known_project(fields);
        self.tasks.create(fields)
    }

    pub fn update_task(
        &mut self,
        id: &str,
        patch: impl Into<TaskPatch>,
    ) -> Result<bool, ValidationError> {
        let mut patch = patch.into();
        if let Some(project_id) = patch.project_id.take() {
            patch.project_id = Some(self.known_project_id(project_id));
        }
        self.tasks.update(id, patch)
    }

    pub fn toggle_task(&mut self, id: &str) -> Option<bool> {
        self.tasks.toggle_completed(id)
    }

    pub fn delete_task(&mut self, id: &str, confirm: impl Confirm) -> DeleteOutcome {
        self.tasks.delete(id, confirm)
    }

    pub fn create_project(&mut self, name: &str) -> Result<&Project, ValidationError> {
        self.projects.create(name)
    }

    pub fn rename_project(&mut self, id: &str, name: &str) -> Result<bool, ValidationError> {
        self.projects.update(id, name)
    }

    /// Deletes a project, orphaning its tasks. When it was the active
    /// project the view goes back to all tasks.
    pub fn delete_project(&mut self, id: &str, confirm: impl Confirm) -> DeleteOutcome {
        let outcome = self.projects.delete(id, &mut self.tasks, confirm);
        if outcome.is_deleted() && self.active_project.is_project(id) {
            self.active_project = ProjectFilter::All;
        }
        outcome
    }

    /// Drops a project reference that does not resolve.
    fn known_project(&self, mut fields: TaskFields) -> TaskFields {
        fields.project_id = self.known_project_id(fields.project_id.take());
        fields
    }

    fn known_project_id(&self, project_id: Option<String>) -> Option<String> {
        let id = project_id?;
        if self.projects.get(&id).is_none() {
            warn!("event=task_project status=unknown project_id={id}");
            return None;
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::Answer;
    use crate::task::Priority;

    #[test]
    fn deleting_active_project_resets_view() {
        let mut tracker = Tracker::open(Storage::in_memory());
        let id = tracker.create_project("Home").unwrap().id.clone();
        tracker.select_project(ProjectFilter::Project(id.clone()));
        assert!(tracker.active_project().is_project(&id));

        assert!(tracker.delete_project(&id, Answer(true)).is_deleted());
        assert_eq!(tracker.active_project(), &ProjectFilter::All);
    }

    #[test]
    fn cancelled_delete_keeps_active_project() {
        let mut tracker = Tracker::open(Storage::in_memory());
        let id = tracker.create_project("Home").unwrap().id.clone();
        tracker
            .create_task(TaskFields::titled("x").in_project(&id))
            .unwrap();
        tracker.select_project(ProjectFilter::Project(id.clone()));
        assert_eq!(
            tracker.delete_project(&id, Answer(false)),
            DeleteOutcome::Cancelled
        );
        assert!(tracker.active_project().is_project(&id));
    }

    #[test]
    fn unknown_project_reference_is_dropped() {
        let mut tracker = Tracker::open(Storage::in_memory());
        let task = tracker
            .create_task(TaskFields::titled("x").in_project("ghost"))
            .unwrap();
        assert!(task.project_id.is_none());
    }

    #[test]
    fn patch_with_unknown_project_clears_reference() {
        let mut tracker = Tracker::open(Storage::in_memory());
        let home = tracker.create_project("Home").unwrap().id.clone();
        let id = tracker
            .create_task(TaskFields::titled("x").in_project(&home))
            .unwrap()
            .id
            .clone();
        tracker
            .update_task(&id, TaskPatch::default().title("y"))
            .unwrap();
        assert_eq!(tracker.tasks().get(&id).unwrap().project_id, Some(home));
        tracker
            .update_task(&id, TaskPatch::default().project(Some("ghost".into())))
            .unwrap();
        assert!(tracker.tasks().get(&id).unwrap().project_id.is_none());
    }

    #[test]
    fn selecting_unknown_project_shows_all() {
        let mut tracker = Tracker::open(Storage::in_memory());
        tracker.select_project(ProjectFilter::Project("ghost".into()));
        assert_eq!(tracker.active_project(), &ProjectFilter::All);
    }

    #[test]
    fn visible_tasks_follow_filters() {
        let mut tracker = Tracker::open(Storage::in_memory());
        tracker
            .create_task(TaskFields::titled("a").with_priority(Priority::Low))
            .unwrap();
        tracker
            .create_task(TaskFields::titled("b").with_priority(Priority::High))
            .unwrap();
        tracker.set_filter(TaskFilter::Priority(Priority::Low));
        let titles: Vec<_> = tracker.visible_tasks().iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, vec!["a"]);
    }
}
