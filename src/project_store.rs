use crate::confirm::{Confirm, ConfirmRequest, DeleteOutcome};
use crate::error::ValidationError;
use crate::project::Project;
use crate::storage::{Storage, PROJECTS_KEY};
use crate::task_store::TaskStore;
use log::info;

/// Owns the project list and writes it back after every mutation.
pub struct ProjectStore {
    projects: Vec<Project>,
    storage: Storage,
}

impl ProjectStore {
    pub fn load(storage: Storage) -> Self {
        let projects: Vec<Project> = storage.load(PROJECTS_KEY, Vec::new());
        info!("event=projects_load count={}", projects.len());
        Self { projects, storage }
    }

    /// Projects sorted by name, ignoring case.
    pub fn list(&self) -> Vec<&Project> {
        let mut sorted: Vec<&Project> = self.projects.iter().collect();
        sorted.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        sorted
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn create(&mut self, name: &str) -> Result<&Project, ValidationError> {
        self.validate_name(name, None)?;
        let project = Project::new(name);
        info!(
            "event=project_create status=ok id={} name={:?}",
            project.id, project.name
        );
        self.projects.push(project);
        self.persist();
        let idx = self.projects.len() - 1;
        Ok(&self.projects[idx])
    }

    /// Renames `id`. Returns `Ok(false)` when the project no longer exists.
    pub fn update(&mut self, id: &str, name: &str) -> Result<bool, ValidationError> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        self.validate_name(name, Some(id))?;
        if let Some(project) = self.projects.iter_mut().find(|p| p.id == id) {
            project.name = name.trim().to_string();
        }
        info!("event=project_update status=ok id={id}");
        self.persist();
        Ok(true)
    }

    /// The question asked before deleting `id`. `None` when the project is
    /// unknown or has no tasks, in which case deletion needs no confirmation.
    pub fn delete_request(&self, id: &str, tasks: &TaskStore) -> Option<ConfirmRequest> {
        let project = self.get(id)?;
        let count = tasks.count_for_project(id);
        if count == 0 {
            return None;
        }
        let noun = if count == 1 { "task" } else { "tasks" };
        Some(ConfirmRequest::new(
            "Delete project",
            format!(
                "Project \"{}\" has {count} {noun}. They will be kept without a project. Delete it?",
                project.name
            ),
        ))
    }

    /// Deletes `id`, detaching its tasks first. Confirmation is only asked
    /// when tasks reference the project.
    pub fn delete(
        &mut self,
        id: &str,
        tasks: &mut TaskStore,
        mut confirm: impl Confirm,
    ) -> DeleteOutcome {
        if self.get(id).is_none() {
            return DeleteOutcome::NotFound;
        }
        if let Some(request) = self.delete_request(id, tasks) {
            if !confirm.confirm(&request) {
                info!("event=project_delete status=cancelled id={id}");
                return DeleteOutcome::Cancelled;
            }
        }
        let orphaned = tasks.orphan_project(id);
        self.projects.retain(|p| p.id != id);
        info!("event=project_delete status=ok id={id} orphaned={orphaned}");
        self.persist();
        DeleteOutcome::Deleted { orphaned }
    }

    fn validate_name(&self, name: &str, editing: Option<&str>) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProjectName);
        }
        let taken = self
            .projects
            .iter()
            .any(|p| Some(p.id.as_str()) != editing && p.has_name(name));
        if taken {
            return Err(ValidationError::DuplicateProjectName(name.to_string()));
        }
        Ok(())
    }

    fn persist(&self) {
        self.storage.save(PROJECTS_KEY, &self.projects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::Answer;
    use crate::task::TaskFields;

    fn stores() -> (ProjectStore, TaskStore) {
        let storage = Storage::in_memory();
        (
            ProjectStore::load(storage.clone()),
            TaskStore::load(storage),
        )
    }

    #[test]
    fn names_are_unique_ignoring_case() {
        let (mut projects, _) = stores();
        projects.create("Work").unwrap();
        assert_eq!(
            projects.create("work").unwrap_err(),
            ValidationError::DuplicateProjectName("work".into())
        );
        assert_eq!(
            projects.create("  ").unwrap_err(),
            ValidationError::EmptyProjectName
        );
        assert_eq!(projects.list().len(), 1);
    }

    #[test]
    fn list_sorts_by_name() {
        let (mut projects, _) = stores();
        for name in ["garden", "Admin", "books"] {
            projects.create(name).unwrap();
        }
        let names: Vec<_> = projects.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Admin", "books", "garden"]);
    }

    #[test]
    fn rename_excludes_self_from_uniqueness() {
        let (mut projects, _) = stores();
        let id = projects.create("Home").unwrap().id.clone();
        projects.create("Work").unwrap();
        assert_eq!(projects.update(&id, "HOME"), Ok(true));
        assert_eq!(projects.get(&id).unwrap().name, "HOME");
        assert!(projects.update(&id, "work").is_err());
        assert_eq!(projects.update("missing", "x"), Ok(false));
    }

    #[test]
    fn delete_without_tasks_skips_confirmation() {
        let (mut projects, mut tasks) = stores();
        let id = projects.create("Empty").unwrap().id.clone();
        let mut asked = 0;
        let outcome = projects.delete(&id, &mut tasks, |_: &ConfirmRequest| {
            asked += 1;
            false
        });
        assert_eq!(outcome, DeleteOutcome::Deleted { orphaned: 0 });
        assert_eq!(asked, 0);
        assert!(projects.get(&id).is_none());
    }

    #[test]
    fn delete_with_tasks_orphans_after_confirmation() {
        let (mut projects, mut tasks) = stores();
        let id = projects.create("Home").unwrap().id.clone();
        tasks.create(TaskFields::titled("a").in_project(&id)).unwrap();
        tasks.create(TaskFields::titled("b").in_project(&id)).unwrap();
        tasks.create(TaskFields::titled("c")).unwrap();

        let request = projects.delete_request(&id, &tasks).unwrap();
        assert!(request.message.contains("2 tasks"));

        assert_eq!(
            projects.delete(&id, &mut tasks, Answer(false)),
            DeleteOutcome::Cancelled
        );
        assert_eq!(tasks.count_for_project(&id), 2);

        assert_eq!(
            projects.delete(&id, &mut tasks, Answer(true)),
            DeleteOutcome::Deleted { orphaned: 2 }
        );
        assert!(projects.get(&id).is_none());
        assert!(tasks.all().iter().all(|t| t.project_id.is_none()));
        assert_eq!(tasks.all().len(), 3);
    }
}
