//! Personal task and project tracker.
//!
//! Tasks and projects live in two stores persisted as JSON documents under
//! the `tarefas` and `projetos` keys. The terminal front end in `app`/`ui`
//! drives them through a single [`Tracker`].

pub mod app;
pub mod config;
pub mod confirm;
pub mod error;
pub mod filter;
pub mod form;
pub mod logging;
pub mod project;
pub mod project_store;
pub mod storage;
pub mod task;
pub mod task_store;
pub mod tracker;
pub mod ui;

pub use confirm::{Answer, Confirm, ConfirmRequest, DeleteOutcome};
pub use error::{StorageError, ValidationError};
pub use filter::{ProjectFilter, TaskFilter};
pub use project::Project;
pub use project_store::ProjectStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore, Storage, PROJECTS_KEY, TASKS_KEY};
pub use task::{Priority, Task, TaskFields, TaskPatch};
pub use task_store::{TaskStats, TaskStore};
pub use tracker::Tracker;
