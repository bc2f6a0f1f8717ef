//! Transient view filters. Neither is persisted.

use crate::task::{Priority, Task};
use std::fmt;

/// The single active status/priority filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
    Priority(Priority),
}

impl TaskFilter {
    pub const CYCLE: [TaskFilter; 6] = [
        TaskFilter::All,
        TaskFilter::Pending,
        TaskFilter::Completed,
        TaskFilter::Priority(Priority::High),
        TaskFilter::Priority(Priority::Medium),
        TaskFilter::Priority(Priority::Low),
    ];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
            TaskFilter::Priority(priority) => task.priority == priority,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Pending => "pending",
            TaskFilter::Completed => "completed",
            TaskFilter::Priority(priority) => priority.label(),
        }
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn prev(self) -> Self {
        self.shift(Self::CYCLE.len() - 1)
    }

    fn shift(self, by: usize) -> Self {
        let idx = Self::CYCLE.iter().position(|f| *f == self).unwrap_or(0);
        Self::CYCLE[(idx + by) % Self::CYCLE.len()]
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which project's tasks are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProjectFilter {
    #[default]
    All,
    Project(String),
}

impl ProjectFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            ProjectFilter::All => true,
            ProjectFilter::Project(id) => task.project_id.as_deref() == Some(id.as_str()),
        }
    }

    pub fn is_project(&self, id: &str) -> bool {
        matches!(self, ProjectFilter::Project(active) if active == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(TaskFilter::All.prev(), TaskFilter::Priority(Priority::Low));
        assert_eq!(TaskFilter::Priority(Priority::Low).next(), TaskFilter::All);
        assert_eq!(TaskFilter::All.next(), TaskFilter::Pending);
    }

    #[test]
    fn labels_follow_cycle_order() {
        let labels: Vec<_> = TaskFilter::CYCLE.iter().map(|f| f.label()).collect();
        assert_eq!(
            labels,
            vec!["all", "pending", "completed", "high", "medium", "low"]
        );
    }
}
