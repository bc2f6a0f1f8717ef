//! Confirmation capability injected into destructive operations.

/// Question put to the user before a destructive change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Answers a [`ConfirmRequest`]; `true` means go ahead.
pub trait Confirm {
    fn confirm(&mut self, request: &ConfirmRequest) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&ConfirmRequest) -> bool,
{
    fn confirm(&mut self, request: &ConfirmRequest) -> bool {
        self(request)
    }
}

/// A pre-recorded answer, used once the user has replied to a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer(pub bool);

impl Confirm for Answer {
    fn confirm(&mut self, _request: &ConfirmRequest) -> bool {
        self.0
    }
}

/// Result of a delete that may have been declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Removed; `orphaned` tasks lost their project reference.
    Deleted { orphaned: usize },
    Cancelled,
    NotFound,
}

impl DeleteOutcome {
    pub fn is_deleted(self) -> bool {
        matches!(self, DeleteOutcome::Deleted { .. })
    }
}
