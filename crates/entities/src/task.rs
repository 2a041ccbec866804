//! Task entity definitions.

use serde::{Deserialize, Serialize};

/// A unit of work tracked by the service.
///
/// `id` is assigned by the client and is the only lookup key. Every other
/// field falls back to its empty value when omitted from a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub id: String,
    /// Owning user ID.
    #[serde(default)]
    pub user_id: String,
    /// Free-form text.
    #[serde(default)]
    pub body: String,
    /// Whether the task is done.
    #[serde(default)]
    pub completed: bool,
    /// ID of the parent task, not checked for existence.
    #[serde(default)]
    pub parent: Option<String>,
    /// Reminder timestamp as sent by the client.
    #[serde(default)]
    pub reminder: Option<String>,
}

impl Task {
    /// Creates a new, not yet completed task.
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: String::new(),
            body: body.into(),
            completed: false,
            parent: None,
            reminder: None,
        }
    }

    /// Sets the owning user.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Sets the parent task ID.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the reminder.
    pub fn with_reminder(mut self, reminder: impl Into<String>) -> Self {
        self.reminder = Some(reminder.into());
        self
    }

    /// Marks the task as completed or not.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}
