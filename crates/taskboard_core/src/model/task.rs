//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and the draft consumed by create/update.
//!
//! # Invariants
//! - `priority` is non-negative and unique among non-deleted tasks that
//!   share this task's (board, status) group. Uniqueness is maintained by
//!   the cascade engine at the mutation boundary.
//! - `board_uuid` is immutable after creation; only status and priority
//!   move a task around.
//! - Tasks carry no owner column; ownership flows through the board.

use crate::model::board::BoardId;
use crate::model::status::StatusId;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable task identifier.
pub type TaskId = Uuid;

/// Task read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable task id.
    pub uuid: TaskId,
    /// Board this task belongs to. Immutable after creation.
    pub board_uuid: BoardId,
    /// Column the task currently sits in.
    pub status_uuid: StatusId,
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Position within the (board, status) group; lower lists first.
    pub priority: i64,
    /// Completion flag; incomplete tasks list before completed ones.
    pub completed: bool,
    /// Correlation id for external systems, if any.
    pub external_id: Option<String>,
    /// Soft-delete tombstone.
    pub is_deleted: bool,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Task {
    /// Returns whether this task should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Incoming fields for task creation and update.
///
/// The target board is passed separately on create and is fixed on
/// update, so the draft never carries a board reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Target column. Must resolve to an active status on the same board.
    pub status_uuid: StatusId,
    pub title: String,
    pub description: String,
    /// Desired slot in the (board, status) group. The cascade engine
    /// makes room if the slot is already taken.
    pub priority: i64,
    pub completed: bool,
    pub external_id: Option<String>,
}

impl TaskDraft {
    /// Creates a draft targeting the given status and priority slot.
    pub fn new(status_uuid: StatusId, title: impl Into<String>, priority: i64) -> Self {
        Self {
            status_uuid,
            title: title.into(),
            description: String::new(),
            priority,
            completed: false,
            external_id: None,
        }
    }

    /// Validates draft fields before persistence.
    ///
    /// The cascade engine itself does not bound-check priorities; this is
    /// the upstream validation it relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTaskTitle);
        }
        if self.priority < 0 {
            return Err(ValidationError::NegativePriority(self.priority));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TaskDraft;
    use crate::model::ValidationError;
    use uuid::Uuid;

    #[test]
    fn draft_with_title_and_priority_is_valid() {
        let draft = TaskDraft::new(Uuid::new_v4(), "write report", 0);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn blank_title_is_rejected() {
        let draft = TaskDraft::new(Uuid::new_v4(), "  ", 0);
        assert_eq!(
            draft.validate().unwrap_err(),
            ValidationError::BlankTaskTitle
        );
    }

    #[test]
    fn negative_priority_is_rejected() {
        let draft = TaskDraft::new(Uuid::new_v4(), "write report", -3);
        assert_eq!(
            draft.validate().unwrap_err(),
            ValidationError::NegativePriority(-3)
        );
    }

    #[test]
    fn task_serde_roundtrip_keeps_fields() {
        let draft = TaskDraft::new(Uuid::new_v4(), "write report", 4);
        let json = serde_json::to_string(&draft).unwrap();
        let back: TaskDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }
}
