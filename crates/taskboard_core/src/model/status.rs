//! Status (board column) domain model.
//!
//! # Invariants
//! - A status exists only in the context of its board; `board_uuid` is a
//!   back-reference, not ownership.
//! - `created_by` mirrors the board owner and exists for owner-scoped
//!   filtering without a join.

use crate::model::board::{BoardId, UserId};
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable status identifier.
pub type StatusId = Uuid;

/// Status read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Stable status id.
    pub uuid: StatusId,
    /// Board this column belongs to.
    pub board_uuid: BoardId,
    /// Owning user, redundant with the board owner.
    pub created_by: UserId,
    /// Column name.
    pub name: String,
    /// Correlation id for external systems, if any.
    pub external_id: Option<String>,
    /// Soft-delete tombstone.
    pub is_deleted: bool,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Status {
    /// Returns whether this status should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Incoming fields for status creation and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDraft {
    pub name: String,
    pub external_id: Option<String>,
}

impl StatusDraft {
    /// Creates a draft with the given column name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            external_id: None,
        }
    }

    /// Validates draft fields before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankStatusName);
        }
        Ok(())
    }
}
