//! Board domain model.
//!
//! # Responsibility
//! - Define the board record and its creation draft.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another board.
//! - `created_by` never changes after creation; a board has exactly one
//!   owner for its whole lifetime.
//! - `is_deleted` is the source of truth for tombstone state.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the owning user, supplied by the authentication layer.
pub type UserId = Uuid;

/// Stable board identifier.
pub type BoardId = Uuid;

/// Board read model.
///
/// Timestamps are epoch milliseconds maintained by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Stable board id.
    pub uuid: BoardId,
    /// Owning user. All reads and writes are scoped to this owner.
    pub created_by: UserId,
    /// User-facing board name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Correlation id for external systems, if any.
    pub external_id: Option<String>,
    /// Soft-delete tombstone.
    pub is_deleted: bool,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Board {
    /// Returns whether this board should be considered visible/active.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Incoming fields for board creation and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDraft {
    pub name: String,
    pub description: String,
    pub external_id: Option<String>,
}

impl BoardDraft {
    /// Creates a draft with the given name and empty description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            external_id: None,
        }
    }

    /// Validates draft fields before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankBoardName);
        }
        Ok(())
    }
}
