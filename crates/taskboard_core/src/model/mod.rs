//! Domain model for owner-scoped boards, statuses, and tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Validate incoming drafts before they reach persistence.
//!
//! # Invariants
//! - Every record is identified by a stable uuid.
//! - Deletion is represented by soft-delete tombstones, not hard delete.
//! - Ownership is a single user reference; tasks inherit ownership from
//!   their board.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod board;
pub mod status;
pub mod task;

/// Draft validation failures, raised before any SQL mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Board name is blank after trim.
    BlankBoardName,
    /// Status name is blank after trim.
    BlankStatusName,
    /// Task title is blank after trim.
    BlankTaskTitle,
    /// Task priority is below zero.
    NegativePriority(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankBoardName => write!(f, "board name must not be blank"),
            Self::BlankStatusName => write!(f, "status name must not be blank"),
            Self::BlankTaskTitle => write!(f, "task title must not be blank"),
            Self::NegativePriority(value) => {
                write!(f, "task priority must be non-negative, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}
