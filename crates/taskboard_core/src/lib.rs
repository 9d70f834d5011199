//! Core domain logic for the task-board backend.
//!
//! Users own boards, boards have status columns, and tasks hold a unique
//! integer priority within their (board, status) group. The priority
//! cascade engine keeps that uniqueness invariant under concurrent
//! writers; everything else is owner-scoped CRUD around it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{Board, BoardDraft, BoardId, UserId};
pub use model::status::{Status, StatusDraft, StatusId};
pub use model::task::{Task, TaskDraft, TaskId};
pub use model::ValidationError;
pub use repo::board_repo::{BoardRepository, SqliteBoardRepository};
pub use repo::status_repo::{SqliteStatusRepository, StatusRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::board_service::BoardService;
pub use service::status_service::StatusService;
pub use service::task_service::TaskService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
