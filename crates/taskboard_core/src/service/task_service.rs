//! Task use-case service: the mutation coordinator surface.
//!
//! # Responsibility
//! - Expose create/update/list entry points that the surrounding CRUD
//!   layer calls after authentication.
//! - Delegate the transactional cascade work to the task repository.
//!
//! # Invariants
//! - Every mutation re-runs the priority cascade for the target
//!   (board, status) group; uniqueness of priorities within a group
//!   holds after any call sequence.
//! - Listing reflects the latest committed cascade state and is stable
//!   across calls with no intervening writes.

use crate::model::board::{BoardId, UserId};
use crate::model::task::{Task, TaskDraft, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task on a board the caller owns.
    ///
    /// The draft's status must resolve to an active column on the same
    /// board; the cascade engine frees the requested priority slot before
    /// the row is persisted, all inside one transaction.
    pub fn create_task(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        draft: &TaskDraft,
    ) -> RepoResult<Task> {
        self.repo.create_task(board_uuid, owner, draft)
    }

    /// Updates a task the caller owns.
    ///
    /// Re-runs the cascade against the draft's status and priority on
    /// every call, whether or not they changed. The task's board is
    /// fixed at creation and is never reassigned here.
    pub fn update_task(
        &self,
        task_uuid: TaskId,
        owner: UserId,
        draft: &TaskDraft,
    ) -> RepoResult<Task> {
        self.repo.update_task(task_uuid, owner, draft)
    }

    /// Gets one task by id with optional deleted-row visibility.
    pub fn get_task(
        &self,
        task_uuid: TaskId,
        owner: UserId,
        include_deleted: bool,
    ) -> RepoResult<Option<Task>> {
        self.repo.get_task(task_uuid, owner, include_deleted)
    }

    /// Lists a board's active tasks ordered by completion then priority.
    pub fn list_board_tasks(&self, board_uuid: BoardId, owner: UserId) -> RepoResult<Vec<Task>> {
        self.repo.list_board_tasks(board_uuid, owner)
    }

    /// Soft-deletes one task.
    pub fn soft_delete_task(&self, task_uuid: TaskId, owner: UserId) -> RepoResult<()> {
        self.repo.soft_delete_task(task_uuid, owner)
    }
}
