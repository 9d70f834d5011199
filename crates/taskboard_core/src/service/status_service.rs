//! Status (board column) use-case service.

use crate::model::board::{BoardId, UserId};
use crate::model::status::{Status, StatusDraft, StatusId};
use crate::repo::status_repo::StatusRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for status CRUD operations.
pub struct StatusService<R: StatusRepository> {
    repo: R,
}

impl<R: StatusRepository> StatusService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a status column on a board the caller owns.
    pub fn create_status(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        draft: &StatusDraft,
    ) -> RepoResult<Status> {
        self.repo.create_status(board_uuid, owner, draft)
    }

    /// Gets one status by id with optional deleted-row visibility.
    pub fn get_status(
        &self,
        status_uuid: StatusId,
        owner: UserId,
        include_deleted: bool,
    ) -> RepoResult<Option<Status>> {
        self.repo.get_status(status_uuid, owner, include_deleted)
    }

    /// Lists active columns of an owner-verified board.
    pub fn list_board_statuses(
        &self,
        board_uuid: BoardId,
        owner: UserId,
    ) -> RepoResult<Vec<Status>> {
        self.repo.list_board_statuses(board_uuid, owner)
    }

    /// Renames one status column.
    pub fn update_status(
        &self,
        status_uuid: StatusId,
        owner: UserId,
        draft: &StatusDraft,
    ) -> RepoResult<Status> {
        self.repo.update_status(status_uuid, owner, draft)
    }

    /// Soft-deletes one status together with its tasks.
    pub fn soft_delete_status(&self, status_uuid: StatusId, owner: UserId) -> RepoResult<()> {
        self.repo.soft_delete_status(status_uuid, owner)
    }
}
