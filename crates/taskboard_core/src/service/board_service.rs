//! Board use-case service.
//!
//! # Responsibility
//! - Provide stable board CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.

use crate::model::board::{Board, BoardDraft, BoardId, UserId};
use crate::repo::board_repo::BoardRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for board CRUD operations.
pub struct BoardService<R: BoardRepository> {
    repo: R,
}

impl<R: BoardRepository> BoardService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a board owned by the authenticated user.
    pub fn create_board(&self, owner: UserId, draft: &BoardDraft) -> RepoResult<Board> {
        self.repo.create_board(owner, draft)
    }

    /// Gets one board by id with optional deleted-row visibility.
    pub fn get_board(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        include_deleted: bool,
    ) -> RepoResult<Option<Board>> {
        self.repo.get_board(board_uuid, owner, include_deleted)
    }

    /// Lists the owner's active boards.
    pub fn list_boards(&self, owner: UserId) -> RepoResult<Vec<Board>> {
        self.repo.list_boards(owner)
    }

    /// Updates one board's name/description fields.
    pub fn update_board(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        draft: &BoardDraft,
    ) -> RepoResult<Board> {
        self.repo.update_board(board_uuid, owner, draft)
    }

    /// Soft-deletes one board together with its statuses and tasks.
    pub fn soft_delete_board(&self, board_uuid: BoardId, owner: UserId) -> RepoResult<()> {
        self.repo.soft_delete_board(board_uuid, owner)
    }
}
