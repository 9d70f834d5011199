//! Board repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over `boards` storage.
//! - Cascade-invalidate dependent statuses and tasks when a board is
//!   tombstoned.
//!
//! # Invariants
//! - Every lookup filters on `created_by`; other users' boards read as
//!   missing.
//! - Deleting a board tombstones its statuses and tasks in the same
//!   transaction.

use crate::model::board::{Board, BoardDraft, BoardId, UserId};
use crate::repo::{ensure_connection_ready, parse_bool, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const BOARD_SELECT_SQL: &str = "SELECT
    uuid,
    created_by,
    name,
    description,
    external_id,
    is_deleted,
    created_at,
    updated_at
FROM boards";

const BOARD_COLUMNS: &[&str] = &[
    "uuid",
    "created_by",
    "name",
    "description",
    "external_id",
    "is_deleted",
    "created_at",
    "updated_at",
];

/// Repository interface for board CRUD operations.
pub trait BoardRepository {
    /// Creates one board owned by `owner`.
    fn create_board(&self, owner: UserId, draft: &BoardDraft) -> RepoResult<Board>;
    /// Loads one board by id, owner-scoped.
    fn get_board(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        include_deleted: bool,
    ) -> RepoResult<Option<Board>>;
    /// Lists all active boards owned by `owner`.
    fn list_boards(&self, owner: UserId) -> RepoResult<Vec<Board>>;
    /// Updates name/description/external id of one board, owner-scoped.
    fn update_board(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        draft: &BoardDraft,
    ) -> RepoResult<Board>;
    /// Tombstones one board plus its statuses and tasks.
    fn soft_delete_board(&self, board_uuid: BoardId, owner: UserId) -> RepoResult<()>;
}

/// SQLite-backed board repository.
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "boards", BOARD_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl BoardRepository for SqliteBoardRepository<'_> {
    fn create_board(&self, owner: UserId, draft: &BoardDraft) -> RepoResult<Board> {
        draft.validate()?;

        let board_uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO boards (uuid, created_by, name, description, external_id, is_deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, 0);",
            params![
                board_uuid.to_string(),
                owner.to_string(),
                draft.name.as_str(),
                draft.description.as_str(),
                draft.external_id.as_deref(),
            ],
        )?;

        load_required_board(self.conn, board_uuid, owner)
    }

    fn get_board(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        include_deleted: bool,
    ) -> RepoResult<Option<Board>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOARD_SELECT_SQL}
             WHERE uuid = ?1
               AND created_by = ?2
               AND (?3 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![
            board_uuid.to_string(),
            owner.to_string(),
            i64::from(include_deleted),
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_board_row(row)?));
        }

        Ok(None)
    }

    fn list_boards(&self, owner: UserId) -> RepoResult<Vec<Board>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOARD_SELECT_SQL}
             WHERE created_by = ?1
               AND is_deleted = 0
             ORDER BY created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([owner.to_string()])?;
        let mut boards = Vec::new();
        while let Some(row) = rows.next()? {
            boards.push(parse_board_row(row)?);
        }

        Ok(boards)
    }

    fn update_board(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        draft: &BoardDraft,
    ) -> RepoResult<Board> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE boards
             SET name = ?3,
                 description = ?4,
                 external_id = ?5,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND created_by = ?2
               AND is_deleted = 0;",
            params![
                board_uuid.to_string(),
                owner.to_string(),
                draft.name.as_str(),
                draft.description.as_str(),
                draft.external_id.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::BoardNotFound(board_uuid));
        }

        load_required_board(self.conn, board_uuid, owner)
    }

    fn soft_delete_board(&self, board_uuid: BoardId, owner: UserId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE boards
             SET is_deleted = 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND created_by = ?2
               AND is_deleted = 0;",
            params![board_uuid.to_string(), owner.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::BoardNotFound(board_uuid));
        }

        tx.execute(
            "UPDATE statuses
             SET is_deleted = 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE board_uuid = ?1
               AND is_deleted = 0;",
            [board_uuid.to_string()],
        )?;
        tx.execute(
            "UPDATE tasks
             SET is_deleted = 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE board_uuid = ?1
               AND is_deleted = 0;",
            [board_uuid.to_string()],
        )?;

        tx.commit()?;
        Ok(())
    }
}

fn load_required_board(conn: &Connection, board_uuid: BoardId, owner: UserId) -> RepoResult<Board> {
    let mut stmt = conn.prepare(&format!(
        "{BOARD_SELECT_SQL}
         WHERE uuid = ?1
           AND created_by = ?2
           AND is_deleted = 0;"
    ))?;
    let mut rows = stmt.query(params![board_uuid.to_string(), owner.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_board_row(row);
    }
    Err(RepoError::BoardNotFound(board_uuid))
}

fn parse_board_row(row: &Row<'_>) -> RepoResult<Board> {
    let uuid_text: String = row.get("uuid")?;
    let created_by_text: String = row.get("created_by")?;

    Ok(Board {
        uuid: parse_uuid(&uuid_text, "boards.uuid")?,
        created_by: parse_uuid(&created_by_text, "boards.created_by")?,
        name: row.get("name")?,
        description: row.get("description")?,
        external_id: row.get("external_id")?,
        is_deleted: parse_bool(row.get("is_deleted")?, "boards.is_deleted")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
