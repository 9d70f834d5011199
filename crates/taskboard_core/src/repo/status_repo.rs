//! Status (board column) repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over `statuses` storage.
//!
//! # Invariants
//! - Creating a status requires an active board owned by the caller;
//!   otherwise the board reads as missing.
//! - Deleting a status tombstones its tasks in the same transaction.

use crate::model::board::{BoardId, UserId};
use crate::model::status::{Status, StatusDraft, StatusId};
use crate::repo::{ensure_connection_ready, parse_bool, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const STATUS_SELECT_SQL: &str = "SELECT
    uuid,
    board_uuid,
    created_by,
    name,
    external_id,
    is_deleted,
    created_at,
    updated_at
FROM statuses";

const STATUS_COLUMNS: &[&str] = &[
    "uuid",
    "board_uuid",
    "created_by",
    "name",
    "external_id",
    "is_deleted",
    "created_at",
    "updated_at",
];

/// Repository interface for status CRUD operations.
pub trait StatusRepository {
    /// Creates one status column on an owner-verified board.
    fn create_status(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        draft: &StatusDraft,
    ) -> RepoResult<Status>;
    /// Loads one status by id, owner-scoped.
    fn get_status(
        &self,
        status_uuid: StatusId,
        owner: UserId,
        include_deleted: bool,
    ) -> RepoResult<Option<Status>>;
    /// Lists active statuses of an owner-verified board.
    fn list_board_statuses(&self, board_uuid: BoardId, owner: UserId) -> RepoResult<Vec<Status>>;
    /// Updates name/external id of one status, owner-scoped.
    fn update_status(
        &self,
        status_uuid: StatusId,
        owner: UserId,
        draft: &StatusDraft,
    ) -> RepoResult<Status>;
    /// Tombstones one status plus its tasks.
    fn soft_delete_status(&self, status_uuid: StatusId, owner: UserId) -> RepoResult<()>;
}

/// SQLite-backed status repository.
pub struct SqliteStatusRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStatusRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "statuses", STATUS_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl StatusRepository for SqliteStatusRepository<'_> {
    fn create_status(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        draft: &StatusDraft,
    ) -> RepoResult<Status> {
        draft.validate()?;
        ensure_active_board(self.conn, board_uuid, owner)?;

        let status_uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO statuses (uuid, board_uuid, created_by, name, external_id, is_deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, 0);",
            params![
                status_uuid.to_string(),
                board_uuid.to_string(),
                owner.to_string(),
                draft.name.as_str(),
                draft.external_id.as_deref(),
            ],
        )?;

        load_required_status(self.conn, status_uuid, owner)
    }

    fn get_status(
        &self,
        status_uuid: StatusId,
        owner: UserId,
        include_deleted: bool,
    ) -> RepoResult<Option<Status>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STATUS_SELECT_SQL}
             WHERE uuid = ?1
               AND created_by = ?2
               AND (?3 = 1 OR is_deleted = 0);"
        ))?;

        let mut rows = stmt.query(params![
            status_uuid.to_string(),
            owner.to_string(),
            i64::from(include_deleted),
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_status_row(row)?));
        }

        Ok(None)
    }

    fn list_board_statuses(&self, board_uuid: BoardId, owner: UserId) -> RepoResult<Vec<Status>> {
        ensure_active_board(self.conn, board_uuid, owner)?;

        let mut stmt = self.conn.prepare(&format!(
            "{STATUS_SELECT_SQL}
             WHERE board_uuid = ?1
               AND is_deleted = 0
             ORDER BY created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([board_uuid.to_string()])?;
        let mut statuses = Vec::new();
        while let Some(row) = rows.next()? {
            statuses.push(parse_status_row(row)?);
        }

        Ok(statuses)
    }

    fn update_status(
        &self,
        status_uuid: StatusId,
        owner: UserId,
        draft: &StatusDraft,
    ) -> RepoResult<Status> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE statuses
             SET name = ?3,
                 external_id = ?4,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND created_by = ?2
               AND is_deleted = 0;",
            params![
                status_uuid.to_string(),
                owner.to_string(),
                draft.name.as_str(),
                draft.external_id.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::StatusNotFound(status_uuid));
        }

        load_required_status(self.conn, status_uuid, owner)
    }

    fn soft_delete_status(&self, status_uuid: StatusId, owner: UserId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE statuses
             SET is_deleted = 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND created_by = ?2
               AND is_deleted = 0;",
            params![status_uuid.to_string(), owner.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::StatusNotFound(status_uuid));
        }

        tx.execute(
            "UPDATE tasks
             SET is_deleted = 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE status_uuid = ?1
               AND is_deleted = 0;",
            [status_uuid.to_string()],
        )?;

        tx.commit()?;
        Ok(())
    }
}

/// Fails with `BoardNotFound` unless the board is active and owned.
pub(crate) fn ensure_active_board(
    conn: &Connection,
    board_uuid: BoardId,
    owner: UserId,
) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM boards
            WHERE uuid = ?1
              AND created_by = ?2
              AND is_deleted = 0
        );",
        params![board_uuid.to_string(), owner.to_string()],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(RepoError::BoardNotFound(board_uuid));
    }
    Ok(())
}

fn load_required_status(
    conn: &Connection,
    status_uuid: StatusId,
    owner: UserId,
) -> RepoResult<Status> {
    let mut stmt = conn.prepare(&format!(
        "{STATUS_SELECT_SQL}
         WHERE uuid = ?1
           AND created_by = ?2
           AND is_deleted = 0;"
    ))?;
    let mut rows = stmt.query(params![status_uuid.to_string(), owner.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_status_row(row);
    }
    Err(RepoError::StatusNotFound(status_uuid))
}

fn parse_status_row(row: &Row<'_>) -> RepoResult<Status> {
    let uuid_text: String = row.get("uuid")?;
    let board_uuid_text: String = row.get("board_uuid")?;
    let created_by_text: String = row.get("created_by")?;

    Ok(Status {
        uuid: parse_uuid(&uuid_text, "statuses.uuid")?,
        board_uuid: parse_uuid(&board_uuid_text, "statuses.board_uuid")?,
        created_by: parse_uuid(&created_by_text, "statuses.created_by")?,
        name: row.get("name")?,
        external_id: row.get("external_id")?,
        is_deleted: parse_bool(row.get("is_deleted")?, "statuses.is_deleted")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
