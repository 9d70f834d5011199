//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Coordinate task create/update with the priority cascade engine
//!   inside one atomic transaction.
//! - Provide the ordered read side of the same invariant.
//!
//! # Invariants
//! - Create/update run board resolution, status resolution, the cascade,
//!   and the row persist inside a single `BEGIN IMMEDIATE` transaction:
//!   either all shifts plus the row land, or none do.
//! - Task ownership is the board owner; lookups join `boards.created_by`.
//! - `board_uuid` never changes on update.
//! - Board listing order is `completed ASC, priority ASC, uuid ASC`.

use crate::model::board::{BoardId, UserId};
use crate::model::status::StatusId;
use crate::model::task::{Task, TaskDraft, TaskId};
use crate::repo::status_repo::ensure_active_board;
use crate::repo::{cascade, ensure_connection_ready, parse_bool, parse_uuid, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::time::Instant;
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    board_uuid,
    status_uuid,
    title,
    description,
    priority,
    completed,
    external_id,
    is_deleted,
    created_at,
    updated_at
FROM tasks";

const TASK_COLUMNS: &[&str] = &[
    "uuid",
    "board_uuid",
    "status_uuid",
    "title",
    "description",
    "priority",
    "completed",
    "external_id",
    "is_deleted",
    "created_at",
    "updated_at",
];

/// Repository interface for task operations.
pub trait TaskRepository {
    /// Creates one task on an owner-verified board, cascading priorities
    /// in the target (board, status) group as needed.
    fn create_task(&self, board_uuid: BoardId, owner: UserId, draft: &TaskDraft)
        -> RepoResult<Task>;
    /// Updates one task, re-running the cascade against the (possibly
    /// changed) status and priority. The task's board never changes.
    fn update_task(&self, task_uuid: TaskId, owner: UserId, draft: &TaskDraft) -> RepoResult<Task>;
    /// Loads one task by id, owner-scoped through its board.
    fn get_task(
        &self,
        task_uuid: TaskId,
        owner: UserId,
        include_deleted: bool,
    ) -> RepoResult<Option<Task>>;
    /// Lists active tasks of an owner-verified board, ordered by
    /// completion flag then priority.
    fn list_board_tasks(&self, board_uuid: BoardId, owner: UserId) -> RepoResult<Vec<Task>>;
    /// Tombstones one task.
    fn soft_delete_task(&self, task_uuid: TaskId, owner: UserId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "tasks", TASK_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(
        &self,
        board_uuid: BoardId,
        owner: UserId,
        draft: &TaskDraft,
    ) -> RepoResult<Task> {
        draft.validate()?;
        let started_at = Instant::now();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_active_board(&tx, board_uuid, owner)?;
        ensure_status_on_board(&tx, draft.status_uuid, board_uuid, owner)?;

        let shifted = cascade::reserve_priority(&tx, board_uuid, draft.status_uuid, draft.priority, None)?;

        let task_uuid = Uuid::new_v4();
        tx.execute(
            "INSERT INTO tasks (
                uuid,
                board_uuid,
                status_uuid,
                title,
                description,
                priority,
                completed,
                external_id,
                is_deleted
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0);",
            params![
                task_uuid.to_string(),
                board_uuid.to_string(),
                draft.status_uuid.to_string(),
                draft.title.as_str(),
                draft.description.as_str(),
                draft.priority,
                i64::from(draft.completed),
                draft.external_id.as_deref(),
            ],
        )?;
        let task = load_required_task(&tx, task_uuid)?;
        tx.commit()?;

        info!(
            "event=task_create module=repo status=ok board={} status_col={} priority={} shifted={} duration_ms={}",
            board_uuid,
            draft.status_uuid,
            draft.priority,
            shifted,
            started_at.elapsed().as_millis()
        );
        Ok(task)
    }

    fn update_task(&self, task_uuid: TaskId, owner: UserId, draft: &TaskDraft) -> RepoResult<Task> {
        draft.validate()?;
        let started_at = Instant::now();

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let existing = load_task_scoped(&tx, task_uuid, owner, false)?
            .ok_or(RepoError::TaskNotFound(task_uuid))?;
        ensure_status_on_board(&tx, draft.status_uuid, existing.board_uuid, owner)?;

        let shifted = cascade::reserve_priority(
            &tx,
            existing.board_uuid,
            draft.status_uuid,
            draft.priority,
            Some(task_uuid),
        )?;

        tx.execute(
            "UPDATE tasks
             SET status_uuid = ?2,
                 title = ?3,
                 description = ?4,
                 priority = ?5,
                 completed = ?6,
                 external_id = ?7,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0;",
            params![
                task_uuid.to_string(),
                draft.status_uuid.to_string(),
                draft.title.as_str(),
                draft.description.as_str(),
                draft.priority,
                i64::from(draft.completed),
                draft.external_id.as_deref(),
            ],
        )?;
        let task = load_required_task(&tx, task_uuid)?;
        tx.commit()?;

        info!(
            "event=task_update module=repo status=ok task={} status_col={} priority={} shifted={} duration_ms={}",
            task_uuid,
            draft.status_uuid,
            draft.priority,
            shifted,
            started_at.elapsed().as_millis()
        );
        Ok(task)
    }

    fn get_task(
        &self,
        task_uuid: TaskId,
        owner: UserId,
        include_deleted: bool,
    ) -> RepoResult<Option<Task>> {
        load_task_scoped(self.conn, task_uuid, owner, include_deleted)
    }

    fn list_board_tasks(&self, board_uuid: BoardId, owner: UserId) -> RepoResult<Vec<Task>> {
        ensure_active_board(self.conn, board_uuid, owner)?;

        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE board_uuid = ?1
               AND is_deleted = 0
             ORDER BY completed ASC, priority ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([board_uuid.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn soft_delete_task(&self, task_uuid: TaskId, owner: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET is_deleted = 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1
               AND is_deleted = 0
               AND board_uuid IN (
                 SELECT uuid FROM boards WHERE created_by = ?2
               );",
            params![task_uuid.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(task_uuid));
        }

        Ok(())
    }
}

/// Fails unless the status is active, owned by `owner`, and attached to
/// `board_uuid`. "Status not found" is raised before any cascade work.
fn ensure_status_on_board(
    conn: &Connection,
    status_uuid: StatusId,
    board_uuid: BoardId,
    owner: UserId,
) -> RepoResult<()> {
    let status_board: Option<String> = conn
        .query_row(
            "SELECT board_uuid
             FROM statuses
             WHERE uuid = ?1
               AND created_by = ?2
               AND is_deleted = 0;",
            params![status_uuid.to_string(), owner.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    match status_board {
        None => Err(RepoError::StatusNotFound(status_uuid)),
        Some(value) => {
            let status_board = parse_uuid(&value, "statuses.board_uuid")?;
            if status_board != board_uuid {
                return Err(RepoError::StatusBoardMismatch {
                    status_uuid,
                    board_uuid,
                });
            }
            Ok(())
        }
    }
}

fn load_task_scoped(
    conn: &Connection,
    task_uuid: TaskId,
    owner: UserId,
    include_deleted: bool,
) -> RepoResult<Option<Task>> {
    let mut stmt = conn.prepare(
        "SELECT
            t.uuid AS uuid,
            t.board_uuid AS board_uuid,
            t.status_uuid AS status_uuid,
            t.title AS title,
            t.description AS description,
            t.priority AS priority,
            t.completed AS completed,
            t.external_id AS external_id,
            t.is_deleted AS is_deleted,
            t.created_at AS created_at,
            t.updated_at AS updated_at
         FROM tasks t
         INNER JOIN boards b ON b.uuid = t.board_uuid
         WHERE t.uuid = ?1
           AND b.created_by = ?2
           AND (?3 = 1 OR t.is_deleted = 0);",
    )?;

    let mut rows = stmt.query(params![
        task_uuid.to_string(),
        owner.to_string(),
        i64::from(include_deleted),
    ])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_task_row(row)?));
    }

    Ok(None)
}

fn load_required_task(conn: &Connection, task_uuid: TaskId) -> RepoResult<Task> {
    let mut stmt = conn.prepare(&format!(
        "{TASK_SELECT_SQL}
         WHERE uuid = ?1
           AND is_deleted = 0;"
    ))?;
    let mut rows = stmt.query([task_uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_task_row(row);
    }
    Err(RepoError::TaskNotFound(task_uuid))
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let board_uuid_text: String = row.get("board_uuid")?;
    let status_uuid_text: String = row.get("status_uuid")?;

    Ok(Task {
        uuid: parse_uuid(&uuid_text, "tasks.uuid")?,
        board_uuid: parse_uuid(&board_uuid_text, "tasks.board_uuid")?,
        status_uuid: parse_uuid(&status_uuid_text, "tasks.status_uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: row.get("priority")?,
        completed: parse_bool(row.get("completed")?, "tasks.completed")?,
        external_id: row.get("external_id")?,
        is_deleted: parse_bool(row.get("is_deleted")?, "tasks.is_deleted")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
