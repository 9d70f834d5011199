//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for boards, statuses,
//!   and tasks.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Every query is owner-scoped; a record belonging to another user is
//!   indistinguishable from a missing one.
//! - Write paths validate drafts before SQL mutations.
//! - Repository APIs return semantic errors (`BoardNotFound`,
//!   `StatusNotFound`, ...) in addition to DB transport errors.

use crate::db::migrations::{latest_version, schema_version};
use crate::db::DbError;
use crate::model::board::BoardId;
use crate::model::status::StatusId;
use crate::model::task::TaskId;
use crate::model::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod board_repo;
pub(crate) mod cascade;
pub mod status_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors shared by board/status/task repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Draft failed validation before persistence.
    Validation(ValidationError),
    /// Board does not exist, is soft-deleted, or belongs to another user.
    BoardNotFound(BoardId),
    /// Status does not exist, is soft-deleted, or belongs to another user.
    StatusNotFound(StatusId),
    /// Task does not exist, is soft-deleted, or belongs to another user.
    TaskNotFound(TaskId),
    /// Status exists but belongs to a different board than the task.
    StatusBoardMismatch {
        status_uuid: StatusId,
        board_uuid: BoardId,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::BoardNotFound(id) => write!(f, "board not found: {id}"),
            Self::StatusNotFound(id) => write!(f, "status not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::StatusBoardMismatch {
                status_uuid,
                board_uuid,
            } => write!(
                f,
                "status {status_uuid} does not belong to board {board_uuid}"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies a connection is migrated and exposes the required table shape.
///
/// Repositories call this from `try_new` so a connection that skipped
/// `open_db` bootstrap is rejected before any query runs.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
