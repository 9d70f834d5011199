//! Priority cascade engine.
//!
//! # Responsibility
//! - Free the desired priority slot in one (board, status) group by
//!   shifting the contiguous run of colliding tasks up by one.
//!
//! # Invariants
//! - After `reserve_priority` returns, no non-deleted task in the group
//!   (other than an excluded moving task) holds the desired priority.
//! - Only the contiguous colliding run starting at the desired priority
//!   is touched; tasks below it or beyond the first gap keep their
//!   priority.
//! - The engine never opens its own transaction. Callers run it inside a
//!   `BEGIN IMMEDIATE` transaction, whose database write lock serializes
//!   concurrent cascades on the same group across connections and
//!   processes.

use crate::model::board::BoardId;
use crate::model::status::StatusId;
use crate::model::task::TaskId;
use rusqlite::{params, Transaction};

/// Makes room at `desired_priority` in the (board, status) group.
///
/// `moving_task` excludes the task being repositioned from the collision
/// scan, so reordering a task onto its own current priority is a no-op
/// instead of a shift into itself.
///
/// Returns the number of tasks shifted.
///
/// # Contract
/// - `desired_priority` is assumed non-negative; drafts are validated
///   upstream.
/// - The caller persists the incoming row at `desired_priority` inside
///   the same transaction, so either all shifts plus that row land, or
///   none do.
pub(crate) fn reserve_priority(
    tx: &Transaction<'_>,
    board_uuid: BoardId,
    status_uuid: StatusId,
    desired_priority: i64,
    moving_task: Option<TaskId>,
) -> Result<usize, rusqlite::Error> {
    let excluded = moving_task.map(|id| id.to_string());

    if !slot_occupied(tx, board_uuid, status_uuid, desired_priority, &excluded)? {
        return Ok(0);
    }

    let mut stmt = tx.prepare(
        "SELECT uuid, priority
         FROM tasks
         WHERE board_uuid = ?1
           AND status_uuid = ?2
           AND priority >= ?3
           AND is_deleted = 0
           AND (?4 IS NULL OR uuid <> ?4)
         ORDER BY priority ASC, uuid ASC;",
    )?;
    let mut rows = stmt.query(params![
        board_uuid.to_string(),
        status_uuid.to_string(),
        desired_priority,
        excluded,
    ])?;

    // Walk the group upward from the desired slot. Each task sitting at
    // the next expected value joins the shift run; the first gap ends the
    // run because nothing at or above it can equal `expected` again.
    let mut run: Vec<(String, i64)> = Vec::new();
    let mut expected = desired_priority;
    while let Some(row) = rows.next()? {
        let uuid: String = row.get(0)?;
        let priority: i64 = row.get(1)?;
        if priority == expected {
            run.push((uuid, priority + 1));
            expected += 1;
        }
    }

    // Apply highest-first so no two rows ever share a priority in storage,
    // even mid-batch.
    for (uuid, new_priority) in run.iter().rev() {
        tx.execute(
            "UPDATE tasks
             SET priority = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![uuid, new_priority],
        )?;
    }

    Ok(run.len())
}

fn slot_occupied(
    tx: &Transaction<'_>,
    board_uuid: BoardId,
    status_uuid: StatusId,
    priority: i64,
    excluded: &Option<String>,
) -> Result<bool, rusqlite::Error> {
    let occupied: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM tasks
            WHERE board_uuid = ?1
              AND status_uuid = ?2
              AND priority = ?3
              AND is_deleted = 0
              AND (?4 IS NULL OR uuid <> ?4)
        );",
        params![
            board_uuid.to_string(),
            status_uuid.to_string(),
            priority,
            excluded,
        ],
        |row| row.get(0),
    )?;
    Ok(occupied == 1)
}

#[cfg(test)]
mod tests {
    use super::reserve_priority;
    use crate::db::open_db_in_memory;
    use rusqlite::{params, Connection, Transaction, TransactionBehavior};
    use uuid::Uuid;

    fn seed_group(conn: &Connection) -> (Uuid, Uuid) {
        let owner = Uuid::new_v4();
        let board = Uuid::new_v4();
        let status = Uuid::new_v4();
        conn.execute(
            "INSERT INTO boards (uuid, created_by, name) VALUES (?1, ?2, 'board');",
            params![board.to_string(), owner.to_string()],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO statuses (uuid, board_uuid, created_by, name)
             VALUES (?1, ?2, ?3, 'todo');",
            params![status.to_string(), board.to_string(), owner.to_string()],
        )
        .unwrap();
        (board, status)
    }

    fn seed_task(conn: &Connection, board: Uuid, status: Uuid, priority: i64) -> Uuid {
        let uuid = Uuid::new_v4();
        conn.execute(
            "INSERT INTO tasks (uuid, board_uuid, status_uuid, title, priority)
             VALUES (?1, ?2, ?3, 'seeded', ?4);",
            params![
                uuid.to_string(),
                board.to_string(),
                status.to_string(),
                priority
            ],
        )
        .unwrap();
        uuid
    }

    fn task_priority(conn: &Connection, uuid: Uuid) -> i64 {
        conn.query_row(
            "SELECT priority FROM tasks WHERE uuid = ?1;",
            [uuid.to_string()],
            |row| row.get(0),
        )
        .unwrap()
    }

    fn run_cascade(
        conn: &Connection,
        board: Uuid,
        status: Uuid,
        desired: i64,
        moving: Option<Uuid>,
    ) -> usize {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).unwrap();
        let shifted = reserve_priority(&tx, board, status, desired, moving).unwrap();
        tx.commit().unwrap();
        shifted
    }

    #[test]
    fn free_slot_is_a_no_op() {
        let conn = open_db_in_memory().unwrap();
        let (board, status) = seed_group(&conn);
        let existing = seed_task(&conn, board, status, 7);

        let shifted = run_cascade(&conn, board, status, 3, None);

        assert_eq!(shifted, 0);
        assert_eq!(task_priority(&conn, existing), 7);
    }

    #[test]
    fn contiguous_run_shifts_and_gap_stops_the_cascade() {
        let conn = open_db_in_memory().unwrap();
        let (board, status) = seed_group(&conn);
        let at_5 = seed_task(&conn, board, status, 5);
        let at_6 = seed_task(&conn, board, status, 6);
        let at_9 = seed_task(&conn, board, status, 9);

        let shifted = run_cascade(&conn, board, status, 5, None);

        assert_eq!(shifted, 2);
        assert_eq!(task_priority(&conn, at_5), 6);
        assert_eq!(task_priority(&conn, at_6), 7);
        assert_eq!(task_priority(&conn, at_9), 9);
    }

    #[test]
    fn tasks_below_desired_priority_are_untouched() {
        let conn = open_db_in_memory().unwrap();
        let (board, status) = seed_group(&conn);
        let at_0 = seed_task(&conn, board, status, 0);
        let at_2 = seed_task(&conn, board, status, 2);

        let shifted = run_cascade(&conn, board, status, 2, None);

        assert_eq!(shifted, 1);
        assert_eq!(task_priority(&conn, at_0), 0);
        assert_eq!(task_priority(&conn, at_2), 3);
    }

    #[test]
    fn moving_task_does_not_collide_with_itself() {
        let conn = open_db_in_memory().unwrap();
        let (board, status) = seed_group(&conn);
        let moving = seed_task(&conn, board, status, 4);
        let neighbor = seed_task(&conn, board, status, 5);

        let shifted = run_cascade(&conn, board, status, 4, Some(moving));

        assert_eq!(shifted, 0);
        assert_eq!(task_priority(&conn, moving), 4);
        assert_eq!(task_priority(&conn, neighbor), 5);
    }

    #[test]
    fn other_groups_and_deleted_tasks_are_ignored() {
        let conn = open_db_in_memory().unwrap();
        let (board, status) = seed_group(&conn);
        let (other_board, other_status) = seed_group(&conn);
        let foreign = seed_task(&conn, other_board, other_status, 5);
        let tombstoned = seed_task(&conn, board, status, 5);
        conn.execute(
            "UPDATE tasks SET is_deleted = 1 WHERE uuid = ?1;",
            [tombstoned.to_string()],
        )
        .unwrap();

        let shifted = run_cascade(&conn, board, status, 5, None);

        assert_eq!(shifted, 0);
        assert_eq!(task_priority(&conn, foreign), 5);
        assert_eq!(task_priority(&conn, tombstoned), 5);
    }

    #[test]
    fn long_contiguous_run_shifts_every_member_once() {
        let conn = open_db_in_memory().unwrap();
        let (board, status) = seed_group(&conn);
        let seeded: Vec<_> = (0..6)
            .map(|priority| seed_task(&conn, board, status, priority))
            .collect();

        let shifted = run_cascade(&conn, board, status, 0, None);

        assert_eq!(shifted, 6);
        for (index, uuid) in seeded.iter().enumerate() {
            assert_eq!(task_priority(&conn, *uuid), index as i64 + 1);
        }
    }
}
