use rusqlite::Connection;
use taskboard_core::db::open_db_in_memory;
use taskboard_core::{
    BoardDraft, BoardRepository, BoardService, RepoError, SqliteBoardRepository,
    SqliteStatusRepository, SqliteTaskRepository, StatusDraft, StatusRepository, TaskDraft,
    TaskRepository,
};
use uuid::Uuid;

#[test]
fn create_and_get_board_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();
    let owner = Uuid::new_v4();

    let mut draft = BoardDraft::new("sprint 12");
    draft.description = "current sprint".to_string();
    let board = repo.create_board(owner, &draft).unwrap();

    let loaded = repo.get_board(board.uuid, owner, false).unwrap().unwrap();
    assert_eq!(loaded.uuid, board.uuid);
    assert_eq!(loaded.created_by, owner);
    assert_eq!(loaded.name, "sprint 12");
    assert_eq!(loaded.description, "current sprint");
    assert!(!loaded.is_deleted);
}

#[test]
fn blank_board_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();

    let err = repo
        .create_board(Uuid::new_v4(), &BoardDraft::new("  "))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn boards_are_invisible_to_other_users() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let board = repo.create_board(owner, &BoardDraft::new("private")).unwrap();

    assert!(repo.get_board(board.uuid, stranger, true).unwrap().is_none());
    assert!(repo.list_boards(stranger).unwrap().is_empty());

    let err = repo
        .update_board(board.uuid, stranger, &BoardDraft::new("hijacked"))
        .unwrap_err();
    assert!(matches!(err, RepoError::BoardNotFound(id) if id == board.uuid));

    let err = repo.soft_delete_board(board.uuid, stranger).unwrap_err();
    assert!(matches!(err, RepoError::BoardNotFound(id) if id == board.uuid));

    // The legitimate owner still sees the board untouched.
    let loaded = repo.get_board(board.uuid, owner, false).unwrap().unwrap();
    assert_eq!(loaded.name, "private");
}

#[test]
fn list_boards_excludes_tombstones() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();
    let owner = Uuid::new_v4();

    let keep = repo.create_board(owner, &BoardDraft::new("keep")).unwrap();
    let gone = repo.create_board(owner, &BoardDraft::new("gone")).unwrap();
    repo.soft_delete_board(gone.uuid, owner).unwrap();

    let visible = repo.list_boards(owner).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].uuid, keep.uuid);

    let deleted = repo.get_board(gone.uuid, owner, true).unwrap().unwrap();
    assert!(deleted.is_deleted);
}

#[test]
fn status_creation_requires_owned_board() {
    let conn = open_db_in_memory().unwrap();
    let boards = SqliteBoardRepository::try_new(&conn).unwrap();
    let statuses = SqliteStatusRepository::try_new(&conn).unwrap();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let board = boards.create_board(owner, &BoardDraft::new("board")).unwrap();

    let status = statuses
        .create_status(board.uuid, owner, &StatusDraft::new("todo"))
        .unwrap();
    assert_eq!(status.board_uuid, board.uuid);
    assert_eq!(status.created_by, owner);

    let err = statuses
        .create_status(board.uuid, stranger, &StatusDraft::new("intruder"))
        .unwrap_err();
    assert!(matches!(err, RepoError::BoardNotFound(id) if id == board.uuid));

    let missing_board = Uuid::new_v4();
    let err = statuses
        .create_status(missing_board, owner, &StatusDraft::new("nowhere"))
        .unwrap_err();
    assert!(matches!(err, RepoError::BoardNotFound(id) if id == missing_board));
}

#[test]
fn board_delete_tombstones_statuses_and_tasks() {
    let conn = open_db_in_memory().unwrap();
    let boards = SqliteBoardRepository::try_new(&conn).unwrap();
    let statuses = SqliteStatusRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let owner = Uuid::new_v4();

    let board = boards.create_board(owner, &BoardDraft::new("board")).unwrap();
    let status = statuses
        .create_status(board.uuid, owner, &StatusDraft::new("todo"))
        .unwrap();
    let task = tasks
        .create_task(board.uuid, owner, &TaskDraft::new(status.uuid, "task", 0))
        .unwrap();

    boards.soft_delete_board(board.uuid, owner).unwrap();

    assert!(boards.get_board(board.uuid, owner, false).unwrap().is_none());
    assert!(statuses
        .get_status(status.uuid, owner, false)
        .unwrap()
        .is_none());
    assert!(tasks.get_task(task.uuid, owner, false).unwrap().is_none());

    // Tombstones remain reachable for historical reads.
    let dead_task = tasks.get_task(task.uuid, owner, true).unwrap().unwrap();
    assert!(dead_task.is_deleted);
}

#[test]
fn status_delete_tombstones_its_tasks_only() {
    let conn = open_db_in_memory().unwrap();
    let boards = SqliteBoardRepository::try_new(&conn).unwrap();
    let statuses = SqliteStatusRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let owner = Uuid::new_v4();

    let board = boards.create_board(owner, &BoardDraft::new("board")).unwrap();
    let todo = statuses
        .create_status(board.uuid, owner, &StatusDraft::new("todo"))
        .unwrap();
    let done = statuses
        .create_status(board.uuid, owner, &StatusDraft::new("done"))
        .unwrap();
    let in_todo = tasks
        .create_task(board.uuid, owner, &TaskDraft::new(todo.uuid, "a", 0))
        .unwrap();
    let in_done = tasks
        .create_task(board.uuid, owner, &TaskDraft::new(done.uuid, "b", 0))
        .unwrap();

    statuses.soft_delete_status(todo.uuid, owner).unwrap();

    assert!(tasks.get_task(in_todo.uuid, owner, false).unwrap().is_none());
    assert!(tasks.get_task(in_done.uuid, owner, false).unwrap().is_some());
}

#[test]
fn rename_status_keeps_board_reference() {
    let conn = open_db_in_memory().unwrap();
    let boards = SqliteBoardRepository::try_new(&conn).unwrap();
    let statuses = SqliteStatusRepository::try_new(&conn).unwrap();
    let owner = Uuid::new_v4();

    let board = boards.create_board(owner, &BoardDraft::new("board")).unwrap();
    let status = statuses
        .create_status(board.uuid, owner, &StatusDraft::new("todo"))
        .unwrap();

    let renamed = statuses
        .update_status(status.uuid, owner, &StatusDraft::new("in progress"))
        .unwrap();
    assert_eq!(renamed.name, "in progress");
    assert_eq!(renamed.board_uuid, board.uuid);

    let listed = statuses.list_board_statuses(board.uuid, owner).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "in progress");
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();
    let service = BoardService::new(repo);
    let owner = Uuid::new_v4();

    let board = service
        .create_board(owner, &BoardDraft::new("from service"))
        .unwrap();
    let fetched = service.get_board(board.uuid, owner, false).unwrap().unwrap();
    assert_eq!(fetched.name, "from service");

    service.soft_delete_board(board.uuid, owner).unwrap();
    assert!(service.get_board(board.uuid, owner, false).unwrap().is_none());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteBoardRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        taskboard_core::db::migrations::latest_version()
    ))
    .unwrap();

    let result = SqliteTaskRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("tasks"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE tasks (
            uuid TEXT PRIMARY KEY NOT NULL,
            board_uuid TEXT NOT NULL,
            status_uuid TEXT NOT NULL,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        taskboard_core::db::migrations::latest_version()
    ))
    .unwrap();

    let result = SqliteTaskRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "tasks",
            column: "description"
        })
    ));
}
