use kanban_core::db::{open_db, open_db_in_memory};
use kanban_core::{
    Board, BoardOrigin, BoardService, BoardServiceError, ColumnId, KeyValueStore,
    MemoryKvStore, RepoError, RepoResult, SqliteKvStore, BOARD_STORAGE_KEY,
};

/// Store that reads fine but refuses every write.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> RepoResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> RepoResult<()> {
        Err(RepoError::InvalidData("slot is read-only".to_string()))
    }
}

fn stored_board(store: &impl KeyValueStore) -> Board {
    let raw = store.get(BOARD_STORAGE_KEY).unwrap().expect("board stored");
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn board_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");

    let expected = {
        let conn = open_db(&path).unwrap();
        let mut service = BoardService::open(SqliteKvStore::new(&conn));
        assert_eq!(service.origin(), BoardOrigin::Seeded);
        service.add_task(ColumnId::Done, "Release notes").unwrap();
        assert!(service.move_task("task-1", "task-5"));
        service.reorder_task("task-1", "task-4").unwrap();
        service.board().clone()
    };

    let conn = open_db(&path).unwrap();
    let service = BoardService::open(SqliteKvStore::new(&conn));
    assert_eq!(service.origin(), BoardOrigin::Restored);
    assert_eq!(service.board(), &expected);
    let in_progress: Vec<&str> = service
        .column(ColumnId::InProgress)
        .unwrap()
        .tasks
        .iter()
        .map(|task| task.id.as_str())
        .collect();
    assert_eq!(in_progress, vec!["task-1", "task-4", "task-5"]);
}

#[test]
fn malformed_stored_value_falls_back_to_seed() {
    let store = MemoryKvStore::new();
    store.set(BOARD_STORAGE_KEY, "{\"columns\": oops").unwrap();

    let service = BoardService::open(&store);
    assert_eq!(service.origin(), BoardOrigin::Recovered);
    assert_eq!(service.board(), &Board::seed());
}

#[test]
fn structurally_invalid_stored_board_falls_back_to_seed() {
    let store = MemoryKvStore::new();
    let duplicate = r#"[
        {"id": "todo", "title": "To Do", "color": "a", "tasks": [{"id": "x", "content": "1"}]},
        {"id": "in-progress", "title": "In Progress", "color": "b", "tasks": []},
        {"id": "done", "title": "Done", "color": "c", "tasks": [{"id": "x", "content": "2"}]}
    ]"#;
    store.set(BOARD_STORAGE_KEY, duplicate).unwrap();

    let service = BoardService::open(&store);
    assert_eq!(service.origin(), BoardOrigin::Recovered);
    assert_eq!(service.board(), &Board::seed());
}

#[test]
fn stored_board_from_previous_session_is_restored() {
    let store = MemoryKvStore::new();
    let raw = r#"[
        {"id": "todo", "title": "To Do", "color": "neon-pink", "tasks": []},
        {"id": "in-progress", "title": "In Progress", "color": "neon-purple", "tasks": []},
        {"id": "done", "title": "Done", "color": "neon-cyan", "tasks": [{"id": "task-1700000000000", "content": "Old task"}]}
    ]"#;
    store.set(BOARD_STORAGE_KEY, raw).unwrap();

    let service = BoardService::open(&store);
    assert_eq!(service.origin(), BoardOrigin::Restored);
    assert_eq!(service.stats().total_tasks, 1);
    assert_eq!(service.find_column("task-1700000000000").unwrap().id, ColumnId::Done);
}

#[test]
fn every_commit_overwrites_the_slot_but_previews_do_not() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    let mut service = BoardService::open(&store);

    let task_id = service
        .add_task(ColumnId::Todo, "Write tests")
        .unwrap()
        .unwrap();
    assert_eq!(&stored_board(&store), service.board());
    let committed = service.board().clone();

    assert!(service.move_task(&task_id, "done"));
    assert_eq!(stored_board(&store), committed);

    service.reorder_task(&task_id, "task-6").unwrap();
    assert_eq!(&stored_board(&store), service.board());

    assert!(service.delete_task(ColumnId::Done, &task_id).unwrap());
    assert_eq!(&stored_board(&store), service.board());

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn failed_commit_leaves_board_unchanged() {
    let mut service = BoardService::open(ReadOnlyStore);

    let err = service.add_task(ColumnId::Todo, "Never stored").unwrap_err();
    assert!(matches!(err, BoardServiceError::Repo(RepoError::InvalidData(_))));
    assert_eq!(service.board(), &Board::seed());

    assert!(service.delete_task(ColumnId::Todo, "task-1").is_err());
    assert_eq!(service.board(), &Board::seed());
}

#[test]
fn failed_drop_keeps_gesture_for_cancel() {
    let mut service = BoardService::open(ReadOnlyStore);

    assert!(service.begin_gesture("task-3"));
    assert!(service.move_task("task-3", "task-6"));
    assert!(service.reorder_task("task-3", "task-7").is_err());
    assert!(service.pending_gesture().is_some());

    assert!(service.cancel_gesture());
    assert_eq!(service.board(), &Board::seed());
}
