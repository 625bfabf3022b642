use stickynote_core::db::open_db_in_memory;
use stickynote_core::{SqliteUiStateRepository, UiFlag, UiStateRepository};

#[test]
fn unset_flags_read_their_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUiStateRepository::try_new(&conn).unwrap();

    assert!(!repo.get_flag(UiFlag::OrganizedView).unwrap());
    assert!(repo.get_flag(UiFlag::NotePreview).unwrap());
}

#[test]
fn flags_are_stored_as_json_booleans_under_stable_keys() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUiStateRepository::try_new(&conn).unwrap();

    repo.set_flag(UiFlag::OrganizedView, true).unwrap();
    repo.set_flag(UiFlag::NotePreview, false).unwrap();
    repo.set_flag(UiFlag::NotePreview, false).unwrap();

    let raw: String = conn
        .query_row(
            "SELECT value FROM ui_flags WHERE key = 'viewMode';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(raw, "true");
    assert!(repo.get_flag(UiFlag::OrganizedView).unwrap());
    assert!(!repo.get_flag(UiFlag::NotePreview).unwrap());
}

#[test]
fn unreadable_value_falls_back_to_default() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO ui_flags (key, value) VALUES ('notePreviewState', 'maybe');",
        [],
    )
    .unwrap();

    let repo = SqliteUiStateRepository::try_new(&conn).unwrap();
    assert!(repo.get_flag(UiFlag::NotePreview).unwrap());
}

#[test]
fn flags_do_not_touch_the_note_table() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUiStateRepository::try_new(&conn).unwrap();
    repo.set_flag(UiFlag::OrganizedView, true).unwrap();

    let notes: i64 = conn
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(notes, 0);
}
