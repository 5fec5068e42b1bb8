use chrono::{Duration, TimeZone, Utc};
use std::cell::Cell;
use taskpad_core::db::open_db_in_memory;
use taskpad_core::{
    Clock, EditError, EditOp, FixedClock, NoteId, NoteService, NoteServiceError, RefactorScope,
    RewriteGateway, SqliteNoteRepository, StaticGateway, FALLBACK_SENTINEL,
};

struct CountingGateway {
    reply: &'static str,
    calls: Cell<usize>,
}

impl RewriteGateway for CountingGateway {
    fn rewrite(&self, _prompt: &str, _instruction: Option<&str>) -> String {
        self.calls.set(self.calls.get() + 1);
        self.reply.to_string()
    }
}

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap())
}

#[test]
fn create_and_list_orders_by_recent_update() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);

    let first = service.create_note("first", &["a"]).unwrap();
    clock.set(clock.now() + Duration::minutes(1));
    let second = service.create_note("", &["b"]).unwrap();
    assert_eq!(second.title, None);

    let listed = service.list_notes().unwrap();
    assert_eq!(listed.iter().map(|n| n.id).collect::<Vec<_>>(), vec![second.id, first.id]);

    clock.set(clock.now() + Duration::minutes(1));
    service
        .apply_edit(first.id, &EditOp::Append { lines: vec!["c".into()] }, &StaticGateway::unavailable())
        .unwrap();
    let listed = service.list_notes().unwrap();
    assert_eq!(listed[0].id, first.id);
}

#[test]
fn replace_line_persists_and_bumps_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);
    let note = service.create_note("t", &["a", "b", "c"]).unwrap();

    let later = clock.now() + Duration::hours(1);
    clock.set(later);
    let op = EditOp::ReplaceLine {
        index: 2,
        text: "B".to_string(),
    };
    service.apply_edit(note.id, &op, &StaticGateway::unavailable()).unwrap();

    let stored = service.get_note(note.id).unwrap().unwrap();
    assert_eq!(stored.lines(), vec!["a", "B", "c"]);
    assert_eq!(stored.updated_at, later);
    assert_eq!(stored.created_at, note.created_at);
}

#[test]
fn rejected_edit_leaves_stored_note_untouched() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);
    let note = service.create_note("t", &["a"]).unwrap();

    clock.set(clock.now() + Duration::hours(1));
    let err = service
        .apply_edit(note.id, &EditOp::DeleteLine { index: 5 }, &StaticGateway::unavailable())
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::Edit(EditError::OutOfRange { .. })));

    let stored = service.get_note(note.id).unwrap().unwrap();
    assert_eq!(stored, note);
}

#[test]
fn range_replace_matches_block_split() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);
    let note = service.create_note("t", &["a", "b", "c"]).unwrap();

    let op = EditOp::ReplaceRange {
        start: 1,
        end: 2,
        block: "X\nY\nZ".to_string(),
    };
    let edited = service.apply_edit(note.id, &op, &StaticGateway::unavailable()).unwrap();
    assert_eq!(edited.content, "X\nY\nZ\nc");
}

#[test]
fn append_to_empty_note_has_no_leading_separator() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);
    let note = service.create_note::<&str>("empty", &[]).unwrap();
    assert_eq!(note.content, "");

    let op = EditOp::Append {
        lines: vec!["first".to_string()],
    };
    let edited = service.apply_edit(note.id, &op, &StaticGateway::unavailable()).unwrap();
    assert_eq!(edited.content, "first");
}

#[test]
fn refactor_with_unavailable_gateway_splices_sentinel() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);
    let note = service.create_note("t", &["a", "b"]).unwrap();

    let op = EditOp::Refactor {
        scope: RefactorScope::Whole,
    };
    let edited = service.apply_edit(note.id, &op, &StaticGateway::unavailable()).unwrap();
    assert_eq!(edited.content, FALLBACK_SENTINEL);
}

#[test]
fn refactor_out_of_range_never_calls_gateway() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);
    let note = service.create_note("t", &["a"]).unwrap();
    let gateway = CountingGateway {
        reply: "x",
        calls: Cell::new(0),
    };

    let op = EditOp::Refactor {
        scope: RefactorScope::Line(3),
    };
    assert!(service.apply_edit(note.id, &op, &gateway).is_err());
    assert_eq!(gateway.calls.get(), 0);
}

#[test]
fn whole_replacement_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);
    let note = service.create_note("t", &["old"]).unwrap();

    let replaced = service.replace_content(note.id, &["new", "content"]).unwrap();
    assert_eq!(replaced.content, "new\ncontent");

    service.delete_note(note.id).unwrap();
    assert!(service.get_note(note.id).unwrap().is_none());
    let err = service.delete_note(note.id).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(id) if id == note.id));
}

#[test]
fn edits_on_unknown_note_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let clock = clock();
    let service = NoteService::new(SqliteNoteRepository::new(&conn), &clock);

    let err = service
        .apply_edit(NoteId(77), &EditOp::DeleteLine { index: 1 }, &StaticGateway::unavailable())
        .unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(NoteId(77))));
}
