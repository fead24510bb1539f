use tempfile::TempDir;
use viztly::host::{MemoryClipboard, MemoryFiles};
use viztly::persistence::{parse, serialize, SnapshotStore};
use viztly::{DispatchOutcome, Mode, Outline, Outliner};

fn session(text: &str) -> Outliner {
    Outliner::in_memory(parse(text).expect("parse"))
}

fn run(app: &mut Outliner, script: &str) {
    for outcome in app.run_script(script).expect("script") {
        assert!(!outcome.is_failure(), "{script}: {outcome:?}");
    }
}

#[test]
fn plan_a_week_from_an_empty_outline() {
    let mut app = Outliner::in_memory(Outline::new());
    run(
        &mut app,
        r#"r "Week" Esc Ctrl+o "Mon" Enter "Tue" Enter "Wed" Esc"#,
    );
    assert_eq!(serialize(app.outline()), "Week\n  Mon\n  Tue\n  Wed\n");
    assert_eq!(app.mode(), Mode::Normal);

    run(&mut app, "Alt+k Alt+k");
    assert_eq!(serialize(app.outline()), "Week\n  Wed\n  Mon\n  Tue\n");

    run(&mut app, "u u");
    assert_eq!(serialize(app.outline()), "Week\n  Mon\n  Tue\n  Wed\n");
}

#[test]
fn copy_subtree_into_another_branch() {
    let mut app = session("Inbox\n  mail\nDone\n");
    run(&mut app, "y j j p");
    assert_eq!(
        serialize(app.outline()),
        "Inbox\n  mail\nDone\nInbox\n  mail\n"
    );
    assert_eq!(app.outline()[app.selected()].title, "Inbox");

    run(&mut app, "Alt+l");
    assert_eq!(
        serialize(app.outline()),
        "Inbox\n  mail\nDone\n  Inbox\n    mail\n"
    );
}

#[test]
fn save_then_reload_through_the_file_store() {
    let mut app = Outliner::new(
        parse("a /board\n  b\n").expect("parse"),
        MemoryClipboard::default(),
        MemoryFiles::default(),
    );
    run(&mut app, "Meta+s");
    let (name, text) = app.files().saved.last().cloned().expect("saved");
    assert_eq!(name, "viztly.txt");
    assert_eq!(text, "a /board\n  b\n");

    app.files_mut().pending_open = Some("fresh\n".to_string());
    run(&mut app, "Meta+l");
    assert_eq!(serialize(app.outline()), "fresh\n");
    assert!(!app.history().can_undo());
}

#[test]
fn typed_keys_outside_an_edit_are_unbound() {
    let mut app = session("a\n");
    let outcomes = app.run_script("q").expect("script");
    assert_eq!(outcomes, vec![DispatchOutcome::Unbound]);
    assert_eq!(serialize(app.outline()), "a\n");
}

#[test]
fn snapshot_survives_a_restart() {
    let temp = TempDir::new().expect("temp dir");
    let store = SnapshotStore::new(temp.path());
    let mut app = session("x\n");
    run(&mut app, r#"a "yz" Esc v"#);
    store.save("items", app.outline()).expect("save");

    let restored = store.load("items").expect("load").expect("snapshot");
    let item = restored[restored.root()].children()[0];
    assert_eq!(restored[item].title, "xyz");
    assert_eq!(serialize(&restored), serialize(app.outline()));
}
