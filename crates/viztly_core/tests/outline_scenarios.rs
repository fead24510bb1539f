//! Scenario tests against the public tree, cursor and history API.

use viztly_core::cursor::Cursor;
use viztly_core::persistence::{parse, serialize, SnapshotStore};
use viztly_core::{Change, History, ItemId, Outline, OutlineError};

/// root -> [A -> [A1, A2], B] with A open.
fn sample() -> (Outline, [ItemId; 4]) {
    let mut outline = Outline::new();
    let a1 = outline.create_item("A1");
    let a2 = outline.create_item("A2");
    let a = outline
        .create_item_with_children("A", vec![a1, a2])
        .expect("A");
    let b = outline.create_item("B");
    let root = outline.root();
    outline.insert_as_last_child(root, a).expect("attach A");
    outline.insert_as_last_child(root, b).expect("attach B");
    (outline, [a, a1, a2, b])
}

#[test]
fn traversal_follows_open_state() {
    let (mut outline, [a, a1, _, b]) = sample();
    assert!(outline[a].is_open);
    assert_eq!(outline.item_above(a1), Some(a));
    assert_eq!(outline.item_below(a), Some(a1));

    outline[a].is_open = false;
    assert_eq!(outline.item_below(a), Some(b));
}

#[test]
fn removing_first_of_two_selects_the_later_sibling() {
    let mut outline = Outline::new();
    let x = outline.append_top_level("X");
    let y = outline.append_top_level("Y");
    assert_eq!(outline.item_to_select_after_removing(x), Some(y));
}

#[test]
fn root_has_no_sibling_context() {
    let (outline, _) = sample();
    assert!(matches!(
        outline.siblings_of(outline.root()),
        Err(OutlineError::InvariantViolation(_))
    ));
}

#[test]
fn reparenting_to_current_position_changes_nothing() {
    let (mut outline, [a, a1, a2, _]) = sample();
    outline.insert_as_last_child(a, a2).expect("reinsert");
    assert_eq!(outline[a].children(), &[a1, a2]);
    assert_eq!(outline[a2].parent(), Some(a));
}

#[test]
fn word_jumps_over_three_words() {
    let mut outline = Outline::new();
    let item = outline.append_top_level("abc def ghi");
    let mut cursor = Cursor::new(item);
    let mut stops = Vec::new();
    for _ in 0..3 {
        cursor.jump_word_forward(&outline);
        stops.push(cursor.position());
    }
    assert_eq!(stops, vec![4, 8, 11]);
}

#[test]
fn moving_selection_reveals_ancestors() {
    let (mut outline, [a, a1, _, _]) = sample();
    outline[a].is_open = false;
    let mut cursor = Cursor::new(a);
    cursor.move_to(&mut outline, a1);
    assert!(outline[a].is_open);
    assert_eq!(cursor.item(), a1);
    assert_eq!(cursor.position(), 0);
}

#[test]
fn history_round_trip_on_raw_changes() {
    let (mut outline, [a, _, a2, b]) = sample();
    let root = outline.root();
    let mut history = History::default();

    outline.add_at(b, a2, 0).expect("move");
    history.record(Change::Move {
        item: a2,
        old_parent: a,
        old_index: 1,
        new_parent: b,
        new_index: 0,
    });
    let position = outline.remove(a).expect("remove").expect("attached");
    history.record(Change::Remove {
        item: a,
        parent: root,
        position,
        item_to_select_after: Some(b),
    });
    let after = serialize(&outline);

    while history.undo(&mut outline).expect("undo").is_some() {}
    assert_eq!(serialize(&outline), "A\n  A1\n  A2\nB\n");
    while history.redo(&mut outline).expect("redo").is_some() {}
    assert_eq!(serialize(&outline), after);
}

#[test]
fn text_and_snapshot_agree() {
    let temp = tempfile::tempdir().expect("temp dir");
    let store = SnapshotStore::new(temp.path());
    let outline = parse("Plan /board\n  Week 1\n  Week 2 /closed\n    Day 1\n").expect("parse");
    store.save("items", &outline).expect("save");
    let loaded = store.load("items").expect("load").expect("stored");
    assert_eq!(serialize(&loaded), serialize(&outline));
}
