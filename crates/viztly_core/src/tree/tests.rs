use super::*;

/// root -> [A -> [A1, A2], B]
fn sample() -> (Outline, [ItemId; 4]) {
    let mut outline = Outline::new();
    let a1 = outline.create_item("A1");
    let a2 = outline.create_item("A2");
    let a = outline
        .create_item_with_children("A", vec![a1, a2])
        .expect("build A");
    let b = outline.create_item("B");
    let root = outline.root();
    outline.insert_as_last_child(root, a).expect("attach A");
    outline.insert_as_last_child(root, b).expect("attach B");
    (outline, [a, a1, a2, b])
}

fn titles(outline: &Outline, ids: &[ItemId]) -> Vec<String> {
    ids.iter().map(|id| outline[*id].title.clone()).collect()
}

#[test]
fn create_item_links_children_and_opens_when_populated() {
    let (outline, [a, a1, a2, b]) = sample();
    assert_eq!(outline[a].children(), &[a1, a2]);
    assert_eq!(outline[a1].parent(), Some(a));
    assert!(outline[a].is_open);
    assert!(!outline[b].is_open);
    assert_eq!(outline[a].view, View::Tree);
}

#[test]
fn removing_last_child_closes_parent() {
    let (mut outline, [a, a1, a2, _]) = sample();
    assert_eq!(outline.remove(a1).expect("remove"), Some(0));
    assert!(outline[a].is_open);
    assert_eq!(outline.remove(a2).expect("remove"), Some(0));
    assert!(!outline[a].is_open);
    assert_eq!(outline[a2].parent(), None);
    assert_eq!(outline.remove(a2).expect("second remove"), None);
}

#[test]
fn root_cannot_be_removed_or_asked_for_siblings() {
    let (mut outline, _) = sample();
    let root = outline.root();
    assert!(matches!(
        outline.remove(root),
        Err(OutlineError::InvariantViolation(_))
    ));
    assert!(matches!(
        outline.siblings_of(root),
        Err(OutlineError::InvariantViolation(_))
    ));
}

#[test]
fn reinserting_moves_instead_of_duplicating() {
    let (mut outline, [a, a1, _, b]) = sample();
    outline.insert_as_last_child(b, a1).expect("reparent");
    assert_eq!(outline[a].children().len(), 1);
    assert_eq!(outline[b].children(), &[a1]);
    assert_eq!(outline[a1].parent(), Some(b));
}

#[test]
fn insert_as_last_child_is_idempotent() {
    let (mut outline, [a, a1, a2, _]) = sample();
    outline.insert_as_last_child(a, a2).expect("same place");
    assert_eq!(outline[a].children(), &[a1, a2]);
    assert_eq!(outline[a2].parent(), Some(a));
    assert!(outline[a].is_open);
}

#[test]
fn insert_as_first_child_opens_a_previously_empty_parent() {
    let (mut outline, [_, _, _, b]) = sample();
    let fresh = outline.create_item("fresh");
    outline.insert_as_first_child(b, fresh).expect("insert");
    assert!(outline[b].is_open);
    assert_eq!(outline[b].children(), &[fresh]);
}

#[test]
fn insert_before_and_after_splice_around_anchor() {
    let (mut outline, [a, a1, a2, _]) = sample();
    let before = outline.create_item("before");
    let after = outline.create_item("after");
    outline.insert_before(a2, before).expect("before");
    outline.insert_after(a1, after).expect("after");
    assert_eq!(
        titles(&outline, outline[a].children()),
        vec!["A1", "after", "before", "A2"]
    );
}

#[test]
fn insert_after_moves_earlier_sibling_past_anchor() {
    let (mut outline, [a, a1, a2, _]) = sample();
    outline.insert_after(a2, a1).expect("move down");
    assert_eq!(outline[a].children(), &[a2, a1]);
}

#[test]
fn cyclic_insert_is_rejected_without_mutation() {
    let (mut outline, [a, a1, a2, b]) = sample();
    let err = outline.insert_as_last_child(a1, a).unwrap_err();
    assert!(matches!(err, OutlineError::InvariantViolation(_)));
    assert!(matches!(
        outline.insert_after(a1, a),
        Err(OutlineError::InvariantViolation(_))
    ));
    assert_eq!(outline[outline.root()].children(), &[a, b]);
    assert_eq!(outline[a].children(), &[a1, a2]);
}

#[test]
fn add_at_clamps_and_opens_parent() {
    let (mut outline, [a, a1, a2, b]) = sample();
    outline.remove(a1).expect("remove");
    outline.remove(a2).expect("remove");
    assert!(!outline[a].is_open);
    outline.add_at(a, a2, 7).expect("add");
    outline.add_at(a, a1, 0).expect("add");
    assert_eq!(outline[a].children(), &[a1, a2]);
    assert!(outline[a].is_open);
    assert!(!outline[b].is_open);
}

#[test]
fn count_open_descendants_stops_at_closed_items() {
    let (mut outline, [a, a1, _, b]) = sample();
    let deep = outline.create_item("deep");
    outline.insert_as_first_child(a1, deep).expect("nest");
    let root = outline.root();
    assert_eq!(outline.count_open_descendants(root), 5);
    outline[a1].is_open = false;
    assert_eq!(outline.count_open_descendants(root), 4);
    outline[a].is_open = false;
    assert_eq!(outline.count_open_descendants(root), 2);
    assert_eq!(outline.count_open_descendants(b), 0);
}

#[test]
fn ancestor_checks_walk_parent_links() {
    let (outline, [a, a1, _, b]) = sample();
    assert!(outline.is_ancestor_or_self(a, a1));
    assert!(outline.is_ancestor_or_self(a1, a1));
    assert!(outline.is_ancestor_or_self(outline.root(), a1));
    assert!(!outline.is_ancestor_or_self(b, a1));
    assert!(!outline.is_ancestor_or_self(a1, a));
}

#[test]
fn navigation_follows_open_state() {
    let (mut outline, [a, a1, a2, b]) = sample();
    assert_eq!(outline.item_above(a1), Some(a));
    assert_eq!(outline.item_below(a), Some(a1));
    assert_eq!(outline.item_below(a2), Some(b));
    assert_eq!(outline.item_above(b), Some(a2));
    assert_eq!(outline.item_above(a), None);
    assert_eq!(outline.item_below(b), None);

    outline[a].is_open = false;
    assert_eq!(outline.item_below(a), Some(b));
    assert_eq!(outline.item_above(b), Some(a));
}

#[test]
fn item_below_climbs_out_of_nested_last_children() {
    let (mut outline, [_, _, a2, b]) = sample();
    let deep = outline.create_item("deep");
    outline.insert_as_first_child(a2, deep).expect("nest");
    assert_eq!(outline.item_below(deep), Some(b));
    assert_eq!(outline.item_above(b), Some(deep));
}

#[test]
fn selection_after_removing_first_item_falls_forward() {
    let mut outline = Outline::new();
    let x = outline.create_item("X");
    let y = outline.create_item("Y");
    let p = outline
        .create_item_with_children("P", vec![x, y])
        .expect("build");
    let root = outline.root();
    outline.insert_as_last_child(root, p).expect("attach");
    assert_eq!(outline.item_to_select_after_removing(x), Some(p));

    let (outline, [a, _, _, _]) = sample();
    let b = outline.following_sibling(a).expect("B");
    assert_eq!(outline.item_to_select_after_removing(a), Some(b));
}

#[test]
fn visible_items_skip_closed_subtrees() {
    let (mut outline, [a, a1, a2, b]) = sample();
    assert_eq!(
        outline.visible_items(),
        vec![(a, 0), (a1, 1), (a2, 1), (b, 0)]
    );
    outline[a].is_open = false;
    assert_eq!(outline.visible_items(), vec![(a, 0), (b, 0)]);
}

#[test]
fn release_drops_detached_subtrees_only() {
    let (mut outline, [a, a1, a2, b]) = sample();
    assert!(outline.release(b).is_err());
    outline.remove(a).expect("detach");
    assert_eq!(outline.release(a).expect("release"), 3);
    assert!(!outline.contains(a));
    assert!(!outline.contains(a1));
    assert!(!outline.contains(a2));
    assert!(outline.is_reachable(b));
}

#[test]
fn depth_counts_levels_below_root() {
    let (outline, [a, a1, _, _]) = sample();
    assert_eq!(outline.depth(a), 0);
    assert_eq!(outline.depth(a1), 1);
}

#[test]
fn append_top_level_attaches_below_root() {
    let mut outline = Outline::new();
    let first = outline.append_top_level("first");
    let second = outline.append_top_level("second");
    let root = outline.root();
    assert_eq!(outline[root].children(), &[first, second]);
    assert_eq!(outline[second].parent(), Some(root));
    assert!(outline.is_reachable(second));
}
