use super::*;

fn history_of(ids: &[&str]) -> SessionHistory {
    let mut history = SessionHistory::new();
    for id in ids {
        history.append(*id);
    }
    history
}

// =============================================================================
// append / contains / snapshot
// =============================================================================

#[test]
fn new_history_is_empty() {
    let history = SessionHistory::new();
    assert!(history.is_empty());
    assert_eq!(history.len(), 0);
    assert!(history.last().is_none());
}

#[test]
fn append_preserves_order() {
    let history = history_of(&["a", "b", "c"]);
    assert_eq!(history.snapshot(), vec!["a", "b", "c"]);
    assert_eq!(history.last(), Some("c"));
}

#[test]
fn append_records_back_to_back_repeats() {
    let history = history_of(&["a", "a", "b"]);
    assert_eq!(history.snapshot(), vec!["a", "a", "b"]);
    assert_eq!(history.len(), 3);
}

#[test]
fn append_keeps_repeats_from_later_passes() {
    let history = history_of(&["a", "b", "a"]);
    assert_eq!(history.snapshot(), vec!["a", "b", "a"]);
}

#[test]
fn contains_reports_membership() {
    let history = history_of(&["a", "b"]);
    assert!(history.contains("a"));
    assert!(!history.contains("z"));
}

#[test]
fn snapshot_is_a_detached_copy() {
    let mut history = history_of(&["a"]);
    let snap = history.snapshot();
    history.append("b");
    assert_eq!(snap, vec!["a"]);
    assert_eq!(history.as_slice(), ["a", "b"]);
}

// =============================================================================
// pop_last / clear
// =============================================================================

#[test]
fn pop_last_removes_tail() {
    let mut history = history_of(&["a", "b"]);
    assert_eq!(history.pop_last().as_deref(), Some("b"));
    assert_eq!(history.pop_last().as_deref(), Some("a"));
    assert!(history.pop_last().is_none());
}

#[test]
fn clear_empties_history() {
    let mut history = history_of(&["a", "b"]);
    history.clear();
    assert!(history.is_empty());
}

// =============================================================================
// go_back
// =============================================================================

#[test]
fn go_back_restores_previous_state() {
    let mut history = history_of(&["A", "B", "C"]);
    assert_eq!(history.go_back().as_deref(), Some("B"));
    assert_eq!(history.snapshot(), vec!["A", "B"]);
}

#[test]
fn manual_go_back_sequence_matches_helper() {
    let mut manual = history_of(&["A", "B", "C"]);
    manual.pop_last();
    let previous = manual.pop_last().expect("two entries");
    manual.append(previous.clone());
    assert_eq!(previous, "B");

    let mut helper = history_of(&["A", "B", "C"]);
    helper.go_back();
    assert_eq!(manual, helper);
}

#[test]
fn go_back_is_noop_below_two_entries() {
    let mut empty = SessionHistory::new();
    assert!(empty.go_back().is_none());

    let mut single = history_of(&["A"]);
    assert!(single.go_back().is_none());
    assert_eq!(single.snapshot(), vec!["A"]);
}

#[test]
fn go_back_over_repeated_entries() {
    let mut history = history_of(&["A", "B", "B", "C"]);
    assert_eq!(history.go_back().as_deref(), Some("B"));
    assert_eq!(history.snapshot(), vec!["A", "B", "B"]);
}

#[test]
fn repeated_go_back_walks_to_first() {
    let mut history = history_of(&["A", "B", "C"]);
    assert_eq!(history.go_back().as_deref(), Some("B"));
    assert_eq!(history.go_back().as_deref(), Some("A"));
    assert!(history.go_back().is_none());
    assert_eq!(history.snapshot(), vec!["A"]);
}
