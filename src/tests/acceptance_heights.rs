//! Acceptance tests for row height prediction inside the list
//!
//! Heights are predicted before a row is bound and re-predicted when the
//! item's expansion, message or actions change.

use crate::model::action::{CLEAR_ACTION_ID, EXPAND_ACTION_ID};
use crate::model::{Action, NotificationItem, Severity};
use crate::test_harness::{item, ListHarness};
use std::rc::Rc;

// ===== Expansion =====

#[test]
fn error_with_source_and_button_grows_by_a_details_row_when_expanded() {
    // GIVEN: A collapsed error with a source and a primary action
    let mut harness = ListHarness::new(300);
    let failed = item(
        NotificationItem::builder("Build failed")
            .severity(Severity::Error)
            .source("ci")
            .primary(Action::plain("retry", "Retry")),
    );
    harness.list.push(Rc::clone(&failed));
    harness.settle();

    // THEN: It occupies one row
    assert_eq!(harness.list.height(0), Some(42));
    {
        let template = harness.list.template_at(0).expect("bound");
        assert_eq!(
            template.elements().toolbar.action_ids(),
            vec![EXPAND_ACTION_ID, CLEAR_ACTION_ID]
        );
    }

    // WHEN: The item expands
    failed.expand();
    harness.settle();

    // THEN: A details row is added below the single message line
    assert_eq!(harness.list.height(0), Some(84));
    let template = harness.list.template_at(0).expect("bound");
    let elements = template.elements();
    assert_eq!(elements.source.text(), Some("Source: ci"));
    assert_eq!(elements.buttons.buttons().len(), 1);
}

#[test]
fn collapsing_restores_the_single_row() {
    let mut harness = ListHarness::new(300);
    let long = item(NotificationItem::builder("w ".repeat(30)).expanded(true));
    harness.list.push(Rc::clone(&long));
    harness.settle();
    let expanded = harness.list.height(0).expect("height");
    assert!(expanded > 42);

    long.collapse();
    harness.settle();

    assert_eq!(harness.list.height(0), Some(42));
    assert_eq!(harness.list.total_height(), 42);
}

#[test]
fn fixed_notifications_never_offer_a_toggle() {
    // GIVEN: A long message that cannot collapse
    let mut harness = ListHarness::new(300);
    let fixed = item(NotificationItem::builder("c".repeat(90)).can_collapse(false));
    harness.list.push(Rc::clone(&fixed));
    harness.settle();

    // WHEN: Something asks it to expand
    fixed.expand();
    harness.settle();

    // THEN: It stays one row high and the toolbar only offers clear
    assert!(!fixed.expanded());
    assert_eq!(harness.list.height(0), Some(42));
    let template = harness.list.template_at(0).expect("bound");
    assert_eq!(template.elements().toolbar.action_ids(), vec![CLEAR_ACTION_ID]);
}

// ===== Content Changes =====

#[test]
fn longer_message_while_expanded_is_remeasured() {
    // GIVEN: An expanded single-line message
    let mut harness = ListHarness::new(300);
    let note = item(NotificationItem::builder("short").expanded(true));
    harness.list.push(Rc::clone(&note));
    harness.settle();
    assert_eq!(harness.list.height(0), Some(42));

    // WHEN: The message grows past two lines of the 20-cell message area
    note.set_message("word ".repeat(10).trim_end().to_string());
    harness.settle();

    // THEN: Each extra line adds a line height
    assert_eq!(harness.list.height(0), Some(42 + 2 * 22));
    let template = harness.list.template_at(0).expect("bound");
    assert_eq!(template.elements().message.text(), "word ".repeat(10).trim_end());
}

#[test]
fn adding_primary_actions_while_expanded_adds_details_row() {
    let mut harness = ListHarness::new(300);
    let note = item(NotificationItem::builder("ready").expanded(true));
    harness.list.push(Rc::clone(&note));
    harness.settle();
    assert_eq!(harness.list.height(0), Some(42));

    note.set_actions(crate::model::NotificationActions::primary(vec![Action::plain(
        "open", "Open",
    )]));
    harness.settle();

    assert_eq!(harness.list.height(0), Some(84));
}

#[test]
fn rows_below_a_growing_row_move_down() {
    let mut harness = ListHarness::new(300);
    let first = item(NotificationItem::builder("first").source("ext"));
    harness.list.push(Rc::clone(&first));
    harness.list.push(item(NotificationItem::builder("second")));
    harness.settle();
    assert_eq!(harness.list.offset_of(1), 42);

    first.expand();
    harness.settle();

    assert_eq!(harness.list.offset_of(1), 84);
    assert_eq!(harness.list.total_height(), 126);
}
