//! Acceptance tests for template reuse across items
//!
//! A recycled template must carry nothing of its previous item: no
//! listeners, no visual state, no live callbacks.

use crate::model::action::CLEAR_ACTION_ID;
use crate::model::{Action, NotificationItem, ProgressState, Severity};
use crate::row::template::EXPANDED_CLASS;
use crate::row::ProgressMode;
use crate::test_harness::{item, RowHarness};

// ===== Listener Isolation =====

#[test]
fn rebinding_releases_every_listener_of_the_previous_item() {
    // GIVEN: A template bound to item A
    let mut harness = RowHarness::new();
    let id = harness.create();
    let a = item(NotificationItem::builder("a"));
    let b = item(NotificationItem::builder("b"));
    harness.bind(&a, id);
    assert_eq!(a.change_listener_count(), 1);

    // WHEN: The template is rebound to item B
    harness.bind(&b, id);

    // THEN: A has no listeners left and B holds exactly one
    assert_eq!(a.change_listener_count(), 0);
    assert_eq!(b.change_listener_count(), 1);
    assert_eq!(harness.template(id).active_subscriptions(), 1);

    // AND: Binding back and forth never accumulates
    harness.bind(&a, id);
    harness.bind(&b, id);
    harness.bind(&a, id);
    assert_eq!(a.change_listener_count(), 1);
    assert_eq!(b.change_listener_count(), 0);
}

#[test]
fn rebinding_the_same_item_keeps_one_listener() {
    let mut harness = RowHarness::new();
    let id = harness.create();
    let a = item(NotificationItem::builder("a"));

    harness.bind(&a, id);
    harness.bind(&a, id);

    assert_eq!(a.change_listener_count(), 1);
}

// ===== Visual State Reset =====

#[test]
fn rebinding_resets_every_region() {
    // GIVEN: A template showing an expanded error with source, buttons and progress
    let mut harness = RowHarness::new();
    let id = harness.create();
    let busy = item(
        NotificationItem::builder("Deploy failed")
            .severity(Severity::Error)
            .expanded(true)
            .source("ci")
            .primary(Action::plain("retry", "Retry"))
            .progress(ProgressState::Infinite),
    );
    harness.bind(&busy, id);
    assert!(harness.template(id).elements().has_details());

    // WHEN: The template is rebound to a short, collapsed info item
    let plain = item(NotificationItem::builder("Saved"));
    harness.bind(&plain, id);

    // THEN: Nothing of the first item remains
    {
        let template = harness.template(id);
        let elements = template.elements();
        assert!(!elements.container.contains(EXPANDED_CLASS));
        assert_eq!(elements.icon.classes.iter().collect::<Vec<_>>(), vec!["severity-info"]);
        assert_eq!(elements.message.text(), "Saved");
        assert_eq!(elements.message.title(), None);
        assert_eq!(elements.source.text(), None);
        assert!(elements.buttons.buttons().is_empty());
        assert_eq!(elements.toolbar.action_ids(), vec![CLEAR_ACTION_ID]);
        assert_eq!(elements.progress.mode(), ProgressMode::Stopped);
        assert!(!elements.progress.is_visible());
    }

    // WHEN: The busy item is followed by a determinate item with only a total
    harness.bind(&busy, id);
    let sized = item(
        NotificationItem::builder("Sized")
            .progress(ProgressState::Determinate { total: Some(10), worked: None }),
    );
    harness.bind(&sized, id);

    // THEN: The bar knows the total but stays hidden
    {
        let template = harness.template(id);
        let elements = template.elements();
        assert_eq!(elements.progress.mode(), ProgressMode::Determinate);
        assert_eq!(elements.progress.total(), Some(10));
        assert_eq!(elements.progress.worked(), 0);
        assert!(!elements.progress.is_visible());
    }

    // WHEN: A half-done item is followed by one reporting only worked units
    let half = item(
        NotificationItem::builder("Half")
            .progress(ProgressState::Determinate { total: Some(10), worked: Some(5) }),
    );
    harness.bind(&half, id);
    let counting = item(
        NotificationItem::builder("Counting")
            .progress(ProgressState::Determinate { total: None, worked: Some(3) }),
    );
    harness.bind(&counting, id);

    // THEN: The previous total is gone
    {
        let template = harness.template(id);
        let elements = template.elements();
        assert_eq!(elements.progress.total(), None);
        assert_eq!(elements.progress.worked(), 3);
        assert!(elements.progress.is_visible());
    }

    // WHEN: The busy item is followed by a determinate item with neither value
    harness.bind(&busy, id);
    let empty = item(
        NotificationItem::builder("Empty")
            .progress(ProgressState::Determinate { total: None, worked: None }),
    );
    harness.bind(&empty, id);

    // THEN: The bar is stopped and hidden
    let template = harness.template(id);
    let elements = template.elements();
    assert_eq!(elements.progress.mode(), ProgressMode::Stopped);
    assert!(!elements.progress.is_visible());
}

// ===== Superseded Items =====

#[test]
fn changes_to_a_superseded_item_leave_the_row_alone() {
    // GIVEN: A template that moved from item A to item B
    let mut harness = RowHarness::new();
    let id = harness.create();
    let a = item(NotificationItem::builder("a"));
    let b = item(NotificationItem::builder("b"));
    harness.bind(&a, id);
    harness.bind(&b, id);

    // WHEN: A changes severity and starts reporting progress
    a.set_severity(Severity::Error);
    a.progress_infinite();

    // THEN: The row still shows B
    let template = harness.template(id);
    let elements = template.elements();
    assert_eq!(elements.icon.classes.iter().collect::<Vec<_>>(), vec!["severity-info"]);
    assert!(!elements.progress.is_visible());
    assert_eq!(elements.message.text(), "b");
}

#[test]
fn buttons_of_a_superseded_render_still_target_their_own_item() {
    // GIVEN: An expanded item with a button, then a rebind to another item
    let mut harness = RowHarness::new();
    let id = harness.create();
    let first = item(
        NotificationItem::builder("first")
            .expanded(true)
            .primary(Action::plain("ok", "OK")),
    );
    let second = item(NotificationItem::builder("second"));
    harness.bind(&first, id);
    harness.bind(&second, id);

    // WHEN: Looking for the old button on the recycled row
    let activated = harness.template(id).activate_button(0);
    harness.run();

    // THEN: It is gone and neither item was closed
    assert!(!activated);
    assert!(!first.is_closed());
    assert!(!second.is_closed());
    assert!(harness.recorders.runner.ran.borrow().is_empty());
}
