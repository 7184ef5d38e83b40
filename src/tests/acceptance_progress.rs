//! Acceptance tests for live progress and severity patching
//!
//! Progress and severity changes are applied to the bound row in place,
//! without a rebind or a re-measure.

use crate::model::{NotificationItem, ProgressState, Severity};
use crate::row::ProgressMode;
use crate::test_harness::{item, ListHarness, RowHarness};
use std::rc::Rc;

// ===== Progress Transitions =====

#[test]
fn infinite_then_done_hides_without_a_determinate_step() {
    // GIVEN: A row showing indeterminate progress
    let mut harness = RowHarness::new();
    let id = harness.create();
    let task = item(NotificationItem::builder("Indexing").progress(ProgressState::Infinite));
    harness.bind(&task, id);
    let before = harness.template(id).elements().progress.mutations();

    // WHEN: The work finishes
    task.progress_done();

    // THEN: The bar went straight to done and hid
    let template = harness.template(id);
    let elements = template.elements();
    let progress = &elements.progress;
    assert_eq!(progress.mode(), ProgressMode::Done);
    assert!(!progress.is_visible());
    assert_eq!(progress.total(), None);
    assert_eq!(progress.mutations(), before + 2);
}

#[test]
fn determinate_progress_fills_as_work_is_reported() {
    // GIVEN: A bound row without progress
    let mut harness = RowHarness::new();
    let id = harness.create();
    let copy = item(NotificationItem::builder("Copying"));
    harness.bind(&copy, id);

    // WHEN: A total is announced and work comes in
    copy.progress_total(10);
    {
        let template = harness.template(id);
        let elements = template.elements();
        let progress = &elements.progress;
        assert_eq!(progress.mode(), ProgressMode::Determinate);
        assert!(!progress.is_visible(), "no work reported yet");
    }
    copy.progress_worked(4);
    copy.progress_worked(1);

    // THEN: The bar is visible at half
    let template = harness.template(id);
    let elements = template.elements();
    let progress = &elements.progress;
    assert!(progress.is_visible());
    assert_eq!(progress.total(), Some(10));
    assert_eq!(progress.worked(), 5);
    assert_eq!(progress.ratio(), Some(0.5));
}

#[test]
fn reapplying_the_same_progress_is_not_a_visual_change() {
    let mut harness = RowHarness::new();
    let id = harness.create();
    let task = item(NotificationItem::builder("Syncing").progress(ProgressState::Determinate {
        total: Some(8),
        worked: Some(2),
    }));
    harness.bind(&task, id);
    let before = harness.template(id).elements().progress.mutations();

    // Setting the state the item already has fires nothing.
    task.set_progress(ProgressState::Determinate {
        total: Some(8),
        worked: Some(2),
    });
    // Rebinding re-applies it to the bar.
    harness.bind(&task, id);

    assert_eq!(harness.template(id).elements().progress.mutations(), before);
}

// ===== Severity =====

#[test]
fn severity_change_swaps_the_marker_in_place() {
    // GIVEN: A bound warning
    let mut harness = RowHarness::new();
    let id = harness.create();
    let disk = item(NotificationItem::builder("Disk low").severity(Severity::Warning));
    harness.bind(&disk, id);

    // WHEN: It escalates to an error
    disk.set_severity(Severity::Error);

    // THEN: Exactly one marker, the new one
    let template = harness.template(id);
    let markers: Vec<_> = template.elements().icon.classes.iter().collect();
    assert_eq!(markers, vec!["severity-error"]);
}

// ===== Unrelated Changes =====

#[test]
fn message_and_expansion_changes_wait_for_the_list() {
    // GIVEN: A row bound through the list
    let mut harness = ListHarness::new(200);
    let note = item(NotificationItem::builder("before").source("ext"));
    harness.list.push(Rc::clone(&note));
    harness.settle();

    // WHEN: The message and expansion change without a sync
    note.set_message("after");
    note.expand();

    // THEN: The presenter left the row as it was
    {
        let template = harness.list.template_at(0).expect("bound");
        let elements = template.elements();
        assert_eq!(elements.message.text(), "before");
        assert_eq!(elements.source.text(), None);
    }
    assert_eq!(harness.list.height(0), Some(42));

    // AND: The next sync rebinds and re-measures
    harness.settle();
    let template = harness.list.template_at(0).expect("bound");
    assert_eq!(template.elements().message.text(), "after");
    assert_eq!(harness.list.height(0), Some(84));
}

#[test]
fn progress_changes_do_not_remeasure() {
    let mut harness = ListHarness::new(200);
    let task = item(NotificationItem::builder("Upload"));
    harness.list.push(Rc::clone(&task));
    harness.settle();

    task.progress_infinite();

    let template = harness.list.template_at(0).expect("bound");
    assert!(template.elements().progress.is_visible());
    assert_eq!(harness.list.height(0), Some(42));
}
