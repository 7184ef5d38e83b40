//! Property-based tests for row height prediction.
//!
//! Tests validate height invariants over the public API:
//! 1. Collapsed rows are always one row high
//! 2. Expanded height is the row plus extra message lines plus a details row
//! 3. Wider rows never predict taller heights
//! 4. List offsets are prefix sums of the predicted heights

use futures::executor::LocalPool;
use notiview::config::KeyBindings;
use notiview::list::VirtualList;
use notiview::model::{Action, ListEntry, NotificationItem};
use notiview::render::{InlineMarkdownRenderer, TextMetrics};
use notiview::row::{HeightOracle, RowLayout, FIXED_CHROME, LINE_HEIGHT, ROW_HEIGHT};
use notiview::services::{
    EnglishLocalizer, NotificationActionRunner, Services, StaticTheme, SystemOpener,
    TracingErrorSink,
};
use proptest::prelude::*;
use std::rc::Rc;

// ===== Helper Functions =====

fn oracle(width: u32, cell: u32) -> HeightOracle {
    HeightOracle::new(RowLayout::new(
        width,
        TextMetrics::new(cell),
        Rc::new(InlineMarkdownRenderer),
    ))
}

/// Plain words only, so the rendered width is one cell per character.
fn arb_message() -> impl Strategy<Value = String> {
    "[a-z]{0,120}"
}

#[derive(Debug, Clone)]
struct Shape {
    message: String,
    expanded: bool,
    source: bool,
    primary: bool,
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    (arb_message(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(message, expanded, source, primary)| Shape {
            message,
            expanded,
            source,
            primary,
        },
    )
}

fn build(shape: &Shape) -> NotificationItem {
    let mut builder = NotificationItem::builder(shape.message.clone()).expanded(shape.expanded);
    if shape.source {
        builder = builder.source("ext");
    }
    if shape.primary {
        builder = builder.primary(Action::plain("ok", "OK"));
    }
    builder.build()
}

fn services(pool: &LocalPool) -> Services {
    Services {
        opener: Rc::new(SystemOpener),
        runner: Rc::new(NotificationActionRunner),
        keybindings: Rc::new(KeyBindings::default()),
        localizer: Rc::new(EnglishLocalizer),
        theme: Rc::new(StaticTheme::named("dark")),
        errors: Rc::new(TracingErrorSink),
        spawner: pool.spawner(),
    }
}

// ===== Properties =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Collapsed rows never look at the message.
    #[test]
    fn collapsed_rows_are_one_row_high(
        message in arb_message(),
        width in 0u32..1200,
        source in any::<bool>(),
    ) {
        let mut oracle = oracle(width, 7);
        let mut builder = NotificationItem::builder(message);
        if source {
            builder = builder.source("ext");
        }
        let entry = ListEntry::Notification(Rc::new(builder.build()));

        prop_assert_eq!(oracle.height(&entry), ROW_HEIGHT);
    }

    /// Expanded height follows the row arithmetic exactly.
    #[test]
    fn expanded_height_matches_line_count(
        message in arb_message(),
        width in (FIXED_CHROME + 1)..1200,
        cell in 5u32..14,
        source in any::<bool>(),
        primary in any::<bool>(),
    ) {
        let shape = Shape { message, expanded: true, source, primary };
        let item = build(&shape);
        let mut oracle = oracle(width, cell);

        // Only whole cells of the message client count as room.
        let cells_per_line = ((width - FIXED_CHROME) / cell).max(1);
        let lines = (shape.message.chars().count() as u32)
            .div_ceil(cells_per_line)
            .max(1);
        let details = if source || primary { ROW_HEIGHT } else { 0 };

        prop_assert_eq!(oracle.preferred_rows(&item), lines);
        prop_assert_eq!(
            oracle.notification_height(&item),
            ROW_HEIGHT + (lines - 1) * LINE_HEIGHT + details
        );
        prop_assert!(oracle.surface().is_empty());
    }

    /// Widening a row never makes it taller.
    #[test]
    fn wider_rows_are_never_taller(
        shape in arb_shape(),
        narrow in 150u32..600,
        extra in 0u32..600,
    ) {
        let item = build(&shape);
        let narrow_height = oracle(narrow, 7).notification_height(&item);
        let wide_height = oracle(narrow + extra, 7).notification_height(&item);

        prop_assert!(wide_height <= narrow_height);
        prop_assert!(wide_height >= ROW_HEIGHT);
    }

    /// Offsets in the list are prefix sums of per-row heights.
    #[test]
    fn list_offsets_are_prefix_sums(shapes in prop::collection::vec(arb_shape(), 0..30)) {
        let pool = LocalPool::new();
        let layout = RowLayout::new(314, TextMetrics::new(10), Rc::new(InlineMarkdownRenderer));
        let mut list = VirtualList::new(Rc::clone(&layout), services(&pool), 200);
        let mut expected = oracle(314, 10);

        let mut offset = 0;
        for (index, shape) in shapes.iter().enumerate() {
            let item = Rc::new(build(shape));
            let height = expected.notification_height(&item);
            list.push(item);

            prop_assert_eq!(list.offset_of(index), offset);
            prop_assert_eq!(list.height(index), Some(height));
            offset += height;
        }
        prop_assert_eq!(list.total_height(), offset);
        prop_assert!(list.scroll_top() <= list.max_scroll());
    }
}
