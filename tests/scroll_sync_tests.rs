//! Scroll synchronization tests
//!
//! Raw scrollbar events, debouncing, programmatic offsets and the rescaling
//! of offsets when the data matrix is replaced.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{first_row, matrix, Harness};
use std::cell::Cell;
use std::rc::Rc;
use wingrid::{
    Axis, ColumnBand, RowBand, ScrollDirection, ScrollEvent, TableConfig, WheelTarget,
};

fn vertical(px: f64, extent: f64) -> ScrollEvent {
    ScrollEvent::new(Some(Axis::Vertical), px, extent)
}

#[test]
fn test_burst_of_scroll_events_recomputes_once_with_last_event() {
    let mut h = Harness::new(TableConfig::default(), matrix(1_002, 20));
    h.settle();
    h.scrolls.borrow_mut().clear();
    let version = h.table.content_version();

    for px in [500.0, 1_000.0, 1_500.0, 2_000.0, 2_500.0] {
        h.table.scroll_event(vertical(px, 10_000.0));
        let outcome = h.advance(20.0);
        assert!(!outcome.content_updated);
    }
    assert_eq!(h.table.content_version(), version);

    let outcome = h.advance(120.0);
    assert_eq!(outcome.scrolled, Some(Axis::Vertical));
    assert_eq!(h.table.content_version(), version + 1);
    // 2500 / 10000 of 1000 scrollable rows
    assert_eq!(h.table.scroll_position().top, 250);

    let scrolls = h.scrolls.borrow();
    assert_eq!(scrolls.len(), 1);
    let (event, info) = scrolls[0];
    assert_eq!(event.unwrap().position_px, 2_500.0);
    assert_eq!(info.top, 251);
    assert_eq!(info.left, 1);
    assert_eq!(info.direction, ScrollDirection::Vertical);
}

#[test]
fn test_horizontal_scroll_event() {
    let mut h = Harness::new(TableConfig::default(), matrix(50, 402));
    h.table
        .scroll_event(ScrollEvent::new(Some(Axis::Horizontal), 300.0, 1_000.0));
    h.advance(120.0);
    assert_eq!(h.table.scroll_position().left, 120);
    assert_eq!(first_row(&h.table, RowBand::Middle, ColumnBand::Center), 1);
    let last = h.scrolls.borrow().last().copied().unwrap();
    assert_eq!(last.1.direction, ScrollDirection::Horizontal);
    assert_eq!(last.1.left, 121);
}

#[test]
fn test_unclassified_scroll_target_is_ignored() {
    let mut h = Harness::new(TableConfig::default(), matrix(500, 20));
    let version = h.table.content_version();
    h.table.scroll_event(ScrollEvent::new(None, 300.0, 1_000.0));
    let outcome = h.advance(120.0);
    assert_eq!(outcome.scrolled, None);
    assert_eq!(h.table.scroll_position().top, 0);
    assert_eq!(h.table.content_version(), version);
}

#[test]
fn test_scroll_echo_of_programmatic_offset_is_swallowed() {
    let mut h = Harness::new(TableConfig::default(), matrix(200, 20));
    h.table.measure_scrollbar(Axis::Vertical, 100.0, 1_000.0);
    assert_eq!(h.table.set_scroll_top(94), 94);
    let bar = *h.table.scrollbar(Axis::Vertical);
    // 94 of 188 offsets is half of the scrollbar content.
    assert_eq!(bar.position_px, 500.0);

    // The browser reports the scrollbar move back as a scroll event.
    h.table.scroll_event(vertical(bar.position_px, bar.scroll_extent_px));
    let outcome = h.advance(120.0);
    assert_eq!(outcome.scrolled, None);
    assert_eq!(h.table.scroll_position().top, 94);

    // The next genuine event goes through.
    h.table.scroll_event(vertical(100.0, 1_000.0));
    assert_eq!(h.advance(120.0).scrolled, Some(Axis::Vertical));
    assert_eq!(h.table.scroll_position().top, 20);
}

#[test]
fn test_data_replaced_with_half_the_rows_rescales_offset() {
    let mut h = Harness::new(TableConfig::default(), matrix(200, 20));
    assert_eq!(h.table.set_scroll_top(1_000), 188);
    h.table.set_data(matrix(100, 20));
    assert_eq!(h.table.scroll_position().top, 87);
    assert_eq!(first_row(&h.table, RowBand::Middle, ColumnBand::Center), 88);
}

#[test]
fn test_data_smaller_than_window_resets_offset() {
    let mut h = Harness::new(TableConfig::default(), matrix(200, 20));
    h.table.set_scroll_top(150);
    h.table.set_data(matrix(8, 20));
    assert_eq!(h.table.scroll_position().top, 0);
}

#[test]
fn test_data_replacement_recomputes_and_refreshes_scrollbars() {
    let mut h = Harness::new(TableConfig::default(), matrix(200, 20));
    h.settle();
    let version = h.table.content_version();
    h.table.set_data(Rc::new(wingrid::DataMatrix::from_fn(300, 20, |_, _| {
        wingrid::CellValue::from(1.0)
    })));
    assert_eq!(h.table.content_version(), version + 1);
    let outcome = h.advance(10.0);
    let geometry = outcome.geometry.unwrap();
    assert!(geometry.vertical.is_visible());
    assert!(geometry.horizontal.is_some());
}

#[test]
fn test_wheel_on_scrollbar_uses_wheel_delay() {
    let mut h = Harness::new(TableConfig::default(), matrix(1_002, 20));
    h.settle();
    assert!(!h.table.wheel_event(WheelTarget::VerticalScrollbar, 100.0));
    h.table.scroll_event(vertical(1_000.0, 10_000.0));
    assert_eq!(h.advance(120.0).scrolled, None);
    assert_eq!(h.advance(380.0).scrolled, Some(Axis::Vertical));
    assert_eq!(h.table.scroll_position().top, 100);
    // The wheel delay has been restored to the regular one.
    assert_eq!(h.table.scroll_delay_ms(), 120.0);
}

#[test]
fn test_wheel_over_body_stops_at_edges() {
    let mut h = Harness::new(TableConfig::default(), matrix(100, 20));
    h.table.measure_scrollbar(Axis::Vertical, 200.0, 240.0);
    assert!(h.table.wheel_event(WheelTarget::Body, 1.0));
    assert!(h.table.wheel_event(WheelTarget::Body, 1.0));
    assert_eq!(h.table.scrollbar(Axis::Vertical).position_px, 40.0);
    assert!(!h.table.wheel_event(WheelTarget::Body, 1.0));
    assert!(h.table.wheel_event(WheelTarget::HorizontalScrollbar, -1.0));
    assert_eq!(h.table.scrollbar(Axis::Vertical).position_px, 10.0);
}

#[test]
fn test_auto_resize_switch() {
    for (auto_resize, expect_refresh) in [(true, true), (false, false)] {
        let config = TableConfig {
            vertical_scrollbar_auto_resize: Some(auto_resize),
            ..TableConfig::default()
        };
        let mut h = Harness::new(config, matrix(1_002, 20));
        h.settle();
        h.table.scroll_event(vertical(1_000.0, 10_000.0));
        h.advance(120.0);
        let outcome = h.advance(10.0);
        assert_eq!(outcome.geometry.is_some(), expect_refresh);
        if let Some(geometry) = outcome.geometry {
            // Vertical-only refreshes keep the horizontal size.
            assert!(geometry.horizontal.is_some());
        }
    }
}

#[test]
fn test_touch_drag_scrolls_and_reprojects() {
    let mut h = Harness::new(TableConfig::default(), matrix(1_002, 20));
    h.table.measure_scrollbar(Axis::Vertical, 100.0, 1_000.0);
    let version = h.table.content_version();
    h.table.touch_start(10.0, 500.0);
    h.table.touch_move(10.0, 400.0);
    assert_eq!(h.table.scroll_position().top, 100);
    assert!(h.table.content_version() > version);
    h.table.touch_end();
    // Without a touch start, moves are ignored.
    h.table.touch_move(10.0, 0.0);
    assert_eq!(h.table.scroll_position().top, 100);
}

#[test]
fn test_touch_move_projects_once_per_event() {
    let mut h = Harness::new(TableConfig::default(), matrix(1_002, 1_002));
    h.table.measure_scrollbar(Axis::Vertical, 100.0, 1_000.0);
    h.table.measure_scrollbar(Axis::Horizontal, 100.0, 1_000.0);
    let updates = Rc::new(Cell::new(0));
    let counter = Rc::clone(&updates);
    h.table.on_content_updated(move || counter.set(counter.get() + 1));
    let callbacks = h.scrolls.borrow().len();

    h.table.touch_start(300.0, 300.0);
    h.table.touch_move(250.0, 200.0);
    assert_eq!(updates.get(), 1);
    assert_eq!(h.scrolls.borrow().len(), callbacks + 2);

    // A move that shifts neither offset leaves the regions alone.
    h.table.touch_move(250.0, 200.0);
    assert_eq!(updates.get(), 1);
    assert_eq!(h.scrolls.borrow().len(), callbacks + 2);
}
