//! Grid layout: fixed/scrollable partitioning, scroll offset synchronization
//! and virtual scrollbar geometry.
//!
//! This module handles:
//! - Building column/row descriptors for the three column and row groups
//! - Translating scrollbar pixels into logical offsets and back
//! - Rescaling offsets when the data matrix is replaced
//! - Sizing the virtual scrollbars and turning wheel/touch input into pixels

mod partition;
mod scrollbar;
mod viewport;

pub use partition::{
    ColumnDescriptor, ColumnGroup, GridPartition, RowDescriptor, RowGroup, RowHeaderColumn,
    ROW_NUMBER_CLASS,
};
pub use scrollbar::{
    horizontal_size, vertical_size, wheel_line_scroll, ScrollbarGeometry, ScrollbarSize,
    ScrollbarState, WHEEL_LINES, WHEEL_LINE_PX,
};
pub use viewport::{rescale_offset, AxisMetrics, Viewport};

/// Round a finite number to the nearest index, clamping negatives to zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn round_to_index(x: f64) -> Option<usize> {
    if !x.is_finite() {
        return None;
    }
    Some(x.round().max(0.0) as usize)
}
