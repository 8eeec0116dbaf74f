//! Virtual scrollbar geometry.
//!
//! The grid never scrolls natively. Two empty "scrollbar" elements, each
//! inside an overflow wrapper, are sized so that the wrapper scrolls in
//! proportion to the data extent; their pixel positions are then read back
//! and translated into logical offsets by [`super::Viewport`].

use serde::Serialize;

use super::GridPartition;
use crate::types::{ColumnBand, RowBand};

/// Lines scrolled per wheel notch over the table body.
pub const WHEEL_LINES: i32 = 3;
/// Pixel height of one wheel line.
pub const WHEEL_LINE_PX: f64 = 10.0;

/// Size of a scrollbar's inner element, as a percentage of its wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "display", rename_all = "lowercase")]
pub enum ScrollbarSize {
    Hidden,
    Visible { percent: f64 },
}

impl ScrollbarSize {
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible { .. })
    }

    /// CSS length for the inner element, `None` when hidden.
    pub fn css(self) -> Option<String> {
        match self {
            Self::Hidden => None,
            Self::Visible { percent } => Some(format!("{percent}%")),
        }
    }
}

/// Vertical scrollbar size: shown only when the scrollable rows exceed the
/// middle window.
#[allow(clippy::cast_precision_loss)]
pub fn vertical_size(extent: usize, middle_rows: usize) -> ScrollbarSize {
    if middle_rows == 0 {
        return ScrollbarSize::Hidden;
    }
    let percent = extent as f64 / middle_rows as f64 * 100.0;
    if percent > 100.0 {
        ScrollbarSize::Visible { percent }
    } else {
        ScrollbarSize::Hidden
    }
}

/// Horizontal scrollbar size, rounded up to a whole percent.
#[allow(clippy::cast_precision_loss)]
pub fn horizontal_size(extent: usize, center_columns: usize) -> ScrollbarSize {
    if center_columns == 0 {
        return ScrollbarSize::Hidden;
    }
    let ratio = extent as f64 / center_columns as f64 * 100.0;
    if ratio <= 100.0 {
        ScrollbarSize::Hidden
    } else {
        ScrollbarSize::Visible {
            percent: ratio.ceil(),
        }
    }
}

/// Sizes of both scrollbars after a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollbarGeometry {
    pub vertical: ScrollbarSize,
    /// `None` for a vertical-only refresh.
    pub horizontal: Option<ScrollbarSize>,
}

impl ScrollbarGeometry {
    pub fn compute(
        partition: &GridPartition,
        total_rows: usize,
        total_columns: usize,
        vertical_only: bool,
    ) -> Self {
        let rows = total_rows.saturating_sub(partition.fixed_rows());
        let vertical = vertical_size(rows, partition.row_count(RowBand::Middle));
        let horizontal = (!vertical_only).then(|| {
            let columns = total_columns.saturating_sub(partition.fixed_columns());
            horizontal_size(columns, partition.column_count(ColumnBand::Center))
        });
        Self {
            vertical,
            horizontal,
        }
    }
}

/// Pixel state of one scrollbar wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollbarState {
    /// `scrollTop` / `scrollLeft` of the wrapper.
    pub position_px: f64,
    /// `scrollHeight` / `scrollWidth` of the wrapper.
    pub scroll_extent_px: f64,
    /// Visible height/width of the wrapper.
    pub client_px: f64,
    /// `offsetHeight` / `offsetWidth` of the inner scrollbar element.
    pub content_px: f64,
}

impl ScrollbarState {
    pub fn new(scroll_extent_px: f64, client_px: f64) -> Self {
        Self {
            position_px: 0.0,
            scroll_extent_px,
            client_px,
            content_px: scroll_extent_px,
        }
    }

    /// Largest reachable scroll position.
    pub fn max_position(&self) -> f64 {
        (self.scroll_extent_px - self.client_px).max(0.0)
    }

    /// Set the scroll position, clamped like a browser would.
    pub fn set_position(&mut self, px: f64) {
        self.position_px = if px.is_finite() {
            px.clamp(0.0, self.max_position())
        } else {
            0.0
        };
    }

    /// Scroll by `delta_px`; returns true if the position moved.
    pub fn scroll_by(&mut self, delta_px: f64) -> bool {
        let before = self.position_px;
        self.set_position(before + delta_px);
        (self.position_px - before).abs() > f64::EPSILON
    }

    /// `position / scroll extent`, 0 when nothing can scroll.
    pub fn ratio(&self) -> f64 {
        if self.scroll_extent_px > 0.0 {
            self.position_px / self.scroll_extent_px
        } else {
            0.0
        }
    }

    pub fn at_start(&self) -> bool {
        self.position_px <= 0.0
    }

    pub fn at_end(&self) -> bool {
        self.position_px + self.client_px >= self.scroll_extent_px
    }

    /// Apply new wrapper dimensions while keeping the scroll ratio.
    ///
    /// Returns true if the wrapper height changed.
    pub fn resize(&mut self, client_px: f64, scroll_extent_px: f64) -> bool {
        let ratio = self.ratio();
        let changed = (self.client_px - client_px).abs() > f64::EPSILON;
        self.client_px = client_px;
        self.scroll_extent_px = scroll_extent_px;
        self.content_px = scroll_extent_px;
        self.set_position(ratio * scroll_extent_px);
        changed
    }
}

/// Pixel delta for a wheel event over the table body, or `None` when the
/// vertical scrollbar cannot move in that direction.
pub fn wheel_line_scroll(state: &ScrollbarState, delta_y: f64) -> Option<f64> {
    if state.scroll_extent_px <= 0.0 {
        return None;
    }
    let lines = if delta_y > 0.0 {
        WHEEL_LINES
    } else {
        -WHEEL_LINES
    };
    if (lines < 0 && state.at_start()) || (lines > 0 && state.at_end()) {
        return None;
    }
    Some(f64::from(lines) * WHEEL_LINE_PX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::TableConfig;

    #[test]
    fn test_vertical_size() {
        assert_eq!(
            vertical_size(198, 10),
            ScrollbarSize::Visible { percent: 1980.0 }
        );
        assert_eq!(vertical_size(10, 10), ScrollbarSize::Hidden);
        assert_eq!(vertical_size(5, 0), ScrollbarSize::Hidden);
    }

    #[test]
    fn test_horizontal_size_rounds_up() {
        assert_eq!(
            horizontal_size(11, 3),
            ScrollbarSize::Visible { percent: 367.0 }
        );
        assert_eq!(horizontal_size(3, 3), ScrollbarSize::Hidden);
        assert_eq!(horizontal_size(0, 0), ScrollbarSize::Hidden);
        assert_eq!(
            horizontal_size(11, 3).css().unwrap(),
            "367%"
        );
    }

    #[test]
    fn test_geometry_vertical_only() {
        let partition = GridPartition::from_config(&TableConfig::default());
        let geometry = ScrollbarGeometry::compute(&partition, 200, 200, true);
        assert!(geometry.vertical.is_visible());
        assert!(geometry.horizontal.is_none());

        let geometry = ScrollbarGeometry::compute(&partition, 5, 5, false);
        assert_eq!(geometry.vertical, ScrollbarSize::Hidden);
        assert_eq!(geometry.horizontal, Some(ScrollbarSize::Hidden));
    }

    #[test]
    fn test_state_clamps_position() {
        let mut state = ScrollbarState::new(1000.0, 200.0);
        state.set_position(5000.0);
        assert_eq!(state.position_px, 800.0);
        assert!(state.at_end());
        assert!(!state.scroll_by(10.0));
        assert!(state.scroll_by(-100.0));
        assert_eq!(state.position_px, 700.0);
        state.set_position(f64::NAN);
        assert!(state.at_start());
    }

    #[test]
    fn test_resize_preserves_ratio() {
        let mut state = ScrollbarState::new(1000.0, 200.0);
        state.set_position(250.0);
        assert!(state.resize(300.0, 2000.0));
        assert_eq!(state.position_px, 500.0);
        assert!(!state.resize(300.0, 2000.0));
    }

    #[test]
    fn test_wheel_line_scroll() {
        let mut state = ScrollbarState::new(1000.0, 200.0);
        assert_eq!(wheel_line_scroll(&state, -1.0), None);
        assert_eq!(wheel_line_scroll(&state, 4.0), Some(30.0));
        state.set_position(800.0);
        assert_eq!(wheel_line_scroll(&state, 4.0), None);
        assert_eq!(wheel_line_scroll(&state, -4.0), Some(-30.0));
        assert_eq!(wheel_line_scroll(&ScrollbarState::default(), 1.0), None);
    }
}
