//! Viewport state: the logical scroll offset and its synchronization with the
//! virtual scrollbars.

use super::{round_to_index, ScrollbarState};
use crate::types::{Axis, ScrollEvent, ScrollPosition};

/// Scrollable data extent and visible window size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisMetrics {
    /// Scrollable rows/columns: total minus the fixed groups.
    pub extent: usize,
    /// Middle-row or center-column count.
    pub window: usize,
}

impl AxisMetrics {
    pub fn new(total: usize, fixed: usize, window: usize) -> Self {
        Self {
            extent: total.saturating_sub(fixed),
            window,
        }
    }

    /// Largest offset that still fills the window.
    pub fn max_offset(&self) -> usize {
        self.extent.saturating_sub(self.window)
    }
}

/// Translate an offset across a data replacement, keeping the approximate
/// scroll fraction.
///
/// A zero offset stays at the top. When the window covers the new extent, or
/// the old extent was not scrollable, the offset resets to 0.
#[allow(clippy::cast_precision_loss)]
pub fn rescale_offset(offset: usize, old: AxisMetrics, new: AxisMetrics) -> usize {
    if offset == 0 || new.window >= new.extent || old.extent <= new.window {
        return 0;
    }
    let new_span = (new.extent - new.window) as f64;
    let old_span = (old.extent - new.window) as f64;
    let scaled = ((offset as f64 + 1.0) * new_span / old_span).round() - 1.0;
    round_to_index(scaled)
        .unwrap_or(0)
        .min(new.max_offset())
}

/// Logical scroll offset of the middle/center region.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    position: ScrollPosition,
    /// Set by a programmatic change; swallows the next raw scroll event.
    scroll_dirty: bool,
}

impl Viewport {
    pub fn new(position: ScrollPosition) -> Self {
        Self {
            position,
            scroll_dirty: false,
        }
    }

    pub fn position(&self) -> ScrollPosition {
        self.position
    }

    pub fn is_scroll_dirty(&self) -> bool {
        self.scroll_dirty
    }

    /// Translate a raw scrollbar event into a logical offset.
    ///
    /// Returns the axis whose offset changed, or `None` when the event was
    /// swallowed, unclassified, or rounded to the current offset.
    pub fn apply_scroll(
        &mut self,
        event: &ScrollEvent,
        vertical: AxisMetrics,
        horizontal: AxisMetrics,
    ) -> Option<Axis> {
        if self.scroll_dirty {
            self.scroll_dirty = false;
            log::trace!("scroll event swallowed after programmatic offset change");
            return None;
        }
        let axis = event.target?;
        let metrics = match axis {
            Axis::Vertical => vertical,
            Axis::Horizontal => horizontal,
        };
        #[allow(clippy::cast_precision_loss)]
        let new_offset = round_to_index(event.ratio() * metrics.extent as f64).unwrap_or(0);
        let offset = self.position.get_mut(axis);
        if *offset == new_offset {
            return None;
        }
        *offset = new_offset;
        Some(axis)
    }

    /// Set an offset programmatically.
    ///
    /// The offset clamps to `[0, extent - window]` and the scrollbar moves to
    /// the matching pixel position. The next raw scroll event is swallowed if
    /// the scrollbar actually moved. Returns the applied offset.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_offset(
        &mut self,
        axis: Axis,
        requested: usize,
        metrics: AxisMetrics,
        scrollbar: &mut ScrollbarState,
    ) -> usize {
        let max = metrics.max_offset();
        let offset = requested.min(max);
        *self.position.get_mut(axis) = offset;

        let target_px = if max == 0 {
            0.0
        } else {
            scrollbar.content_px * offset as f64 / max as f64
        };
        let before = scrollbar.position_px;
        scrollbar.set_position(target_px);
        if (scrollbar.position_px - before).abs() > f64::EPSILON {
            self.scroll_dirty = true;
        }
        log::debug!("{axis:?} offset set to {offset} (requested {requested})");
        offset
    }

    /// Rescale both offsets after the data matrix was replaced.
    pub fn rescale(
        &mut self,
        old: (AxisMetrics, AxisMetrics),
        new: (AxisMetrics, AxisMetrics),
    ) {
        let before = self.position;
        self.position.top = rescale_offset(self.position.top, old.0, new.0);
        self.position.left = rescale_offset(self.position.left, old.1, new.1);
        if before != self.position {
            log::debug!(
                "offsets rescaled from {:?} to {:?}",
                before,
                self.position
            );
        }
    }
}
