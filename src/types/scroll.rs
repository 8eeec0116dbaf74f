use serde::{Deserialize, Serialize};

/// Logical offset of the middle/center region into the data matrix.
///
/// Header/footer rows and left/right fixed columns never scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub top: usize,
    pub left: usize,
}

impl ScrollPosition {
    pub fn new(top: usize, left: usize) -> Self {
        Self { top, left }
    }

    /// Offset along `axis`.
    pub fn get(self, axis: Axis) -> usize {
        match axis {
            Axis::Vertical => self.top,
            Axis::Horizontal => self.left,
        }
    }

    /// Mutable offset along `axis`.
    pub fn get_mut(&mut self, axis: Axis) -> &mut usize {
        match axis {
            Axis::Vertical => &mut self.top,
            Axis::Horizontal => &mut self.left,
        }
    }
}

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Direction reported to the host scroll callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Vertical,
    Horizontal,
    None,
}

impl From<Option<Axis>> for ScrollDirection {
    fn from(axis: Option<Axis>) -> Self {
        match axis {
            Some(Axis::Vertical) => Self::Vertical,
            Some(Axis::Horizontal) => Self::Horizontal,
            None => Self::None,
        }
    }
}

/// Payload of the host scroll callback.
///
/// `top`/`left` are data-space indices of the first scrollable row/column,
/// i.e. the logical offset plus the header row / left column counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollInfo {
    pub top: usize,
    pub left: usize,
    pub direction: ScrollDirection,
}

/// A raw scroll event forwarded from a virtual scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollEvent {
    /// Which scrollbar fired, if the target could be classified.
    pub target: Option<Axis>,
    /// `scrollTop` / `scrollLeft` of the scrollbar wrapper in pixels.
    pub position_px: f64,
    /// `scrollHeight` / `scrollWidth` of the scrollbar wrapper in pixels.
    pub scroll_extent_px: f64,
}

impl ScrollEvent {
    pub fn new(target: Option<Axis>, position_px: f64, scroll_extent_px: f64) -> Self {
        Self {
            target,
            position_px,
            scroll_extent_px,
        }
    }

    /// Scroll fraction in `[0, 1]`; 0 when the scrollable extent is empty.
    pub fn ratio(&self) -> f64 {
        if self.scroll_extent_px > 0.0 && self.position_px.is_finite() {
            (self.position_px / self.scroll_extent_px).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_guards_zero_extent() {
        assert_eq!(ScrollEvent::new(Some(Axis::Vertical), 50.0, 0.0).ratio(), 0.0);
        assert_eq!(ScrollEvent::new(Some(Axis::Vertical), 50.0, 200.0).ratio(), 0.25);
        assert_eq!(ScrollEvent::new(None, 500.0, 200.0).ratio(), 1.0);
        assert_eq!(ScrollEvent::new(None, f64::NAN, 200.0).ratio(), 0.0);
    }

    #[test]
    fn test_scroll_info_serializes_lowercase_direction() {
        let info = ScrollInfo {
            top: 1,
            left: 1,
            direction: ScrollDirection::None,
        };
        assert_eq!(
            serde_json::to_string(&info).unwrap(),
            r#"{"top":1,"left":1,"direction":"none"}"#
        );
    }
}
