use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{
    Callback, Cell, CellEvent, CellValue, EventHandler, EventHandlerFn, FormatFn, HtmlFn, StyleFn,
    TemplateArgs, TemplateFn,
};
use crate::cell_ref::parse_cell_range;
use crate::error::{Result, WingridError};

/// Cell events a range can bind handlers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventName {
    Click,
    DblClick,
    KeyDown,
    KeyPress,
    KeyUp,
    MouseDown,
    MouseEnter,
    MouseLeave,
    MouseMove,
    MouseOver,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
}

impl EventName {
    /// Every supported event, in declaration order.
    pub const ALL: [EventName; 14] = [
        Self::Click,
        Self::DblClick,
        Self::KeyDown,
        Self::KeyPress,
        Self::KeyUp,
        Self::MouseDown,
        Self::MouseEnter,
        Self::MouseLeave,
        Self::MouseMove,
        Self::MouseOver,
        Self::MouseUp,
        Self::TouchStart,
        Self::TouchMove,
        Self::TouchEnd,
    ];

    /// DOM event type string (`"click"`, `"dblclick"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::KeyDown => "keydown",
            Self::KeyPress => "keypress",
            Self::KeyUp => "keyup",
            Self::MouseDown => "mousedown",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::MouseMove => "mousemove",
            Self::MouseOver => "mouseover",
            Self::MouseUp => "mouseup",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
        }
    }

    /// Parse a DOM event type string.
    pub fn from_dom(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name)
    }
}

/// Custom template for the cells of a range.
#[derive(Debug, Clone, PartialEq)]
pub enum CellTemplate {
    /// A fixed template URL.
    Url(String),
    /// Computes the template URL per cell; `None` or `""` falls back to HTML content.
    Resolver(Callback<TemplateFn>),
}

/// A rectangular presentation/behavior overlay in data space.
///
/// Bounds are half-open: the range covers rows `top..bottom` and columns
/// `left..right`. Every attribute is optional; when several ranges enclose a
/// cell, each attribute is taken from the last range that defines it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Range {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
    pub format_fn: Option<Callback<FormatFn>>,
    pub style_fn: Option<Callback<StyleFn>>,
    pub style: Option<String>,
    pub clazz: Option<String>,
    pub custom_html_fn: Option<Callback<HtmlFn>>,
    pub custom_trusted_html_fn: Option<Callback<HtmlFn>>,
    pub custom_cell_template: Option<CellTemplate>,
    pub event_callbacks: BTreeMap<EventName, EventHandler>,
}

impl Range {
    /// A range without attributes covering `[top, bottom) × [left, right)`.
    pub fn new(top: usize, bottom: usize, left: usize, right: usize) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
            ..Self::default()
        }
    }

    /// A range from inclusive A1 notation, e.g. `"B2:D5"`.
    pub fn from_a1(cells: &str) -> Result<Self> {
        let (top, left, bottom, right) =
            parse_cell_range(cells).ok_or_else(|| WingridError::CellRef(cells.to_string()))?;
        Ok(Self::new(top, bottom + 1, left, right + 1))
    }

    /// True when `(row, col)` lies inside the range.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.top && row < self.bottom && col >= self.left && col < self.right
    }

    pub fn with_format(
        mut self,
        f: impl Fn(Option<&CellValue>, usize, usize) -> CellValue + 'static,
    ) -> Self {
        let f: Rc<FormatFn> = Rc::new(f);
        self.format_fn = Some(Callback::from_rc(f));
        self
    }

    pub fn with_style_fn(
        mut self,
        f: impl Fn(Option<&CellValue>, usize, usize) -> String + 'static,
    ) -> Self {
        let f: Rc<StyleFn> = Rc::new(f);
        self.style_fn = Some(Callback::from_rc(f));
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_class(mut self, clazz: impl Into<String>) -> Self {
        self.clazz = Some(clazz.into());
        self
    }

    /// HTML content that the rendering layer must sanitize.
    pub fn with_html(
        mut self,
        f: impl Fn(Option<&CellValue>, usize, usize, &CellValue) -> String + 'static,
    ) -> Self {
        let f: Rc<HtmlFn> = Rc::new(f);
        self.custom_html_fn = Some(Callback::from_rc(f));
        self
    }

    /// HTML content injected without sanitization.
    pub fn with_trusted_html(
        mut self,
        f: impl Fn(Option<&CellValue>, usize, usize, &CellValue) -> String + 'static,
    ) -> Self {
        let f: Rc<HtmlFn> = Rc::new(f);
        self.custom_trusted_html_fn = Some(Callback::from_rc(f));
        self
    }

    pub fn with_template_url(mut self, url: impl Into<String>) -> Self {
        self.custom_cell_template = Some(CellTemplate::Url(url.into()));
        self
    }

    pub fn with_template_fn(
        mut self,
        f: impl Fn(&TemplateArgs<'_>) -> Option<String> + 'static,
    ) -> Self {
        let f: Rc<TemplateFn> = Rc::new(f);
        self.custom_cell_template = Some(CellTemplate::Resolver(Callback::from_rc(f)));
        self
    }

    /// Bind a handler for `event` on every cell of the range.
    pub fn on(mut self, event: EventName, f: impl Fn(&CellEvent<'_>, &Cell) + 'static) -> Self {
        let f: Rc<EventHandlerFn> = Rc::new(f);
        self.event_callbacks.insert(event, Callback::from_rc(f));
        self
    }
}

/// Declarative, data-only form of a [`Range`], as found in JSON configuration.
///
/// Bounds come either from `top`/`bottom`/`left`/`right` (half-open) or from
/// an A1 rectangle in `cells`, which wins when both are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeDescriptor {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cells: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clazz: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_cell_template: Option<String>,
}

impl RangeDescriptor {
    /// Build the range this descriptor declares.
    pub fn to_range(&self) -> Result<Range> {
        let mut range = match &self.cells {
            Some(cells) => Range::from_a1(cells)?,
            None => Range::new(self.top, self.bottom, self.left, self.right),
        };
        range.style.clone_from(&self.style);
        range.clazz.clone_from(&self.clazz);
        range.custom_cell_template = self.custom_cell_template.clone().map(CellTemplate::Url);
        Ok(range)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let range = Range::new(1, 3, 2, 4);
        assert!(range.contains(1, 2));
        assert!(range.contains(2, 3));
        assert!(!range.contains(3, 2));
        assert!(!range.contains(1, 4));
        assert!(!range.contains(0, 2));
    }

    #[test]
    fn test_empty_range_contains_nothing() {
        let range = Range::new(2, 2, 0, 10);
        assert!(!range.contains(2, 0));
    }

    #[test]
    fn test_from_a1_covers_inclusive_rectangle() {
        let range = Range::from_a1("B2:D5").unwrap();
        assert_eq!((range.top, range.bottom, range.left, range.right), (1, 5, 1, 4));
        assert!(range.contains(4, 3));
        assert!(!range.contains(5, 3));
        assert!(matches!(
            Range::from_a1("nope"),
            Err(WingridError::CellRef(_))
        ));
    }

    #[test]
    fn test_event_names_round_trip_dom_strings() {
        for event in EventName::ALL {
            assert_eq!(EventName::from_dom(event.as_str()), Some(event));
        }
        assert_eq!(EventName::from_dom("scroll"), None);
        assert_eq!(
            serde_json::to_string(&EventName::DblClick).unwrap(),
            "\"dblclick\""
        );
    }

    #[test]
    fn test_descriptor_from_json() {
        let d: RangeDescriptor =
            serde_json::from_str(r#"{"cells": "A1:A3", "clazz": "hl", "style": "color:red"}"#)
                .unwrap();
        let range = d.to_range().unwrap();
        assert_eq!((range.top, range.bottom, range.left, range.right), (0, 3, 0, 1));
        assert_eq!(range.clazz.as_deref(), Some("hl"));
        assert_eq!(range.style.as_deref(), Some("color:red"));
        assert!(range.format_fn.is_none());
    }

    #[test]
    fn test_builders_set_only_their_attribute() {
        let range = Range::new(0, 1, 0, 1)
            .with_class("a")
            .on(EventName::Click, |_, _| {});
        assert!(range.style.is_none());
        assert!(range.event_callbacks.contains_key(&EventName::Click));
        assert!(!range.event_callbacks.contains_key(&EventName::KeyUp));
    }
}
