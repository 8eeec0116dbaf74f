//! Range overlay resolution.
//!
//! A cell's presentation is folded from every registered [`Range`] that
//! contains it, in registration order. Each attribute is overwritten
//! independently by the last range that defines it; attributes a later range
//! leaves unset keep the value of an earlier one.

use std::collections::BTreeMap;

use crate::types::{
    Callback, Cell, CellHtml, CellTemplate, CellValue, DataMatrix, DataValueFn, EventHandler,
    EventName, FormatFn, HtmlFn, Range, ScrollPosition, StyleFn, TemplateArgs, BLANK_CELL,
};

/// Everything a resolution reads besides the ranges.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub data: &'a DataMatrix,
    /// Overrides the default `rows[row][col]` lookup.
    pub data_value_fn: Option<&'a DataValueFn>,
    pub scroll: ScrollPosition,
}

impl<'a> ResolveContext<'a> {
    pub fn new(data: &'a DataMatrix) -> Self {
        Self {
            data,
            data_value_fn: None,
            scroll: ScrollPosition::default(),
        }
    }

    pub fn with_accessor(mut self, f: &'a DataValueFn) -> Self {
        self.data_value_fn = Some(f);
        self
    }

    pub fn with_scroll(mut self, scroll: ScrollPosition) -> Self {
        self.scroll = scroll;
        self
    }

    /// Raw value at `(row, col)`; `None` when the cell does not exist.
    pub fn value(&self, row: usize, col: usize) -> Option<CellValue> {
        match self.data_value_fn {
            Some(f) => f(self.data, row, col),
            None => self.data.get(row, col).cloned(),
        }
    }
}

/// Attributes collected from the enclosing ranges.
#[derive(Default)]
struct Overlay<'r> {
    format_fn: Option<&'r Callback<FormatFn>>,
    style_fn: Option<&'r Callback<StyleFn>>,
    style: Option<&'r str>,
    clazz: Option<&'r str>,
    html_fn: Option<&'r Callback<HtmlFn>>,
    trusted_html_fn: Option<&'r Callback<HtmlFn>>,
    template: Option<&'r CellTemplate>,
    event_callbacks: BTreeMap<EventName, EventHandler>,
    enclosing: Vec<usize>,
}

impl<'r> Overlay<'r> {
    fn collect(ranges: &'r [Range], row: usize, col: usize) -> Self {
        let mut overlay = Self::default();
        for (index, range) in ranges.iter().enumerate() {
            if !range.contains(row, col) {
                continue;
            }
            overlay.enclosing.push(index);
            if let Some(f) = &range.format_fn {
                overlay.format_fn = Some(f);
            }
            if let Some(clazz) = &range.clazz {
                overlay.clazz = Some(clazz.as_str());
            }
            if let Some(style) = &range.style {
                overlay.style = Some(style.as_str());
            }
            if let Some(f) = &range.style_fn {
                overlay.style_fn = Some(f);
            }
            if let Some(f) = &range.custom_html_fn {
                overlay.html_fn = Some(f);
            }
            if let Some(f) = &range.custom_trusted_html_fn {
                overlay.trusted_html_fn = Some(f);
            }
            if let Some(template) = &range.custom_cell_template {
                overlay.template = Some(template);
            }
            for (event, handler) in &range.event_callbacks {
                overlay.event_callbacks.insert(*event, handler.clone());
            }
        }
        overlay
    }
}

/// Resolve the cell at data coordinates `(row, col)`.
///
/// Pure: resolving twice with the same inputs yields equal cells.
pub fn resolve(ctx: &ResolveContext<'_>, row: usize, col: usize, ranges: &[Range]) -> Cell {
    let data = ctx.value(row, col);
    let overlay = Overlay::collect(ranges, row, col);

    let value = match overlay.format_fn {
        Some(f) => f(data.as_ref(), row, col),
        None => data
            .clone()
            .unwrap_or_else(|| CellValue::Text(BLANK_CELL.to_string())),
    };

    let dynamic_style = overlay
        .style_fn
        .map(|f| f(data.as_ref(), row, col))
        .unwrap_or_default();
    let style = join_style(&dynamic_style, overlay.style.unwrap_or_default());

    let custom_cell_template = match overlay.template {
        Some(CellTemplate::Url(url)) => Some(url.clone()),
        Some(CellTemplate::Resolver(f)) => f(&TemplateArgs {
            raw: data.as_ref(),
            row,
            col,
            formatted: &value,
            data: ctx.data,
            scroll: ctx.scroll,
        }),
        None => None,
    }
    .filter(|t| !t.is_empty());

    let custom_html = if custom_cell_template.is_some() {
        None
    } else if let Some(f) = overlay.trusted_html_fn {
        Some(CellHtml::Trusted(f(data.as_ref(), row, col, &value)))
    } else if let Some(f) = overlay.html_fn {
        Some(CellHtml::Plain(f(data.as_ref(), row, col, &value)))
    } else {
        Some(CellHtml::Plain(default_html(&value)))
    };

    Cell {
        row,
        col,
        data,
        value,
        clazz: overlay.clazz.unwrap_or_default().to_string(),
        style,
        event_callbacks: overlay.event_callbacks,
        enclosing_ranges: overlay.enclosing,
        custom_cell_template,
        custom_html,
    }
}

/// Stringified formatted value, or the blank marker for a null value.
fn default_html(value: &CellValue) -> String {
    if value.is_null() {
        BLANK_CELL.to_string()
    } else {
        value.to_string()
    }
}

/// `style_fn` output followed by the static style, skipping empty pieces.
fn join_style(dynamic: &str, fixed: &str) -> String {
    match (dynamic.is_empty(), fixed.is_empty()) {
        (true, _) => fixed.to_string(),
        (false, true) => dynamic.to_string(),
        (false, false) => format!("{dynamic};{fixed}"),
    }
}
