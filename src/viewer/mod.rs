//! Browser boundary: the wasm-exported `GridView`.
//!
//! `GridView` owns one [`Table`](crate::table::Table) together with the DOM
//! elements of its body and two virtual scrollbars. It forwards DOM events to
//! the table and keeps a single `setTimeout` armed for the table's earliest
//! scheduler deadline. The rendering layer reads the nine regions back as
//! plain JS values and re-renders when notified.
//!
//! Host callbacks (`scrollFn`, content listeners) are queued while the table
//! is borrowed and invoked once the borrow is released, so they may call back
//! into the view. Range functions (`formatFn`, `styleFn`, ...) run during
//! projection and must not.

mod events;
mod ranges;
mod scroll;

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
#[cfg(target_arch = "wasm32")]
use std::cell::{Cell as FlagCell, RefCell};
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::HtmlElement;

#[cfg(target_arch = "wasm32")]
use crate::error::WingridError;
#[cfg(target_arch = "wasm32")]
use crate::schedule::SystemClock;
#[cfg(target_arch = "wasm32")]
use crate::table::Table;
use crate::types::{Axis, ColumnBand, Region, RowBand};
#[cfg(target_arch = "wasm32")]
use crate::types::{CellEvent, DataMatrix, EventName, ScrollEvent, ScrollInfo, TableConfig};

#[cfg(target_arch = "wasm32")]
use events::Listener;

/// CSS class marking the vertical scrollbar wrapper.
pub const VERTICAL_CLASS: &str = "vertical";
/// CSS class marking the horizontal scrollbar wrapper.
pub const HORIZONTAL_CLASS: &str = "horizontal";

/// Which scrollbar an element belongs to, from its `class` attribute.
pub fn scrollbar_axis(class_name: &str) -> Option<Axis> {
    let mut classes = class_name.split_whitespace();
    classes.find_map(|c| match c {
        VERTICAL_CLASS => Some(Axis::Vertical),
        HORIZONTAL_CLASS => Some(Axis::Horizontal),
        _ => None,
    })
}

/// Parse a row band name (`"header"`, `"middle"`, `"footer"`).
pub fn parse_row_band(name: &str) -> Option<RowBand> {
    RowBand::ALL
        .into_iter()
        .find(|band| row_band_name(*band) == name)
}

/// Parse a column band name (`"left"`, `"center"`, `"right"`).
pub fn parse_column_band(name: &str) -> Option<ColumnBand> {
    ColumnBand::ALL
        .into_iter()
        .find(|band| column_band_name(*band) == name)
}

/// Parse a region from its row and column band names.
pub fn parse_region(rows: &str, columns: &str) -> Option<Region> {
    Some(Region::new(parse_row_band(rows)?, parse_column_band(columns)?))
}

fn row_band_name(band: RowBand) -> &'static str {
    match band {
        RowBand::Header => "header",
        RowBand::Middle => "middle",
        RowBand::Footer => "footer",
    }
}

fn column_band_name(band: ColumnBand) -> &'static str {
    match band {
        ColumnBand::Left => "left",
        ColumnBand::Center => "center",
        ColumnBand::Right => "right",
    }
}

/// `setTimeout` delay for a deadline, rounded up so the timer never fires
/// before the deadline is due.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn timer_delay_ms(deadline_ms: f64, now_ms: f64) -> i32 {
    let wait = (deadline_ms - now_ms).ceil();
    if wait.is_finite() {
        wait.clamp(0.0, f64::from(i32::MAX)) as i32
    } else {
        0
    }
}

/// Scroll notifications raised by the table, waiting to be handed to JS.
#[cfg(target_arch = "wasm32")]
type ScrollQueue = Rc<RefCell<Vec<(Option<ScrollEvent>, ScrollInfo)>>>;

#[cfg(target_arch = "wasm32")]
pub(crate) struct SharedState {
    pub(crate) table: Table,
    pub(crate) clock: SystemClock,
    pub(crate) body: HtmlElement,
    pub(crate) vertical: HtmlElement,
    pub(crate) horizontal: HtmlElement,
    pub(crate) timer: Option<i32>,
    pub(crate) timer_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) scroll_fn: Option<Function>,
    pub(crate) js_data: ranges::JsData,
    pub(crate) scroll_queue: ScrollQueue,
    pub(crate) content_dirty: Rc<FlagCell<bool>>,
    pub(crate) content_listeners: Vec<Function>,
}

/// A windowed grid bound to a body element and two scrollbar wrappers.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct GridView {
    state: Rc<RefCell<SharedState>>,
    listeners: Vec<Listener>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl GridView {
    /// Create a view.
    ///
    /// `config` is a plain configuration object, `data` an array of row
    /// arrays and `ranges` an array of range objects. `body` is the element
    /// enclosing the vertical scrollbar; without it construction fails.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(
        config: JsValue,
        data: JsValue,
        ranges: JsValue,
        body: Option<HtmlElement>,
        vertical: HtmlElement,
        horizontal: HtmlElement,
        scroll_fn: Option<Function>,
    ) -> Result<GridView, JsValue> {
        console_error_panic_hook::set_once();

        let js_data: ranges::JsData = Rc::new(RefCell::new(data.clone()));
        let data_value_fn = ranges::data_value_fn_from_js(&config, &js_data);
        let config: TableConfig = if config.is_undefined() || config.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let data: DataMatrix = serde_wasm_bindgen::from_value(data)?;

        let scroll_queue: ScrollQueue = Rc::new(RefCell::new(Vec::new()));
        let content_dirty = Rc::new(FlagCell::new(false));

        let mut builder = Table::builder(config, Rc::new(data));
        if let Some(f) = data_value_fn {
            builder = builder.data_value_fn(f);
        }
        {
            let queue = Rc::clone(&scroll_queue);
            builder = builder.scroll_fn(move |event, info| {
                queue.borrow_mut().push((event.copied(), info));
            });
        }
        for range in js_sys::Array::from(&ranges).iter() {
            builder = builder.range(ranges::range_from_js(&range)?);
        }
        let mut table = builder.build();

        table.attach_vertical_scrollbar(body.as_ref().map(|b| f64::from(b.client_height())))?;
        let body = body.ok_or(WingridError::MissingScrollContainer)?;
        {
            let flag = Rc::clone(&content_dirty);
            table.on_content_updated(move || flag.set(true));
        }

        let state = Rc::new(RefCell::new(SharedState {
            table,
            clock: SystemClock::new(),
            body,
            vertical,
            horizontal,
            timer: None,
            timer_closure: None,
            scroll_fn,
            js_data,
            scroll_queue,
            content_dirty,
            content_listeners: Vec::new(),
        }));

        let listeners = Self::install_listeners(&state);
        Self::flush_notifications(&state);
        Self::arm_timer(&state);

        Ok(GridView { state, listeners })
    }

    /// Register a range; returns its registration index.
    #[wasm_bindgen(js_name = addRange)]
    pub fn add_range(&self, range: &JsValue) -> Result<usize, JsValue> {
        let range = ranges::range_from_js(range)?;
        let index = self.state.borrow_mut().table.add_range(range);
        Self::arm_timer(&self.state);
        Ok(index)
    }

    /// Replace the data matrix. Offsets are rescaled to the new extent.
    #[wasm_bindgen(js_name = setData)]
    #[allow(clippy::needless_pass_by_value)]
    pub fn set_data(&self, data: JsValue) -> Result<(), JsValue> {
        let matrix: DataMatrix = serde_wasm_bindgen::from_value(data.clone())?;
        {
            let mut s = self.state.borrow_mut();
            *s.js_data.borrow_mut() = data;
            s.table.set_data(Rc::new(matrix));
        }
        Self::sync_scrollbar_positions(&self.state);
        Self::flush_notifications(&self.state);
        Self::arm_timer(&self.state);
        Ok(())
    }

    /// Set the vertical offset; returns the clamped offset.
    #[wasm_bindgen(js_name = setScrollTop)]
    pub fn set_scroll_top(&self, top: usize) -> usize {
        self.set_offset(Axis::Vertical, top)
    }

    /// Set the horizontal offset; returns the clamped offset.
    #[wasm_bindgen(js_name = setScrollLeft)]
    pub fn set_scroll_left(&self, left: usize) -> usize {
        self.set_offset(Axis::Horizontal, left)
    }

    /// Current offsets as `{ top, left }`.
    #[wasm_bindgen(js_name = scrollPosition)]
    pub fn scroll_position(&self) -> Result<JsValue, JsValue> {
        let position = self.state.borrow().table.scroll_position();
        Ok(serde_wasm_bindgen::to_value(&position)?)
    }

    /// Cells of one region as an array of row arrays.
    pub fn region(&self, rows: &str, columns: &str) -> Result<JsValue, JsValue> {
        let region = parse_region(rows, columns)
            .ok_or_else(|| JsValue::from_str(&format!("unknown region {rows}/{columns}")))?;
        let s = self.state.borrow();
        Ok(serde_wasm_bindgen::to_value(s.table.region(region))?)
    }

    /// Column names of one column band.
    #[wasm_bindgen(js_name = columnNames)]
    pub fn column_names(&self, columns: &str) -> Result<JsValue, JsValue> {
        let band = parse_column_band(columns)
            .ok_or_else(|| JsValue::from_str(&format!("unknown column band {columns}")))?;
        let s = self.state.borrow();
        Ok(serde_wasm_bindgen::to_value(s.table.column_names(band))?)
    }

    /// One-based row numbers of one row band.
    #[wasm_bindgen(js_name = rowNumbers)]
    pub fn row_numbers(&self, rows: &str) -> Result<JsValue, JsValue> {
        let band = parse_row_band(rows)
            .ok_or_else(|| JsValue::from_str(&format!("unknown row band {rows}")))?;
        let s = self.state.borrow();
        Ok(serde_wasm_bindgen::to_value(s.table.row_numbers(band))?)
    }

    /// Column and row descriptors of the grid layout.
    pub fn partition(&self) -> Result<JsValue, JsValue> {
        let s = self.state.borrow();
        Ok(serde_wasm_bindgen::to_value(s.table.partition())?)
    }

    /// DOM event types bound by any range in the current projection.
    #[wasm_bindgen(js_name = boundEvents)]
    pub fn bound_events(&self) -> Result<JsValue, JsValue> {
        let names = self.state.borrow().table.bound_events();
        Ok(serde_wasm_bindgen::to_value(&names)?)
    }

    /// Subscribe to the "content updated" notification.
    #[wasm_bindgen(js_name = onContentUpdated)]
    pub fn on_content_updated(&self, f: Function) {
        self.state.borrow_mut().content_listeners.push(f);
    }

    /// Forward a DOM event raised on a rendered cell to the handler its
    /// ranges bound. Scrollbar positions are restored afterwards. Returns
    /// true if a handler ran.
    pub fn dispatch(
        &self,
        rows: &str,
        columns: &str,
        row: usize,
        col: usize,
        event: web_sys::Event,
    ) -> bool {
        let Some(region) = parse_region(rows, columns) else {
            return false;
        };
        let Some(name) = EventName::from_dom(&event.type_()) else {
            return false;
        };
        let target = {
            let s = self.state.borrow();
            s.table
                .region(region)
                .cell(row, col)
                .and_then(|cell| cell.handler(name).map(|h| (h.clone(), cell.clone())))
        };
        let Some((handler, cell)) = target else {
            return false;
        };
        let detail: JsValue = event.into();
        handler(&CellEvent::with_detail(name, &detail), &cell);
        Self::sync_scrollbar_positions(&self.state);
        true
    }
}

#[cfg(target_arch = "wasm32")]
impl GridView {
    fn set_offset(&self, axis: Axis, offset: usize) -> usize {
        let applied = self
            .state
            .borrow_mut()
            .table
            .set_scroll_offset(axis, offset);
        Self::sync_scrollbar_positions(&self.state);
        Self::flush_notifications(&self.state);
        applied
    }

    /// Hand queued scroll notifications and content updates to JS.
    pub(crate) fn flush_notifications(state: &Rc<RefCell<SharedState>>) {
        let (scroll_fn, scrolls, listeners) = {
            let s = state.borrow();
            let scrolls: Vec<_> = s.scroll_queue.borrow_mut().drain(..).collect();
            let listeners = if s.content_dirty.replace(false) {
                s.content_listeners.clone()
            } else {
                Vec::new()
            };
            (s.scroll_fn.clone(), scrolls, listeners)
        };
        if let Some(f) = scroll_fn {
            for (event, info) in scrolls {
                let event = event
                    .and_then(|e| serde_wasm_bindgen::to_value(&e).ok())
                    .unwrap_or(JsValue::UNDEFINED);
                let info = serde_wasm_bindgen::to_value(&info).unwrap_or(JsValue::UNDEFINED);
                if let Err(err) = f.call2(&JsValue::NULL, &event, &info) {
                    log::warn!("scrollFn threw: {err:?}");
                }
            }
        }
        for f in listeners {
            if let Err(err) = f.call0(&JsValue::NULL) {
                log::warn!("content listener threw: {err:?}");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for GridView {
    fn drop(&mut self) {
        let mut s = self.state.borrow_mut();
        s.table.cancel_pending();
        if let (Some(window), Some(id)) = (web_sys::window(), s.timer.take()) {
            window.clear_timeout_with_handle(id);
        }
        s.timer_closure = None;
        drop(s);
        for listener in self.listeners.drain(..) {
            listener.remove();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("vertical", Some(Axis::Vertical))]
    #[test_case("scrollbar horizontal", Some(Axis::Horizontal))]
    #[test_case("scrollbar", None)]
    #[test_case("", None)]
    #[test_case("vertical-ish", None)]
    fn test_scrollbar_axis(class_name: &str, expected: Option<Axis>) {
        assert_eq!(scrollbar_axis(class_name), expected);
    }

    #[test]
    fn test_parse_region() {
        assert_eq!(
            parse_region("footer", "right"),
            Some(Region::new(RowBand::Footer, ColumnBand::Right))
        );
        assert_eq!(parse_region("middle", "nope"), None);
        assert_eq!(parse_region("Header", "left"), None);
        for region in Region::all() {
            let parsed = parse_region(row_band_name(region.rows), column_band_name(region.columns));
            assert_eq!(parsed, Some(region));
        }
    }

    #[test]
    fn test_timer_delay_rounds_up_and_clamps() {
        assert_eq!(timer_delay_ms(110.2, 100.0), 11);
        assert_eq!(timer_delay_ms(100.0, 120.0), 0);
        assert_eq!(timer_delay_ms(f64::NAN, 0.0), 0);
        assert_eq!(timer_delay_ms(f64::INFINITY, 0.0), 0);
    }
}
