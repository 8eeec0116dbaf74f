//! Scheduler timer and scrollbar DOM synchronization for `GridView`.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::HtmlElement;

#[cfg(target_arch = "wasm32")]
use super::events::{scroll_extent_px, set_scroll_position_px};
#[cfg(target_arch = "wasm32")]
use super::{timer_delay_ms, GridView, SharedState};
#[cfg(target_arch = "wasm32")]
use crate::layout::{ScrollbarGeometry, ScrollbarSize};
#[cfg(target_arch = "wasm32")]
use crate::schedule::Clock;
#[cfg(target_arch = "wasm32")]
use crate::table::TickOutcome;
#[cfg(target_arch = "wasm32")]
use crate::types::Axis;

#[cfg(target_arch = "wasm32")]
impl GridView {
    /// Arm one `setTimeout` for the table's earliest deadline, replacing any
    /// timer already armed.
    pub(crate) fn arm_timer(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if let Some(timer_id) = s.timer.take() {
            window.clear_timeout_with_handle(timer_id);
        }
        let Some(deadline) = s.table.next_deadline() else {
            return;
        };
        if s.timer_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    GridView::handle_timer(&state);
                }
            }) as Box<dyn FnMut()>);
            s.timer_closure = Some(closure);
        }
        let delay = timer_delay_ms(deadline, s.clock.now_ms());
        let Some(callback) = s.timer_closure.as_ref() else {
            return;
        };
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(id) => s.timer = Some(id),
            Err(_) => s.timer = None,
        }
    }

    fn handle_timer(state: &Rc<RefCell<SharedState>>) {
        let outcome = {
            let mut s = state.borrow_mut();
            s.timer = None;
            s.table.tick()
        };
        Self::apply_outcome(state, outcome);
        Self::flush_notifications(state);
        Self::arm_timer(state);
    }

    fn apply_outcome(state: &Rc<RefCell<SharedState>>, outcome: TickOutcome) {
        if let Some(geometry) = outcome.geometry {
            let mut s = state.borrow_mut();
            apply_geometry(&s.vertical, &s.horizontal, geometry);
            Self::measure_scrollbars(&mut s, geometry.horizontal.is_some());
        }
    }

    /// Feed the wrapper dimensions back to the table after a resize. The
    /// vertical wrapper keeps its scroll ratio.
    fn measure_scrollbars(s: &mut SharedState, horizontal: bool) {
        let client = f64::from(s.vertical.client_height());
        let extent = scroll_extent_px(&s.vertical, Axis::Vertical);
        if s.table.measure_scrollbar(Axis::Vertical, client, extent) {
            log::debug!("vertical scrollbar resized to {client}px");
        }
        let position = s.table.scrollbar(Axis::Vertical).position_px;
        set_scroll_position_px(&s.vertical, Axis::Vertical, position);

        if horizontal {
            let client = f64::from(s.horizontal.client_width());
            let extent = scroll_extent_px(&s.horizontal, Axis::Horizontal);
            s.table.measure_scrollbar(Axis::Horizontal, client, extent);
        }
    }

    /// Write the table's scrollbar positions back to the wrappers.
    pub(crate) fn sync_scrollbar_positions(state: &Rc<RefCell<SharedState>>) {
        let s = state.borrow();
        for (axis, wrapper) in [
            (Axis::Vertical, &s.vertical),
            (Axis::Horizontal, &s.horizontal),
        ] {
            set_scroll_position_px(wrapper, axis, s.table.scrollbar(axis).position_px);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn apply_geometry(vertical: &HtmlElement, horizontal: &HtmlElement, geometry: ScrollbarGeometry) {
    apply_size(vertical, "height", geometry.vertical);
    if let Some(size) = geometry.horizontal {
        apply_size(horizontal, "width", size);
    }
}

/// Size the wrapper's inner element, or hide the wrapper.
#[cfg(target_arch = "wasm32")]
fn apply_size(wrapper: &HtmlElement, dimension: &str, size: ScrollbarSize) {
    let Some(css) = size.css() else {
        wrapper.style().set_property("display", "none").ok();
        return;
    };
    wrapper.style().remove_property("display").ok();
    if let Some(inner) = wrapper
        .first_element_child()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    {
        inner.style().set_property(dimension, &css).ok();
    }
}
