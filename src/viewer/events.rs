//! DOM listeners for `GridView`: scrollbar scroll, wheel, touch and body
//! resize.
//!
//! Listeners are registered once at construction and removed when the view
//! is dropped. Each one forwards to the table, writes moved scrollbar
//! positions back to the DOM and re-arms the scheduler timer.

#[cfg(target_arch = "wasm32")]
use js_sys::Reflect;
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{
    AddEventListenerOptions, Element, Event, EventTarget, HtmlElement, ResizeObserver, TouchEvent,
    WheelEvent,
};

#[cfg(target_arch = "wasm32")]
use super::{scrollbar_axis, GridView, SharedState, HORIZONTAL_CLASS, VERTICAL_CLASS};
#[cfg(target_arch = "wasm32")]
use crate::table::WheelTarget;
#[cfg(target_arch = "wasm32")]
use crate::types::{Axis, ScrollEvent};

/// A registered DOM listener, removed on drop of the view.
#[cfg(target_arch = "wasm32")]
pub(crate) enum Listener {
    Event {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    },
    Resize {
        observer: ResizeObserver,
        _closure: Closure<dyn FnMut(js_sys::Array)>,
    },
}

#[cfg(target_arch = "wasm32")]
impl Listener {
    pub(crate) fn remove(self) {
        match self {
            Self::Event {
                target,
                kind,
                closure,
            } => {
                target
                    .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
                    .ok();
            }
            Self::Resize { observer, .. } => observer.disconnect(),
        }
    }
}

/// `scrollTop` or `scrollLeft` of an element, unrounded.
#[cfg(target_arch = "wasm32")]
pub(crate) fn scroll_position_px(element: &Element, axis: Axis) -> f64 {
    let (key, fallback) = match axis {
        Axis::Vertical => ("scrollTop", element.scroll_top()),
        Axis::Horizontal => ("scrollLeft", element.scroll_left()),
    };
    Reflect::get(element.as_ref(), &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(f64::from(fallback))
}

/// `scrollHeight` or `scrollWidth` of an element.
#[cfg(target_arch = "wasm32")]
pub(crate) fn scroll_extent_px(element: &Element, axis: Axis) -> f64 {
    match axis {
        Axis::Vertical => f64::from(element.scroll_height()),
        Axis::Horizontal => f64::from(element.scroll_width()),
    }
}

/// Write a scroll position without rounding it to whole pixels.
#[cfg(target_arch = "wasm32")]
pub(crate) fn set_scroll_position_px(element: &Element, axis: Axis, px: f64) {
    let key = match axis {
        Axis::Vertical => "scrollTop",
        Axis::Horizontal => "scrollLeft",
    };
    Reflect::set(element.as_ref(), &JsValue::from_str(key), &JsValue::from_f64(px)).ok();
}

#[cfg(target_arch = "wasm32")]
fn wheel_target(event: &Event) -> WheelTarget {
    let Some(element) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return WheelTarget::Body;
    };
    let enclosing = |class: &str| {
        element
            .closest(&format!(".{class}"))
            .ok()
            .flatten()
            .is_some()
    };
    if enclosing(VERTICAL_CLASS) {
        WheelTarget::VerticalScrollbar
    } else if enclosing(HORIZONTAL_CLASS) {
        WheelTarget::HorizontalScrollbar
    } else {
        WheelTarget::Body
    }
}

#[cfg(target_arch = "wasm32")]
fn first_touch(event: &Event) -> Option<(f64, f64)> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
}

#[cfg(target_arch = "wasm32")]
impl GridView {
    pub(crate) fn install_listeners(state: &Rc<RefCell<SharedState>>) -> Vec<Listener> {
        let (body, vertical, horizontal) = {
            let s = state.borrow();
            (s.body.clone(), s.vertical.clone(), s.horizontal.clone())
        };
        let mut listeners = Vec::new();

        // Scroll events do not bubble: one listener per scrollbar wrapper.
        for wrapper in [&vertical, &horizontal] {
            let state = Rc::clone(state);
            listeners.push(listen(wrapper, "scroll", false, move |event| {
                Self::internal_scroll(&state, &event);
            }));
        }

        // Wheel events bubble from the horizontal scrollbar into the body.
        let mut wheel_targets = vec![&body];
        if !body.contains(Some(vertical.as_ref())) {
            wheel_targets.push(&vertical);
        }
        for target in wheel_targets {
            let state = Rc::clone(state);
            listeners.push(listen(target, "wheel", false, move |event| {
                Self::internal_wheel(&state, &event);
            }));
        }

        {
            let state = Rc::clone(state);
            listeners.push(listen(&body, "touchstart", true, move |event| {
                if let Some((x, y)) = first_touch(&event) {
                    state.borrow_mut().table.touch_start(x, y);
                }
            }));
        }
        {
            let state = Rc::clone(state);
            listeners.push(listen(&body, "touchmove", false, move |event| {
                Self::internal_touch_move(&state, &event);
            }));
        }
        {
            let state = Rc::clone(state);
            listeners.push(listen(&body, "touchend", true, move |_event| {
                state.borrow_mut().table.touch_end();
            }));
        }

        if let Some(listener) = Self::observe_body_resize(state, &body) {
            listeners.push(listener);
        }
        listeners
    }

    fn internal_scroll(state: &Rc<RefCell<SharedState>>, event: &Event) {
        let Some(element) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let axis = scrollbar_axis(&element.class_name());
        // An unclassified target reads as vertical for the pixel values; the
        // synchronizer ignores it either way.
        let read_axis = axis.unwrap_or(Axis::Vertical);
        let scroll_event = ScrollEvent::new(
            axis,
            scroll_position_px(&element, read_axis),
            scroll_extent_px(&element, read_axis),
        );
        state.borrow_mut().table.scroll_event(scroll_event);
        Self::arm_timer(state);
    }

    fn internal_wheel(state: &Rc<RefCell<SharedState>>, event: &Event) {
        let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        let target = wheel_target(event);
        let handled = state
            .borrow_mut()
            .table
            .wheel_event(target, wheel.delta_y());
        if handled {
            event.prevent_default();
            Self::sync_scrollbar_positions(state);
        }
        Self::arm_timer(state);
    }

    fn internal_touch_move(state: &Rc<RefCell<SharedState>>, event: &Event) {
        let Some((x, y)) = first_touch(event) else {
            return;
        };
        event.prevent_default();
        state.borrow_mut().table.touch_move(x, y);
        Self::sync_scrollbar_positions(state);
        Self::flush_notifications(state);
        Self::arm_timer(state);
    }

    fn observe_body_resize(
        state: &Rc<RefCell<SharedState>>,
        body: &HtmlElement,
    ) -> Option<Listener> {
        let weak_state = Rc::downgrade(state);
        let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            let Some(state) = weak_state.upgrade() else {
                return;
            };
            {
                let mut s = state.borrow_mut();
                let height = f64::from(s.body.client_height());
                s.table.body_resized(height);
            }
            Self::arm_timer(&state);
        }) as Box<dyn FnMut(js_sys::Array)>);
        let observer = ResizeObserver::new(closure.as_ref().unchecked_ref()).ok()?;
        observer.observe(body);
        Some(Listener::Resize {
            observer,
            _closure: closure,
        })
    }
}

#[cfg(target_arch = "wasm32")]
fn listen(
    target: &HtmlElement,
    kind: &'static str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Listener {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .ok();
    Listener::Event {
        target: target.clone().into(),
        kind,
        closure,
    }
}
