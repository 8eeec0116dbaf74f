//! Trailing-edge debouncing with injected time.
//!
//! A [`Debouncer`] never owns a platform timer. Callers pass the current time
//! to [`Debouncer::call`] and [`Debouncer::poll`], and arm a single timer for
//! the earliest [`Debouncer::next_deadline`] across their debouncers.
//! Tables read the time through a [`Clock`].

use std::cell::Cell;
use std::rc::Rc;

/// Source of monotonic milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock: `performance.now()` in the browser, `Instant` elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map_or_else(js_sys::Date::now, |p| p.now())
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn new(now_ms: f64) -> Self {
        Self(Rc::new(Cell::new(now_ms)))
    }

    pub fn set(&self, now_ms: f64) {
        self.0.set(now_ms);
    }

    pub fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

/// Coalesces bursts of calls into one trailing invocation carrying the
/// argument of the last call.
#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    name: &'static str,
    wait_ms: f64,
    deadline: Option<f64>,
    pending: Option<A>,
}

impl<A> Debouncer<A> {
    pub fn new(name: &'static str, wait_ms: f64) -> Self {
        Self {
            name,
            wait_ms: sanitize_wait(wait_ms),
            deadline: None,
            pending: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn wait_ms(&self) -> f64 {
        self.wait_ms
    }

    /// Change the quiet period. Applies from the next call; a pending
    /// deadline is left as scheduled.
    pub fn set_wait(&mut self, wait_ms: f64) {
        self.wait_ms = sanitize_wait(wait_ms);
    }

    /// Record a call: the argument replaces any pending one and the deadline
    /// moves to `now_ms + wait`.
    pub fn call(&mut self, now_ms: f64, arg: A) {
        self.pending = Some(arg);
        self.deadline = Some(now_ms + self.wait_ms);
    }

    /// Take the pending argument if the quiet period has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<A> {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                let arg = self.pending.take();
                if arg.is_some() {
                    log::trace!("{} fired", self.name);
                }
                arg
            }
            _ => None,
        }
    }

    /// When the pending invocation becomes due.
    pub fn next_deadline(&self) -> Option<f64> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending invocation, returning its argument.
    pub fn cancel(&mut self) -> Option<A> {
        self.deadline = None;
        self.pending.take()
    }
}

fn sanitize_wait(wait_ms: f64) -> f64 {
    if wait_ms.is_finite() {
        wait_ms.max(0.0)
    } else {
        0.0
    }
}

/// Earliest of several optional deadlines.
pub fn earliest_deadline(deadlines: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    deadlines.into_iter().flatten().reduce(f64::min)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_fires_once_with_last_argument() {
        let mut d = Debouncer::new("scroll", 120.0);
        for (i, t) in [0.0, 30.0, 60.0, 90.0].into_iter().enumerate() {
            d.call(t, i);
            assert_eq!(d.poll(t), None);
        }
        assert_eq!(d.next_deadline(), Some(210.0));
        assert_eq!(d.poll(200.0), None);
        assert_eq!(d.poll(210.0), Some(3));
        assert_eq!(d.poll(500.0), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_zero_wait_fires_on_same_tick() {
        let mut d = Debouncer::new("refresh", 0.0);
        d.call(5.0, "x");
        assert_eq!(d.poll(5.0), Some("x"));
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut d = Debouncer::new("refresh", 10.0);
        d.call(0.0, ());
        assert_eq!(d.cancel(), Some(()));
        assert_eq!(d.poll(100.0), None);
        assert_eq!(d.next_deadline(), None);
    }

    #[test]
    fn test_set_wait_applies_to_next_call() {
        let mut d = Debouncer::new("scroll", 120.0);
        d.call(0.0, 1);
        d.set_wait(500.0);
        assert_eq!(d.next_deadline(), Some(120.0));
        d.call(10.0, 2);
        assert_eq!(d.next_deadline(), Some(510.0));
        d.set_wait(f64::NAN);
        assert_eq!(d.wait_ms(), 0.0);
    }

    #[test]
    fn test_manual_clock_is_shared() {
        let clock = ManualClock::new(10.0);
        let other = clock.clone();
        other.advance(5.0);
        assert_eq!(clock.now_ms(), 15.0);
    }

    #[test]
    fn test_earliest_deadline() {
        assert_eq!(earliest_deadline([None, Some(30.0), Some(12.0)]), Some(12.0));
        assert_eq!(earliest_deadline([None, None]), None);
    }
}
