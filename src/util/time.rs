use std::cell::Cell;
use std::rc::Rc;

/// Get the current time in seconds since the UNIX epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn current_time_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Get the current time in seconds since page load
#[cfg(target_arch = "wasm32")]
pub fn current_time_secs() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| perf.now() / 1000.0)
        .unwrap_or(0.0)
}

/// Source of "now" for the canvas engine.
///
/// Debouncing and element creation timestamps read time through this trait so
/// tests can drive the engine deterministically.
pub trait Clock {
    /// Current time in seconds
    fn now(&self) -> f64;
}

/// Wall clock backed by [`current_time_secs`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        current_time_secs()
    }
}

/// Manually advanced clock. Clones share the same time value.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    secs: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_secs: f64) -> Self {
        Self {
            secs: Rc::new(Cell::new(start_secs)),
        }
    }

    pub fn set(&self, secs: f64) {
        self.secs.set(secs);
    }

    pub fn advance(&self, secs: f64) {
        self.secs.set(self.secs.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.secs.get()
    }
}
