//! Cancel-and-replace debouncing
//!
//! Staff notation and inspector refreshes are expensive and recompute from
//! current state, so only the last edit of a burst needs to trigger one. The
//! debouncer stores the pending timer handle; the host owns the actual timer.

#[derive(Debug)]
pub struct Debouncer<T> {
    delay_ms: f64,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending handle so the caller can cancel it before re-arming
    pub fn take_pending(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn arm(&mut self, handle: T) {
        self.pending = Some(handle);
    }

    /// The timer fired
    pub fn complete(&mut self) {
        self.pending = None;
    }
}
