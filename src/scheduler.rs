use std::time::{Duration, Instant};

/// A monotonic time source. Consumed by the throttle operator; injected so
/// tests can drive time by hand.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Identifies a pending timer for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self { Self(id) }

    pub fn id(&self) -> u64 { self.0 }
}

/// A one-shot timer facility. Consumed, not implemented, by this crate.
///
/// Contract: `task` must be invoked on the engine's propagation thread, and
/// `cancel` must be idempotent (cancelling a fired or unknown handle is a
/// no-op).
pub trait Scheduler {
    fn schedule_once(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle;

    fn cancel(&self, handle: TimerHandle);
}
