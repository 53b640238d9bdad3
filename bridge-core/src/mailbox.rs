//! Single-slot mailbox with overwrite-on-publish semantics.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

/// A one-value mailbox between a single producer and a single consumer.
///
/// Publishing while a value is pending replaces it (last write wins), and a
/// waiting consumer observes each published value at most once. This is the
/// hand-off point between the bus worker and the host link: the worker
/// publishes each frame the peer writes, the link drains the slot once per
/// poll iteration.
pub struct Slot<M: RawMutex, T> {
    signal: Signal<M, T>,
}

impl<M: RawMutex, T: Send> Slot<M, T> {
    /// Create an empty slot.
    pub const fn new() -> Self {
        Self { signal: Signal::new() }
    }

    /// Publish a value, replacing any unconsumed one.
    pub fn publish(&self, value: T) {
        self.signal.signal(value);
    }

    /// Wait for a value and consume it.
    pub async fn wait(&self) -> T {
        self.signal.wait().await
    }

    /// Consume the pending value, if any, without waiting.
    pub fn try_take(&self) -> Option<T> {
        self.signal.try_take()
    }

    /// True if a value is waiting to be consumed.
    pub fn is_pending(&self) -> bool {
        self.signal.signaled()
    }
}

impl<M: RawMutex, T: Send> Default for Slot<M, T> {
    fn default() -> Self {
        Self::new()
    }
}
