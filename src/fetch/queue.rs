//! Request queue capping simultaneous outbound requests.
//!
//! Callers poll for a free slot on a fixed interval rather than parking on a
//! waiter list. A slot is released when its guard drops, so every exit path
//! (success, retry, error, panic unwind) gives it back exactly once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::sleep;

/// Counter of in-flight requests bounded by `max_concurrent`.
#[derive(Debug)]
pub struct RequestQueue {
    pending: AtomicUsize,
    max_concurrent: usize,
    poll_interval: Duration,
}

/// A held request slot. Dropping it releases the slot.
#[derive(Debug)]
pub struct QueueSlot<'a> {
    queue: &'a RequestQueue,
}

impl RequestQueue {
    /// Creates a queue. `max_concurrent` is raised to 1 if zero.
    pub fn new(max_concurrent: usize, poll_interval: Duration) -> Self {
        RequestQueue {
            pending: AtomicUsize::new(0),
            max_concurrent: max_concurrent.max(1),
            poll_interval,
        }
    }

    /// Takes a slot if one is free.
    pub fn try_acquire(&self) -> Option<QueueSlot<'_>> {
        self.pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |pending| {
                (pending < self.max_concurrent).then_some(pending + 1)
            })
            .ok()
            .map(|_| QueueSlot { queue: self })
    }

    /// Waits until a slot frees up, re-checking every poll interval.
    pub async fn acquire(&self) -> QueueSlot<'_> {
        loop {
            if let Some(slot) = self.try_acquire() {
                return slot;
            }
            log::trace!(
                "Request queue full ({}/{}), waiting {}ms",
                self.pending(),
                self.max_concurrent,
                self.poll_interval.as_millis()
            );
            sleep(self.poll_interval).await;
        }
    }

    /// Requests currently holding a slot.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    fn release(&self) {
        // Floor at zero; a slot guard is the only caller so this never underflows.
        let _ = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |pending| {
                Some(pending.saturating_sub(1))
            });
    }
}

impl Drop for QueueSlot<'_> {
    fn drop(&mut self) {
        self.queue.release();
    }
}
