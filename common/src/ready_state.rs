use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Countdown latch: becomes ready once `signal` has been called `total` times.
///
/// Clones share the same counter, so one clone can be handed to each
/// participant while another waits.
#[derive(Debug, Clone)]
pub struct ReadyState {
    total: usize,
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    count: Mutex<usize>,
    ready: Condvar,
}

impl ReadyState {
    pub fn new(total: usize) -> Self {
        assert!(total > 0, "ReadyState total must be positive");
        Self {
            total,
            inner: Arc::new(Inner::default()),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn signal(&self) {
        let mut count = self.inner.count.lock();
        if *count < self.total {
            *count += 1;
        }
        if *count == self.total {
            self.inner.ready.notify_all();
        }
    }

    pub fn is_ready(&self) -> bool {
        *self.inner.count.lock() >= self.total
    }

    pub fn wait(&self) {
        let mut count = self.inner.count.lock();
        while *count < self.total {
            self.inner.ready.wait(&mut count);
        }
    }

    /// Returns `true` if the latch became ready within `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut count = self.inner.count.lock();
        if *count >= self.total {
            return true;
        }
        // Spurious wakeups are fine: the loop rechecks the counter.
        let deadline = std::time::Instant::now() + timeout;
        while *count < self.total {
            if self.inner.ready.wait_until(&mut count, deadline).timed_out() {
                return *count >= self.total;
            }
        }
        true
    }
}
