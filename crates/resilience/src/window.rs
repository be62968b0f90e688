//! Fixed-capacity sliding window of boolean outcomes.
//!
//! [`OutcomeRing`] is the unsynchronised ring used by the circuit breaker
//! under its own lock. [`SlidingWindow`] wraps it in a `RwLock` for callers
//! that share a window directly.

use failguard_core::ConfigError;
use parking_lot::RwLock;

/// Ring of the most recent `capacity` outcomes with an O(1) running count of
/// `true` entries.
#[derive(Debug, Clone)]
pub struct OutcomeRing {
    ring: Box<[bool]>,
    cursor: usize,
    true_count: usize,
}

impl OutcomeRing {
    /// Create a ring of `capacity` slots, all `false`
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::invalid_threshold("window capacity", 0));
        }
        Ok(Self::sized(capacity))
    }

    /// Ring for an already validated capacity; zero is bumped to one slot
    pub(crate) fn sized(capacity: usize) -> Self {
        Self {
            ring: vec![false; capacity.max(1)].into_boxed_slice(),
            cursor: 0,
            true_count: 0,
        }
    }

    /// Overwrite the oldest slot with `value`
    pub fn insert(&mut self, value: bool) {
        let slot = &mut self.ring[self.cursor];
        if *slot {
            self.true_count -= 1;
        }
        *slot = value;
        if value {
            self.true_count += 1;
        }
        self.cursor = (self.cursor + 1) % self.ring.len();
    }

    pub fn count(&self) -> usize {
        self.true_count
    }

    pub fn count_false(&self) -> usize {
        self.ring.len() - self.true_count
    }

    /// Fill every slot with `value`
    pub fn reset(&mut self, value: bool) {
        self.ring.fill(value);
        self.true_count = if value { self.ring.len() } else { 0 };
    }

    pub fn capacity(&self) -> usize {
        self.ring.len()
    }
}

/// Thread-safe sliding window.
#[derive(Debug)]
pub struct SlidingWindow {
    inner: RwLock<OutcomeRing>,
}

impl SlidingWindow {
    /// Create a window of `capacity` slots. Fails if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: RwLock::new(OutcomeRing::new(capacity)?),
        })
    }

    pub fn insert(&self, value: bool) {
        self.inner.write().insert(value);
    }

    /// Number of `true` outcomes currently in the window
    pub fn count(&self) -> usize {
        self.inner.read().count()
    }

    /// Number of `false` outcomes currently in the window
    pub fn count_false(&self) -> usize {
        self.inner.read().count_false()
    }

    pub fn reset(&self, value: bool) {
        self.inner.write().reset(value);
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }
}
