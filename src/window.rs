//! Fixed-capacity rolling window
//!
//! A ring buffer over a slice allocated once at construction. Pushing past
//! capacity overwrites the oldest element; nothing reallocates afterwards.
//! Used for the value and latency windows, the p99 history and the
//! dashboard line history.

use std::num::NonZeroUsize;

/// Ring buffer keeping the most recent `capacity` values in arrival order
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    slots: Box<[T]>,
    /// Index of the slot the next push writes to
    head: usize,
    len: usize,
}

impl<T: Default> RollingWindow<T> {
    /// Create an empty window, preallocating every slot
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        let slots = std::iter::repeat_with(T::default)
            .take(capacity.get())
            .collect();
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }
}

impl<T> RollingWindow<T> {
    /// Append a value, returning the evicted oldest value when full
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = std::mem::replace(&mut self.slots[self.head], value);
        self.head = (self.head + 1) % self.slots.len();
        if self.len < self.slots.len() {
            self.len += 1;
            None
        } else {
            Some(evicted)
        }
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        let cap = self.slots.len();
        let start = (self.head + cap - self.len) % cap;
        (0..self.len).map(move |i| &self.slots[(start + i) % cap])
    }

    /// Most recently pushed value
    #[must_use]
    pub fn latest(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Oldest value still in the window
    #[must_use]
    pub fn oldest(&self) -> Option<&T> {
        self.iter().next()
    }
}

impl<T: Clone> RollingWindow<T> {
    /// Copy the contents out, oldest first
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl RollingWindow<f64> {
    /// Contents sorted ascending, for percentile queries
    #[must_use]
    pub fn sorted(&self) -> Vec<f64> {
        let mut values = self.to_vec();
        values.sort_by(f64::total_cmp);
        values
    }
}
