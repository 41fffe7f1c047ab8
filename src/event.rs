//! Event model and wall-clock abstraction
//!
//! Events carry their creation time as float seconds since the Unix epoch.
//! Latency is derived by the consumer at the moment each event is applied,
//! so it covers queueing and batching delay. The [`Clock`] trait is the seam
//! that lets tests control "now".

use derive_more::{Display, From, Into};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Key identifying the user that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
pub struct UserId(u64);

impl UserId {
    /// Create a user id
    #[must_use]
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id
    #[must_use]
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Decimal rendering of the id, the byte form both sketches key on
    #[must_use]
    pub fn key(&self) -> UserKey {
        UserKey::from_id(self.0)
    }
}

/// Stack-allocated decimal rendering of a [`UserId`]
///
/// `u64::MAX` has 20 digits, so the buffer never overflows and the hot path
/// never allocates.
#[derive(Clone, Copy)]
pub struct UserKey {
    buf: [u8; 20],
    start: usize,
}

impl UserKey {
    fn from_id(mut id: u64) -> Self {
        let mut buf = [0u8; 20];
        let mut start = buf.len();
        loop {
            start -= 1;
            buf[start] = b'0' + (id % 10) as u8;
            id /= 10;
            if id == 0 {
                break;
            }
        }
        Self { buf, start }
    }

    /// The key bytes
    #[must_use]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start..]
    }
}

impl AsRef<[u8]> for UserKey {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Digits are always valid UTF-8
        f.write_str(std::str::from_utf8(self.as_bytes()).unwrap_or("?"))
    }
}

/// A single measurement flowing through the pipeline
///
/// Immutable once created: fields are only readable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    user_id: UserId,
    value: f64,
    timestamp: f64,
}

impl Event {
    /// Create an event with an explicit creation timestamp (epoch seconds)
    #[must_use]
    pub const fn new(user_id: UserId, value: f64, timestamp: f64) -> Self {
        Self {
            user_id,
            value,
            timestamp,
        }
    }

    /// Create an event stamped with the given clock's current time
    #[must_use]
    pub fn stamped(user_id: UserId, value: f64, clock: &dyn Clock) -> Self {
        Self::new(user_id, value, clock.now())
    }

    #[must_use]
    #[inline]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    #[inline]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    #[inline]
    pub const fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Seconds elapsed between creation and `now`
    ///
    /// Clamped at zero: a producer clock slightly ahead of the consumer
    /// must not feed negative samples into the latency window.
    #[must_use]
    #[inline]
    pub fn latency_at(&self, now: f64) -> f64 {
        (now - self.timestamp).max(0.0)
    }
}

/// Source of "now" in epoch seconds
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> f64;
}

/// Wall clock backed by `SystemTime`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> f64 {
        unix_now()
    }
}

/// Current wall-clock time in epoch seconds
#[must_use]
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Manually driven clock shared between a test and the engine
///
/// Cloning shares the same underlying time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `start` epoch seconds
    #[must_use]
    pub fn new(start: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start.to_bits())),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now: f64) {
        self.bits.store(now.to_bits(), Ordering::Release);
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.set(self.now() + by.as_secs_f64());
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}
