//! Size-or-time micro-batching
//!
//! The batcher pulls from the queue into an accumulation buffer and emits
//! the buffer as a [`Batch`] when it reaches `batch_size` or when the
//! current window has been open for `max_delay`. Every wait is a single
//! deadline wait on the queue, never a poll.
//!
//! Guarantees:
//! - a non-empty buffer is emitted at most `max_delay` after its first
//!   event arrived
//! - an empty buffer never produces a batch
//! - events leave in the order they were enqueued

use crate::config::BatchConfig;
use crate::event::Event;
use crate::queue::{Dequeued, QueueConsumer};
use crate::types::BatchSize;
use std::fmt;
use std::ops::Deref;
use std::time::Duration;
use tokio::time::Instant;

/// What caused a batch to be emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlushTrigger {
    /// The buffer reached the batch size
    Size,
    /// An event arrived after the window had already expired
    Deadline,
    /// The window expired while waiting for the next event
    Idle,
    /// The queue closed and the remaining events were flushed
    Drain,
}

impl FlushTrigger {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Deadline => "deadline",
            Self::Idle => "idle",
            Self::Drain => "drain",
        }
    }
}

impl fmt::Display for FlushTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, non-empty group of events handed to the statistics engine
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T = Event> {
    events: Vec<T>,
    trigger: FlushTrigger,
}

impl<T> Batch<T> {
    #[must_use]
    pub fn events(&self) -> &[T] {
        &self.events
    }

    #[must_use]
    pub fn trigger(&self) -> FlushTrigger {
        self.trigger
    }

    #[must_use]
    pub fn into_events(self) -> Vec<T> {
        self.events
    }
}

impl<T> Deref for Batch<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.events
    }
}

/// Groups queued items into batches by size or elapsed time
#[derive(Debug)]
pub struct Batcher<T = Event> {
    queue: QueueConsumer<T>,
    batch_size: BatchSize,
    max_delay: Duration,
    buffer: Vec<T>,
    window_start: Instant,
    restart_window: bool,
    drained: bool,
}

impl<T> Batcher<T> {
    /// Create a batcher; the first window opens now
    #[must_use]
    pub fn new(queue: QueueConsumer<T>, batch_size: BatchSize, max_delay: Duration) -> Self {
        Self {
            queue,
            batch_size,
            max_delay,
            buffer: Vec::with_capacity(batch_size.get()),
            window_start: Instant::now(),
            restart_window: false,
            drained: false,
        }
    }

    #[must_use]
    pub fn from_config(queue: QueueConsumer<T>, config: &BatchConfig) -> Self {
        Self::new(queue, config.size, config.max_delay)
    }

    /// Wait for the next batch
    ///
    /// Returns `None` once the queue is closed and fully drained; the final
    /// partial buffer is emitted first with [`FlushTrigger::Drain`].
    ///
    /// After a batch is emitted the next window opens when this is called
    /// again, so time the caller spends processing the batch is not
    /// charged to the following one.
    pub async fn next_batch(&mut self) -> Option<Batch<T>> {
        if self.drained {
            return None;
        }

        if self.restart_window {
            self.window_start = Instant::now();
            self.restart_window = false;
        }

        loop {
            let deadline = self.window_start + self.max_delay;
            match self.queue.get_until(deadline).await {
                Dequeued::Item(item) => {
                    self.buffer.push(item);
                    if self.buffer.len() >= self.batch_size.get() {
                        return Some(self.flush(FlushTrigger::Size));
                    }
                    if self.window_start.elapsed() >= self.max_delay {
                        return Some(self.flush(FlushTrigger::Deadline));
                    }
                }
                Dequeued::TimedOut if self.buffer.is_empty() => {
                    // Open a fresh window rather than spinning on an
                    // already-expired deadline
                    self.window_start = Instant::now();
                }
                Dequeued::TimedOut => return Some(self.flush(FlushTrigger::Idle)),
                Dequeued::Closed => {
                    self.drained = true;
                    if self.buffer.is_empty() {
                        return None;
                    }
                    return Some(self.flush(FlushTrigger::Drain));
                }
            }
        }
    }

    fn flush(&mut self, trigger: FlushTrigger) -> Batch<T> {
        let events = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.batch_size.get()));
        self.restart_window = true;
        Batch { events, trigger }
    }

    /// Events accumulated but not yet emitted
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// The queue this batcher drains, for depth observation
    #[must_use]
    pub fn queue(&self) -> &QueueConsumer<T> {
        &self.queue
    }

    /// Stop accepting new events; queued ones are still batched
    pub fn close(&mut self) {
        self.queue.close();
    }

    #[must_use]
    pub fn batch_size(&self) -> BatchSize {
        self.batch_size
    }

    #[must_use]
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }
}
