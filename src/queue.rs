//! Bounded FIFO queue between the producer and the consumer pipeline
//!
//! The queue is the only synchronization point of the pipeline and its
//! only backpressure mechanism: `put` suspends while the queue is full,
//! which throttles the producer to the consumer's pace. Nothing is ever
//! dropped or reordered.
//!
//! The consumer side waits for either an item or a deadline in a single
//! `timeout_at`, reporting the outcome as [`Dequeued`]. A timeout is a
//! normal outcome, not an error.

use crate::types::QueueCapacity;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};

/// Error returned when an item could not be enqueued
///
/// The rejected item is handed back to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError<T> {
    /// The consumer half has been dropped or closed
    #[error("queue is closed")]
    Closed(T),
}

/// Outcome of a dequeue attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dequeued<T> {
    /// An item was available before the deadline
    Item(T),
    /// The deadline passed with the queue empty
    TimedOut,
    /// Every producer is gone and the queue has been drained
    Closed,
}

/// Create a bounded queue with a fixed capacity
///
/// Returns a cloneable producer half and the single consumer half.
#[must_use]
pub fn bounded<T>(capacity: QueueCapacity) -> (QueueProducer<T>, QueueConsumer<T>) {
    let (tx, rx) = mpsc::channel(capacity.get());
    (QueueProducer { tx }, QueueConsumer { rx })
}

/// Producer half of the bounded queue
#[derive(Debug)]
pub struct QueueProducer<T> {
    tx: mpsc::Sender<T>,
}

// Manual impl: cloning the sender does not require `T: Clone`
impl<T> Clone for QueueProducer<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> QueueProducer<T> {
    /// Enqueue an item, suspending while the queue is full
    ///
    /// # Errors
    /// Returns [`QueueError::Closed`] with the item if the consumer is gone.
    pub async fn put(&self, item: T) -> Result<(), QueueError<T>> {
        self.tx.send(item).await.map_err(|e| QueueError::Closed(e.0))
    }

    /// Number of items currently queued
    ///
    /// Permits reserved by suspended `put` calls are not counted until the
    /// item lands in the queue.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Fixed capacity of the queue
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Check if the consumer half is gone
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half of the bounded queue
#[derive(Debug)]
pub struct QueueConsumer<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> QueueConsumer<T> {
    /// Wait up to `timeout` for the next item
    pub async fn get(&mut self, timeout: Duration) -> Dequeued<T> {
        self.get_until(Instant::now() + timeout).await
    }

    /// Wait until `deadline` for the next item
    ///
    /// A deadline in the past still returns an item that is already queued.
    pub async fn get_until(&mut self, deadline: Instant) -> Dequeued<T> {
        match timeout_at(deadline, self.rx.recv()).await {
            Ok(Some(item)) => Dequeued::Item(item),
            Ok(None) => Dequeued::Closed,
            Err(_) => Dequeued::TimedOut,
        }
    }

    /// Stop accepting new items
    ///
    /// Items already queued are still delivered; afterwards `get` reports
    /// [`Dequeued::Closed`] and producers receive [`QueueError::Closed`].
    pub fn close(&mut self) {
        self.rx.close();
    }

    /// Number of items currently queued
    #[must_use]
    pub fn depth(&self) -> usize {
        self.rx.len()
    }

    /// Fixed capacity of the queue
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.rx.max_capacity()
    }

    /// Check if nothing is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(n: usize) -> QueueCapacity {
        QueueCapacity::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let (tx, mut rx) = bounded(capacity(4));
        for i in 0..4 {
            tx.put(i).await.unwrap();
        }
        for i in 0..4 {
            assert_eq!(rx.get(Duration::from_millis(10)).await, Dequeued::Item(i));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_times_out_when_empty() {
        let (_tx, mut rx) = bounded::<u32>(capacity(2));
        let start = Instant::now();
        assert_eq!(rx.get(Duration::from_millis(50)).await, Dequeued::TimedOut);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_past_deadline_still_returns_ready_item() {
        let (tx, mut rx) = bounded(capacity(2));
        tx.put("ready").await.unwrap();
        let past = Instant::now() - Duration::from_millis(1);
        assert_eq!(rx.get_until(past).await, Dequeued::Item("ready"));
    }

    #[tokio::test]
    async fn test_put_after_consumer_dropped() {
        let (tx, rx) = bounded(capacity(1));
        drop(rx);
        assert_eq!(tx.put(5).await, Err(QueueError::Closed(5)));
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn test_closed_after_drain() {
        let (tx, mut rx) = bounded(capacity(3));
        tx.put(1).await.unwrap();
        tx.put(2).await.unwrap();
        drop(tx);

        assert_eq!(rx.get(Duration::from_millis(10)).await, Dequeued::Item(1));
        assert_eq!(rx.get(Duration::from_millis(10)).await, Dequeued::Item(2));
        assert_eq!(rx.get(Duration::from_millis(10)).await, Dequeued::Closed);
    }

    #[tokio::test]
    async fn test_close_keeps_queued_items() {
        let (tx, mut rx) = bounded(capacity(3));
        tx.put(1).await.unwrap();
        rx.close();
        assert!(tx.put(2).await.is_err());
        assert_eq!(rx.get(Duration::from_millis(10)).await, Dequeued::Item(1));
        assert_eq!(rx.get(Duration::from_millis(10)).await, Dequeued::Closed);
    }

    #[tokio::test]
    async fn test_depth_and_capacity() {
        let (tx, mut rx) = bounded(capacity(5));
        assert_eq!(tx.capacity(), 5);
        assert_eq!(rx.capacity(), 5);
        assert!(rx.is_empty());

        tx.put('a').await.unwrap();
        tx.put('b').await.unwrap();
        assert_eq!(tx.depth(), 2);
        assert_eq!(rx.depth(), 2);

        rx.get(Duration::from_millis(1)).await;
        assert_eq!(tx.depth(), 1);
        assert_eq!(rx.depth(), 1);
    }
}
