//! Lock-free bounded queues between the event callback and the rest.
//!
//! The callback pushes without blocking; a non-RT consumer drains. Two
//! things travel this way: diagnostics out of the pipeline and new curves
//! into it.
//!
//! # RT Safety
//!
//! `push`, `push_drop` and `pop` are RT-safe:
//! - Bounded capacity (no allocation on push)
//! - Lock-free implementation
//! - Deterministic execution time
//!
//! # Overflow Behavior
//!
//! `push_drop` discards the new value when the queue is full and counts the
//! loss. Callers that must not lose a value use `push` and keep the
//! rejected value.

use core::sync::atomic::{AtomicU64, Ordering};

use crossbeam::queue::ArrayQueue;

/// Default capacity for event queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1_024;

/// Bounded lock-free queue that counts what it drops.
///
/// # Example
///
/// ```rust
/// use leetaccel_atomic::queues::EventQueue;
///
/// let queue = EventQueue::with_capacity(2);
/// assert!(queue.push_drop(1u8));
/// assert!(queue.push_drop(2));
/// assert!(!queue.push_drop(3));
///
/// let drained: Vec<u8> = queue.drain().collect();
/// assert_eq!(drained, vec![1, 2]);
/// assert_eq!(queue.dropped(), 1);
/// ```
#[derive(Debug)]
pub struct EventQueue<T> {
    queue: ArrayQueue<T>,
    dropped: AtomicU64,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    /// Create a queue with [`DEFAULT_QUEUE_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a queue holding at most `capacity` values (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity.max(1)),
            dropped: AtomicU64::new(0),
        }
    }

    /// Push a value.
    ///
    /// # Errors
    ///
    /// Returns `Err(value)` if the queue is full.
    #[inline]
    pub fn push(&self, value: T) -> Result<(), T> {
        self.queue.push(value)
    }

    /// Push a value, dropping it on overflow.
    ///
    /// Returns `true` if the value was queued.
    #[inline]
    pub fn push_drop(&self, value: T) -> bool {
        match self.queue.push(value) {
            Ok(()) => true,
            Err(_rejected) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Pop the oldest value.
    #[inline]
    pub fn pop(&self) -> Option<T> {
        self.queue.pop()
    }

    /// Pop values until the queue is empty.
    ///
    /// Values pushed concurrently while draining may or may not be yielded.
    pub fn drain(&self) -> impl Iterator<Item = T> + '_ {
        core::iter::from_fn(move || self.queue.pop())
    }

    /// Values currently queued.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is queued.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Maximum number of queued values.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Values discarded by [`Self::push_drop`].
    #[inline]
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
