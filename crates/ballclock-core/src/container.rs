//! Bounded ball containers.
//!
//! Two variants share one capacity contract through [`BoundedContainer`]:
//! [`BallQueue`] (first-in-first-out, the main queue) and [`BallStack`]
//! (last-in-first-out, the track bodies). Each guards its sequence with its
//! own mutex so `push`, `pop` and `size` are atomic for concurrent callers.
//! No operation ever holds more than one container lock.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ballclock_types::Ball;

/// Errors raised by container operations.
///
/// Both variants are structural signals rather than failures: a full track
/// triggers a cascade and an empty container ends a drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    /// The container already holds `capacity` balls.
    #[error("container is full (capacity {capacity})")]
    CapacityExceeded {
        /// Capacity of the container that rejected the push.
        capacity: usize,
    },

    /// The container holds no balls.
    #[error("container is empty")]
    Empty,
}

/// Capacity-enforcing ball container.
///
/// Operations take `&self`; implementations synchronize internally.
pub trait BoundedContainer {
    /// Add a ball.
    ///
    /// Fails with [`ContainerError::CapacityExceeded`] when full, leaving
    /// the container unchanged.
    fn push(&self, ball: Ball) -> Result<(), ContainerError>;

    /// Remove one ball according to the container's discipline.
    ///
    /// Fails with [`ContainerError::Empty`] when there is nothing to remove.
    fn pop(&self) -> Result<Ball, ContainerError>;

    /// Current number of balls.
    fn size(&self) -> usize;

    /// Maximum number of balls.
    fn capacity(&self) -> usize;

    /// Copy of the contents in insertion order.
    fn contents(&self) -> Vec<Ball>;

    /// Whether another push would fail.
    fn is_full(&self) -> bool {
        self.size() >= self.capacity()
    }

    /// Whether a pop would fail.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// Acquire a container lock, recovering the data if a holder panicked.
///
/// Every critical section is a single push or pop, so the sequence is
/// never left half-updated.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fixed-capacity first-in-first-out container (the main queue).
#[derive(Debug)]
pub struct BallQueue {
    balls: Mutex<VecDeque<Ball>>,
    capacity: usize,
}

impl BallQueue {
    /// Create an empty queue holding at most `capacity` balls.
    pub fn new(capacity: usize) -> Self {
        Self {
            balls: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Whether the queue's full ordering equals `order`.
    ///
    /// The comparison runs under a single lock acquisition.
    pub fn matches(&self, order: &[Ball]) -> bool {
        let balls = lock(&self.balls);
        balls.len() == order.len() && balls.iter().eq(order.iter())
    }
}

impl BoundedContainer for BallQueue {
    fn push(&self, ball: Ball) -> Result<(), ContainerError> {
        let mut balls = lock(&self.balls);
        if balls.len() >= self.capacity {
            return Err(ContainerError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        balls.push_back(ball);
        Ok(())
    }

    fn pop(&self) -> Result<Ball, ContainerError> {
        lock(&self.balls).pop_front().ok_or(ContainerError::Empty)
    }

    fn size(&self) -> usize {
        lock(&self.balls).len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn contents(&self) -> Vec<Ball> {
        lock(&self.balls).iter().copied().collect()
    }
}

/// Fixed-capacity last-in-first-out container (a track body).
#[derive(Debug)]
pub struct BallStack {
    balls: Mutex<Vec<Ball>>,
    capacity: usize,
}

impl BallStack {
    /// Create an empty stack holding at most `capacity` balls.
    pub fn new(capacity: usize) -> Self {
        Self {
            balls: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }
}

impl BoundedContainer for BallStack {
    fn push(&self, ball: Ball) -> Result<(), ContainerError> {
        let mut balls = lock(&self.balls);
        if balls.len() >= self.capacity {
            return Err(ContainerError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        balls.push(ball);
        Ok(())
    }

    fn pop(&self) -> Result<Ball, ContainerError> {
        lock(&self.balls).pop().ok_or(ContainerError::Empty)
    }

    fn size(&self) -> usize {
        lock(&self.balls).len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn contents(&self) -> Vec<Ball> {
        lock(&self.balls).clone()
    }
}
