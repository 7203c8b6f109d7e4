//! Cooperative cancellation context handed to command runners.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cancellation signal and optional deadline for a command run.
///
/// The resolution engine never blocks and never checks this itself; it is
/// passed through to the runner so long-lived handlers can stop early when
/// the caller cancels or the deadline passes. Clones share the underlying
/// cancellation flag.
///
/// # Examples
///
/// ```
/// use argtree_core::RunContext;
///
/// let ctx = RunContext::new();
/// let handle = ctx.clone();
/// assert!(!ctx.is_cancelled());
///
/// handle.cancel();
/// assert!(ctx.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RunContext {
    /// Creates a context with no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that reports cancelled once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    /// Creates a context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Signals cancellation to every clone of this context.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether the run was cancelled or the deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Relaxed) {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// The configured deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline. `None` when unbounded, zero once the
    /// deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}
