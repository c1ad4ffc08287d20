//! Bounded polling.
//!
//! Every busy-wait on a hardware flag goes through [`wait_for`] or
//! [`wait_for_cancellable`] so a flag that never comes up turns into an error
//! instead of a hang, when the caller asks for a limit.

use core::sync::atomic::{AtomicBool, Ordering};

/// How long a poll loop may spin before giving up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PollLimit {
    /// Spin until the condition holds.
    #[default]
    Unbounded,
    /// Check the condition at most this many times.
    Polls(u32),
}

/// Why a poll loop stopped without its condition holding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaitError {
    /// The [`PollLimit`] ran out.
    Timeout,
    /// The [`CancelToken`] was tripped.
    Cancelled,
}

/// Request flag for abandoning a wait from another context.
///
/// Typically a `static` that an interrupt handler trips while thread mode
/// is spinning in [`wait_for_cancellable`].
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Re-arm the token for the next wait.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Spin until `ready` returns true or `limit` runs out.
pub fn wait_for(ready: impl FnMut() -> bool, limit: PollLimit) -> Result<(), WaitError> {
    poll(ready, limit, None)
}

/// Like [`wait_for`], but also stops once `token` is cancelled.
///
/// A condition that holds wins over a cancel seen on the same check.
pub fn wait_for_cancellable(
    ready: impl FnMut() -> bool,
    limit: PollLimit,
    token: &CancelToken,
) -> Result<(), WaitError> {
    poll(ready, limit, Some(token))
}

fn poll(
    mut ready: impl FnMut() -> bool,
    limit: PollLimit,
    token: Option<&CancelToken>,
) -> Result<(), WaitError> {
    let mut polls: u32 = 0;
    loop {
        if ready() {
            return Ok(());
        }
        if token.is_some_and(CancelToken::is_cancelled) {
            return Err(WaitError::Cancelled);
        }
        polls = polls.saturating_add(1);
        if let PollLimit::Polls(max) = limit
            && polls >= max
        {
            return Err(WaitError::Timeout);
        }
        core::hint::spin_loop();
    }
}
