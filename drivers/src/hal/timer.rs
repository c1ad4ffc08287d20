//! Timer Hardware Abstraction Layer.
//!
//! [`Delay`] is what application code blocks on. [`UpdateTimer`] is the
//! hardware shape behind it: an up-counter that raises a flag when it
//! reaches its reload value. A single wait on it (a *delay session*) is
//! arm, poll the flag, clear the flag.

use crate::wait::{CancelToken, PollLimit, wait_for, wait_for_cancellable};

/// Blocking delay measured in timer ticks.
pub trait Delay {
    /// Error type for delay operations.
    type Error: core::fmt::Debug;

    /// Block for `period` ticks.
    ///
    /// Returns immediately for `period == 0`. On return the timer's
    /// completion flag is clear, so back-to-back calls each wait their
    /// full period.
    fn wait_ticks(&mut self, period: u32) -> Result<(), Self::Error>;

    /// Tick frequency in Hz.
    fn tick_hz(&self) -> u32;

    /// Largest `period` accepted by one [`wait_ticks`](Self::wait_ticks) call.
    fn max_period(&self) -> u32 {
        u32::MAX
    }

    /// Block for roughly `ms` milliseconds, split into as many
    /// [`wait_ticks`](Self::wait_ticks) calls as the period limit needs.
    fn delay_ms(&mut self, ms: u32) -> Result<(), Self::Error> {
        let mut remaining = u64::from(ms) * u64::from(self.tick_hz()) / 1000;
        let chunk_max = u64::from(self.max_period().max(1));
        while remaining > 0 {
            let chunk = remaining.min(chunk_max);
            self.wait_ticks(chunk as u32)?;
            remaining -= chunk;
        }
        Ok(())
    }
}

/// Up-counting timer with an update (reload) flag.
///
/// Implementors provide the register steps; the provided
/// [`run_session`](Self::run_session) strings them into one delay session.
pub trait UpdateTimer {
    /// Error type for timer operations.
    type Error: core::fmt::Debug + From<crate::wait::WaitError>;

    /// Put the timer into a known stopped state: counting up, update
    /// events enabled, only counter overflow raising the flag, no
    /// interrupt requested, flag clear.
    fn configure(&mut self) -> Result<(), Self::Error>;

    /// Load `period` and start counting from zero with the flag clear.
    ///
    /// Fails if a session is already in progress or `period` does not fit.
    fn arm(&mut self, period: u32) -> Result<(), Self::Error>;

    /// True once the counter has reached the loaded period.
    fn update_pending(&self) -> bool;

    /// Clear the update flag, ending the session.
    fn clear_update(&mut self);

    /// Stop counting and abandon the current session.
    fn disarm(&mut self);

    /// How long [`run_session`](Self::run_session) polls before giving up.
    fn poll_limit(&self) -> PollLimit {
        PollLimit::Unbounded
    }

    /// One delay session: arm, wait for the flag, clear it.
    ///
    /// If the wait times out or `token` is cancelled the timer is disarmed
    /// so the next session starts clean.
    fn run_session(
        &mut self,
        period: u32,
        token: Option<&CancelToken>,
    ) -> Result<(), Self::Error> {
        if period == 0 {
            return Ok(());
        }

        self.arm(period)?;
        let limit = self.poll_limit();
        let outcome = match token {
            Some(token) => wait_for_cancellable(|| self.update_pending(), limit, token),
            None => wait_for(|| self.update_pending(), limit),
        };

        match outcome {
            Ok(()) => {
                self.clear_update();
                Ok(())
            }
            Err(err) => {
                self.disarm();
                Err(err.into())
            }
        }
    }

    /// [`Delay::wait_ticks`] that another context can abandon through `token`.
    fn wait_ticks_cancellable(
        &mut self,
        period: u32,
        token: &CancelToken,
    ) -> Result<(), Self::Error> {
        self.run_session(period, Some(token))
    }
}
