//! STM32F4 Basic Timer Driver (TIM9/TIM10/TIM11)
//!
//! Used as a polled delay engine. A session loads PSC and ARR, forces an
//! update event so both land in their shadow registers immediately, starts
//! the counter and spins on UIF. With PSC = p and ARR = n one session lasts
//! `(p + 1) * (n + 1)` input clocks.

use log::trace;

use crate::hal::timer::{Delay, UpdateTimer};
use crate::hw::mmio::RegisterBus;
use crate::hw::stm32f4::tim::*;
use crate::wait::{PollLimit, WaitError};

/// Timer clocking and wait bounds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Value written to PSC; the counter ticks every `prescaler + 1` input clocks.
    pub prescaler: u16,
    /// Timer input clock in Hz.
    pub clock_hz: u32,
    /// Bound on the UIF poll of each session.
    pub limit: PollLimit,
}

impl TimerConfig {
    pub const fn new(prescaler: u16, clock_hz: u32) -> Self {
        Self {
            prescaler,
            clock_hz,
            limit: PollLimit::Unbounded,
        }
    }

    pub const fn with_limit(mut self, limit: PollLimit) -> Self {
        self.limit = limit;
        self
    }

    /// Counter frequency after the prescaler.
    pub const fn tick_hz(&self) -> u32 {
        self.clock_hz / (self.prescaler as u32 + 1)
    }
}

impl Default for TimerConfig {
    /// 25 kHz ticks from a 25 MHz clock.
    fn default() -> Self {
        Self::new(999, 25_000_000)
    }
}

/// Timer driver errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// Period does not fit the 16-bit auto-reload register.
    PeriodOutOfRange(u32),
    /// A session is already in progress on this timer.
    Busy,
    /// UIF did not come up within the configured poll limit.
    Timeout,
    /// The session was cancelled from another context.
    Cancelled,
}

impl From<WaitError> for TimerError {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::Timeout => TimerError::Timeout,
            WaitError::Cancelled => TimerError::Cancelled,
        }
    }
}

/// Polled delay driver for one TIM9/10/11 instance.
pub struct Stm32Timer<B> {
    regs: B,
    config: TimerConfig,
    armed: bool,
}

impl<B: RegisterBus> Stm32Timer<B> {
    pub fn new(regs: B, config: TimerConfig) -> Self {
        Self {
            regs,
            config,
            armed: false,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Whether a session is in progress.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Current counter value.
    pub fn counter(&self) -> u32 {
        self.regs.read(CNT)
    }

    pub fn release(self) -> B {
        self.regs
    }

    fn clear_uif(&self) {
        // rc_w0: writing 1 leaves the other flags untouched.
        self.regs.write(SR, !SR_UIF);
    }
}

impl<B: RegisterBus> UpdateTimer for Stm32Timer<B> {
    type Error = TimerError;

    fn configure(&mut self) -> Result<(), TimerError> {
        self.regs.modify(CR1, |cr1| {
            (cr1 & !(CR1_CEN | CR1_UDIS)) | CR1_URS | CR1_ARPE
        });
        self.regs.clear_bits(DIER, DIER_UIE);
        self.regs.write(CNT, 0);
        self.regs.write(SR, 0);
        self.armed = false;
        Ok(())
    }

    fn arm(&mut self, period: u32) -> Result<(), TimerError> {
        if self.armed {
            return Err(TimerError::Busy);
        }
        if period > ARR_MAX {
            return Err(TimerError::PeriodOutOfRange(period));
        }

        self.regs.write(PSC, u32::from(self.config.prescaler));
        self.regs.write(ARR, period);
        // Load the shadows and restart the count; with URS set this does
        // not raise UIF, the clear below drops anything stale.
        self.regs.write(EGR, EGR_UG);
        self.clear_uif();
        self.regs.set_bits(CR1, CR1_CEN);
        self.armed = true;

        trace!(
            "timer armed: psc={} arr={}",
            self.config.prescaler, period
        );
        Ok(())
    }

    fn update_pending(&self) -> bool {
        self.regs.is_set(SR, SR_UIF)
    }

    fn clear_update(&mut self) {
        self.clear_uif();
        self.armed = false;
    }

    fn disarm(&mut self) {
        self.regs.clear_bits(CR1, CR1_CEN);
        self.clear_uif();
        self.armed = false;
    }

    fn poll_limit(&self) -> PollLimit {
        self.config.limit
    }
}

impl<B: RegisterBus> Delay for Stm32Timer<B> {
    type Error = TimerError;

    fn wait_ticks(&mut self, period: u32) -> Result<(), TimerError> {
        self.run_session(period, None)
    }

    fn tick_hz(&self) -> u32 {
        self.config.tick_hz()
    }

    fn max_period(&self) -> u32 {
        ARR_MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimTimer;
    use crate::wait::CancelToken;

    fn timer(sim: &SimTimer) -> Stm32Timer<&SimTimer> {
        let mut timer = Stm32Timer::new(sim, TimerConfig::new(999, 25_000_000));
        timer.configure().unwrap();
        timer
    }

    #[test]
    fn configure_sets_known_state() {
        let sim = SimTimer::new();
        sim.write(CR1, CR1_UDIS | CR1_CEN);
        sim.write(DIER, DIER_UIE);
        let _timer = timer(&sim);

        let cr1 = sim.read(CR1);
        assert_eq!(cr1 & (CR1_CEN | CR1_UDIS), 0);
        assert_eq!(cr1 & (CR1_URS | CR1_ARPE), CR1_URS | CR1_ARPE);
        assert_eq!(sim.read(DIER) & DIER_UIE, 0);
        assert_eq!(sim.read(SR) & SR_UIF, 0);
    }

    #[test]
    fn wait_lasts_period_plus_one_ticks() {
        let sim = SimTimer::new();
        let mut timer = timer(&sim);

        timer.wait_ticks(12_500).unwrap();

        assert_eq!(sim.elapsed_ticks(), 12_501);
        assert_eq!(sim.elapsed_cycles(), 12_501 * 1_000);
        assert_eq!(sim.read(SR) & SR_UIF, 0);
        assert!(!timer.is_armed());
    }

    #[test]
    fn back_to_back_waits_each_take_full_period() {
        let sim = SimTimer::new();
        let mut timer = timer(&sim);

        timer.wait_ticks(12_500).unwrap();
        let first = sim.elapsed_ticks();
        timer.wait_ticks(12_500).unwrap();
        assert_eq!(sim.elapsed_ticks() - first, 12_501);
    }

    #[test]
    fn new_period_applies_to_the_session_that_loads_it() {
        let sim = SimTimer::new();
        let mut timer = timer(&sim);

        timer.wait_ticks(475).unwrap();
        let start = sim.elapsed_ticks();
        timer.wait_ticks(40).unwrap();
        assert_eq!(sim.elapsed_ticks() - start, 41);
    }

    #[test]
    fn zero_period_returns_without_touching_hardware() {
        let sim = SimTimer::new();
        let mut timer = timer(&sim);

        timer.wait_ticks(0).unwrap();
        assert_eq!(sim.elapsed_ticks(), 0);
        assert_eq!(sim.read(CR1) & CR1_CEN, 0);
    }

    #[test]
    fn period_must_fit_arr() {
        let sim = SimTimer::new();
        let mut timer = timer(&sim);

        assert_eq!(timer.wait_ticks(65_535), Ok(()));
        assert_eq!(
            timer.wait_ticks(65_536),
            Err(TimerError::PeriodOutOfRange(65_536))
        );
    }

    #[test]
    fn arming_twice_is_busy() {
        let sim = SimTimer::new();
        let mut timer = timer(&sim);

        timer.arm(100).unwrap();
        assert_eq!(timer.arm(100), Err(TimerError::Busy));
        timer.disarm();
        assert_eq!(timer.arm(100), Ok(()));
    }

    #[test]
    fn stalled_counter_times_out_and_disarms() {
        let sim = SimTimer::new();
        sim.stall(true);
        let mut timer = Stm32Timer::new(
            &sim,
            TimerConfig::new(999, 25_000_000).with_limit(PollLimit::Polls(50)),
        );
        timer.configure().unwrap();

        assert_eq!(timer.wait_ticks(10), Err(TimerError::Timeout));
        assert!(!timer.is_armed());
        assert_eq!(sim.read(CR1) & CR1_CEN, 0);
    }

    #[test]
    fn cancelled_session_stops_early() {
        let sim = SimTimer::new();
        let mut timer = timer(&sim);
        let token = CancelToken::new();
        token.cancel();

        assert_eq!(
            timer.wait_ticks_cancellable(1_000, &token),
            Err(TimerError::Cancelled)
        );
        assert!(sim.elapsed_ticks() < 1_001);

        token.reset();
        assert_eq!(timer.wait_ticks_cancellable(1_000, &token), Ok(()));
    }

    #[test]
    fn delay_ms_chunks_long_delays() {
        let sim = SimTimer::new();
        let mut timer = timer(&sim);

        // 25 kHz * 3 s = 75_000 ticks, more than one ARR load.
        timer.delay_ms(3_000).unwrap();
        assert_eq!(sim.update_events(), 2);
        assert_eq!(sim.elapsed_ticks(), 65_536 + 9_466);
    }
}
