//! Software PWM
//!
//! One PWM cycle is: pin high for `on_ticks`, pin low for `off_ticks`, both
//! timed by a blocking [`Delay`]. A [`DutyRamp`] walks `on_ticks` from the
//! floor to the ceiling and back while keeping the cycle length fixed, which
//! fades an LED up and down.

use drivers::hal::gpio::OutputPin;
use drivers::hal::timer::Delay;
use log::trace;

/// What happens when the ramp gets back down to the floor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RampMode {
    /// Start climbing again.
    Looping,
    /// Stop after one full up-and-down pass.
    OneShot,
}

/// Direction the duty cycle is moving.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RampState {
    RampUp,
    RampDown,
}

/// Ramp profile, all values in timer ticks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RampConfig {
    pub floor: u32,
    pub ceiling: u32,
    pub step: u32,
    /// Length of one PWM cycle; `off_ticks = period - on_ticks`.
    pub period: u32,
    pub mode: RampMode,
}

/// Why a [`RampConfig`] was rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RampError {
    ZeroStep,
    /// `floor` is not below `ceiling`.
    EmptyRange,
    /// `ceiling` leaves no off time.
    CeilingAbovePeriod,
    /// `period` is longer than one wait of the delay driving the ramp.
    PeriodExceedsDelay,
}

impl RampConfig {
    pub const fn new(floor: u32, ceiling: u32, step: u32, period: u32) -> Self {
        Self {
            floor,
            ceiling,
            step,
            period,
            mode: RampMode::Looping,
        }
    }

    pub const fn with_mode(mut self, mode: RampMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), RampError> {
        if self.step == 0 {
            return Err(RampError::ZeroStep);
        }
        if self.floor >= self.ceiling {
            return Err(RampError::EmptyRange);
        }
        if self.ceiling > self.period {
            return Err(RampError::CeilingAbovePeriod);
        }
        Ok(())
    }
}

/// Timing of one PWM cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DutyStep {
    pub on_ticks: u32,
    pub off_ticks: u32,
}

/// Iterator over the duty steps of a ramp.
///
/// Starts climbing from the floor. The ceiling and the floor are each
/// produced once per pass; a step that would overshoot the ceiling is
/// clamped to it.
#[derive(Debug, Clone)]
pub struct DutyRamp {
    config: RampConfig,
    on_ticks: u32,
    state: RampState,
    passes: u32,
    finished: bool,
}

impl DutyRamp {
    pub fn new(config: RampConfig) -> Result<Self, RampError> {
        config.validate()?;
        Ok(Self {
            config,
            on_ticks: config.floor,
            state: RampState::RampUp,
            passes: 0,
            finished: false,
        })
    }

    pub fn state(&self) -> RampState {
        self.state
    }

    /// Up-and-down passes completed so far.
    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn config(&self) -> &RampConfig {
        &self.config
    }

    fn advance(&mut self) {
        let RampConfig {
            floor,
            ceiling,
            step,
            ..
        } = self.config;

        match self.state {
            RampState::RampUp => {
                self.on_ticks = self.on_ticks.saturating_add(step).min(ceiling);
                if self.on_ticks == ceiling {
                    self.state = RampState::RampDown;
                }
            }
            RampState::RampDown => {
                self.on_ticks = self.on_ticks.saturating_sub(step).max(floor);
                if self.on_ticks == floor {
                    self.state = RampState::RampUp;
                    self.passes += 1;
                }
            }
        }
    }
}

impl Iterator for DutyRamp {
    type Item = DutyStep;

    fn next(&mut self) -> Option<DutyStep> {
        if self.finished {
            return None;
        }

        let step = DutyStep {
            on_ticks: self.on_ticks,
            off_ticks: self.config.period - self.on_ticks,
        };

        if self.config.mode == RampMode::OneShot && self.passes > 0 {
            self.finished = true;
        } else {
            self.advance();
        }
        Some(step)
    }
}

/// Software PWM errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PwmError<P, D> {
    InvalidRamp(RampError),
    Pin(P),
    Delay(D),
}

/// PWM on any output pin, timed by any delay.
pub struct SoftPwm<O, D> {
    pin: O,
    delay: D,
    ramp: DutyRamp,
}

impl<O: OutputPin, D: Delay> SoftPwm<O, D> {
    /// Fails before touching the pin if the profile is invalid or any
    /// phase of a cycle could not be timed by a single wait.
    pub fn new(pin: O, delay: D, config: RampConfig) -> Result<Self, PwmError<O::Error, D::Error>> {
        let ramp = DutyRamp::new(config).map_err(PwmError::InvalidRamp)?;
        if config.period > delay.max_period() {
            return Err(PwmError::InvalidRamp(RampError::PeriodExceedsDelay));
        }
        Ok(Self { pin, delay, ramp })
    }

    /// Run one PWM cycle with explicit timing.
    ///
    /// The pin is low whenever this returns, error or not, unless the pin
    /// itself failed.
    pub fn cycle(&mut self, step: DutyStep) -> Result<(), PwmError<O::Error, D::Error>> {
        self.pin.set_high().map_err(PwmError::Pin)?;
        if let Err(err) = self.delay.wait_ticks(step.on_ticks) {
            self.pin.set_low().map_err(PwmError::Pin)?;
            return Err(PwmError::Delay(err));
        }
        self.pin.set_low().map_err(PwmError::Pin)?;
        self.delay
            .wait_ticks(step.off_ticks)
            .map_err(PwmError::Delay)
    }

    /// Run the next cycle of the ramp. `None` once a one-shot ramp is done.
    pub fn step(&mut self) -> Result<Option<DutyStep>, PwmError<O::Error, D::Error>> {
        let Some(step) = self.ramp.next() else {
            return Ok(None);
        };
        trace!("pwm {:?} on={} off={}", self.ramp.state(), step.on_ticks, step.off_ticks);
        self.cycle(step)?;
        Ok(Some(step))
    }

    /// Drive the ramp until it ends. A looping ramp only returns on error.
    pub fn run(&mut self) -> Result<(), PwmError<O::Error, D::Error>> {
        while self.step()?.is_some() {}
        Ok(())
    }

    pub fn ramp(&self) -> &DutyRamp {
        &self.ramp
    }

    pub fn release(self) -> (O, D) {
        (self.pin, self.delay)
    }
}
