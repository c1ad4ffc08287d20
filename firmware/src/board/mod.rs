//! Board Support
//!
//! Glue between the host-testable library and the real chip: platform
//! bring-up, the EXTI dispatch table the vector-table entries service,
//! and a busy-loop delay for work done inside interrupt handlers.
//!
//! Only built with the `rt` feature.

mod logger;

use core::convert::Infallible;

use drivers::hal::clock::ClockControl;
use drivers::hal::exti::LineNumber;
use drivers::hal::timer::{Delay, UpdateTimer};
use drivers::hw::mmio::Mmio;
use drivers::platform::Platform;
use drivers::platform::stm32f4::{
    ClockError, ExtiError, GpioError, LineGroup, PeripheralClock, PeripheralRegisters, PlatformError,
    Stm32Exti, Stm32Gpio, Stm32Timer, Stm32f4Platform, TimerError,
};
use log::warn;

use crate::action::{self, ActionError, InterruptBinding, SetupError};
use crate::config::{BOARD_CLOCKS, TIMER_CONFIG};
use crate::irq::{LineAction, LineDispatcher};
use crate::pwm::PwmError;

pub type BoardGpio = Stm32Gpio<&'static Mmio>;
pub type BoardExti = Stm32Exti<&'static Mmio, &'static Mmio, &'static Mmio>;
pub type BoardTimer = Stm32Timer<&'static Mmio>;

/// Actions for every EXTI line, serviced by [`service`].
pub static DISPATCHER: LineDispatcher = LineDispatcher::new();

/// Anything a demo's main loop can fail with.
#[derive(Debug)]
pub enum Error {
    Platform(PlatformError),
    Clock(ClockError),
    Gpio(GpioError),
    Timer(TimerError),
    Setup(SetupError<GpioError, ExtiError>),
    Action(ActionError<GpioError, TimerError>),
    Pwm(PwmError<GpioError, TimerError>),
}

impl From<PlatformError> for Error {
    fn from(err: PlatformError) -> Self {
        Error::Platform(err)
    }
}

impl From<ClockError> for Error {
    fn from(err: ClockError) -> Self {
        Error::Clock(err)
    }
}

impl From<GpioError> for Error {
    fn from(err: GpioError) -> Self {
        Error::Gpio(err)
    }
}

impl From<TimerError> for Error {
    fn from(err: TimerError) -> Self {
        Error::Timer(err)
    }
}

impl From<SetupError<GpioError, ExtiError>> for Error {
    fn from(err: SetupError<GpioError, ExtiError>) -> Self {
        Error::Setup(err)
    }
}

impl From<ActionError<GpioError, TimerError>> for Error {
    fn from(err: ActionError<GpioError, TimerError>) -> Self {
        Error::Action(err)
    }
}

impl From<PwmError<GpioError, TimerError>> for Error {
    fn from(err: PwmError<GpioError, TimerError>) -> Self {
        Error::Pwm(err)
    }
}

// ============================================================================
// Bring-up
// ============================================================================

/// Logging, clocks, register blocks. Call first thing in `main`.
pub fn init() -> Result<&'static PeripheralRegisters, Error> {
    logger::init();
    // SAFETY: called once from `main` before any interrupt is unmasked.
    let regs = unsafe { Stm32f4Platform::init(&BOARD_CLOCKS) }?;
    Ok(regs)
}

/// Gate on the bus clocks for `clocks`.
pub fn enable_clocks(
    regs: &'static PeripheralRegisters,
    clocks: impl IntoIterator<Item = PeripheralClock>,
) -> Result<(), Error> {
    let mut rcc = regs.rcc();
    for clock in clocks {
        rcc.enable_peripheral_clock(clock)?;
    }
    Ok(())
}

/// TIM10 clocked, configured and ready for delay sessions.
pub fn main_timer(regs: &'static PeripheralRegisters) -> Result<BoardTimer, Error> {
    enable_clocks(regs, [PeripheralClock::Tim10])?;
    let mut timer = regs.tim10(TIMER_CONFIG);
    timer.configure()?;
    Ok(timer)
}

/// Make every binding live, each serving its own line.
pub fn install(
    regs: &'static PeripheralRegisters,
    bindings: &'static [InterruptBinding],
) -> Result<(), Error> {
    let mut gpio = regs.gpio();
    let mut exti = regs.exti();

    for binding in bindings {
        let ports = core::iter::once(binding.source)
            .chain(binding.action.outputs().iter().copied())
            .map(|pin| PeripheralClock::Gpio(pin.port));
        enable_clocks(regs, ports)?;
        action::install(binding, binding, &mut gpio, &mut exti, &DISPATCHER)?;
    }
    Ok(())
}

/// Body of every EXTI vector-table entry.
pub fn service(group: LineGroup) {
    let Some(regs) = Stm32f4Platform::registers() else {
        return;
    };
    let mut exti = regs.exti();
    if let Err(err) = DISPATCHER.dispatch(group, &mut exti) {
        warn!("{:?}: {:?}", group, err);
    }
}

/// Log `err` and stop.
pub fn halt(err: Error) -> ! {
    defmt::error!("halted: {}", defmt::Debug2Format(&err));
    park()
}

pub fn park() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

// ============================================================================
// Handler Context
// ============================================================================

/// Millisecond busy loop on the core clock.
///
/// Actions run inside interrupt handlers use this instead of TIM10, which
/// may be in the middle of a session started by the main loop.
pub struct SpinDelay;

impl SpinDelay {
    const CYCLES_PER_MS: u32 = BOARD_CLOCKS.sysclk_hz() / 1000;
}

impl Delay for SpinDelay {
    type Error = Infallible;

    fn wait_ticks(&mut self, period: u32) -> Result<(), Infallible> {
        for _ in 0..period {
            cortex_m::asm::delay(Self::CYCLES_PER_MS);
        }
        Ok(())
    }

    fn tick_hz(&self) -> u32 {
        1_000
    }
}

impl LineAction for InterruptBinding {
    fn on_edge(&self, line: LineNumber) {
        let Some(regs) = Stm32f4Platform::registers() else {
            return;
        };
        let mut gpio = regs.gpio();
        if let Err(err) = self.action.run(&mut gpio, &mut SpinDelay) {
            warn!("EXTI{}: {:?}", line, err);
        }
    }
}
