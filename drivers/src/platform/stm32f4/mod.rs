//! STM32F401/F411 platform.

mod exti;
mod gpio;
mod nvic;
mod rcc;
mod timer;

pub use exti::{ExtiError, LineGroup, Stm32Exti};
pub use gpio::{GpioError, PORT_COUNT, PinId, Port, Stm32Gpio};
pub use nvic::{NvicError, Stm32Nvic};
pub use rcc::{ClockConfig, ClockError, ClockSource, PeripheralClock, Stm32Rcc};
pub use timer::{Stm32Timer, TimerConfig, TimerError};

use log::info;
use spin::Once;

use super::Platform;
use crate::hal::clock::ClockControl;
use crate::hw::mmio::Mmio;
use crate::hw::stm32f4::{EXTI_BASE, NVIC_BASE, RCC_BASE, SYSCFG_BASE, TIM10_BASE};

pub struct Stm32f4Platform;

/// Platform bring-up errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlatformError {
    AlreadyInitialized,
    Clock(ClockError),
}

impl From<ClockError> for PlatformError {
    fn from(err: ClockError) -> Self {
        PlatformError::Clock(err)
    }
}

/// Every register block the drivers use, at its fixed address.
pub struct PeripheralRegisters {
    pub rcc: Mmio,
    pub gpio: [Mmio; PORT_COUNT],
    pub syscfg: Mmio,
    pub exti: Mmio,
    pub tim10: Mmio,
    pub nvic: Mmio,
}

impl PeripheralRegisters {
    /// # Safety
    /// Only valid on an STM32F401/F411.
    const unsafe fn new() -> Self {
        unsafe {
            Self {
                rcc: Mmio::new(RCC_BASE),
                gpio: [
                    Mmio::new(Port::A.base()),
                    Mmio::new(Port::B.base()),
                    Mmio::new(Port::C.base()),
                    Mmio::new(Port::D.base()),
                    Mmio::new(Port::E.base()),
                    Mmio::new(Port::H.base()),
                ],
                syscfg: Mmio::new(SYSCFG_BASE),
                exti: Mmio::new(EXTI_BASE),
                tim10: Mmio::new(TIM10_BASE),
                nvic: Mmio::new(NVIC_BASE),
            }
        }
    }

    pub fn rcc(&self) -> Stm32Rcc<&Mmio> {
        Stm32Rcc::new(&self.rcc)
    }

    pub fn gpio(&self) -> Stm32Gpio<&Mmio> {
        Stm32Gpio::new(self.gpio.each_ref())
    }

    pub fn exti(&self) -> Stm32Exti<&Mmio, &Mmio, &Mmio> {
        Stm32Exti::new(&self.syscfg, &self.exti, &self.nvic)
    }

    pub fn nvic(&self) -> Stm32Nvic<&Mmio> {
        Stm32Nvic::new(&self.nvic)
    }

    pub fn tim10(&self, config: TimerConfig) -> Stm32Timer<&Mmio> {
        Stm32Timer::new(&self.tim10, config)
    }
}

// ============================================================================
// Internal Platform State (not exposed)
// ============================================================================

static REGISTERS: Once<PeripheralRegisters> = Once::new();

impl Platform for Stm32f4Platform {
    type Registers = PeripheralRegisters;
    type ClockConfig = ClockConfig;
    type Error = PlatformError;

    fn name() -> &'static str {
        "STM32F401 (Cortex-M4F)"
    }

    unsafe fn init(config: &ClockConfig) -> Result<&'static PeripheralRegisters, PlatformError> {
        if REGISTERS.is_completed() {
            return Err(PlatformError::AlreadyInitialized);
        }
        let regs = REGISTERS.call_once(|| unsafe { PeripheralRegisters::new() });

        let mut rcc = regs.rcc();
        let sysclk = rcc.apply(config)?;
        // EXTI routing lives in SYSCFG; every binding needs it.
        rcc.enable_peripheral_clock(PeripheralClock::Syscfg)?;

        info!("{} up, SYSCLK {} Hz", Self::name(), sysclk);
        Ok(regs)
    }

    fn registers() -> Option<&'static PeripheralRegisters> {
        REGISTERS.get()
    }
}
