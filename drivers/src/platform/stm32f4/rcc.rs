//! STM32F4 Reset and Clock Control Driver
//!
//! Brings the system clock onto HSI or HSE and gates peripheral bus clocks.
//! The PLL is left off.

use log::debug;

use super::gpio::Port;
use crate::hal::clock::ClockControl;
use crate::hw::mmio::RegisterBus;
use crate::hw::stm32f4::rcc::*;
use crate::wait::{PollLimit, wait_for};

/// Oscillator that drives SYSCLK.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClockSource {
    /// Internal 16 MHz RC oscillator.
    Hsi,
    /// External crystal.
    Hse,
}

/// System clock settings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    pub source: ClockSource,
    /// Crystal frequency, used when `source` is [`ClockSource::Hse`].
    pub hse_hz: u32,
    /// Bound on each ready/switch wait.
    pub limit: PollLimit,
}

impl ClockConfig {
    pub const HSI_HZ: u32 = 16_000_000;

    pub const fn hsi() -> Self {
        Self {
            source: ClockSource::Hsi,
            hse_hz: 0,
            limit: PollLimit::Unbounded,
        }
    }

    pub const fn hse(hse_hz: u32) -> Self {
        Self {
            source: ClockSource::Hse,
            hse_hz,
            limit: PollLimit::Unbounded,
        }
    }

    pub const fn with_limit(mut self, limit: PollLimit) -> Self {
        self.limit = limit;
        self
    }

    /// SYSCLK once this configuration is applied.
    pub const fn sysclk_hz(&self) -> u32 {
        match self.source {
            ClockSource::Hsi => Self::HSI_HZ,
            ClockSource::Hse => self.hse_hz,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::hsi()
    }
}

/// RCC errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The requested oscillator never reported ready.
    OscillatorNotReady(ClockSource),
    /// SWS never reflected the requested clock switch.
    SwitchFailed,
}

/// Peripherals whose bus clock can be gated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PeripheralClock {
    Gpio(Port),
    Syscfg,
    Tim9,
    Tim10,
    Tim11,
}

impl PeripheralClock {
    /// Enable register and bit for this peripheral.
    const fn enable_bit(self) -> (usize, u32) {
        match self {
            PeripheralClock::Gpio(port) => (
                AHB1ENR,
                match port {
                    Port::A => GPIOAEN,
                    Port::B => GPIOBEN,
                    Port::C => GPIOCEN,
                    Port::D => GPIODEN,
                    Port::E => GPIOEEN,
                    Port::H => GPIOHEN,
                },
            ),
            PeripheralClock::Syscfg => (APB2ENR, SYSCFGEN),
            PeripheralClock::Tim9 => (APB2ENR, TIM9EN),
            PeripheralClock::Tim10 => (APB2ENR, TIM10EN),
            PeripheralClock::Tim11 => (APB2ENR, TIM11EN),
        }
    }
}

/// RCC driver.
pub struct Stm32Rcc<B> {
    regs: B,
    sysclk_hz: u32,
}

impl<B: RegisterBus> Stm32Rcc<B> {
    /// Driver over the RCC block, assuming the reset clock (HSI).
    pub fn new(regs: B) -> Self {
        Self {
            regs,
            sysclk_hz: ClockConfig::HSI_HZ,
        }
    }

    /// Switch SYSCLK to the configured oscillator. Returns the new SYSCLK.
    pub fn apply(&mut self, config: &ClockConfig) -> Result<u32, ClockError> {
        let (on, ready, switch) = match config.source {
            ClockSource::Hsi => (CR_HSION, CR_HSIRDY, SW_HSI),
            ClockSource::Hse => (CR_HSEON, CR_HSERDY, SW_HSE),
        };

        self.regs.set_bits(CR, on);
        wait_for(|| self.regs.is_set(CR, ready), config.limit)
            .map_err(|_| ClockError::OscillatorNotReady(config.source))?;

        self.regs
            .write_field(CFGR, CFGR_SW_SHIFT, CFGR_SW_WIDTH, switch);
        wait_for(
            || self.regs.read_field(CFGR, CFGR_SWS_SHIFT, CFGR_SW_WIDTH) == switch,
            config.limit,
        )
        .map_err(|_| ClockError::SwitchFailed)?;

        self.sysclk_hz = config.sysclk_hz();
        debug!(
            "SYSCLK on {:?} at {} Hz",
            config.source, self.sysclk_hz
        );
        Ok(self.sysclk_hz)
    }
}

impl<B: RegisterBus> ClockControl for Stm32Rcc<B> {
    type Peripheral = PeripheralClock;
    type Error = ClockError;

    fn enable_peripheral_clock(&mut self, peripheral: PeripheralClock) -> Result<(), ClockError> {
        let (reg, bit) = peripheral.enable_bit();
        self.regs.set_bits(reg, bit);
        // Read back so the enable has reached the bus before the first access.
        let _ = self.regs.read(reg);
        Ok(())
    }

    fn disable_peripheral_clock(&mut self, peripheral: PeripheralClock) -> Result<(), ClockError> {
        let (reg, bit) = peripheral.enable_bit();
        self.regs.clear_bits(reg, bit);
        Ok(())
    }

    fn is_enabled(&self, peripheral: PeripheralClock) -> bool {
        let (reg, bit) = peripheral.enable_bit();
        self.regs.is_set(reg, bit)
    }

    fn sysclk_hz(&self) -> u32 {
        self.sysclk_hz
    }
}
