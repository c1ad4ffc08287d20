//! STM32F4 Peripheral Driver Subsystem
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent trait definitions
//! - [`platform`]: Chip-level drivers implementing the HAL traits
//! - [`hw`]: Register maps and the [`RegisterBus`] access seam
//! - [`wait`]: Bounded, cancellable polling shared by every busy-wait
//! - `sim`: Register-level models of the peripherals (tests and the `sim` feature)
//!
//! Drivers never dereference an address themselves. They talk to a
//! [`RegisterBus`]: on target that is [`Mmio`], in tests it is one of the
//! `sim` models, so the same driver code is exercised in both places.
//!
//! # Usage Example
//!
//! ```no_run
//! use drivers::hal::timer::{Delay, UpdateTimer};
//! use drivers::hw::{mmio::Mmio, stm32f4::TIM10_BASE};
//! use drivers::platform::stm32f4::{Stm32Timer, TimerConfig};
//!
//! let regs = unsafe { Mmio::new(TIM10_BASE) };
//! let mut timer = Stm32Timer::new(regs, TimerConfig::new(999, 25_000_000));
//! timer.configure()?;
//! timer.wait_ticks(12_500)?;
//! # Ok::<(), drivers::platform::stm32f4::TimerError>(())
//! ```

#![cfg_attr(not(test), no_std)]

pub mod hal;
pub mod hw;
pub mod platform;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod wait;

// Re-export commonly used types
pub use hal::exti::{Edge, ExternalInterrupts};
pub use hal::gpio::{GpioController, PinLevel};
pub use hal::interrupt::InterruptController;
pub use hal::timer::{Delay, UpdateTimer};
pub use hw::mmio::{Mmio, RegisterBus};
