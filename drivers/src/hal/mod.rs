//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! Generic traits for the peripherals the firmware drives. Platform
//! drivers implement them; application code (PWM ramps, interrupt
//! actions, display patterns) is written against them only.
//!
//! # Design Principles
//!
//! - **Zero-cost abstractions**: Traits compile to direct register access
//! - **Type safety**: Pins, ports and errors are associated types
//! - **No platform leakage**: Traits must not reference platform-specific types
//!
//! # Available Interfaces
//!
//! - [`gpio`]: General Purpose Input/Output control
//! - [`timer`]: Tick-counted blocking delays and the update-flag timer behind them
//! - [`exti`]: Edge-triggered external interrupt lines
//! - [`interrupt`]: Interrupt controller management
//! - [`clock`]: Peripheral clock gating

pub mod clock;
pub mod exti;
pub mod gpio;
pub mod interrupt;
pub mod timer;
