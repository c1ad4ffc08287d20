//! Demo firmware for an STM32F401 board.
//!
//! Everything here except [`board`] is hardware independent: it is written
//! against the `drivers` HAL traits and tested on the host with the
//! simulated peripherals. [`board`] wires it to the real chip and only
//! exists with the `rt` feature.
//!
//! - [`pwm`]: software PWM duty ramp on a GPIO pin
//! - [`irq`]: EXTI line dispatch table
//! - [`action`]: parameterized edge bindings and what they do when they fire
//! - [`patterns`]: LED column and matrix frames
//! - [`sensor`]: digital sensor mirrored onto an LED
//! - [`config`]: board constants and demo tables

#![cfg_attr(not(test), no_std)]

pub mod action;
#[cfg(feature = "rt")]
pub mod board;
pub mod config;
pub mod irq;
pub mod patterns;
pub mod pwm;
pub mod sensor;
