//! STM32F401/F411 memory map.
//!
//! Addresses from RM0368 §2.3. Each submodule holds the register offsets and
//! bit positions for one peripheral, relative to that peripheral's base.

pub mod exti;
pub mod gpio;
pub mod irq_numbers;
pub mod nvic;
pub mod rcc;
pub mod syscfg;
pub mod tim;

// AHB1
pub const GPIOA_BASE: usize = 0x4002_0000;
pub const GPIOB_BASE: usize = 0x4002_0400;
pub const GPIOC_BASE: usize = 0x4002_0800;
pub const GPIOD_BASE: usize = 0x4002_0C00;
pub const GPIOE_BASE: usize = 0x4002_1000;
pub const GPIOH_BASE: usize = 0x4002_1C00;
pub const RCC_BASE: usize = 0x4002_3800;

// APB2
pub const SYSCFG_BASE: usize = 0x4001_3800;
pub const EXTI_BASE: usize = 0x4001_3C00;
pub const TIM9_BASE: usize = 0x4001_4000;
pub const TIM10_BASE: usize = 0x4001_4400;
pub const TIM11_BASE: usize = 0x4001_4800;

// Cortex-M4 private peripheral bus
pub const NVIC_BASE: usize = 0xE000_E100;
