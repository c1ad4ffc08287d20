//! Nested vectored interrupt controller, offsets from 0xE000_E100.

pub const ISER: usize = 0x000;
pub const ICER: usize = 0x080;
pub const ISPR: usize = 0x100;
pub const ICPR: usize = 0x180;
pub const IABR: usize = 0x200;
pub const IPR: usize = 0x300;

/// Device interrupt positions implemented on F401/F411.
pub const IRQ_COUNT: u32 = 86;

/// STM32F4 implements the top four bits of each priority byte.
pub const PRIORITY_BITS: u32 = 4;
