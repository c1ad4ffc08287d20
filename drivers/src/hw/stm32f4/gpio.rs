//! GPIO port registers (RM0368 §8.4). Every port has the same layout.

pub const MODER: usize = 0x00;
pub const OTYPER: usize = 0x04;
pub const OSPEEDR: usize = 0x08;
pub const PUPDR: usize = 0x0C;
pub const IDR: usize = 0x10;
pub const ODR: usize = 0x14;
/// Bit set/reset: low half sets, high half resets, set wins when both are written.
pub const BSRR: usize = 0x18;
pub const LCKR: usize = 0x1C;
pub const AFRL: usize = 0x20;
pub const AFRH: usize = 0x24;

pub const PINS_PER_PORT: u8 = 16;

pub const MODE_INPUT: u32 = 0b00;
pub const MODE_OUTPUT: u32 = 0b01;
pub const MODE_ALTERNATE: u32 = 0b10;
pub const MODE_ANALOG: u32 = 0b11;

pub const PULL_NONE: u32 = 0b00;
pub const PULL_UP: u32 = 0b01;
pub const PULL_DOWN: u32 = 0b10;
