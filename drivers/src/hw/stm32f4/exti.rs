//! External interrupt/event controller (RM0368 §10.3).

pub const IMR: usize = 0x00;
pub const EMR: usize = 0x04;
pub const RTSR: usize = 0x08;
pub const FTSR: usize = 0x0C;
pub const SWIER: usize = 0x10;
/// Pending register, write 1 to clear.
pub const PR: usize = 0x14;

/// Lines 0..=15 are routed from GPIO pins. Lines 16+ are internal sources.
pub const GPIO_LINE_COUNT: usize = 16;
