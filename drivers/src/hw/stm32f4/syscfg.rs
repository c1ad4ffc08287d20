//! System configuration controller (RM0368 §7).

pub const MEMRMP: usize = 0x00;
pub const PMC: usize = 0x04;
pub const EXTICR1: usize = 0x08;
pub const CMPCR: usize = 0x20;

/// Width of one port selector inside EXTICRx.
pub const EXTI_SELECTOR_BITS: u32 = 4;

/// EXTICRx register holding the selector for `line`.
pub const fn exticr(line: u8) -> usize {
    EXTICR1 + (line as usize / 4) * 4
}

/// Bit position of the selector for `line` inside its EXTICRx register.
pub const fn exticr_shift(line: u8) -> u32 {
    (line as u32 % 4) * EXTI_SELECTOR_BITS
}
