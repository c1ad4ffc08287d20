//! General-purpose timers TIM9/TIM10/TIM11 (RM0368 §14).
//!
//! TIM10 and TIM11 are 16-bit up-counters with a single update event; TIM9
//! shares the same layout for the registers used here.

pub const CR1: usize = 0x00;
pub const DIER: usize = 0x0C;
pub const SR: usize = 0x10;
pub const EGR: usize = 0x14;
pub const CNT: usize = 0x24;
pub const PSC: usize = 0x28;
pub const ARR: usize = 0x2C;

/// Counter enable.
pub const CR1_CEN: u32 = 1 << 0;
/// Update disable.
pub const CR1_UDIS: u32 = 1 << 1;
/// Update request source: only overflow raises UIF, not a UG write.
pub const CR1_URS: u32 = 1 << 2;
/// Auto-reload preload enable.
pub const CR1_ARPE: u32 = 1 << 7;

pub const DIER_UIE: u32 = 1 << 0;

/// Update interrupt flag, rc_w0: cleared by writing 0, writing 1 has no effect.
pub const SR_UIF: u32 = 1 << 0;

/// Update generation: reloads PSC/ARR shadows and resets the counter.
pub const EGR_UG: u32 = 1 << 0;

/// Widest value ARR can hold.
pub const ARR_MAX: u32 = 0xFFFF;
