//! Register-level hardware description.
//!
//! - [`mmio`]: the [`RegisterBus`](mmio::RegisterBus) seam every driver talks through
//! - [`stm32f4`]: base addresses, offsets and bit positions from RM0368

pub mod mmio;
pub mod stm32f4;
