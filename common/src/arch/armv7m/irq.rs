use cortex_m::register::primask;

use crate::sync::irq::IrqControl;

/// Interrupt control for ARMv7-M cores.
///
/// Masks every configurable-priority exception by setting PRIMASK.
///
/// # State Management
/// The `State` type is `bool`: `true` when interrupts were enabled
/// (PRIMASK clear) at the time [`disable`](IrqControl::disable) ran.
/// [`restore`](IrqControl::restore) only re-enables when that was the case, so
/// nested critical sections leave the outer one masked.
pub struct CortexMIrq;

impl IrqControl for CortexMIrq {
    type State = bool;

    #[inline(always)]
    fn disable() -> bool {
        let was_enabled = primask::read().is_active();
        cortex_m::interrupt::disable();
        was_enabled
    }

    #[inline(always)]
    fn restore(prev_enabled: bool) {
        if prev_enabled {
            // SAFETY: only reached when the matching `disable` found
            // interrupts enabled, so this cannot break an outer critical section.
            unsafe { cortex_m::interrupt::enable() };
        }
    }
}
