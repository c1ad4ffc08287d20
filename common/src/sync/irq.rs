//! Interrupt masking.
//!
//! Thread mode and interrupt handlers share one core, so keeping a handler
//! out of a critical section means masking it. [`IrqControl`] is the
//! per-target mask switch; [`MaskGuard`] puts the previous mask back when it
//! leaves scope.

use core::fmt::Debug;
use core::marker::PhantomData;

/// Mask switch for the current target, see [`crate::arch::PlatformIrq`].
pub trait IrqControl: Sized {
    /// Mask as it was before a [`disable`](Self::disable).
    type State: Copy + Debug;

    /// Mask interrupts and return the previous mask.
    fn disable() -> Self::State;

    /// Put back a mask returned by [`disable`](Self::disable).
    ///
    /// Calls must unwind in reverse order of the matching `disable` calls,
    /// otherwise an outer section can be unmasked early.
    fn restore(state: Self::State);

    /// Mask interrupts until the returned guard drops.
    fn mask() -> MaskGuard<Self> {
        MaskGuard {
            state: Self::disable(),
            _irq: PhantomData,
        }
    }
}

/// Interrupts stay masked while this is alive.
#[must_use = "interrupts are unmasked again as soon as the guard drops"]
pub struct MaskGuard<I: IrqControl> {
    state: I::State,
    _irq: PhantomData<I>,
}

impl<I: IrqControl> Drop for MaskGuard<I> {
    fn drop(&mut self) {
        I::restore(self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    static DEPTH: AtomicU32 = AtomicU32::new(0);

    /// Mask state is the nesting depth.
    struct DepthIrq;

    impl IrqControl for DepthIrq {
        type State = u32;

        fn disable() -> u32 {
            DEPTH.fetch_add(1, Ordering::SeqCst)
        }

        fn restore(state: u32) {
            DEPTH.store(state, Ordering::SeqCst);
        }
    }

    #[test]
    fn nested_guards_unwind_in_order() {
        let outer = DepthIrq::mask();
        assert_eq!(DEPTH.load(Ordering::SeqCst), 1);
        {
            let _inner = DepthIrq::mask();
            assert_eq!(DEPTH.load(Ordering::SeqCst), 2);
        }
        assert_eq!(DEPTH.load(Ordering::SeqCst), 1);
        drop(outer);
        assert_eq!(DEPTH.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn host_mask_is_a_no_op() {
        let _guard = crate::arch::PlatformIrq::mask();
    }
}
