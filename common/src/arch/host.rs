use crate::sync::irq::IrqControl;

/// No-op interrupt control for hosted builds.
///
/// Host builds have no interrupt context, so the lock in
/// [`IrqSpinLock`](crate::sync::IrqSpinLock) is the only exclusion needed.
pub struct HostIrq;

impl IrqControl for HostIrq {
    type State = ();

    #[inline(always)]
    fn disable() {}

    #[inline(always)]
    fn restore(_state: ()) {}
}
