use core::{
    cell::UnsafeCell,
    marker::PhantomData,
    sync::atomic::{AtomicBool, Ordering},
};

use super::irq::{IrqControl, MaskGuard};

/// IRQ-safe spinlock.
///
/// Masks interrupts before taking the lock and restores the saved state when
/// the guard drops. Data shared between thread mode and an interrupt handler
/// goes behind one of these: while the main loop holds the guard, the handler
/// cannot preempt it and spin forever on the same lock.
///
/// Not fair. Not reentrant.
pub struct IrqSpinLock<T, I: IrqControl> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
    _irq: PhantomData<I>,
}

unsafe impl<T: Send, I: IrqControl> Send for IrqSpinLock<T, I> {}
unsafe impl<T: Send, I: IrqControl> Sync for IrqSpinLock<T, I> {}

impl<T, I: IrqControl> IrqSpinLock<T, I> {
    /// Create a new IRQ-safe spinlock.
    pub const fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
            _irq: PhantomData,
        }
    }

    /// Acquire the lock with interrupts disabled.
    pub fn lock(&self) -> IrqSpinLockGuard<'_, T, I> {
        let mask = I::mask();

        while self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }

        IrqSpinLockGuard { lock: self, _mask: mask }
    }

    /// Acquire the lock only if it is free right now.
    ///
    /// Interrupts are left untouched when the lock is contended.
    pub fn try_lock(&self) -> Option<IrqSpinLockGuard<'_, T, I>> {
        let mask = I::mask();

        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| IrqSpinLockGuard { lock: self, _mask: mask })
    }

    /// Run `f` on the protected data inside a critical section.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }
}

/// Guard returned by `IrqSpinLock::lock`.
///
/// Restores interrupt state on drop.
pub struct IrqSpinLockGuard<'a, T, I: IrqControl> {
    lock: &'a IrqSpinLock<T, I>,
    _mask: MaskGuard<I>,
}

impl<T, I: IrqControl> core::ops::Deref for IrqSpinLockGuard<'_, T, I> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*self.lock.data.get() }
    }
}

impl<T, I: IrqControl> core::ops::DerefMut for IrqSpinLockGuard<'_, T, I> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T, I: IrqControl> Drop for IrqSpinLockGuard<'_, T, I> {
    fn drop(&mut self) {
        // `_mask` drops after this, so a pending handler finds the lock free.
        self.lock.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicU32;

    static MASKED: AtomicU32 = AtomicU32::new(0);

    /// Counts nesting depth instead of touching real interrupt state.
    struct CountingIrq;

    impl IrqControl for CountingIrq {
        type State = u32;

        fn disable() -> u32 {
            MASKED.fetch_add(1, Ordering::SeqCst)
        }

        fn restore(state: u32) {
            MASKED.store(state, Ordering::SeqCst);
        }
    }

    #[test]
    fn guard_masks_and_restores() {
        let lock: IrqSpinLock<u32, CountingIrq> = IrqSpinLock::new(7);
        let before = MASKED.load(Ordering::SeqCst);
        {
            let mut guard = lock.lock();
            assert_eq!(MASKED.load(Ordering::SeqCst), before + 1);
            *guard += 1;
            assert!(lock.try_lock().is_none());
            assert_eq!(MASKED.load(Ordering::SeqCst), before + 1);
        }
        assert_eq!(MASKED.load(Ordering::SeqCst), before);
        assert_eq!(lock.with(|value| *value), 8);
    }

    #[test]
    fn try_lock_succeeds_when_free() {
        let lock: IrqSpinLock<[u8; 4], crate::arch::PlatformIrq> = IrqSpinLock::new([0; 4]);
        if let Some(mut guard) = lock.try_lock() {
            guard[2] = 9;
        } else {
            panic!("uncontended lock refused");
        }
        assert_eq!(lock.with(|data| data[2]), 9);
    }
}
