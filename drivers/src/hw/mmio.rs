use core::ptr::{read_volatile, write_volatile};

/// Word-wide access to one peripheral's register block.
///
/// Offsets are byte offsets from the block base, exactly as listed in the
/// reference manual. Drivers only touch hardware through this trait so the
/// same driver runs against [`Mmio`] on target and a simulated block in tests.
pub trait RegisterBus {
    /// Read the register at `offset`.
    fn read(&self, offset: usize) -> u32;

    /// Write `value` to the register at `offset`.
    fn write(&self, offset: usize, value: u32);

    /// Read-modify-write.
    ///
    /// Never use this on write-1-to-clear registers: writing back what was
    /// read clears every flag that happened to be set.
    fn modify(&self, offset: usize, f: impl FnOnce(u32) -> u32) {
        let value = self.read(offset);
        self.write(offset, f(value));
    }

    fn set_bits(&self, offset: usize, mask: u32) {
        self.modify(offset, |value| value | mask);
    }

    fn clear_bits(&self, offset: usize, mask: u32) {
        self.modify(offset, |value| value & !mask);
    }

    /// Replace the `width`-bit field at `shift` with `field`.
    fn write_field(&self, offset: usize, shift: u32, width: u32, field: u32) {
        let mask = ((1u32 << width) - 1) << shift;
        self.modify(offset, |value| (value & !mask) | ((field << shift) & mask));
    }

    fn read_field(&self, offset: usize, shift: u32, width: u32) -> u32 {
        (self.read(offset) >> shift) & ((1u32 << width) - 1)
    }

    fn is_set(&self, offset: usize, mask: u32) -> bool {
        self.read(offset) & mask != 0
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &T {
    #[inline]
    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    #[inline]
    fn write(&self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }
}

/// Memory-mapped register block at a fixed physical address.
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// # Safety
    /// `base` must be the start of a peripheral register block that stays
    /// mapped for the life of the value, and the caller must not create
    /// aliases that break the driver's assumptions about exclusive use.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterBus for Mmio {
    #[inline]
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `new` requires `base` to be a mapped register block.
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write(&self, offset: usize, value: u32) {
        // SAFETY: `new` requires `base` to be a mapped register block.
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }
}
