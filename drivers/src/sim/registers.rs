use core::cell::Cell;

use log::warn;

use crate::hw::mmio::RegisterBus;

/// Plain read/write register file with `N` words and no side effects.
pub struct SimRegisters<const N: usize> {
    words: [Cell<u32>; N],
}

impl<const N: usize> SimRegisters<N> {
    pub fn new() -> Self {
        Self {
            words: core::array::from_fn(|_| Cell::new(0)),
        }
    }

    fn slot(offset: usize) -> Option<usize> {
        (offset % 4 == 0 && offset / 4 < N).then_some(offset / 4)
    }

    pub(crate) fn peek(&self, offset: usize) -> u32 {
        match Self::slot(offset) {
            Some(slot) => self.words[slot].get(),
            None => {
                warn!("sim: read of unmapped offset {:#x}", offset);
                0
            }
        }
    }

    pub(crate) fn poke(&self, offset: usize, value: u32) {
        match Self::slot(offset) {
            Some(slot) => self.words[slot].set(value),
            None => warn!("sim: write of unmapped offset {:#x}", offset),
        }
    }
}

impl<const N: usize> Default for SimRegisters<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RegisterBus for SimRegisters<N> {
    fn read(&self, offset: usize) -> u32 {
        self.peek(offset)
    }

    fn write(&self, offset: usize, value: u32) {
        self.poke(offset, value);
    }
}
