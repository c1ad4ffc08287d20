use core::cell::Cell;

use crate::hal::gpio::PinLevel;
use crate::hw::mmio::RegisterBus;
use crate::hw::stm32f4::gpio::*;

use super::SimRegisters;

/// One GPIO port.
///
/// IDR is computed on read: output pins read back ODR, input pins read
/// whatever the test drives on them, falling back to their pull resistor.
pub struct SimGpio {
    regs: SimRegisters<10>,
    driven: Cell<u16>,
    levels: Cell<u16>,
    bsrr_writes: Cell<u32>,
}

impl SimGpio {
    pub fn new() -> Self {
        Self {
            regs: SimRegisters::new(),
            driven: Cell::new(0),
            levels: Cell::new(0),
            bsrr_writes: Cell::new(0),
        }
    }

    /// Drive `index` externally.
    pub fn drive(&self, index: u8, level: PinLevel) {
        let bit = 1u16 << index;
        self.driven.set(self.driven.get() | bit);
        if bool::from(level) {
            self.levels.set(self.levels.get() | bit);
        } else {
            self.levels.set(self.levels.get() & !bit);
        }
    }

    /// Stop driving `index`; it floats to its pull.
    pub fn release(&self, index: u8) {
        self.driven.set(self.driven.get() & !(1u16 << index));
    }

    pub fn odr(&self) -> u16 {
        self.regs.peek(ODR) as u16
    }

    /// MODER field of `index`.
    pub fn mode(&self, index: u8) -> u32 {
        self.regs.read_field(MODER, u32::from(index) * 2, 2)
    }

    /// PUPDR field of `index`.
    pub fn pull(&self, index: u8) -> u32 {
        self.regs.read_field(PUPDR, u32::from(index) * 2, 2)
    }

    pub fn bsrr_writes(&self) -> u32 {
        self.bsrr_writes.get()
    }

    fn sample(&self) -> u32 {
        let odr = self.regs.peek(ODR);
        (0..PINS_PER_PORT).fold(0, |idr, index| {
            let bit = 1u32 << index;
            let high = if self.mode(index) == MODE_OUTPUT {
                odr & bit != 0
            } else if self.driven.get() & (bit as u16) != 0 {
                self.levels.get() & (bit as u16) != 0
            } else {
                self.pull(index) == PULL_UP
            };
            if high { idr | bit } else { idr }
        })
    }
}

impl Default for SimGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimGpio {
    fn read(&self, offset: usize) -> u32 {
        match offset {
            IDR => self.sample(),
            BSRR => 0,
            _ => self.regs.peek(offset),
        }
    }

    fn write(&self, offset: usize, value: u32) {
        match offset {
            IDR => {}
            BSRR => {
                let set = value & 0xFFFF;
                let reset = value >> 16;
                let odr = (self.regs.peek(ODR) & !reset) | set;
                self.regs.poke(ODR, odr);
                self.bsrr_writes.set(self.bsrr_writes.get() + 1);
            }
            ODR => self.regs.poke(ODR, value & 0xFFFF),
            _ => self.regs.poke(offset, value),
        }
    }
}
