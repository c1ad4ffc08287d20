use core::cell::Cell;

use crate::hw::mmio::RegisterBus;
use crate::hw::stm32f4::rcc::*;

use super::SimRegisters;

/// RCC whose ready and switch-status bits follow their request bits.
///
/// [`fail_hse`](Self::fail_hse) models a missing crystal,
/// [`freeze_switch`](Self::freeze_switch) a clock switch that never lands.
pub struct SimRcc {
    regs: SimRegisters<18>,
    hsi_dead: Cell<bool>,
    hse_dead: Cell<bool>,
    switch_frozen: Cell<bool>,
}

impl SimRcc {
    pub fn new() -> Self {
        let regs = SimRegisters::new();
        // Reset state: HSI on and selected.
        regs.poke(CR, CR_HSION | CR_HSIRDY);
        Self {
            regs,
            hsi_dead: Cell::new(false),
            hse_dead: Cell::new(false),
            switch_frozen: Cell::new(false),
        }
    }

    /// A dead HSI keeps HSIRDY low on the next write to CR.
    pub fn fail_hsi(&self, dead: bool) {
        self.hsi_dead.set(dead);
    }

    pub fn fail_hse(&self, dead: bool) {
        self.hse_dead.set(dead);
    }

    pub fn freeze_switch(&self, frozen: bool) {
        self.switch_frozen.set(frozen);
    }
}

impl Default for SimRcc {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimRcc {
    fn read(&self, offset: usize) -> u32 {
        self.regs.peek(offset)
    }

    fn write(&self, offset: usize, value: u32) {
        match offset {
            CR => {
                let mut cr = value & !(CR_HSIRDY | CR_HSERDY);
                if value & CR_HSION != 0 && !self.hsi_dead.get() {
                    cr |= CR_HSIRDY;
                }
                if value & CR_HSEON != 0 && !self.hse_dead.get() {
                    cr |= CR_HSERDY;
                }
                self.regs.poke(CR, cr);
            }
            CFGR => {
                let sw = (value >> CFGR_SW_SHIFT) & 0b11;
                let sws = if self.switch_frozen.get() {
                    self.regs.read_field(CFGR, CFGR_SWS_SHIFT, CFGR_SW_WIDTH)
                } else {
                    sw
                };
                let cfgr = (value & !(0b11 << CFGR_SWS_SHIFT)) | (sws << CFGR_SWS_SHIFT);
                self.regs.poke(CFGR, cfgr);
            }
            _ => self.regs.poke(offset, value),
        }
    }
}
