use core::cell::Cell;

use crate::hw::mmio::RegisterBus;
use crate::hw::stm32f4::tim::*;

use super::SimRegisters;

/// TIM10-style up-counter.
///
/// Each read of SR while CEN is set advances the counter by one tick.
/// PSC and ARR are preloaded the way the hardware does it: PSC always,
/// ARR when ARPE is set, both land in the active copy on an update event.
pub struct SimTimer {
    regs: SimRegisters<12>,
    psc_active: Cell<u32>,
    arr_active: Cell<u32>,
    elapsed_ticks: Cell<u64>,
    elapsed_cycles: Cell<u64>,
    update_events: Cell<u32>,
    stalled: Cell<bool>,
}

impl SimTimer {
    pub fn new() -> Self {
        let regs = SimRegisters::new();
        regs.poke(ARR, ARR_MAX);
        Self {
            regs,
            psc_active: Cell::new(0),
            arr_active: Cell::new(ARR_MAX),
            elapsed_ticks: Cell::new(0),
            elapsed_cycles: Cell::new(0),
            update_events: Cell::new(0),
            stalled: Cell::new(false),
        }
    }

    /// Counter ticks that have passed while enabled.
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks.get()
    }

    /// Input clock cycles behind [`elapsed_ticks`](Self::elapsed_ticks).
    pub fn elapsed_cycles(&self) -> u64 {
        self.elapsed_cycles.get()
    }

    /// Overflows that raised UIF.
    pub fn update_events(&self) -> u32 {
        self.update_events.get()
    }

    /// Freeze the counter, as if the timer's clock were gated off.
    pub fn stall(&self, stalled: bool) {
        self.stalled.set(stalled);
    }

    fn reload_shadows(&self) {
        self.psc_active.set(self.regs.peek(PSC));
        self.arr_active.set(self.regs.peek(ARR));
    }

    fn tick(&self) {
        let cr1 = self.regs.peek(CR1);
        if cr1 & CR1_CEN == 0 || self.stalled.get() {
            return;
        }

        self.elapsed_ticks.set(self.elapsed_ticks.get() + 1);
        self.elapsed_cycles
            .set(self.elapsed_cycles.get() + u64::from(self.psc_active.get()) + 1);

        let cnt = self.regs.peek(CNT);
        if cnt < self.arr_active.get() {
            self.regs.poke(CNT, cnt + 1);
            return;
        }

        self.regs.poke(CNT, 0);
        if cr1 & CR1_UDIS == 0 {
            self.reload_shadows();
            self.regs.poke(SR, self.regs.peek(SR) | SR_UIF);
            self.update_events.set(self.update_events.get() + 1);
        }
    }
}

impl Default for SimTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimTimer {
    fn read(&self, offset: usize) -> u32 {
        if offset == SR {
            self.tick();
        }
        self.regs.peek(offset)
    }

    fn write(&self, offset: usize, value: u32) {
        match offset {
            // rc_w0
            SR => self.regs.poke(SR, self.regs.peek(SR) & value),
            EGR => {
                if value & EGR_UG != 0 {
                    self.regs.poke(CNT, 0);
                    self.reload_shadows();
                    if self.regs.peek(CR1) & CR1_URS == 0 {
                        self.regs.poke(SR, self.regs.peek(SR) | SR_UIF);
                    }
                }
            }
            ARR => {
                self.regs.poke(ARR, value & ARR_MAX);
                if self.regs.peek(CR1) & CR1_ARPE == 0 {
                    self.arr_active.set(value & ARR_MAX);
                }
            }
            PSC => self.regs.poke(PSC, value & 0xFFFF),
            _ => self.regs.poke(offset, value),
        }
    }
}
