use crate::hal::interrupt::IrqNumber;
use crate::hw::mmio::RegisterBus;
use crate::hw::stm32f4::nvic::*;

use super::SimRegisters;

const WORDS: usize = IRQ_COUNT.div_ceil(32) as usize;

/// NVIC with set/clear register pairs over shared enable and pending state.
pub struct SimNvic {
    enabled: SimRegisters<WORDS>,
    pending: SimRegisters<WORDS>,
    active: SimRegisters<WORDS>,
    priority: SimRegisters<{ IRQ_COUNT.div_ceil(4) as usize }>,
}

impl SimNvic {
    pub fn new() -> Self {
        Self {
            enabled: SimRegisters::new(),
            pending: SimRegisters::new(),
            active: SimRegisters::new(),
            priority: SimRegisters::new(),
        }
    }

    pub fn enabled(&self, irq: IrqNumber) -> bool {
        self.enabled.peek((irq / 32) as usize * 4) & (1 << (irq % 32)) != 0
    }

    /// Raise `irq` as its peripheral would.
    pub fn raise(&self, irq: IrqNumber) {
        let word = (irq / 32) as usize * 4;
        self.pending
            .poke(word, self.pending.peek(word) | (1 << (irq % 32)));
    }
}

impl Default for SimNvic {
    fn default() -> Self {
        Self::new()
    }
}

/// Bank the offset falls in and the offset within it.
fn bank(offset: usize) -> (usize, usize) {
    let base = offset & !0x7F;
    (base, offset - base)
}

impl RegisterBus for SimNvic {
    fn read(&self, offset: usize) -> u32 {
        if offset >= IPR {
            return self.priority.peek(offset - IPR);
        }
        match bank(offset) {
            (ISER, word) | (ICER, word) => self.enabled.peek(word),
            (ISPR, word) | (ICPR, word) => self.pending.peek(word),
            (IABR, word) => self.active.peek(word),
            _ => 0,
        }
    }

    fn write(&self, offset: usize, value: u32) {
        if offset >= IPR {
            self.priority.poke(offset - IPR, value);
            return;
        }
        match bank(offset) {
            (ISER, word) => self.enabled.poke(word, self.enabled.peek(word) | value),
            (ICER, word) => self.enabled.poke(word, self.enabled.peek(word) & !value),
            (ISPR, word) => self.pending.poke(word, self.pending.peek(word) | value),
            (ICPR, word) => self.pending.poke(word, self.pending.peek(word) & !value),
            _ => {}
        }
    }
}
