use crate::hal::exti::{Edge, LineNumber};
use crate::hw::mmio::RegisterBus;
use crate::hw::stm32f4::exti::*;
use crate::hw::stm32f4::syscfg::{EXTI_SELECTOR_BITS, exticr, exticr_shift};
use crate::platform::stm32f4::PinId;

use super::SimRegisters;

/// EXTI block with a write-1-to-clear pending register.
///
/// Edges are injected from the test side. An edge latches only when its
/// line is unmasked and armed for that direction, like on the chip.
pub struct SimExti {
    regs: SimRegisters<6>,
}

impl SimExti {
    pub fn new() -> Self {
        Self {
            regs: SimRegisters::new(),
        }
    }

    /// Deliver `edge` to `line`. Returns whether the line latched.
    pub fn inject_edge(&self, line: LineNumber, edge: Edge) -> bool {
        if usize::from(line) >= GPIO_LINE_COUNT {
            return false;
        }
        let bit = 1u32 << line;
        if self.regs.peek(IMR) & bit == 0 {
            return false;
        }

        let rising = edge.contains(Edge::RISING) && self.regs.peek(RTSR) & bit != 0;
        let falling = edge.contains(Edge::FALLING) && self.regs.peek(FTSR) & bit != 0;
        if rising || falling {
            self.regs.poke(PR, self.regs.peek(PR) | bit);
        }
        rising || falling
    }

    /// Deliver `edge` on a physical pin. Only reaches the line if SYSCFG
    /// currently routes that pin's port to it.
    pub fn inject_pin_edge(&self, syscfg: &impl RegisterBus, pin: PinId, edge: Edge) -> bool {
        if usize::from(pin.index) >= GPIO_LINE_COUNT {
            return false;
        }
        let routed = syscfg.read_field(
            exticr(pin.index),
            exticr_shift(pin.index),
            EXTI_SELECTOR_BITS,
        );
        routed == pin.port.exti_code() && self.inject_edge(pin.index, edge)
    }

    /// Raw PR contents.
    pub fn pending(&self) -> u32 {
        self.regs.peek(PR)
    }
}

impl Default for SimExti {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimExti {
    fn read(&self, offset: usize) -> u32 {
        match offset {
            // SWIER bits read back until the matching PR bit is cleared.
            SWIER => self.regs.peek(SWIER) & self.regs.peek(PR),
            _ => self.regs.peek(offset),
        }
    }

    fn write(&self, offset: usize, value: u32) {
        match offset {
            PR => self.regs.poke(PR, self.regs.peek(PR) & !value),
            SWIER => {
                let latched = value & self.regs.peek(IMR);
                self.regs.poke(SWIER, self.regs.peek(SWIER) | value);
                self.regs.poke(PR, self.regs.peek(PR) | latched);
            }
            _ => self.regs.poke(offset, value),
        }
    }
}
