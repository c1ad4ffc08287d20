//! Cortex-M4 NVIC Driver

use crate::hal::interrupt::{InterruptController, IrqNumber, Priority, PriorityInterruptController};
use crate::hw::mmio::RegisterBus;
use crate::hw::stm32f4::nvic::*;

/// NVIC errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NvicError {
    /// No such device interrupt on this chip.
    InvalidIrq(IrqNumber),
    /// Priority outside the implemented 0..=15.
    InvalidPriority(Priority),
}

/// Register word offset and bit for `irq` in the 32-per-word bitmaps.
fn locate(irq: IrqNumber) -> Result<(usize, u32), NvicError> {
    if irq >= IRQ_COUNT {
        return Err(NvicError::InvalidIrq(irq));
    }
    Ok(((irq / 32) as usize * 4, 1 << (irq % 32)))
}

/// NVIC driver.
pub struct Stm32Nvic<B> {
    regs: B,
}

impl<B: RegisterBus> Stm32Nvic<B> {
    pub fn new(regs: B) -> Self {
        Self { regs }
    }

    /// Mark `irq` pending from software.
    pub fn set_pending(&mut self, irq: IrqNumber) -> Result<(), NvicError> {
        let (word, bit) = locate(irq)?;
        self.regs.write(ISPR + word, bit);
        Ok(())
    }
}

impl<B: RegisterBus> InterruptController for Stm32Nvic<B> {
    type Error = NvicError;

    fn enable(&mut self, irq: IrqNumber) -> Result<(), NvicError> {
        let (word, bit) = locate(irq)?;
        // Set/clear-enable registers ignore zero bits, plain writes suffice.
        self.regs.write(ISER + word, bit);
        Ok(())
    }

    fn disable(&mut self, irq: IrqNumber) -> Result<(), NvicError> {
        let (word, bit) = locate(irq)?;
        self.regs.write(ICER + word, bit);
        Ok(())
    }

    fn is_enabled(&self, irq: IrqNumber) -> Result<bool, NvicError> {
        let (word, bit) = locate(irq)?;
        Ok(self.regs.is_set(ISER + word, bit))
    }

    fn is_pending(&self, irq: IrqNumber) -> Result<bool, NvicError> {
        let (word, bit) = locate(irq)?;
        Ok(self.regs.is_set(ISPR + word, bit))
    }

    fn next_pending(&self) -> Option<IrqNumber> {
        (0..IRQ_COUNT.div_ceil(32)).find_map(|word| {
            let offset = word as usize * 4;
            let ready = self.regs.read(ISPR + offset) & self.regs.read(ISER + offset);
            (ready != 0).then(|| word * 32 + ready.trailing_zeros())
        })
    }

    fn clear(&mut self, irq: IrqNumber) -> Result<(), NvicError> {
        let (word, bit) = locate(irq)?;
        self.regs.write(ICPR + word, bit);
        Ok(())
    }
}

impl<B: RegisterBus> PriorityInterruptController for Stm32Nvic<B> {
    fn set_priority(&mut self, irq: IrqNumber, priority: Priority) -> Result<(), NvicError> {
        locate(irq)?;
        if u32::from(priority) >= 1 << PRIORITY_BITS {
            return Err(NvicError::InvalidPriority(priority));
        }
        let offset = IPR + (irq as usize / 4) * 4;
        let shift = (irq % 4) * 8 + (8 - PRIORITY_BITS);
        self.regs
            .write_field(offset, shift, PRIORITY_BITS, u32::from(priority));
        Ok(())
    }

    fn priority(&self, irq: IrqNumber) -> Result<Priority, NvicError> {
        locate(irq)?;
        let offset = IPR + (irq as usize / 4) * 4;
        let shift = (irq % 4) * 8 + (8 - PRIORITY_BITS);
        Ok(self.regs.read_field(offset, shift, PRIORITY_BITS) as Priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::stm32f4::irq_numbers::{EXTI0, EXTI1, EXTI15_10, TIM1_UP_TIM10};
    use crate::sim::SimNvic;

    #[test]
    fn enable_disable_across_words() {
        let sim = SimNvic::new();
        let mut nvic = Stm32Nvic::new(&sim);

        nvic.enable(EXTI0).unwrap();
        nvic.enable(EXTI15_10).unwrap();
        assert!(sim.enabled(EXTI0));
        assert!(sim.enabled(EXTI15_10));
        assert_eq!(nvic.is_enabled(TIM1_UP_TIM10), Ok(false));

        nvic.disable(EXTI0).unwrap();
        assert!(!sim.enabled(EXTI0));
        assert!(sim.enabled(EXTI15_10));
    }

    #[test]
    fn next_pending_needs_enable() {
        let sim = SimNvic::new();
        let mut nvic = Stm32Nvic::new(&sim);

        nvic.set_pending(EXTI15_10).unwrap();
        nvic.set_pending(EXTI0).unwrap();
        assert_eq!(nvic.next_pending(), None);

        nvic.enable(EXTI15_10).unwrap();
        assert_eq!(nvic.next_pending(), Some(EXTI15_10));
        nvic.enable(EXTI0).unwrap();
        assert_eq!(nvic.next_pending(), Some(EXTI0));

        nvic.clear(EXTI0).unwrap();
        assert_eq!(nvic.is_pending(EXTI0), Ok(false));
        assert_eq!(nvic.next_pending(), Some(EXTI15_10));
    }

    #[test]
    fn priorities_use_upper_nibble() {
        let sim = SimNvic::new();
        let mut nvic = Stm32Nvic::new(&sim);

        nvic.set_priority(EXTI1, 3).unwrap();
        assert_eq!(nvic.priority(EXTI1), Ok(3));
        assert_eq!(sim.read(IPR + 4), 0x30 << 24);
        assert_eq!(nvic.set_priority(EXTI1, 16), Err(NvicError::InvalidPriority(16)));
    }

    #[test]
    fn rejects_unknown_irq() {
        let sim = SimNvic::new();
        let mut nvic = Stm32Nvic::new(&sim);
        assert_eq!(nvic.enable(IRQ_COUNT), Err(NvicError::InvalidIrq(IRQ_COUNT)));
    }
}
