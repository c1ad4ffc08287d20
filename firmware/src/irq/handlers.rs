use common::arch::PlatformIrq;
use common::sync::IrqSpinLock;
use drivers::hal::exti::LineNumber;
use drivers::hw::stm32f4::exti::GPIO_LINE_COUNT;

/// Work done when a line fires.
///
/// Runs in interrupt context with the line's pending flag still set; the
/// dispatcher clears it afterwards.
pub trait LineAction: Sync {
    fn on_edge(&self, line: LineNumber);
}

impl<F: Fn(LineNumber) + Sync> LineAction for F {
    fn on_edge(&self, line: LineNumber) {
        self(line)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DispatchError {
    InvalidLine(LineNumber),
}

type Slot = Option<&'static dyn LineAction>;

/// One action slot per EXTI line.
pub struct LineDispatcher {
    handlers: IrqSpinLock<[Slot; GPIO_LINE_COUNT], PlatformIrq>,
}

impl LineDispatcher {
    pub const fn new() -> Self {
        Self {
            handlers: IrqSpinLock::new([None; GPIO_LINE_COUNT]),
        }
    }

    /// Install `action` for `line`, returning whatever it replaces.
    pub fn register(
        &self,
        line: LineNumber,
        action: &'static dyn LineAction,
    ) -> Result<Slot, DispatchError> {
        let slot = check(line)?;
        Ok(self.handlers.with(|table| table[slot].replace(action)))
    }

    pub fn unregister(&self, line: LineNumber) -> Result<Slot, DispatchError> {
        let slot = check(line)?;
        Ok(self.handlers.with(|table| table[slot].take()))
    }

    pub fn is_registered(&self, line: LineNumber) -> bool {
        self.handler(line).is_some()
    }

    /// Copy the action out so it runs with the lock released.
    pub(crate) fn handler(&self, line: LineNumber) -> Slot {
        let slot = check(line).ok()?;
        self.handlers.with(|table| table[slot])
    }
}

impl Default for LineDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn check(line: LineNumber) -> Result<usize, DispatchError> {
    let slot = usize::from(line);
    if slot < GPIO_LINE_COUNT {
        Ok(slot)
    } else {
        Err(DispatchError::InvalidLine(line))
    }
}
