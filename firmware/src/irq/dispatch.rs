//! Interrupt Dispatch
//!
//! Called from the EXTI vector-table entries.

use drivers::hal::exti::ExternalInterrupts;
use drivers::platform::stm32f4::LineGroup;
use log::warn;

use super::handlers::LineDispatcher;

impl LineDispatcher {
    /// Service every pending line of `group`.
    ///
    /// For each line whose pending flag is set:
    /// 1. Run its registered action, or log a spurious event
    /// 2. Clear its pending flag
    ///
    /// The flag is cleared even when nothing is registered, otherwise the
    /// vector would re-enter forever. Edges that arrive while the action
    /// runs coalesce into the flag being cleared. Returns how many lines
    /// were serviced.
    pub fn dispatch<E>(&self, group: LineGroup, exti: &mut E) -> Result<usize, E::Error>
    where
        E: ExternalInterrupts,
    {
        let mut serviced = 0;
        for line in group.lines() {
            if !exti.is_pending(line)? {
                continue;
            }

            match self.handler(line) {
                Some(action) => action.on_edge(line),
                None => warn!("EXTI{}: pending with no action registered", line),
            }

            exti.clear_pending(line)?;
            serviced += 1;
        }
        Ok(serviced)
    }
}
