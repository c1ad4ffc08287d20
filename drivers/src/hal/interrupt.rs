//! Interrupt Controller Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for interrupt management.

/// Interrupt number type.
pub type IrqNumber = u32;

/// Interrupt priority level.
///
/// Lower values preempt higher ones, as on the NVIC.
pub type Priority = u8;

/// Interrupt controller trait.
pub trait InterruptController {
    /// Error type for interrupt controller operations.
    type Error: core::fmt::Debug;

    /// Enable (unmask) an interrupt line.
    fn enable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    /// Disable (mask) an interrupt line.
    fn disable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    fn is_enabled(&self, irq: IrqNumber) -> Result<bool, Self::Error>;

    /// Check if an interrupt is currently pending.
    fn is_pending(&self, irq: IrqNumber) -> Result<bool, Self::Error>;

    /// Lowest-numbered interrupt that is both enabled and pending.
    fn next_pending(&self) -> Option<IrqNumber>;

    /// Clear a pending interrupt.
    fn clear(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;
}

/// Extension trait for interrupt controllers with priority support.
pub trait PriorityInterruptController: InterruptController {
    /// Set the priority of an interrupt line.
    fn set_priority(&mut self, irq: IrqNumber, priority: Priority) -> Result<(), Self::Error>;

    /// Get the priority of an interrupt line.
    fn priority(&self, irq: IrqNumber) -> Result<Priority, Self::Error>;
}
