//! External interrupt line Hardware Abstraction Layer.
//!
//! An external interrupt line latches a *pending* flag when its selected
//! pin sees an enabled edge. The flag stays set until software clears it,
//! and while it is set the line's interrupt keeps firing.

bitflags::bitflags! {
    /// Edge sensitivity of an external interrupt line.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Edge: u8 {
        /// Low-to-high transition.
        const RISING = 1 << 0;
        /// High-to-low transition.
        const FALLING = 1 << 1;
        const BOTH = Self::RISING.bits() | Self::FALLING.bits();
    }
}

/// External interrupt line number.
pub type LineNumber = u8;

/// Controller for edge-triggered external interrupt lines.
pub trait ExternalInterrupts {
    /// Platform-specific pin identifier.
    type Pin: Copy;

    /// Identifier of the pin group a line can be routed from.
    type Port: Copy;

    /// Error type for line operations.
    type Error: core::fmt::Debug;

    /// Route `pin` to `line`, arm it for `edge` and unmask it.
    ///
    /// Rebinding a line replaces its previous source; a line only ever
    /// listens to one pin.
    fn bind_line(
        &mut self,
        pin: Self::Pin,
        line: LineNumber,
        edge: Edge,
    ) -> Result<(), Self::Error>;

    /// Mask `line` and disarm both edges.
    fn unbind_line(&mut self, line: LineNumber) -> Result<(), Self::Error>;

    /// Port currently routed to `line`.
    fn source(&self, line: LineNumber) -> Result<Option<Self::Port>, Self::Error>;

    /// Whether `line` has latched an edge that has not been cleared.
    fn is_pending(&self, line: LineNumber) -> Result<bool, Self::Error>;

    /// Clear the pending flag of `line` only.
    fn clear_pending(&mut self, line: LineNumber) -> Result<(), Self::Error>;

    /// Latch `line` from software as if its edge had occurred.
    fn trigger(&mut self, line: LineNumber) -> Result<(), Self::Error>;
}
