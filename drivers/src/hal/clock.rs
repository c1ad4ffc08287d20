//! Clock gating.

/// Controller that gates the bus clock of individual peripherals.
///
/// A peripheral's registers ignore writes until its clock is enabled, so
/// drivers expect this to have run first.
pub trait ClockControl {
    /// Platform-specific peripheral identifier.
    type Peripheral: Copy;

    type Error: core::fmt::Debug;

    fn enable_peripheral_clock(&mut self, peripheral: Self::Peripheral)
    -> Result<(), Self::Error>;

    fn disable_peripheral_clock(
        &mut self,
        peripheral: Self::Peripheral,
    ) -> Result<(), Self::Error>;

    fn is_enabled(&self, peripheral: Self::Peripheral) -> bool;

    /// Current system clock frequency in Hz.
    fn sysclk_hz(&self) -> u32;
}
