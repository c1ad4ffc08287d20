//! GPIO (General Purpose Input/Output) Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for GPIO control.

/// Pin logic level.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinLevel {
    /// Logic low (0V or ground).
    Low,
    /// Logic high (VDD).
    High,
}

impl PinLevel {
    /// The opposite level.
    pub const fn inverted(self) -> Self {
        match self {
            PinLevel::Low => PinLevel::High,
            PinLevel::High => PinLevel::Low,
        }
    }
}

impl From<bool> for PinLevel {
    fn from(value: bool) -> Self {
        if value {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

impl From<PinLevel> for bool {
    fn from(level: PinLevel) -> bool {
        matches!(level, PinLevel::High)
    }
}

/// Internal pull resistor configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PullMode {
    /// No pull resistor (high impedance).
    None,
    /// Enable internal pull-up resistor.
    Up,
    /// Enable internal pull-down resistor.
    Down,
}

/// Pin function.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinMode {
    Input,
    /// Push-pull output.
    Output,
    /// Routed to an on-chip peripheral through alternate function `n`.
    Alternate(u8),
    Analog,
}

/// GPIO controller trait.
///
/// This trait represents a GPIO controller capable of configuring
/// and controlling multiple GPIO pins.
///
/// # Type Parameters
///
/// - `Pin`: Platform-specific pin identifier
/// - `Error`: Error type for operations that can fail
pub trait GpioController {
    /// Platform-specific pin identifier.
    type Pin: Copy + Clone;

    /// Error type for GPIO operations.
    type Error: core::fmt::Debug;

    /// Select the pin function.
    fn set_mode(&mut self, pin: Self::Pin, mode: PinMode) -> Result<(), Self::Error>;

    /// Configure the internal pull resistor for a pin.
    fn set_pull(&mut self, pin: Self::Pin, pull: PullMode) -> Result<(), Self::Error>;

    /// Set a pin to logic high.
    fn set_high(&mut self, pin: Self::Pin) -> Result<(), Self::Error>;

    /// Set a pin to logic low.
    fn set_low(&mut self, pin: Self::Pin) -> Result<(), Self::Error>;

    /// Read the sampled input level of a pin.
    fn read(&self, pin: Self::Pin) -> Result<PinLevel, Self::Error>;

    /// Read back the level the pin is being driven to.
    fn output_level(&self, pin: Self::Pin) -> Result<PinLevel, Self::Error>;

    /// Set the pin to a specific level.
    fn set_level(&mut self, pin: Self::Pin, level: PinLevel) -> Result<(), Self::Error> {
        match level {
            PinLevel::High => self.set_high(pin),
            PinLevel::Low => self.set_low(pin),
        }
    }

    /// Toggle the output state of a pin.
    fn toggle(&mut self, pin: Self::Pin) -> Result<(), Self::Error> {
        let level = self.output_level(pin)?;
        self.set_level(pin, level.inverted())
    }
}

/// Input pin trait.
///
/// This trait represents a GPIO pin configured as an input.
pub trait InputPin {
    /// Error type for read operations.
    type Error: core::fmt::Debug;

    /// Read the pin state.
    fn read(&self) -> Result<PinLevel, Self::Error>;

    /// Check if the pin is currently high.
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.read()? == PinLevel::High)
    }

    /// Check if the pin is currently low.
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(self.read()? == PinLevel::Low)
    }
}

/// Output pin trait.
///
/// This trait represents a GPIO pin configured as an output.
pub trait OutputPin {
    /// Error type for write operations.
    type Error: core::fmt::Debug;

    /// Set the pin to logic high.
    fn set_high(&mut self) -> Result<(), Self::Error>;

    /// Set the pin to logic low.
    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Set the pin to a specific level.
    fn set_level(&mut self, level: PinLevel) -> Result<(), Self::Error> {
        match level {
            PinLevel::High => self.set_high(),
            PinLevel::Low => self.set_low(),
        }
    }

    /// Set the pin state based on a boolean value.
    fn set_state(&mut self, state: bool) -> Result<(), Self::Error> {
        self.set_level(state.into())
    }
}

/// Stateful output pin that can be toggled.
pub trait StatefulOutputPin: OutputPin {
    /// Read back the current output state.
    fn output_level(&self) -> Result<PinLevel, Self::Error>;

    /// Toggle the output state.
    fn toggle(&mut self) -> Result<(), Self::Error> {
        let level = self.output_level()?;
        self.set_level(level.inverted())
    }

    /// Check if the pin is currently driven high.
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self.output_level()? == PinLevel::High)
    }

    /// Check if the pin is currently driven low.
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(self.output_level()? == PinLevel::Low)
    }
}

/// One pin of a [`GpioController`], usable wherever a single
/// [`OutputPin`] or [`InputPin`] is expected.
#[derive(Debug, Clone)]
pub struct PinHandle<G: GpioController> {
    gpio: G,
    pin: G::Pin,
}

impl<G: GpioController> PinHandle<G> {
    pub fn new(gpio: G, pin: G::Pin) -> Self {
        Self { gpio, pin }
    }

    pub fn pin(&self) -> G::Pin {
        self.pin
    }

    pub fn release(self) -> G {
        self.gpio
    }
}

impl<G: GpioController> OutputPin for PinHandle<G> {
    type Error = G::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.gpio.set_high(self.pin)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.gpio.set_low(self.pin)
    }
}

impl<G: GpioController> StatefulOutputPin for PinHandle<G> {
    fn output_level(&self) -> Result<PinLevel, Self::Error> {
        self.gpio.output_level(self.pin)
    }
}

impl<G: GpioController> InputPin for PinHandle<G> {
    type Error = G::Error;

    fn read(&self) -> Result<PinLevel, Self::Error> {
        self.gpio.read(self.pin)
    }
}
