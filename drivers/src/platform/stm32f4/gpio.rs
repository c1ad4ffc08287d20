//! STM32F4 GPIO Driver
//!
//! One driver covers every port. Outputs are written through BSRR only, so
//! a write to one pin never disturbs another pin on the same port, even
//! when an interrupt handler drives the same port as the main loop.

use crate::hal::gpio::{GpioController, PinLevel, PinMode, PullMode};
use crate::hw::mmio::RegisterBus;
use crate::hw::stm32f4::gpio::*;
use crate::hw::stm32f4::{GPIOA_BASE, GPIOB_BASE, GPIOC_BASE, GPIOD_BASE, GPIOE_BASE, GPIOH_BASE};

/// Number of ports bonded out on F401/F411.
pub const PORT_COUNT: usize = 6;

/// GPIO port.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    H,
}

impl Port {
    pub const ALL: [Port; PORT_COUNT] = [Port::A, Port::B, Port::C, Port::D, Port::E, Port::H];

    /// Position of this port in per-port arrays.
    pub const fn slot(self) -> usize {
        match self {
            Port::A => 0,
            Port::B => 1,
            Port::C => 2,
            Port::D => 3,
            Port::E => 4,
            Port::H => 5,
        }
    }

    pub const fn base(self) -> usize {
        match self {
            Port::A => GPIOA_BASE,
            Port::B => GPIOB_BASE,
            Port::C => GPIOC_BASE,
            Port::D => GPIOD_BASE,
            Port::E => GPIOE_BASE,
            Port::H => GPIOH_BASE,
        }
    }

    /// SYSCFG_EXTICRx selector value that routes this port to a line.
    pub const fn exti_code(self) -> u32 {
        match self {
            Port::A => 0,
            Port::B => 1,
            Port::C => 2,
            Port::D => 3,
            Port::E => 4,
            Port::H => 7,
        }
    }

    pub const fn from_exti_code(code: u32) -> Option<Port> {
        match code {
            0 => Some(Port::A),
            1 => Some(Port::B),
            2 => Some(Port::C),
            3 => Some(Port::D),
            4 => Some(Port::E),
            7 => Some(Port::H),
            _ => None,
        }
    }
}

/// A single pin: port plus index 0..=15.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinId {
    pub port: Port,
    pub index: u8,
}

impl PinId {
    pub const fn new(port: Port, index: u8) -> Self {
        Self { port, index }
    }

    /// Single-bit mask of this pin within its port.
    pub const fn mask(self) -> u16 {
        1 << (self.index & 0x0F)
    }
}

/// GPIO driver errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// Pin index outside 0..=15.
    InvalidPin(u8),
    /// Alternate function outside 0..=15.
    InvalidFunction(u8),
}

fn check_pin(pin: PinId) -> Result<(), GpioError> {
    if pin.index < PINS_PER_PORT {
        Ok(())
    } else {
        Err(GpioError::InvalidPin(pin.index))
    }
}

/// GPIO driver over all ports.
#[derive(Debug, Clone)]
pub struct Stm32Gpio<B> {
    ports: [B; PORT_COUNT],
}

impl<B: RegisterBus> Stm32Gpio<B> {
    /// `ports` is indexed by [`Port::slot`].
    pub fn new(ports: [B; PORT_COUNT]) -> Self {
        Self { ports }
    }

    fn port(&self, port: Port) -> &B {
        &self.ports[port.slot()]
    }

    /// Drive several pins of one port in a single BSRR write.
    ///
    /// Pins in both masks end up high.
    pub fn write_mask(&mut self, port: Port, set: u16, reset: u16) {
        self.port(port)
            .write(BSRR, u32::from(set) | (u32::from(reset) << 16));
    }

    /// Sampled levels of every pin on `port`.
    pub fn input_mask(&self, port: Port) -> u16 {
        self.port(port).read(IDR) as u16
    }

    /// Levels currently driven on `port`.
    pub fn output_mask(&self, port: Port) -> u16 {
        self.port(port).read(ODR) as u16
    }

    /// Put every pin in `mask` into `mode`.
    pub fn set_mode_mask(&mut self, port: Port, mask: u16, mode: PinMode) -> Result<(), GpioError> {
        for index in 0..PINS_PER_PORT {
            if mask & (1 << index) != 0 {
                self.set_mode(PinId::new(port, index), mode)?;
            }
        }
        Ok(())
    }
}

impl<B: RegisterBus> GpioController for Stm32Gpio<B> {
    type Pin = PinId;
    type Error = GpioError;

    fn set_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), GpioError> {
        check_pin(pin)?;
        let regs = self.port(pin.port);
        let shift = u32::from(pin.index) * 2;

        let bits = match mode {
            PinMode::Input => MODE_INPUT,
            PinMode::Output => MODE_OUTPUT,
            PinMode::Analog => MODE_ANALOG,
            PinMode::Alternate(af) => {
                if af > 15 {
                    return Err(GpioError::InvalidFunction(af));
                }
                let (afr, slot) = if pin.index < 8 {
                    (AFRL, pin.index)
                } else {
                    (AFRH, pin.index - 8)
                };
                regs.write_field(afr, u32::from(slot) * 4, 4, u32::from(af));
                MODE_ALTERNATE
            }
        };

        regs.write_field(MODER, shift, 2, bits);
        Ok(())
    }

    fn set_pull(&mut self, pin: PinId, pull: PullMode) -> Result<(), GpioError> {
        check_pin(pin)?;
        let bits = match pull {
            PullMode::None => PULL_NONE,
            PullMode::Up => PULL_UP,
            PullMode::Down => PULL_DOWN,
        };
        self.port(pin.port)
            .write_field(PUPDR, u32::from(pin.index) * 2, 2, bits);
        Ok(())
    }

    fn set_high(&mut self, pin: PinId) -> Result<(), GpioError> {
        check_pin(pin)?;
        self.write_mask(pin.port, pin.mask(), 0);
        Ok(())
    }

    fn set_low(&mut self, pin: PinId) -> Result<(), GpioError> {
        check_pin(pin)?;
        self.write_mask(pin.port, 0, pin.mask());
        Ok(())
    }

    fn read(&self, pin: PinId) -> Result<PinLevel, GpioError> {
        check_pin(pin)?;
        Ok((self.input_mask(pin.port) & pin.mask() != 0).into())
    }

    fn output_level(&self, pin: PinId) -> Result<PinLevel, GpioError> {
        check_pin(pin)?;
        Ok((self.output_mask(pin.port) & pin.mask() != 0).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::gpio::{OutputPin, PinHandle, StatefulOutputPin};
    use crate::sim::SimGpio;

    fn ports() -> [SimGpio; PORT_COUNT] {
        core::array::from_fn(|_| SimGpio::new())
    }

    #[test]
    fn output_writes_go_through_bsrr() {
        let sim = ports();
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let led = PinId::new(Port::C, 13);

        gpio.set_mode(led, PinMode::Output).unwrap();
        gpio.set_high(led).unwrap();
        assert_eq!(sim[Port::C.slot()].odr(), 1 << 13);
        assert_eq!(gpio.output_level(led), Ok(PinLevel::High));

        gpio.toggle(led).unwrap();
        assert_eq!(sim[Port::C.slot()].odr(), 0);
        assert_eq!(sim[Port::C.slot()].bsrr_writes(), 2);
    }

    #[test]
    fn write_mask_leaves_other_pins_alone() {
        let sim = ports();
        let mut gpio = Stm32Gpio::new(sim.each_ref());

        gpio.write_mask(Port::A, 0x00F0, 0);
        gpio.write_mask(Port::A, 0x0003, 0x0010);
        assert_eq!(gpio.output_mask(Port::A), 0x00E3);
        assert_eq!(gpio.output_mask(Port::B), 0);
    }

    #[test]
    fn mode_pull_and_alternate_fields() {
        let sim = ports();
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let button = PinId::new(Port::A, 15);

        gpio.set_mode(button, PinMode::Input).unwrap();
        gpio.set_pull(button, PullMode::Down).unwrap();
        assert_eq!(sim[0].mode(15), MODE_INPUT);
        assert_eq!(sim[0].pull(15), PULL_DOWN);

        gpio.set_mode(PinId::new(Port::A, 9), PinMode::Alternate(7)).unwrap();
        assert_eq!(sim[0].read_field(AFRH, 4, 4), 7);
        assert_eq!(sim[0].mode(9), MODE_ALTERNATE);

        assert_eq!(
            gpio.set_mode(PinId::new(Port::A, 2), PinMode::Alternate(16)),
            Err(GpioError::InvalidFunction(16))
        );
    }

    #[test]
    fn input_follows_pull_and_drive() {
        let sim = ports();
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let sensor = PinId::new(Port::A, 0);

        gpio.set_mode(sensor, PinMode::Input).unwrap();
        gpio.set_pull(sensor, PullMode::Up).unwrap();
        assert_eq!(gpio.read(sensor), Ok(PinLevel::High));

        sim[0].drive(0, PinLevel::Low);
        assert_eq!(gpio.read(sensor), Ok(PinLevel::Low));

        sim[0].release(0);
        assert_eq!(gpio.read(sensor), Ok(PinLevel::High));
    }

    #[test]
    fn rejects_out_of_range_pins() {
        let sim = ports();
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let bogus = PinId::new(Port::B, 16);

        assert_eq!(gpio.set_high(bogus), Err(GpioError::InvalidPin(16)));
        assert_eq!(gpio.read(bogus), Err(GpioError::InvalidPin(16)));
    }

    #[test]
    fn pin_handle_drives_one_pin() {
        let sim = ports();
        let gpio = Stm32Gpio::new(sim.each_ref());
        let mut led = PinHandle::new(gpio, PinId::new(Port::C, 15));

        led.set_high().unwrap();
        assert!(led.is_set_high().unwrap());
        led.toggle().unwrap();
        assert!(led.is_set_low().unwrap());
    }

    #[test]
    fn exti_codes_round_trip() {
        for port in Port::ALL {
            assert_eq!(Port::from_exti_code(port.exti_code()), Some(port));
        }
        assert_eq!(Port::from_exti_code(5), None);
    }
}
