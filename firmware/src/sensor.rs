//! Sensor follower: mirror a digital sensor input onto an indicator LED.

use drivers::hal::gpio::{GpioController, PinLevel, PinMode, PullMode};
use drivers::hal::timer::Delay;
use drivers::platform::stm32f4::PinId;
use log::debug;

use crate::action::ActionError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SensorConfig {
    pub input: PinId,
    pub pull: PullMode,
    /// Input level that means "detected".
    pub active: PinLevel,
    pub led: PinId,
    /// LED level that means "on".
    pub led_active: PinLevel,
    /// How long to keep the LED on after a detection, 0 to follow the input.
    pub hold_ms: u32,
}

pub struct SensorFollower {
    config: SensorConfig,
    detected: bool,
    detections: u32,
}

impl SensorFollower {
    pub fn new(config: SensorConfig) -> Self {
        Self {
            config,
            detected: false,
            detections: 0,
        }
    }

    /// Input with its pull, LED as an output switched off.
    pub fn setup<G: GpioController<Pin = PinId>>(&self, gpio: &mut G) -> Result<(), G::Error> {
        let SensorConfig {
            input,
            pull,
            led,
            led_active,
            ..
        } = self.config;
        gpio.set_mode(input, PinMode::Input)?;
        gpio.set_pull(input, pull)?;
        gpio.set_mode(led, PinMode::Output)?;
        gpio.set_level(led, led_active.inverted())
    }

    /// Sample the input once and drive the LED to match.
    ///
    /// Returns whether the sensor reads active.
    pub fn poll<G, D>(&mut self, gpio: &mut G, delay: &mut D) -> Result<bool, ActionError<G::Error, D::Error>>
    where
        G: GpioController<Pin = PinId>,
        D: Delay,
    {
        let config = self.config;
        let active = gpio.read(config.input).map_err(ActionError::Gpio)? == config.active;

        if active && !self.detected {
            self.detections += 1;
            debug!("sensor on P{:?}{}: detection {}", config.input.port, config.input.index, self.detections);
        }
        self.detected = active;

        let led = if active {
            config.led_active
        } else {
            config.led_active.inverted()
        };
        gpio.set_level(config.led, led).map_err(ActionError::Gpio)?;

        if active && config.hold_ms > 0 {
            delay.delay_ms(config.hold_ms).map_err(ActionError::Delay)?;
        }
        Ok(active)
    }

    /// Inactive-to-active transitions seen so far.
    pub fn detections(&self) -> u32 {
        self.detections
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use drivers::platform::stm32f4::{PORT_COUNT, Port, Stm32Gpio};
    use drivers::sim::SimGpio;

    use super::*;

    #[derive(Default)]
    struct Stopwatch {
        ms: u32,
    }

    impl Delay for Stopwatch {
        type Error = Infallible;

        fn wait_ticks(&mut self, period: u32) -> Result<(), Infallible> {
            self.ms += period;
            Ok(())
        }

        fn tick_hz(&self) -> u32 {
            1_000
        }
    }

    fn ports() -> [SimGpio; PORT_COUNT] {
        core::array::from_fn(|_| SimGpio::new())
    }

    const PIR: SensorConfig = SensorConfig {
        input: PinId::new(Port::A, 0),
        pull: PullMode::Down,
        active: PinLevel::High,
        led: PinId::new(Port::C, 13),
        led_active: PinLevel::Low,
        hold_ms: 0,
    };

    #[test]
    fn active_low_led_follows_active_high_input() {
        let sim = ports();
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let mut delay = Stopwatch::default();
        let mut pir = SensorFollower::new(PIR);
        pir.setup(&mut gpio).unwrap();
        assert_eq!(sim[2].odr(), 1 << 13);

        // Pull-down holds the idle input low.
        assert_eq!(pir.poll(&mut gpio, &mut delay), Ok(false));
        assert_eq!(sim[2].odr(), 1 << 13);

        sim[0].drive(0, PinLevel::High);
        assert_eq!(pir.poll(&mut gpio, &mut delay), Ok(true));
        assert_eq!(sim[2].odr(), 0);
        assert_eq!(delay.ms, 0);
    }

    #[test]
    fn hold_applies_only_while_active() {
        let sim = ports();
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let mut delay = Stopwatch::default();
        let mut ir = SensorFollower::new(SensorConfig {
            input: PinId::new(Port::A, 0),
            pull: PullMode::Up,
            active: PinLevel::Low,
            led: PinId::new(Port::A, 1),
            led_active: PinLevel::High,
            hold_ms: 1_000,
        });
        ir.setup(&mut gpio).unwrap();

        assert_eq!(ir.poll(&mut gpio, &mut delay), Ok(false));
        assert_eq!(delay.ms, 0);

        sim[0].drive(0, PinLevel::Low);
        assert_eq!(ir.poll(&mut gpio, &mut delay), Ok(true));
        assert_eq!(sim[0].odr() & (1 << 1), 1 << 1);
        assert_eq!(delay.ms, 1_000);
    }

    #[test]
    fn detections_count_transitions() {
        let sim = ports();
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let mut delay = Stopwatch::default();
        let mut pir = SensorFollower::new(PIR);
        pir.setup(&mut gpio).unwrap();

        for level in [true, true, false, true, false, false] {
            sim[0].drive(0, level.into());
            pir.poll(&mut gpio, &mut delay).unwrap();
        }
        assert_eq!(pir.detections(), 2);
    }
}
