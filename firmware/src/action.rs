//! Edge Actions
//!
//! What a demo does when one of its EXTI lines fires, plus the table entry
//! ([`InterruptBinding`]) that ties an input pin, its pull, its edge and the
//! action together. Installing a binding configures the pins, registers the
//! action with a [`LineDispatcher`] and arms the line, in that order, so the
//! line can never fire before something is there to service it.

use drivers::hal::exti::{Edge, ExternalInterrupts, LineNumber};
use drivers::hal::gpio::{GpioController, PinLevel, PinMode, PullMode};
use drivers::hal::timer::Delay;
use drivers::platform::stm32f4::PinId;
use log::{debug, info};

use crate::irq::{DispatchError, LineAction, LineDispatcher};

/// Blocking work run from an interrupt handler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EdgeAction {
    /// `times` rounds of: LED low, wait, LED high, wait. Then leave the LED
    /// at `rest`.
    Blink {
        led: PinId,
        times: u8,
        half_period_ms: u32,
        rest: PinLevel,
    },
    /// Light `leds` one after another, hold the last, then turn all off.
    Sweep {
        leds: &'static [PinId],
        step_ms: u32,
        hold_ms: u32,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ActionError<G, D> {
    Gpio(G),
    Delay(D),
}

impl EdgeAction {
    /// Pins the action drives.
    pub fn outputs(&self) -> &[PinId] {
        match self {
            EdgeAction::Blink { led, .. } => core::slice::from_ref(led),
            EdgeAction::Sweep { leds, .. } => *leds,
        }
    }

    pub fn run<G, D>(&self, gpio: &mut G, delay: &mut D) -> Result<(), ActionError<G::Error, D::Error>>
    where
        G: GpioController<Pin = PinId>,
        D: Delay,
    {
        match *self {
            EdgeAction::Blink {
                led,
                times,
                half_period_ms,
                rest,
            } => {
                for _ in 0..times {
                    gpio.set_low(led).map_err(ActionError::Gpio)?;
                    delay.delay_ms(half_period_ms).map_err(ActionError::Delay)?;
                    gpio.set_high(led).map_err(ActionError::Gpio)?;
                    delay.delay_ms(half_period_ms).map_err(ActionError::Delay)?;
                }
                gpio.set_level(led, rest).map_err(ActionError::Gpio)
            }
            EdgeAction::Sweep {
                leds,
                step_ms,
                hold_ms,
            } => {
                all_low(gpio, leds).map_err(ActionError::Gpio)?;
                for (n, &led) in leds.iter().enumerate() {
                    gpio.set_high(led).map_err(ActionError::Gpio)?;
                    let wait = if n + 1 == leds.len() { hold_ms } else { step_ms };
                    delay.delay_ms(wait).map_err(ActionError::Delay)?;
                }
                all_low(gpio, leds).map_err(ActionError::Gpio)
            }
        }
    }
}

fn all_low<G: GpioController<Pin = PinId>>(gpio: &mut G, leds: &[PinId]) -> Result<(), G::Error> {
    leds.iter().try_for_each(|&led| gpio.set_low(led))
}

// ============================================================================
// Bindings
// ============================================================================

/// One input pin wired to an EXTI line and the action it triggers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InterruptBinding {
    pub source: PinId,
    pub pull: PullMode,
    pub edge: Edge,
    pub action: EdgeAction,
}

impl InterruptBinding {
    /// Line `n` is fed by pin `n` of some port.
    pub const fn line(&self) -> LineNumber {
        self.source.index
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SetupError<G, E> {
    Gpio(G),
    Exti(E),
    Dispatch(DispatchError),
}

/// Make `binding` live, with `handler` serving its line.
///
/// The source pin becomes an input with the requested pull and every
/// output of the action starts low. If arming the line fails the handler
/// is taken back out of the dispatcher.
pub fn install<G, E>(
    binding: &InterruptBinding,
    handler: &'static dyn LineAction,
    gpio: &mut G,
    exti: &mut E,
    dispatcher: &LineDispatcher,
) -> Result<(), SetupError<G::Error, E::Error>>
where
    G: GpioController<Pin = PinId>,
    E: ExternalInterrupts<Pin = PinId>,
{
    let line = binding.line();

    gpio.set_mode(binding.source, PinMode::Input)
        .map_err(SetupError::Gpio)?;
    gpio.set_pull(binding.source, binding.pull)
        .map_err(SetupError::Gpio)?;
    for &led in binding.action.outputs() {
        gpio.set_mode(led, PinMode::Output).map_err(SetupError::Gpio)?;
        gpio.set_low(led).map_err(SetupError::Gpio)?;
    }

    if dispatcher
        .register(line, handler)
        .map_err(SetupError::Dispatch)?
        .is_some()
    {
        debug!("EXTI{}: previous action replaced", line);
    }

    if let Err(err) = exti.bind_line(binding.source, line, binding.edge) {
        dispatcher.unregister(line).ok();
        return Err(SetupError::Exti(err));
    }

    info!(
        "P{:?}{} -> EXTI{} on {:?}",
        binding.source.port, binding.source.index, line, binding.edge
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use drivers::platform::stm32f4::{ExtiError, PORT_COUNT, Port, Stm32Exti, Stm32Gpio};
    use drivers::sim::{SimExti, SimGpio, SimNvic, SimRegisters};

    use super::*;

    /// Millisecond ticks; records every wait alongside port A's outputs.
    struct Recorder<'a> {
        ports: &'a [SimGpio; PORT_COUNT],
        log: Vec<(u16, u32)>,
    }

    impl Delay for Recorder<'_> {
        type Error = Infallible;

        fn wait_ticks(&mut self, period: u32) -> Result<(), Infallible> {
            self.log.push((self.ports[0].odr(), period));
            Ok(())
        }

        fn tick_hz(&self) -> u32 {
            1_000
        }
    }

    fn ports() -> [SimGpio; PORT_COUNT] {
        core::array::from_fn(|_| SimGpio::new())
    }

    const PA5: PinId = PinId::new(Port::A, 5);

    #[test]
    fn blink_toggles_then_rests() {
        let sim = ports();
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let mut recorder = Recorder {
            ports: &sim,
            log: Vec::new(),
        };
        let action = EdgeAction::Blink {
            led: PA5,
            times: 5,
            half_period_ms: 100,
            rest: PinLevel::High,
        };

        action.run(&mut gpio, &mut recorder).unwrap();

        assert_eq!(recorder.log.len(), 10);
        for (n, &(odr, ms)) in recorder.log.iter().enumerate() {
            assert_eq!(ms, 100);
            let lit = if n % 2 == 0 { 0 } else { 1 << 5 };
            assert_eq!(odr, lit);
        }
        assert_eq!(sim[0].odr(), 1 << 5);
    }

    #[test]
    fn sweep_holds_the_last_led_then_clears() {
        static LEDS: [PinId; 3] = [
            PinId::new(Port::A, 1),
            PinId::new(Port::A, 2),
            PinId::new(Port::A, 3),
        ];
        let sim = ports();
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let mut recorder = Recorder {
            ports: &sim,
            log: Vec::new(),
        };
        let action = EdgeAction::Sweep {
            leds: &LEDS,
            step_ms: 500,
            hold_ms: 1_000,
        };

        action.run(&mut gpio, &mut recorder).unwrap();

        assert_eq!(
            recorder.log,
            [(0b0010, 500), (0b0110, 500), (0b1110, 1_000)]
        );
        assert_eq!(sim[0].odr(), 0);
    }

    fn binding() -> InterruptBinding {
        InterruptBinding {
            source: PinId::new(Port::A, 1),
            pull: PullMode::Up,
            edge: Edge::RISING,
            action: EdgeAction::Blink {
                led: PA5,
                times: 5,
                half_period_ms: 100,
                rest: PinLevel::Low,
            },
        }
    }

    #[test]
    fn install_configures_pins_and_arms_the_line() {
        static NOOP: fn(LineNumber) = |_| {};
        let sim = ports();
        let (syscfg, lines, nvic) = (SimRegisters::<16>::new(), SimExti::new(), SimNvic::new());
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let mut exti = Stm32Exti::new(&syscfg, &lines, &nvic);
        let dispatcher = LineDispatcher::new();

        install(&binding(), &NOOP, &mut gpio, &mut exti, &dispatcher).unwrap();

        assert_eq!(sim[0].mode(1), 0b00);
        assert_eq!(sim[0].pull(1), 0b01);
        assert_eq!(sim[0].mode(5), 0b01);
        assert!(dispatcher.is_registered(1));
        assert_eq!(exti.is_bound(1), Ok(true));
        assert_eq!(exti.edges(1), Ok(Edge::RISING));
    }

    #[test]
    fn failed_bind_leaves_nothing_registered() {
        static NOOP: fn(LineNumber) = |_| {};
        let sim = ports();
        let (syscfg, lines, nvic) = (SimRegisters::<16>::new(), SimExti::new(), SimNvic::new());
        let mut gpio = Stm32Gpio::new(sim.each_ref());
        let mut exti = Stm32Exti::new(&syscfg, &lines, &nvic);
        let dispatcher = LineDispatcher::new();
        let no_edge = InterruptBinding {
            edge: Edge::empty(),
            ..binding()
        };

        assert_eq!(
            install(&no_edge, &NOOP, &mut gpio, &mut exti, &dispatcher),
            Err(SetupError::Exti(ExtiError::NoEdge))
        );
        assert!(!dispatcher.is_registered(1));
    }
}
