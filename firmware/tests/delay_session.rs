//! Delay sessions and the PWM ramp on the simulated TIM10.

use drivers::hal::gpio::{GpioController, PinHandle, PinMode};
use drivers::hal::timer::{Delay, UpdateTimer};
use drivers::hw::mmio::RegisterBus;
use drivers::hw::stm32f4::tim::{SR, SR_UIF};
use drivers::platform::stm32f4::{PORT_COUNT, Stm32Gpio, Stm32Timer};
use drivers::sim::{SimGpio, SimTimer};
use firmware::config::{BLINK_TICKS, PWM_LED, PWM_RAMP, TIMER_CONFIG};
use firmware::pwm::{PwmError, RampConfig, RampError, SoftPwm};

fn timer(sim: &SimTimer) -> Stm32Timer<&SimTimer> {
    let mut timer = Stm32Timer::new(sim, TIMER_CONFIG);
    timer.configure().unwrap();
    timer
}

#[test]
fn longer_periods_never_wait_less() {
    let sim = SimTimer::new();
    let mut timer = timer(&sim);

    let mut previous = 0;
    for period in [1, 2, 40, 475, 12_500, 65_535] {
        let start = sim.elapsed_ticks();
        timer.wait_ticks(period).unwrap();
        let waited = sim.elapsed_ticks() - start;
        assert!(waited >= u64::from(period));
        assert!(waited > previous);
        previous = waited;
    }
}

#[test]
fn flag_is_clear_after_every_session() {
    let sim = SimTimer::new();
    let mut timer = timer(&sim);

    for _ in 0..3 {
        timer.wait_ticks(BLINK_TICKS).unwrap();
        assert_eq!(sim.read(SR) & SR_UIF, 0);
        assert!(!timer.is_armed());
    }
    assert_eq!(sim.update_events(), 3);
}

#[test]
fn blink_half_period_is_half_a_second_of_input_clock() {
    let sim = SimTimer::new();
    let mut timer = timer(&sim);

    timer.wait_ticks(BLINK_TICKS).unwrap();
    // 12501 ticks of 1000 cycles at 25 MHz: 500.04 ms.
    assert_eq!(sim.elapsed_cycles(), 12_501_000);
}

#[test]
fn pwm_cycles_keep_a_constant_length() {
    let ports: [SimGpio; PORT_COUNT] = core::array::from_fn(|_| SimGpio::new());
    let sim = SimTimer::new();
    let mut gpio = Stm32Gpio::new(ports.each_ref());
    gpio.set_mode(PWM_LED, PinMode::Output).unwrap();

    let mut pwm = SoftPwm::new(PinHandle::new(gpio, PWM_LED), timer(&sim), PWM_RAMP).unwrap();

    for _ in 0..40 {
        let start = sim.elapsed_ticks();
        let step = pwm.step().unwrap().unwrap();
        assert_eq!(
            sim.elapsed_ticks() - start,
            u64::from(step.on_ticks + step.off_ticks) + 2
        );
    }
    // Each cycle ends with the pin low.
    assert_eq!(ports[2].odr() & PWM_LED.mask(), 0);
    assert_eq!(ports[2].bsrr_writes(), 80);
}

#[test]
fn ramp_longer_than_the_counter_is_refused() {
    let ports: [SimGpio; PORT_COUNT] = core::array::from_fn(|_| SimGpio::new());
    let sim = SimTimer::new();
    let mut gpio = Stm32Gpio::new(ports.each_ref());
    gpio.set_mode(PWM_LED, PinMode::Output).unwrap();

    // 70 000 ticks cannot be loaded into a 16-bit auto-reload register.
    let config = RampConfig::new(65_000, 69_000, 1_000, 70_000);
    let result = SoftPwm::new(PinHandle::new(gpio, PWM_LED), timer(&sim), config);

    assert!(matches!(
        result,
        Err(PwmError::InvalidRamp(RampError::PeriodExceedsDelay))
    ));
    assert_eq!(ports[2].odr() & PWM_LED.mask(), 0);
    assert_eq!(ports[2].bsrr_writes(), 0);
    assert_eq!(sim.update_events(), 0);
}
