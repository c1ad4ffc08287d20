//! Board constants and demo tables.
//!
//! Black Pill style STM32F401 board: 25 MHz crystal, active-low user LED
//! on PC13.

use drivers::hal::exti::Edge;
use drivers::hal::gpio::{PinLevel, PullMode};
use drivers::platform::stm32f4::{ClockConfig, PinId, Port, TimerConfig};
use drivers::wait::PollLimit;

use crate::action::{EdgeAction, InterruptBinding};
use crate::pwm::RampConfig;
use crate::sensor::SensorConfig;

pub const HSE_HZ: u32 = 25_000_000;

/// SYSCLK straight from the crystal, no PLL.
pub const BOARD_CLOCKS: ClockConfig = ClockConfig::hse(HSE_HZ).with_limit(PollLimit::Polls(100_000));

/// TIM10 at 25 MHz / (999 + 1) = 25 kHz.
pub const TIMER_CONFIG: TimerConfig = TimerConfig::new(999, HSE_HZ);

/// Half a second of 25 kHz ticks.
pub const BLINK_TICKS: u32 = 12_500;

/// 20.6 ms cycle at 25 kHz ticks, on-time stepping 1 ms at a time.
pub const PWM_RAMP: RampConfig = RampConfig::new(25, 475, 25, 515);

pub const STATUS_LED: PinId = PinId::new(Port::C, 13);
pub const PWM_LED: PinId = PinId::new(Port::C, 15);

const fn pa(index: u8) -> PinId {
    PinId::new(Port::A, index)
}

const fn blink(led: PinId, rest: PinLevel) -> EdgeAction {
    EdgeAction::Blink {
        led,
        times: 5,
        half_period_ms: 100,
        rest,
    }
}

// ============================================================================
// EXTI Demos
// ============================================================================

/// Three buttons, each blinking its own LED.
pub static EXTI_BLINK_BINDINGS: [InterruptBinding; 3] = [
    InterruptBinding {
        source: pa(0),
        pull: PullMode::Down,
        edge: Edge::RISING,
        action: blink(pa(6), PinLevel::Low),
    },
    InterruptBinding {
        source: pa(1),
        pull: PullMode::Up,
        edge: Edge::RISING,
        action: blink(pa(5), PinLevel::Low),
    },
    InterruptBinding {
        source: pa(15),
        pull: PullMode::Down,
        edge: Edge::RISING,
        action: blink(pa(7), PinLevel::Low),
    },
];

/// Main loop of the line 0 demo keeps this LED on between blinks.
pub const LINE0_LED: PinId = pa(5);

pub static LINE0_PB0: InterruptBinding = InterruptBinding {
    source: PinId::new(Port::B, 0),
    pull: PullMode::Up,
    edge: Edge::RISING,
    action: blink(LINE0_LED, PinLevel::High),
};

pub static LINE0_FALLING: InterruptBinding = InterruptBinding {
    source: pa(0),
    pull: PullMode::Up,
    edge: Edge::FALLING,
    action: blink(LINE0_LED, PinLevel::High),
};

/// PA1..PA8, in sweep order.
pub static IR_LEDS: [PinId; 8] = [pa(1), pa(2), pa(3), pa(4), pa(5), pa(6), pa(7), pa(8)];

pub static IR_SWEEP_BINDING: InterruptBinding = InterruptBinding {
    source: pa(0),
    pull: PullMode::Up,
    edge: Edge::RISING,
    action: EdgeAction::Sweep {
        leds: &IR_LEDS,
        step_ms: 500,
        hold_ms: 1_000,
    },
};

/// Main loop step of the PA8..PA1 chase.
pub const IR_CHASE_STEP_MS: u32 = 300;

// ============================================================================
// Sensors
// ============================================================================

/// Config run by the `sensor_follow` binary.
pub const FOLLOWED_SENSOR: SensorConfig = PIR_SENSOR;

/// PIR module, output high on motion.
pub const PIR_SENSOR: SensorConfig = SensorConfig {
    input: pa(0),
    pull: PullMode::Down,
    active: PinLevel::High,
    led: STATUS_LED,
    led_active: PinLevel::Low,
    hold_ms: 0,
};

/// IR obstacle module, output low when something is in front of it.
pub const IR_SENSOR: SensorConfig = SensorConfig {
    input: pa(0),
    pull: PullMode::Up,
    active: PinLevel::Low,
    led: pa(1),
    led_active: PinLevel::High,
    hold_ms: 1_000,
};

/// Push button to 3V3, PA0 held low by the internal pull-down.
pub const BUTTON_PULL_DOWN: SensorConfig = SensorConfig {
    input: pa(0),
    pull: PullMode::Down,
    active: PinLevel::High,
    led: pa(1),
    led_active: PinLevel::High,
    hold_ms: 0,
};

/// Push button to ground, PA0 held high by the internal pull-up.
pub const BUTTON_PULL_UP: SensorConfig = SensorConfig {
    input: pa(0),
    pull: PullMode::Up,
    active: PinLevel::Low,
    led: pa(1),
    led_active: PinLevel::High,
    hold_ms: 0,
};

/// Button with its own resistor on the board; PA4 shows the input level.
pub const BUTTON_EXTERNAL: SensorConfig = SensorConfig {
    input: pa(0),
    pull: PullMode::None,
    active: PinLevel::High,
    led: pa(4),
    led_active: PinLevel::High,
    hold_ms: 0,
};
