//! LED on PC15 faded up and down by software PWM.

#![no_std]
#![no_main]

use core::convert::Infallible;

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_probe as _;
use stm32f4 as _;

use drivers::hal::gpio::{GpioController, PinHandle, PinMode};
use drivers::platform::stm32f4::{PeripheralClock, PeripheralRegisters};
use firmware::board::{self, Error};
use firmware::config::{PWM_LED, PWM_RAMP};
use firmware::pwm::SoftPwm;

#[entry]
fn main() -> ! {
    match board::init().and_then(run) {
        Ok(never) => match never {},
        Err(err) => board::halt(err),
    }
}

fn run(regs: &'static PeripheralRegisters) -> Result<Infallible, Error> {
    board::enable_clocks(regs, [PeripheralClock::Gpio(PWM_LED.port)])?;
    let mut gpio = regs.gpio();
    gpio.set_mode(PWM_LED, PinMode::Output)?;
    let timer = board::main_timer(regs)?;

    let mut pwm = SoftPwm::new(PinHandle::new(gpio, PWM_LED), timer, PWM_RAMP)?;
    defmt::info!(
        "manual_pwm: {=u32}..{=u32} of {=u32} ticks",
        PWM_RAMP.floor,
        PWM_RAMP.ceiling,
        PWM_RAMP.period
    );
    loop {
        pwm.run()?;
    }
}
