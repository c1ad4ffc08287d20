//! PC13 toggled every half second, timed by TIM10 delay sessions.

#![no_std]
#![no_main]

use core::convert::Infallible;

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_probe as _;
use stm32f4 as _;

use drivers::hal::gpio::{GpioController, PinMode};
use drivers::hal::timer::Delay;
use drivers::platform::stm32f4::{PeripheralClock, PeripheralRegisters};
use firmware::board::{self, Error};
use firmware::config::{BLINK_TICKS, STATUS_LED};

#[entry]
fn main() -> ! {
    match board::init().and_then(run) {
        Ok(never) => match never {},
        Err(err) => board::halt(err),
    }
}

fn run(regs: &'static PeripheralRegisters) -> Result<Infallible, Error> {
    board::enable_clocks(regs, [PeripheralClock::Gpio(STATUS_LED.port)])?;
    let mut gpio = regs.gpio();
    gpio.set_mode(STATUS_LED, PinMode::Output)?;
    let mut timer = board::main_timer(regs)?;

    defmt::info!("timer_blinky: toggling every {=u32} ticks", BLINK_TICKS);
    loop {
        gpio.toggle(STATUS_LED)?;
        timer.wait_ticks(BLINK_TICKS)?;
    }
}
