//! Digital sensor or button mirrored onto an LED.

#![no_std]
#![no_main]

use core::convert::Infallible;

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_probe as _;
use stm32f4 as _;

use drivers::platform::stm32f4::{PeripheralClock, PeripheralRegisters};
use firmware::board::{self, Error};
use firmware::config::FOLLOWED_SENSOR;
use firmware::sensor::SensorFollower;

#[entry]
fn main() -> ! {
    match board::init().and_then(run) {
        Ok(never) => match never {},
        Err(err) => board::halt(err),
    }
}

fn run(regs: &'static PeripheralRegisters) -> Result<Infallible, Error> {
    board::enable_clocks(
        regs,
        [
            PeripheralClock::Gpio(FOLLOWED_SENSOR.input.port),
            PeripheralClock::Gpio(FOLLOWED_SENSOR.led.port),
        ],
    )?;
    let mut gpio = regs.gpio();
    let mut timer = board::main_timer(regs)?;
    let mut follower = SensorFollower::new(FOLLOWED_SENSOR);
    follower.setup(&mut gpio)?;

    defmt::info!("sensor_follow: polling");
    loop {
        follower.poll(&mut gpio, &mut timer)?;
    }
}
