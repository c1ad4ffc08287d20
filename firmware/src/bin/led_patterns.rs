//! Column chaser on PA0..PA7 followed by the 8x8 matrix fill and sweep.

#![no_std]
#![no_main]

use core::convert::Infallible;

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_probe as _;
use stm32f4 as _;

use drivers::platform::stm32f4::{PeripheralClock, PeripheralRegisters, Port};
use firmware::board::{self, Error};
use firmware::patterns::{self, COLUMN_MASK, COLUMN_PATTERN, COLUMN_PORT, MatrixPattern};

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
        [PeripheralClock::Gpio(Port::A), PeripheralClock::Gpio(Port::B)],
    )?;
    let mut gpio = regs.gpio();
    let mut timer = board::main_timer(regs)?;
    patterns::setup_columns(&mut gpio)?;
    patterns::setup_matrix(&mut gpio)?;

    defmt::info!("led_patterns: running");
    loop {
        patterns::play_frames(&mut gpio, &mut timer, COLUMN_PORT, COLUMN_MASK, &COLUMN_PATTERN)?;
        for pattern in MatrixPattern::ALL {
            patterns::play_matrix(&mut gpio, &mut timer, pattern)?;
        }
    }
}
