//! Line 0 demo: PA5 stays lit and blinks on every edge of the line 0 input.
//!
//! Line 0 follows one port at a time. PB0 (rising) is bound by default;
//! set `USE_PA0` to bind PA0 on its falling edge instead.

#![no_std]
#![no_main]

use core::convert::Infallible;

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_probe as _;
use stm32f4::stm32f401::interrupt;

use drivers::hal::gpio::GpioController;
use drivers::platform::stm32f4::{LineGroup, PeripheralRegisters};
use firmware::board::{self, Error};
use firmware::config::{LINE0_FALLING, LINE0_LED, LINE0_PB0};

const USE_PA0: bool = false;

#[entry]
fn main() -> ! {
    match board::init().and_then(run) {
        Ok(never) => match never {},
        Err(err) => board::halt(err),
    }
}

fn run(regs: &'static PeripheralRegisters) -> Result<Infallible, Error> {
    let binding = if USE_PA0 { &LINE0_FALLING } else { &LINE0_PB0 };
    board::install(regs, core::slice::from_ref(binding))?;

    let mut gpio = regs.gpio();
    defmt::info!("exti_line0: line 0 on port {}", defmt::Debug2Format(&binding.source.port));
    loop {
        gpio.set_high(LINE0_LED)?;
        cortex_m::asm::wfi();
    }
}

#[interrupt]
fn EXTI0() {
    board::service(LineGroup::Exti0);
}
