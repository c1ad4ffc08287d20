//! LED chase on PA8..PA1; the IR sensor on PA0 interrupts it with a
//! PA1..PA8 sweep.

#![no_std]
#![no_main]

use core::convert::Infallible;

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_probe as _;
use stm32f4::stm32f401::interrupt;

use drivers::hal::gpio::GpioController;
use drivers::hal::timer::Delay;
use drivers::platform::stm32f4::{LineGroup, PeripheralRegisters};
use firmware::board::{self, Error};
use firmware::config::{IR_CHASE_STEP_MS, IR_LEDS, IR_SWEEP_BINDING};

#[entry]
fn main() -> ! {
    match board::init().and_then(run) {
        Ok(never) => match never {},
        Err(err) => board::halt(err),
    }
}

fn run(regs: &'static PeripheralRegisters) -> Result<Infallible, Error> {
    board::install(regs, core::slice::from_ref(&IR_SWEEP_BINDING))?;
    let mut gpio = regs.gpio();
    let mut timer = board::main_timer(regs)?;

    defmt::info!("ir_interrupt: chasing, IR on PA0");
    loop {
        for &led in IR_LEDS.iter().rev() {
            gpio.set_high(led)?;
            timer.delay_ms(IR_CHASE_STEP_MS)?;
        }
        for &led in &IR_LEDS {
            gpio.set_low(led)?;
        }
    }
}

#[interrupt]
fn EXTI0() {
    board::service(LineGroup::Exti0);
}
