//! Three buttons on PA0, PA1 and PA15, each blinking its own LED.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_probe as _;
use stm32f4::stm32f401::interrupt;

use drivers::platform::stm32f4::LineGroup;
use firmware::board;
use firmware::config::EXTI_BLINK_BINDINGS;

#[entry]
fn main() -> ! {
    let installed = board::init().and_then(|regs| board::install(regs, &EXTI_BLINK_BINDINGS));
    if let Err(err) = installed {
        board::halt(err);
    }

    defmt::info!("exti_blink: waiting for PA0 / PA1 / PA15");
    board::park()
}

#[interrupt]
fn EXTI0() {
    board::service(LineGroup::Exti0);
}

#[interrupt]
fn EXTI1() {
    board::service(LineGroup::Exti1);
}

#[interrupt]
fn EXTI15_10() {
    board::service(LineGroup::Exti15_10);
}
