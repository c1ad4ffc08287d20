//! Register-level peripheral models.
//!
//! Each model implements [`RegisterBus`](crate::hw::mmio::RegisterBus) and
//! reproduces the side effects drivers rely on: write-1-to-clear flags,
//! shadow registers, read-only status bits. Time in [`SimTimer`] only moves
//! when software looks at the status register, so a polled wait advances
//! the model one counter tick per poll and tests are deterministic.
//!
//! Single-threaded, `Cell` based. Share a model between a driver and the
//! test by handing the driver a `&Model`.

mod exti;
mod gpio;
mod nvic;
mod rcc;
mod registers;
mod timer;

pub use exti::SimExti;
pub use gpio::SimGpio;
pub use nvic::SimNvic;
pub use rcc::SimRcc;
pub use registers::SimRegisters;
pub use timer::SimTimer;
