//! Platform Abstraction Layer
//!
//! Each supported chip implements the [`Platform`] trait: bring the clock
//! tree up and hand out its register blocks. Interrupt lines are gated by
//! the interrupt controller driver those blocks produce.
//!
//! # Usage
//!
//! ```no_run
//! use drivers::platform::{CurrentPlatform, Platform};
//! use drivers::platform::stm32f4::ClockConfig;
//!
//! let regs = unsafe { CurrentPlatform::init(&ClockConfig::hse(25_000_000)) }
//!     .expect("clock bring-up");
//! let _exti = regs.exti();
//! ```

/// Platform trait - implemented by each supported chip
pub trait Platform {
    /// Register blocks owned by the platform.
    type Registers: 'static;

    /// Clock tree settings applied by [`init`](Self::init).
    type ClockConfig;

    type Error: core::fmt::Debug;

    /// Platform name for debugging
    fn name() -> &'static str;

    /// Bring up the system clock and map the register blocks.
    ///
    /// # Safety
    /// Must only be called once, before any driver touches hardware, and
    /// only on the chip this platform describes.
    unsafe fn init(config: &Self::ClockConfig) -> Result<&'static Self::Registers, Self::Error>;

    /// Register blocks, once [`init`](Self::init) has succeeded.
    fn registers() -> Option<&'static Self::Registers>;
}

// Platform selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "stm32f4")] {
        pub mod stm32f4;
        pub use stm32f4::Stm32f4Platform as CurrentPlatform;
    } else {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features stm32f4"
        );
    }
}
