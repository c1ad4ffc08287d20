//! Architecture selection.
//!
//! [`PlatformIrq`] names the [`IrqControl`](crate::sync::irq::IrqControl)
//! implementation for whatever target the crate is being built for. On the
//! bare-metal Cortex-M target it masks interrupts through PRIMASK; on a host
//! build (unit tests, simulation) there is nothing to mask.

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "arm", target_os = "none"))] {
        pub mod armv7m;
        pub use armv7m::irq::CortexMIrq as PlatformIrq;
    } else {
        pub mod host;
        pub use host::HostIrq as PlatformIrq;
    }
}
