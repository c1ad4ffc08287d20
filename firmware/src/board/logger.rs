//! `log` records forwarded to defmt over RTT.
//!
//! The drivers log through the `log` facade; this formats each record into
//! a fixed buffer and hands it to defmt at the matching level.

use core::fmt::Write;

use heapless::String;
use log::{Level, LevelFilter, Metadata, Record};

/// Longer messages are cut off.
const LINE_CAPACITY: usize = 128;

struct DefmtLogger;

static LOGGER: DefmtLogger = DefmtLogger;

impl log::Log for DefmtLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut line: String<LINE_CAPACITY> = String::new();
        // Overflow leaves whatever fit.
        let _ = write!(line, "{}", record.args());
        let (target, text) = (record.target(), line.as_str());

        match record.level() {
            Level::Error => defmt::error!("[{=str}] {=str}", target, text),
            Level::Warn => defmt::warn!("[{=str}] {=str}", target, text),
            Level::Info => defmt::info!("[{=str}] {=str}", target, text),
            Level::Debug => defmt::debug!("[{=str}] {=str}", target, text),
            Level::Trace => defmt::trace!("[{=str}] {=str}", target, text),
        }
    }

    fn flush(&self) {}
}

/// Install the bridge. Later calls are ignored.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}
