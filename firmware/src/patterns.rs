//! LED Patterns
//!
//! Frame tables for the column and matrix demos. A frame is a set of lit
//! pins and how long to hold them; playing a frame is one BSRR write per
//! port followed by a delay, so all pins of a frame change together.

use drivers::hal::gpio::PinMode;
use drivers::hal::timer::Delay;
use drivers::hw::mmio::RegisterBus;
use drivers::platform::stm32f4::{GpioError, Port, Stm32Gpio};
use log::trace;

/// Pins lit on one port and the hold time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Frame {
    pub set: u16,
    pub hold_ms: u32,
}

impl Frame {
    pub const fn new(set: u16, hold_ms: u32) -> Self {
        Self { set, hold_ms }
    }
}

/// Eight column LEDs on PA0..PA7.
pub const COLUMN_PORT: Port = Port::A;
pub const COLUMN_MASK: u16 = 0x00FF;

/// Chaser across the eight columns, then four alternating groups, each
/// shown and then blanked.
pub const COLUMN_PATTERN: [Frame; 17] = column_pattern();

const fn column_pattern() -> [Frame; 17] {
    const GROUPS: [u16; 4] = [0xAA, 0x55, 0x0F, 0xF0];

    let mut frames = [Frame::new(0, 0); 17];
    let mut n = 0;
    while n < 8 {
        frames[n] = Frame::new(1 << n, 100);
        n += 1;
    }
    frames[8] = Frame::new(0, 100);

    let mut g = 0;
    while g < GROUPS.len() {
        frames[9 + 2 * g] = Frame::new(GROUPS[g], 700);
        frames[10 + 2 * g] = Frame::new(0, 700);
        g += 1;
    }
    frames
}

/// Configure the column pins as outputs, all off.
pub fn setup_columns<B: RegisterBus>(gpio: &mut Stm32Gpio<B>) -> Result<(), GpioError> {
    gpio.set_mode_mask(COLUMN_PORT, COLUMN_MASK, PinMode::Output)?;
    gpio.write_mask(COLUMN_PORT, 0, COLUMN_MASK);
    Ok(())
}

/// Show each frame on `port`, pins outside `mask` untouched.
pub fn play_frames<B, D>(
    gpio: &mut Stm32Gpio<B>,
    delay: &mut D,
    port: Port,
    mask: u16,
    frames: &[Frame],
) -> Result<(), D::Error>
where
    B: RegisterBus,
    D: Delay,
{
    for frame in frames {
        let set = frame.set & mask;
        gpio.write_mask(port, set, mask & !set);
        delay.delay_ms(frame.hold_ms)?;
    }
    Ok(())
}

// ============================================================================
// 8x8 Matrix
// ============================================================================

/// Row drivers, PA0..PA7.
pub const ROW_PORT: Port = Port::A;
pub const ROW_MASK: u16 = 0x00FF;

/// Column drivers. PB3/PB4 carry the debug port and are skipped.
pub const COLUMN_PINS: [u8; 8] = [0, 1, 2, 5, 6, 7, 8, 9];
pub const MATRIX_COLUMN_PORT: Port = Port::B;
pub const MATRIX_COLUMN_MASK: u16 = column_mask();

const fn column_mask() -> u16 {
    let mut mask = 0;
    let mut n = 0;
    while n < COLUMN_PINS.len() {
        mask |= 1 << COLUMN_PINS[n];
        n += 1;
    }
    mask
}

/// One matrix frame: row mask on PA, column mask on PB.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MatrixFrame {
    pub rows: u16,
    pub columns: u16,
    pub hold_ms: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatrixPattern {
    /// Columns switch on one by one and stay on; the full matrix is held.
    Fill,
    /// One column at a time, then blank.
    Sweep,
}

impl MatrixPattern {
    pub const ALL: [MatrixPattern; 2] = [MatrixPattern::Fill, MatrixPattern::Sweep];

    pub fn frames(self) -> impl Iterator<Item = MatrixFrame> {
        let last = COLUMN_PINS.len() - 1;
        let mut lit = 0u16;
        let blank = match self {
            MatrixPattern::Fill => None,
            MatrixPattern::Sweep => Some(MatrixFrame {
                rows: ROW_MASK,
                columns: 0,
                hold_ms: 100,
            }),
        };

        COLUMN_PINS
            .into_iter()
            .enumerate()
            .map(move |(n, pin)| {
                let column: u16 = 1 << pin;
                match self {
                    MatrixPattern::Fill => {
                        lit |= column;
                        MatrixFrame {
                            rows: ROW_MASK,
                            columns: lit,
                            hold_ms: if n == last { 500 } else { 100 },
                        }
                    }
                    MatrixPattern::Sweep => MatrixFrame {
                        rows: ROW_MASK,
                        columns: column,
                        hold_ms: 100,
                    },
                }
            })
            .chain(blank)
    }
}

/// Configure rows and columns as outputs, all off.
pub fn setup_matrix<B: RegisterBus>(gpio: &mut Stm32Gpio<B>) -> Result<(), GpioError> {
    gpio.set_mode_mask(ROW_PORT, ROW_MASK, PinMode::Output)?;
    gpio.set_mode_mask(MATRIX_COLUMN_PORT, MATRIX_COLUMN_MASK, PinMode::Output)?;
    matrix_off(gpio);
    Ok(())
}

pub fn matrix_off<B: RegisterBus>(gpio: &mut Stm32Gpio<B>) {
    gpio.write_mask(ROW_PORT, 0, ROW_MASK);
    gpio.write_mask(MATRIX_COLUMN_PORT, 0, MATRIX_COLUMN_MASK);
}

/// Play `pattern` once and leave the matrix dark.
pub fn play_matrix<B, D>(
    gpio: &mut Stm32Gpio<B>,
    delay: &mut D,
    pattern: MatrixPattern,
) -> Result<(), D::Error>
where
    B: RegisterBus,
    D: Delay,
{
    trace!("matrix {:?}", pattern);
    for frame in pattern.frames() {
        gpio.write_mask(ROW_PORT, frame.rows, ROW_MASK & !frame.rows);
        gpio.write_mask(
            MATRIX_COLUMN_PORT,
            frame.columns,
            MATRIX_COLUMN_MASK & !frame.columns,
        );
        delay.delay_ms(frame.hold_ms)?;
    }
    matrix_off(gpio);
    Ok(())
}
