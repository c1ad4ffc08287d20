//! STM32F4 External Interrupt Driver
//!
//! Binding a GPIO line takes three blocks: SYSCFG picks which port feeds the
//! line, EXTI arms the edges and latches the pending flag, and the NVIC
//! unmasks the vector the line shares with its group.

use core::ops::RangeInclusive;

use log::{debug, warn};

use super::gpio::{PinId, Port};
use super::nvic::{NvicError, Stm32Nvic};
use crate::hal::exti::{Edge, ExternalInterrupts, LineNumber};
use crate::hal::interrupt::{InterruptController, IrqNumber};
use crate::hw::mmio::RegisterBus;
use crate::hw::stm32f4::exti::*;
use crate::hw::stm32f4::irq_numbers;
use crate::hw::stm32f4::syscfg::{EXTI_SELECTOR_BITS, exticr, exticr_shift};

/// EXTI driver errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExtiError {
    /// Not a GPIO-routed line (0..=15).
    InvalidLine(LineNumber),
    /// Pin index outside 0..=15.
    InvalidPin(u8),
    /// Line `n` can only be fed from pin `n` of some port.
    LineMismatch { pin: u8, line: LineNumber },
    /// No edge selected, the line could never fire.
    NoEdge,
    Nvic(NvicError),
}

impl From<NvicError> for ExtiError {
    fn from(err: NvicError) -> Self {
        ExtiError::Nvic(err)
    }
}

/// Lines that share one NVIC vector.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineGroup {
    Exti0,
    Exti1,
    Exti2,
    Exti3,
    Exti4,
    Exti9_5,
    Exti15_10,
}

impl LineGroup {
    pub const ALL: [LineGroup; 7] = [
        LineGroup::Exti0,
        LineGroup::Exti1,
        LineGroup::Exti2,
        LineGroup::Exti3,
        LineGroup::Exti4,
        LineGroup::Exti9_5,
        LineGroup::Exti15_10,
    ];

    /// Group serving `line`.
    pub const fn of(line: LineNumber) -> Option<Self> {
        match line {
            0 => Some(LineGroup::Exti0),
            1 => Some(LineGroup::Exti1),
            2 => Some(LineGroup::Exti2),
            3 => Some(LineGroup::Exti3),
            4 => Some(LineGroup::Exti4),
            5..=9 => Some(LineGroup::Exti9_5),
            10..=15 => Some(LineGroup::Exti15_10),
            _ => None,
        }
    }

    pub const fn lines(self) -> RangeInclusive<LineNumber> {
        match self {
            LineGroup::Exti0 => 0..=0,
            LineGroup::Exti1 => 1..=1,
            LineGroup::Exti2 => 2..=2,
            LineGroup::Exti3 => 3..=3,
            LineGroup::Exti4 => 4..=4,
            LineGroup::Exti9_5 => 5..=9,
            LineGroup::Exti15_10 => 10..=15,
        }
    }

    /// NVIC position of the group's vector.
    pub const fn irq(self) -> IrqNumber {
        match self {
            LineGroup::Exti0 => irq_numbers::EXTI0,
            LineGroup::Exti1 => irq_numbers::EXTI1,
            LineGroup::Exti2 => irq_numbers::EXTI2,
            LineGroup::Exti3 => irq_numbers::EXTI3,
            LineGroup::Exti4 => irq_numbers::EXTI4,
            LineGroup::Exti9_5 => irq_numbers::EXTI9_5,
            LineGroup::Exti15_10 => irq_numbers::EXTI15_10,
        }
    }

    /// IMR bits of every line in the group.
    fn mask(self) -> u32 {
        self.lines().fold(0, |mask, line| mask | (1 << line))
    }
}

fn check_line(line: LineNumber) -> Result<u32, ExtiError> {
    if usize::from(line) < GPIO_LINE_COUNT {
        Ok(1 << line)
    } else {
        Err(ExtiError::InvalidLine(line))
    }
}

/// EXTI driver over the SYSCFG, EXTI and NVIC register blocks.
pub struct Stm32Exti<S, E, N> {
    syscfg: S,
    exti: E,
    nvic: Stm32Nvic<N>,
}

impl<S: RegisterBus, E: RegisterBus, N: RegisterBus> Stm32Exti<S, E, N> {
    /// SYSCFG's clock must already be enabled.
    pub fn new(syscfg: S, exti: E, nvic: N) -> Self {
        Self {
            syscfg,
            exti,
            nvic: Stm32Nvic::new(nvic),
        }
    }

    /// Edges armed on `line`.
    pub fn edges(&self, line: LineNumber) -> Result<Edge, ExtiError> {
        let bit = check_line(line)?;
        let mut edge = Edge::empty();
        edge.set(Edge::RISING, self.exti.is_set(RTSR, bit));
        edge.set(Edge::FALLING, self.exti.is_set(FTSR, bit));
        Ok(edge)
    }

    /// Whether `line` is unmasked.
    pub fn is_bound(&self, line: LineNumber) -> Result<bool, ExtiError> {
        let bit = check_line(line)?;
        Ok(self.exti.is_set(IMR, bit))
    }

    /// Lines of `group` with a latched edge, as an IMR-style mask.
    pub fn pending_in(&self, group: LineGroup) -> u32 {
        self.exti.read(PR) & group.mask()
    }

    fn set_trigger(&self, offset: usize, bit: u32, armed: bool) {
        if armed {
            self.exti.set_bits(offset, bit);
        } else {
            self.exti.clear_bits(offset, bit);
        }
    }
}

impl<S: RegisterBus, E: RegisterBus, N: RegisterBus> ExternalInterrupts for Stm32Exti<S, E, N> {
    type Pin = PinId;
    type Port = Port;
    type Error = ExtiError;

    fn bind_line(&mut self, pin: PinId, line: LineNumber, edge: Edge) -> Result<(), ExtiError> {
        let bit = check_line(line)?;
        if usize::from(pin.index) >= GPIO_LINE_COUNT {
            return Err(ExtiError::InvalidPin(pin.index));
        }
        if pin.index != line {
            return Err(ExtiError::LineMismatch {
                pin: pin.index,
                line,
            });
        }
        if edge.is_empty() {
            return Err(ExtiError::NoEdge);
        }

        if let Some(previous) = self.source(line)?
            && previous != pin.port
            && self.exti.is_set(IMR, bit)
        {
            warn!("EXTI{} moves from port {:?} to {:?}", line, previous, pin.port);
        }

        // Masked while the route changes so a glitch cannot latch.
        self.exti.clear_bits(IMR, bit);
        self.syscfg.write_field(
            exticr(line),
            exticr_shift(line),
            EXTI_SELECTOR_BITS,
            pin.port.exti_code(),
        );
        self.set_trigger(RTSR, bit, edge.contains(Edge::RISING));
        self.set_trigger(FTSR, bit, edge.contains(Edge::FALLING));
        self.exti.write(PR, bit);
        self.exti.set_bits(IMR, bit);

        if let Some(group) = LineGroup::of(line) {
            self.nvic.enable(group.irq())?;
        }

        debug!(
            "EXTI{} bound to P{:?}{} on {:?}",
            line, pin.port, pin.index, edge
        );
        Ok(())
    }

    fn unbind_line(&mut self, line: LineNumber) -> Result<(), ExtiError> {
        let bit = check_line(line)?;

        self.exti.clear_bits(IMR, bit);
        self.exti.clear_bits(RTSR, bit);
        self.exti.clear_bits(FTSR, bit);
        self.exti.write(PR, bit);

        // The vector stays enabled while another line of the group is live.
        if let Some(group) = LineGroup::of(line)
            && self.exti.read(IMR) & group.mask() == 0
        {
            self.nvic.disable(group.irq())?;
        }

        debug!("EXTI{} unbound", line);
        Ok(())
    }

    fn source(&self, line: LineNumber) -> Result<Option<Port>, ExtiError> {
        check_line(line)?;
        let code = self
            .syscfg
            .read_field(exticr(line), exticr_shift(line), EXTI_SELECTOR_BITS);
        Ok(Port::from_exti_code(code))
    }

    fn is_pending(&self, line: LineNumber) -> Result<bool, ExtiError> {
        let bit = check_line(line)?;
        Ok(self.exti.is_set(PR, bit))
    }

    fn clear_pending(&mut self, line: LineNumber) -> Result<(), ExtiError> {
        let bit = check_line(line)?;
        // Write-1-to-clear: write the one bit, never read-modify-write.
        self.exti.write(PR, bit);
        Ok(())
    }

    fn trigger(&mut self, line: LineNumber) -> Result<(), ExtiError> {
        let bit = check_line(line)?;
        self.exti.write(SWIER, bit);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::stm32f4::syscfg::EXTICR1;
    use crate::sim::{SimExti, SimNvic, SimRegisters};

    struct Rig {
        syscfg: SimRegisters<16>,
        exti: SimExti,
        nvic: SimNvic,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                syscfg: SimRegisters::new(),
                exti: SimExti::new(),
                nvic: SimNvic::new(),
            }
        }

        fn driver(&self) -> Stm32Exti<&SimRegisters<16>, &SimExti, &SimNvic> {
            Stm32Exti::new(&self.syscfg, &self.exti, &self.nvic)
        }
    }

    #[test]
    fn bind_routes_port_and_arms_edge() {
        let rig = Rig::new();
        let mut exti = rig.driver();

        exti.bind_line(PinId::new(Port::B, 6), 6, Edge::RISING).unwrap();

        assert_eq!(exti.source(6), Ok(Some(Port::B)));
        assert_eq!(exti.edges(6), Ok(Edge::RISING));
        assert_eq!(exti.is_bound(6), Ok(true));
        assert!(rig.nvic.enabled(irq_numbers::EXTI9_5));
        // EXTICR2 bits 11:8 hold line 6.
        assert_eq!(rig.syscfg.read(EXTICR1 + 4), 1 << 8);
    }

    #[test]
    fn rebinding_replaces_the_source() {
        let rig = Rig::new();
        let mut exti = rig.driver();

        exti.bind_line(PinId::new(Port::A, 0), 0, Edge::RISING).unwrap();
        exti.bind_line(PinId::new(Port::C, 0), 0, Edge::FALLING).unwrap();

        assert_eq!(exti.source(0), Ok(Some(Port::C)));
        assert_eq!(exti.edges(0), Ok(Edge::FALLING));
        assert!(!rig.exti.inject_pin_edge(&rig.syscfg, PinId::new(Port::A, 0), Edge::FALLING));
        assert!(rig.exti.inject_pin_edge(&rig.syscfg, PinId::new(Port::C, 0), Edge::FALLING));
    }

    #[test]
    fn bind_rejects_bad_arguments() {
        let rig = Rig::new();
        let mut exti = rig.driver();

        assert_eq!(
            exti.bind_line(PinId::new(Port::A, 1), 0, Edge::RISING),
            Err(ExtiError::LineMismatch { pin: 1, line: 0 })
        );
        assert_eq!(
            exti.bind_line(PinId::new(Port::A, 16), 16, Edge::RISING),
            Err(ExtiError::InvalidLine(16))
        );
        assert_eq!(
            exti.bind_line(PinId::new(Port::A, 3), 3, Edge::empty()),
            Err(ExtiError::NoEdge)
        );
        assert_eq!(exti.is_bound(3), Ok(false));
    }

    #[test]
    fn only_selected_edges_latch() {
        let rig = Rig::new();
        let mut exti = rig.driver();
        exti.bind_line(PinId::new(Port::A, 15), 15, Edge::RISING).unwrap();

        assert!(!rig.exti.inject_edge(15, Edge::FALLING));
        assert_eq!(exti.is_pending(15), Ok(false));
        assert!(rig.exti.inject_edge(15, Edge::RISING));
        assert_eq!(exti.is_pending(15), Ok(true));
    }

    #[test]
    fn clear_pending_leaves_other_lines() {
        let rig = Rig::new();
        let mut exti = rig.driver();
        exti.bind_line(PinId::new(Port::A, 10), 10, Edge::BOTH).unwrap();
        exti.bind_line(PinId::new(Port::A, 12), 12, Edge::BOTH).unwrap();

        rig.exti.inject_edge(10, Edge::RISING);
        rig.exti.inject_edge(12, Edge::FALLING);
        assert_eq!(exti.pending_in(LineGroup::Exti15_10), (1 << 10) | (1 << 12));

        exti.clear_pending(10).unwrap();
        assert_eq!(exti.is_pending(10), Ok(false));
        assert_eq!(exti.is_pending(12), Ok(true));
    }

    #[test]
    fn software_trigger_latches_bound_line() {
        let rig = Rig::new();
        let mut exti = rig.driver();
        exti.bind_line(PinId::new(Port::A, 1), 1, Edge::RISING).unwrap();

        exti.trigger(1).unwrap();
        assert_eq!(exti.is_pending(1), Ok(true));
    }

    #[test]
    fn unbind_masks_line_and_shared_vector() {
        let rig = Rig::new();
        let mut exti = rig.driver();
        exti.bind_line(PinId::new(Port::A, 5), 5, Edge::RISING).unwrap();
        exti.bind_line(PinId::new(Port::B, 7), 7, Edge::RISING).unwrap();

        exti.unbind_line(5).unwrap();
        assert_eq!(exti.is_bound(5), Ok(false));
        assert_eq!(exti.edges(5), Ok(Edge::empty()));
        assert!(rig.nvic.enabled(irq_numbers::EXTI9_5));
        assert!(!rig.exti.inject_edge(5, Edge::RISING));

        exti.unbind_line(7).unwrap();
        assert!(!rig.nvic.enabled(irq_numbers::EXTI9_5));
    }

    #[test]
    fn groups_cover_every_line_once() {
        let mut seen = 0u32;
        for group in LineGroup::ALL {
            for line in group.lines() {
                assert_eq!(LineGroup::of(line), Some(group));
                seen |= 1 << line;
            }
        }
        assert_eq!(seen, 0xFFFF);
        assert_eq!(LineGroup::of(16), None);
    }
}
