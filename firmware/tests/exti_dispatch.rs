//! Binding, dispatch and pending-flag handling against the simulated
//! SYSCFG/EXTI/NVIC blocks.

use core::sync::atomic::{AtomicU32, Ordering};

use drivers::hal::exti::{Edge, ExternalInterrupts, LineNumber};
use drivers::hw::stm32f4::irq_numbers;
use drivers::platform::stm32f4::{LineGroup, PORT_COUNT, Port, Stm32Exti, Stm32Gpio};
use drivers::sim::{SimExti, SimGpio, SimNvic, SimRegisters};
use firmware::action::{self, InterruptBinding};
use firmware::config::{EXTI_BLINK_BINDINGS, LINE0_FALLING, LINE0_PB0};
use firmware::irq::{LineAction, LineDispatcher};

struct Counter(AtomicU32);

impl Counter {
    const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    fn hits(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

impl LineAction for Counter {
    fn on_edge(&self, _line: LineNumber) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct Board {
    gpio: [SimGpio; PORT_COUNT],
    syscfg: SimRegisters<16>,
    exti: SimExti,
    nvic: SimNvic,
}

impl Board {
    fn new() -> Self {
        Self {
            gpio: core::array::from_fn(|_| SimGpio::new()),
            syscfg: SimRegisters::new(),
            exti: SimExti::new(),
            nvic: SimNvic::new(),
        }
    }

    fn gpio(&self) -> Stm32Gpio<&SimGpio> {
        Stm32Gpio::new(self.gpio.each_ref())
    }

    fn exti(&self) -> Stm32Exti<&SimRegisters<16>, &SimExti, &SimNvic> {
        Stm32Exti::new(&self.syscfg, &self.exti, &self.nvic)
    }

    fn install(&self, binding: &InterruptBinding, handler: &'static dyn LineAction, dispatcher: &LineDispatcher) {
        action::install(binding, handler, &mut self.gpio(), &mut self.exti(), dispatcher).unwrap();
    }
}

#[test]
fn rebinding_line_zero_moves_it_to_the_new_port() {
    static PA0_HITS: Counter = Counter::new();
    static PB0_HITS: Counter = Counter::new();
    let board = Board::new();
    let dispatcher = LineDispatcher::new();
    let mut exti = board.exti();

    board.install(&LINE0_FALLING, &PA0_HITS, &dispatcher);
    board.install(&LINE0_PB0, &PB0_HITS, &dispatcher);

    assert_eq!(exti.source(0), Ok(Some(Port::B)));
    assert!(!board.exti.inject_pin_edge(&board.syscfg, LINE0_FALLING.source, Edge::BOTH));
    assert!(board.exti.inject_pin_edge(&board.syscfg, LINE0_PB0.source, Edge::RISING));

    assert_eq!(dispatcher.dispatch(LineGroup::Exti0, &mut exti), Ok(1));
    assert_eq!(PA0_HITS.hits(), 0);
    assert_eq!(PB0_HITS.hits(), 1);
}

#[test]
fn every_serviced_line_is_cleared() {
    static HITS: [Counter; 3] = [Counter::new(), Counter::new(), Counter::new()];
    let board = Board::new();
    let dispatcher = LineDispatcher::new();
    let mut exti = board.exti();

    for (binding, counter) in EXTI_BLINK_BINDINGS.iter().zip(&HITS) {
        board.install(binding, counter, &dispatcher);
        assert!(board.exti.inject_edge(binding.line(), Edge::RISING));
    }
    assert!(board.nvic.enabled(irq_numbers::EXTI0));
    assert!(board.nvic.enabled(irq_numbers::EXTI1));
    assert!(board.nvic.enabled(irq_numbers::EXTI15_10));

    for group in [LineGroup::Exti0, LineGroup::Exti1, LineGroup::Exti15_10] {
        assert_eq!(dispatcher.dispatch(group, &mut exti), Ok(1));
    }
    assert_eq!(board.exti.pending(), 0);
    assert!(HITS.iter().all(|counter| counter.hits() == 1));
    // A second pass finds nothing left to do.
    assert_eq!(dispatcher.dispatch(LineGroup::Exti15_10, &mut exti), Ok(0));
}

#[test]
fn edges_during_a_pending_flag_coalesce() {
    static HITS: Counter = Counter::new();
    let board = Board::new();
    let dispatcher = LineDispatcher::new();
    let mut exti = board.exti();
    board.install(&LINE0_PB0, &HITS, &dispatcher);

    // Two presses before the handler gets to run.
    assert!(board.exti.inject_edge(0, Edge::RISING));
    assert!(board.exti.inject_edge(0, Edge::RISING));
    assert_eq!(dispatcher.dispatch(LineGroup::Exti0, &mut exti), Ok(1));
    assert_eq!(HITS.hits(), 1);
    assert_eq!(board.exti.pending(), 0);

    // A later press is serviced again.
    assert!(board.exti.inject_edge(0, Edge::RISING));
    assert_eq!(dispatcher.dispatch(LineGroup::Exti0, &mut exti), Ok(1));
    assert_eq!(HITS.hits(), 2);
}

#[test]
fn install_prepares_input_and_outputs() {
    static HITS: Counter = Counter::new();
    let board = Board::new();
    let dispatcher = LineDispatcher::new();

    board.install(&EXTI_BLINK_BINDINGS[2], &HITS, &dispatcher);

    let porta = &board.gpio[0];
    assert_eq!(porta.mode(15), 0b00);
    assert_eq!(porta.pull(15), 0b10);
    assert_eq!(porta.mode(7), 0b01);
    assert_eq!(porta.odr() & (1 << 7), 0);
    assert_eq!(board.exti().edges(15), Ok(Edge::RISING));
}
