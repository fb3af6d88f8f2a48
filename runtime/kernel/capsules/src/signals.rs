// Licensed under the Apache-2.0 license

//! Completion signals passed from interrupt handlers to the foreground
//! orchestrator.
//!
//! Every signal has one writer, the handler of its interrupt source, and
//! one reader, the orchestrator, which is also the only one that clears
//! it. [`CompletionSignals::split`] hands out one handle per writer and a
//! single observer, so the discipline is held by ownership rather than by
//! convention. Only plain loads and stores are used, which every target
//! provides for word-sized atomics.

use dma_driver::hil::Direction;
use portable_atomic::{AtomicBool, AtomicU8, Ordering};

const NO_FAULT: u8 = 0;
const FAULT_RECOVERED: u8 = 1;
const FAULT_RESET_TIMEOUT: u8 = 2;

/// How a stream engine fault ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKind {
    /// The engine errored and its reset completed.
    Recovered,
    /// The engine errored and did not come out of reset.
    ResetTimeout,
}

impl FaultKind {
    fn encode(self) -> u8 {
        match self {
            FaultKind::Recovered => FAULT_RECOVERED,
            FaultKind::ResetTimeout => FAULT_RESET_TIMEOUT,
        }
    }

    fn decode(raw: u8) -> Option<FaultKind> {
        match raw {
            FAULT_RECOVERED => Some(FaultKind::Recovered),
            FAULT_RESET_TIMEOUT => Some(FaultKind::ResetTimeout),
            _ => None,
        }
    }
}

/// Point-in-time copy of the four flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompletionFlags {
    pub ingress_arrived: bool,
    pub outbound_done: bool,
    pub inbound_done: bool,
    pub error_raised: bool,
}

/// Backing storage for the signals. Lives for the whole program, usually
/// in a static.
pub struct CompletionSignals {
    ingress_arrived: AtomicBool,
    outbound_done: AtomicBool,
    inbound_done: AtomicBool,
    outbound_fault: AtomicU8,
    inbound_fault: AtomicU8,
}

impl Default for CompletionSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSignals {
    pub const fn new() -> Self {
        CompletionSignals {
            ingress_arrived: AtomicBool::new(false),
            outbound_done: AtomicBool::new(false),
            inbound_done: AtomicBool::new(false),
            outbound_fault: AtomicU8::new(NO_FAULT),
            inbound_fault: AtomicU8::new(NO_FAULT),
        }
    }

    /// Split into the writer handles for the interrupt handlers and the
    /// observer for the orchestrator. All signals start cleared.
    pub fn split(&mut self) -> (Notifiers<'_>, SignalObserver<'_>) {
        let signals: &CompletionSignals = self;
        let observer = SignalObserver { signals };
        observer.clear_all();
        let notifiers = Notifiers {
            ingress: IngressNotifier { signals },
            outbound: EngineNotifier {
                signals,
                direction: Direction::Outbound,
            },
            inbound: EngineNotifier {
                signals,
                direction: Direction::Inbound,
            },
        };
        (notifiers, observer)
    }

    fn done(&self, direction: Direction) -> &AtomicBool {
        match direction {
            Direction::Outbound => &self.outbound_done,
            Direction::Inbound => &self.inbound_done,
        }
    }

    fn fault(&self, direction: Direction) -> &AtomicU8 {
        match direction {
            Direction::Outbound => &self.outbound_fault,
            Direction::Inbound => &self.inbound_fault,
        }
    }
}

/// One writer handle per interrupt source.
pub struct Notifiers<'a> {
    pub ingress: IngressNotifier<'a>,
    pub outbound: EngineNotifier<'a>,
    pub inbound: EngineNotifier<'a>,
}

pub struct IngressNotifier<'a> {
    signals: &'a CompletionSignals,
}

impl IngressNotifier<'_> {
    pub fn notify(&self) {
        self.signals.ingress_arrived.store(true, Ordering::Release);
    }
}

pub struct EngineNotifier<'a> {
    signals: &'a CompletionSignals,
    direction: Direction,
}

impl EngineNotifier<'_> {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn complete(&self) {
        self.signals
            .done(self.direction)
            .store(true, Ordering::Release);
    }

    /// Record a fault. Published once the recovery attempt has finished so
    /// the observer sees how it ended.
    pub fn fault(&self, kind: FaultKind) {
        self.signals
            .fault(self.direction)
            .store(kind.encode(), Ordering::Release);
    }
}

/// The single reader (and clearer) of the signals.
pub struct SignalObserver<'a> {
    signals: &'a CompletionSignals,
}

impl SignalObserver<'_> {
    pub fn clear_all(&self) {
        self.clear_ingress();
        for direction in Direction::ALL {
            self.clear_engine(direction);
        }
    }

    pub fn clear_ingress(&self) {
        self.signals
            .ingress_arrived
            .store(false, Ordering::Release);
    }

    /// Clear the done flag and any fault of one engine direction.
    pub fn clear_engine(&self, direction: Direction) {
        self.signals.done(direction).store(false, Ordering::Release);
        self.signals
            .fault(direction)
            .store(NO_FAULT, Ordering::Release);
    }

    pub fn ingress_arrived(&self) -> bool {
        self.signals.ingress_arrived.load(Ordering::Acquire)
    }

    pub fn done(&self, direction: Direction) -> bool {
        self.signals.done(direction).load(Ordering::Acquire)
    }

    pub fn fault(&self, direction: Direction) -> Option<FaultKind> {
        FaultKind::decode(self.signals.fault(direction).load(Ordering::Acquire))
    }

    /// First direction with a fault recorded, outbound before inbound.
    pub fn first_fault(&self) -> Option<(Direction, FaultKind)> {
        Direction::ALL
            .into_iter()
            .find_map(|direction| self.fault(direction).map(|kind| (direction, kind)))
    }

    pub fn error_raised(&self) -> bool {
        self.first_fault().is_some()
    }

    pub fn flags(&self) -> CompletionFlags {
        CompletionFlags {
            ingress_arrived: self.ingress_arrived(),
            outbound_done: self.done(Direction::Outbound),
            inbound_done: self.done(Direction::Inbound),
            error_raised: self.error_raised(),
        }
    }
}
