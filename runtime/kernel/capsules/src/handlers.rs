// Licensed under the Apache-2.0 license

//! Interrupt handlers for the ingress bridge and the two stream engine
//! directions. They only acknowledge hardware, attempt recovery and
//! publish signals; all sequencing stays with the orchestrator.

use crate::signals::{EngineNotifier, FaultKind, IngressNotifier};
use dma_driver::hil::{IngressEngine, StreamEngine};
use dma_driver::recovery::reset_engine;
use intc_driver::hil::IrqHandler;

pub struct IngressHandler<'a> {
    engine: &'a dyn IngressEngine,
    notifier: IngressNotifier<'a>,
}

impl<'a> IngressHandler<'a> {
    pub fn new(engine: &'a dyn IngressEngine, notifier: IngressNotifier<'a>) -> Self {
        IngressHandler { engine, notifier }
    }
}

impl IrqHandler for IngressHandler<'_> {
    fn handle_irq(&self) {
        // Drop the line first so the next arrival latches again.
        self.engine.acknowledge();
        self.notifier.notify();
    }
}

/// Services one direction of a stream engine.
pub struct StreamCompletionHandler<'a> {
    engine: &'a dyn StreamEngine,
    notifier: EngineNotifier<'a>,
    reset_polls: u32,
}

impl<'a> StreamCompletionHandler<'a> {
    pub fn new(
        engine: &'a dyn StreamEngine,
        notifier: EngineNotifier<'a>,
        reset_polls: u32,
    ) -> Self {
        StreamCompletionHandler {
            engine,
            notifier,
            reset_polls,
        }
    }
}

impl IrqHandler for StreamCompletionHandler<'_> {
    fn handle_irq(&self) {
        let direction = self.notifier.direction();
        let status = self.engine.pending_interrupts(direction);
        self.engine.acknowledge_interrupts(direction, status);

        // Nothing of ours is pending; the line may be shared.
        if status.irq_bits().is_empty() {
            return;
        }

        // An error ends the transfer, even if completion is also flagged.
        if status.is_error() {
            let kind = match reset_engine(self.engine, self.reset_polls) {
                Ok(_) => FaultKind::Recovered,
                Err(_) => FaultKind::ResetTimeout,
            };
            self.notifier.fault(kind);
            return;
        }

        if status.is_complete() {
            self.notifier.complete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{CompletionFlags, CompletionSignals};
    use dma_driver::hil::{Direction, EngineStatus};
    use loopback_testing::{SimIngress, SimIntc, SimStreamEngine};

    #[test]
    fn completion_sets_done_only() {
        let intc = SimIntc::new(4);
        let engine = SimStreamEngine::new(&intc, 2, 3);
        let mut signals = CompletionSignals::new();
        let (notifiers, observer) = signals.split();
        let handler = StreamCompletionHandler::new(&engine, notifiers.outbound, 8);

        engine.set_status(Direction::Outbound, EngineStatus::COMPLETE);
        handler.handle_irq();

        assert_eq!(
            observer.flags(),
            CompletionFlags {
                outbound_done: true,
                ..Default::default()
            }
        );
        assert_eq!(engine.resets(), 0);
        assert_eq!(
            engine.status(Direction::Outbound),
            EngineStatus::empty(),
            "completion bit must be acknowledged"
        );
    }

    #[test]
    fn error_raises_fault_and_resets_once() {
        let intc = SimIntc::new(4);
        let engine = SimStreamEngine::new(&intc, 2, 3);
        let mut signals = CompletionSignals::new();
        let (notifiers, observer) = signals.split();
        let handler = StreamCompletionHandler::new(&engine, notifiers.inbound, 8);

        engine.set_status(
            Direction::Inbound,
            EngineStatus::DECODE_ERROR | EngineStatus::ERROR | EngineStatus::COMPLETE,
        );
        handler.handle_irq();

        assert!(observer.error_raised());
        assert!(!observer.done(Direction::Inbound));
        assert_eq!(observer.fault(Direction::Inbound), Some(FaultKind::Recovered));
        assert_eq!(observer.fault(Direction::Outbound), None);
        assert_eq!(engine.resets(), 1);
        assert_eq!(
            engine.acknowledged(Direction::Inbound),
            EngineStatus::ERROR | EngineStatus::COMPLETE
        );
    }

    #[test]
    fn stuck_reset_is_reported_distinctly() {
        let intc = SimIntc::new(4);
        let engine = SimStreamEngine::new(&intc, 2, 3);
        engine.set_reset_completes_after(None);
        let mut signals = CompletionSignals::new();
        let (notifiers, observer) = signals.split();
        let handler = StreamCompletionHandler::new(&engine, notifiers.outbound, 8);

        engine.set_status(
            Direction::Outbound,
            EngineStatus::SLAVE_ERROR | EngineStatus::ERROR,
        );
        handler.handle_irq();

        assert_eq!(
            observer.fault(Direction::Outbound),
            Some(FaultKind::ResetTimeout)
        );
        assert!(!observer.done(Direction::Outbound));
        assert_eq!(engine.resets(), 1);
        assert_eq!(engine.reset_polls(), 8);
    }

    #[test]
    fn foreign_interrupt_changes_nothing() {
        let intc = SimIntc::new(4);
        let engine = SimStreamEngine::new(&intc, 2, 3);
        let mut signals = CompletionSignals::new();
        let (notifiers, observer) = signals.split();
        let handler = StreamCompletionHandler::new(&engine, notifiers.outbound, 8);

        handler.handle_irq();
        // error detail without the error interrupt is not ours to act on
        engine.set_status(Direction::Outbound, EngineStatus::INTERNAL_ERROR);
        handler.handle_irq();

        assert_eq!(observer.flags(), CompletionFlags::default());
        assert_eq!(engine.resets(), 0);
    }

    #[test]
    fn error_detail_without_error_interrupt_still_completes() {
        let intc = SimIntc::new(4);
        let engine = SimStreamEngine::new(&intc, 2, 3);
        let mut signals = CompletionSignals::new();
        let (notifiers, observer) = signals.split();
        let handler = StreamCompletionHandler::new(&engine, notifiers.outbound, 8);

        engine.set_status(
            Direction::Outbound,
            EngineStatus::COMPLETE | EngineStatus::INTERNAL_ERROR,
        );
        handler.handle_irq();

        assert!(observer.done(Direction::Outbound));
        assert!(!observer.error_raised());
        assert_eq!(engine.resets(), 0);
        assert_eq!(engine.acknowledged(Direction::Outbound), EngineStatus::COMPLETE);
    }

    #[test]
    fn delay_interrupt_is_acknowledged_without_completion() {
        let intc = SimIntc::new(4);
        let engine = SimStreamEngine::new(&intc, 2, 3);
        let mut signals = CompletionSignals::new();
        let (notifiers, observer) = signals.split();
        let handler = StreamCompletionHandler::new(&engine, notifiers.inbound, 8);

        engine.set_status(Direction::Inbound, EngineStatus::DELAY);
        handler.handle_irq();

        assert_eq!(observer.flags(), CompletionFlags::default());
        assert_eq!(engine.status(Direction::Inbound), EngineStatus::empty());
    }

    #[test]
    fn ingress_acknowledges_then_notifies() {
        let intc = SimIntc::new(4);
        let ingress = SimIngress::new(&intc, 0);
        let mut signals = CompletionSignals::new();
        let (notifiers, observer) = signals.split();
        let handler = IngressHandler::new(&ingress, notifiers.ingress);

        ingress.arrive();
        assert!(ingress.latched());
        handler.handle_irq();

        assert!(!ingress.latched());
        assert_eq!(ingress.acknowledgements(), 1);
        assert!(observer.ingress_arrived());
    }
}
