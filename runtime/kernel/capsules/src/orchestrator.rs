// Licensed under the Apache-2.0 license

//! Foreground sequencer for the host to link loopback.
//!
//! A run walks
//! `Idle -> ArmedForIngress -> IngressReceived -> InboundArmed -> OutboundArmed
//! -> WaitingCompletion -> Verified | Failed`,
//! polling the signals the interrupt handlers publish. Inbound is always
//! armed before outbound so nothing the link returns is dropped, and every
//! signal is cleared before the event that sets it is armed.

use crate::error::LoopbackError;
use crate::frame::{FrameHeader, FRAME_HEADER_LEN};
use crate::signals::{CompletionFlags, FaultKind, SignalObserver};
use crate::verify::{compare, VerifyError};
use dma_driver::hil::{Direction, IngressEngine, LinkStatus, StreamEngine, TransferDescriptor};
use dma_driver::recovery::reset_engine;
use fwtime::{println, spin_until, CacheMaintenance, DmaRegion, HexWord, WaitBudget};
use intc_driver::hil::{IrqSourceControl, IrqSources};
use kernel::ErrorCode;
use loopback_config::LoopbackTuning;

/// First byte of the stream self-test pattern.
pub const STREAM_PATTERN_START: u8 = 0x0c;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopbackState {
    Idle,
    ArmedForIngress,
    IngressReceived,
    InboundArmed,
    OutboundArmed,
    WaitingCompletion,
    Verified,
    Failed,
}

/// Hardware the orchestrator drives.
pub struct LoopbackPeripherals<'a> {
    pub engine: &'a dyn StreamEngine,
    pub ingress: &'a dyn IngressEngine,
    pub sources: &'a dyn IrqSourceControl,
    pub cache: &'a dyn CacheMaintenance,
    pub link: &'a dyn LinkStatus,
}

/// Device memory the transfers use.
#[derive(Clone, Copy, Debug)]
pub struct LoopbackBuffers {
    /// Filled by the host. Outbound transfers read from here.
    pub ingress: DmaRegion,
    /// Offset of the frame header inside `ingress`.
    pub frame_header_offset: usize,
    /// Filled by the inbound engine.
    pub rx: DmaRegion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopbackReport {
    /// Header of the ingress frame; `None` for the stream self-test.
    pub header: Option<FrameHeader>,
    pub length: usize,
    /// What the inbound engine reports having written.
    pub bytes_received: usize,
}

pub struct Orchestrator<'a> {
    pub(crate) hw: LoopbackPeripherals<'a>,
    pub(crate) signals: SignalObserver<'a>,
    pub(crate) buffers: LoopbackBuffers,
    pub(crate) tuning: LoopbackTuning,
    pub(crate) wait: WaitBudget,
    pub(crate) state: LoopbackState,
    pub(crate) pattern_sends: u8,
    /// Directions whose interrupt path this run opened.
    armed: IrqSources,
    /// Directions the engine accepted a transfer for this run.
    started: IrqSources,
    engine_unusable: bool,
}

fn irq_source(direction: Direction) -> IrqSources {
    match direction {
        Direction::Outbound => IrqSources::OUTBOUND,
        Direction::Inbound => IrqSources::INBOUND,
    }
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        hw: LoopbackPeripherals<'a>,
        signals: SignalObserver<'a>,
        buffers: LoopbackBuffers,
        tuning: LoopbackTuning,
    ) -> Self {
        Orchestrator {
            hw,
            signals,
            buffers,
            tuning,
            wait: WaitBudget::from_polls(tuning.wait_polls),
            state: LoopbackState::Idle,
            pattern_sends: 0,
            armed: IrqSources::empty(),
            started: IrqSources::empty(),
            engine_unusable: false,
        }
    }

    pub fn state(&self) -> LoopbackState {
        self.state
    }

    pub fn flags(&self) -> CompletionFlags {
        self.signals.flags()
    }

    /// Bound every later wait. `Unbounded` waits as long as the hardware takes.
    pub fn set_wait_budget(&mut self, budget: WaitBudget) {
        self.wait = budget;
    }

    /// Re-initialize the stream engine after a reset timeout.
    pub fn reinitialize(&mut self) -> Result<(), ErrorCode> {
        self.hw.engine.reinitialize()?;
        self.engine_unusable = false;
        self.state = LoopbackState::Idle;
        Ok(())
    }

    /// Wait for the host to deliver a frame, send it around the link and
    /// check that what came back matches.
    pub fn run_ingress_loopback(&mut self) -> Result<LoopbackReport, LoopbackError> {
        let result = self.ingress_loopback();
        self.conclude(result)
    }

    /// Loop a fixed pattern through the link without involving the host.
    pub fn run_stream_loopback(&mut self) -> Result<LoopbackReport, LoopbackError> {
        let result = self.stream_loopback();
        self.conclude(result)
    }

    fn ingress_loopback(&mut self) -> Result<LoopbackReport, LoopbackError> {
        self.begin()?;
        self.arm_ingress();
        self.await_ingress()?;

        let header = self.read_header()?;
        println!(
            "[loopback] frame {} shelf {} size {}",
            HexWord(header.header_id),
            header.shelf_id,
            header.data_size
        );
        let headroom = self.tuning.inbound_headroom as usize;
        let length = self.fit(header.transfer_length(), self.loopback_capacity(headroom))?;
        let source = self.buffers.ingress;
        let rx = self.buffers.rx;

        // Nothing left over from an earlier frame may pass for received data.
        fill(&rx, length + headroom, |_| 0)?;
        self.hw.cache.flush_range(source.base(), length);
        self.hw.cache.flush_range(rx.base(), length + headroom);
        self.arm(
            TransferDescriptor::inbound(rx.bus_address(), length + headroom),
            LoopbackState::InboundArmed,
        )?;
        self.arm(
            TransferDescriptor::outbound(source.bus_address(), length),
            LoopbackState::OutboundArmed,
        )?;
        self.await_completion(&Direction::ALL)?;
        let bytes_received = self.check_received(length)?;
        self.verify(&source, length)?;

        Ok(LoopbackReport {
            header: Some(header),
            length,
            bytes_received,
        })
    }

    fn stream_loopback(&mut self) -> Result<LoopbackReport, LoopbackError> {
        self.begin()?;
        let length = self.fit(
            u64::from(self.tuning.stream_test_len),
            self.loopback_capacity(0),
        )?;
        let tx = self.buffers.ingress;
        let rx = self.buffers.rx;

        fill(&tx, length, |i| STREAM_PATTERN_START.wrapping_add(i as u8))?;
        fill(&rx, length, |_| 0)?;
        self.hw.cache.flush_range(tx.base(), length);
        self.hw.cache.flush_range(rx.base(), length);

        self.arm(
            TransferDescriptor::inbound(rx.bus_address(), length),
            LoopbackState::InboundArmed,
        )?;
        self.arm(
            TransferDescriptor::outbound(tx.bus_address(), length),
            LoopbackState::OutboundArmed,
        )?;
        self.await_completion(&Direction::ALL)?;
        let bytes_received = self.check_received(length)?;
        self.verify(&tx, length)?;

        Ok(LoopbackReport {
            header: None,
            length,
            bytes_received,
        })
    }

    /// Common entry checks. Any finished run can be started again from here.
    pub(crate) fn begin(&mut self) -> Result<(), LoopbackError> {
        if self.engine_unusable {
            return Err(LoopbackError::EngineUnusable);
        }
        self.state = LoopbackState::Idle;
        if !self.hw.link.channel_up() {
            return Err(LoopbackError::LinkDown);
        }
        self.signals.clear_all();
        Ok(())
    }

    pub(crate) fn conclude<T>(
        &mut self,
        result: Result<T, LoopbackError>,
    ) -> Result<T, LoopbackError> {
        let failure = result.as_ref().err().copied();
        let result = match self.stop_transfers(failure) {
            Some(direction) => {
                if let Err(err) = &result {
                    println!("[loopback] aborting: {} ({})", err, HexWord(err.code()));
                }
                Err(LoopbackError::ResetTimeout { direction })
            }
            None => result,
        };
        if let Err(err) = &result {
            self.state = LoopbackState::Failed;
            if let LoopbackError::ResetTimeout { .. } = err {
                self.engine_unusable = true;
            }
            println!("[loopback] failed: {} ({})", err, HexWord(err.code()));
        }
        result
    }

    /// Close the interrupt path of every direction this run armed.
    ///
    /// After a failure, a transfer that may still be running is cut off
    /// with an engine reset so the next run finds the engine idle. Returns
    /// the running direction if that reset did not complete.
    fn stop_transfers(&mut self, failure: Option<LoopbackError>) -> Option<Direction> {
        let armed = core::mem::replace(&mut self.armed, IrqSources::empty());
        let started = core::mem::replace(&mut self.started, IrqSources::empty());
        for direction in Direction::ALL {
            if armed.contains(irq_source(direction)) {
                self.hw.engine.disable_interrupts(direction);
            }
        }
        self.hw.sources.disable(armed);

        // A faulted engine has already been reset by its handler.
        if failure.map_or(true, |err| err.is_hardware_fault()) {
            return None;
        }
        let running = Direction::ALL
            .into_iter()
            .find(|&d| started.contains(irq_source(d)) && !self.signals.done(d))?;
        match reset_engine(self.hw.engine, self.tuning.reset_poll_budget) {
            Ok(_) => None,
            Err(_) => Some(running),
        }
    }

    pub(crate) fn arm_ingress(&mut self) {
        // Keep the handler off the bridge while its latch is cleared.
        self.hw.sources.disable(IrqSources::INGRESS);
        self.signals.clear_ingress();
        self.hw.ingress.acknowledge();
        self.hw.sources.enable(IrqSources::INGRESS);
        self.state = LoopbackState::ArmedForIngress;
    }

    fn await_ingress(&mut self) -> Result<(), LoopbackError> {
        let signals = &self.signals;
        spin_until(self.wait, || signals.ingress_arrived()).map_err(|_| {
            LoopbackError::WaitTimeout {
                state: LoopbackState::ArmedForIngress,
            }
        })?;
        self.signals.clear_ingress();
        self.state = LoopbackState::IngressReceived;
        Ok(())
    }

    pub(crate) fn read_header(&self) -> Result<FrameHeader, LoopbackError> {
        let region = self
            .buffers
            .ingress
            .subregion(self.buffers.frame_header_offset, FRAME_HEADER_LEN)
            .ok_or(LoopbackError::HeaderOutOfRange)?;
        self.hw.cache.flush_range(region.base(), FRAME_HEADER_LEN);
        region
            .read_obj::<FrameHeader>(0)
            .ok_or(LoopbackError::HeaderOutOfRange)
    }

    /// Largest loopback that fits both buffers, with `headroom` spare
    /// bytes on the inbound side.
    fn loopback_capacity(&self, headroom: usize) -> usize {
        self.buffers
            .ingress
            .len()
            .min(self.buffers.rx.len().saturating_sub(headroom))
    }

    pub(crate) fn fit(&self, length: u64, capacity: usize) -> Result<usize, LoopbackError> {
        match usize::try_from(length) {
            Ok(len) if len <= capacity => Ok(len),
            _ => Err(LoopbackError::FrameTooLarge { length, capacity }),
        }
    }

    /// Clear the direction's signals, open its interrupt path and start it.
    pub(crate) fn arm(
        &mut self,
        transfer: TransferDescriptor,
        next: LoopbackState,
    ) -> Result<(), LoopbackError> {
        let direction = transfer.direction();
        self.signals.clear_engine(direction);
        self.hw.engine.enable_interrupts(direction);
        self.hw.sources.enable(irq_source(direction));
        self.armed |= irq_source(direction);
        self.hw
            .engine
            .start(transfer)
            .map_err(|code| LoopbackError::StartRejected { direction, code })?;
        self.started |= irq_source(direction);
        self.state = next;
        Ok(())
    }

    /// Wait until every direction in `directions` is done or any engine faults.
    pub(crate) fn await_completion(
        &mut self,
        directions: &[Direction],
    ) -> Result<(), LoopbackError> {
        self.state = LoopbackState::WaitingCompletion;
        let signals = &self.signals;
        let waited = spin_until(self.wait, || {
            signals.error_raised() || directions.iter().all(|&d| signals.done(d))
        });

        if let Some((direction, kind)) = self.signals.first_fault() {
            return Err(match kind {
                FaultKind::Recovered => LoopbackError::EngineError { direction },
                FaultKind::ResetTimeout => LoopbackError::ResetTimeout { direction },
            });
        }
        waited.map(|_| ()).map_err(|_| LoopbackError::WaitTimeout {
            state: LoopbackState::WaitingCompletion,
        })
    }

    /// The inbound engine has to report exactly the bytes that were sent.
    fn check_received(&self, length: usize) -> Result<usize, LoopbackError> {
        let received = self.hw.engine.bytes_transferred(Direction::Inbound);
        if received != length {
            return Err(LoopbackError::LengthMismatch {
                expected: length,
                received,
            });
        }
        Ok(received)
    }

    fn verify(&mut self, expected: &DmaRegion, length: usize) -> Result<(), LoopbackError> {
        let rx = self.buffers.rx;
        self.hw.cache.flush_range(rx.base(), length);
        compare(expected, &rx, length).map_err(|err| match err {
            VerifyError::Mismatch(mismatch) => LoopbackError::VerifyMismatch(mismatch),
            VerifyError::OutOfRange { len } => LoopbackError::FrameTooLarge {
                length: len as u64,
                capacity: rx.len(),
            },
        })?;
        self.state = LoopbackState::Verified;
        Ok(())
    }
}

/// Write `length` bytes of `pattern` into `region`.
pub(crate) fn fill<F: FnMut(usize) -> u8>(
    region: &DmaRegion,
    length: usize,
    pattern: F,
) -> Result<(), LoopbackError> {
    region
        .fill_with(length, pattern)
        .ok_or(LoopbackError::FrameTooLarge {
            length: length as u64,
            capacity: region.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testbench::{host_write, sample_header, BUFFER_LEN, HEADER_OFFSET};
    use crate::verify::Mismatch;
    use dma_driver::hil::EngineStatus;
    use loopback_config::IrqLines;
    use loopback_testing::StartRecord;
    use zerocopy::IntoBytes;

    #[test]
    fn ingress_frame_loops_back_and_verifies() {
        bench!(intc, engine, ingress, link, cache, orch);
        let buffers = orch.buffers;
        host_write(&buffers.ingress, sample_header());
        ingress.arrive_after_acknowledge();

        let report = orch.run_ingress_loopback().unwrap();

        assert_eq!(
            report,
            LoopbackReport {
                header: Some(sample_header()),
                length: 1024,
                bytes_received: 1024,
            }
        );
        assert_eq!(orch.state(), LoopbackState::Verified);
        assert_eq!(
            engine.starts(),
            vec![
                StartRecord {
                    direction: Direction::Inbound,
                    address: buffers.rx.bus_address(),
                    length: 1025,
                },
                StartRecord {
                    direction: Direction::Outbound,
                    address: buffers.ingress.bus_address(),
                    length: 1024,
                },
            ]
        );
        assert_eq!(
            orch.flags(),
            CompletionFlags {
                ingress_arrived: false,
                outbound_done: true,
                inbound_done: true,
                error_raised: false,
            }
        );
        assert_eq!(engine.resets(), 0);

        let lines = IrqLines::default();
        assert!(!engine.interrupts_enabled(Direction::Outbound));
        assert!(!engine.interrupts_enabled(Direction::Inbound));
        assert!(!intc.is_enabled(lines.outbound));
        assert!(!intc.is_enabled(lines.inbound));
        assert!(intc.is_enabled(lines.ingress));
    }

    #[test]
    fn consecutive_runs_rearm_cleanly() {
        bench!(intc, engine, ingress, link, cache, orch);
        host_write(&orch.buffers.ingress, sample_header());

        for _ in 0..3 {
            ingress.arrive_after_acknowledge();
            assert!(orch.run_ingress_loopback().is_ok());
            assert_eq!(orch.state(), LoopbackState::Verified);
        }
        assert_eq!(engine.starts().len(), 6);
    }

    #[test]
    fn caches_are_flushed_around_the_transfer() {
        bench!(intc, engine, ingress, link, cache, orch);
        let buffers = orch.buffers;
        host_write(&buffers.ingress, sample_header());
        ingress.arrive_after_acknowledge();

        orch.run_ingress_loopback().unwrap();

        assert!(cache.flushed(buffers.ingress.base() + HEADER_OFFSET, 12));
        assert!(cache.flushed(buffers.ingress.base(), 1024));
        assert!(cache.flushed(buffers.rx.base(), 1025));
        assert!(cache.flushed(buffers.rx.base(), 1024));
    }

    #[test]
    fn outbound_error_fails_without_completion() {
        bench!(intc, engine, ingress, link, cache, orch);
        host_write(&orch.buffers.ingress, sample_header());
        ingress.arrive_after_acknowledge();
        engine.inject_error(
            Direction::Outbound,
            EngineStatus::SLAVE_ERROR | EngineStatus::ERROR,
        );

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::EngineError {
                direction: Direction::Outbound
            })
        );
        assert_eq!(orch.state(), LoopbackState::Failed);
        let flags = orch.flags();
        assert!(flags.error_raised);
        assert!(!flags.outbound_done);
        assert!(!flags.inbound_done);
        assert_eq!(engine.resets(), 1);

        // The engine recovered, so the next frame goes through.
        ingress.arrive_after_acknowledge();
        assert!(orch.run_ingress_loopback().is_ok());
    }

    #[test]
    fn reset_timeout_makes_engine_unusable_until_reinitialized() {
        bench!(intc, engine, ingress, link, cache, orch);
        host_write(&orch.buffers.ingress, sample_header());
        ingress.arrive_after_acknowledge();
        engine.set_reset_completes_after(None);
        engine.inject_error(
            Direction::Inbound,
            EngineStatus::INTERNAL_ERROR | EngineStatus::ERROR,
        );

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::ResetTimeout {
                direction: Direction::Inbound
            })
        );
        assert_eq!(engine.reset_polls(), 8);

        ingress.arrive_after_acknowledge();
        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::EngineUnusable)
        );
        assert_eq!(orch.state(), LoopbackState::Failed);
        assert_eq!(engine.starts().len(), 2, "no transfer while unusable");

        assert_eq!(orch.reinitialize(), Err(ErrorCode::FAIL));
        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::EngineUnusable)
        );

        engine.set_reset_completes_after(Some(3));
        assert_eq!(orch.reinitialize(), Ok(()));
        assert_eq!(orch.state(), LoopbackState::Idle);
        assert!(orch.run_ingress_loopback().is_ok());
    }

    #[test]
    fn corrupted_byte_is_reported_with_its_index() {
        bench!(intc, engine, ingress, link, cache, orch);
        let buffers = orch.buffers;
        host_write(&buffers.ingress, sample_header());
        ingress.arrive_after_acknowledge();
        engine.corrupt_next_transfer(613, 0xff);
        let sent = buffers.ingress.read_u8(613).unwrap();

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::VerifyMismatch(Mismatch {
                index: 613,
                expected: sent,
                actual: sent ^ 0xff,
            }))
        );
        assert_eq!(orch.state(), LoopbackState::Failed);
        assert_eq!(engine.resets(), 0);

        ingress.arrive_after_acknowledge();
        assert!(orch.run_ingress_loopback().is_ok());
        assert_eq!(orch.state(), LoopbackState::Verified);
    }

    #[test]
    fn rejected_inbound_start_never_starts_outbound() {
        bench!(intc, engine, ingress, link, cache, orch);
        host_write(&orch.buffers.ingress, sample_header());
        ingress.arrive_after_acknowledge();
        engine.reject_next_start(ErrorCode::BUSY);

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::StartRejected {
                direction: Direction::Inbound,
                code: ErrorCode::BUSY,
            })
        );
        assert!(engine.starts().is_empty());
        assert!(!orch.flags().error_raised);
        assert_eq!(engine.resets(), 0);
    }

    #[test]
    fn rejected_outbound_start_stops_armed_inbound() {
        bench!(intc, engine, ingress, link, cache, orch);
        host_write(&orch.buffers.ingress, sample_header());
        ingress.arrive_after_acknowledge();
        engine.reject_next_start_in(Direction::Outbound, ErrorCode::INVAL);

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::StartRejected {
                direction: Direction::Outbound,
                code: ErrorCode::INVAL,
            })
        );
        assert_eq!(engine.resets(), 1);
        assert!(!engine.interrupts_enabled(Direction::Inbound));
        assert!(!intc.is_enabled(IrqLines::default().inbound));

        ingress.arrive_after_acknowledge();
        assert!(orch.run_ingress_loopback().is_ok());
        assert_eq!(engine.starts().len(), 3);
    }

    #[test]
    fn timed_out_transfer_is_reset_before_the_next_run() {
        bench!(intc, engine, ingress, link, cache, orch);
        host_write(&orch.buffers.ingress, sample_header());
        engine.set_silent(true);
        ingress.arrive_after_acknowledge();

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::WaitTimeout {
                state: LoopbackState::WaitingCompletion
            })
        );
        assert_eq!(engine.resets(), 1);

        engine.set_silent(false);
        ingress.arrive_after_acknowledge();
        assert!(orch.run_ingress_loopback().is_ok());
    }

    #[test]
    fn stuck_reset_after_timeout_makes_engine_unusable() {
        bench!(intc, engine, ingress, link, cache, orch);
        host_write(&orch.buffers.ingress, sample_header());
        engine.set_silent(true);
        engine.set_reset_completes_after(None);
        ingress.arrive_after_acknowledge();

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::ResetTimeout {
                direction: Direction::Outbound
            })
        );
        assert_eq!(engine.reset_polls(), 8);

        ingress.arrive_after_acknowledge();
        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::EngineUnusable)
        );
        assert_eq!(engine.starts().len(), 2);
    }

    #[test]
    fn short_reception_fails_even_after_a_good_frame() {
        bench!(intc, engine, ingress, link, cache, orch);
        let buffers = orch.buffers;
        host_write(&buffers.ingress, sample_header());
        ingress.arrive_after_acknowledge();
        orch.run_ingress_loopback().unwrap();

        engine.truncate_next_inbound(512);
        ingress.arrive_after_acknowledge();
        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::LengthMismatch {
                expected: 1024,
                received: 512,
            })
        );
        assert_eq!(orch.state(), LoopbackState::Failed);
        assert_eq!(buffers.rx.read_u8(511), buffers.ingress.read_u8(511));
        assert_eq!(buffers.rx.read_u8(512), Some(0));
        assert_eq!(engine.resets(), 0);

        ingress.arrive_after_acknowledge();
        assert!(orch.run_ingress_loopback().is_ok());
    }

    #[test]
    fn oversized_frame_is_refused_before_arming() {
        bench!(intc, engine, ingress, link, cache, orch);
        let header = FrameHeader {
            data_size: 2000,
            ..sample_header()
        };
        orch.buffers
            .ingress
            .write_bytes(HEADER_OFFSET, header.as_bytes())
            .unwrap();
        ingress.arrive_after_acknowledge();

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::FrameTooLarge {
                length: 8016,
                capacity: BUFFER_LEN - 1,
            })
        );
        assert!(engine.starts().is_empty());
    }

    #[test]
    fn largest_data_size_does_not_overflow() {
        bench!(intc, engine, ingress, link, cache, orch);
        let header = FrameHeader {
            data_size: u32::MAX,
            ..sample_header()
        };
        orch.buffers
            .ingress
            .write_bytes(HEADER_OFFSET, header.as_bytes())
            .unwrap();
        ingress.arrive_after_acknowledge();

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::FrameTooLarge {
                length: (u64::from(u32::MAX) + 4) * 4,
                capacity: BUFFER_LEN - 1,
            })
        );
    }

    #[test]
    fn link_down_touches_nothing() {
        bench!(intc, engine, ingress, link, cache, orch);
        link.set_up(false);
        ingress.arrive_after_acknowledge();

        assert_eq!(orch.run_ingress_loopback(), Err(LoopbackError::LinkDown));
        assert_eq!(ingress.acknowledgements(), 0);
        assert!(engine.starts().is_empty());
        assert!(cache.flushes().is_empty());
    }

    #[test]
    fn arrival_before_arming_is_discarded() {
        bench!(intc, engine, ingress, link, cache, orch);
        host_write(&orch.buffers.ingress, sample_header());
        ingress.arrive();
        assert!(ingress.latched());

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::WaitTimeout {
                state: LoopbackState::ArmedForIngress
            })
        );
        assert!(!ingress.latched());
        assert!(engine.starts().is_empty());
    }

    #[test]
    fn silent_engine_times_out_despite_earlier_completion() {
        bench!(intc, engine, ingress, link, cache, orch);
        host_write(&orch.buffers.ingress, sample_header());
        ingress.arrive_after_acknowledge();
        orch.run_ingress_loopback().unwrap();

        engine.set_silent(true);
        ingress.arrive_after_acknowledge();
        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::WaitTimeout {
                state: LoopbackState::WaitingCompletion
            })
        );
        let flags = orch.flags();
        assert!(!flags.outbound_done);
        assert!(!flags.inbound_done);
    }

    #[test]
    fn header_past_buffer_end_is_rejected() {
        bench!(intc, engine, ingress, link, cache, orch);
        orch.buffers.frame_header_offset = BUFFER_LEN - 8;
        ingress.arrive_after_acknowledge();

        assert_eq!(
            orch.run_ingress_loopback(),
            Err(LoopbackError::HeaderOutOfRange)
        );
    }

    #[test]
    fn stream_self_test_loops_pattern() {
        bench!(intc, engine, ingress, link, cache, orch);
        let buffers = orch.buffers;

        let report = orch.run_stream_loopback().unwrap();

        assert_eq!(
            report,
            LoopbackReport {
                header: None,
                length: 0x100,
                bytes_received: 0x100,
            }
        );
        assert_eq!(orch.state(), LoopbackState::Verified);
        assert_eq!(buffers.rx.read_u8(0), Some(STREAM_PATTERN_START));
        assert_eq!(buffers.rx.read_u8(0xff), Some(0x0b));
        assert_eq!(ingress.acknowledgements(), 0);
        assert_eq!(
            engine.starts(),
            vec![
                StartRecord {
                    direction: Direction::Inbound,
                    address: buffers.rx.bus_address(),
                    length: 0x100,
                },
                StartRecord {
                    direction: Direction::Outbound,
                    address: buffers.ingress.bus_address(),
                    length: 0x100,
                },
            ]
        );
    }

    #[test]
    fn stream_self_test_reports_engine_fault() {
        bench!(intc, engine, ingress, link, cache, orch);
        engine.inject_error(
            Direction::Inbound,
            EngineStatus::DECODE_ERROR | EngineStatus::ERROR,
        );

        assert_eq!(
            orch.run_stream_loopback(),
            Err(LoopbackError::EngineError {
                direction: Direction::Inbound
            })
        );
        assert!(orch.flags().outbound_done);
        assert!(!orch.flags().inbound_done);
    }
}
