// Licensed under the Apache-2.0 license

use crate::intc::SimIntc;
use dma_driver::hil::{
    Direction, EngineStatus, ResetControl, StreamEngine, TransferDescriptor,
};
use dma_driver::recovery::{reset_engine, DEFAULT_RESET_POLLS};
use kernel::ErrorCode;
use std::cell::{Cell, RefCell};

/// A transfer the engine accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartRecord {
    pub direction: Direction,
    pub address: u64,
    pub length: usize,
}

#[derive(Default)]
struct Channel {
    status: Cell<EngineStatus>,
    irq_enabled: Cell<bool>,
    running: Cell<bool>,
    address: Cell<u64>,
    length: Cell<usize>,
    transferred: Cell<usize>,
    acknowledged: Cell<EngineStatus>,
    injected: Cell<EngineStatus>,
}

/// A stream engine whose outbound side is wired straight to its inbound
/// side, like a link with a loopback plug.
///
/// An outbound start completes at once. If an inbound transfer is armed,
/// the bytes are copied into it and it completes right after, with
/// `min(outbound length, inbound length)` bytes.
pub struct SimStreamEngine<'a> {
    intc: &'a SimIntc<'a>,
    outbound_line: u32,
    inbound_line: u32,
    outbound: Channel,
    inbound: Channel,
    reset_completes_after: Cell<Option<u32>>,
    resets: Cell<u32>,
    reset_polls: Cell<u32>,
    starts: RefCell<Vec<StartRecord>>,
    reject_next: Cell<Option<(Option<Direction>, ErrorCode)>>,
    corruption: Cell<Option<(usize, u8)>>,
    truncation: Cell<Option<usize>>,
    silent: Cell<bool>,
}

impl<'a> SimStreamEngine<'a> {
    pub fn new(intc: &'a SimIntc<'a>, outbound_line: u32, inbound_line: u32) -> Self {
        SimStreamEngine {
            intc,
            outbound_line,
            inbound_line,
            outbound: Channel::default(),
            inbound: Channel::default(),
            reset_completes_after: Cell::new(Some(1)),
            resets: Cell::new(0),
            reset_polls: Cell::new(0),
            starts: RefCell::new(Vec::new()),
            reject_next: Cell::new(None),
            corruption: Cell::new(None),
            truncation: Cell::new(None),
            silent: Cell::new(false),
        }
    }

    fn channel(&self, direction: Direction) -> &Channel {
        match direction {
            Direction::Outbound => &self.outbound,
            Direction::Inbound => &self.inbound,
        }
    }

    fn line(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Outbound => self.outbound_line,
            Direction::Inbound => self.inbound_line,
        }
    }

    /// Overwrite a channel's status register.
    pub fn set_status(&self, direction: Direction, status: EngineStatus) {
        self.channel(direction).status.set(status);
    }

    pub fn status(&self, direction: Direction) -> EngineStatus {
        self.channel(direction).status.get()
    }

    /// Interrupt bits written back by the last acknowledge.
    pub fn acknowledged(&self, direction: Direction) -> EngineStatus {
        self.channel(direction).acknowledged.get()
    }

    pub fn interrupts_enabled(&self, direction: Direction) -> bool {
        self.channel(direction).irq_enabled.get()
    }

    /// Polls of `reset_done` before a reset reports complete; `None` never does.
    pub fn set_reset_completes_after(&self, polls: Option<u32>) {
        self.reset_completes_after.set(polls);
    }

    pub fn resets(&self) -> u32 {
        self.resets.get()
    }

    /// `reset_done` polls since the last reset was issued.
    pub fn reset_polls(&self) -> u32 {
        self.reset_polls.get()
    }

    pub fn starts(&self) -> Vec<StartRecord> {
        self.starts.borrow().clone()
    }

    /// End the next transfer in `direction` with `status` instead of
    /// completing it. No data moves.
    pub fn inject_error(&self, direction: Direction, status: EngineStatus) {
        self.channel(direction).injected.set(status);
    }

    /// Refuse the next start with `code`.
    pub fn reject_next_start(&self, code: ErrorCode) {
        self.reject_next.set(Some((None, code)));
    }

    /// Refuse the next start in `direction` with `code`. Starts in the
    /// other direction go through.
    pub fn reject_next_start_in(&self, direction: Direction, code: ErrorCode) {
        self.reject_next.set(Some((Some(direction), code)));
    }

    /// Flip bits of one byte of the next looped-back transfer.
    pub fn corrupt_next_transfer(&self, index: usize, xor: u8) {
        self.corruption.set(Some((index, xor)));
    }

    /// End the next looped-back inbound transfer after `len` bytes, as a
    /// packet cut short by the link would.
    pub fn truncate_next_inbound(&self, len: usize) {
        self.truncation.set(Some(len));
    }

    /// Accept transfers but never finish them.
    pub fn set_silent(&self, silent: bool) {
        self.silent.set(silent);
    }

    fn finish(&self, direction: Direction, status: EngineStatus, transferred: usize) {
        let channel = self.channel(direction);
        channel.running.set(false);
        channel.transferred.set(transferred);
        channel.status.set(channel.status.get() | status);
        if channel.irq_enabled.get() {
            self.intc.raise(self.line(direction));
        }
    }

    fn end(&self, direction: Direction, transferred: usize) {
        let injected = self.channel(direction).injected.take();
        if injected.is_empty() {
            self.finish(direction, EngineStatus::COMPLETE, transferred);
        } else {
            self.finish(direction, injected, 0);
        }
    }

    fn push(&self, source: u64, length: usize) {
        let failed = !self.outbound.injected.get().is_empty();
        self.end(Direction::Outbound, length);
        // An outbound error, or the reset that follows it, leaves nothing
        // for the inbound side.
        if failed || !self.inbound.running.get() {
            return;
        }

        let count = length
            .min(self.inbound.length.get())
            .min(self.truncation.take().unwrap_or(usize::MAX));
        let destination = self.inbound.address.get();
        let corruption = self.corruption.take();
        for i in 0..count {
            // SAFETY: both addresses come from descriptors the test built
            // over live host buffers of at least these lengths.
            unsafe {
                let mut byte = core::ptr::read_volatile((source as usize + i) as *const u8);
                if let Some((index, xor)) = corruption {
                    if index == i {
                        byte ^= xor;
                    }
                }
                core::ptr::write_volatile((destination as usize + i) as *mut u8, byte);
            }
        }
        self.end(Direction::Inbound, count);
    }
}

impl ResetControl for SimStreamEngine<'_> {
    fn issue_reset(&self) {
        self.resets.set(self.resets.get() + 1);
        self.reset_polls.set(0);
        for channel in [&self.outbound, &self.inbound] {
            channel.status.set(EngineStatus::empty());
            channel.irq_enabled.set(false);
            channel.running.set(false);
            channel.transferred.set(0);
        }
    }

    fn reset_done(&self) -> bool {
        self.reset_polls.set(self.reset_polls.get() + 1);
        match self.reset_completes_after.get() {
            Some(polls) => self.reset_polls.get() >= polls,
            None => false,
        }
    }
}

impl StreamEngine for SimStreamEngine<'_> {
    fn start(&self, transfer: TransferDescriptor) -> Result<(), ErrorCode> {
        let direction = transfer.direction();
        if let Some((only, code)) = self.reject_next.get() {
            if only.map_or(true, |d| d == direction) {
                self.reject_next.set(None);
                return Err(code);
            }
        }
        transfer.validate(4, (1 << 26) - 1)?;
        let channel = self.channel(direction);
        if channel.running.get() {
            return Err(ErrorCode::BUSY);
        }

        let address = transfer.memory_address();
        let length = transfer.length();
        self.starts.borrow_mut().push(StartRecord {
            direction,
            address,
            length,
        });
        channel.running.set(true);
        channel.address.set(address);
        channel.length.set(length);
        channel.transferred.set(0);

        if !self.silent.get() && direction == Direction::Outbound {
            self.push(address, length);
        }
        Ok(())
    }

    fn enable_interrupts(&self, direction: Direction) {
        self.channel(direction).irq_enabled.set(true);
    }

    fn disable_interrupts(&self, direction: Direction) {
        self.channel(direction).irq_enabled.set(false);
    }

    fn pending_interrupts(&self, direction: Direction) -> EngineStatus {
        self.channel(direction).status.get()
    }

    fn acknowledge_interrupts(&self, direction: Direction, status: EngineStatus) {
        let channel = self.channel(direction);
        let bits = status.irq_bits();
        channel.acknowledged.set(bits);
        channel.status.set(channel.status.get() - bits);
    }

    fn bytes_transferred(&self, direction: Direction) -> usize {
        self.channel(direction).transferred.get()
    }

    fn reinitialize(&self) -> Result<(), ErrorCode> {
        reset_engine(self, DEFAULT_RESET_POLLS)
            .map(|_| ())
            .map_err(|_| ErrorCode::FAIL)
    }
}
