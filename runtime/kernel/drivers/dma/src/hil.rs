// Licensed under the Apache-2.0 license.

//! HIL for the stream engines that feed and drain the serial link, and for
//! the bus-side ingress engine.
use bitflags::bitflags;
use kernel::ErrorCode;

/// Which half of a stream engine a transfer or interrupt belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Memory to stream.
    Outbound,
    /// Stream to memory.
    Inbound,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Outbound, Direction::Inbound];
}

/// One end of a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// A bus address in device memory.
    Memory(u64),
    /// The link side of the engine, which has no address.
    Stream,
}

/// A single simple-mode transfer. Built right before it is started and
/// handed to the engine by value, so it cannot be started twice.
#[derive(Debug, PartialEq, Eq)]
pub struct TransferDescriptor {
    source: Endpoint,
    destination: Endpoint,
    length: usize,
    direction: Direction,
}

impl TransferDescriptor {
    /// Stream `length` bytes starting at `source` out over the link.
    pub fn outbound(source: u64, length: usize) -> Self {
        TransferDescriptor {
            source: Endpoint::Memory(source),
            destination: Endpoint::Stream,
            length,
            direction: Direction::Outbound,
        }
    }

    /// Accept up to `length` bytes from the link into memory at `destination`.
    pub fn inbound(destination: u64, length: usize) -> Self {
        TransferDescriptor {
            source: Endpoint::Stream,
            destination: Endpoint::Memory(destination),
            length,
            direction: Direction::Inbound,
        }
    }

    pub fn source(&self) -> Endpoint {
        self.source
    }

    pub fn destination(&self) -> Endpoint {
        self.destination
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The device memory address on the memory side of the transfer.
    pub fn memory_address(&self) -> u64 {
        match (self.source, self.destination) {
            (Endpoint::Memory(addr), _) | (_, Endpoint::Memory(addr)) => addr,
            (Endpoint::Stream, Endpoint::Stream) => 0,
        }
    }

    /// Checks the descriptor against an engine's constraints.
    ///
    /// Returns `INVAL` for a zero length or a memory address that is not a
    /// multiple of `alignment`, and `SIZE` for a length above `max_length`.
    pub fn validate(&self, alignment: u64, max_length: usize) -> Result<(), ErrorCode> {
        if self.length == 0 {
            return Err(ErrorCode::INVAL);
        }
        if self.length > max_length {
            return Err(ErrorCode::SIZE);
        }
        if alignment > 1 && self.memory_address() % alignment != 0 {
            return Err(ErrorCode::INVAL);
        }
        Ok(())
    }
}

bitflags! {
    /// Snapshot of one channel's status register taken at interrupt time.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct EngineStatus: u32 {
        /// Internal error, e.g. a zero length or an underrun.
        const INTERNAL_ERROR = 1 << 4;
        /// The memory-side slave answered with an error (source error on
        /// outbound, destination error on inbound).
        const SLAVE_ERROR = 1 << 5;
        /// The memory address did not decode (destination error).
        const DECODE_ERROR = 1 << 6;
        /// Transfer complete.
        const COMPLETE = 1 << 12;
        const DELAY = 1 << 13;
        /// Error interrupt, set alongside one of the error bits.
        const ERROR = 1 << 14;

        const IRQ_ALL = Self::COMPLETE.bits() | Self::DELAY.bits() | Self::ERROR.bits();
    }
}

impl EngineStatus {
    /// Only the write-1-to-clear interrupt bits of the snapshot.
    pub fn irq_bits(self) -> EngineStatus {
        self & EngineStatus::IRQ_ALL
    }

    /// The error interrupt is pending. The detail bits alone do not count.
    pub fn is_error(self) -> bool {
        self.contains(EngineStatus::ERROR)
    }

    pub fn is_complete(self) -> bool {
        self.contains(EngineStatus::COMPLETE)
    }
}

/// A stream engine running simple (register direct) transfers.
pub trait StreamEngine: ResetControl {
    /// Program and start a transfer. Failures are reported here and the
    /// transfer never starts.
    fn start(&self, transfer: TransferDescriptor) -> Result<(), ErrorCode>;

    /// Enable completion and error interrupts for one direction.
    fn enable_interrupts(&self, direction: Direction);

    fn disable_interrupts(&self, direction: Direction);

    /// Read the pending-interrupt status of one direction.
    fn pending_interrupts(&self, direction: Direction) -> EngineStatus;

    /// Clear exactly the interrupt bits present in `status`.
    fn acknowledge_interrupts(&self, direction: Direction, status: EngineStatus);

    /// Bytes moved by the last completed transfer in `direction`.
    fn bytes_transferred(&self, direction: Direction) -> usize;

    /// Bring the engine back to a usable state after a failed recovery.
    fn reinitialize(&self) -> Result<(), ErrorCode>;
}

/// Hardware reset of an engine.
pub trait ResetControl {
    /// Start a reset. Completion is observed with [`ResetControl::reset_done`].
    fn issue_reset(&self);

    fn reset_done(&self) -> bool;
}

/// The bus-side engine that raises an interrupt when the host has written a block.
pub trait IngressEngine {
    /// Clear the arrival latch so the interrupt line drops and the next
    /// arrival can be seen.
    fn acknowledge(&self);
}

/// State of the serial link between the two stream directions.
pub trait LinkStatus {
    /// The link has finished lane bonding and can carry data.
    fn channel_up(&self) -> bool;
}
