// Licensed under the Apache-2.0 license

use crate::orchestrator::LoopbackState;
use crate::verify::Mismatch;
use core::fmt;
use dma_driver::hil::Direction;
use kernel::ErrorCode;

/// Why a loopback, relay or send did not finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopbackError {
    /// The serial link reports its channel down.
    LinkDown,
    /// An earlier reset timed out and the engine has not been re-initialized.
    EngineUnusable,
    /// The engine refused the transfer; it never started.
    StartRejected { direction: Direction, code: ErrorCode },
    /// The engine raised an error interrupt and its reset completed.
    EngineError { direction: Direction },
    /// The engine raised an error interrupt and did not come out of reset.
    ResetTimeout { direction: Direction },
    /// A bounded wait ran out in `state`.
    WaitTimeout { state: LoopbackState },
    /// The frame does not fit the buffers.
    FrameTooLarge { length: u64, capacity: usize },
    /// The frame header lies outside the ingress buffer.
    HeaderOutOfRange,
    /// The inbound engine wrote a different number of bytes than were sent.
    LengthMismatch { expected: usize, received: usize },
    /// Data came back different from what was sent.
    VerifyMismatch(Mismatch),
}

impl LoopbackError {
    /// Stable numeric code for console reports.
    pub fn code(&self) -> u32 {
        match self {
            LoopbackError::LinkDown => 0x0001_0001,
            LoopbackError::EngineUnusable => 0x0001_0002,
            LoopbackError::StartRejected { .. } => 0x0001_0003,
            LoopbackError::EngineError { .. } => 0x0001_0004,
            LoopbackError::ResetTimeout { .. } => 0x0001_0005,
            LoopbackError::WaitTimeout { .. } => 0x0001_0006,
            LoopbackError::FrameTooLarge { .. } => 0x0001_0007,
            LoopbackError::HeaderOutOfRange => 0x0001_0008,
            LoopbackError::VerifyMismatch(_) => 0x0001_0009,
            LoopbackError::LengthMismatch { .. } => 0x0001_000a,
        }
    }

    /// Hardware faults, as opposed to data or configuration problems.
    pub fn is_hardware_fault(&self) -> bool {
        matches!(
            self,
            LoopbackError::EngineError { .. } | LoopbackError::ResetTimeout { .. }
        )
    }
}

impl fmt::Display for LoopbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopbackError::LinkDown => write!(f, "link channel not up"),
            LoopbackError::EngineUnusable => write!(f, "stream engine needs re-initialization"),
            LoopbackError::StartRejected { direction, code } => {
                write!(f, "{:?} transfer rejected: {:?}", direction, code)
            }
            LoopbackError::EngineError { direction } => {
                write!(f, "{:?} engine error, reset ok", direction)
            }
            LoopbackError::ResetTimeout { direction } => {
                write!(f, "{:?} engine error, reset timed out", direction)
            }
            LoopbackError::WaitTimeout { state } => write!(f, "timed out in {:?}", state),
            LoopbackError::FrameTooLarge { length, capacity } => {
                write!(f, "frame of {} bytes exceeds {} byte buffer", length, capacity)
            }
            LoopbackError::HeaderOutOfRange => write!(f, "frame header outside ingress buffer"),
            LoopbackError::LengthMismatch { expected, received } => {
                write!(f, "received {} of {} bytes", received, expected)
            }
            LoopbackError::VerifyMismatch(m) => write!(
                f,
                "data mismatch at {}: expected {:#04x}, got {:#04x}",
                m.index, m.expected, m.actual
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_timeout_is_distinct_from_recovered_error() {
        let recovered = LoopbackError::EngineError {
            direction: Direction::Outbound,
        };
        let stuck = LoopbackError::ResetTimeout {
            direction: Direction::Outbound,
        };
        assert_ne!(recovered.code(), stuck.code());
        assert!(recovered.is_hardware_fault());
        assert!(stuck.is_hardware_fault());
        assert!(!LoopbackError::VerifyMismatch(Mismatch {
            index: 0,
            expected: 1,
            actual: 2
        })
        .is_hardware_fault());
    }

    #[test]
    fn short_reception_is_a_data_problem() {
        let err = LoopbackError::LengthMismatch {
            expected: 1024,
            received: 512,
        };
        assert!(!err.is_hardware_fault());
        assert_eq!(format!("{}", err), "received 512 of 1024 bytes");
    }

    #[test]
    fn mismatch_message_names_the_index() {
        let err = LoopbackError::VerifyMismatch(Mismatch {
            index: 613,
            expected: 0x0c,
            actual: 0,
        });
        assert_eq!(
            format!("{}", err),
            "data mismatch at 613: expected 0x0c, got 0x00"
        );
    }
}
