// Licensed under the Apache-2.0 license

//! Header the host places in front of every ingress block.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

pub const FRAME_HEADER_LEN: usize = core::mem::size_of::<FrameHeader>();

/// Words that travel with the payload on the wire besides the payload itself.
const FRAMING_WORDS: u64 = 4;
const WORD_BYTES: u64 = 4;

/// Trailer word the host appends after the frame when relaying.
pub const RELAY_TRAILER_BYTES: u64 = 4;

/// Three words in bus byte order.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct FrameHeader {
    pub header_id: u32,
    pub shelf_id: u32,
    /// Payload length in 4-byte words.
    pub data_size: u32,
}

impl FrameHeader {
    /// Bytes to move for this frame: `(data_size + 4) * 4`, computed without
    /// overflow for every `data_size`.
    pub fn transfer_length(&self) -> u64 {
        (u64::from(self.data_size) + FRAMING_WORDS) * WORD_BYTES
    }

    /// Bytes sent per frame in relay mode.
    pub fn relay_length(&self) -> u64 {
        self.transfer_length() + RELAY_TRAILER_BYTES
    }
}
