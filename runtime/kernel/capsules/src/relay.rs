// Licensed under the Apache-2.0 license

//! One-way modes: forwarding host frames onto the link and sending a
//! marked test pattern. Neither arms the inbound direction.

use crate::error::LoopbackError;
use crate::orchestrator::{fill, LoopbackState, Orchestrator};
use dma_driver::hil::{Direction, TransferDescriptor};
use fwtime::{print, println, spin_until};

/// Sync word that opens every pattern block.
pub const PATTERN_SYNC: [u8; 2] = [0xeb, 0x90];

impl Orchestrator<'_> {
    /// Forward every frame the host delivers until `stop` returns true.
    ///
    /// `stop` is polled only while waiting for the next frame, so a frame
    /// in flight always finishes. Returns the number of frames sent.
    pub fn relay_frames(&mut self, stop: &dyn Fn() -> bool) -> Result<u32, LoopbackError> {
        let result = self.relay(stop);
        self.conclude(result)
    }

    /// Send `len` bytes of the counting pattern, stamped with the send number.
    pub fn send_pattern(&mut self, len: usize) -> Result<usize, LoopbackError> {
        let result = self.pattern(len);
        self.conclude(result)
    }

    fn relay(&mut self, stop: &dyn Fn() -> bool) -> Result<u32, LoopbackError> {
        self.begin()?;
        let source = self.buffers.ingress;
        let interval = self.tuning.relay_report_interval;
        let mut frames = 0u32;

        loop {
            self.arm_ingress();
            let signals = &self.signals;
            spin_until(self.wait, || signals.ingress_arrived() || stop()).map_err(|_| {
                LoopbackError::WaitTimeout {
                    state: LoopbackState::ArmedForIngress,
                }
            })?;
            if !self.signals.ingress_arrived() {
                break;
            }
            self.signals.clear_ingress();
            self.state = LoopbackState::IngressReceived;

            let header = self.read_header()?;
            let length = self.fit(header.relay_length(), source.len())?;
            self.hw.cache.flush_range(source.base(), length);
            self.arm(
                TransferDescriptor::outbound(source.bus_address(), length),
                LoopbackState::OutboundArmed,
            )?;
            self.await_completion(&[Direction::Outbound])?;

            frames = frames.wrapping_add(1);
            if interval != 0 && frames % interval == 0 {
                print!(".");
            }
        }

        self.state = LoopbackState::Idle;
        println!("[loopback] relayed {} frames", frames);
        Ok(frames)
    }

    fn pattern(&mut self, len: usize) -> Result<usize, LoopbackError> {
        self.begin()?;
        let tx = self.buffers.ingress;
        let stamp = self.pattern_sends;
        self.pattern_sends = stamp.wrapping_add(1);

        fill(&tx, len, |i| match i {
            0 | 1 => PATTERN_SYNC[i],
            2 | 3 => stamp,
            _ => i as u8,
        })?;
        self.hw.cache.flush_range(tx.base(), len);
        self.arm(
            TransferDescriptor::outbound(tx.bus_address(), len),
            LoopbackState::OutboundArmed,
        )?;
        self.await_completion(&[Direction::Outbound])?;

        self.state = LoopbackState::Idle;
        Ok(self.hw.engine.bytes_transferred(Direction::Outbound))
    }
}
