// Licensed under the Apache-2.0 license

// Ingress side of the NWL PCIe bridge DMA. The host writes blocks into
// device memory through the bridge, which latches an interrupt per block.

use crate::hil::IngressEngine;
use fwtime::spin;
use kernel::utilities::registers::interfaces::Writeable;
use kernel::utilities::StaticRef;
use registers_generated::nwl_dma::bits::{DmaControl, IrqStatus};
use registers_generated::nwl_dma::regs::NwlDma;

/// Polls the bridge DMA is held in reset.
pub const RESET_SETTLE_POLLS: u32 = 10_000;

pub struct NwlIngress {
    registers: StaticRef<NwlDma>,
}

impl NwlIngress {
    pub const fn new(base: StaticRef<NwlDma>) -> NwlIngress {
        NwlIngress { registers: base }
    }

    /// Pulse the bridge DMA reset. The bridge has no reset-done indication,
    /// so reset is held for a fixed number of polls.
    pub fn reset_engine(&self, settle_polls: u32) {
        self.registers.dma_control.write(DmaControl::Reset::SET);
        spin(settle_polls);
        self.registers.dma_control.set(0);
    }
}

impl IngressEngine for NwlIngress {
    fn acknowledge(&self) {
        self.registers
            .irq_status
            .write(IrqStatus::PcieIntEnable::SET + IrqStatus::AxiIntAck::All);
    }
}
