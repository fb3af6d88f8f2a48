// Licensed under the Apache-2.0 license.

//! NWL PCIe bridge DMA engine. Only the two 16-bit control words used by
//! the ingress path are modeled.

pub mod bits {
    //! Types that represent individual registers (bitfields).
    use tock_registers::register_bitfields;
    register_bitfields! {
        u16,
            pub DmaControl [
                Enable OFFSET(0) NUMBITS(1) [],
                Reset OFFSET(2) NUMBITS(1) [],
            ],
            pub IrqStatus [
                PcieIntEnable OFFSET(0) NUMBITS(1) [],
                AxiIntAck OFFSET(8) NUMBITS(3) [
                    All = 0x7,
                ],
            ],
    }
}
pub mod regs {
    //! Types that represent registers.
    use tock_registers::register_structs;
    register_structs! {
        pub NwlDma {
            (0x0 => _reserved0),
            (0x3c => pub dma_control: tock_registers::registers::ReadWrite<u16, crate::nwl_dma::bits::DmaControl::Register>),
            (0x3e => pub irq_status: tock_registers::registers::ReadWrite<u16, crate::nwl_dma::bits::IrqStatus::Register>),
            (0x40 => @END),
        }
    }
}
