// Licensed under the Apache-2.0 license.

//! AMD LogiCORE AXI DMA, direct register (simple) mode.
//! MM2S carries memory to stream, S2MM carries stream to memory.

pub mod bits {
    //! Types that represent individual registers (bitfields).
    use tock_registers::register_bitfields;
    register_bitfields! {
        u32,
            pub DmaControl [
                /// Run / stop
                Rs OFFSET(0) NUMBITS(1) [],
                /// Soft reset, self clearing. Resets both channels.
                Reset OFFSET(2) NUMBITS(1) [],
                Keyhole OFFSET(3) NUMBITS(1) [],
                CyclicBd OFFSET(4) NUMBITS(1) [],
                IocIrqEn OFFSET(12) NUMBITS(1) [],
                DlyIrqEn OFFSET(13) NUMBITS(1) [],
                ErrIrqEn OFFSET(14) NUMBITS(1) [],
                IrqThreshold OFFSET(16) NUMBITS(8) [],
                IrqDelay OFFSET(24) NUMBITS(8) [],
            ],
            pub DmaStatus [
                Halted OFFSET(0) NUMBITS(1) [],
                Idle OFFSET(1) NUMBITS(1) [],
                /// Engine was synthesized with scatter gather
                SgIncld OFFSET(3) NUMBITS(1) [],
                DmaIntErr OFFSET(4) NUMBITS(1) [],
                DmaSlvErr OFFSET(5) NUMBITS(1) [],
                DmaDecErr OFFSET(6) NUMBITS(1) [],
                SgIntErr OFFSET(8) NUMBITS(1) [],
                SgSlvErr OFFSET(9) NUMBITS(1) [],
                SgDecErr OFFSET(10) NUMBITS(1) [],
                /// Write 1 to clear
                IocIrq OFFSET(12) NUMBITS(1) [],
                /// Write 1 to clear
                DlyIrq OFFSET(13) NUMBITS(1) [],
                /// Write 1 to clear
                ErrIrq OFFSET(14) NUMBITS(1) [],
                IrqThresholdSts OFFSET(16) NUMBITS(8) [],
                IrqDelaySts OFFSET(24) NUMBITS(8) [],
            ],
            pub TransferLength [
                Length OFFSET(0) NUMBITS(26) [],
            ],
    }
}
pub mod regs {
    //! Types that represent registers.
    use tock_registers::register_structs;
    register_structs! {
        pub AxiDma {
            (0x0 => pub mm2s_dmacr: tock_registers::registers::ReadWrite<u32, crate::axidma::bits::DmaControl::Register>),
            (0x4 => pub mm2s_dmasr: tock_registers::registers::ReadWrite<u32, crate::axidma::bits::DmaStatus::Register>),
            (0x8 => _reserved0),
            (0x18 => pub mm2s_sa: tock_registers::registers::ReadWrite<u32>),
            (0x1c => pub mm2s_sa_msb: tock_registers::registers::ReadWrite<u32>),
            (0x20 => _reserved1),
            (0x28 => pub mm2s_length: tock_registers::registers::ReadWrite<u32, crate::axidma::bits::TransferLength::Register>),
            (0x2c => _reserved2),
            (0x30 => pub s2mm_dmacr: tock_registers::registers::ReadWrite<u32, crate::axidma::bits::DmaControl::Register>),
            (0x34 => pub s2mm_dmasr: tock_registers::registers::ReadWrite<u32, crate::axidma::bits::DmaStatus::Register>),
            (0x38 => _reserved3),
            (0x48 => pub s2mm_da: tock_registers::registers::ReadWrite<u32>),
            (0x4c => pub s2mm_da_msb: tock_registers::registers::ReadWrite<u32>),
            (0x50 => _reserved4),
            (0x58 => pub s2mm_length: tock_registers::registers::ReadWrite<u32, crate::axidma::bits::TransferLength::Register>),
            (0x5c => @END),
        }
    }
}
