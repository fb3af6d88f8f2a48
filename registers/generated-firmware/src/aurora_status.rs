// Licensed under the Apache-2.0 license.

//! Aurora link status word exposed through a GPIO input.

pub mod bits {
    //! Types that represent individual registers (bitfields).
    use tock_registers::register_bitfields;
    register_bitfields! {
        u32,
            pub LinkStatus [
                StreamIntTx OFFSET(0) NUMBITS(1) [],
                LinkUp OFFSET(4) NUMBITS(1) [],
                MmcmLocked OFFSET(8) NUMBITS(1) [],
                InitCalibComplete OFFSET(9) NUMBITS(1) [],
                TxLock OFFSET(12) NUMBITS(1) [],
                LaneUp OFFSET(13) NUMBITS(1) [],
                ChannelUp OFFSET(14) NUMBITS(1) [],
                FrameErr OFFSET(16) NUMBITS(1) [],
                HardErr OFFSET(17) NUMBITS(1) [],
                SoftErr OFFSET(18) NUMBITS(1) [],
                PllNotLocked OFFSET(19) NUMBITS(1) [],
                RxResetDone OFFSET(20) NUMBITS(1) [],
                TxResetDone OFFSET(21) NUMBITS(1) [],
            ],
    }
}
pub mod regs {
    //! Types that represent registers.
    use tock_registers::register_structs;
    register_structs! {
        pub AuroraStatus {
            (0x0 => pub status: tock_registers::registers::ReadOnly<u32, crate::aurora_status::bits::LinkStatus::Register>),
            (0x4 => @END),
        }
    }
}
