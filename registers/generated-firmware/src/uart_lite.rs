// Licensed under the Apache-2.0 license.

//! AMD LogiCORE AXI UART Lite.

pub mod bits {
    //! Types that represent individual registers (bitfields).
    use tock_registers::register_bitfields;
    register_bitfields! {
        u32,
            pub Control [
                RstTxFifo OFFSET(0) NUMBITS(1) [],
                RstRxFifo OFFSET(1) NUMBITS(1) [],
                EnableIntr OFFSET(4) NUMBITS(1) [],
            ],
            pub Status [
                RxFifoValidData OFFSET(0) NUMBITS(1) [],
                RxFifoFull OFFSET(1) NUMBITS(1) [],
                TxFifoEmpty OFFSET(2) NUMBITS(1) [],
                TxFifoFull OFFSET(3) NUMBITS(1) [],
                IntrEnabled OFFSET(4) NUMBITS(1) [],
                OverrunError OFFSET(5) NUMBITS(1) [],
                FrameError OFFSET(6) NUMBITS(1) [],
                ParityError OFFSET(7) NUMBITS(1) [],
            ],
    }
}
pub mod regs {
    //! Types that represent registers.
    use tock_registers::register_structs;
    register_structs! {
        pub UartLite {
            (0x0 => pub rx_fifo: tock_registers::registers::ReadOnly<u32>),
            (0x4 => pub tx_fifo: tock_registers::registers::WriteOnly<u32>),
            (0x8 => pub stat: tock_registers::registers::ReadOnly<u32, crate::uart_lite::bits::Status::Register>),
            (0xc => pub ctrl: tock_registers::registers::WriteOnly<u32, crate::uart_lite::bits::Control::Register>),
            (0x10 => @END),
        }
    }
}
