// Licensed under the Apache-2.0 license.

//! AMD LogiCORE AXI IIC, interrupt registers only. ISR bits toggle on write.

pub mod bits {
    //! Types that represent individual registers (bitfields).
    use tock_registers::register_bitfields;
    register_bitfields! {
        u32,
            pub GlobalIntEnable [
                Gie OFFSET(31) NUMBITS(1) [],
            ],
            pub IicInterrupt [
                ArbLost OFFSET(0) NUMBITS(1) [],
                TxErr OFFSET(1) NUMBITS(1) [],
                TxEmpty OFFSET(2) NUMBITS(1) [],
                RxFull OFFSET(3) NUMBITS(1) [],
                BusNotBusy OFFSET(4) NUMBITS(1) [],
                AddressedAsSlave OFFSET(5) NUMBITS(1) [],
                NotAddressedAsSlave OFFSET(6) NUMBITS(1) [],
                TxHalfEmpty OFFSET(7) NUMBITS(1) [],
            ],
    }
}
pub mod regs {
    //! Types that represent registers.
    use tock_registers::register_structs;
    register_structs! {
        pub AxiIic {
            (0x0 => _reserved0),
            (0x1c => pub gie: tock_registers::registers::ReadWrite<u32, crate::axi_iic::bits::GlobalIntEnable::Register>),
            (0x20 => pub isr: tock_registers::registers::ReadWrite<u32, crate::axi_iic::bits::IicInterrupt::Register>),
            (0x24 => _reserved1),
            (0x28 => pub ier: tock_registers::registers::ReadWrite<u32, crate::axi_iic::bits::IicInterrupt::Register>),
            (0x2c => @END),
        }
    }
}
