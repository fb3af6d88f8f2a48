// Licensed under the Apache-2.0 license.

//! AMD LogiCORE AXI Interrupt Controller. One bit per input line in every
//! register except MER.

pub mod bits {
    //! Types that represent individual registers (bitfields).
    use tock_registers::register_bitfields;
    register_bitfields! {
        u32,
            pub MasterEnable [
                Me OFFSET(0) NUMBITS(1) [],
                /// Write once. Enables hardware interrupt generation.
                Hie OFFSET(1) NUMBITS(1) [],
            ],
    }
}
pub mod regs {
    //! Types that represent registers.
    use tock_registers::register_structs;
    register_structs! {
        pub AxiIntc {
            (0x0 => pub isr: tock_registers::registers::ReadWrite<u32>),
            (0x4 => pub ipr: tock_registers::registers::ReadOnly<u32>),
            (0x8 => pub ier: tock_registers::registers::ReadWrite<u32>),
            (0xc => pub iar: tock_registers::registers::WriteOnly<u32>),
            (0x10 => pub sie: tock_registers::registers::WriteOnly<u32>),
            (0x14 => pub cie: tock_registers::registers::WriteOnly<u32>),
            (0x18 => pub ivr: tock_registers::registers::ReadOnly<u32>),
            (0x1c => pub mer: tock_registers::registers::ReadWrite<u32, crate::axi_intc::bits::MasterEnable::Register>),
            (0x20 => @END),
        }
    }
}
