// Licensed under the Apache-2.0 license

// Interrupt side of the AMD LogiCORE AXI IIC controller. Bus transfers are
// driven elsewhere; this only keeps the line from staying asserted.

use crate::hil::IrqHandler;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::StaticRef;
use registers_generated::axi_iic::bits::GlobalIntEnable;
use registers_generated::axi_iic::regs::AxiIic;

pub struct ControlBusIrq {
    registers: StaticRef<AxiIic>,
}

impl ControlBusIrq {
    pub const fn new(base: StaticRef<AxiIic>) -> ControlBusIrq {
        ControlBusIrq { registers: base }
    }

    /// Let the controller drive its interrupt output.
    pub fn enable(&self) {
        self.registers.gie.write(GlobalIntEnable::Gie::SET);
    }
}

impl IrqHandler for ControlBusIrq {
    fn handle_irq(&self) {
        // ISR bits toggle on write, so writing back what is pending clears it.
        let pending = self.registers.isr.get() & self.registers.ier.get();
        self.registers.isr.set(pending);
    }
}
