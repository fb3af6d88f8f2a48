// Licensed under the Apache-2.0 license

// Driver for the AMD LogiCORE IP AXI Interrupt Controller (INTC).
// Reference: https://docs.amd.com/r/en-US/pg099-axi-intc

use crate::hil::InterruptController;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;
use registers_generated::axi_intc::bits::MasterEnable;
use registers_generated::axi_intc::regs::AxiIntc;

/// Line used to check the status register during self test.
const TEST_MASK: u32 = 1;

pub struct AxiINTC {
    registers: StaticRef<AxiIntc>,
    lines: u32,
}

impl AxiINTC {
    pub const fn new(base: StaticRef<AxiIntc>, lines: u32) -> AxiINTC {
        AxiINTC {
            registers: base,
            lines,
        }
    }

    fn all_lines(&self) -> u32 {
        if self.lines >= 32 {
            u32::MAX
        } else {
            (1 << self.lines) - 1
        }
    }

    fn mask(&self, line: u32) -> Option<u32> {
        if line < self.lines {
            Some(1 << line)
        } else {
            None
        }
    }
}

impl InterruptController for AxiINTC {
    fn line_count(&self) -> u32 {
        self.lines
    }

    fn enable_line(&self, line: u32) {
        if let Some(mask) = self.mask(line) {
            let ier = self.registers.ier.get();
            self.registers.ier.set(ier | mask);
        }
    }

    fn disable_line(&self, line: u32) {
        if let Some(mask) = self.mask(line) {
            let ier = self.registers.ier.get();
            self.registers.ier.set(ier & !mask);
        }
    }

    fn pending_lines(&self) -> u32 {
        self.registers.ipr.get() & self.all_lines()
    }

    fn acknowledge_line(&self, line: u32) {
        if let Some(mask) = self.mask(line) {
            self.registers.iar.set(mask);
        }
    }

    fn self_test(&self) -> Result<(), ErrorCode> {
        // ISR is software writable until hardware interrupts are enabled.
        self.registers.iar.set(self.all_lines());
        self.registers.isr.set(TEST_MASK);
        let readback = self.registers.isr.get();
        self.registers.iar.set(TEST_MASK);
        if readback & TEST_MASK != TEST_MASK {
            return Err(ErrorCode::FAIL);
        }
        Ok(())
    }

    fn start(&self) -> Result<(), ErrorCode> {
        self.registers
            .mer
            .write(MasterEnable::Me::SET + MasterEnable::Hie::SET);
        if !self.registers.mer.is_set(MasterEnable::Me) {
            return Err(ErrorCode::FAIL);
        }
        Ok(())
    }
}
