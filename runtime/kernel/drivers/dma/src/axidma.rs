// Licensed under the Apache-2.0 license

// This is a driver for the AMD LogiCORE IP AXI Direct Memory Access (AXI DMA) core.
// Reference: https://docs.amd.com/r/en-US/pg021_axi_dma
// This driver only supports direct register (simple) mode.

use crate::hil::{Direction, EngineStatus, ResetControl, StreamEngine, TransferDescriptor};
use crate::recovery::reset_engine;
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;
use registers_generated::axidma::bits::{DmaControl, DmaStatus, TransferLength};
use registers_generated::axidma::regs::AxiDma;
use tock_registers::registers::ReadWrite;

/// Largest length the 26-bit length registers can hold.
pub const MAX_TRANSFER_LEN: usize = (1 << 26) - 1;

/// Memory-side addresses must be word aligned; the core is built without
/// data realignment.
pub const ADDRESS_ALIGNMENT: u64 = 4;

pub struct AxiDMA {
    registers: StaticRef<AxiDma>,
    reset_polls: u32,
}

impl AxiDMA {
    pub const fn new(base: StaticRef<AxiDma>, reset_polls: u32) -> AxiDMA {
        AxiDMA {
            registers: base,
            reset_polls,
        }
    }

    /// Reset both channels and clear any stale interrupts.
    ///
    /// Fails with `FAIL` if the reset does not complete and with `NOSUPPORT`
    /// if the core was built with the scatter gather engine.
    pub fn init(&self) -> Result<(), ErrorCode> {
        reset_engine(self, self.reset_polls).map_err(|_| ErrorCode::FAIL)?;
        self.check_simple_mode()?;
        for direction in Direction::ALL {
            self.acknowledge_interrupts(direction, EngineStatus::IRQ_ALL);
        }
        Ok(())
    }

    fn check_simple_mode(&self) -> Result<(), ErrorCode> {
        if self.registers.mm2s_dmasr.is_set(DmaStatus::SgIncld) {
            return Err(ErrorCode::NOSUPPORT);
        }
        Ok(())
    }

    fn control(&self, direction: Direction) -> &ReadWrite<u32, DmaControl::Register> {
        match direction {
            Direction::Outbound => &self.registers.mm2s_dmacr,
            Direction::Inbound => &self.registers.s2mm_dmacr,
        }
    }

    fn status(&self, direction: Direction) -> &ReadWrite<u32, DmaStatus::Register> {
        match direction {
            Direction::Outbound => &self.registers.mm2s_dmasr,
            Direction::Inbound => &self.registers.s2mm_dmasr,
        }
    }

    fn length(&self, direction: Direction) -> &ReadWrite<u32, TransferLength::Register> {
        match direction {
            Direction::Outbound => &self.registers.mm2s_length,
            Direction::Inbound => &self.registers.s2mm_length,
        }
    }

    fn is_busy(&self, direction: Direction) -> bool {
        let status = self.status(direction).extract();
        !status.is_set(DmaStatus::Halted) && !status.is_set(DmaStatus::Idle)
    }
}

impl ResetControl for AxiDMA {
    fn issue_reset(&self) {
        // Resetting either channel resets the whole core.
        self.registers.mm2s_dmacr.modify(DmaControl::Reset::SET);
    }

    fn reset_done(&self) -> bool {
        !self.registers.mm2s_dmacr.is_set(DmaControl::Reset)
            && !self.registers.s2mm_dmacr.is_set(DmaControl::Reset)
    }
}

impl StreamEngine for AxiDMA {
    fn start(&self, transfer: TransferDescriptor) -> Result<(), ErrorCode> {
        transfer.validate(ADDRESS_ALIGNMENT, MAX_TRANSFER_LEN)?;
        let direction = transfer.direction();
        if self.is_busy(direction) {
            return Err(ErrorCode::BUSY);
        }

        let address = transfer.memory_address();
        match direction {
            Direction::Outbound => {
                self.registers.mm2s_sa.set(address as u32);
                self.registers.mm2s_sa_msb.set((address >> 32) as u32);
            }
            Direction::Inbound => {
                self.registers.s2mm_da.set(address as u32);
                self.registers.s2mm_da_msb.set((address >> 32) as u32);
            }
        }
        self.control(direction).modify(DmaControl::Rs::SET);

        // Writing the length starts the channel, so it goes last.
        self.length(direction)
            .write(TransferLength::Length.val(transfer.length() as u32));
        Ok(())
    }

    fn enable_interrupts(&self, direction: Direction) {
        self.control(direction)
            .modify(DmaControl::IocIrqEn::SET + DmaControl::ErrIrqEn::SET);
    }

    fn disable_interrupts(&self, direction: Direction) {
        self.control(direction)
            .modify(DmaControl::IocIrqEn::CLEAR + DmaControl::ErrIrqEn::CLEAR);
    }

    fn pending_interrupts(&self, direction: Direction) -> EngineStatus {
        EngineStatus::from_bits_truncate(self.status(direction).get())
    }

    fn acknowledge_interrupts(&self, direction: Direction, status: EngineStatus) {
        // Write 1 to clear; the other status bits are read only.
        self.status(direction).set(status.irq_bits().bits());
    }

    fn bytes_transferred(&self, direction: Direction) -> usize {
        self.length(direction).read(TransferLength::Length) as usize
    }

    fn reinitialize(&self) -> Result<(), ErrorCode> {
        self.init()
    }
}
