// Licensed under the Apache-2.0 license.

use core::fmt::Write;
use core::panic::PanicInfo;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::StaticRef;
use registers_generated::uart_lite::bits::Status;
use registers_generated::uart_lite::regs::UartLite;

pub(crate) const UART_BASE: StaticRef<UartLite> = unsafe {
    StaticRef::new(loopback_config_fpga::FPGA_MEMORY_MAP.uart_offset as *const UartLite)
};

/// Polled console on the UART Lite.
pub struct UartWriter {
    registers: StaticRef<UartLite>,
}

impl UartWriter {
    pub const fn new(base: StaticRef<UartLite>) -> UartWriter {
        UartWriter { registers: base }
    }

    fn put(&self, byte: u8) {
        while self.registers.stat.is_set(Status::TxFifoFull) {}
        self.registers.tx_fifo.set(byte as u32);
    }

    /// Byte waiting in the receive FIFO, if any.
    pub fn key_pressed(&self) -> Option<u8> {
        if self.registers.stat.is_set(Status::RxFifoValidData) {
            Some(self.registers.rx_fifo.get() as u8)
        } else {
            None
        }
    }
}

impl Write for UartWriter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for b in s.bytes() {
            self.put(b);
        }
        Ok(())
    }
}

/// Panic handler.
#[cfg(not(test))]
#[no_mangle]
#[panic_handler]
pub fn panic_fmt(pi: &PanicInfo) -> ! {
    let mut writer = UartWriter::new(UART_BASE);
    let _ = write!(writer, "\r\n[loopback] panic: {}\r\n", pi);
    loop {
        rv32i::support::wfi();
    }
}
