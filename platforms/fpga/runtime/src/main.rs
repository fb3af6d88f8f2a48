// Licensed under the Apache-2.0 license.

//! Board file for the FPGA loopback design: a RISC-V soft core next to an
//! AXI DMA engine whose stream ports run through an Aurora link.

#![cfg_attr(target_arch = "riscv32", no_std)]
#![no_main]

#[cfg(target_arch = "riscv32")]
mod board;
#[cfg(target_arch = "riscv32")]
mod interrupts;
#[cfg(target_arch = "riscv32")]
pub mod io;

#[cfg(target_arch = "riscv32")]
pub use board::*;

use loopback_config::MemoryMap;

// exported so debuggers and bring-up scripts can find the buffers
#[no_mangle]
#[used]
pub static MEMORY_MAP: MemoryMap = loopback_config_fpga::FPGA_MEMORY_MAP;

#[cfg(target_arch = "riscv32")]
#[no_mangle]
/// # Safety
///
/// Initializing the board is inherently unsafe.
pub unsafe fn main() {
    board::main();
}

#[cfg(not(target_arch = "riscv32"))]
#[no_mangle]
pub extern "C" fn main() {
    // no-op on x86 just to keep the build clean
}
