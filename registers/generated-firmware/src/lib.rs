// Licensed under the Apache-2.0 license.

// Register blocks for the loopback FPGA design.
#![no_std]

pub mod aurora_status;
pub mod axi_iic;
pub mod axi_intc;
pub mod axidma;
pub mod nwl_dma;
pub mod uart_lite;
