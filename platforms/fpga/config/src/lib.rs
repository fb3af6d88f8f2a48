// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "riscv32", no_std)]

use loopback_config::{IrqLines, LoopbackTuning, MemoryMap};

pub const FPGA_MEMORY_MAP: MemoryMap = MemoryMap {
    ingress_offset: 0x8000_0000,
    ingress_size: 0x0100_0000,
    frame_header_offset: 0x4,
    rx_offset: 0x9000_0000,
    rx_size: 0x0100_0000,

    axidma_offset: 0x4040_0000,
    nwl_offset: 0x4800_0000,
    intc_offset: 0x4120_0000,
    iic_offset: 0x4080_0000,
    uart_offset: 0x4060_0000,
    link_status_offset: 0x4000_0000,
};

pub const FPGA_IRQ_LINES: IrqLines = IrqLines {
    ingress: 0,
    control_bus: 1,
    outbound: 2,
    inbound: 3,
};

pub const FPGA_TUNING: LoopbackTuning = LoopbackTuning {
    reset_poll_budget: 10_000,
    // hardware is trusted to answer every armed transfer
    wait_polls: 0,
    stream_test_len: 0x100,
    inbound_headroom: 1,
    relay_report_interval: 100,
};
