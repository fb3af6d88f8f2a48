// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "riscv32", no_std)]

/// Configures the memory map for the loopback firmware.
/// These are the defaults that can be overridden and provided to the runtime build.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryMap {
    /// DDR window the host writes ingress blocks into. Outbound transfers read from here.
    pub ingress_offset: u32,
    pub ingress_size: u32,
    /// Where the frame header sits inside the ingress window.
    pub frame_header_offset: u32,
    /// DDR window the inbound engine writes looped-back data into.
    pub rx_offset: u32,
    pub rx_size: u32,

    pub axidma_offset: u32,
    pub nwl_offset: u32,
    pub intc_offset: u32,
    pub iic_offset: u32,
    pub uart_offset: u32,
    pub link_status_offset: u32,
}

impl Default for MemoryMap {
    fn default() -> Self {
        MemoryMap {
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
        }
    }
}

/// Interrupt controller input line for each logical interrupt source.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IrqLines {
    pub ingress: u32,
    pub control_bus: u32,
    pub outbound: u32,
    pub inbound: u32,
}

impl Default for IrqLines {
    fn default() -> Self {
        IrqLines {
            ingress: 0,
            control_bus: 1,
            outbound: 2,
            inbound: 3,
        }
    }
}

/// Poll budgets and transfer sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopbackTuning {
    /// Polls allowed for a stream engine reset to complete.
    pub reset_poll_budget: u32,
    /// Polls allowed for each orchestrator wait, 0 for no limit.
    pub wait_polls: u32,
    /// Bytes moved by the stream self-test.
    pub stream_test_len: u32,
    /// Extra bytes the inbound engine is armed for beyond the frame length.
    pub inbound_headroom: u32,
    /// Frames between progress marks in relay mode.
    pub relay_report_interval: u32,
}

impl Default for LoopbackTuning {
    fn default() -> Self {
        LoopbackTuning {
            reset_poll_budget: 10_000,
            wait_polls: 0,
            stream_test_len: 0x100,
            inbound_headroom: 1,
            relay_report_interval: 100,
        }
    }
}
