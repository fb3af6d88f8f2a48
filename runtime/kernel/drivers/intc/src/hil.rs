// Licensed under the Apache-2.0 license.

//! HIL for the external interrupt controller and the handlers it fans out to.
use bitflags::bitflags;
use kernel::ErrorCode;

/// Services one interrupt source. Runs in interrupt context: it must not
/// block, print or move data.
pub trait IrqHandler {
    fn handle_irq(&self);
}

/// A controller with one enable and one pending bit per input line.
pub trait InterruptController {
    /// Number of input lines the controller was built with.
    fn line_count(&self) -> u32;

    fn enable_line(&self, line: u32);

    fn disable_line(&self, line: u32);

    /// Bitmask of lines that are both pending and enabled.
    fn pending_lines(&self) -> u32;

    /// Tell the controller the device behind `line` has been serviced.
    fn acknowledge_line(&self, line: u32);

    /// Check that the controller registers respond. Must run before `start`.
    fn self_test(&self) -> Result<(), ErrorCode>;

    /// Begin forwarding enabled lines to the CPU.
    fn start(&self) -> Result<(), ErrorCode>;
}

bitflags! {
    /// Logical interrupt sources of the loopback design.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct IrqSources: u32 {
        /// Host block arrived through the bus bridge.
        const INGRESS = 1 << 0;
        /// Stream engine, memory to link.
        const OUTBOUND = 1 << 1;
        /// Stream engine, link to memory.
        const INBOUND = 1 << 2;
        /// Low speed control bus (IIC).
        const CONTROL_BUS = 1 << 3;

        const ALL = Self::INGRESS.bits()
            | Self::OUTBOUND.bits()
            | Self::INBOUND.bits()
            | Self::CONTROL_BUS.bits();
    }
}

/// Enables and disables logical interrupt sources. Both operations are
/// idempotent.
pub trait IrqSourceControl {
    fn enable(&self, sources: IrqSources);

    fn disable(&self, sources: IrqSources);
}
