// Licensed under the Apache-2.0 license

use intc_driver::hil::InterruptController;
use kernel::platform::chip::InterruptService;
use kernel::utilities::cells::OptionalCell;
use kernel::ErrorCode;
use std::cell::Cell;

/// Interrupt controller with latched lines. A raised line stays pending
/// until it is acknowledged, and is delivered to the attached CPU as soon
/// as it is both pending and enabled once the controller is started.
pub struct SimIntc<'a> {
    lines: u32,
    enabled: Cell<u32>,
    raised: Cell<u32>,
    started: Cell<bool>,
    healthy: Cell<bool>,
    acknowledged: Cell<u32>,
    cpu: OptionalCell<&'a dyn InterruptService>,
    in_trap: Cell<bool>,
}

impl<'a> SimIntc<'a> {
    pub fn new(lines: u32) -> Self {
        SimIntc {
            lines,
            enabled: Cell::new(0),
            raised: Cell::new(0),
            started: Cell::new(false),
            healthy: Cell::new(true),
            acknowledged: Cell::new(0),
            cpu: OptionalCell::empty(),
            in_trap: Cell::new(false),
        }
    }

    /// Where pending lines are delivered.
    pub fn attach_cpu(&self, cpu: &'a dyn InterruptService) {
        self.cpu.set(cpu);
    }

    /// Make the register self-test fail.
    pub fn break_registers(&self) {
        self.healthy.set(false);
    }

    pub fn raise(&self, line: u32) {
        self.raised.set(self.raised.get() | (1 << line));
        self.deliver();
    }

    pub fn lower(&self, line: u32) {
        self.raised.set(self.raised.get() & !(1 << line));
    }

    pub fn is_raised(&self, line: u32) -> bool {
        self.raised.get() & (1 << line) != 0
    }

    pub fn is_enabled(&self, line: u32) -> bool {
        self.enabled.get() & (1 << line) != 0
    }

    pub fn started(&self) -> bool {
        self.started.get()
    }

    /// Number of line acknowledgements so far.
    pub fn acknowledgements(&self) -> u32 {
        self.acknowledged.get()
    }

    fn next_pending(&self) -> Option<u32> {
        let pending = self.pending_lines();
        if pending == 0 {
            None
        } else {
            Some(pending.trailing_zeros())
        }
    }

    /// Run the trap path for every deliverable line. Raises from inside a
    /// handler are picked up by the outer loop.
    fn deliver(&self) {
        if self.in_trap.get() || !self.started.get() {
            return;
        }
        self.cpu.map(|cpu| {
            self.in_trap.set(true);
            while let Some(line) = self.next_pending() {
                // SAFETY: host simulation, there is no trap context to corrupt.
                let handled = unsafe { cpu.service_interrupt(line) };
                if !handled {
                    self.lower(line);
                }
            }
            self.in_trap.set(false);
        });
    }
}

impl InterruptController for SimIntc<'_> {
    fn line_count(&self) -> u32 {
        self.lines
    }

    fn enable_line(&self, line: u32) {
        self.enabled.set(self.enabled.get() | (1 << line));
        self.deliver();
    }

    fn disable_line(&self, line: u32) {
        self.enabled.set(self.enabled.get() & !(1 << line));
    }

    fn pending_lines(&self) -> u32 {
        self.raised.get() & self.enabled.get()
    }

    fn acknowledge_line(&self, line: u32) {
        self.acknowledged.set(self.acknowledged.get() + 1);
        self.lower(line);
    }

    fn self_test(&self) -> Result<(), ErrorCode> {
        if self.healthy.get() {
            Ok(())
        } else {
            Err(ErrorCode::FAIL)
        }
    }

    fn start(&self) -> Result<(), ErrorCode> {
        self.started.set(true);
        self.deliver();
        Ok(())
    }
}
