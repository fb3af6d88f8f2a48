// Licensed under the Apache-2.0 license

//! Routing table from controller lines to the handlers of the logical
//! interrupt sources.

use crate::hil::{InterruptController, IrqHandler, IrqSourceControl, IrqSources};
use kernel::platform::chip::InterruptService;
use kernel::utilities::cells::OptionalCell;
use loopback_config::IrqLines;

const SOURCES: [IrqSources; 4] = [
    IrqSources::INGRESS,
    IrqSources::OUTBOUND,
    IrqSources::INBOUND,
    IrqSources::CONTROL_BUS,
];

/// One handler per logical source.
pub struct IrqBindings<'a> {
    pub ingress: &'a dyn IrqHandler,
    pub outbound: &'a dyn IrqHandler,
    pub inbound: &'a dyn IrqHandler,
    pub control_bus: &'a dyn IrqHandler,
}

impl<'a> IrqBindings<'a> {
    fn handler(&self, source: IrqSources) -> &'a dyn IrqHandler {
        if source == IrqSources::INGRESS {
            self.ingress
        } else if source == IrqSources::OUTBOUND {
            self.outbound
        } else if source == IrqSources::INBOUND {
            self.inbound
        } else {
            self.control_bus
        }
    }
}

/// Reasons the routing table could not be set up. Any of them leaves an
/// event source without a handler, so initialization has to stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteError {
    AlreadyConfigured,
    SelfTestFailed,
    StartFailed,
    LineOutOfRange { source: IrqSources, line: u32 },
    LineShared { source: IrqSources, other: IrqSources, line: u32 },
}

pub struct InterruptRouter<'a, C: InterruptController> {
    controller: &'a C,
    lines: IrqLines,
    handlers: [OptionalCell<&'a dyn IrqHandler>; 4],
}

impl<'a, C: InterruptController> InterruptRouter<'a, C> {
    pub fn new(controller: &'a C, lines: IrqLines) -> Self {
        InterruptRouter {
            controller,
            lines,
            handlers: [
                OptionalCell::empty(),
                OptionalCell::empty(),
                OptionalCell::empty(),
                OptionalCell::empty(),
            ],
        }
    }

    fn line(&self, source: IrqSources) -> u32 {
        if source == IrqSources::INGRESS {
            self.lines.ingress
        } else if source == IrqSources::OUTBOUND {
            self.lines.outbound
        } else if source == IrqSources::INBOUND {
            self.lines.inbound
        } else {
            self.lines.control_bus
        }
    }

    /// Bind every source to its handler and start the controller.
    ///
    /// Nothing is recorded unless every binding is valid. All sources are
    /// left disabled.
    pub fn configure(&self, bindings: IrqBindings<'a>) -> Result<(), RouteError> {
        if self.handlers.iter().any(|h| h.is_some()) {
            return Err(RouteError::AlreadyConfigured);
        }
        self.controller
            .self_test()
            .map_err(|_| RouteError::SelfTestFailed)?;

        for (i, &source) in SOURCES.iter().enumerate() {
            let line = self.line(source);
            if line >= self.controller.line_count() {
                return Err(RouteError::LineOutOfRange { source, line });
            }
            if let Some(&other) = SOURCES[..i].iter().find(|&&s| self.line(s) == line) {
                return Err(RouteError::LineShared {
                    source,
                    other,
                    line,
                });
            }
        }

        for (slot, &source) in self.handlers.iter().zip(SOURCES.iter()) {
            self.controller.disable_line(self.line(source));
            slot.set(bindings.handler(source));
        }

        self.controller
            .start()
            .map_err(|_| RouteError::StartFailed)
    }

    /// Service every pending line once. Returns whether anything was pending.
    pub fn dispatch(&self) -> bool {
        let pending = self.controller.pending_lines();
        let mut serviced = false;
        for line in 0..u32::BITS {
            if pending & (1 << line) != 0 {
                self.service_line(line);
                serviced = true;
            }
        }
        serviced
    }

    /// Run the handler bound to `line`, then acknowledge the line. Lines
    /// without a handler are only acknowledged.
    fn service_line(&self, line: u32) -> bool {
        let handler = SOURCES
            .iter()
            .position(|&source| self.line(source) == line)
            .and_then(|slot| self.handlers[slot].get());
        if let Some(handler) = handler {
            handler.handle_irq();
        }
        self.controller.acknowledge_line(line);
        handler.is_some()
    }
}

impl<C: InterruptController> IrqSourceControl for InterruptRouter<'_, C> {
    fn enable(&self, sources: IrqSources) {
        for source in sources.iter() {
            self.controller.enable_line(self.line(source));
        }
    }

    fn disable(&self, sources: IrqSources) {
        for source in sources.iter() {
            self.controller.disable_line(self.line(source));
        }
    }
}

impl<C: InterruptController> InterruptService for InterruptRouter<'_, C> {
    unsafe fn service_interrupt(&self, interrupt: u32) -> bool {
        self.service_line(interrupt)
    }
}
