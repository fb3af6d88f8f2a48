// Licensed under the Apache-2.0 license

use crate::intc::SimIntc;
use dma_driver::hil::{IngressEngine, LinkStatus};
use std::cell::Cell;

/// Bus bridge that latches an interrupt whenever the host finishes a block.
pub struct SimIngress<'a> {
    intc: &'a SimIntc<'a>,
    line: u32,
    latched: Cell<bool>,
    acknowledgements: Cell<u32>,
    queued: Cell<u32>,
}

impl<'a> SimIngress<'a> {
    pub fn new(intc: &'a SimIntc<'a>, line: u32) -> Self {
        SimIngress {
            intc,
            line,
            latched: Cell::new(false),
            acknowledgements: Cell::new(0),
            queued: Cell::new(0),
        }
    }

    /// The host finished writing a block.
    pub fn arrive(&self) {
        self.latched.set(true);
        self.intc.raise(self.line);
    }

    /// Deliver a block right after the next acknowledge, i.e. once the
    /// firmware has armed for it.
    pub fn arrive_after_acknowledge(&self) {
        self.queued.set(self.queued.get() + 1);
    }

    pub fn latched(&self) -> bool {
        self.latched.get()
    }

    pub fn acknowledgements(&self) -> u32 {
        self.acknowledgements.get()
    }
}

impl IngressEngine for SimIngress<'_> {
    fn acknowledge(&self) {
        self.acknowledgements.set(self.acknowledgements.get() + 1);
        self.latched.set(false);
        self.intc.lower(self.line);
        if self.queued.get() > 0 {
            self.queued.set(self.queued.get() - 1);
            self.arrive();
        }
    }
}

pub struct SimLink {
    up: Cell<bool>,
}

impl SimLink {
    pub fn new(up: bool) -> Self {
        SimLink { up: Cell::new(up) }
    }

    pub fn set_up(&self, up: bool) {
        self.up.set(up);
    }
}

impl LinkStatus for SimLink {
    fn channel_up(&self) -> bool {
        self.up.get()
    }
}
