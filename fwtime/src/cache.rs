// Licensed under the Apache-2.0 license

use core::sync::atomic::{fence, Ordering};

/// Data cache maintenance needed before a DMA engine reads memory the CPU
/// has just written, and before the CPU reads memory an engine has written.
pub trait CacheMaintenance {
    /// Write back any cached lines covering `addr..addr + len`.
    fn flush_range(&self, addr: usize, len: usize);
}

/// For cores built without a data cache. Only orders the CPU's memory
/// writes ahead of the MMIO write that starts the engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDataCache;

impl CacheMaintenance for NoDataCache {
    fn flush_range(&self, _addr: usize, _len: usize) {
        fence(Ordering::SeqCst);
    }
}
