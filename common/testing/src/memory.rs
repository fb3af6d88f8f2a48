// Licensed under the Apache-2.0 license

use fwtime::{CacheMaintenance, DmaRegion};
use std::cell::RefCell;

/// A word-aligned, zeroed region of host memory that lives for the rest of
/// the test binary.
pub fn dma_buffer(len: usize) -> DmaRegion {
    let words = vec![0u32; len.div_ceil(4).max(1)].into_boxed_slice();
    let base = Box::leak(words).as_mut_ptr() as usize;
    // SAFETY: leaked, so valid for the program's lifetime, and never
    // referenced except through the region.
    unsafe { DmaRegion::new(base, len) }
}

/// Remembers every range it was asked to flush.
#[derive(Default)]
pub struct RecordingCache {
    flushes: RefCell<Vec<(usize, usize)>>,
}

impl RecordingCache {
    pub fn flushes(&self) -> Vec<(usize, usize)> {
        self.flushes.borrow().clone()
    }

    pub fn flushed(&self, addr: usize, len: usize) -> bool {
        self.flushes.borrow().contains(&(addr, len))
    }
}

impl CacheMaintenance for RecordingCache {
    fn flush_range(&self, addr: usize, len: usize) {
        self.flushes.borrow_mut().push((addr, len));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_are_zeroed_and_aligned() {
        let region = dma_buffer(13);
        assert_eq!(region.len(), 13);
        assert_eq!(region.base() % 4, 0);
        assert!((0..13).all(|i| region.read_u8(i) == Some(0)));
    }

    #[test]
    fn cache_records_in_order() {
        let cache = RecordingCache::default();
        cache.flush_range(0x100, 4);
        cache.flush_range(0x200, 8);
        assert_eq!(cache.flushes(), vec![(0x100, 4), (0x200, 8)]);
        assert!(cache.flushed(0x200, 8));
        assert!(!cache.flushed(0x200, 4));
    }
}
