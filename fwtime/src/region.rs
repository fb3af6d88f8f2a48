// Licensed under the Apache-2.0 license

//! Windows onto device memory that DMA engines read and write.
//!
//! Every access is volatile: an engine may change the contents at any time
//! the CPU is not looking, so the compiler must not cache or elide reads.

use core::ptr::{read_volatile, write_volatile};
use zerocopy::{FromBytes, FromZeros, IntoBytes};

/// A fixed window of device memory, such as a DDR buffer an engine
/// targets. Copies are cheap and all refer to the same memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DmaRegion {
    base: usize,
    len: usize,
}

impl DmaRegion {
    /// # Safety
    ///
    /// `base..base + len` must be valid for volatile reads and writes for
    /// the lifetime of the program, and must not be accessed through Rust
    /// references while a region refers to it.
    pub const unsafe fn new(base: usize, len: usize) -> Self {
        DmaRegion { base, len }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// Bus address as programmed into an engine.
    pub fn bus_address(&self) -> u64 {
        self.base as u64
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The part of this region starting at `offset` of length `len`, if it fits.
    pub fn subregion(&self, offset: usize, len: usize) -> Option<DmaRegion> {
        let end = offset.checked_add(len)?;
        if end > self.len {
            return None;
        }
        Some(DmaRegion {
            base: self.base + offset,
            len,
        })
    }

    pub fn read_u8(&self, index: usize) -> Option<u8> {
        if index >= self.len {
            return None;
        }
        // Safety: index is inside the region, which the constructor vouched for.
        Some(unsafe { read_volatile((self.base + index) as *const u8) })
    }

    pub fn write_u8(&self, index: usize, value: u8) -> Option<()> {
        if index >= self.len {
            return None;
        }
        // Safety: index is inside the region, which the constructor vouched for.
        unsafe { write_volatile((self.base + index) as *mut u8, value) };
        Some(())
    }

    /// Copies `buf.len()` bytes starting at `offset` into `buf`.
    pub fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> Option<()> {
        self.subregion(offset, buf.len())?;
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.read_u8(offset + i)?;
        }
        Some(())
    }

    pub fn write_bytes(&self, offset: usize, data: &[u8]) -> Option<()> {
        self.subregion(offset, data.len())?;
        for (i, b) in data.iter().enumerate() {
            self.write_u8(offset + i, *b)?;
        }
        Some(())
    }

    /// Writes `len` bytes from offset 0, each produced from its index.
    pub fn fill_with<F: FnMut(usize) -> u8>(&self, len: usize, mut f: F) -> Option<()> {
        self.subregion(0, len)?;
        for i in 0..len {
            self.write_u8(i, f(i))?;
        }
        Some(())
    }

    /// Reads a plain-old-data value laid out at `offset` in bus byte order.
    pub fn read_obj<T: FromBytes + IntoBytes>(&self, offset: usize) -> Option<T> {
        let mut value = <T as FromZeros>::new_zeroed();
        self.read_bytes(offset, value.as_mut_bytes())?;
        Some(value)
    }
}
