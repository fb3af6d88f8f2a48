// Licensed under the Apache-2.0 license

//! Byte-for-byte comparison of a transfer's source and destination.

use fwtime::DmaRegion;

/// First differing byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub index: usize,
    pub expected: u8,
    pub actual: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyError {
    Mismatch(Mismatch),
    /// `len` runs past the end of one of the regions.
    OutOfRange { len: usize },
}

/// Compare the first `len` bytes of `expected` and `actual`.
pub fn compare(
    expected: &DmaRegion,
    actual: &DmaRegion,
    len: usize,
) -> Result<(), VerifyError> {
    if len > expected.len() || len > actual.len() {
        return Err(VerifyError::OutOfRange { len });
    }
    for index in 0..len {
        let e = expected.read_u8(index).ok_or(VerifyError::OutOfRange { len })?;
        let a = actual.read_u8(index).ok_or(VerifyError::OutOfRange { len })?;
        if e != a {
            return Err(VerifyError::Mismatch(Mismatch {
                index,
                expected: e,
                actual: a,
            }));
        }
    }
    Ok(())
}
