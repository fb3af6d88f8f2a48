// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "riscv32", no_std)]
#![allow(static_mut_refs)]

mod cache;
pub use cache::*;
mod region;
pub use region::*;
mod spin;
pub use spin::*;

// Console output shared by the drivers, capsules and board.

use core::fmt::{Display, Write};

pub static mut WRITER: Option<&'static mut dyn Write> = None;

/// Sets the global backing writer for `print` and `println` macros.
pub fn set_printer(writer: &'static mut dyn Write) {
    unsafe {
        WRITER = Some(writer);
    }
}

/// Run `f` against the installed writer, if any.
#[doc(hidden)]
pub fn with_printer<F: FnOnce(&mut dyn Write)>(f: F) {
    // Only the foreground loop prints; interrupt handlers never do.
    unsafe {
        if let Some(writer) = WRITER.as_mut() {
            f(&mut **writer);
        }
    }
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::with_printer(|writer| {
            let _ = core::fmt::Write::write_fmt(writer, format_args!($($arg)*));
        })
    };
}

#[macro_export]
macro_rules! println {
    ($($arg:tt)*) => {
        $crate::with_printer(|writer| {
            let _ = core::fmt::Write::write_fmt(writer, format_args!($($arg)*));
            let _ = core::fmt::Write::write_str(writer, "\r\n");
        })
    };
}

pub struct HexBytes<'a>(pub &'a [u8]);
impl Display for HexBytes<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for &x in self.0.iter() {
            f.write_char(nibble(x >> 4))?;
            f.write_char(nibble(x & 0xf))?;
        }
        Ok(())
    }
}

pub struct HexWord(pub u32);
impl Display for HexWord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        HexBytes(&self.0.to_be_bytes()).fmt(f)
    }
}

fn nibble(c: u8) -> char {
    if c < 10 {
        (c + b'0') as char
    } else {
        (c - 10 + b'A') as char
    }
}
