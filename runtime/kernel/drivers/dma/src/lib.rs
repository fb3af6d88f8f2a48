// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "riscv32", no_std)]

pub mod aurora;
pub mod axidma;
pub mod hil;
pub mod nwl;
pub mod recovery;
