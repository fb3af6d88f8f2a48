// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "riscv32", no_std)]
#![forbid(unsafe_code)]

#[cfg(test)]
#[macro_use]
mod testbench;

pub mod error;
pub mod frame;
pub mod handlers;
pub mod orchestrator;
pub mod relay;
pub mod signals;
pub mod verify;
