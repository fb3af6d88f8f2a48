// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "riscv32", no_std)]

pub mod axi_iic;
pub mod axi_intc;
pub mod hil;
pub mod routing;
