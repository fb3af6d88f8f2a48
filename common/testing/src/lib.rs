// Licensed under the Apache-2.0 license

//! Simulated loopback hardware for host tests.
//!
//! The simulated interrupt controller delivers raised lines straight into
//! whatever `InterruptService` is attached, the way the trap handler does on
//! target, so handlers run synchronously inside the call that raised them.

mod engine;
mod ingress;
mod intc;
mod memory;

pub use engine::{SimStreamEngine, StartRecord};
pub use ingress::{SimIngress, SimLink};
pub use intc::SimIntc;
pub use memory::{dma_buffer, RecordingCache};
