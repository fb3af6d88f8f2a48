// Licensed under the Apache-2.0 license.

//! Bounded reset of a faulted stream engine.

use crate::hil::ResetControl;
use fwtime::{spin_until, WaitBudget};

/// Polls allowed for the reset-complete indication.
pub const DEFAULT_RESET_POLLS: u32 = 10_000;

/// The engine never reported reset completion. It must not be used again
/// until it is re-initialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResetTimeout {
    pub polls: u32,
}

/// Issue a reset to `engine` and poll for completion at most `max_polls`
/// times.
///
/// Returns the poll on which completion was seen. A budget of zero issues
/// the reset and fails without polling.
pub fn reset_engine<R: ResetControl + ?Sized>(
    engine: &R,
    max_polls: u32,
) -> Result<u32, ResetTimeout> {
    engine.issue_reset();
    spin_until(WaitBudget::Polls(max_polls), || engine.reset_done())
        .map_err(|timeout| ResetTimeout { polls: timeout.polls })
}
