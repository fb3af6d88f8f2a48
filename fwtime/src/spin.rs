// Licensed under the Apache-2.0 license

//! Busy-wait helpers. There is no timer service underneath the interrupt
//! layer, so every bound here is a count of polls rather than a duration.

/// How long a busy-wait may poll before giving up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitBudget {
    /// Poll until the condition holds, however long that takes.
    Unbounded,
    /// Poll at most this many times.
    Polls(u32),
}

impl WaitBudget {
    /// Maps a configured poll count to a budget, `0` meaning unbounded.
    pub const fn from_polls(polls: u32) -> Self {
        if polls == 0 {
            WaitBudget::Unbounded
        } else {
            WaitBudget::Polls(polls)
        }
    }
}

/// The budget ran out before the condition held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpinTimeout {
    /// Number of unsuccessful polls made.
    pub polls: u32,
}

/// Polls `condition` until it returns true or `budget` is used up.
///
/// On success returns the 1-based index of the poll that observed the
/// condition. With `Polls(n)` the condition is evaluated at most `n` times
/// and failure is reported after exactly `n` unsuccessful polls.
pub fn spin_until<F: FnMut() -> bool>(
    budget: WaitBudget,
    mut condition: F,
) -> Result<u32, SpinTimeout> {
    let mut polls: u32 = 0;
    loop {
        if let WaitBudget::Polls(limit) = budget {
            if polls >= limit {
                return Err(SpinTimeout { polls });
            }
        }
        polls = polls.saturating_add(1);
        if condition() {
            return Ok(polls);
        }
        core::hint::spin_loop();
    }
}

/// Busy-wait for `polls` iterations with nothing to watch for.
pub fn spin(polls: u32) {
    for _ in 0..polls {
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn succeeds_on_last_allowed_poll() {
        let mut calls = 0;
        let result = spin_until(WaitBudget::Polls(5), || {
            calls += 1;
            calls == 5
        });
        assert_eq!(result, Ok(5));
        assert_eq!(calls, 5);
    }

    #[test]
    fn fails_after_exactly_budget_polls() {
        let mut calls = 0;
        let result = spin_until(WaitBudget::Polls(5), || {
            calls += 1;
            calls == 6
        });
        assert_eq!(result, Err(SpinTimeout { polls: 5 }));
        assert_eq!(calls, 5);
    }

    #[test]
    fn zero_poll_budget_never_evaluates() {
        let mut calls = 0;
        let result = spin_until(WaitBudget::Polls(0), || {
            calls += 1;
            true
        });
        assert_eq!(result, Err(SpinTimeout { polls: 0 }));
        assert_eq!(calls, 0);
    }

    #[test]
    fn unbounded_waits_past_any_small_budget() {
        let mut calls = 0u32;
        let result = spin_until(WaitBudget::Unbounded, || {
            calls += 1;
            calls == 50_000
        });
        assert_eq!(result, Ok(50_000));
    }

    #[test]
    fn plain_delay_returns() {
        spin(0);
        spin(1_000);
    }

    #[test]
    fn zero_configured_polls_is_unbounded() {
        assert_eq!(WaitBudget::from_polls(0), WaitBudget::Unbounded);
        assert_eq!(WaitBudget::from_polls(10_000), WaitBudget::Polls(10_000));
    }
}
