/*!

A bounded, fixed-interval polling primitive used for every "wait until the reconciler has caught
up" check. The predicate is evaluated immediately and then once per interval until it reports
`true`, the deadline passes, or the harness is cancelled.

!*/

use crate::error::{self, Result};
use log::{trace, warn};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(250);

/// How long to wait for convergence and how often to check.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PollPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Poller {
    policy: PollPolicy,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(policy: PollPolicy, cancel: CancellationToken) -> Self {
        Self { policy, cancel }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// A poller with a different policy that is cancelled along with this one.
    pub fn with_policy(&self, policy: PollPolicy) -> Self {
        Self {
            policy,
            cancel: self.cancel.clone(),
        }
    }

    /// Wait until `predicate` returns `Ok(true)`. `Err` results are treated as transient: they are
    /// logged and the predicate is tried again at the next interval.
    ///
    /// Fails with `Error::Convergence` once the timeout has elapsed (no earlier than `timeout`
    /// and no later than `timeout + interval` after the call), or with `Error::Cancelled` if the
    /// cancellation token fires first. `what` describes the awaited condition in both errors.
    pub async fn await_condition<F, Fut, E>(&self, what: &str, mut predicate: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<bool, E>>,
        E: Display,
    {
        let start = Instant::now();
        let deadline = start + self.policy.timeout;
        let mut attempts: u32 = 0;
        loop {
            if self.cancel.is_cancelled() {
                return error::CancelledSnafu { what }.fail();
            }
            attempts += 1;
            // A read that hangs is cut off at the deadline and treated like a failed attempt.
            let outcome = tokio::select! {
                _ = self.cancel.cancelled() => return error::CancelledSnafu { what }.fail(),
                outcome = tokio::time::timeout_at(deadline, predicate()) => outcome,
            };
            match outcome {
                Ok(Ok(true)) => {
                    trace!("{} after {} attempt(s)", what, attempts);
                    return Ok(());
                }
                Ok(Ok(false)) => trace!("still waiting for {} (attempt {})", what, attempts),
                Ok(Err(e)) => warn!("Error while waiting for {}, will retry: {}", what, e),
                Err(_) => warn!("Check for {} did not complete before the deadline", what),
            }
            if start.elapsed() >= self.policy.timeout {
                return error::ConvergenceSnafu {
                    what,
                    timeout: self.policy.timeout,
                }
                .fail();
            }
            tokio::select! {
                _ = self.cancel.cancelled() => return error::CancelledSnafu { what }.fail(),
                _ = tokio::time::sleep(self.policy.interval) => {}
            }
        }
    }
}
