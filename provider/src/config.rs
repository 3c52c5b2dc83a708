use crate::error::{self, Result};
use crate::poller::{PollPolicy, DEFAULT_INTERVAL, DEFAULT_TIMEOUT};
use serde::Deserialize;
use snafu::{ensure, ResultExt};
use std::time::Duration;

/// The prefix of every environment variable read by [`HarnessConfig::from_env`].
pub const ENV_PREFIX: &str = "PACT_PROVIDER_";

/// Settings for the harness, read from environment variables so that a contract verification run
/// can be tuned without recompiling.
///
/// # Example
///
/// ```text
/// PACT_PROVIDER_POLL_TIMEOUT_MS=30000
/// PACT_PROVIDER_POLL_INTERVAL_MS=500
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
pub struct HarnessConfig {
    /// How long to wait for the reconciler before giving up on a provider state.
    #[serde(default = "default_timeout_ms")]
    pub poll_timeout_ms: u64,

    /// How long to wait between checks. Must not be zero.
    #[serde(default = "default_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_timeout_ms(),
            poll_interval_ms: default_interval_ms(),
        }
    }
}

impl HarnessConfig {
    /// Read the configuration from `PACT_PROVIDER_*` environment variables. Unset variables take
    /// their defaults.
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .context(error::ConfigReadSnafu)
    }

    /// Read the configuration from `(name, value)` pairs, which are expected to carry the
    /// `PACT_PROVIDER_` prefix.
    pub fn from_iter<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Self>(vars)
            .context(error::ConfigReadSnafu)
    }

    pub fn poll_policy(&self) -> Result<PollPolicy> {
        ensure!(
            self.poll_interval_ms > 0,
            error::ConfigInvalidSnafu {
                reason: "the poll interval must be greater than zero"
            }
        );
        Ok(PollPolicy {
            timeout: Duration::from_millis(self.poll_timeout_ms),
            interval: Duration::from_millis(self.poll_interval_ms),
        })
    }
}

// We need these to provide defaults for serde.
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL.as_millis() as u64
}
