use crate::control_plane::ClientError;
use crate::params::DecodeError;
use crate::states::StateAction;
use snafu::Snafu;
use std::time::Duration;

/// The result type returned by the harness.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type returned by the harness. Every variant aborts the provider state that raised
/// it; nothing is retried at this level.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Unable to decode parameters for provider state '{}': {}", state, source))]
    Decode { state: String, source: DecodeError },

    #[snafu(display("Unable to {}: {}", action, source))]
    Store { action: String, source: ClientError },

    #[snafu(display("Timed out after {:?} waiting for {}", timeout, what))]
    Convergence { what: String, timeout: Duration },

    #[snafu(display("Cancelled while waiting for {}", what))]
    Cancelled { what: String },

    #[snafu(display("No handler is registered for provider state '{}'", name))]
    UnknownState { name: String },

    #[snafu(display("Provider state '{}' failed during {}: {}", state, action, source))]
    StateChange {
        state: String,
        action: StateAction,
        #[snafu(source(from(Error, Box::new)))]
        source: Box<Error>,
    },

    #[snafu(display("Unable to read harness configuration from the environment: {}", source))]
    ConfigRead { source: envy::Error },

    #[snafu(display("Invalid harness configuration: {}", reason))]
    ConfigInvalid { reason: String },
}

impl Error {
    /// The error that caused a provider state change to fail, looking through the
    /// `StateChange` wrapper added by the registry.
    pub fn root(&self) -> &Error {
        match self {
            Error::StateChange { source, .. } => source.root(),
            other => other,
        }
    }
}
