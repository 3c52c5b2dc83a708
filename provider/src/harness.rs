use crate::config::HarnessConfig;
use crate::control_plane::ControlPlane;
use crate::error::Result;
use crate::poller::{PollPolicy, Poller};
use tokio_util::sync::CancellationToken;

/// The context every state handler runs in: the store it acts on and the poller it waits with.
///
/// A `Harness` is created once per verification suite and shared by all of its provider states.
/// Cancelling its token (see [`Harness::abort`]) makes any in-flight wait fail promptly with
/// `Error::Cancelled`.
pub struct Harness<S: ControlPlane> {
    store: S,
    poller: Poller,
}

impl<S: ControlPlane> Harness<S> {
    pub fn new(store: S, policy: PollPolicy) -> Self {
        Self::with_cancellation(store, policy, CancellationToken::new())
    }

    /// Create a `Harness` whose waits are cancelled when `token` is cancelled.
    pub fn with_cancellation(store: S, policy: PollPolicy, token: CancellationToken) -> Self {
        Self {
            store,
            poller: Poller::new(policy, token),
        }
    }

    /// Create a `Harness` using the poll policy from `config`.
    pub fn from_config(store: S, config: &HarnessConfig) -> Result<Self> {
        Ok(Self::new(store, config.poll_policy()?))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.poller.cancellation_token()
    }

    /// Cancel every wait in progress and every wait started afterwards.
    pub fn abort(&self) {
        self.poller.cancellation_token().cancel()
    }
}
