/*!

The provider state registry. The contract verifier names a provider state and a phase; the
registry finds the handler registered under that name and runs it.

!*/

mod application;

pub use application::{
    ApplicationDoesNotExist, ApplicationExists, ApplicationHasComponents,
    APPLICATION_DOES_NOT_EXIST, APPLICATION_EXISTS, APPLICATION_HAS_COMPONENTS,
};

use crate::control_plane::ControlPlane;
use crate::error::{self, Result};
use crate::harness::Harness;
use crate::params::ProviderState;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_plain::derive_display_from_serialize;
use snafu::{OptionExt, ResultExt};
use std::collections::BTreeMap;

/// The two phases of a provider state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StateAction {
    #[default]
    Setup,
    Teardown,
}

derive_display_from_serialize!(StateAction);

impl From<bool> for StateAction {
    fn from(setup: bool) -> Self {
        if setup {
            StateAction::Setup
        } else {
            StateAction::Teardown
        }
    }
}

impl StateAction {
    pub fn is_setup(&self) -> bool {
        matches!(self, StateAction::Setup)
    }
}

/// Establishes (`setup == true`) or removes (`setup == false`) one named provider state.
///
/// Setup must not return until the reconciler has caught up with whatever it submitted, so that
/// the replayed interaction observes the converged state.
#[async_trait::async_trait]
pub trait StateHandler<S: ControlPlane>: Send + Sync {
    async fn handle(&self, harness: &Harness<S>, setup: bool, state: &ProviderState) -> Result<()>;
}

/// The body of a provider state change callback as sent by a contract verifier.
///
/// ```json
/// { "state": "Application exists", "params": { "params": { ... } }, "action": "setup" }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StateChangeRequest {
    pub state: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default)]
    pub action: StateAction,
}

impl StateChangeRequest {
    pub fn into_parts(self) -> (ProviderState, StateAction) {
        (ProviderState::new(self.state, self.params), self.action)
    }
}

/// Maps provider state names to their handlers.
pub struct StateHandlers<S: ControlPlane> {
    handlers: BTreeMap<String, Box<dyn StateHandler<S>>>,
}

impl<S: ControlPlane> Default for StateHandlers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ControlPlane> StateHandlers<S> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// A registry holding the application provider states that the consumer contracts use.
    pub fn standard() -> Self {
        Self::new()
            .register(APPLICATION_DOES_NOT_EXIST, ApplicationDoesNotExist)
            .register(APPLICATION_EXISTS, ApplicationExists)
            .register(APPLICATION_HAS_COMPONENTS, ApplicationHasComponents)
    }

    /// Register `handler` under `name`, replacing any handler already registered under it.
    pub fn register<N, H>(mut self, name: N, handler: H) -> Self
    where
        N: Into<String>,
        H: StateHandler<S> + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Run the handler registered for `state.name`. Fails with `Error::UnknownState` if there is
    /// none. Handler failures are wrapped in `Error::StateChange` so that the state and phase
    /// appear in the verifier's output.
    pub async fn dispatch(
        &self,
        harness: &Harness<S>,
        setup: bool,
        state: &ProviderState,
    ) -> Result<()> {
        let action = StateAction::from(setup);
        let handler = self
            .handlers
            .get(&state.name)
            .context(error::UnknownStateSnafu {
                name: state.name.as_str(),
            })?;
        info!("running {} for provider state '{}'", action, state.name);
        handler
            .handle(harness, setup, state)
            .await
            .context(error::StateChangeSnafu {
                state: state.name.as_str(),
                action,
            })?;
        info!("finished {} for provider state '{}'", action, state.name);
        Ok(())
    }

    /// Run a state change callback received from a contract verifier.
    pub async fn dispatch_request(
        &self,
        harness: &Harness<S>,
        request: StateChangeRequest,
    ) -> Result<()> {
        let (state, action) = request.into_parts();
        self.dispatch(harness, action.is_setup(), &state).await
    }
}
