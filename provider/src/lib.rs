/*!

`appstudio-pact-provider` puts an AppStudio control plane into the named provider states that
consumer contracts ask for, and takes them down again afterwards.

The contract verifier calls [`StateHandlers::dispatch`] (or [`StateHandlers::dispatch_request`]
with the callback body it received) once per interaction and phase. Setup decodes the state's
parameters, submits objects through a [`ControlPlane`] and then polls until the reconcilers under
test have caught up. Teardown deletes everything in the affected namespaces and waits for the
deletions to finish.

```no_run
# async fn doc() -> appstudio_pact_provider::Result<()> {
use appstudio_pact_provider::{
    DefaultControlPlane, Harness, HarnessConfig, ProviderState, StateHandlers,
};

let store = DefaultControlPlane::new().await.map_err(|e| {
    appstudio_pact_provider::Error::Store { action: "connect".into(), source: e }
})?;
let harness = Harness::from_config(store, &HarnessConfig::from_env()?)?;
let handlers = StateHandlers::standard();
let state = ProviderState::new(
    "Application exists",
    serde_json::from_str(r#"{"params": {"appName": "myapp", "namespace": "default"}}"#).unwrap(),
);
handlers.dispatch(&harness, true, &state).await?;
handlers.dispatch(&harness, false, &state).await?;
# Ok(())
# }
```

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub mod builder;
mod cleanup;
mod config;
pub mod control_plane;
mod error;
mod harness;
pub mod params;
mod poller;
pub mod states;

pub use config::{HarnessConfig, ENV_PREFIX};
pub use control_plane::{ClientError, ClientResult, ControlPlane, DefaultControlPlane};
pub use error::{Error, Result};
pub use harness::Harness;
pub use params::{AppParams, ComponentParams, DecodeError, ProviderState};
pub use poller::{PollPolicy, Poller, DEFAULT_INTERVAL, DEFAULT_TIMEOUT};
pub use states::{StateAction, StateChangeRequest, StateHandler, StateHandlers};
