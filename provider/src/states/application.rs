use super::StateHandler;
use crate::builder::{build_application, build_component};
use crate::control_plane::{ClientError, ControlPlane};
use crate::error::{self, Result};
use crate::harness::Harness;
use crate::params::{
    decode_app_params, decode_component_params, AppParams, ComponentParams, ProviderState,
};
use appstudio_model::clients::AllowNotFound;
use appstudio_model::Conditions;
use log::{debug, info};
use snafu::ResultExt;

pub const APPLICATION_DOES_NOT_EXIST: &str = "Application doesn't exist";
pub const APPLICATION_EXISTS: &str = "Application exists";
pub const APPLICATION_HAS_COMPONENTS: &str = "Application has components";

/// The number of conditions a `Component` carries once the reconciler has processed it.
const COMPONENT_RECONCILED_CONDITIONS: usize = 2;

fn decode_app(state: &ProviderState) -> Result<AppParams> {
    decode_app_params(&state.parameters).context(error::DecodeSnafu {
        state: state.name.as_str(),
    })
}

fn decode_components(state: &ProviderState) -> Result<Vec<ComponentParams>> {
    decode_component_params(&state.parameters).context(error::DecodeSnafu {
        state: state.name.as_str(),
    })
}

/// Deletes the application if it is there. Teardown leaves the whole namespace empty.
pub struct ApplicationDoesNotExist;

#[async_trait::async_trait]
impl<S: ControlPlane> StateHandler<S> for ApplicationDoesNotExist {
    async fn handle(&self, harness: &Harness<S>, setup: bool, state: &ProviderState) -> Result<()> {
        let app = decode_app(state)?;
        if !setup {
            return harness.cleanup_namespace(&app.namespace).await;
        }
        harness
            .store()
            .delete_application(&app.app_name, &app.namespace)
            .await
            .allow_not_found(|_| debug!("application '{}' is already absent", app))
            .context(error::StoreSnafu {
                action: format!("delete application '{}'", app),
            })?;
        Ok(())
    }
}

/// Creates the application and waits for the reconciler to mark it created.
pub struct ApplicationExists;

#[async_trait::async_trait]
impl<S: ControlPlane> StateHandler<S> for ApplicationExists {
    async fn handle(&self, harness: &Harness<S>, setup: bool, state: &ProviderState) -> Result<()> {
        let app = decode_app(state)?;
        if !setup {
            return harness.cleanup_namespace(&app.namespace).await;
        }
        await_application_absent_or_pending(harness, &app).await?;
        create_application(harness, &app).await
    }
}

/// Creates the application, unless it already exists, and then each component in order. After
/// each component the reconciler must have processed it and added it to the application's devfile
/// before the next one is created.
pub struct ApplicationHasComponents;

#[async_trait::async_trait]
impl<S: ControlPlane> StateHandler<S> for ApplicationHasComponents {
    async fn handle(&self, harness: &Harness<S>, setup: bool, state: &ProviderState) -> Result<()> {
        let components = decode_components(state)?;
        if !setup {
            let mut namespaces: Vec<&str> = Vec::new();
            for component in &components {
                if !namespaces.contains(&component.app.namespace.as_str()) {
                    namespaces.push(&component.app.namespace);
                }
            }
            for namespace in namespaces {
                harness.cleanup_namespace(namespace).await?;
            }
            return Ok(());
        }
        for component in &components {
            ensure_application(harness, &component.app).await?;
            create_component(harness, component).await?;
        }
        info!(
            "created {} component(s) for provider state '{}'",
            components.len(),
            state.name
        );
        Ok(())
    }
}

/// Waits until a previous run's application is gone, or has at least not been reconciled, so that
/// the condition check after creation observes the new object.
async fn await_application_absent_or_pending<S: ControlPlane>(
    harness: &Harness<S>,
    app: &AppParams,
) -> Result<()> {
    let store = harness.store();
    let (name, namespace) = (app.app_name.as_str(), app.namespace.as_str());
    harness
        .poller()
        .await_condition(
            &format!("application '{}' to be absent or pending", app),
            move || async move {
                let existing = store
                    .get_application(name, namespace)
                    .await
                    .allow_not_found(|_| ())?;
                Ok::<bool, ClientError>(
                    existing
                        .map(|application| application.condition_count() == 0)
                        .unwrap_or(true),
                )
            },
        )
        .await
}

async fn create_application<S: ControlPlane>(harness: &Harness<S>, app: &AppParams) -> Result<()> {
    harness
        .store()
        .create_application(build_application(&app.app_name, &app.namespace))
        .await
        .context(error::StoreSnafu {
            action: format!("create application '{}'", app),
        })?;
    let store = harness.store();
    let (name, namespace) = (app.app_name.as_str(), app.namespace.as_str());
    harness
        .poller()
        .await_condition(
            &format!("application '{}' to be created", app),
            move || async move {
                let application = store.get_application(name, namespace).await?;
                Ok::<bool, ClientError>(application.condition_count() >= 1)
            },
        )
        .await
}

/// Creates the application only if the store reports it missing. Any other read failure aborts.
async fn ensure_application<S: ControlPlane>(harness: &Harness<S>, app: &AppParams) -> Result<()> {
    let existing = harness
        .store()
        .get_application(&app.app_name, &app.namespace)
        .await
        .allow_not_found(|_| ())
        .context(error::StoreSnafu {
            action: format!("get application '{}'", app),
        })?;
    match existing {
        Some(_) => {
            debug!("application '{}' already exists", app);
            Ok(())
        }
        None => create_application(harness, app).await,
    }
}

async fn create_component<S: ControlPlane>(
    harness: &Harness<S>,
    component: &ComponentParams,
) -> Result<()> {
    let (name, namespace, app_name) = (
        component.component_name.as_str(),
        component.app.namespace.as_str(),
        component.app.app_name.as_str(),
    );
    harness
        .store()
        .create_component(build_component(
            name,
            namespace,
            app_name,
            &component.repository_url,
        ))
        .await
        .context(error::StoreSnafu {
            action: format!("create component '{}/{}'", namespace, name),
        })?;

    let store = harness.store();
    harness
        .poller()
        .await_condition(
            &format!("component '{}/{}' to be reconciled", namespace, name),
            move || async move {
                let created = store.get_component(name, namespace).await?;
                Ok::<bool, ClientError>(
                    created.condition_count() >= COMPONENT_RECONCILED_CONDITIONS,
                )
            },
        )
        .await?;

    harness
        .poller()
        .await_condition(
            &format!(
                "application '{}/{}' devfile to mention component '{}'",
                namespace, app_name, name
            ),
            move || async move {
                let application = store.get_application(app_name, namespace).await?;
                Ok::<bool, ClientError>(
                    application.condition_count() >= 1 && application.mentions_component(name),
                )
            },
        )
        .await
}
