/*!

This test module provides an in-memory [`ControlPlane`] so that the state handlers can be tested
without Kubernetes.

The mock plays the part of the reconcilers as well: shortly after an `Application` is created it
gains a `Created` condition, and shortly after a `Component` is created it gains `Created` and
`Updated` conditions and its name is appended to the owning application's devfile. Time is driven
by tokio, so tests run with a paused clock.

!*/

use appstudio_model::constants::{CONDITION_CREATED, CONDITION_STATUS_TRUE, CONDITION_UPDATED};
use appstudio_model::{
    Application, Component, ComponentDetectionQuery, ComponentDetectionQuerySpec, Condition,
    CrdExt, ResourceKind,
};
use appstudio_pact_provider::control_plane::ErrorMessage;
use appstudio_pact_provider::{ClientError, ClientResult, ControlPlane};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::chrono::Utc;
use kube::core::DynamicObject;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// How long the simulated reconcilers take to process a new object.
pub(crate) const RECONCILE_DELAY: Duration = Duration::from_millis(600);

const FINALIZER: &str = "appstudio.redhat.com/test-finalizer";

type Key = (String, String);

fn key(namespace: &str, name: &str) -> Key {
    (namespace.to_string(), name.to_string())
}

fn not_found(kind: ResourceKind, namespace: &str, name: &str) -> ClientError {
    ClientError::NotFound(Some(Box::new(ErrorMessage::from(format!(
        "{} '{}/{}' not found",
        kind, namespace, name
    )))))
}

#[derive(Default)]
struct State {
    applications: BTreeMap<Key, Application>,
    components: BTreeMap<Key, Component>,
    queries: BTreeMap<Key, ComponentDetectionQuery>,
    /// Objects that a finalizer keeps around after deletion is requested.
    stuck: BTreeSet<(ResourceKind, String, String)>,
    calls: usize,
    delete_all_calls: Vec<(ResourceKind, String)>,
    failing_reads: usize,
    failing_writes: usize,
    /// The application devfile as it was when each component was submitted.
    devfile_snapshots: Vec<String>,
}

impl State {
    fn names(&self, kind: ResourceKind) -> Vec<Key> {
        match kind {
            ResourceKind::Application => self.applications.keys().cloned().collect(),
            ResourceKind::Component => self.components.keys().cloned().collect(),
            ResourceKind::ComponentDetectionQuery => self.queries.keys().cloned().collect(),
        }
    }

    fn remove(&mut self, kind: ResourceKind, key: &Key) {
        match kind {
            ResourceKind::Application => {
                self.applications.remove(key);
            }
            ResourceKind::Component => {
                self.components.remove(key);
            }
            ResourceKind::ComponentDetectionQuery => {
                self.queries.remove(key);
            }
        }
    }

    fn take_read_failure(&mut self) -> ClientResult<()> {
        if self.failing_reads > 0 {
            self.failing_reads -= 1;
            return Err(ClientError::RequestFailed(Some(Box::new(
                ErrorMessage::from("connection reset by peer"),
            ))));
        }
        Ok(())
    }

    fn take_write_failure(&mut self) -> ClientResult<()> {
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(ClientError::RequestFailed(Some(Box::new(
                ErrorMessage::from("internal server error"),
            ))));
        }
        Ok(())
    }
}

/// An in-memory [`ControlPlane`]. Clones share the same store.
#[derive(Clone)]
pub(crate) struct MockControlPlane {
    state: Arc<Mutex<State>>,
    reconcile: bool,
}

impl MockControlPlane {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            reconcile: true,
        }
    }

    /// A store whose objects never gain any status.
    pub(crate) fn without_reconciler() -> Self {
        Self {
            reconcile: false,
            ..Self::new()
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn record_call(&self) -> MutexGuard<'_, State> {
        let mut state = self.state();
        state.calls += 1;
        state
    }

    /// The number of calls made through the [`ControlPlane`] interface.
    pub(crate) fn calls(&self) -> usize {
        self.state().calls
    }

    pub(crate) fn delete_all_calls(&self) -> Vec<(ResourceKind, String)> {
        self.state().delete_all_calls.clone()
    }

    /// Make the next `n` reads fail with a transient error.
    pub(crate) fn fail_next_reads(&self, n: usize) {
        self.state().failing_reads = n;
    }

    /// Make the next `n` creates or deletes fail with a server error.
    pub(crate) fn fail_next_writes(&self, n: usize) {
        self.state().failing_writes = n;
    }

    /// Keep the object in the store after its deletion is requested.
    pub(crate) fn add_finalizer(&self, kind: ResourceKind, namespace: &str, name: &str) {
        self.state()
            .stuck
            .insert((kind, namespace.to_string(), name.to_string()));
    }

    pub(crate) fn devfile_snapshots(&self) -> Vec<String> {
        self.state().devfile_snapshots.clone()
    }

    pub(crate) fn count(&self, kind: ResourceKind, namespace: &str) -> usize {
        self.state()
            .names(kind)
            .iter()
            .filter(|(ns, _)| ns == namespace)
            .count()
    }

    pub(crate) fn application(&self, namespace: &str, name: &str) -> Option<Application> {
        self.state().applications.get(&key(namespace, name)).cloned()
    }

    pub(crate) fn component(&self, namespace: &str, name: &str) -> Option<Component> {
        self.state().components.get(&key(namespace, name)).cloned()
    }

    /// Put objects directly into the store, bypassing the call counter and the reconcilers.
    pub(crate) fn seed_application(&self, application: Application) {
        let key = key(application.object_namespace(), application.object_name());
        self.state().applications.insert(key, application);
    }

    pub(crate) fn seed_component(&self, component: Component) {
        let key = key(component.object_namespace(), component.object_name());
        self.state().components.insert(key, component);
    }

    pub(crate) fn seed_query(&self, namespace: &str, name: &str) {
        let mut query =
            ComponentDetectionQuery::new(name, ComponentDetectionQuerySpec::default());
        query.metadata.namespace = Some(namespace.to_string());
        self.state().queries.insert(key(namespace, name), query);
    }

    fn reconcile_application(&self, key: Key) {
        if !self.reconcile {
            return;
        }
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(RECONCILE_DELAY).await;
            let mut state = state.lock().unwrap();
            if let Some(application) = state.applications.get_mut(&key) {
                let status = application.status.get_or_insert_with(Default::default);
                status.devfile = format!("metadata:\n  name: {}\nschemaVersion: 2.1.0\n", key.1);
                status.conditions.push(
                    Condition::new(CONDITION_CREATED, CONDITION_STATUS_TRUE).with_reason("OK"),
                );
            }
        });
    }

    fn reconcile_component(&self, key: Key, application_name: String) {
        if !self.reconcile {
            return;
        }
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(RECONCILE_DELAY).await;
            let mut state = state.lock().unwrap();
            match state.components.get_mut(&key) {
                Some(component) => {
                    let status = component.status.get_or_insert_with(Default::default);
                    status
                        .conditions
                        .push(Condition::new(CONDITION_CREATED, CONDITION_STATUS_TRUE));
                    status
                        .conditions
                        .push(Condition::new(CONDITION_UPDATED, CONDITION_STATUS_TRUE));
                }
                None => return,
            }
            let app_key = (key.0.clone(), application_name);
            if let Some(application) = state.applications.get_mut(&app_key) {
                let status = application.status.get_or_insert_with(Default::default);
                if !status.devfile.contains("components:") {
                    status.devfile.push_str("components:\n");
                }
                status.devfile.push_str(&format!("- name: {}\n", key.1));
                if !status.conditions.iter().any(|c| c.type_ == CONDITION_UPDATED) {
                    status
                        .conditions
                        .push(Condition::new(CONDITION_UPDATED, CONDITION_STATUS_TRUE));
                }
            }
        });
    }
}

#[async_trait::async_trait]
impl ControlPlane for MockControlPlane {
    async fn create_application(&self, application: Application) -> ClientResult<Application> {
        let key = key(application.object_namespace(), application.object_name());
        {
            let mut state = self.record_call();
            state.take_write_failure()?;
            if state.applications.contains_key(&key) {
                return Err(ClientError::RequestFailed(Some(Box::new(
                    ErrorMessage::from("application already exists"),
                ))));
            }
            state.applications.insert(key.clone(), application.clone());
        }
        self.reconcile_application(key);
        Ok(application)
    }

    async fn get_application(&self, name: &str, namespace: &str) -> ClientResult<Application> {
        let mut state = self.record_call();
        state.take_read_failure()?;
        state
            .applications
            .get(&key(namespace, name))
            .cloned()
            .ok_or_else(|| not_found(ResourceKind::Application, namespace, name))
    }

    async fn delete_application(&self, name: &str, namespace: &str) -> ClientResult<()> {
        let mut state = self.record_call();
        state.take_write_failure()?;
        state
            .applications
            .remove(&key(namespace, name))
            .map(|_| ())
            .ok_or_else(|| not_found(ResourceKind::Application, namespace, name))
    }

    async fn create_component(&self, component: Component) -> ClientResult<Component> {
        let key = key(component.object_namespace(), component.object_name());
        let application_name = component.spec.application.clone();
        {
            let mut state = self.record_call();
            state.take_write_failure()?;
            if state.components.contains_key(&key) {
                return Err(ClientError::RequestFailed(Some(Box::new(
                    ErrorMessage::from("component already exists"),
                ))));
            }
            let devfile = state
                .applications
                .get(&(key.0.clone(), application_name.clone()))
                .map(|application| application.devfile().to_string())
                .unwrap_or_default();
            state.devfile_snapshots.push(devfile);
            state.components.insert(key.clone(), component.clone());
        }
        self.reconcile_component(key, application_name);
        Ok(component)
    }

    async fn get_component(&self, name: &str, namespace: &str) -> ClientResult<Component> {
        let mut state = self.record_call();
        state.take_read_failure()?;
        state
            .components
            .get(&key(namespace, name))
            .cloned()
            .ok_or_else(|| not_found(ResourceKind::Component, namespace, name))
    }

    async fn delete_all_of(&self, kind: ResourceKind, namespace: &str) -> ClientResult<()> {
        let mut state = self.record_call();
        state.take_write_failure()?;
        state.delete_all_calls.push((kind, namespace.to_string()));
        let doomed: Vec<Key> = state
            .names(kind)
            .into_iter()
            .filter(|(ns, name)| {
                ns == namespace && !state.stuck.contains(&(kind, ns.clone(), name.clone()))
            })
            .collect();
        for key in doomed {
            state.remove(kind, &key);
        }
        Ok(())
    }

    async fn list(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
    ) -> ClientResult<Vec<DynamicObject>> {
        let mut state = self.record_call();
        state.take_read_failure()?;
        let resource = kind.api_resource();
        Ok(state
            .names(kind)
            .into_iter()
            .filter(|(ns, _)| {
                namespace
                    .map(|wanted| wanted == ns.as_str())
                    .unwrap_or(true)
            })
            .map(|(ns, name)| {
                let terminating = state.stuck.contains(&(kind, ns.clone(), name.clone()));
                let mut object = DynamicObject::new(&name, &resource).within(&ns);
                if terminating {
                    object.metadata.finalizers = Some(vec![FINALIZER.to_string()]);
                    object.metadata.deletion_timestamp = Some(Time(Utc::now()));
                }
                object
            })
            .collect())
    }
}
