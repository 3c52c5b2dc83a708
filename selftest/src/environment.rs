use crate::{Cluster, TestSettings};
use anyhow::{Context, Result};
use appstudio_pact_provider::{DefaultControlPlane, Harness, PollPolicy, Poller};
use k8s_openapi::api::core::v1::Namespace;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::{Patch, PatchParams, PostParams};
use kube::core::ObjectMeta;
use kube::{Api, Client, ResourceExt};
use log::{debug, info, warn};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The field manager used when applying the custom resource definitions.
const FIELD_MANAGER: &str = "appstudio-selftest";

/// How long the API server may take to accept a newly registered custom resource definition.
const CRD_POLICY: PollPolicy = PollPolicy {
    timeout: Duration::from_secs(60),
    interval: Duration::from_secs(1),
};

/// An ephemeral control plane for the provider states: a `kind` cluster with the AppStudio custom
/// resource definitions registered and any reconcilers under test running alongside it.
///
/// Shut it down with [`TestEnvironment::stop`], which stops the reconcilers before deleting the
/// cluster. Dropping it does the same on a best-effort basis.
pub struct TestEnvironment {
    cluster: Option<Cluster>,
    client: Client,
    cancel: CancellationToken,
    reconcilers: Vec<(String, JoinHandle<()>)>,
}

impl TestEnvironment {
    /// Start an environment using [`TestSettings`] from the environment.
    pub async fn start() -> Result<Self> {
        Self::start_with(&TestSettings::from_env()?).await
    }

    pub async fn start_with(settings: &TestSettings) -> Result<Self> {
        let cluster = Cluster::new(&settings.cluster_name, &settings.kind_path)?;
        let client = cluster.k8s_client().await?;
        let environment = Self {
            cluster: Some(cluster),
            client,
            cancel: CancellationToken::new(),
            reconcilers: Vec::new(),
        };
        environment.install_crds().await?;
        Ok(environment)
    }

    pub fn k8s_client(&self) -> Client {
        self.client.clone()
    }

    /// A harness backed by this environment's API server. Its waits are cancelled when the
    /// environment stops.
    pub fn harness(&self, policy: PollPolicy) -> Harness<DefaultControlPlane> {
        Harness::with_cancellation(
            DefaultControlPlane::new_from_k8s_client(self.k8s_client()),
            policy,
            self.cancel.child_token(),
        )
    }

    /// Run a reconciler for as long as the environment is up. The reconciler receives a client and
    /// a token that is cancelled when the environment stops; it is aborted if it does not return
    /// on its own.
    pub fn spawn_reconciler<F, Fut>(&mut self, name: &str, reconciler: F)
    where
        F: FnOnce(Client, CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        info!("starting reconciler '{}'", name);
        let handle = tokio::spawn(reconciler(self.k8s_client(), self.cancel.child_token()));
        self.reconcilers.push((name.to_string(), handle));
    }

    pub async fn create_namespace(&self, name: &str) -> Result<()> {
        let namespace = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        Api::<Namespace>::all(self.k8s_client())
            .create(&PostParams::default(), &namespace)
            .await
            .with_context(|| format!("Unable to create namespace '{}'", name))?;
        Ok(())
    }

    /// Stop the reconcilers, then delete the cluster.
    pub async fn stop(mut self) -> Result<()> {
        self.cancel.cancel();
        for (name, handle) in self.reconcilers.drain(..) {
            handle.abort();
            match handle.await {
                Ok(()) => debug!("reconciler '{}' stopped", name),
                Err(e) if e.is_cancelled() => debug!("reconciler '{}' aborted", name),
                Err(e) => warn!("reconciler '{}' failed: {}", name, e),
            }
        }
        match self.cluster.take() {
            Some(cluster) => cluster.delete(),
            None => Ok(()),
        }
    }

    /// Register (or update) the AppStudio custom resource definitions and wait for the API server
    /// to establish them.
    async fn install_crds(&self) -> Result<()> {
        let api = Api::<CustomResourceDefinition>::all(self.k8s_client());
        let poller = Poller::new(CRD_POLICY, self.cancel.child_token());
        for crd in appstudio_model::crds() {
            let name = crd.name_any();
            api.patch(
                &name,
                &PatchParams::apply(FIELD_MANAGER).force(),
                &Patch::Apply(&crd),
            )
            .await
            .with_context(|| format!("Unable to apply custom resource definition '{}'", name))?;
            let api = &api;
            let name = name.as_str();
            poller
                .await_condition(
                    &format!("custom resource definition '{}' to be established", name),
                    move || async move {
                        let crd = api.get(name).await?;
                        Ok::<bool, kube::Error>(is_established(&crd))
                    },
                )
                .await?;
            info!("installed custom resource definition '{}'", name);
        }
        Ok(())
    }
}

fn is_established(crd: &CustomResourceDefinition) -> bool {
    crd.status
        .as_ref()
        .and_then(|status| status.conditions.as_ref())
        .map(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Established" && c.status == "True")
        })
        .unwrap_or(false)
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        self.cancel.cancel();
        for (_, handle) in &self.reconcilers {
            handle.abort();
        }
    }
}
