use super::{ClientError, ClientResult, ControlPlane};
use appstudio_model::clients::{
    ApplicationClient, ComponentClient, ComponentDetectionQueryClient, DynamicClient,
};
use appstudio_model::{Application, Component, CrdExt, ResourceKind};
use kube::core::DynamicObject;
use log::{debug, trace};

/// Provides the default [`ControlPlane`] implementation on top of a Kubernetes API server.
#[derive(Clone)]
pub struct DefaultControlPlane {
    k8s_client: kube::Client,
}

impl DefaultControlPlane {
    /// Create a `DefaultControlPlane` from in-cluster variables or `KUBECONFIG`.
    pub async fn new() -> ClientResult<Self> {
        let k8s_client = kube::Client::try_default()
            .await
            .map_err(|e| ClientError::InitializationFailed(Some(Box::new(e))))?;
        Ok(Self::new_from_k8s_client(k8s_client))
    }

    pub fn new_from_k8s_client(k8s_client: kube::Client) -> Self {
        Self { k8s_client }
    }

    fn applications(&self, namespace: &str) -> ApplicationClient {
        ApplicationClient::new_from_k8s_client(self.k8s_client.clone(), namespace)
    }

    fn components(&self, namespace: &str) -> ComponentClient {
        ComponentClient::new_from_k8s_client(self.k8s_client.clone(), namespace)
    }

    fn component_detection_queries(&self, namespace: &str) -> ComponentDetectionQueryClient {
        ComponentDetectionQueryClient::new_from_k8s_client(self.k8s_client.clone(), namespace)
    }
}

/// Log the object being submitted. Failing to render it is not worth failing the submission.
fn trace_submission<T: CrdExt>(kind: ResourceKind, object: &T) {
    match object.to_yaml() {
        Ok(yaml) => trace!("submitting {}:\n{}", kind, yaml),
        Err(e) => trace!(
            "submitting {} '{}' (unable to render: {})",
            kind,
            object.object_name(),
            e
        ),
    }
}

#[async_trait::async_trait]
impl ControlPlane for DefaultControlPlane {
    async fn create_application(&self, application: Application) -> ClientResult<Application> {
        let namespace = application.object_namespace().to_string();
        debug!(
            "creating application '{}' in '{}'",
            application.object_name(),
            namespace
        );
        trace_submission(ResourceKind::Application, &application);
        Ok(self.applications(&namespace).create(application).await?)
    }

    async fn get_application(&self, name: &str, namespace: &str) -> ClientResult<Application> {
        Ok(self.applications(namespace).get(name).await?)
    }

    async fn delete_application(&self, name: &str, namespace: &str) -> ClientResult<()> {
        debug!("deleting application '{}' in '{}'", name, namespace);
        let _ = self.applications(namespace).delete(name).await?;
        Ok(())
    }

    async fn create_component(&self, component: Component) -> ClientResult<Component> {
        let namespace = component.object_namespace().to_string();
        debug!(
            "creating component '{}' for application '{}' in '{}'",
            component.object_name(),
            component.spec.application,
            namespace
        );
        trace_submission(ResourceKind::Component, &component);
        Ok(self.components(&namespace).create(component).await?)
    }

    async fn get_component(&self, name: &str, namespace: &str) -> ClientResult<Component> {
        Ok(self.components(namespace).get(name).await?)
    }

    async fn delete_all_of(&self, kind: ResourceKind, namespace: &str) -> ClientResult<()> {
        debug!("deleting all {}s in '{}'", kind, namespace);
        match kind {
            ResourceKind::Component => {
                let _ = self.components(namespace).delete_all().await?;
            }
            ResourceKind::Application => {
                let _ = self.applications(namespace).delete_all().await?;
            }
            ResourceKind::ComponentDetectionQuery => {
                let _ = self
                    .component_detection_queries(namespace)
                    .delete_all()
                    .await?;
            }
        }
        Ok(())
    }

    async fn list(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
    ) -> ClientResult<Vec<DynamicObject>> {
        Ok(DynamicClient::new_from_k8s_client(self.k8s_client.clone())
            .list(kind, namespace)
            .await?)
    }
}
