use crate::clients::error::{self, Result};
use crate::{AppStudioResource, Application, Component, ComponentDetectionQuery};
use kube::api::{DeleteParams, ListParams, PostParams};
use kube::Api;
use log::trace;
use snafu::ResultExt;

/// An API client for AppStudio `Application` objects in one namespace.
pub type ApplicationClient = CrdClient<Application>;

/// An API client for AppStudio `Component` objects in one namespace.
pub type ComponentClient = CrdClient<Component>;

/// An API client for AppStudio `ComponentDetectionQuery` objects in one namespace.
pub type ComponentDetectionQueryClient = CrdClient<ComponentDetectionQuery>;

/// A typed client for one kind of AppStudio object, bound to a single namespace.
///
/// # Example
///
/// ```
///# use appstudio_model::clients::ApplicationClient;
///# async fn no_run() {
/// let application_client = ApplicationClient::new("default").await.unwrap();
/// let application = application_client.get("myapp").await.unwrap();
///# }
/// ```
#[derive(Clone)]
pub struct CrdClient<T: AppStudioResource> {
    api: Api<T>,
    namespace: String,
}

impl<T: AppStudioResource> CrdClient<T> {
    /// Create a client from in-cluster variables or `KUBECONFIG`.
    pub async fn new(namespace: &str) -> Result<Self> {
        let k8s_client = kube::Client::try_default()
            .await
            .context(error::InitializationSnafu)?;
        Ok(Self::new_from_k8s_client(k8s_client, namespace))
    }

    pub fn new_from_k8s_client(k8s_client: kube::Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(k8s_client, namespace),
            namespace: namespace.to_string(),
        }
    }

    pub async fn get(&self, name: &str) -> Result<T> {
        Ok(self.api.get(name).await.context(error::ObjectRequestSnafu {
            verb: "get",
            kind: T::KIND,
            name,
            namespace: self.namespace.as_str(),
        })?)
    }

    pub async fn create(&self, object: T) -> Result<T> {
        trace!(
            "creating {} '{}' in '{}'",
            T::KIND,
            object.object_name(),
            self.namespace
        );
        Ok(self
            .api
            .create(&PostParams::default(), &object)
            .await
            .context(error::ObjectRequestSnafu {
                verb: "create",
                kind: T::KIND,
                name: object.object_name(),
                namespace: self.namespace.as_str(),
            })?)
    }

    /// Request deletion of the named object. Returns the object if it is still present (held by a
    /// finalizer), or `None` if it is already gone.
    pub async fn delete(&self, name: &str) -> Result<Option<T>> {
        trace!("deleting {} '{}' in '{}'", T::KIND, name, self.namespace);
        Ok(self
            .api
            .delete(name, &DeleteParams::default())
            .await
            .context(error::ObjectRequestSnafu {
                verb: "delete",
                kind: T::KIND,
                name,
                namespace: self.namespace.as_str(),
            })?
            .left())
    }

    /// Delete every object of this kind in the client's namespace. Returns the objects that were
    /// still present when the request was accepted, if the API server reported them.
    pub async fn delete_all(&self) -> Result<Option<Vec<T>>> {
        trace!("deleting all {}s in '{}'", T::KIND, self.namespace);
        Ok(self
            .api
            .delete_collection(&DeleteParams::default(), &ListParams::default())
            .await
            .context(error::CollectionRequestSnafu {
                verb: "delete",
                kind: T::KIND,
                scope: format!("namespace '{}'", self.namespace),
            })?
            .left()
            .map(|deleted| deleted.items))
    }
}
