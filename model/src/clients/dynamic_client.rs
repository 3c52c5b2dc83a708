use crate::clients::error::{self, Result};
use crate::ResourceKind;
use kube::api::ListParams;
use kube::core::DynamicObject;
use kube::Api;
use snafu::ResultExt;

/// A kind-parameterized client for AppStudio objects. Objects are returned unstructured, which
/// lets callers count or enumerate any `ResourceKind` with the same code path.
#[derive(Clone)]
pub struct DynamicClient {
    k8s_client: kube::Client,
}

impl DynamicClient {
    pub fn new_from_k8s_client(k8s_client: kube::Client) -> Self {
        Self { k8s_client }
    }

    /// An `Api` for `kind` scoped to `namespace`, or to the whole cluster if `namespace` is
    /// `None`.
    fn api(&self, kind: ResourceKind, namespace: Option<&str>) -> Api<DynamicObject> {
        let api_resource = kind.api_resource();
        match namespace {
            Some(namespace) => {
                Api::namespaced_with(self.k8s_client.clone(), namespace, &api_resource)
            }
            None => Api::all_with(self.k8s_client.clone(), &api_resource),
        }
    }

    /// List every object of `kind` in `namespace`, or in all namespaces if `namespace` is `None`.
    pub async fn list(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
    ) -> Result<Vec<DynamicObject>> {
        Ok(self
            .api(kind, namespace)
            .list(&ListParams::default())
            .await
            .context(error::CollectionRequestSnafu {
                verb: "list",
                kind,
                scope: namespace
                    .map(|namespace| format!("namespace '{}'", namespace))
                    .unwrap_or_else(|| "all namespaces".to_string()),
            })?
            .items)
    }
}
