use crate::schema_utils::null_to_default;
use crate::{Condition, Conditions};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A component of an AppStudio `Application`, built from a source repository. The
/// `CustomResource` derive also produces a struct named `Component` which represents a component
/// CRD object in the k8s API.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    derive = "Default",
    derive = "PartialEq",
    group = "appstudio.redhat.com",
    kind = "Component",
    namespaced,
    plural = "components",
    singular = "component",
    status = "ComponentStatus",
    version = "v1alpha1",
    printcolumn = r#"{"name":"Application", "type":"string", "jsonPath":".spec.application"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    pub component_name: String,
    /// The name of the `Application` this component belongs to.
    pub application: String,
    /// Name of a secret holding credentials for a private source repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub source: ComponentSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_port: Option<i32>,
}

/// Where a component is built from. Only git sources are modeled.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<GitSource>,
}

#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GitSource {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Path within the repository where the component source lives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(rename = "devfileUrl", skip_serializing_if = "Option::is_none")]
    pub devfile_url: Option<String>,
    #[serde(rename = "dockerfileUrl", skip_serializing_if = "Option::is_none")]
    pub dockerfile_url: Option<String>,
}

/// The status of a `Component`. Written only by the component reconciler.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStatus {
    #[serde(default, deserialize_with = "null_to_default")]
    pub conditions: Vec<Condition>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub devfile: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub container_image: String,
}

impl Component {
    /// The git repository the component is built from.
    pub fn repository_url(&self) -> Option<&str> {
        self.spec.source.git.as_ref().map(|git| git.url.as_str())
    }
}

impl Conditions for Component {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|status| status.conditions.as_slice())
            .unwrap_or(&[])
    }
}
