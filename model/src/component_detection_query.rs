use crate::component::{ComponentSpec, GitSource};
use crate::schema_utils::null_to_default;
use crate::{Condition, Conditions};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A request to detect the components that live in a source repository. The harness never
/// creates these itself, but the reconciler under test may, so they are part of namespace
/// cleanup.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    derive = "Default",
    derive = "PartialEq",
    group = "appstudio.redhat.com",
    kind = "ComponentDetectionQuery",
    namespaced,
    plural = "componentdetectionqueries",
    singular = "componentdetectionquery",
    shortname = "cdq",
    status = "ComponentDetectionQueryStatus",
    version = "v1alpha1"
)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDetectionQuerySpec {
    #[serde(rename = "git")]
    pub git_source: GitSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default)]
    pub generate_component_name: bool,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDetectionQueryStatus {
    #[serde(default, deserialize_with = "null_to_default")]
    pub conditions: Vec<Condition>,
    /// Detected components keyed by generated component name.
    #[serde(default, deserialize_with = "null_to_default")]
    pub component_detected: BTreeMap<String, ComponentDetectionDescription>,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDetectionDescription {
    #[serde(default)]
    pub devfile_found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_stub: Option<ComponentSpec>,
}

impl Conditions for ComponentDetectionQuery {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|status| status.conditions.as_slice())
            .unwrap_or(&[])
    }
}
