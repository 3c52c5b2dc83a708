use crate::schema_utils::null_to_default;
use crate::{Condition, Conditions};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An AppStudio application: the aggregate that groups `Component`s. The `CustomResource` derive
/// also produces a struct named `Application` which represents an application CRD object in the
/// k8s API.
#[derive(Clone, CustomResource, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    derive = "Default",
    derive = "PartialEq",
    group = "appstudio.redhat.com",
    kind = "Application",
    namespaced,
    plural = "applications",
    singular = "application",
    status = "ApplicationStatus",
    version = "v1alpha1",
    printcolumn = r#"{"name":"DisplayName", "type":"string", "jsonPath":".spec.displayName"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSpec {
    /// The human readable name of the application.
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Where the application model (the composite devfile) is stored, if not generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_model_repository: Option<ApplicationGitRepository>,
    /// Where the GitOps resources for the application are stored, if not generated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_ops_repository: Option<ApplicationGitRepository>,
}

#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGitRepository {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// The status of an `Application`. Written only by the application reconciler.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatus {
    #[serde(default, deserialize_with = "null_to_default")]
    pub conditions: Vec<Condition>,
    /// The composite devfile describing the application and every component it contains.
    #[serde(default, deserialize_with = "null_to_default")]
    pub devfile: String,
}

impl Application {
    /// The composite devfile, or `""` if the application has not been reconciled.
    pub fn devfile(&self) -> &str {
        self.status.as_ref().map_or("", |s| s.devfile.as_str())
    }

    /// Whether the composite devfile mentions `component_name`. The application reconciler adds
    /// each component to the devfile once it has processed it.
    pub fn mentions_component(&self, component_name: &str) -> bool {
        self.devfile().contains(component_name)
    }
}

impl Conditions for Application {
    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|status| status.conditions.as_slice())
            .unwrap_or(&[])
    }
}
