/*!

This library provides the Kubernetes custom resource definitions for the AppStudio application
service (`Application`, `Component` and `ComponentDetectionQuery`) and their API clients.

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

pub use application::{Application, ApplicationGitRepository, ApplicationSpec, ApplicationStatus};
pub use component::{Component, ComponentSource, ComponentSpec, ComponentStatus, GitSource};
pub use component_detection_query::{
    ComponentDetectionDescription, ComponentDetectionQuery, ComponentDetectionQuerySpec,
    ComponentDetectionQueryStatus,
};
pub use condition::{Condition, Conditions};
pub use crd_ext::CrdExt;
pub use kind::{AppStudioResource, ResourceKind};
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::CustomResourceExt;

mod application;
pub mod clients;
mod component;
mod component_detection_query;
mod condition;
pub mod constants;
mod crd_ext;
mod kind;
mod schema_utils;

/// The custom resource definitions that must be registered with a control plane before any
/// AppStudio object can be stored in it.
pub fn crds() -> Vec<CustomResourceDefinition> {
    vec![
        Application::crd(),
        Component::crd(),
        ComponentDetectionQuery::crd(),
    ]
}

#[test]
fn every_kind_has_a_crd() {
    let kinds: Vec<String> = crds()
        .into_iter()
        .map(|crd| crd.spec.names.kind)
        .collect();
    for kind in ResourceKind::CLEANUP_ORDER {
        assert!(kinds.iter().any(|k| k == kind.kind()));
    }
}
