use crate::constants::{
    KIND_APPLICATION, KIND_COMPONENT, KIND_COMPONENT_DETECTION_QUERY, PLURAL_APPLICATION,
    PLURAL_COMPONENT, PLURAL_COMPONENT_DETECTION_QUERY,
};
use crate::{Application, Component, ComponentDetectionQuery, CrdExt};
use k8s_openapi::NamespaceResourceScope;
use kube::core::ApiResource;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use std::fmt::Debug;

/// The AppStudio resource kinds the harness knows how to list and delete generically. Each
/// variant carries its kind name and plural so that a dynamic (unstructured) API can be built for
/// it without inspecting Rust type names.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Clone, Copy)]
pub enum ResourceKind {
    Component,
    Application,
    ComponentDetectionQuery,
}

derive_fromstr_from_deserialize!(ResourceKind);
derive_display_from_serialize!(ResourceKind);

impl ResourceKind {
    /// The order in which kinds are removed when a namespace is cleaned. Children come before
    /// their parents so that an application's devfile never outlives its components.
    pub const CLEANUP_ORDER: [ResourceKind; 3] = [
        ResourceKind::Component,
        ResourceKind::Application,
        ResourceKind::ComponentDetectionQuery,
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            ResourceKind::Component => KIND_COMPONENT,
            ResourceKind::Application => KIND_APPLICATION,
            ResourceKind::ComponentDetectionQuery => KIND_COMPONENT_DETECTION_QUERY,
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Component => PLURAL_COMPONENT,
            ResourceKind::Application => PLURAL_APPLICATION,
            ResourceKind::ComponentDetectionQuery => PLURAL_COMPONENT_DETECTION_QUERY,
        }
    }

    /// The `ApiResource` used to construct a `kube::Api<DynamicObject>` for this kind.
    pub fn api_resource(&self) -> ApiResource {
        match self {
            ResourceKind::Component => ApiResource::erase::<Component>(&()),
            ResourceKind::Application => ApiResource::erase::<Application>(&()),
            ResourceKind::ComponentDetectionQuery => {
                ApiResource::erase::<ComponentDetectionQuery>(&())
            }
        }
    }
}

/// Implemented by the Rust types of the AppStudio custom resources, tying each type to its
/// [`ResourceKind`].
pub trait AppStudioResource:
    kube::Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + CrdExt
    + Serialize
    + DeserializeOwned
    + Debug
    + Clone
    + Send
    + Sync
    + 'static
{
    const KIND: ResourceKind;
}

impl AppStudioResource for Application {
    const KIND: ResourceKind = ResourceKind::Application;
}

impl AppStudioResource for Component {
    const KIND: ResourceKind = ResourceKind::Component;
}

impl AppStudioResource for ComponentDetectionQuery {
    const KIND: ResourceKind = ResourceKind::ComponentDetectionQuery;
}
