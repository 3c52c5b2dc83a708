/*!

This module provides the store interface that the harness uses to talk to the control plane.

!*/

mod error;
mod implementation;

pub use error::{ClientError, ClientResult, ErrorMessage};
pub use implementation::DefaultControlPlane;

use appstudio_model::{Application, Component, ResourceKind};
use kube::core::DynamicObject;

/// `ControlPlane` is the typed interface to the declarative, eventually-consistent store that holds
/// AppStudio objects. Objects are addressed by `(name, namespace)`.
///
/// This is provided as a trait so that mock implementations can be injected into the [`Harness`]
/// for testing purposes. In practice you will use the [`DefaultControlPlane`].
///
/// Implementations must report a missing object from the `get_*` and `delete_*` functions as
/// [`ClientError::NotFound`] so that callers can tell absence apart from failure.
///
/// [`Harness`]: crate::Harness
#[async_trait::async_trait]
pub trait ControlPlane: Send + Sync + 'static {
    /// Submit a new `Application`. The namespace is taken from the object's metadata.
    async fn create_application(&self, application: Application) -> ClientResult<Application>;

    async fn get_application(&self, name: &str, namespace: &str) -> ClientResult<Application>;

    async fn delete_application(&self, name: &str, namespace: &str) -> ClientResult<()>;

    /// Submit a new `Component`. The namespace is taken from the object's metadata.
    async fn create_component(&self, component: Component) -> ClientResult<Component>;

    async fn get_component(&self, name: &str, namespace: &str) -> ClientResult<Component>;

    /// Request deletion of every object of `kind` in `namespace`. Objects held by finalizers may
    /// still be listed after this returns.
    async fn delete_all_of(&self, kind: ResourceKind, namespace: &str) -> ClientResult<()>;

    /// List every object of `kind` in `namespace`, or in all namespaces when `namespace` is
    /// `None`. Objects are returned unstructured so that the same code path serves every kind.
    async fn list(
        &self,
        kind: ResourceKind,
        namespace: Option<&str>,
    ) -> ClientResult<Vec<DynamicObject>>;
}
