/*!

Construction of the AppStudio objects that the state handlers submit. These functions are pure:
identity fields are copied from their inputs exactly, without normalization.

!*/

use appstudio_model::{
    Application, ApplicationSpec, Component, ComponentSource, ComponentSpec, GitSource,
};
use kube::core::ObjectMeta;

/// The description given to every application created by the harness. Consumer fixtures expect
/// this value.
pub const APPLICATION_DESCRIPTION: &str = "Some description";

fn object_meta(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

/// Build an `Application` named `app_name` in `namespace`. The display name is the application
/// name.
pub fn build_application(app_name: &str, namespace: &str) -> Application {
    Application {
        metadata: object_meta(app_name, namespace),
        spec: ApplicationSpec {
            display_name: app_name.to_string(),
            description: APPLICATION_DESCRIPTION.to_string(),
            ..Default::default()
        },
        status: None,
    }
}

/// Build a `Component` named `name` in `namespace`, owned by the application `app_name` and built
/// from the git repository at `repository_url`.
pub fn build_component(
    name: &str,
    namespace: &str,
    app_name: &str,
    repository_url: &str,
) -> Component {
    Component {
        metadata: object_meta(name, namespace),
        spec: ComponentSpec {
            component_name: name.to_string(),
            application: app_name.to_string(),
            source: ComponentSource {
                git: Some(GitSource {
                    url: repository_url.to_string(),
                    ..Default::default()
                }),
            },
            ..Default::default()
        },
        status: None,
    }
}
