/// Helper macro to avoid retyping the API group of the AppStudio resources when creating further
/// string constants from it. When given no parameters, this returns the group name. When given a
/// string literal parameter it adds `/parameter` to the end.
macro_rules! appstudio {
    () => {
        "appstudio.redhat.com"
    };
    ($s:literal) => {
        concat!(appstudio!(), "/", $s)
    };
}

// API identifiers
pub const GROUP: &str = appstudio!();
pub const VERSION: &str = "v1alpha1";
pub const API_VERSION: &str = appstudio!("v1alpha1");

// Kinds
pub const KIND_APPLICATION: &str = "Application";
pub const KIND_COMPONENT: &str = "Component";
pub const KIND_COMPONENT_DETECTION_QUERY: &str = "ComponentDetectionQuery";

// Plurals
pub const PLURAL_APPLICATION: &str = "applications";
pub const PLURAL_COMPONENT: &str = "components";
pub const PLURAL_COMPONENT_DETECTION_QUERY: &str = "componentdetectionqueries";

// Condition types written by the application service reconcilers
pub const CONDITION_CREATED: &str = "Created";
pub const CONDITION_UPDATED: &str = "Updated";
pub const CONDITION_STATUS_TRUE: &str = "True";

#[test]
fn appstudio_constants_macro_test() {
    assert_eq!("appstudio.redhat.com", appstudio!());
    assert_eq!("appstudio.redhat.com/v1alpha1", API_VERSION);
    assert_eq!("appstudio.redhat.com/foo", appstudio!("foo"));
}
