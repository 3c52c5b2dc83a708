use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Metadata conveniences shared by the typed AppStudio objects and their unstructured
/// (`DynamicObject`) form.
pub trait CrdExt {
    /// The object's `metadata`. Every other function has a default implementation built on this.
    fn object_meta(&self) -> &ObjectMeta;

    /// `metadata.name`, or `""` if it is unset. Objects read back from the API server always have
    /// a name. Named so as not to collide with `ResourceExt::name`.
    fn object_name(&self) -> &str {
        self.object_meta().name.as_deref().unwrap_or("")
    }

    /// `metadata.namespace`, or `""` for an object built without one.
    fn object_namespace(&self) -> &str {
        self.object_meta().namespace.as_deref().unwrap_or("")
    }

    fn to_yaml(&self) -> Result<String, serde_yaml::Error>;

    /// True once deletion has been requested. The object stays listed until its finalizers are
    /// removed.
    fn is_delete_requested(&self) -> bool {
        self.object_meta().deletion_timestamp.is_some()
    }
}

macro_rules! impl_crd_ext {
    ($crd:ty) => {
        impl CrdExt for $crd {
            fn object_meta(&self) -> &ObjectMeta {
                &self.metadata
            }

            fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
                serde_yaml::to_string(self)
            }
        }
    };
}

impl_crd_ext!(crate::Application);
impl_crd_ext!(crate::Component);
impl_crd_ext!(crate::ComponentDetectionQuery);
impl_crd_ext!(kube::core::DynamicObject);

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Application, ApplicationSpec, ResourceKind};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
    use k8s_openapi::chrono::Utc;
    use kube::core::DynamicObject;

    #[test]
    fn unstructured_object() {
        let mut object = DynamicObject::new("myapp", &ResourceKind::Application.api_resource())
            .within("default");
        assert_eq!(object.object_name(), "myapp");
        assert_eq!(object.object_namespace(), "default");
        assert!(!object.is_delete_requested());
        object.metadata.deletion_timestamp = Some(Time(Utc::now()));
        assert!(object.is_delete_requested());
    }

    #[test]
    fn yaml_carries_identity() {
        let app = Application::new("myapp", ApplicationSpec::default());
        assert_eq!(app.object_namespace(), "");
        let yaml = app.to_yaml().unwrap();
        assert!(yaml.contains("kind: Application"));
        assert!(yaml.contains("name: myapp"));
    }
}
