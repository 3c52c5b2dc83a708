use crate::clients::{HttpStatusCode, StatusCode};
use crate::ResourceKind;
use snafu::Snafu;

/// The `Result` type returned by `clients`.
pub type Result<T> = std::result::Result<T, Error>;

/// The public error type returned by `clients`. Use [`HttpStatusCode`] to find out whether the
/// API server reported the object as missing.
#[derive(Debug, Snafu)]
pub struct Error(InnerError);

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub(crate) enum InnerError {
    #[snafu(display("Unable to create a Kubernetes client: {}", source))]
    Initialization { source: kube::Error },

    #[snafu(display("Unable to {} {} '{}' in '{}': {}", verb, kind, name, namespace, source))]
    ObjectRequest {
        verb: String,
        kind: ResourceKind,
        name: String,
        namespace: String,
        source: kube::Error,
    },

    #[snafu(display("Unable to {} {}s in {}: {}", verb, kind, scope, source))]
    CollectionRequest {
        verb: String,
        kind: ResourceKind,
        /// Either a single namespace or all namespaces.
        scope: String,
        source: kube::Error,
    },
}

impl HttpStatusCode for Error {
    fn status_code(&self) -> Option<StatusCode> {
        match &self.0 {
            InnerError::Initialization { .. } => None,
            InnerError::ObjectRequest { source, .. }
            | InnerError::CollectionRequest { source, .. } => source.status_code(),
        }
    }
}
