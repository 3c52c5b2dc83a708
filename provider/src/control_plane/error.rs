use appstudio_model::clients::{HttpStatusCode, StatusCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The result type returned by [`ControlPlane`] implementations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// The error type returned by [`ControlPlane`] implementations.
#[derive(Debug)]
pub enum ClientError {
    /// The client could not be created.
    InitializationFailed(Option<Box<dyn std::error::Error + Send + Sync + 'static>>),

    /// The requested object does not exist.
    NotFound(Option<Box<dyn std::error::Error + Send + Sync + 'static>>),

    /// A communication with the control plane failed.
    RequestFailed(Option<Box<dyn std::error::Error + Send + Sync + 'static>>),
}

impl ClientError {
    fn variant_name(&self) -> &'static str {
        match self {
            ClientError::InitializationFailed(_) => "Initialization failed",
            ClientError::NotFound(_) => "Not found",
            ClientError::RequestFailed(_) => "Request failed",
        }
    }

    fn inner(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            ClientError::InitializationFailed(e)
            | ClientError::NotFound(e)
            | ClientError::RequestFailed(e) => e.as_ref().map(|some| some.as_ref()),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner().map(|some| some as &(dyn Error + 'static))
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.inner() {
            None => Display::fmt(self.variant_name(), f),
            Some(inner) => write!(f, "{}: {}", self.variant_name(), inner),
        }
    }
}

impl HttpStatusCode for ClientError {
    fn status_code(&self) -> Option<StatusCode> {
        match self {
            ClientError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ClientError::InitializationFailed(_) | ClientError::RequestFailed(_) => None,
        }
    }
}

impl From<appstudio_model::clients::Error> for ClientError {
    fn from(e: appstudio_model::clients::Error) -> Self {
        if e.is_not_found() {
            ClientError::NotFound(Some(Box::new(e)))
        } else {
            ClientError::RequestFailed(Some(Box::new(e)))
        }
    }
}

/// This struct can serve as an `Error` type when you want to provide an error message, but have no
/// underlying error type. It allows a string to serve as an error. This can be useful for custom
/// (i.e. mock) implementations of the [`ControlPlane`].
///
/// # Example
///
/// ```
/// # use appstudio_pact_provider::control_plane::{ClientError, ErrorMessage};
/// let _error = ClientError::NotFound(Some(Box::new(ErrorMessage::from("no such application"))));
/// ```
#[derive(Debug)]
pub struct ErrorMessage {
    message: String,
}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.message, f)
    }
}

impl<S: Into<String>> From<S> for ErrorMessage {
    fn from(s: S) -> Self {
        Self { message: s.into() }
    }
}

impl std::error::Error for ErrorMessage {}

#[cfg(test)]
mod test {
    use super::*;
    use appstudio_model::clients::AllowNotFound;

    #[test]
    fn not_found_is_allowed() {
        let result: ClientResult<()> = Err(ClientError::NotFound(None));
        assert!(result.allow_not_found(|_| ()).unwrap().is_none());
    }

    #[test]
    fn request_failure_is_not_allowed() {
        let result: ClientResult<()> = Err(ClientError::RequestFailed(Some(Box::new(
            ErrorMessage::from("connection refused"),
        ))));
        let err = result.allow_not_found(|_| ()).unwrap_err();
        assert_eq!(err.to_string(), "Request failed: connection refused");
    }
}
