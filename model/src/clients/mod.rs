mod crd_client;
mod dynamic_client;
mod error;
mod http_status_code;

pub use crd_client::{
    ApplicationClient, ComponentClient, ComponentDetectionQueryClient, CrdClient,
};
pub use dynamic_client::DynamicClient;
pub use error::{Error, Result};
pub use http_status_code::{AllowNotFound, HttpStatusCode, StatusCode};
