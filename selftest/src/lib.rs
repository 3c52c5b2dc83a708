/*!

Provides utilities for exercising the provider states against a real API server using `kind` and
`docker`. We call this testing modality `selftest` to distinguish it from the contract
verification that the provider states serve.

!*/

pub mod cluster;
mod environment;
mod test_settings;

pub use cluster::Cluster;
pub use environment::TestEnvironment;
pub use test_settings::TestSettings;

use env_logger::Builder;
use log::LevelFilter;

/// The log level used when `RUST_LOG` is not set.
const DEFAULT_LEVEL_FILTER: LevelFilter = LevelFilter::Info;

/// Initialize logging for a selftest. If `RUST_LOG` is set it is honored, otherwise the crates
/// in this workspace log at `info`. Calling this more than once is harmless.
pub fn init_logger() {
    let mut builder = match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        // RUST_LOG exists; env_logger will use it.
        Some(_) => Builder::from_default_env(),
        None => {
            let mut builder = Builder::new();
            builder
                .filter(Some(env!("CARGO_CRATE_NAME")), DEFAULT_LEVEL_FILTER)
                .filter(Some("appstudio_model"), DEFAULT_LEVEL_FILTER)
                .filter(Some("appstudio_pact_provider"), DEFAULT_LEVEL_FILTER);
            builder
        }
    };
    let _ = builder.is_test(true).try_init();
}
