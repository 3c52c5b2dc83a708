use anyhow::{Context, Result};
use serde::Deserialize;

/// The prefix of every environment variable read by [`TestSettings::from_env`].
const ENV_PREFIX: &str = "APPSTUDIO_SELFTEST_";

/// Test settings provides a way to send arguments into the Rust tests using environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct TestSettings {
    /// The path to the [kind] binary. Defaults to `kind` (i.e. by default the kind binary is
    /// expected to be found via `$PATH`).
    ///
    /// # Example
    ///
    /// ```text
    /// APPSTUDIO_SELFTEST_KIND_PATH=/wherever/kind
    /// ```
    ///
    /// [kind]: https://kind.sigs.k8s.io/
    #[serde(default = "kind")]
    pub kind_path: String,

    /// The name of the kind cluster. An existing cluster with this name is deleted when the
    /// selftest starts.
    #[serde(default = "cluster_name")]
    pub cluster_name: String,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            kind_path: kind(),
            cluster_name: cluster_name(),
        }
    }
}

impl TestSettings {
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .context("Error parsing TestSettings environment variables")
    }
}

/// We need these to provide defaults for serde.
fn kind() -> String {
    String::from("kind")
}

fn cluster_name() -> String {
    String::from("appstudio-pact")
}

#[test]
fn settings_from_vars() {
    let settings: TestSettings = envy::prefixed(ENV_PREFIX)
        .from_iter(vec![(
            "APPSTUDIO_SELFTEST_KIND_PATH".to_string(),
            "/opt/bin/kind".to_string(),
        )])
        .unwrap();
    assert_eq!(settings.kind_path, "/opt/bin/kind");
    assert_eq!(settings.cluster_name, "appstudio-pact");
}
