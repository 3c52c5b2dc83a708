use anyhow::{format_err, Result};
use kube::{
    config::{KubeConfigOptions, Kubeconfig},
    Client, Config,
};
use log::{info, warn};
use std::convert::TryInto;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

pub const KUBECONFIG_FILENAME: &str = "kubeconfig.yaml";

/// Represents a `kind` cluster. The `Drop` trait is implemented deleting the `kind` cluster when it
/// goes out of scope, unless it has already been deleted with [`Cluster::delete`].
#[derive(Debug)]
pub struct Cluster {
    name: String,
    kind_path: String,
    kubeconfig_dir: TempDir,
    deleted: bool,
}

impl Cluster {
    /// Creates a `Cluster` while initializing a kind cluster. If a cluster named `cluster_name`
    /// already exists, it will be deleted.
    pub fn new(cluster_name: &str, kind_path: &str) -> Result<Cluster> {
        let cluster = Self {
            name: cluster_name.into(),
            kind_path: kind_path.into(),
            kubeconfig_dir: TempDir::new()?,
            deleted: false,
        };
        cluster.delete_kind_cluster()?;
        cluster.create_kind_cluster()?;
        info!("created kind cluster '{}'", cluster.name);
        Ok(cluster)
    }

    /// Returns the path to the kubeconfig file in the `TempDir` created for the cluster.
    pub fn kubeconfig(&self) -> PathBuf {
        self.kubeconfig_dir.path().join(KUBECONFIG_FILENAME)
    }

    /// Create the k8s client for the cluster.
    pub async fn k8s_client(&self) -> Result<Client> {
        let kubeconfig = Kubeconfig::read_from(self.kubeconfig())?;
        let config =
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
        Ok(config.try_into()?)
    }

    /// Delete the kind cluster now, reporting any failure instead of only printing it on drop.
    pub fn delete(mut self) -> Result<()> {
        self.deleted = true;
        self.delete_kind_cluster()?;
        info!("deleted kind cluster '{}'", self.name);
        Ok(())
    }

    fn create_kind_cluster(&self) -> Result<()> {
        let kubeconfig = self.kubeconfig();
        let kubeconfig = kubeconfig
            .to_str()
            .ok_or_else(|| format_err!("non utf-8 path '{}'", kubeconfig.to_string_lossy()))?;
        self.kind(
            "kind create cluster",
            &["--kubeconfig", kubeconfig, "create", "cluster", "--name", &self.name],
        )
    }

    fn delete_kind_cluster(&self) -> Result<()> {
        self.kind(
            "kind delete cluster",
            &["delete", "cluster", "--name", &self.name],
        )
    }

    fn kind(&self, what: &str, args: &[&str]) -> Result<()> {
        let output = Command::new(&self.kind_path).args(args).output()?;
        if !output.status.success() {
            return Err(format_err!(
                "'{}' failed with exit status '{}'\n\n{}\n\n{}",
                what,
                output.status.code().unwrap_or(1),
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(())
    }
}

impl Drop for Cluster {
    fn drop(&mut self) {
        if self.deleted {
            return;
        }
        if let Err(e) = self.delete_kind_cluster() {
            warn!("unable to delete kind cluster '{}': {}", self.name, e)
        }
    }
}
