/*!

Namespace cleanup. Deletion is asynchronous in the store: a delete request only marks objects, and
finalizers may keep them listed for a while. Cleanup therefore deletes and then waits until a list
comes back empty, one kind at a time in [`ResourceKind::CLEANUP_ORDER`].

!*/

use crate::control_plane::{ClientError, ControlPlane};
use crate::error::{self, Result};
use crate::harness::Harness;
use appstudio_model::{CrdExt, ResourceKind};
use kube::ResourceExt;
use log::{debug, info, trace};
use snafu::{ensure, ResultExt};
use std::collections::BTreeSet;

impl<S: ControlPlane> Harness<S> {
    /// Delete every AppStudio object in `namespace` and wait until none remain. Cleaning an empty
    /// namespace succeeds without waiting.
    pub async fn cleanup_namespace(&self, namespace: &str) -> Result<()> {
        info!("cleaning up namespace '{}'", namespace);
        for kind in ResourceKind::CLEANUP_ORDER {
            self.remove_all_in_namespace(kind, namespace).await?;
        }
        Ok(())
    }

    /// Delete every AppStudio object in every namespace. For each kind, the namespaces holding
    /// objects of that kind are discovered with a cluster-wide list and cleaned one at a time.
    pub async fn cleanup_all_namespaces(&self) -> Result<()> {
        info!("cleaning up all namespaces");
        for kind in ResourceKind::CLEANUP_ORDER {
            let objects = self
                .store()
                .list(kind, None)
                .await
                .context(error::StoreSnafu {
                    action: format!("list {}s in all namespaces", kind),
                })?;
            let namespaces: BTreeSet<String> =
                objects.iter().filter_map(|object| object.namespace()).collect();
            debug!("found {}s in {} namespace(s)", kind, namespaces.len());
            for namespace in namespaces {
                self.remove_all_in_namespace(kind, &namespace).await?;
            }
        }
        Ok(())
    }

    async fn remove_all_in_namespace(&self, kind: ResourceKind, namespace: &str) -> Result<()> {
        let what = format!("all {}s in '{}' to be removed", kind, namespace);
        // An aborted harness must not send any more deletes.
        ensure!(
            !self.cancellation_token().is_cancelled(),
            error::CancelledSnafu { what: what.as_str() }
        );
        self.store()
            .delete_all_of(kind, namespace)
            .await
            .context(error::StoreSnafu {
                action: format!("delete {}s in '{}'", kind, namespace),
            })?;
        let store = self.store();
        self.poller()
            .await_condition(&what, move || async move {
                let remaining = store.list(kind, Some(namespace)).await?;
                if !remaining.is_empty() {
                    let terminating = remaining
                        .iter()
                        .filter(|object| object.is_delete_requested())
                        .count();
                    trace!(
                        "{} {}(s) remain in '{}', {} terminating",
                        remaining.len(),
                        kind,
                        namespace,
                        terminating
                    );
                }
                Ok::<bool, ClientError>(remaining.is_empty())
            })
            .await
    }
}
