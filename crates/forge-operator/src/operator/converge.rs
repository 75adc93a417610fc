use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ForgeOperatorError, ForgeOperatorResult};
use crate::k8s::{synthesize, DependentKind};

use super::crd::{App, AppIdentity};
use super::gate::Gate;
use super::owner::{ensure_adoptable, link_owner};
use super::store::ClusterStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    /// Gated off, nothing was read or written.
    Skipped,
    /// Writes not allowed and nothing exists.
    Absent,
    /// Writes not allowed, the live object was left alone.
    Untouched,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Created => "created",
            Outcome::Updated => "updated",
            Outcome::Skipped => "skipped",
            Outcome::Absent => "absent",
            Outcome::Untouched => "untouched",
        };
        f.write_str(s)
    }
}

/// One reconciliation pass over a store. Holds nothing that outlives the pass.
pub struct Pass<'a> {
    store: &'a dyn ClusterStore,
    cancel: &'a CancellationToken,
    timeout: Duration,
}

impl<'a> Pass<'a> {
    pub fn new(
        store: &'a dyn ClusterStore,
        cancel: &'a CancellationToken,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            cancel,
            timeout,
        }
    }

    /// Runs a store call unless the pass is cancelled or the call overruns.
    async fn guard<T>(
        &self,
        call: impl Future<Output = ForgeOperatorResult<T>>,
    ) -> ForgeOperatorResult<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ForgeOperatorError::Cancelled),
            result = tokio::time::timeout(self.timeout, call) => result?,
        }
    }

    pub async fn fetch(&self, id: &AppIdentity) -> ForgeOperatorResult<Option<App>> {
        self.guard(self.store.fetch(id)).await
    }

    /// Makes one dependent kind match what `app` asks for.
    ///
    /// A live object is always replaced in full, even when it already
    /// matches; the API server drops writes that change nothing.
    pub async fn converge(
        &self,
        kind: DependentKind,
        gate: Gate,
        app: &App,
        id: &AppIdentity,
    ) -> ForgeOperatorResult<Outcome> {
        match gate {
            Gate::Skip => return Ok(Outcome::Skipped),
            Gate::Observe => {
                let outcome = match self.guard(self.store.get(kind, id)).await? {
                    Some(_) => Outcome::Untouched,
                    None => Outcome::Absent,
                };
                return Ok(outcome);
            }
            Gate::Converge => {}
        }

        let mut desired = synthesize(kind, app)?;
        link_owner(&mut desired, app)?;

        match self.guard(self.store.get(kind, id)).await? {
            None => {
                debug!(%kind, "creating");
                self.guard(self.store.create(&desired)).await?;
                Ok(Outcome::Created)
            }
            Some(observed) => {
                ensure_adoptable(&observed, app)?;
                desired.meta_mut().resource_version = observed.meta().resource_version.clone();
                debug!(%kind, "replacing");
                self.guard(self.store.update(&desired)).await?;
                Ok(Outcome::Updated)
            }
        }
    }
}
