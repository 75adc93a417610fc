use std::sync::Arc;
use std::time::Duration;

use forge_common::settings::OperatorSettings;
use kube::runtime::controller::Action;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{ForgeOperatorError, ForgeOperatorResult};
use crate::k8s::DependentKind;

use super::converge::{Outcome, Pass};
use super::crd::{App, AppIdentity};
use super::gate::gate;
use super::store::ClusterStore;

/// What a single pass did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// `false` when the App was gone and nothing was touched.
    pub found: bool,
    pub steps: Vec<(DependentKind, Outcome)>,
}

impl ReconcileReport {
    pub fn outcome(&self, kind: DependentKind) -> Option<Outcome> {
        self.steps
            .iter()
            .find(|(step, _)| *step == kind)
            .map(|(_, outcome)| *outcome)
    }
}

/// Drives the objects owned by an App toward its spec.
///
/// Stateless between calls: every pass re-reads the App and the live objects,
/// so it can be re-run after any failure and run in parallel for different
/// Apps.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn ClusterStore>,
    store_timeout: Duration,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ClusterStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    #[instrument(skip(self, id, cancel), fields(app = %id))]
    pub async fn reconcile(
        &self,
        id: &AppIdentity,
        cancel: &CancellationToken,
    ) -> ForgeOperatorResult<ReconcileReport> {
        let pass = Pass::new(self.store.as_ref(), cancel, self.store_timeout);

        let Some(app) = pass.fetch(id).await? else {
            debug!("app is gone, owned objects are left to garbage collection");
            return Ok(ReconcileReport::default());
        };

        let mut report = ReconcileReport {
            found: true,
            steps: Vec::with_capacity(DependentKind::ALL.len()),
        };
        for kind in DependentKind::ALL {
            let gate = gate(kind, &app.spec);
            match pass.converge(kind, gate, &app, id).await {
                Ok(outcome) => {
                    info!(%kind, %outcome, "converged");
                    report.steps.push((kind, outcome));
                }
                Err(err) => {
                    error!(%kind, error = %err, "convergence failed");
                    return Err(err);
                }
            }
        }
        Ok(report)
    }
}

pub struct ContextData {
    reconciler: Reconciler,
    settings: OperatorSettings,
    shutdown: CancellationToken,
}

impl ContextData {
    pub fn new(
        reconciler: Reconciler,
        settings: OperatorSettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            reconciler,
            settings,
            shutdown,
        }
    }
}

/// Entry point handed to the `kube` controller. The triggering object only
/// supplies the identity; the pass reads the App afresh.
pub async fn reconcile(app: Arc<App>, context: Arc<ContextData>) -> ForgeOperatorResult<Action> {
    let id = AppIdentity::from(app.as_ref());
    let cancel = context.shutdown.child_token();
    context.reconciler.reconcile(&id, &cancel).await?;
    Ok(Action::await_change())
}

pub fn on_error(app: Arc<App>, error: &ForgeOperatorError, context: Arc<ContextData>) -> Action {
    let delay = if error.is_retryable() {
        context.settings.error_requeue()
    } else {
        context.settings.terminal_requeue()
    };
    warn!(
        app = %AppIdentity::from(app.as_ref()),
        %error,
        retry_in = ?delay,
        "reconciliation failed"
    );
    Action::requeue(delay)
}
