pub mod converge;
pub mod crd;
pub mod gate;
#[cfg(test)]
mod memory;
pub mod owner;
pub mod reconcile;
pub mod store;

use crd::{App, AppIdentity};
use forge_common::settings::OperatorSettings;
use futures::StreamExt;
use k8s_openapi::api::{apps::v1::Deployment, core::v1::Service, networking::v1::Ingress};
use k8s_openapi::NamespaceResourceScope;
use kube::runtime::{controller, watcher, Controller};
use kube::{Api, Client, Resource};
use reconcile::{ContextData, ReconcileReport, Reconciler};
use std::sync::Arc;
use store::KubeStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ForgeOperatorResult;

fn scoped_api<K>(client: &Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<Scope = NamespaceResourceScope>,
    <K as Resource>::DynamicType: Default,
{
    match namespace {
        Some(namespace) => Api::namespaced(client.clone(), namespace),
        None => Api::all(client.clone()),
    }
}

fn reconciler(client: Client, settings: &OperatorSettings) -> Reconciler {
    let store = KubeStore::new(client, &settings.field_manager);
    Reconciler::new(Arc::new(store), settings.store_timeout())
}

async fn cancel_on_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(err) => {
                warn!(%err, "unable to listen for SIGTERM");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown requested");
    shutdown.cancel();
}

/// Runs the App controller until a shutdown signal arrives.
///
/// Apps are the primary resource; Deployments, Services and Ingresses are
/// watched as owned children so a change to any of them re-triggers the
/// owning App.
pub async fn operator(settings: &OperatorSettings) -> ForgeOperatorResult<()> {
    let kubernetes_client = Client::try_default().await?;
    let namespace = settings.namespace.as_deref();

    let crd_api: Api<App> = scoped_api(&kubernetes_client, namespace);
    let shutdown = CancellationToken::new();
    let context: Arc<ContextData> = Arc::new(ContextData::new(
        reconciler(kubernetes_client.clone(), settings),
        settings.clone(),
        shutdown.clone(),
    ));

    tokio::spawn(cancel_on_signal(shutdown.clone()));
    info!(
        namespace = namespace.unwrap_or("*"),
        concurrency = settings.concurrency,
        "starting app controller"
    );

    Controller::new(crd_api, watcher::Config::default())
        .owns(
            scoped_api::<Deployment>(&kubernetes_client, namespace),
            watcher::Config::default(),
        )
        .owns(
            scoped_api::<Service>(&kubernetes_client, namespace),
            watcher::Config::default(),
        )
        .owns(
            scoped_api::<Ingress>(&kubernetes_client, namespace),
            watcher::Config::default(),
        )
        .with_config(controller::Config::default().concurrency(settings.concurrency))
        .graceful_shutdown_on(shutdown.cancelled_owned())
        .run(reconcile::reconcile, reconcile::on_error, context)
        .for_each(|recon_result| async move {
            match recon_result {
                Ok((app, _action)) => debug!(%app, "reconciliation successful"),
                Err(err) => warn!(error = %err, "reconciliation error"),
            }
        })
        .await;

    info!("app controller stopped");
    Ok(())
}

/// Runs a single pass for one App against the current cluster.
pub async fn reconcile_once(
    settings: &OperatorSettings,
    id: &AppIdentity,
) -> ForgeOperatorResult<ReconcileReport> {
    let kubernetes_client = Client::try_default().await?;
    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));
    reconciler(kubernetes_client, settings)
        .reconcile(id, &shutdown)
        .await
}
