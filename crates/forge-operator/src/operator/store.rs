use std::fmt::Debug;

use async_trait::async_trait;
use k8s_openapi::api::{apps::v1::Deployment, core::v1::Service, networking::v1::Ingress};
use k8s_openapi::NamespaceResourceScope;
use kube::api::PostParams;
use kube::{Api, Client, Resource, ResourceExt};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ForgeOperatorResult;
use crate::k8s::{Dependent, DependentKind};

use super::crd::{App, AppIdentity};

/// The authoritative cluster state as seen by a reconciliation pass.
///
/// Every call is a direct round-trip; implementations must not cache, and a
/// write must be visible to the next read.
#[async_trait]
pub trait ClusterStore: Send + Sync {
    /// Reads the App. `Ok(None)` means it no longer exists.
    async fn fetch(&self, id: &AppIdentity) -> ForgeOperatorResult<Option<App>>;

    async fn get(
        &self,
        kind: DependentKind,
        id: &AppIdentity,
    ) -> ForgeOperatorResult<Option<Dependent>>;

    async fn create(&self, dependent: &Dependent) -> ForgeOperatorResult;

    /// Replaces the whole object.
    async fn update(&self, dependent: &Dependent) -> ForgeOperatorResult;
}

/// [`ClusterStore`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
    field_manager: String,
}

impl KubeStore {
    pub fn new(client: Client, field_manager: &str) -> Self {
        Self {
            client,
            field_manager: field_manager.to_string(),
        }
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn post_params(&self) -> PostParams {
        PostParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        }
    }

    async fn get_opt<K>(&self, id: &AppIdentity) -> ForgeOperatorResult<Option<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        <K as Resource>::DynamicType: Default,
    {
        let api: Api<K> = self.api(&id.namespace);
        Ok(api.get_opt(&id.name).await?)
    }

    async fn create_one<K>(&self, object: &K) -> ForgeOperatorResult
    where
        K: Resource<Scope = NamespaceResourceScope>
            + Clone
            + DeserializeOwned
            + Serialize
            + Debug,
        <K as Resource>::DynamicType: Default,
    {
        let api: Api<K> = self.api(&namespace_of(object));
        api.create(&self.post_params(), object).await?;
        Ok(())
    }

    async fn replace_one<K>(&self, object: &K) -> ForgeOperatorResult
    where
        K: Resource<Scope = NamespaceResourceScope>
            + Clone
            + DeserializeOwned
            + Serialize
            + Debug,
        <K as Resource>::DynamicType: Default,
    {
        let api: Api<K> = self.api(&namespace_of(object));
        api.replace(&object.name_any(), &self.post_params(), object)
            .await?;
        Ok(())
    }
}

fn namespace_of<K: Resource>(object: &K) -> String {
    object
        .meta()
        .namespace
        .clone()
        .unwrap_or_else(|| "default".to_string())
}

#[async_trait]
impl ClusterStore for KubeStore {
    async fn fetch(&self, id: &AppIdentity) -> ForgeOperatorResult<Option<App>> {
        self.get_opt::<App>(id).await
    }

    async fn get(
        &self,
        kind: DependentKind,
        id: &AppIdentity,
    ) -> ForgeOperatorResult<Option<Dependent>> {
        let found = match kind {
            DependentKind::Workload => self
                .get_opt::<Deployment>(id)
                .await?
                .map(Dependent::Workload),
            DependentKind::Service => self.get_opt::<Service>(id).await?.map(Dependent::Service),
            DependentKind::Route => self.get_opt::<Ingress>(id).await?.map(Dependent::Route),
        };
        Ok(found)
    }

    async fn create(&self, dependent: &Dependent) -> ForgeOperatorResult {
        match dependent {
            Dependent::Workload(d) => self.create_one(d).await,
            Dependent::Service(s) => self.create_one(s).await,
            Dependent::Route(i) => self.create_one(i).await,
        }
    }

    async fn update(&self, dependent: &Dependent) -> ForgeOperatorResult {
        match dependent {
            Dependent::Workload(d) => self.replace_one(d).await,
            Dependent::Service(s) => self.replace_one(s).await,
            Dependent::Route(i) => self.replace_one(i).await,
        }
    }
}
