//! In-memory [`ClusterStore`] recording every call, for driving passes in tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use kube::core::ErrorResponse;

use crate::error::{ForgeOperatorError, ForgeOperatorResult};
use crate::k8s::{Dependent, DependentKind};

use super::crd::{App, AppIdentity};
use super::store::ClusterStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Fetch,
    Get,
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub kind: Option<DependentKind>,
}

#[derive(Default)]
struct Inner {
    apps: BTreeMap<AppIdentity, App>,
    objects: BTreeMap<(DependentKind, AppIdentity), Dependent>,
    calls: Vec<Call>,
    failures: Vec<(Op, Option<DependentKind>)>,
    version: u64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

fn api_error(code: u16, reason: &str) -> ForgeOperatorError {
    ForgeOperatorError::from(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: reason.to_string(),
        reason: reason.to_string(),
        code,
    }))
}

fn identity_of(dependent: &Dependent) -> AppIdentity {
    AppIdentity::new(
        &dependent.name(),
        &dependent.namespace().unwrap_or_else(|| "default".to_string()),
    )
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_app(&self, app: App) {
        let mut inner = self.inner.lock().unwrap();
        inner.apps.insert(AppIdentity::from(&app), app);
    }

    pub fn remove_app(&self, id: &AppIdentity) {
        self.inner.lock().unwrap().apps.remove(id);
    }

    /// Seeds a live object without recording a call.
    pub fn put_object(&self, mut dependent: Dependent) {
        let mut inner = self.inner.lock().unwrap();
        inner.version += 1;
        dependent.meta_mut().resource_version = Some(inner.version.to_string());
        let key = (dependent.kind(), identity_of(&dependent));
        inner.objects.insert(key, dependent);
    }

    pub fn object(&self, kind: DependentKind, id: &AppIdentity) -> Option<Dependent> {
        let inner = self.inner.lock().unwrap();
        inner.objects.get(&(kind, id.clone())).cloned()
    }

    /// Makes every later `op` on `kind` fail with a server error.
    pub fn fail_on(&self, op: Op, kind: Option<DependentKind>) {
        self.inner.lock().unwrap().failures.push((op, kind));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call.op, Op::Create | Op::Update))
            .collect()
    }

    pub fn count(&self, op: Op, kind: DependentKind) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.op == op && call.kind == Some(kind))
            .count()
    }

    fn record(&self, op: Op, kind: Option<DependentKind>) -> ForgeOperatorResult {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call { op, kind });
        if inner.failures.contains(&(op, kind)) {
            return Err(api_error(500, "InternalError"));
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterStore for MemoryStore {
    async fn fetch(&self, id: &AppIdentity) -> ForgeOperatorResult<Option<App>> {
        self.record(Op::Fetch, None)?;
        Ok(self.inner.lock().unwrap().apps.get(id).cloned())
    }

    async fn get(
        &self,
        kind: DependentKind,
        id: &AppIdentity,
    ) -> ForgeOperatorResult<Option<Dependent>> {
        self.record(Op::Get, Some(kind))?;
        Ok(self.object(kind, id))
    }

    async fn create(&self, dependent: &Dependent) -> ForgeOperatorResult {
        self.record(Op::Create, Some(dependent.kind()))?;
        let mut inner = self.inner.lock().unwrap();
        let key = (dependent.kind(), identity_of(dependent));
        if inner.objects.contains_key(&key) {
            return Err(api_error(409, "AlreadyExists"));
        }
        inner.version += 1;
        let mut stored = dependent.clone();
        stored.meta_mut().resource_version = Some(inner.version.to_string());
        inner.objects.insert(key, stored);
        Ok(())
    }

    async fn update(&self, dependent: &Dependent) -> ForgeOperatorResult {
        self.record(Op::Update, Some(dependent.kind()))?;
        let mut inner = self.inner.lock().unwrap();
        let key = (dependent.kind(), identity_of(dependent));
        let Some(current) = inner.objects.get(&key) else {
            return Err(api_error(404, "NotFound"));
        };
        let sent = &dependent.meta().resource_version;
        if sent.is_some() && *sent != current.meta().resource_version {
            return Err(api_error(409, "Conflict"));
        }
        inner.version += 1;
        let mut stored = dependent.clone();
        stored.meta_mut().resource_version = Some(inner.version.to_string());
        inner.objects.insert(key, stored);
        Ok(())
    }
}
