//! Pure synthesis of the objects an App owns.
//!
//! Every function here is a deterministic function of the App: the same App
//! always yields byte-identical objects, so replacing a live object with a
//! freshly synthesized one settles instead of re-triggering forever.

use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::api::{apps::v1::Deployment, core::v1::Service, networking::v1::Ingress};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{Resource, ResourceExt};

use crate::error::{ForgeOperatorError, ForgeOperatorResult};
use crate::operator::crd::App;

pub mod deployment;
pub mod ingress;
pub mod service;

pub const MANAGED_BY: &str = "appforge";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependentKind {
    Workload,
    Service,
    Route,
}

impl DependentKind {
    /// Convergence order. Later kinds only run once earlier ones succeeded.
    pub const ALL: [DependentKind; 3] = [
        DependentKind::Workload,
        DependentKind::Service,
        DependentKind::Route,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DependentKind::Workload => "Deployment",
            DependentKind::Service => "Service",
            DependentKind::Route => "Ingress",
        }
    }
}

impl fmt::Display for DependentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dependent {
    Workload(Deployment),
    Service(Service),
    Route(Ingress),
}

impl Dependent {
    pub fn kind(&self) -> DependentKind {
        match self {
            Dependent::Workload(_) => DependentKind::Workload,
            Dependent::Service(_) => DependentKind::Service,
            Dependent::Route(_) => DependentKind::Route,
        }
    }

    pub fn meta(&self) -> &ObjectMeta {
        match self {
            Dependent::Workload(d) => d.meta(),
            Dependent::Service(s) => s.meta(),
            Dependent::Route(i) => i.meta(),
        }
    }

    pub fn meta_mut(&mut self) -> &mut ObjectMeta {
        match self {
            Dependent::Workload(d) => d.meta_mut(),
            Dependent::Service(s) => s.meta_mut(),
            Dependent::Route(i) => i.meta_mut(),
        }
    }

    pub fn name(&self) -> String {
        self.meta().name.clone().unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<String> {
        self.meta().namespace.clone()
    }
}

/// Builds the desired shape of one dependent kind from the App.
pub fn synthesize(kind: DependentKind, app: &App) -> ForgeOperatorResult<Dependent> {
    match kind {
        DependentKind::Workload => deployment::synthesize(app).map(Dependent::Workload),
        DependentKind::Service => service::synthesize(app).map(Dependent::Service),
        DependentKind::Route => ingress::synthesize(app).map(Dependent::Route),
    }
}

pub(crate) fn labels(app: &App) -> BTreeMap<String, String> {
    BTreeMap::from_iter(vec![
        ("app".to_string(), app.name_any()),
        (
            "app.kubernetes.io/managed-by".to_string(),
            MANAGED_BY.to_string(),
        ),
    ])
}

pub(crate) fn selector(app: &App) -> BTreeMap<String, String> {
    BTreeMap::from_iter(vec![("app".to_string(), app.name_any())])
}

pub(crate) fn metadata(app: &App) -> ObjectMeta {
    ObjectMeta {
        name: Some(app.name_any()),
        namespace: app.namespace(),
        labels: Some(labels(app)),
        ..Default::default()
    }
}

pub(crate) fn validate_port(kind: DependentKind, field: &str, port: i32) -> ForgeOperatorResult {
    if !(1..=65535).contains(&port) {
        return Err(ForgeOperatorError::Synthesis {
            kind,
            reason: format!("{field} {port} is outside 1-65535"),
        });
    }
    Ok(())
}
