use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, ContainerPort, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::ResourceExt;

use crate::error::{ForgeOperatorError, ForgeOperatorResult};
use crate::operator::crd::App;

use super::{labels, metadata, selector, validate_port, DependentKind};

/// Converts an `App` into the `Deployment` that runs its container.
///
/// The pod template carries the full label set while the selector only
/// matches on `app`, so adding labels later never orphans running pods.
pub fn synthesize(app: &App) -> ForgeOperatorResult<Deployment> {
    let spec = &app.spec;
    if spec.image.trim().is_empty() {
        return Err(ForgeOperatorError::Synthesis {
            kind: DependentKind::Workload,
            reason: "image must not be empty".to_string(),
        });
    }
    if spec.replicas < 0 {
        return Err(ForgeOperatorError::Synthesis {
            kind: DependentKind::Workload,
            reason: format!("replicas must not be negative, got {}", spec.replicas),
        });
    }
    validate_port(DependentKind::Workload, "containerPort", spec.container_port)?;

    let deployment = Deployment {
        metadata: metadata(app),
        spec: Some(DeploymentSpec {
            replicas: Some(spec.replicas),
            selector: LabelSelector {
                match_labels: Some(selector(app)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels(app)),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: app.name_any(),
                        image: Some(spec.image.clone()),
                        ports: Some(vec![ContainerPort {
                            name: Some("http".to_string()),
                            container_port: spec.container_port,
                            protocol: Some("TCP".to_string()),
                            ..Default::default()
                        }]),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    };
    Ok(deployment)
}
