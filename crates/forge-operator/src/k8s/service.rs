use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use crate::error::ForgeOperatorResult;
use crate::operator::crd::App;

use super::{metadata, selector, validate_port, DependentKind};

pub fn synthesize(app: &App) -> ForgeOperatorResult<Service> {
    let spec = &app.spec;
    validate_port(DependentKind::Service, "servicePort", spec.service_port)?;
    validate_port(DependentKind::Service, "containerPort", spec.container_port)?;

    let service = Service {
        metadata: metadata(app),
        spec: Some(ServiceSpec {
            selector: Some(selector(app)),
            ports: Some(vec![ServicePort {
                name: Some("http".to_string()),
                port: spec.service_port,
                target_port: Some(IntOrString::Int(spec.container_port)),
                protocol: Some("TCP".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    };
    Ok(service)
}
