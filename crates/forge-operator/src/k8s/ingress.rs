use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, ServiceBackendPort,
};
use kube::ResourceExt;

use crate::error::{ForgeOperatorError, ForgeOperatorResult};
use crate::operator::crd::App;

use super::{metadata, validate_port, DependentKind};

/// Routes `/` on the optional host to the App's Service.
pub fn synthesize(app: &App) -> ForgeOperatorResult<Ingress> {
    let spec = &app.spec;
    validate_port(DependentKind::Route, "servicePort", spec.service_port)?;
    if let Some(host) = &spec.host {
        if host.trim().is_empty() {
            return Err(ForgeOperatorError::Synthesis {
                kind: DependentKind::Route,
                reason: "host must not be blank when set".to_string(),
            });
        }
    }

    let backend = IngressBackend {
        service: Some(IngressServiceBackend {
            name: app.name_any(),
            port: Some(ServiceBackendPort {
                number: Some(spec.service_port),
                ..Default::default()
            }),
        }),
        ..Default::default()
    };

    let ingress = Ingress {
        metadata: metadata(app),
        spec: Some(IngressSpec {
            ingress_class_name: spec.ingress_class_name.clone(),
            rules: Some(vec![IngressRule {
                host: spec.host.clone(),
                http: Some(HTTPIngressRuleValue {
                    paths: vec![HTTPIngressPath {
                        path: Some("/".to_string()),
                        path_type: "Prefix".to_string(),
                        backend,
                    }],
                }),
            }]),
            ..Default::default()
        }),
        ..Default::default()
    };
    Ok(ingress)
}
