use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
#[kube(
    group = "ingress.baiding.tech",
    version = "v1beta1",
    kind = "App",
    plural = "apps",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct AppSpec {
    pub replicas: i32,
    pub image: String,
    #[serde(default)]
    pub enable_service: bool,
    /// Ingress is only ever written while the service is enabled too.
    #[serde(default)]
    pub enable_ingress: bool,
    #[serde(default = "default_container_port")]
    pub container_port: i32,
    #[serde(default = "default_service_port")]
    pub service_port: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress_class_name: Option<String>,
}

impl AppSpec {
    pub fn new(replicas: i32, image: &str) -> Self {
        Self {
            replicas,
            image: image.to_string(),
            enable_service: false,
            enable_ingress: false,
            container_port: default_container_port(),
            service_port: default_service_port(),
            host: None,
            ingress_class_name: None,
        }
    }
}

fn default_container_port() -> i32 {
    80
}

fn default_service_port() -> i32 {
    8080
}

/// Primary key of an App and, by construction, of every object it owns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppIdentity {
    pub name: String,
    pub namespace: String,
}

impl AppIdentity {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
        }
    }
}

impl From<&App> for AppIdentity {
    fn from(app: &App) -> Self {
        Self {
            name: app.name_any(),
            namespace: app.namespace().unwrap_or_else(|| "default".to_string()),
        }
    }
}

impl std::fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::CustomResourceExt;

    #[test]
    fn test_spec_defaults() {
        let spec: AppSpec =
            serde_json::from_value(serde_json::json!({"replicas": 2, "image": "nginx:1.0"}))
                .unwrap();
        assert_eq!(spec, AppSpec::new(2, "nginx:1.0"));
        assert!(!spec.enable_service);
        assert!(!spec.enable_ingress);
        assert_eq!(spec.container_port, 80);
        assert_eq!(spec.service_port, 8080);
    }

    #[test]
    fn test_spec_camel_case() {
        let spec: AppSpec = serde_json::from_value(serde_json::json!({
            "replicas": 1,
            "image": "nginx",
            "enableService": true,
            "enableIngress": true,
            "ingressClassName": "nginx"
        }))
        .unwrap();
        assert!(spec.enable_service);
        assert!(spec.enable_ingress);
        assert_eq!(spec.ingress_class_name.as_deref(), Some("nginx"));
    }

    #[test]
    fn test_crd_metadata() {
        let crd = App::crd();
        assert_eq!(crd.spec.group, "ingress.baiding.tech");
        assert_eq!(crd.spec.names.kind, "App");
        assert_eq!(crd.spec.scope, "Namespaced");
    }

    #[test]
    fn test_identity_defaults_namespace() {
        let app = App::new("web", AppSpec::new(1, "nginx"));
        let id = AppIdentity::from(&app);
        assert_eq!(id, AppIdentity::new("web", "default"));
        assert_eq!(id.to_string(), "default/web");
    }
}
