use crate::k8s::DependentKind;

use super::crd::AppSpec;

/// What a pass may do for one dependent kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Create when absent, replace when present.
    Converge,
    /// Look but never write; an existing object is left as it is.
    Observe,
    /// No cluster I/O at all.
    Skip,
}

/// Decides the gate from the App's flags alone.
///
/// Workload and Service are always converged. The Ingress hangs off
/// `enableService`: while it is off the step is skipped outright, so an
/// Ingress created earlier stays behind until the App is deleted.
pub fn gate(kind: DependentKind, spec: &AppSpec) -> Gate {
    match kind {
        DependentKind::Workload | DependentKind::Service => Gate::Converge,
        DependentKind::Route if !spec.enable_service => Gate::Skip,
        DependentKind::Route if spec.enable_ingress => Gate::Converge,
        DependentKind::Route => Gate::Observe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(enable_service: bool, enable_ingress: bool) -> AppSpec {
        let mut spec = AppSpec::new(1, "nginx");
        spec.enable_service = enable_service;
        spec.enable_ingress = enable_ingress;
        spec
    }

    #[test]
    fn test_workload_and_service_ungated() {
        for (service, ingress) in [(false, false), (false, true), (true, false), (true, true)] {
            let spec = spec(service, ingress);
            assert_eq!(gate(DependentKind::Workload, &spec), Gate::Converge);
            assert_eq!(gate(DependentKind::Service, &spec), Gate::Converge);
        }
    }

    #[test]
    fn test_route_gate() {
        assert_eq!(gate(DependentKind::Route, &spec(false, false)), Gate::Skip);
        assert_eq!(gate(DependentKind::Route, &spec(false, true)), Gate::Skip);
        assert_eq!(gate(DependentKind::Route, &spec(true, false)), Gate::Observe);
        assert_eq!(gate(DependentKind::Route, &spec(true, true)), Gate::Converge);
    }
}
