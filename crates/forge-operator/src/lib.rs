pub mod error;
pub mod k8s;
pub mod operator;

pub use operator::crd::{App, AppIdentity, AppSpec};
pub use operator::{operator, reconcile_once};
