use crate::k8s::DependentKind;

pub type ForgeOperatorResult<T = (), E = ForgeOperatorError> = Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ForgeOperatorError {
    #[error("Timeout error: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),

    #[error("Reconciliation cancelled")]
    Cancelled,

    /// Any error originating from the `kube-rs` crate
    #[error("Kubernetes reported error: {source}")]
    Kube {
        #[from]
        source: kube::Error,
    },

    /// The App cannot be turned into a valid dependent resource.
    #[error("Invalid {kind} for App: {reason}")]
    Synthesis { kind: DependentKind, reason: String },

    /// The object is already controlled by someone other than the App.
    #[error("{kind} {name} is already controlled by {owner}")]
    OwnerConflict {
        kind: DependentKind,
        name: String,
        owner: String,
    },

    #[error("App {0} has no uid, cannot reference it as owner")]
    MissingOwnerUid(String),
}

impl ForgeOperatorError {
    /// Whether re-running the same pass can succeed without the App changing.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Kube { source } => match source {
                kube::Error::Api(response) => {
                    // conflicts and server side trouble clear up on their own
                    response.code == 409 || response.code == 429 || response.code >= 500
                }
                _ => true,
            },
            Self::Timeout(_) | Self::Cancelled => true,
            Self::Synthesis { .. } | Self::OwnerConflict { .. } | Self::MissingOwnerUid(_) => {
                false
            }
        }
    }
}
