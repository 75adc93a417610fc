use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use kube::{Resource, ResourceExt};

use crate::error::{ForgeOperatorError, ForgeOperatorResult};
use crate::k8s::{Dependent, DependentKind};

use super::crd::App;

fn controller_of(meta: &ObjectMeta) -> Option<&OwnerReference> {
    meta.owner_references
        .as_ref()?
        .iter()
        .find(|owner| owner.controller == Some(true))
}

fn conflict(kind: DependentKind, name: String, owner: &OwnerReference) -> ForgeOperatorError {
    ForgeOperatorError::OwnerConflict {
        kind,
        name,
        owner: format!("{} {} ({})", owner.kind, owner.name, owner.uid),
    }
}

/// Stamps `owner` as the controller of `dependent`.
///
/// An object has at most one controller. Linking the same App twice is a
/// no-op; linking when another controller is already declared fails.
pub fn link_owner(dependent: &mut Dependent, owner: &App) -> ForgeOperatorResult {
    let mut owner_ref = owner
        .controller_owner_ref(&())
        .ok_or_else(|| ForgeOperatorError::MissingOwnerUid(owner.name_any()))?;
    owner_ref.block_owner_deletion = Some(true);

    if let Some(existing) = controller_of(dependent.meta()) {
        if existing.uid == owner_ref.uid {
            return Ok(());
        }
        return Err(conflict(dependent.kind(), dependent.name(), existing));
    }

    dependent
        .meta_mut()
        .owner_references
        .get_or_insert_with(Vec::new)
        .push(owner_ref);
    Ok(())
}

/// Refuses to take over a live object controlled by something else.
/// Objects without any controller are adopted.
pub fn ensure_adoptable(observed: &Dependent, owner: &App) -> ForgeOperatorResult {
    let Some(existing) = controller_of(observed.meta()) else {
        return Ok(());
    };
    match owner.uid() {
        Some(uid) if uid == existing.uid => Ok(()),
        _ => Err(conflict(observed.kind(), observed.name(), existing)),
    }
}
