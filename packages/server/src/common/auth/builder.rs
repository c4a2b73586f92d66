use super::{AuthError, Capability, Role};
use crate::common::UserId;

/// The authenticated actor.
///
/// Built once from the verified token by the auth middleware and threaded
/// explicitly through every action call; there is no ambient "current user".
///
/// Usage:
/// ```ignore
/// actor.can(Capability::ResolveRequest { pet_owner }).check()?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    /// Create a new actor for authorization checks
    ///
    /// # Arguments
    /// * `user_id` - The account ID of the actor
    /// * `role` - Role from the token (already validated during authentication)
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Specify what capability the actor needs
    pub fn can(&self, capability: Capability) -> CapabilityCheck {
        CapabilityCheck {
            actor: *self,
            capability,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Builder after specifying capability
pub struct CapabilityCheck {
    actor: Actor,
    capability: Capability,
}

impl CapabilityCheck {
    /// Perform the authorization check
    pub fn check(self) -> Result<(), AuthError> {
        let Actor { user_id, role } = self.actor;

        // Admins pass every capability check; ownership rules below only
        // matter for non-admin actors.
        if role.is_admin() {
            return Ok(());
        }

        match self.capability {
            Capability::RequestAdoption => Ok(()),

            Capability::PublishPet => match role {
                Role::Shelter => Ok(()),
                _ => Err(AuthError::PermissionDenied(
                    "only shelter accounts can list pets",
                )),
            },

            Capability::RemovePet { owner } => {
                if owner == Some(user_id) {
                    Ok(())
                } else {
                    Err(AuthError::PermissionDenied(
                        "only the pet's owner can delist it",
                    ))
                }
            }

            Capability::ResolveRequest { pet_owner } => {
                if pet_owner == Some(user_id) {
                    Ok(())
                } else {
                    Err(AuthError::PermissionDenied(
                        "only the pet's owner can resolve this request",
                    ))
                }
            }

            Capability::WithdrawOrResolveRequest {
                pet_owner,
                requester,
            } => {
                if pet_owner == Some(user_id) || requester == user_id {
                    Ok(())
                } else {
                    Err(AuthError::PermissionDenied(
                        "only the pet's owner or the requester can reject this request",
                    ))
                }
            }

            Capability::BulkResolve | Capability::ViewAllRequests => {
                Err(AuthError::AdminRequired)
            }
        }
    }
}
