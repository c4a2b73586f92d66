use serde::{Deserialize, Serialize};

use crate::common::UserId;

/// Account roles.
///
/// Resolved once at authentication time and carried in the token; the
/// authorization layer never re-derives a role from profile data per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular account looking to adopt.
    Adopter,
    /// Shelter account that lists pets.
    Shelter,
    /// Platform administrator.
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Capabilities in the adoption platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// File an adoption request. Any authenticated actor may try; requesting
    /// your own pet is rejected by the transition engine under the pet lock.
    RequestAdoption,

    /// List a new pet for adoption (shelters and admins).
    PublishPet,

    /// Delist a pet (its owner, or an admin).
    RemovePet { owner: Option<UserId> },

    /// Approve an adoption request (the pet owner, or an admin).
    ResolveRequest { pet_owner: Option<UserId> },

    /// Reject an adoption request (the pet owner, an admin, or the
    /// requester withdrawing their own request).
    WithdrawOrResolveRequest {
        pet_owner: Option<UserId>,
        requester: UserId,
    },

    /// Resolve a batch of requests in one call (admin only).
    BulkResolve,

    /// View every adoption request on the platform (admin only).
    ViewAllRequests,
}
