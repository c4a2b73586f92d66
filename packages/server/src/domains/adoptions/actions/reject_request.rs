//! Reject an adoption request, or withdraw one as its requester.

use tracing::info;

use crate::common::auth::{Actor, Capability};
use crate::common::RequestId;
use crate::domains::adoptions::models::adoption_request::{AdoptionRequest, RequestStatus};
use crate::domains::adoptions::{notify, AdoptionError};
use crate::domains::pets::{Pet, PetStatus};
use crate::kernel::ServerDeps;

use super::bound_lock_wait;

/// Reject a pending request.
///
/// Approved and rejected requests are terminal; rejecting one again is a
/// `Conflict`. When the rejected request was the pet's last pending one, the
/// pet returns to the adoption pool in the same commit.
pub async fn reject_request(
    actor: &Actor,
    request_id: RequestId,
    notes: Option<String>,
    deps: &ServerDeps,
) -> Result<AdoptionRequest, AdoptionError> {
    // Fail fast, before taking any lock
    let preview = AdoptionRequest::find_by_id(request_id, &deps.db_pool)
        .await?
        .ok_or(AdoptionError::NotFound("adoption request"))?;
    let pet_preview = Pet::find_by_id(preview.pet_id, &deps.db_pool)
        .await?
        .ok_or(AdoptionError::NotFound("pet"))?;

    actor
        .can(Capability::WithdrawOrResolveRequest {
            pet_owner: pet_preview.owner_id,
            requester: preview.user_id,
        })
        .check()?;

    let mut tx = deps.db_pool.begin().await?;
    bound_lock_wait(&mut tx, deps.lock_timeout).await?;

    let pet = Pet::lock(preview.pet_id, &mut tx)
        .await?
        .ok_or(AdoptionError::NotFound("pet"))?;

    let request = AdoptionRequest::find_by_id(request_id, &mut *tx)
        .await?
        .ok_or(AdoptionError::NotFound("adoption request"))?;

    if request.status != RequestStatus::Pending {
        return Err(AdoptionError::Conflict("request already resolved"));
    }

    let rejected =
        AdoptionRequest::set_status(request_id, RequestStatus::Rejected, notes.as_deref(), &mut tx)
            .await?;

    // Return-to-pool: with no pending sibling left, the pet is available again
    let remaining = AdoptionRequest::count_pending(pet.id, &mut *tx).await?;
    if remaining == 0 && pet.status == PetStatus::Pending {
        pet.set_status(PetStatus::Available, &mut tx).await?;
    }

    tx.commit().await?;

    info!(
        request_id = %rejected.id,
        pet_id = %pet.id,
        remaining_pending = remaining,
        "adoption request rejected"
    );

    notify::request_resolutions(None, std::slice::from_ref(&rejected), &pet, deps).await;

    Ok(rejected)
}
