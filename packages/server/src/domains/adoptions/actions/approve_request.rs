//! Approve an adoption request.

use tracing::info;

use crate::common::auth::{Actor, Capability};
use crate::common::RequestId;
use crate::domains::adoptions::models::adoption_request::{AdoptionRequest, RequestStatus};
use crate::domains::adoptions::{notify, AdoptionError};
use crate::domains::pets::{Pet, PetStatus};
use crate::kernel::ServerDeps;

use super::bound_lock_wait;

/// Note attached to requests rejected by the approval cascade.
pub(crate) const CASCADE_NOTE: &str = "pet no longer available";

/// Approve a request, adopting the pet out and rejecting every rival pending
/// request in the same commit.
///
/// The permission check runs on a plain read before the lock, so a denied
/// actor never contends the pet row. State is re-verified under the lock: a
/// rival approval that committed first leaves this request `rejected`, and
/// the re-check turns that into a `Conflict` instead of a double adoption.
pub async fn approve_request(
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
        .can(Capability::ResolveRequest {
            pet_owner: pet_preview.owner_id,
        })
        .check()?;

    let mut tx = deps.db_pool.begin().await?;
    bound_lock_wait(&mut tx, deps.lock_timeout).await?;

    let pet = Pet::lock(preview.pet_id, &mut tx)
        .await?
        .ok_or(AdoptionError::NotFound("pet"))?;

    // Fresh reads under the lock; the preview may have lost a race
    let request = AdoptionRequest::find_by_id(request_id, &mut *tx)
        .await?
        .ok_or(AdoptionError::NotFound("adoption request"))?;

    if request.status != RequestStatus::Pending {
        return Err(AdoptionError::Conflict("request already resolved"));
    }
    match pet.status {
        PetStatus::Pending => {}
        PetStatus::Adopted => return Err(AdoptionError::Conflict("pet already adopted")),
        PetStatus::Available => return Err(AdoptionError::Conflict("request already resolved")),
    }

    let approved =
        AdoptionRequest::set_status(request_id, RequestStatus::Approved, notes.as_deref(), &mut tx)
            .await?;
    pet.set_status(PetStatus::Adopted, &mut tx).await?;

    // Cascade: every rival pending request loses in the same commit
    let cascaded =
        AdoptionRequest::reject_pending(pet.id, Some(request_id), CASCADE_NOTE, &mut tx).await?;

    tx.commit().await?;

    info!(
        request_id = %approved.id,
        pet_id = %pet.id,
        cascaded = cascaded.len(),
        "adoption request approved"
    );

    notify::request_resolutions(Some(&approved), &cascaded, &pet, deps).await;

    Ok(approved)
}
