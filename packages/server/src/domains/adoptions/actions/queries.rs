//! Read-side queries over the request ledger.

use serde::Serialize;

use crate::common::auth::{Actor, Capability};
use crate::common::{PetId, RequestId};
use crate::domains::adoptions::models::adoption_request::{AdoptionRequest, RequestStatus};
use crate::domains::adoptions::AdoptionError;
use crate::domains::pets::{Pet, PetStatus};
use crate::kernel::ServerDeps;

/// The actor's own requests
pub async fn list_own_requests(
    actor: &Actor,
    status: Option<RequestStatus>,
    deps: &ServerDeps,
) -> Result<Vec<AdoptionRequest>, AdoptionError> {
    Ok(AdoptionRequest::find_by_user(actor.user_id, status, &deps.db_pool).await?)
}

/// Requests on pets the actor owns
pub async fn list_shelter_requests(
    actor: &Actor,
    status: Option<RequestStatus>,
    deps: &ServerDeps,
) -> Result<Vec<AdoptionRequest>, AdoptionError> {
    Ok(AdoptionRequest::find_by_pet_owner(actor.user_id, status, &deps.db_pool).await?)
}

/// Requests on one pet, visible to its owner (or an admin)
pub async fn list_pet_requests(
    actor: &Actor,
    pet_id: PetId,
    status: Option<RequestStatus>,
    deps: &ServerDeps,
) -> Result<Vec<AdoptionRequest>, AdoptionError> {
    let pet = Pet::find_by_id(pet_id, &deps.db_pool)
        .await?
        .ok_or(AdoptionError::NotFound("pet"))?;

    actor
        .can(Capability::ResolveRequest {
            pet_owner: pet.owner_id,
        })
        .check()?;

    Ok(AdoptionRequest::find_by_pet(pet.id, status, &deps.db_pool).await?)
}

/// Every request on the platform (admin)
pub async fn list_all_requests(
    actor: &Actor,
    status: Option<RequestStatus>,
    deps: &ServerDeps,
) -> Result<Vec<AdoptionRequest>, AdoptionError> {
    actor.can(Capability::ViewAllRequests).check()?;

    Ok(AdoptionRequest::find_all(status, &deps.db_pool).await?)
}

#[derive(Debug, Serialize)]
pub struct PetAvailability {
    pub available: bool,
    pub status: PetStatus,
    /// The caller's own live request on this pet, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_pending_request: Option<RequestId>,
}

/// Whether a pet can currently be requested, and whether the caller already
/// has a live request on it. Anonymous callers get the status alone.
pub async fn pet_availability(
    actor: Option<&Actor>,
    pet_id: PetId,
    deps: &ServerDeps,
) -> Result<PetAvailability, AdoptionError> {
    let pet = Pet::find_by_id(pet_id, &deps.db_pool)
        .await?
        .ok_or(AdoptionError::NotFound("pet"))?;

    let my_pending_request = match actor {
        Some(actor) => {
            AdoptionRequest::find_pending_for(actor.user_id, pet.id, &deps.db_pool)
                .await?
                .map(|request| request.id)
        }
        None => None,
    };

    Ok(PetAvailability {
        available: pet.status == PetStatus::Available,
        status: pet.status,
        my_pending_request,
    })
}
