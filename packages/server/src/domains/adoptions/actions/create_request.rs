//! Create an adoption request.

use serde::Deserialize;
use tracing::info;

use crate::common::auth::{Actor, Capability};
use crate::common::PetId;
use crate::domains::adoptions::models::adoption_request::AdoptionRequest;
use crate::domains::adoptions::AdoptionError;
use crate::domains::pets::{Pet, PetStatus};
use crate::kernel::ServerDeps;

use super::bound_lock_wait;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdoptionRequest {
    pub pet_id: PetId,
    pub reason: String,
}

/// File an adoption request for a pet.
///
/// The availability check and the `available -> pending` flip happen under
/// the same pet row lock, so two concurrent requesters cannot both observe an
/// available pet and both flip it. A pet that is already `pending` accepts
/// further requests from other users; they become rivals resolved by the
/// eventual approval. Only an adopted pet refuses new requests.
pub async fn create_request(
    actor: &Actor,
    input: CreateAdoptionRequest,
    deps: &ServerDeps,
) -> Result<AdoptionRequest, AdoptionError> {
    actor.can(Capability::RequestAdoption).check()?;
    let reason = AdoptionRequest::validate_reason(&input.reason)?;

    let mut tx = deps.db_pool.begin().await?;
    bound_lock_wait(&mut tx, deps.lock_timeout).await?;

    // Dropping the transaction on any early return below rolls it back.
    let pet = Pet::lock(input.pet_id, &mut tx)
        .await?
        .ok_or(AdoptionError::NotFound("pet"))?;

    if pet.owner_id == Some(actor.user_id) {
        return Err(AdoptionError::Validation(
            "you cannot adopt your own pet".to_string(),
        ));
    }

    if pet.status == PetStatus::Adopted {
        return Err(AdoptionError::Conflict("pet not available"));
    }

    if AdoptionRequest::find_pending_for(actor.user_id, pet.id, &mut *tx)
        .await?
        .is_some()
    {
        return Err(AdoptionError::Conflict("duplicate pending request"));
    }

    let request = AdoptionRequest::insert(actor.user_id, pet.id, &reason, &mut tx).await?;

    if pet.status == PetStatus::Available {
        pet.set_status(PetStatus::Pending, &mut tx).await?;
    }

    tx.commit().await?;

    info!(
        request_id = %request.id,
        pet_id = %pet.id,
        user_id = %actor.user_id,
        "adoption request created"
    );

    Ok(request)
}
