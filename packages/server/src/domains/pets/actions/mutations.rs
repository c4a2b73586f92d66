//! Pet listing mutations.

use tracing::info;

use crate::common::auth::{Actor, Capability};
use crate::common::PetId;
use crate::domains::adoptions::actions::bound_lock_wait;
use crate::domains::adoptions::models::adoption_request::AdoptionRequest;
use crate::domains::adoptions::{notify, AdoptionError};
use crate::domains::pets::{NewPet, Pet, PetStatus};
use crate::kernel::ServerDeps;

const MAX_NAME_LEN: usize = 100;
const MAX_AGE_YEARS: i32 = 30;

/// Note attached to requests rejected because the pet was delisted.
const DELIST_NOTE: &str = "pet delisted";

fn validate(new: &NewPet) -> Result<(), AdoptionError> {
    if new.name.trim().is_empty() {
        return Err(AdoptionError::Validation(
            "pet name cannot be empty".to_string(),
        ));
    }
    if new.name.chars().count() > MAX_NAME_LEN {
        return Err(AdoptionError::Validation(format!(
            "pet name is too long (maximum {} characters)",
            MAX_NAME_LEN
        )));
    }
    if !(0..=MAX_AGE_YEARS).contains(&new.age_years) {
        return Err(AdoptionError::Validation(format!(
            "age must be between 0 and {} years",
            MAX_AGE_YEARS
        )));
    }
    Ok(())
}

/// List a new pet, created `available` and owned by the actor.
pub async fn create_pet(
    actor: &Actor,
    new: NewPet,
    deps: &ServerDeps,
) -> Result<Pet, AdoptionError> {
    actor.can(Capability::PublishPet).check()?;
    validate(&new)?;

    let pet = Pet::insert(new, actor.user_id, &deps.db_pool).await?;

    info!(pet_id = %pet.id, owner_id = %actor.user_id, "pet listed");

    Ok(pet)
}

/// Delist a pet (soft delete).
///
/// Runs under the pet row lock like every other status mutation: any still
/// pending requests are rejected in the same commit so no live request ever
/// points at a delisted pet, and their users are notified afterwards.
pub async fn remove_pet(
    actor: &Actor,
    pet_id: PetId,
    deps: &ServerDeps,
) -> Result<(), AdoptionError> {
    let preview = Pet::find_by_id(pet_id, &deps.db_pool)
        .await?
        .ok_or(AdoptionError::NotFound("pet"))?;

    actor
        .can(Capability::RemovePet {
            owner: preview.owner_id,
        })
        .check()?;

    let mut tx = deps.db_pool.begin().await?;
    bound_lock_wait(&mut tx, deps.lock_timeout).await?;

    let pet = Pet::lock(pet_id, &mut tx)
        .await?
        .ok_or(AdoptionError::NotFound("pet"))?;

    let cascaded = AdoptionRequest::reject_pending(pet.id, None, DELIST_NOTE, &mut tx).await?;

    if pet.status == PetStatus::Pending {
        pet.set_status(PetStatus::Available, &mut tx).await?;
    }
    pet.mark_deleted(&mut tx).await?;

    tx.commit().await?;

    info!(
        pet_id = %pet.id,
        rejected_requests = cascaded.len(),
        "pet delisted"
    );

    notify::request_resolutions(None, &cascaded, &pet, deps).await;

    Ok(())
}
