//! Pet listing queries. Public: no actor required.

use crate::common::PetId;
use crate::domains::adoptions::AdoptionError;
use crate::domains::pets::{Pet, PetFilter};
use crate::kernel::ServerDeps;

/// List pets matching the filter, newest first.
pub async fn list_pets(filter: &PetFilter, deps: &ServerDeps) -> Result<Vec<Pet>, AdoptionError> {
    Ok(Pet::list(filter, &deps.db_pool).await?)
}

/// Fetch a single pet.
pub async fn get_pet(pet_id: PetId, deps: &ServerDeps) -> Result<Pet, AdoptionError> {
    Pet::find_by_id(pet_id, &deps.db_pool)
        .await?
        .ok_or(AdoptionError::NotFound("pet"))
}
