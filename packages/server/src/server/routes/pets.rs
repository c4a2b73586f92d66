use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};

use crate::common::auth::Actor;
use crate::common::PetId;
use crate::domains::adoptions::actions::{list_pet_requests, pet_availability, PetAvailability};
use crate::domains::adoptions::{AdoptionError, AdoptionRequest};
use crate::domains::pets::actions::{create_pet, get_pet, list_pets, remove_pet};
use crate::domains::pets::{NewPet, Pet, PetFilter};
use crate::server::app::AppState;

use super::require_actor;

/// GET /api/pets - browse listings (public)
pub async fn list_pets_handler(
    Extension(state): Extension<AppState>,
    Query(filter): Query<PetFilter>,
) -> Result<Json<Vec<Pet>>, AdoptionError> {
    let pets = list_pets(&filter, &state.deps).await?;
    Ok(Json(pets))
}

/// GET /api/pets/:id (public)
pub async fn get_pet_handler(
    Extension(state): Extension<AppState>,
    Path(pet_id): Path<PetId>,
) -> Result<Json<Pet>, AdoptionError> {
    let pet = get_pet(pet_id, &state.deps).await?;
    Ok(Json(pet))
}

/// POST /api/pets - list a new pet (shelter/admin)
pub async fn create_pet_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Json(input): Json<NewPet>,
) -> Result<(StatusCode, Json<Pet>), AdoptionError> {
    let actor = require_actor(actor)?;
    let pet = create_pet(&actor, input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

/// DELETE /api/pets/:id - delist a pet (owner/admin)
pub async fn remove_pet_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(pet_id): Path<PetId>,
) -> Result<StatusCode, AdoptionError> {
    let actor = require_actor(actor)?;
    remove_pet(&actor, pet_id, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/pets/:id/requests - requests on one pet (owner/admin)
pub async fn list_pet_requests_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(pet_id): Path<PetId>,
    Query(query): Query<super::RequestListQuery>,
) -> Result<Json<Vec<AdoptionRequest>>, AdoptionError> {
    let actor = require_actor(actor)?;
    let requests = list_pet_requests(&actor, pet_id, query.status, &state.deps).await?;
    Ok(Json(requests))
}

/// GET /api/pets/:id/availability
///
/// Anonymous callers get the status alone; authenticated callers also learn
/// whether they already have a live request on this pet.
pub async fn pet_availability_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(pet_id): Path<PetId>,
) -> Result<Json<PetAvailability>, AdoptionError> {
    let actor = actor.map(|Extension(actor)| actor);
    let availability = pet_availability(actor.as_ref(), pet_id, &state.deps).await?;
    Ok(Json(availability))
}
