//! Test fixtures for creating test data.
//!
//! Fixtures use the model methods directly; requests go through the engine
//! so pet status flips exactly as it does in production.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use server_core::common::auth::{Actor, Role};
use server_core::common::PetId;
use server_core::domains::accounts::{NewUser, User};
use server_core::domains::adoptions::actions::{create_request, CreateAdoptionRequest};
use server_core::domains::adoptions::AdoptionRequest;
use server_core::domains::pets::{NewPet, Pet, Species};
use server_core::kernel::ServerDeps;

/// Create a user with a unique email and a push token the mock sink can be
/// queried by.
pub async fn create_user(role: Role, pool: &PgPool) -> Result<User> {
    let tag = Uuid::new_v4();
    User::create(
        NewUser {
            email: format!("user-{}@example.org", tag),
            display_name: format!("Test {:?}", role),
            role,
            phone_number: None,
            city: Some("Minneapolis".to_string()),
            bio: None,
            shelter_name: matches!(role, Role::Shelter).then(|| "Test Shelter".to_string()),
            expo_push_token: Some(format!("ExponentPushToken[{}]", tag)),
        },
        pool,
    )
    .await
}

/// The actor a user authenticates as.
pub fn actor(user: &User) -> Actor {
    Actor::new(user.id, user.role)
}

pub async fn create_pet(owner: &User, pool: &PgPool) -> Result<Pet> {
    create_pet_named("Luna", owner, pool).await
}

pub async fn create_pet_named(name: &str, owner: &User, pool: &PgPool) -> Result<Pet> {
    Pet::insert(
        NewPet {
            name: name.to_string(),
            species: Species::Dog,
            breed: Some("Mixed".to_string()),
            age_years: 3,
            gender: Some("female".to_string()),
            size: Some("medium".to_string()),
            description: Some("Friendly and house-trained".to_string()),
            photo_url: None,
        },
        owner.id,
        pool,
    )
    .await
    .map_err(Into::into)
}

/// File a request through the engine.
pub async fn place_request(user: &User, pet: &Pet, deps: &ServerDeps) -> Result<AdoptionRequest> {
    create_request(
        &actor(user),
        CreateAdoptionRequest {
            pet_id: pet.id,
            reason: "We have a fenced yard and plenty of time for walks".to_string(),
        },
        deps,
    )
    .await
    .map_err(Into::into)
}

/// Number of approved requests on a pet - must never exceed 1.
pub async fn approved_count(pet_id: PetId, pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM adoption_requests WHERE pet_id = $1 AND status = 'approved'",
    )
    .bind(pet_id)
    .fetch_one(pool)
    .await
    .expect("count query failed")
}

/// Number of pending requests on a pet.
pub async fn pending_count(pet_id: PetId, pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM adoption_requests WHERE pet_id = $1 AND status = 'pending'",
    )
    .bind(pet_id)
    .fetch_one(pool)
    .await
    .expect("count query failed")
}

/// Reload a pet, including its current status.
pub async fn reload_pet(pet_id: PetId, pool: &PgPool) -> Pet {
    Pet::find_by_id(pet_id, pool)
        .await
        .expect("pet query failed")
        .expect("pet missing")
}
