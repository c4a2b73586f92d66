//! Concurrency tests for the adoption workflow.
//!
//! These drive real rival transactions against the shared Postgres container
//! and assert the exactly-one-winner guarantees: rival operations on one pet
//! serialize on its row lock, approval is unique, and aborted attempts leave
//! nothing behind.

mod common;

use std::time::Duration;

use crate::common::{
    actor, approved_count, create_pet, create_user, pending_count, place_request, reload_pet,
    TestHarness,
};
use futures::future::join_all;
use server_core::common::auth::Role;
use server_core::domains::adoptions::actions::{
    approve_request, create_request, CreateAdoptionRequest,
};
use server_core::domains::adoptions::{AdoptionError, RequestStatus};
use server_core::domains::pets::PetStatus;
use test_context::test_context;

fn request_input(pet_id: server_core::common::PetId) -> CreateAdoptionRequest {
    CreateAdoptionRequest {
        pet_id,
        reason: "We have a fenced yard and plenty of time for walks".to_string(),
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_rival_requests_all_file_and_pet_pends_once(ctx: &TestHarness) {
    let shelter = create_user(Role::Shelter, &ctx.db_pool).await.unwrap();
    let pet = create_pet(&shelter, &ctx.db_pool).await.unwrap();

    let mut users = Vec::new();
    for _ in 0..8 {
        users.push(create_user(Role::Adopter, &ctx.db_pool).await.unwrap());
    }

    let handles: Vec<_> = users
        .iter()
        .map(|user| {
            let deps = ctx.deps.clone();
            let requester = actor(user);
            let input = request_input(pet.id);
            tokio::spawn(async move { create_request(&requester, input, &deps).await })
        })
        .collect();

    let results = join_all(handles).await;
    let successes = results.iter().filter(|r| matches!(r, Ok(Ok(_)))).count();

    // Distinct requesters all become rivals; the lock serializes them
    assert_eq!(successes, 8);
    assert_eq!(pending_count(pet.id, &ctx.db_pool).await, 8);
    assert_eq!(reload_pet(pet.id, &ctx.db_pool).await.status, PetStatus::Pending);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_duplicate_requests_exactly_one_wins(ctx: &TestHarness) {
    let shelter = create_user(Role::Shelter, &ctx.db_pool).await.unwrap();
    let adopter = create_user(Role::Adopter, &ctx.db_pool).await.unwrap();
    let pet = create_pet(&shelter, &ctx.db_pool).await.unwrap();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let deps = ctx.deps.clone();
            let requester = actor(&adopter);
            let input = request_input(pet.id);
            tokio::spawn(async move { create_request(&requester, input, &deps).await })
        })
        .collect();

    let results = join_all(handles).await;

    let mut successes = 0;
    let mut conflicts = 0;
    for result in results {
        match result.expect("task panicked") {
            Ok(_) => successes += 1,
            Err(AdoptionError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 5);
    assert_eq!(pending_count(pet.id, &ctx.db_pool).await, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_approvals_exactly_one_winner(ctx: &TestHarness) {
    let shelter = create_user(Role::Shelter, &ctx.db_pool).await.unwrap();
    let pet = create_pet(&shelter, &ctx.db_pool).await.unwrap();

    let mut requests = Vec::new();
    for _ in 0..5 {
        let user = create_user(Role::Adopter, &ctx.db_pool).await.unwrap();
        requests.push(place_request(&user, &pet, &ctx.deps).await.unwrap());
    }

    // The owner fires approval of every rival at once
    let handles: Vec<_> = requests
        .iter()
        .map(|request| {
            let deps = ctx.deps.clone();
            let owner = actor(&shelter);
            let request_id = request.id;
            tokio::spawn(async move { approve_request(&owner, request_id, None, &deps).await })
        })
        .collect();

    let results = join_all(handles).await;

    let mut successes = 0;
    let mut conflicts = 0;
    for result in results {
        match result.expect("task panicked") {
            Ok(_) => successes += 1,
            Err(AdoptionError::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 4);

    // Exactly one approval ever; everyone else was cascaded to rejected
    assert_eq!(approved_count(pet.id, &ctx.db_pool).await, 1);
    assert_eq!(pending_count(pet.id, &ctx.db_pool).await, 0);
    assert_eq!(reload_pet(pet.id, &ctx.db_pool).await.status, PetStatus::Adopted);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn invariants_hold_under_mixed_racing_operations(ctx: &TestHarness) {
    let shelter = create_user(Role::Shelter, &ctx.db_pool).await.unwrap();
    let pet = create_pet(&shelter, &ctx.db_pool).await.unwrap();

    let seed = create_user(Role::Adopter, &ctx.db_pool).await.unwrap();
    let seeded = place_request(&seed, &pet, &ctx.deps).await.unwrap();

    let mut late_users = Vec::new();
    for _ in 0..4 {
        late_users.push(create_user(Role::Adopter, &ctx.db_pool).await.unwrap());
    }

    // Approval racing a burst of new rival requests
    let mut handles = Vec::new();
    {
        let deps = ctx.deps.clone();
        let owner = actor(&shelter);
        let request_id = seeded.id;
        handles.push(tokio::spawn(async move {
            approve_request(&owner, request_id, None, &deps)
                .await
                .map(|_| ())
        }));
    }
    for user in &late_users {
        let deps = ctx.deps.clone();
        let requester = actor(user);
        let input = request_input(pet.id);
        handles.push(tokio::spawn(async move {
            create_request(&requester, input, &deps).await.map(|_| ())
        }));
    }

    let _ = join_all(handles).await;

    // Whatever interleaving happened, the invariants hold
    assert_eq!(approved_count(pet.id, &ctx.db_pool).await, 1);
    assert_eq!(reload_pet(pet.id, &ctx.db_pool).await.status, PetStatus::Adopted);
    // Requests that slipped in before the approval were cascaded; requests
    // after it were refused. Either way nothing is left pending.
    assert_eq!(pending_count(pet.id, &ctx.db_pool).await, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn bounded_lock_wait_times_out_under_contention(ctx: &TestHarness) {
    let shelter = create_user(Role::Shelter, &ctx.db_pool).await.unwrap();
    let adopter = create_user(Role::Adopter, &ctx.db_pool).await.unwrap();
    let pet = create_pet(&shelter, &ctx.db_pool).await.unwrap();

    // A rival transaction parks on the pet row and never commits
    let mut blocker = ctx.db_pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM pets WHERE id = $1 FOR UPDATE")
        .bind(pet.id)
        .fetch_one(&mut *blocker)
        .await
        .unwrap();

    let deps = ctx.deps_with_lock_timeout(Duration::from_millis(200));
    let err = create_request(&actor(&adopter), request_input(pet.id), &deps)
        .await
        .unwrap_err();

    assert!(matches!(err, AdoptionError::LockTimeout));

    blocker.rollback().await.unwrap();

    // The timed-out attempt left zero observable effect
    assert_eq!(pending_count(pet.id, &ctx.db_pool).await, 0);
    assert_eq!(reload_pet(pet.id, &ctx.db_pool).await.status, PetStatus::Available);

    // With the blocker gone the same request goes through
    place_request(&adopter, &pet, &ctx.deps).await.unwrap();
    assert_eq!(reload_pet(pet.id, &ctx.db_pool).await.status, PetStatus::Pending);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn operations_on_different_pets_do_not_contend(ctx: &TestHarness) {
    let shelter = create_user(Role::Shelter, &ctx.db_pool).await.unwrap();
    let adopter = create_user(Role::Adopter, &ctx.db_pool).await.unwrap();
    let pet_a = create_pet(&shelter, &ctx.db_pool).await.unwrap();
    let pet_b = create_pet(&shelter, &ctx.db_pool).await.unwrap();

    // Park on pet A...
    let mut blocker = ctx.db_pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM pets WHERE id = $1 FOR UPDATE")
        .bind(pet_a.id)
        .fetch_one(&mut *blocker)
        .await
        .unwrap();

    // ...and pet B proceeds immediately, even with a short lock budget
    let deps = ctx.deps_with_lock_timeout(Duration::from_millis(200));
    let request = create_request(&actor(&adopter), request_input(pet_b.id), &deps)
        .await
        .unwrap();

    assert_eq!(request.status, RequestStatus::Pending);
    blocker.rollback().await.unwrap();
}
