// The transition engine.
//
// Every mutation here runs as one transaction that starts by locking the pet
// row and ends by committing all writes or rolling all of them back. The lock
// serializes rival operations on the same pet; operations on different pets
// never contend. Notifications go out only after commit.

mod approve_request;
mod bulk_update;
mod create_request;
mod queries;
mod reject_request;

pub use approve_request::approve_request;
pub use bulk_update::{bulk_update, BulkUpdateError, BulkUpdateOutcome};
pub use create_request::{create_request, CreateAdoptionRequest};
pub use queries::{
    list_all_requests, list_own_requests, list_pet_requests, list_shelter_requests,
    pet_availability, PetAvailability,
};
pub use reject_request::reject_request;

use sqlx::{Postgres, Transaction};
use std::time::Duration;

/// Bound how long this transaction may wait for row locks.
///
/// Exceeding the bound aborts the wait with Postgres error 55P03, which maps
/// to `AdoptionError::LockTimeout`. The engine never retries; the caller
/// decides.
pub(crate) async fn bound_lock_wait(
    tx: &mut Transaction<'_, Postgres>,
    timeout: Duration,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT set_config('lock_timeout', $1, true)")
        .bind(format!("{}ms", timeout.as_millis()))
        .execute(&mut **tx)
        .await?;

    Ok(())
}
