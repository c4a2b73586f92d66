use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, Transaction};

use crate::common::{PetId, RequestId, UserId};
use crate::domains::adoptions::AdoptionError;

/// Reason length bounds, counted in characters after trimming.
pub const MIN_REASON_LEN: usize = 10;
pub const MAX_REASON_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Adoption request model - SQL persistence layer
///
/// The methods here are pure reads and writes; orchestration (locking,
/// cascades, status recomputation) belongs to the actions layer.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct AdoptionRequest {
    pub id: RequestId,
    pub user_id: UserId,
    pub pet_id: PetId,
    pub status: RequestStatus,
    pub reason: String,

    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
    pub response_notes: Option<String>,
}

impl AdoptionRequest {
    /// Validate and normalize a request reason.
    pub fn validate_reason(reason: &str) -> Result<String, AdoptionError> {
        let trimmed = reason.trim();
        let len = trimmed.chars().count();

        if len < MIN_REASON_LEN {
            return Err(AdoptionError::Validation(format!(
                "please provide a detailed reason (at least {} characters)",
                MIN_REASON_LEN
            )));
        }
        if len > MAX_REASON_LEN {
            return Err(AdoptionError::Validation(format!(
                "reason is too long (maximum {} characters)",
                MAX_REASON_LEN
            )));
        }

        Ok(trimmed.to_string())
    }

    /// Insert a new pending request.
    ///
    /// The partial unique index on (user_id, pet_id) WHERE pending backs up
    /// the duplicate check the engine performs under the pet lock.
    pub async fn insert(
        user_id: UserId,
        pet_id: PetId,
        reason: &str,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO adoption_requests (id, user_id, pet_id, reason)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(RequestId::new())
        .bind(user_id)
        .bind(pet_id)
        .bind(reason)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_by_id(
        id: RequestId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM adoption_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Requests on a pet, newest first
    pub async fn find_by_pet(
        pet_id: PetId,
        status: Option<RequestStatus>,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM adoption_requests
             WHERE pet_id = $1
               AND ($2::request_status IS NULL OR status = $2)
             ORDER BY created_at DESC",
        )
        .bind(pet_id)
        .bind(status)
        .fetch_all(executor)
        .await
    }

    /// Requests filed by a user, newest first
    pub async fn find_by_user(
        user_id: UserId,
        status: Option<RequestStatus>,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM adoption_requests
             WHERE user_id = $1
               AND ($2::request_status IS NULL OR status = $2)
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(executor)
        .await
    }

    /// Requests on pets owned by a user, newest first
    pub async fn find_by_pet_owner(
        owner_id: UserId,
        status: Option<RequestStatus>,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT r.* FROM adoption_requests r
             JOIN pets p ON p.id = r.pet_id
             WHERE p.owner_id = $1
               AND ($2::request_status IS NULL OR r.status = $2)
             ORDER BY r.created_at DESC",
        )
        .bind(owner_id)
        .bind(status)
        .fetch_all(executor)
        .await
    }

    /// Every request on the platform, newest first (admin view)
    pub async fn find_all(
        status: Option<RequestStatus>,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM adoption_requests
             WHERE ($1::request_status IS NULL OR status = $1)
             ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(executor)
        .await
    }

    /// The user's live request on a pet, if any
    pub async fn find_pending_for(
        user_id: UserId,
        pet_id: PetId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM adoption_requests
             WHERE user_id = $1 AND pet_id = $2 AND status = 'pending'",
        )
        .bind(user_id)
        .bind(pet_id)
        .fetch_optional(executor)
        .await
    }

    /// Number of pending requests on a pet
    pub async fn count_pending(
        pet_id: PetId,
        executor: impl PgExecutor<'_>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM adoption_requests WHERE pet_id = $1 AND status = 'pending'",
        )
        .bind(pet_id)
        .fetch_one(executor)
        .await
    }

    /// Pure status write, no side effects.
    ///
    /// Side effects (pet status, cascades, notifications) belong to the
    /// actions layer.
    pub async fn set_status(
        id: RequestId,
        status: RequestStatus,
        notes: Option<&str>,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE adoption_requests
             SET status = $2, responded_at = NOW(), response_notes = $3
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(notes)
        .fetch_one(&mut **tx)
        .await
    }

    /// Reject every pending request on a pet, optionally sparing one.
    ///
    /// Returns the rejected rows so the caller can notify their users after
    /// commit.
    pub async fn reject_pending(
        pet_id: PetId,
        except: Option<RequestId>,
        note: &str,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE adoption_requests
             SET status = 'rejected', responded_at = NOW(), response_notes = $3
             WHERE pet_id = $1
               AND status = 'pending'
               AND ($2::uuid IS NULL OR id <> $2)
             RETURNING *",
        )
        .bind(pet_id)
        .bind(except)
        .bind(note)
        .fetch_all(&mut **tx)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_too_short() {
        let result = AdoptionRequest::validate_reason("too short");
        assert!(matches!(result, Err(AdoptionError::Validation(_))));
    }

    #[test]
    fn test_reason_whitespace_only() {
        let result = AdoptionRequest::validate_reason("             ");
        assert!(matches!(result, Err(AdoptionError::Validation(_))));
    }

    #[test]
    fn test_reason_too_long() {
        let reason = "a".repeat(MAX_REASON_LEN + 1);
        let result = AdoptionRequest::validate_reason(&reason);
        assert!(matches!(result, Err(AdoptionError::Validation(_))));
    }

    #[test]
    fn test_reason_trimmed() {
        let reason = AdoptionRequest::validate_reason("  we have a big fenced yard  ").unwrap();
        assert_eq!(reason, "we have a big fenced yard");
    }

    #[test]
    fn test_reason_bounds_count_chars_not_bytes() {
        // ten multibyte characters are enough
        let reason = "犬".repeat(MIN_REASON_LEN);
        assert!(AdoptionRequest::validate_reason(&reason).is_ok());
    }
}
