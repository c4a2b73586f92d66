use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Postgres, Transaction};

use crate::common::{PetId, UserId};
use crate::domains::adoptions::AdoptionError;

/// Allocation status of a pet.
///
/// Mutated only by the adoption transition engine while it holds the pet
/// row lock; everything else reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pet_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PetStatus {
    Available,
    Pending,
    Adopted,
}

impl PetStatus {
    /// The transition table. `adopted` is terminal.
    pub fn can_transition_to(self, next: PetStatus) -> bool {
        matches!(
            (self, next),
            // A first request arrived
            (PetStatus::Available, PetStatus::Pending)
                // A request was approved
                | (PetStatus::Pending, PetStatus::Adopted)
                // The last pending request was rejected
                | (PetStatus::Pending, PetStatus::Available)
        )
    }
}

impl std::fmt::Display for PetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PetStatus::Available => write!(f, "available"),
            PetStatus::Pending => write!(f, "pending"),
            PetStatus::Adopted => write!(f, "adopted"),
        }
    }
}

impl std::str::FromStr for PetStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "available" => Ok(PetStatus::Available),
            "pending" => Ok(PetStatus::Pending),
            "adopted" => Ok(PetStatus::Adopted),
            _ => Err(anyhow::anyhow!("Invalid pet status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pet_species", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rabbit,
    Other,
}

/// Pet model - SQL persistence layer
///
/// Soft-deleted rows (`deleted_at` set) are invisible to every query here;
/// a pet referenced by adoption requests is never hard-deleted.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub age_years: i32,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,

    pub status: PetStatus,
    pub owner_id: Option<UserId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for listing a new pet
#[derive(Debug, Clone, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub age_years: i32,
    pub gender: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}

/// Listing filters, deserialized straight from the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PetFilter {
    pub status: Option<PetStatus>,
    pub species: Option<Species>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

impl Pet {
    /// Insert a new pet, created `available`
    pub async fn insert(
        new: NewPet,
        owner_id: UserId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO pets (
                id, name, species, breed, age_years, gender, size, description, photo_url, owner_id
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(PetId::new())
        .bind(&new.name)
        .bind(new.species)
        .bind(&new.breed)
        .bind(new.age_years)
        .bind(&new.gender)
        .bind(&new.size)
        .bind(&new.description)
        .bind(&new.photo_url)
        .bind(owner_id)
        .fetch_one(executor)
        .await
    }

    /// Find pet by ID (excluding soft-deleted)
    pub async fn find_by_id(
        id: PetId,
        executor: impl PgExecutor<'_>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM pets WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List pets matching the filter, newest first
    pub async fn list(
        filter: &PetFilter,
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM pets
             WHERE deleted_at IS NULL
               AND ($1::pet_status IS NULL OR status = $1)
               AND ($2::pet_species IS NULL OR species = $2)
               AND ($3::int4 IS NULL OR age_years >= $3)
               AND ($4::int4 IS NULL OR age_years <= $4)
             ORDER BY created_at DESC",
        )
        .bind(filter.status)
        .bind(filter.species)
        .bind(filter.min_age)
        .bind(filter.max_age)
        .fetch_all(executor)
        .await
    }

    /// Acquire the pet row lock for the scope of the enclosing transaction.
    ///
    /// Every transition-engine operation on a pet starts here; the wait is
    /// bounded by the `lock_timeout` the engine sets on the transaction.
    pub async fn lock(
        id: PetId,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM pets WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Status write, validated against the transition table.
    ///
    /// Callers must hold the pet row lock; `self.status` is the locked read.
    pub async fn set_status(
        &self,
        next: PetStatus,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), AdoptionError> {
        if !self.status.can_transition_to(next) {
            return Err(AdoptionError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        sqlx::query("UPDATE pets SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(self.id)
            .bind(next)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Soft-delete while holding the row lock
    pub async fn mark_deleted(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE pets SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(self.id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use PetStatus::*;

        assert!(Available.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Adopted));
        assert!(Pending.can_transition_to(Available));

        // adopted is terminal
        assert!(!Adopted.can_transition_to(Available));
        assert!(!Adopted.can_transition_to(Pending));

        // no shortcut straight to adopted
        assert!(!Available.can_transition_to(Adopted));

        // self-transitions are not transitions
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Available.can_transition_to(Available));
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [PetStatus::Available, PetStatus::Pending, PetStatus::Adopted] {
            let parsed: PetStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("fostered".parse::<PetStatus>().is_err());
    }
}
