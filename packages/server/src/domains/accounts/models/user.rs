use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::auth::Role;
use crate::common::UserId;

/// Account model - SQL persistence layer
///
/// Profile fields live on the account row and are written by the same INSERT
/// that creates the account, so an account never exists without its profile.
/// The role column is resolved into the auth token at login.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,

    // Profile
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub shelter_name: Option<String>,

    // Push notifications
    pub expo_push_token: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new account, profile included
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub shelter_name: Option<String>,
    pub expo_push_token: Option<String>,
}

impl User {
    /// Insert a new account together with its profile in one step
    pub async fn create(new: NewUser, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (
                id,
                email,
                display_name,
                role,
                phone_number,
                city,
                bio,
                shelter_name,
                expo_push_token
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(UserId::new())
        .bind(&new.email)
        .bind(&new.display_name)
        .bind(new.role)
        .bind(&new.phone_number)
        .bind(&new.city)
        .bind(&new.bio)
        .bind(&new.shelter_name)
        .bind(&new.expo_push_token)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Find account by ID
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find account by email
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Update the push token an account receives notifications on
    pub async fn update_push_token(
        id: UserId,
        push_token: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE users SET expo_push_token = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(push_token)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
