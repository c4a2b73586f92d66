//! Post-commit notification fan-out.
//!
//! Called only after the transaction has committed. Delivery is
//! at-least-once, fire-and-forget: failures are logged and never propagate,
//! so a dead push service cannot roll back an adoption.

use std::collections::HashMap;

use serde_json::json;
use tracing::{debug, error};

use crate::common::UserId;
use crate::domains::adoptions::models::adoption_request::AdoptionRequest;
use crate::domains::pets::Pet;
use crate::kernel::ServerDeps;

/// Notify the winner and every rejected requester of a resolution.
pub(crate) async fn request_resolutions(
    approved: Option<&AdoptionRequest>,
    rejected: &[AdoptionRequest],
    pet: &Pet,
    deps: &ServerDeps,
) {
    let mut user_ids: Vec<UserId> = rejected.iter().map(|r| r.user_id).collect();
    if let Some(request) = approved {
        user_ids.push(request.user_id);
    }
    if user_ids.is_empty() {
        return;
    }

    let tokens = match push_tokens(&user_ids, deps).await {
        Ok(tokens) => tokens,
        Err(err) => {
            error!(error = %err, "failed to load push tokens, skipping notifications");
            return;
        }
    };

    if let Some(request) = approved {
        send(
            &tokens,
            request,
            "Adoption request approved",
            &format!(
                "Great news! Your adoption request for {} was approved.",
                pet.name
            ),
            "approved",
            deps,
        )
        .await;
    }

    for request in rejected {
        send(
            &tokens,
            request,
            "Adoption request update",
            &format!("Your adoption request for {} was declined.", pet.name),
            "rejected",
            deps,
        )
        .await;
    }
}

async fn push_tokens(
    user_ids: &[UserId],
    deps: &ServerDeps,
) -> Result<HashMap<UserId, String>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (UserId, Option<String>)>(
        "SELECT id, expo_push_token FROM users WHERE id = ANY($1)",
    )
    .bind(user_ids)
    .fetch_all(&deps.db_pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, token)| token.map(|t| (id, t)))
        .collect())
}

async fn send(
    tokens: &HashMap<UserId, String>,
    request: &AdoptionRequest,
    title: &str,
    body: &str,
    status: &str,
    deps: &ServerDeps,
) {
    let Some(token) = tokens.get(&request.user_id) else {
        debug!(user_id = %request.user_id, "no push token, skipping notification");
        return;
    };

    let data = json!({
        "request_id": request.id,
        "pet_id": request.pet_id,
        "status": status,
    });

    if let Err(err) = deps
        .push_service
        .send_notification(token, title, body, data)
        .await
    {
        error!(
            user_id = %request.user_id,
            error = %err,
            "push notification failed"
        );
    }
}
