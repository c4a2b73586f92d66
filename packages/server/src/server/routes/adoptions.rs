use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::auth::Actor;
use crate::common::RequestId;
use crate::domains::adoptions::actions::{
    approve_request, bulk_update, create_request, list_all_requests, list_own_requests,
    list_shelter_requests, reject_request, BulkUpdateOutcome, CreateAdoptionRequest,
};
use crate::domains::adoptions::{AdoptionError, AdoptionRequest, RequestStatus};
use crate::server::app::AppState;

use super::require_actor;

#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Deserialize)]
pub struct RejectBody {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateBody {
    pub request_ids: Vec<RequestId>,
    pub status: RequestStatus,
}

/// POST /api/adoptions - file an adoption request
pub async fn create_request_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Json(input): Json<CreateAdoptionRequest>,
) -> Result<(StatusCode, Json<AdoptionRequest>), AdoptionError> {
    let actor = require_actor(actor)?;
    let request = create_request(&actor, input, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/adoptions - the caller's own requests
pub async fn list_own_requests_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<AdoptionRequest>>, AdoptionError> {
    let actor = require_actor(actor)?;
    let requests = list_own_requests(&actor, query.status, &state.deps).await?;
    Ok(Json(requests))
}

/// GET /api/adoptions/shelter - requests on pets the caller owns
pub async fn list_shelter_requests_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<AdoptionRequest>>, AdoptionError> {
    let actor = require_actor(actor)?;
    let requests = list_shelter_requests(&actor, query.status, &state.deps).await?;
    Ok(Json(requests))
}

/// GET /api/adoptions/all - every request (admin)
pub async fn list_all_requests_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<AdoptionRequest>>, AdoptionError> {
    let actor = require_actor(actor)?;
    let requests = list_all_requests(&actor, query.status, &state.deps).await?;
    Ok(Json(requests))
}

/// POST /api/adoptions/:id/approve (pet owner/admin)
pub async fn approve_request_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(request_id): Path<RequestId>,
) -> Result<Json<AdoptionRequest>, AdoptionError> {
    let actor = require_actor(actor)?;
    let request = approve_request(&actor, request_id, None, &state.deps).await?;
    Ok(Json(request))
}

/// POST /api/adoptions/:id/reject (pet owner/admin/requester)
pub async fn reject_request_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(request_id): Path<RequestId>,
    body: Option<Json<RejectBody>>,
) -> Result<Json<AdoptionRequest>, AdoptionError> {
    let actor = require_actor(actor)?;
    let notes = body.and_then(|Json(body)| body.notes);
    let request = reject_request(&actor, request_id, notes, &state.deps).await?;
    Ok(Json(request))
}

/// POST /api/adoptions/bulk (admin)
pub async fn bulk_update_handler(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Json(body): Json<BulkUpdateBody>,
) -> Result<Json<BulkUpdateOutcome>, AdoptionError> {
    let actor = require_actor(actor)?;
    let outcome = bulk_update(&actor, body.request_ids, body.status, &state.deps).await?;
    Ok(Json(outcome))
}
