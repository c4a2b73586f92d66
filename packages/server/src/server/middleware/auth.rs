use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::common::auth::Actor;
use crate::common::UserId;
use crate::domains::auth::JwtService;
use crate::server::app::AppState;

/// Bearer-token authentication middleware
///
/// Extracts the token from the Authorization header, verifies it, and adds
/// the Actor to request extensions. With no token or an invalid token the
/// request continues anonymously; handlers that need an actor reject it
/// themselves.
pub async fn auth_middleware(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(actor) = extract_actor(&request, &state.deps.jwt_service) {
        debug!(user_id = %actor.user_id, role = ?actor.role, "authenticated actor");
        request.extensions_mut().insert(actor);
    } else {
        debug!("no valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify the bearer token from a request
fn extract_actor(request: &Request, jwt_service: &JwtService) -> Option<Actor> {
    // Get Authorization header
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    // Verify token
    let claims = jwt_service.verify_token(token).ok()?;

    Some(Actor::new(UserId::from_uuid(claims.user_id), claims.role))
}
