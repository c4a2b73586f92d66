// HTTP routes
pub mod adoptions;
pub mod health;
pub mod pets;

pub use adoptions::*;
pub use health::*;
pub use pets::*;

use axum::extract::Extension;

use crate::common::auth::{Actor, AuthError};
use crate::domains::adoptions::AdoptionError;

/// Turn the optional actor extension into a required one.
pub(crate) fn require_actor(actor: Option<Extension<Actor>>) -> Result<Actor, AdoptionError> {
    actor
        .map(|Extension(actor)| actor)
        .ok_or(AdoptionError::Permission(AuthError::AuthenticationRequired))
}
