/// Authorization module for the adoption platform
///
/// Provides a fluent API for authorization checks in action code:
///
/// ```ignore
/// use crate::common::auth::{Actor, Capability};
///
/// // In an action, before any lock is taken:
/// actor.can(Capability::ResolveRequest { pet_owner: pet.owner_id }).check()?;
/// ```
///
/// The actor carries its role from the auth token; ownership-scoped
/// capabilities receive the owner reference loaded by the caller. Checks run
/// before the transition engine acquires the pet row lock, so a denied
/// request never contends storage.
mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityCheck};
pub use capability::{Capability, Role};
pub use errors::AuthError;
