// The adoption workflow: the request ledger and the transition engine that
// mutates pets and requests atomically under the per-pet row lock.

pub mod actions;
pub mod errors;
pub mod models;
pub(crate) mod notify;

pub use errors::AdoptionError;
pub use models::adoption_request::{AdoptionRequest, RequestStatus};
