// Pawhaven - Pet Adoption API Core
//
// This crate provides the backend API for a pet adoption platform. The heart
// of it is the adoption workflow in domains/adoptions: concurrent adoption
// requests against the same pet are serialized on a per-pet row lock so that
// exactly one request is ever approved, with the rival requests rejected in
// the same commit.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
