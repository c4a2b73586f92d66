pub mod actions;
pub mod models;

pub use models::pet::{NewPet, Pet, PetFilter, PetStatus, Species};
