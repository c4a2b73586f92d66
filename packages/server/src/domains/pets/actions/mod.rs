mod mutations;
mod queries;

pub use mutations::{create_pet, remove_pet};
pub use queries::{get_pet, list_pets};
