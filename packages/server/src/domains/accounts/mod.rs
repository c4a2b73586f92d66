pub mod models;

pub use models::user::{NewUser, User};
