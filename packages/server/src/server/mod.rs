pub mod app;
pub mod middleware;
pub mod routes;

pub use app::{build_app, router_with_deps, AppState};
