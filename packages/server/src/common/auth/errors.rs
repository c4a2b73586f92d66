use thiserror::Error;

/// Authorization errors for the adoption platform
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("authentication required")]
    AuthenticationRequired,

    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),

    #[error("admin access required")]
    AdminRequired,

    #[error("invalid or expired token")]
    InvalidToken,
}
