// Token verification. Token *issuance* flows (registration, login) live in a
// separate identity service; tests mint tokens directly through JwtService.

pub mod jwt;

pub use jwt::{Claims, JwtService};
