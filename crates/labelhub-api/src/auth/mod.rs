//! Principal extraction from HS256 bearer tokens

pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::JwtService;
pub use models::{CurrentPrincipal, JwtClaims, Principal};
