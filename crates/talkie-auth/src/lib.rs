//! # talkie-auth
//!
//! Authentication for Talkie.
//!
//! ## Modules
//!
//! - `jwt`: session token issuance and verification
//! - `password`: Argon2id password hashing
//! - `session`: the session guard resolving tokens to users

pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder, TokenVerifier};
pub use password::PasswordHasher;
pub use session::{AuthenticatedIdentity, SessionGuard};
