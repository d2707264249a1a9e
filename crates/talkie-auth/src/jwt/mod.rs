//! Session token encoding and verification.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::{JwtDecoder, TokenVerifier};
pub use encoder::{IssuedToken, JwtEncoder};
