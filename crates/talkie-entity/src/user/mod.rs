//! User entity.

pub mod model;

pub use model::{CreateUser, PublicUser, UpdateProfile, User};
