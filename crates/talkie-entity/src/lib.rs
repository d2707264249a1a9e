//! # talkie-entity
//!
//! Domain entity models for Talkie.

pub mod user;

pub use user::{CreateUser, PublicUser, UpdateProfile, User};
