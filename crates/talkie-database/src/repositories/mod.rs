//! Concrete PostgreSQL repositories.

pub mod user;
