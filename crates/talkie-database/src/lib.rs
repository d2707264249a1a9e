//! # talkie-database
//!
//! User storage for Talkie. The rest of the system only sees the
//! [`UserStore`] trait; this crate provides a PostgreSQL repository and an
//! in-memory store used for development and tests.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryUserStore;
pub use repositories::user::PgUserRepository;
pub use store::UserStore;
