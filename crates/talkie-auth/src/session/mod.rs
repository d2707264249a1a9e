//! Request-level session gate.

pub mod guard;

pub use guard::{AuthenticatedIdentity, SessionGuard};
