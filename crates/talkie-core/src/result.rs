//! Convenience result type alias for Talkie.

use crate::error::AppError;

/// A specialized `Result` type for Talkie operations.
pub type AppResult<T> = Result<T, AppError>;
