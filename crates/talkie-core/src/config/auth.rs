//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Session token and credential-carrier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256). Loaded once at startup.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token validity window in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// Clock-skew leeway applied to expiry checks, in seconds.
    #[serde(default)]
    pub leeway_seconds: u64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Argon2id memory cost in KiB.
    #[serde(default = "default_password_memory")]
    pub password_memory_kib: u32,
    /// Argon2id iteration count.
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
    /// Argon2id lanes.
    #[serde(default = "default_password_parallelism")]
    pub password_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl(),
            leeway_seconds: 0,
            cookie_name: default_cookie_name(),
            password_memory_kib: default_password_memory(),
            password_iterations: default_password_iterations(),
            password_parallelism: default_password_parallelism(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl() -> u64 {
    24
}

fn default_cookie_name() -> String {
    "token".to_string()
}

fn default_password_memory() -> u32 {
    19 * 1024
}

fn default_password_iterations() -> u32 {
    2
}

fn default_password_parallelism() -> u32 {
    1
}
