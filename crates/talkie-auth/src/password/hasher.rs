//! Argon2id password hashing with a configurable cost.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use talkie_core::config::AuthConfig;
use talkie_core::error::AppError;

/// Plaintext behind the hash used for unknown accounts.
const DUMMY_PASSWORD: &str = "talkie-unknown-account";

/// Hashes and verifies passwords with Argon2id.
///
/// Every hash records its own cost, so changing the configured cost only
/// affects hashes created afterwards.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    /// Hash checked when the account does not exist, built on first use.
    dummy_hash: OnceLock<String>,
}

impl PasswordHasher {
    /// Builds a hasher from memory (KiB), iteration and lane settings.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|e| {
            AppError::configuration(format!("Invalid Argon2 parameters: {e}"))
        })?;
        Ok(Self {
            params,
            dummy_hash: OnceLock::new(),
        })
    }

    /// Builds a hasher from the `auth.password_*` settings.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        Self::new(
            config.password_memory_kib,
            config.password_iterations,
            config.password_parallelism,
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes a plaintext password with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Checks a plaintext password against a stored PHC hash string.
    ///
    /// A mismatch is `Ok(false)`; only a corrupt hash is an error.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Stored password hash is malformed: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// Spends the same work as a real verification for an account that
    /// does not exist, so response time does not reveal registered emails.
    pub fn verify_unknown_account(&self, password: &str) {
        let hash = match self.dummy_hash.get() {
            Some(hash) => hash,
            None => match self.hash_password(DUMMY_PASSWORD) {
                Ok(hash) => self.dummy_hash.get_or_init(|| hash),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to build dummy password hash");
                    return;
                }
            },
        };
        let _ = self.verify_password(password, hash);
    }
}
