use chrono::Duration;
use thiserror::Error;

/// Minimum HS256 secret length in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Startup configuration errors.
///
/// These are fatal: a process that cannot build its authenticator must not
/// serve requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Invalid signing key: {0}")]
    InvalidSigningKey(String),

    #[error("Invalid token lifetime: {0}")]
    InvalidTokenLifetime(String),

    #[error("Invalid password hashing parameters: {0}")]
    InvalidHashParameters(String),
}

/// Signing material and lifetime for issued tokens.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: Vec<u8>,
    pub ttl: Duration,
    pub leeway: Duration,
}

impl TokenSettings {
    /// Token settings with no expiry leeway.
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
            leeway: Duration::zero(),
        }
    }

    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Check key strength and lifetime bounds.
    ///
    /// # Errors
    /// * `InvalidSigningKey` - Secret shorter than 32 bytes
    /// * `InvalidTokenLifetime` - TTL not positive or negative leeway
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigurationError::InvalidSigningKey(format!(
                "secret must be at least {} bytes, got {}",
                MIN_SECRET_LENGTH,
                self.secret.len()
            )));
        }

        if self.ttl <= Duration::zero() {
            return Err(ConfigurationError::InvalidTokenLifetime(format!(
                "ttl must be positive, got {}s",
                self.ttl.num_seconds()
            )));
        }

        if self.leeway < Duration::zero() {
            return Err(ConfigurationError::InvalidTokenLifetime(format!(
                "leeway must not be negative, got {}s",
                self.leeway.num_seconds()
            )));
        }

        Ok(())
    }
}

// Keeps the secret out of logs.
impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("leeway", &self.leeway)
            .finish()
    }
}

/// Argon2id work factor for newly hashed passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingSettings {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
    /// Cost of the bcrypt hashes still held by the credential store.
    ///
    /// When set, the dummy hash used for unknown usernames is a bcrypt hash
    /// at this cost, so that path costs as much as checking a legacy hash.
    pub legacy_bcrypt_cost: Option<u32>,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
            legacy_bcrypt_cost: None,
        }
    }
}

/// Complete settings for an [`Authenticator`](crate::Authenticator).
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub token: TokenSettings,
    pub hashing: HashingSettings,
}
