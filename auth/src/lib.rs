//! Credential verification and token lifecycle.
//!
//! Provides the authentication core shared by the services:
//! - Password hashing and verification (Argon2id, legacy bcrypt)
//! - Signed token issuance and validation (HS256 JWT)
//! - Authentication coordination
//!
//! Everything here is synchronous and free of I/O. Looking identities up is
//! the caller's job.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashingSettings, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(&HashingSettings::default()).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use std::sync::Arc;
//!
//! use auth::{AuthSettings, Authenticator, HashingSettings, Role, SystemClock, TokenSettings};
//! use chrono::Duration;
//!
//! let settings = AuthSettings {
//!     token: TokenSettings::new(b"secret_key_at_least_32_bytes_long!".to_vec(), Duration::minutes(60)),
//!     hashing: HashingSettings::default(),
//! };
//! let auth = Authenticator::new(&settings, Arc::new(SystemClock)).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let issued = auth.authenticate("password123", &hash, 1, "alice", Role::Officer).unwrap();
//!
//! // Validate token
//! let claims = auth.extract_claims(&issued.token).unwrap();
//! assert_eq!(claims.role(), Role::Officer);
//! ```

pub mod authenticator;
pub mod clock;
pub mod jwt;
pub mod password;
pub mod role;
pub mod settings;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use clock::Clock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use role::Role;
pub use role::UnknownRole;
pub use settings::AuthSettings;
pub use settings::ConfigurationError;
pub use settings::HashingSettings;
pub use settings::TokenSettings;
