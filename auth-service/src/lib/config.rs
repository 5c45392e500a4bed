use std::env;

use auth::AuthSettings;
use auth::ConfigurationError;
use auth::HashingSettings;
use auth::TokenSettings;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_minutes: i64,
    #[serde(default)]
    pub leeway_seconds: i64,
}

/// Argon2id work factor for new password hashes.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    /// Cost of bcrypt hashes still in the `users` table; unset once all are Argon2id.
    #[serde(default)]
    pub legacy_bcrypt_cost: Option<u32>,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let defaults = HashingSettings::default();
        Self {
            memory_kib: defaults.memory_kib,
            iterations: defaults.iterations,
            parallelism: defaults.parallelism,
            legacy_bcrypt_cost: defaults.legacy_bcrypt_cost,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_minutes", &self.expiration_minutes)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::load_layered(&run_mode, Environment::default())
    }

    fn load_layered(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(environment.separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Convert the `jwt` and `password` sections into authenticator settings.
    ///
    /// Range checks on the secret and hash parameters happen when the
    /// authenticator is built.
    ///
    /// # Errors
    /// * `InvalidTokenLifetime` - Expiration or leeway does not fit a duration
    pub fn auth_settings(&self) -> Result<AuthSettings, ConfigurationError> {
        let ttl = Duration::try_minutes(self.jwt.expiration_minutes).ok_or_else(|| {
            ConfigurationError::InvalidTokenLifetime(format!(
                "expiration_minutes out of range: {}",
                self.jwt.expiration_minutes
            ))
        })?;
        let leeway = Duration::try_seconds(self.jwt.leeway_seconds).ok_or_else(|| {
            ConfigurationError::InvalidTokenLifetime(format!(
                "leeway_seconds out of range: {}",
                self.jwt.leeway_seconds
            ))
        })?;

        Ok(AuthSettings {
            token: TokenSettings::new(self.jwt.secret.as_bytes().to_vec(), ttl).with_leeway(leeway),
            hashing: HashingSettings {
                memory_kib: self.password.memory_kib,
                iterations: self.password.iterations,
                parallelism: self.password.parallelism,
                legacy_bcrypt_cost: self.password.legacy_bcrypt_cost,
            },
        })
    }
}
