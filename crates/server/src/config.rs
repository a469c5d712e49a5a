//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (production only)
//! - `JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `BEVERLY_HOST` - Bind address (default: 127.0.0.1)
//! - `BEVERLY_PORT` / `PORT` - Listen port (default: 3000)
//! - `BEVERLY_ENV` / `NODE_ENV` - `development`, `production` or `test` (default: development)
//!
//! Internal error details are only returned to clients when the environment
//! is explicitly set to `development`; the unset default keeps them hidden.
//! - `BEVERLY_CORS_ORIGINS` - Comma-separated CORS allow-list
//! - `BEVERLY_SEED_USERS` - Seed the demo admin and demo user (default: true)
//! - `BEVERLY_CHAT_DELAY_MS` - Minimum simulated chat latency (default: 300)
//! - `BEVERLY_CHAT_JITTER_MS` - Random extra chat latency (default: 400)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! Outside production a missing `JWT_SECRET` is replaced by a random
//! per-process secret, so tokens do not survive a restart.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use rand::Rng;
use rand::distr::Alphanumeric;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const EPHEMERAL_SECRET_LENGTH: usize = 64;

/// Origins allowed when `BEVERLY_CORS_ORIGINS` is not set.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5500",
    "http://127.0.0.1:5500",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret-key",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    /// Name used in logs and Sentry.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Simulated latency for chatbot replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatDelay {
    /// Minimum delay before replying.
    pub min: Duration,
    /// Upper bound of the random extra delay.
    pub jitter: Duration,
}

impl ChatDelay {
    /// No delay at all (used by tests).
    pub const NONE: Self = Self {
        min: Duration::ZERO,
        jitter: Duration::ZERO,
    };

    /// Pick a concrete delay in `[min, min + jitter]`.
    #[must_use]
    pub fn sample(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.min;
        }
        #[allow(clippy::cast_possible_truncation)] // jitter is configured in milliseconds
        let jitter_ms = self.jitter.as_millis() as u64;
        self.min + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
    }
}

impl Default for ChatDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(300),
            jitter: Duration::from_millis(400),
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Whether 500 responses carry the real cause (explicit development only)
    pub expose_error_details: bool,
    /// Token signing secret
    pub jwt_secret: SecretString,
    /// Whether `jwt_secret` was generated for this process only
    pub ephemeral_secret: bool,
    /// Origins allowed to make credentialed CORS requests
    pub cors_origins: Vec<String>,
    /// Whether to seed the demo accounts at startup
    pub seed_users: bool,
    /// Simulated chatbot latency
    pub chat_delay: ChatDelay,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if variables are invalid, if `JWT_SECRET` is
    /// missing in production, or if a supplied secret fails validation
    /// (length, placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("BEVERLY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BEVERLY_HOST".to_string(), e.to_string()))?;
        let port = get_port()?;
        let explicit_environment = get_environment()?;
        let environment = explicit_environment.unwrap_or_default();
        let expose_error_details = error_details_exposed(explicit_environment);
        let (jwt_secret, ephemeral_secret) = get_jwt_secret(environment)?;
        let cors_origins = get_optional_env("BEVERLY_CORS_ORIGINS").map_or_else(
            || DEFAULT_CORS_ORIGINS.iter().map(|s| (*s).to_string()).collect(),
            |raw| parse_list(&raw),
        );
        let seed_users = get_bool("BEVERLY_SEED_USERS", true)?;
        let chat_delay = ChatDelay {
            min: Duration::from_millis(get_u64("BEVERLY_CHAT_DELAY_MS", 300)?),
            jitter: Duration::from_millis(get_u64("BEVERLY_CHAT_JITTER_MS", 400)?),
        };
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            environment,
            expose_error_details,
            jwt_secret,
            ephemeral_secret,
            cors_origins,
            seed_users,
            chat_delay,
            sentry_dsn,
        })
    }

    /// Configuration for in-process use (tests, local tooling).
    ///
    /// Binds to an ephemeral localhost port, skips seeding and chat latency,
    /// and signs tokens with a fresh random secret.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            environment: Environment::Test,
            expose_error_details: false,
            jwt_secret: generate_secret(),
            ephemeral_secret: true,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| (*s).to_string()).collect(),
            seed_users: false,
            chat_delay: ChatDelay::NONE,
            sentry_dsn: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get the listen port with fallback to the generic `PORT` (set by most PaaS hosts).
fn get_port() -> Result<u16, ConfigError> {
    let (key, value) = match std::env::var("BEVERLY_PORT") {
        Ok(value) => ("BEVERLY_PORT", value),
        Err(_) => ("PORT", get_env_or_default("PORT", "3000")),
    };
    value
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get the environment with fallback to `NODE_ENV` for existing deployments.
///
/// `None` when neither variable is set.
fn get_environment() -> Result<Option<Environment>, ConfigError> {
    parse_environment(get_optional_env("BEVERLY_ENV"), get_optional_env("NODE_ENV"))
}

fn parse_environment(
    beverly_env: Option<String>,
    node_env: Option<String>,
) -> Result<Option<Environment>, ConfigError> {
    let (key, value) = match (beverly_env, node_env) {
        (Some(value), _) => ("BEVERLY_ENV", value),
        (None, Some(value)) => ("NODE_ENV", value),
        (None, None) => return Ok(None),
    };
    value
        .parse()
        .map(Some)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
}

/// True only for an explicitly configured `development`.
fn error_details_exposed(explicit_environment: Option<Environment>) -> bool {
    explicit_environment == Some(Environment::Development)
}

fn get_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn get_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnvVar(key.to_string(), e.to_string())
            })
    })
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Load the signing secret, generating a throwaway one outside production.
///
/// The flag is `true` when the secret was generated.
fn get_jwt_secret(environment: Environment) -> Result<(SecretString, bool), ConfigError> {
    match get_required_env("JWT_SECRET") {
        Ok(value) => {
            let secret = SecretString::from(value);
            validate_jwt_secret(&secret, "JWT_SECRET")?;
            Ok((secret, false))
        }
        Err(err) if environment == Environment::Production => Err(err),
        Err(_) => Ok((generate_secret(), true)),
    }
}

/// Generate a random alphanumeric signing secret.
fn generate_secret() -> SecretString {
    let secret: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(EPHEMERAL_SECRET_LENGTH)
        .map(char::from)
        .collect();
    SecretString::from(secret)
}

/// Validate that a signing secret is long, not a placeholder and has sufficient entropy.
fn validate_jwt_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    validate_secret_strength(value, var_name)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
