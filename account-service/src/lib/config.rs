use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Signing secrets shorter than this are accepted with a warning.
pub const RECOMMENDED_SECRET_BYTES: usize = 32;

/// Longest accepted token lifetime: one year.
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: DatabaseBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

/// Argon2 cost parameters. Unset fields fall back to the argon2 crate defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PasswordConfig {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// `*` or a comma-separated list of origins
    #[serde(default = "default_wildcard")]
    pub allowed_origins: String,
    #[serde(default = "default_cors_methods")]
    pub allowed_methods: String,
    #[serde(default = "default_cors_headers")]
    pub allowed_headers: String,
    #[serde(default = "default_cors_max_age")]
    pub max_age_secs: u64,
}

#[derive(Deserialize, Clone)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationsConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_max_connections() -> u32 {
    5
}

fn default_expiration_hours() -> i64 {
    auth::TokenIssuer::DEFAULT_TTL_HOURS
}

fn default_wildcard() -> String {
    "*".to_string()
}

fn default_cors_methods() -> String {
    "GET,POST,PUT,PATCH,DELETE,OPTIONS".to_string()
}

fn default_cors_headers() -> String {
    "Content-Type,Authorization".to_string()
}

fn default_cors_max_age() -> u64 {
    86400
}

fn default_smtp_port() -> u16 {
    587
}

fn default_queue_capacity() -> usize {
    crate::outbound::notifications::queue::DEFAULT_QUEUE_CAPACITY
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_wildcard(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_cors_headers(),
            max_age_secs: default_cors_max_age(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

// Secrets stay out of Debug output so the loaded config can be logged.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

impl JwtConfig {
    /// Token lifetime, bounded to 1..=`MAX_EXPIRATION_HOURS` hours.
    pub fn ttl(&self) -> Result<chrono::Duration, ConfigError> {
        if !(1..=MAX_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}, got {}",
                MAX_EXPIRATION_HOURS, self.expiration_hours
            )));
        }
        Ok(chrono::Duration::hours(self.expiration_hours))
    }
}

impl PasswordConfig {
    /// Hasher for the configured cost; unset parameters use the library defaults.
    pub fn hasher(&self) -> Result<auth::PasswordHasher, auth::PasswordError> {
        if self.memory_kib.is_none() && self.iterations.is_none() && self.parallelism.is_none() {
            return Ok(auth::PasswordHasher::new());
        }

        auth::PasswordHasher::with_cost(
            self.memory_kib
                .unwrap_or(auth::PasswordHasher::DEFAULT_MEMORY_KIB),
            self.iterations
                .unwrap_or(auth::PasswordHasher::DEFAULT_ITERATIONS),
            self.parallelism
                .unwrap_or(auth::PasswordHasher::DEFAULT_PARALLELISM),
        )
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot start with.
    ///
    /// # Errors
    /// * Empty JWT secret or token lifetime outside 1..=`MAX_EXPIRATION_HOURS`
    /// * Postgres backend without a connection URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        self.jwt.ttl()?;
        if self.database.backend == DatabaseBackend::Postgres && self.database.url.is_empty() {
            return Err(ConfigError::Message(
                "database.url is required for the postgres backend".into(),
            ));
        }
        Ok(())
    }

    /// Whether the signing secret is shorter than recommended.
    pub fn has_weak_secret(&self) -> bool {
        self.jwt.secret.len() < RECOMMENDED_SECRET_BYTES
    }
}
