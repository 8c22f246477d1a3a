//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Billing policies.
    #[serde(default)]
    pub billing: BillingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration as read from config sources.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for verifying tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// What a re-save does to the status of an existing statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReopenPolicy {
    /// Every re-save resets the status to `unpaid`, even after payment.
    #[default]
    Always,
    /// The status is only reset when the persisted total changes.
    OnTotalChange,
}

/// How the caller-supplied total relates to the computed total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalPolicy {
    /// Persist the caller total without comparing.
    Trust,
    /// Persist the caller total and report a mismatch.
    #[default]
    Flag,
    /// Reject the save when the totals disagree.
    Reject,
}

/// What happens to malformed additional charge rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargePolicy {
    /// Drop the row, keep the rest, and report it.
    #[default]
    Skip,
    /// Fail the whole save.
    Reject,
}

/// Billing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Status handling on re-save.
    #[serde(default)]
    pub reopen_policy: ReopenPolicy,
    /// Caller total handling.
    #[serde(default)]
    pub total_policy: TotalPolicy,
    /// Malformed charge handling.
    #[serde(default)]
    pub charge_policy: ChargePolicy,
    /// Maximum statement id candidates tried before giving up.
    #[serde(default = "default_max_id_attempts")]
    pub max_id_attempts: u32,
    /// Prefix of generated statement ids.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
    /// Prorate base rent when the lease starts inside the billing month.
    #[serde(default = "default_prorate_first_month")]
    pub prorate_first_month: bool,
}

fn default_max_id_attempts() -> u32 {
    5
}

fn default_id_prefix() -> String {
    "BILL".to_string()
}

const fn default_prorate_first_month() -> bool {
    true
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            reopen_policy: ReopenPolicy::default(),
            total_policy: TotalPolicy::default(),
            charge_policy: ChargePolicy::default(),
            max_id_attempts: default_max_id_attempts(),
            id_prefix: default_id_prefix(),
            prorate_first_month: default_prorate_first_month(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("LEASEHOLD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
