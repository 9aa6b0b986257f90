use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use tracing::info;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_MEMBERSHIP_DELAY_MS: u64 = 400;
const DEFAULT_JWT_EXPIRATION_SECS: u64 = 24 * 3600;
const DEV_DEFAULT_JWT_SECRET: &str =
    "this_is_a_development_secret_key_that_is_long_enough_for_hs256";

/// How the two discount sources combine when a quote carries both a coupon
/// and a membership discount. The original front end never pinned this
/// down, so it is configuration rather than code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscountStacking {
    /// Both discounts, each computed on the resolved price.
    Additive,
    /// Coupon first, membership percentage on the remainder.
    Sequential,
    /// Mutually exclusive: the larger discount wins.
    #[default]
    BestOnly,
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Configuration loading error: {0}")]
    LoadError(#[from] ConfigError),
    #[error("Configuration validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// JWT signing secret (minimum 32 characters)
    #[validate(length(min = 32))]
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Session token lifetime in seconds
    #[serde(default = "default_jwt_expiration_secs")]
    pub jwt_expiration_secs: u64,

    /// Artificial latency of the mock membership lookup
    #[serde(default = "default_membership_delay_ms")]
    pub membership_lookup_delay_ms: u64,

    /// Razorpay key id (public half, echoed to the client)
    #[serde(default)]
    pub razorpay_key_id: String,

    /// Razorpay key secret, used for callback signature verification
    #[serde(default = "default_razorpay_key_secret")]
    pub razorpay_key_secret: String,

    /// Stripe secret key (unused by the mock flow, carried for parity)
    #[serde(default)]
    pub stripe_secret_key: String,

    /// Coupon/membership discount stacking policy
    #[serde(default)]
    pub discount_stacking: DiscountStacking,

    /// CORS: comma-separated list of allowed origins
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_jwt_secret() -> String {
    DEV_DEFAULT_JWT_SECRET.to_string()
}
fn default_jwt_expiration_secs() -> u64 {
    DEFAULT_JWT_EXPIRATION_SECS
}
fn default_membership_delay_ms() -> u64 {
    DEFAULT_MEMBERSHIP_DELAY_MS
}
fn default_razorpay_key_secret() -> String {
    // Dev-only placeholder; production sets APP__RAZORPAY_KEY_SECRET.
    "rzp_test_secret".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            jwt_secret: default_jwt_secret(),
            jwt_expiration_secs: default_jwt_expiration_secs(),
            membership_lookup_delay_ms: default_membership_delay_ms(),
            razorpay_key_id: String::new(),
            razorpay_key_secret: default_razorpay_key_secret(),
            stripe_secret_key: String::new(),
            discount_stacking: DiscountStacking::default(),
            cors_allowed_origins: None,
        }
    }
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

/// Load configuration from `config/default.toml`, an optional
/// environment-specific file, and `APP__`-prefixed environment variables
/// (later sources win).
pub fn load_config() -> Result<AppConfig, ConfigurationError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let config = Config::builder()
        .add_source(File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
        .add_source(File::with_name(&format!("{CONFIG_DIR}/{run_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;
    info!(
        environment = %app_config.environment,
        stacking = ?app_config.discount_stacking,
        "configuration loaded"
    );
    Ok(app_config)
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the
/// configured level.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("confreg_api={level},tower_http=debug");
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::try_new(filter_directive)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.is_development());
        assert_eq!(config.discount_stacking, DiscountStacking::BestOnly);
    }

    #[test]
    fn short_jwt_secret_fails_validation() {
        let config = AppConfig {
            jwt_secret: "short".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn stacking_policy_deserializes_from_kebab_case() {
        let parsed: DiscountStacking = serde_json::from_str("\"best-only\"").unwrap();
        assert_eq!(parsed, DiscountStacking::BestOnly);
        let parsed: DiscountStacking = serde_json::from_str("\"sequential\"").unwrap();
        assert_eq!(parsed, DiscountStacking::Sequential);
    }
}
