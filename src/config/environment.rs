use std::env;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_APP_NAME: &str = "Postbox";
pub const DEFAULT_LICENSE_SERVER_URL: &str = "https://license.postbox.app/api/v1";

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    /// Display name used as the TOTP issuer
    pub app_name: String,
    /// Empty when the instance runs on the free tier
    pub license_key: String,
    pub license_server_url: String,
    pub license_server_timeout_secs: u64,
    pub license_grace_days: i64,
    pub license_warning_days: i64,
    pub license_check_interval_secs: u64,
    pub two_factor_rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            app_name: env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string()),
            license_key: env::var("LICENSE_KEY").unwrap_or_default().trim().to_string(),
            license_server_url: env::var("LICENSE_SERVER_URL")
                .unwrap_or_else(|_| DEFAULT_LICENSE_SERVER_URL.to_string()),
            license_server_timeout_secs: parse_var("LICENSE_SERVER_TIMEOUT_SECS", 10)?,
            license_grace_days: parse_var("LICENSE_GRACE_DAYS", 7)?,
            license_warning_days: parse_var("LICENSE_WARNING_DAYS", 30)?,
            license_check_interval_secs: parse_var("LICENSE_CHECK_INTERVAL_SECS", 86_400)?,
            two_factor_rate_limit_burst: parse_var("TWO_FACTOR_RATE_LIMIT_BURST", 20)?,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("{} has an invalid value: {:?}", name, raw))
}
