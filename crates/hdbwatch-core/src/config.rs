use crate::app_config::AppConfig;
use crate::ConfigError;

/// Database name used when `HDBWATCH_DB_NAME` is not set.
pub const DEFAULT_DB_NAME: &str = "hdb_analytics";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Loads `.env` from the working directory, then the file named by
/// `HDBWATCH_ENV_FILE` if that variable is set, before reading env vars.
/// Values already present in the process environment win.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    if let Ok(path) = std::env::var("HDBWATCH_ENV_FILE") {
        dotenvy::from_path(path).ok();
    }
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let db_name = or_default("HDBWATCH_DB_NAME", DEFAULT_DB_NAME);
    let log_level = or_default("HDBWATCH_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("HDBWATCH_DB_MAX_CONNECTIONS", "5")?;
    if db_max_connections == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HDBWATCH_DB_MAX_CONNECTIONS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let db_acquire_timeout_secs = parse_u64("HDBWATCH_DB_ACQUIRE_TIMEOUT_SECS", "5")?;

    let request_timeout_secs = parse_u64("HDBWATCH_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("HDBWATCH_USER_AGENT", DEFAULT_USER_AGENT);
    let pacing_ms = parse_u64("HDBWATCH_PACING_MS", "2000")?;
    let rate_limit_pause_secs = parse_u64("HDBWATCH_RATE_LIMIT_PAUSE_SECS", "60")?;

    let reddit_client_id = optional("REDDIT_CLIENT_ID");
    let reddit_client_secret = optional("REDDIT_CLIENT_SECRET");
    let reddit_user_agent = or_default("REDDIT_USER_AGENT", "hdbwatch review scraper/0.1");

    let anthropic_api_key = optional("ANTHROPIC_API_KEY");
    let analyzer_model = or_default("HDBWATCH_ANALYZER_MODEL", "claude-3-5-sonnet-20241022");
    let export_path = PathBuf::from(or_default(
        "HDBWATCH_EXPORT_PATH",
        "lemon8_reviews_export.xlsx",
    ));

    Ok(AppConfig {
        database_url,
        db_name,
        log_level,
        db_max_connections,
        db_acquire_timeout_secs,
        request_timeout_secs,
        user_agent,
        pacing_ms,
        rate_limit_pause_secs,
        reddit_client_id,
        reddit_client_secret,
        reddit_user_agent,
        anthropic_api_key,
        analyzer_model,
        export_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
