use crate::app_config::{AppConfig, Environment, LocationPrecision, SearchMode};
use crate::ConfigError;

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";
pub const DEFAULT_USER_AGENT: &str = "medfind/0.1 (facility-discovery)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let places_api_key = require("MEDFIND_PLACES_API_KEY")?;

    let env = parse_environment(&or_default("MEDFIND_ENV", "development"))?;
    let log_level = or_default("MEDFIND_LOG_LEVEL", "info");
    let places_base_url = or_default("MEDFIND_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);

    let request_timeout_secs = parse_u64("MEDFIND_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("MEDFIND_USER_AGENT", DEFAULT_USER_AGENT);

    let search_radius_meters = parse_u32("MEDFIND_SEARCH_RADIUS_METERS", "10000")?;
    let sweep_radius_meters = parse_u32("MEDFIND_SWEEP_RADIUS_METERS", "50000")?;
    for (var, value) in [
        ("MEDFIND_SEARCH_RADIUS_METERS", search_radius_meters),
        ("MEDFIND_SWEEP_RADIUS_METERS", sweep_radius_meters),
    ] {
        if value == 0 {
            return Err(invalid(var, "radius must be greater than zero".to_string()));
        }
    }

    let search_mode = parse_search_mode(&or_default("MEDFIND_SEARCH_MODE", "split"))?;
    let location_precision =
        parse_location_precision(&or_default("MEDFIND_LOCATION_PRECISION", "balanced"))?;

    let refetch_threshold_degrees = or_default("MEDFIND_REFETCH_THRESHOLD_DEGREES", "0.05")
        .parse::<f64>()
        .map_err(|e| invalid("MEDFIND_REFETCH_THRESHOLD_DEGREES", e.to_string()))?;
    if !refetch_threshold_degrees.is_finite() || refetch_threshold_degrees < 0.0 {
        return Err(invalid(
            "MEDFIND_REFETCH_THRESHOLD_DEGREES",
            format!("expected a non-negative number, got {refetch_threshold_degrees}"),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        places_api_key,
        places_base_url,
        request_timeout_secs,
        user_agent,
        search_radius_meters,
        sweep_radius_meters,
        search_mode,
        location_precision,
        refetch_threshold_degrees,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MEDFIND_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_search_mode(s: &str) -> Result<SearchMode, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "split" => Ok(SearchMode::Split),
        "combined" => Ok(SearchMode::Combined),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MEDFIND_SEARCH_MODE".to_string(),
            reason: format!("expected 'split' or 'combined', got '{other}'"),
        }),
    }
}

fn parse_location_precision(s: &str) -> Result<LocationPrecision, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "fast" => Ok(LocationPrecision::Fast),
        "balanced" => Ok(LocationPrecision::Balanced),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MEDFIND_LOCATION_PRECISION".to_string(),
            reason: format!("expected 'fast' or 'balanced', got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
