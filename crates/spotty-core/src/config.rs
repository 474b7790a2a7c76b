use crate::app_config::{AppConfig, Environment};
use crate::{ConfigError, Coordinate};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or a paired variable is missing.
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
/// Returns `ConfigError` if values are invalid or a paired variable is missing.
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
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, raw: &str| -> Result<f64, ConfigError> {
        raw.trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SPOTTY_ENV", "development"))?;
    let log_level = or_default("SPOTTY_LOG_LEVEL", "info");
    let api_url = or_default("SPOTTY_API_URL", "http://localhost:8000");
    let request_timeout_secs = parse_u64("SPOTTY_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SPOTTY_USER_AGENT", "porta-spotty/0.1 (facility-map)");
    let location_timeout_secs = parse_u64("SPOTTY_LOCATION_TIMEOUT_SECS", "10")?;

    let search_radius_km = parse_f64(
        "SPOTTY_SEARCH_RADIUS_KM",
        &or_default("SPOTTY_SEARCH_RADIUS_KM", "3.0"),
    )?;
    if !search_radius_km.is_finite() || search_radius_km <= 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SPOTTY_SEARCH_RADIUS_KM".to_string(),
            reason: format!("radius must be a positive number of kilometres, got {search_radius_km}"),
        });
    }

    let fallback_lat = parse_f64(
        "SPOTTY_FALLBACK_LAT",
        &or_default("SPOTTY_FALLBACK_LAT", "44.9778"),
    )?;
    let fallback_lng = parse_f64(
        "SPOTTY_FALLBACK_LNG",
        &or_default("SPOTTY_FALLBACK_LNG", "-93.265"),
    )?;
    let fallback_location = Coordinate::new(fallback_lat, fallback_lng).map_err(|e| {
        ConfigError::InvalidEnvVar {
            var: "SPOTTY_FALLBACK_LAT".to_string(),
            reason: e.to_string(),
        }
    })?;

    let device_location = match (lookup("SPOTTY_DEVICE_LAT"), lookup("SPOTTY_DEVICE_LNG")) {
        (Err(_), Err(_)) => None,
        (Ok(_), Err(_)) => {
            return Err(ConfigError::MissingEnvVar("SPOTTY_DEVICE_LNG".to_string()));
        }
        (Err(_), Ok(_)) => {
            return Err(ConfigError::MissingEnvVar("SPOTTY_DEVICE_LAT".to_string()));
        }
        (Ok(lat), Ok(lng)) => {
            let lat = parse_f64("SPOTTY_DEVICE_LAT", &lat)?;
            let lng = parse_f64("SPOTTY_DEVICE_LNG", &lng)?;
            Some(
                Coordinate::new(lat, lng).map_err(|e| ConfigError::InvalidEnvVar {
                    var: "SPOTTY_DEVICE_LAT".to_string(),
                    reason: e.to_string(),
                })?,
            )
        }
    };

    Ok(AppConfig {
        env,
        log_level,
        api_url,
        request_timeout_secs,
        user_agent,
        search_radius_km,
        fallback_location,
        location_timeout_secs,
        device_location,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SPOTTY_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
