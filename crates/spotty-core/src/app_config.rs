use crate::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub search_radius_km: f64,
    /// Reference point used when no device position can be obtained.
    pub fallback_location: Coordinate,
    pub location_timeout_secs: u64,
    /// Device-reported position; `None` means the capability is unavailable.
    pub device_location: Option<Coordinate>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_url", &self.api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search_radius_km", &self.search_radius_km)
            .field("fallback_location", &self.fallback_location)
            .field("location_timeout_secs", &self.location_timeout_secs)
            .field(
                "device_location",
                &self.device_location.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
