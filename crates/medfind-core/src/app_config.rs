#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

/// How the places client covers the hospital and clinic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Two concurrent sub-queries, one per category, hospital hits first.
    Split,
    /// One query whose filter spans both categories.
    Combined,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Split => write!(f, "split"),
            SearchMode::Combined => write!(f, "combined"),
        }
    }
}

/// Accuracy requested from the positioning service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationPrecision {
    Fast,
    #[default]
    Balanced,
}

impl std::fmt::Display for LocationPrecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationPrecision::Fast => write!(f, "fast"),
            LocationPrecision::Balanced => write!(f, "balanced"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub places_api_key: String,
    pub places_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub search_radius_meters: u32,
    pub sweep_radius_meters: u32,
    pub search_mode: SearchMode,
    pub location_precision: LocationPrecision,
    pub refetch_threshold_degrees: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search_radius_meters", &self.search_radius_meters)
            .field("sweep_radius_meters", &self.sweep_radius_meters)
            .field("search_mode", &self.search_mode)
            .field("location_precision", &self.location_precision)
            .field("refetch_threshold_degrees", &self.refetch_threshold_degrees)
            .finish()
    }
}
