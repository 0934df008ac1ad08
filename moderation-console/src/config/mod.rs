use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Mark the session cookie `Secure`; enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
    #[serde(default = "default_session_inactivity_hours")]
    pub session_inactivity_hours: i64,
}

fn default_session_inactivity_hours() -> i64 {
    24
}

#[derive(Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the platform API, e.g. `http://api:8080/api/`.
    pub url: String,
    /// Bearer token sent with every backend request.
    #[serde(default)]
    pub api_token: Option<Secret<String>>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC collector; spans are only exported when set.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Clone)]
pub struct CacheSettings {
    /// How often unused query results are swept.
    #[serde(default = "default_gc_interval_secs")]
    pub gc_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            gc_interval_secs: default_gc_interval_secs(),
        }
    }
}

fn default_gc_interval_secs() -> u64 {
    60
}

impl CacheSettings {
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.gc_interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "cache.gc_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("cannot read current directory: {e}")))?;

    // Run either from the workspace root or from the crate directory
    let configuration_directory = if base_path.ends_with("moderation-console") {
        base_path.join("config")
    } else {
        base_path.join("moderation-console").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    settings.cache.validate()?;
    Ok(settings)
}
