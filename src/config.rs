use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub api: ApiSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Clone, Deserialize, Validate)]
pub struct ApiSettings {
    #[serde(default = "default_endpoint")]
    #[validate(url)]
    pub endpoint: String,
    #[serde(default = "default_profile")]
    #[validate(length(min = 1))]
    pub profile: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("endpoint", &self.endpoint)
            .field("profile", &self.profile)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("algorithm", &self.algorithm)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            profile: default_profile(),
            api_key: None,
            algorithm: None,
            timeout_secs: None,
        }
    }
}

fn default_endpoint() -> String { "https://api.opensanctions.org".to_string() }
fn default_profile() -> String { "default".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ENTITY_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        Self::finish(builder)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::finish(Config::builder().add_source(File::from(path.as_ref())))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        // e.g., ENTITY_MATCH__API__PROFILE -> api.profile
        let settings = builder
            .add_source(
                Environment::with_prefix("ENTITY_MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = substitute_env_vars(settings)?.try_deserialize()?;

        settings
            .validate()
            .map_err(|e| ConfigError::Message(format!("Invalid configuration: {}", e)))?;

        Ok(settings)
    }
}

/// Fall back to OS_API_KEY for the credential when the prefixed variable is unset or empty
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = resolve_api_key(
        env::var("ENTITY_MATCH__API__API_KEY").ok(),
        env::var("OS_API_KEY").ok(),
    );

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("api.api_key", api_key)?;
    }

    builder.build()
}

fn resolve_api_key(prefixed: Option<String>, fallback: Option<String>) -> Option<String> {
    prefixed
        .filter(|key| !key.is_empty())
        .or_else(|| fallback.filter(|key| !key.is_empty()))
}
