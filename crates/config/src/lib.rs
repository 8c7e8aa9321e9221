use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "incognito.toml",
    "config/incognito.toml",
    "crates/config/incognito.toml",
];

/// Plain environment variables honoured for compatibility with existing deployments.
const LEGACY_DATABASE_URL: &str = "DATABASE_URL";
const LEGACY_PORT: &str = "PORT";
const LEGACY_ENVIRONMENT: &[&str] = &["APP_ENV", "NODE_ENV"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

/// Deployment mode. Only affects which cross-origin callers are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Anything other than `production` is treated as a development deployment.
    fn from_legacy(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection; the only timeout applied to store calls.
    #[serde(default = "DatabaseConfig::default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
    /// When disabled, messages may reference rooms that do not exist.
    #[serde(default)]
    pub enforce_foreign_keys: bool,
}

impl DatabaseConfig {
    const fn default_acquire_timeout() -> u64 {
        30
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://incognito.db".to_string(),
            max_connections: 10,
            acquire_timeout_seconds: Self::default_acquire_timeout(),
            enforce_foreign_keys: false,
        }
    }
}

/// Cross-origin settings.
///
/// ```
/// use incognito_config::CorsConfig;
///
/// let cors = CorsConfig::default();
/// assert_eq!(
///     cors.development_origins,
///     vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()]
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "CorsConfig::default_development_origins")]
    pub development_origins: Vec<String>,
}

impl CorsConfig {
    fn default_development_origins() -> Vec<String> {
        vec![
            "http://localhost:3000".to_string(),
            "http://localhost:5173".to_string(),
        ]
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            development_origins: Self::default_development_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Events queued per connection before further deliveries to it are dropped.
    #[serde(default = "RealtimeConfig::default_outbound_buffer")]
    pub outbound_buffer: usize,
}

impl RealtimeConfig {
    const fn default_outbound_buffer() -> usize {
        100
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_buffer: Self::default_outbound_buffer(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use incognito_config::load;
///
/// std::env::remove_var("INCOGNITO_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let acquire_timeout =
        i64::try_from(defaults.database.acquire_timeout_seconds).unwrap_or(i64::MAX);
    let outbound_buffer = i64::try_from(defaults.realtime.outbound_buffer).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("environment", defaults.environment.as_str())?
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("database.acquire_timeout_seconds", acquire_timeout)?
        .set_default(
            "database.enforce_foreign_keys",
            defaults.database.enforce_foreign_keys,
        )?
        .set_default(
            "cors.development_origins",
            defaults.cors.development_origins.clone(),
        )?
        .set_default("realtime.outbound_buffer", outbound_buffer)?;

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("INCOGNITO_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via INCOGNITO_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(config::Environment::with_prefix("INCOGNITO").separator("__"));

    builder = builder
        .set_override_option("database.url", std::env::var(LEGACY_DATABASE_URL).ok())?
        .set_override_option("http.port", std::env::var(LEGACY_PORT).ok())?
        .set_override_option(
            "environment",
            LEGACY_ENVIRONMENT
                .iter()
                .find_map(|key| std::env::var(key).ok())
                .map(|value| Environment::from_legacy(&value).as_str()),
        )?;

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_environment_values_collapse_to_development() {
        assert_eq!(Environment::from_legacy("production"), Environment::Production);
        assert_eq!(Environment::from_legacy(" Production "), Environment::Production);
        assert_eq!(Environment::from_legacy("staging"), Environment::Development);
        assert_eq!(Environment::from_legacy(""), Environment::Development);
    }

    #[test]
    fn defaults_are_permissive_and_local() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.database.enforce_foreign_keys);
        assert_eq!(config.realtime.outbound_buffer, 100);
    }
}
