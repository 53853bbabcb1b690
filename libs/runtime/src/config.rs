use anyhow::{Context, Result};
use odata_client::{ClientConfig, ClientError, ODataClient, PageSource, TableQueryController};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use table_query::TableQueryConfig;

/// Environment prefix for overrides, e.g. `APP__CLIENT__BASE_URL`.
pub const ENV_PREFIX: &str = "APP__";

/// Application configuration with strongly-typed sections.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// OData endpoint and request timing.
    #[serde(default)]
    pub client: ClientConfig,
    /// Page sizes and entity policies.
    #[serde(default)]
    pub query: TableQueryConfig,
    /// Logging configuration (optional, uses defaults if None).
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
    /// Base directory for relative log file paths; empty means the working directory.
    #[serde(default)]
    pub log_dir: String,
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    #[serde(default)]
    pub file: String, // "logs/table-query.log", empty disables the file
    #[serde(default)]
    pub file_level: String,
    /// Rotated files older than this are removed; takes precedence over `max_backups`.
    #[serde(default)]
    pub max_age_days: Option<u32>,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/table-query.log".to_string(),
            file_level: "debug".to_string(),
            max_age_days: Some(7),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            query: TableQueryConfig::default(),
            logging: Some(default_logging_config()),
            log_dir: String::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        Self::load_layered_with_prefix(config_path, ENV_PREFIX)
    }

    /// Same as [`AppConfig::load_layered`] with a custom environment prefix.
    pub fn load_layered_with_prefix<P: AsRef<Path>>(config_path: P, env_prefix: &str) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let path = config_path.as_ref();

        // Logging stays None unless YAML/ENV provide it.
        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(path))
            // Example: APP__QUERY__DEFAULT_PAGE_SIZE=25 maps to query.default_page_size
            .merge(Env::prefixed(env_prefix).split("__"));

        let config: AppConfig = figment
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file or use default values.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => Ok(Self::default()),
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Reject values that would only fail later, at query time.
    pub fn validate(&self) -> Result<()> {
        if self.query.default_page_size == 0 {
            anyhow::bail!("query.default_page_size must be greater than zero");
        }
        for name in self.query.entities.names() {
            let policy = self.query.policy_for(name)?;
            if policy.max_page_size == Some(0) {
                anyhow::bail!("query.entities.{name}.max_page_size must be greater than zero");
            }
            odata_core::validate_field(&policy.default_order.field)
                .with_context(|| format!("query.entities.{name}.default_order"))?;
            for search in &policy.search {
                odata_core::validate_field(&search.field)
                    .with_context(|| format!("query.entities.{name}.search"))?;
            }
        }
        Ok(())
    }

    /// Directory that relative log file paths are resolved against.
    pub fn log_base_dir(&self) -> PathBuf {
        if self.log_dir.trim().is_empty() {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        } else {
            PathBuf::from(&self.log_dir)
        }
    }

    /// HTTP client for the configured endpoint.
    pub fn odata_client(&self) -> Result<ODataClient, ClientError> {
        ODataClient::from_config(&self.client)
    }

    /// Table controller for `entity`, using its configured policy and the
    /// configured debounce delay.
    pub fn controller<T: DeserializeOwned>(
        &self,
        source: Arc<dyn PageSource>,
        entity: &str,
    ) -> Result<TableQueryController<T>, odata_core::Error> {
        let policy = self.query.policy_for(entity)?;
        Ok(TableQueryController::new(
            source,
            entity,
            policy,
            self.client.debounce,
        ))
    }
}
