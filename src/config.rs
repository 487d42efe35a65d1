//! Builder defaults.
//!
//! [`QueryConfig::load`] reads the optional `config/querychain.toml` (section
//! `[query]`) and overlays `QUERYCHAIN__QUERY__*` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "config/querychain.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryConfig {
    /// Offset every new builder starts with
    #[serde(default)]
    pub default_offset: u64,
    /// Row cap every new builder starts with; keeps unpaginated queries bounded
    #[serde(default = "default_limit")]
    pub default_limit: u64,
    /// Include bind values in the "Executing SQL" log line
    #[serde(default = "default_log_params")]
    pub log_params: bool,
}

fn default_limit() -> u64 {
    10
}

fn default_log_params() -> bool {
    true
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_offset: 0,
            default_limit: default_limit(),
            log_params: default_log_params(),
        }
    }
}

impl QueryConfig {
    /// Load from `config/querychain.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix("QUERYCHAIN").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // File present but unreadable: retry with env only
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!("Failed to load {CONFIG_FILE}, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix("QUERYCHAIN").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        match settings.get::<QueryConfig>("query") {
            Ok(cfg) => Ok(cfg),
            // No [query] section anywhere: use defaults
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Query configuration could not be loaded from file or environment: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = QueryConfig::default();
        assert_eq!(cfg.default_offset, 0);
        assert_eq!(cfg.default_limit, 10);
        assert!(cfg.log_params);
    }

    #[test]
    fn test_partial_section_uses_field_defaults() {
        let settings = Config::builder()
            .add_source(config::File::from_str(
                "[query]\ndefault_limit = 50\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let cfg: QueryConfig = settings.get("query").unwrap();
        assert_eq!(cfg.default_limit, 50);
        assert_eq!(cfg.default_offset, 0);
        assert!(cfg.log_params);
    }

    #[test]
    fn test_load_without_file_or_env() {
        // No config/querychain.toml in the crate root during tests
        let cfg = QueryConfig::load().unwrap();
        assert!(cfg.default_limit > 0);
    }
}
