use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filters::FilterLimits;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_MAX_FILTER_JSON_BYTES,
    DEFAULT_MAX_FILTERS, DEFAULT_PORT,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub path: Option<String>,
    pub seed_demo: Option<bool>,
}

/// Filter limits section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FiltersFileConfig {
    pub max_filters: Option<usize>,
    pub max_json_bytes: Option<usize>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub filters: Option<FiltersFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    fn unknown_fields(&self) -> Vec<String> {
        match &self.extra {
            serde_json::Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Warn about unknown top-level fields (possible typos)
    fn warn_unknown_fields(&self) {
        let unknown = self.unknown_fields();
        if !unknown.is_empty() {
            tracing::warn!(
                fields = %unknown.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                current.host = server.host;
            }
            if server.port.is_some() {
                current.port = server.port;
            }
        }

        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.path.is_some() {
                current.path = database.path;
            }
            if database.seed_demo.is_some() {
                current.seed_demo = database.seed_demo;
            }
        }

        if let Some(filters) = other.filters {
            let current = self.filters.get_or_insert_with(FiltersFileConfig::default);
            if filters.max_filters.is_some() {
                current.max_filters = filters.max_filters;
            }
            if filters.max_json_bytes.is_some() {
                current.max_json_bytes = filters.max_json_bytes;
            }
        }

        if other.debug.is_some() {
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Explicit SQLite file; `None` uses the data directory
    pub path: Option<PathBuf>,
    pub seed_demo: bool,
}

/// Limits applied to incoming filters
#[derive(Debug, Clone)]
pub struct FiltersConfig {
    pub max_filters: usize,
    pub max_json_bytes: usize,
}

impl FiltersConfig {
    pub fn limits(&self) -> FilterLimits {
        FilterLimits {
            max_filters: self.max_filters,
            max_json_bytes: self.max_json_bytes,
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub filters: FiltersConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.relquery/relquery.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::from_layers(cli, file_config);
        config.validate()?;

        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Layer defaults, file config and CLI/env overrides
    fn from_layers(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_filters = file_config.filters.unwrap_or_default();

        let server = ServerConfig {
            host: cli
                .host
                .clone()
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT),
        };

        let database = DatabaseConfig {
            path: cli
                .db_path
                .clone()
                .or_else(|| file_database.path.map(PathBuf::from))
                .map(|p| expand_path(&p.to_string_lossy())),
            seed_demo: cli.seed_demo || file_database.seed_demo.unwrap_or(false),
        };

        let filters = FiltersConfig {
            max_filters: cli
                .max_filters
                .or(file_filters.max_filters)
                .unwrap_or(DEFAULT_MAX_FILTERS),
            max_json_bytes: file_filters
                .max_json_bytes
                .unwrap_or(DEFAULT_MAX_FILTER_JSON_BYTES),
        };

        // debug: CLI/env flag takes precedence, then file config, default false
        let debug = cli.debug || file_config.debug.unwrap_or(false);

        Self {
            server,
            database,
            filters,
            debug,
        }
    }

    /// Defaults only, without reading config files
    #[cfg(test)]
    pub fn for_test() -> Self {
        Self::from_layers(&CliConfig::default(), FileConfig::default())
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }
        if self.filters.max_filters == 0 {
            anyhow::bail!("Configuration error: filters.max_filters must be greater than 0");
        }
        if self.filters.max_json_bytes == 0 {
            anyhow::bail!("Configuration error: filters.max_json_bytes must be greater than 0");
        }
        Ok(())
    }
}

/// Get the profile config path (~/.relquery/relquery.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "database": { "path": "/tmp/rq.db", "seed_demo": true },
            "filters": { "max_filters": 10, "max_json_bytes": 2048 },
            "debug": true
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(server.port, Some(8080));
        assert_eq!(config.database.as_ref().unwrap().seed_demo, Some(true));
        assert_eq!(config.filters.as_ref().unwrap().max_filters, Some(10));
        assert_eq!(config.debug, Some(true));
        assert!(config.unknown_fields().is_empty());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.unknown_fields(), vec!["unknown_field".to_string()]);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base: FileConfig = serde_json::from_str(
            r#"{ "server": { "host": "base.host", "port": 1000 }, "filters": { "max_filters": 5 } }"#,
        )
        .unwrap();
        let overlay: FileConfig =
            serde_json::from_str(r#"{ "server": { "port": 2000 }, "debug": true }"#).unwrap();

        base.merge(overlay);

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host.as_deref(), Some("base.host"));
        assert_eq!(server.port, Some(2000));
        assert_eq!(base.filters.as_ref().unwrap().max_filters, Some(5));
        assert_eq!(base.debug, Some(true));
    }

    #[test]
    fn test_app_config_defaults() {
        let config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.database.path, None);
        assert!(!config.database.seed_demo);
        assert_eq!(config.filters.limits(), FilterLimits::default());
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_cli_overrides_file() {
        let file: FileConfig = serde_json::from_str(
            r#"{ "server": { "host": "file.host", "port": 1000 }, "filters": { "max_filters": 5 } }"#,
        )
        .unwrap();
        let cli = CliConfig {
            host: Some("cli.host".to_string()),
            port: Some(3000),
            debug: true,
            config: None,
            db_path: Some(PathBuf::from("/var/lib/relquery/app.db")),
            seed_demo: true,
            max_filters: Some(20),
        };
        let config = AppConfig::from_layers(&cli, file);

        assert_eq!(config.server.host, "cli.host");
        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.database.path,
            Some(PathBuf::from("/var/lib/relquery/app.db"))
        );
        assert!(config.database.seed_demo);
        assert_eq!(config.filters.max_filters, 20);
        assert!(config.debug);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.filters.max_filters = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::from_layers(&CliConfig::default(), FileConfig::default());
        config.server.host.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_path_fails() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/relquery.json")),
            ..CliConfig::default()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{ "server": { "port": 6001 }, "filters": { "max_json_bytes": 512 } }"#)
            .unwrap();

        let cli = CliConfig {
            config: Some(path),
            ..CliConfig::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.port, 6001);
        assert_eq!(config.filters.max_json_bytes, 512);
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
    }
}
