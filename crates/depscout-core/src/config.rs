use depscout_api::{RetryConfig, TOP_PYPI_PACKAGES_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
///
/// Loaded from `<config_dir>/depscout/config.toml` unless a path is given.
/// Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub seeds: SeedConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub neo4j: Neo4jConfig,
}

impl Config {
    /// Load config from `path`, or the default location when `None`
    ///
    /// A missing file means defaults; a broken one is an error.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&contents)
        } else {
            if path.is_some() {
                return Err(crate::Error::ConfigError(format!(
                    "Config file not found: {}",
                    config_path.display()
                )));
            }
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Save config to `path`, or the default location when `None`
    pub fn save(&self, path: Option<&Path>) -> crate::Result<PathBuf> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;
        Ok(config_path)
    }

    /// Get the config file path
    /// Uses XDG on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("depscout");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON API root; `<base_url>/<name>/json` must return package metadata
    #[serde(default = "default_registry_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_registry_url() -> String {
    depscout_api::pypi::PYPI_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    depscout_api::DEFAULT_USER_AGENT.to_string()
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_registry_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Backoff for transient transport failures inside a single lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            initial_delay_ms: self.initial_delay_ms,
            max_delay_ms: self.max_delay_ms,
            backoff_multiplier: self.backoff_multiplier,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Popularity ranking that supplies most of the seeds
    #[serde(default = "default_top_packages_url")]
    pub top_packages_url: String,

    /// Only take the first N ranked packages
    #[serde(default)]
    pub limit: Option<usize>,

    /// Resolved before the ranked seeds
    #[serde(default = "default_extra_seeds")]
    pub extra: Vec<String>,
}

fn default_top_packages_url() -> String {
    TOP_PYPI_PACKAGES_URL.to_string()
}

fn default_extra_seeds() -> Vec<String> {
    vec!["tomni".to_string(), "neo4j".to_string()]
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            top_packages_url: default_top_packages_url(),
            limit: None,
            extra: default_extra_seeds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Where the tables go; point this at the Neo4j import directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_packages_file")]
    pub packages_file: String,

    #[serde(default = "default_dependencies_file")]
    pub dependencies_file: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_packages_file() -> String {
    "all_packages.csv".to_string()
}

fn default_dependencies_file() -> String {
    "all_dependencies.csv".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            packages_file: default_packages_file(),
            dependencies_file: default_dependencies_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neo4jConfig {
    /// HTTP endpoint, not bolt
    #[serde(default = "default_neo4j_url")]
    pub url: String,

    #[serde(default = "default_neo4j_database")]
    pub database: String,

    #[serde(default = "default_neo4j_user")]
    pub user: String,

    #[serde(default = "default_neo4j_password")]
    pub password: String,
}

fn default_neo4j_url() -> String {
    "http://localhost:7474".to_string()
}

fn default_neo4j_database() -> String {
    "neo4j".to_string()
}

fn default_neo4j_user() -> String {
    "neo4j".to_string()
}

fn default_neo4j_password() -> String {
    "password".to_string()
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            url: default_neo4j_url(),
            database: default_neo4j_database(),
            user: default_neo4j_user(),
            password: default_neo4j_password(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.registry.base_url, "https://pypi.org/pypi");
        assert_eq!(config.registry.timeout_secs, 10);
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.seeds.extra, vec!["tomni", "neo4j"]);
        assert_eq!(config.seeds.limit, None);
        assert_eq!(config.export.packages_file, "all_packages.csv");
        assert_eq!(config.neo4j.url, "http://localhost:7474");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = Config::from_toml(
            r#"
[seeds]
limit = 100
extra = []

[neo4j]
password = "hunter2"
"#,
        )
        .unwrap();

        assert_eq!(config.seeds.limit, Some(100));
        assert!(config.seeds.extra.is_empty());
        assert_eq!(config.seeds.top_packages_url, TOP_PYPI_PACKAGES_URL);
        assert_eq!(config.neo4j.password, "hunter2");
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.registry.timeout_secs, 10);
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_toml("[seeds]\nlimit = \"lots\"").unwrap_err();
        assert!(matches!(err, crate::Error::ConfigError(_)));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("top_packages_url"));
        assert!(toml.contains("output_dir"));
    }

    #[test]
    fn test_save_and_load_roundtrip_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.seeds.limit = Some(5);
        config.save(Some(&path)).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.seeds.limit, Some(5));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/no/such/depscout.toml"))).unwrap_err();
        assert!(matches!(err, crate::Error::ConfigError(_)));
    }

    #[test]
    fn test_retry_settings_conversion() {
        let retry = RetrySettings::default().to_retry_config();
        assert_eq!(retry.max_retries, 2);
        assert_eq!(retry.initial_delay_ms, 500);
    }
}
