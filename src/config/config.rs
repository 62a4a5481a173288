use config::{Config, ConfigError, File, FileFormat};
use log::LevelFilter;
use serde::Deserialize;

/// Logger configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// One of off, error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingSettings {
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Volume indexer inputs and outputs.
///
/// - Registry: pools, base pools and virtual base-lending pools (JSON)
/// - Prices: price snapshots consumed by the oracle (JSON)
/// - Logs: raw exchange logs, one JSON object per line
#[derive(Debug, Deserialize, Clone)]
pub struct IndexerSettings {
    pub registry_path: String,
    pub prices_path: String,
    pub logs_path: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Metapools excluded from the 18-decimal sold amount correction
    #[serde(default)]
    pub rebasing_factory_metapools: Vec<String>,
}

fn default_output_path() -> String {
    "volume.json".to_string()
}

/// Root application configuration.
///
/// Loaded from `config.yaml` (or any format the config crate knows) at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingSettings,
    pub indexer: IndexerSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config"))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_yaml(
            r#"
indexer:
  registry_path: registry.json
  prices_path: prices.json
  logs_path: logs.jsonl
"#,
        )
        .unwrap();

        assert_eq!(settings.logging.level_filter(), LevelFilter::Info);
        assert_eq!(settings.indexer.output_path, "volume.json");
        assert!(settings.indexer.rebasing_factory_metapools.is_empty());
    }

    #[test]
    fn test_explicit_values() {
        let settings = Settings::from_yaml(
            r#"
logging:
  level: debug
indexer:
  registry_path: r.json
  prices_path: p.json
  logs_path: l.jsonl
  output_path: out.json
  rebasing_factory_metapools:
    - "0xabc"
"#,
        )
        .unwrap();

        assert_eq!(settings.logging.level_filter(), LevelFilter::Debug);
        assert_eq!(settings.indexer.output_path, "out.json");
        assert_eq!(settings.indexer.rebasing_factory_metapools, vec!["0xabc".to_string()]);
    }

    #[test]
    fn test_missing_indexer_section_fails() {
        assert!(Settings::from_yaml("logging:\n  level: warn\n").is_err());
    }
}
