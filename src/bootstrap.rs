//! # Startup
//!
//! Sessions are started from an explicit [`StartupConfig`]. The config can be
//! built in code, read from the environment (`DISTFRAME_AUTOPATCH`,
//! `DISTFRAME_USAGE_LOGGER`), parsed from TOML or YAML, or loaded from
//! `<config dir>/distframe/config.toml`.
//!
//! ```
//! use distframe::bootstrap::{init, StartupConfig};
//!
//! let config = StartupConfig::from_toml_str(
//!     r#"
//!     auto_patch = true
//!
//!     [options]
//!     "display.max_rows" = 50
//!     "#,
//! )
//! .unwrap();
//! let session = init(&config).unwrap();
//! assert!(session.conversion_enabled());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{OptionValue, Options};
use crate::engine::{EngineRef, LocalEngine};
use crate::error::Result;
use crate::session::Session;
use crate::usage_logging::UsageLoggerRegistry;

/// Oldest engine version the API is tested against
pub const MIN_ENGINE_VERSION: &str = "0.1";

pub const AUTOPATCH_ENV: &str = "DISTFRAME_AUTOPATCH";
pub const USAGE_LOGGER_ENV: &str = "DISTFRAME_USAGE_LOGGER";

const CONFIG_DIR: &str = "distframe";
const CONFIG_FILE: &str = "config.toml";

/// Local engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Partition count; one per CPU core when absent
    pub parallelism: Option<usize>,
}

/// Everything [`init`] needs to start a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    /// Enables [`ToDataFrame`](crate::ext::ToDataFrame) conversions
    pub auto_patch: bool,
    /// Name of a usage logger in the registry
    pub usage_logger: Option<String>,
    /// Option overrides applied to the new session
    pub options: BTreeMap<String, OptionValue>,
    pub engine: EngineConfig,
}

impl Default for StartupConfig {
    fn default() -> Self {
        StartupConfig {
            auto_patch: true,
            usage_logger: None,
            options: BTreeMap::new(),
            engine: EngineConfig::default(),
        }
    }
}

/// `true`, `1` and `enabled` (any case) switch auto-patching on
pub fn parse_autopatch(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "enabled")
}

impl StartupConfig {
    /// Reads `DISTFRAME_AUTOPATCH` and `DISTFRAME_USAGE_LOGGER`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`StartupConfig::from_env`] with a custom variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        StartupConfig {
            auto_patch: lookup(AUTOPATCH_ENV)
                .map(|v| parse_autopatch(&v))
                .unwrap_or(true),
            usage_logger: lookup(USAGE_LOGGER_ENV).filter(|v| !v.trim().is_empty()),
            ..StartupConfig::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(StartupConfig::default());
        }
        Ok(toml::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(StartupConfig::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads a TOML or YAML file, chosen by extension (TOML otherwise).
    /// A missing file gives the default config.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No startup config at {}; using defaults", path.display());
            return Ok(StartupConfig::default());
        }
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    /// Loads `<config dir>/distframe/config.toml`
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from_path(path),
            None => Ok(StartupConfig::default()),
        }
    }
}

/// `<config dir>/distframe/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Numeric components of a dotted version; trailing non-digits in a
/// component are ignored (`"2.4.0-SNAPSHOT"` gives `[2, 4, 0]`)
fn version_parts(version: &str) -> Option<Vec<u64>> {
    version
        .split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .collect()
}

/// Whether `version` is at least [`MIN_ENGINE_VERSION`]. Logs a warning when
/// it is lower or unknown; never fails.
pub fn check_engine_version(version: Option<&str>) -> bool {
    let supported = version
        .and_then(version_parts)
        .zip(version_parts(MIN_ENGINE_VERSION))
        .map(|(found, min)| found >= min)
        .unwrap_or(false);
    if !supported {
        log::warn!(
            "Found engine version \"{}\" installed. engine>={} is recommended.",
            version.unwrap_or("<unknown version>"),
            MIN_ENGINE_VERSION
        );
    }
    supported
}

/// Starts a session on a [`LocalEngine`] with the default logger registry
pub fn init(config: &StartupConfig) -> Result<Session> {
    let engine = match config.engine.parallelism {
        Some(parallelism) => LocalEngine::with_parallelism(parallelism),
        None => LocalEngine::new(),
    };
    init_with(Arc::new(engine), &UsageLoggerRegistry::default(), config)
}

/// Starts a session on `engine`.
///
/// The engine version is checked and the usage logger attached; neither can
/// fail the start. Invalid option overrides do.
pub fn init_with(engine: EngineRef, registry: &UsageLoggerRegistry, config: &StartupConfig) -> Result<Session> {
    check_engine_version(engine.version().as_deref());

    let usage_logger = config.usage_logger.as_deref().and_then(|name| match registry.create(name) {
        Ok(logger) => Some(logger),
        Err(err) => {
            log::warn!(
                target: "distframe::usage_logger",
                "Tried to attach usage logger `{}`, but an exception was raised: {}",
                name,
                err
            );
            None
        }
    });

    if config.auto_patch {
        log::info!(
            "Enabling to_dataframe conversions automatically. You can disable it by setting {}=false in your environment",
            AUTOPATCH_ENV
        );
    }

    let options = Options::new();
    options.apply(&config.options)?;

    log::debug!(
        "Started session on engine '{}' ({} partitions)",
        engine.name(),
        engine.default_parallelism()
    );
    Ok(Session::from_parts(engine, options, usage_logger, config.auto_patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autopatch_values() {
        for on in ["true", "TRUE", "1", "Enabled"] {
            assert!(parse_autopatch(on), "{}", on);
        }
        for off in ["false", "0", "no", ""] {
            assert!(!parse_autopatch(off), "{}", off);
        }
    }

    #[test]
    fn test_lookup_defaults() {
        let config = StartupConfig::from_lookup(|_| None);
        assert!(config.auto_patch);
        assert_eq!(config.usage_logger, None);

        let config = StartupConfig::from_lookup(|key| match key {
            AUTOPATCH_ENV => Some("false".to_string()),
            USAGE_LOGGER_ENV => Some("log".to_string()),
            _ => None,
        });
        assert!(!config.auto_patch);
        assert_eq!(config.usage_logger.as_deref(), Some("log"));
    }

    #[test]
    fn test_version_check() {
        assert!(check_engine_version(Some("0.1.0")));
        assert!(check_engine_version(Some("2.4.0-SNAPSHOT")));
        assert!(!check_engine_version(Some("0.0.9")));
        assert!(!check_engine_version(None));
        assert!(!check_engine_version(Some("dev")));
    }

    #[test]
    fn test_yaml_config() {
        let config = StartupConfig::from_yaml_str(
            "auto_patch: false\nusage_logger: log\noptions:\n  display.max_rows: null\nengine:\n  parallelism: 2\n",
        )
        .unwrap();
        assert!(!config.auto_patch);
        assert_eq!(config.options.get("display.max_rows"), Some(&OptionValue::None));
        assert_eq!(config.engine.parallelism, Some(2));
    }
}
