use std::{env, path::PathBuf, time::Duration};

const DATA_DIR_VAR: &str = "ORATIO_DATA_DIR";
const RESOURCES_DIR_VAR: &str = "ORATIO_RESOURCES_DIR";
const TICK_MS_VAR: &str = "ORATIO_TICK_MS";
const DEBUG_VAR: &str = "ORATIO_DEBUG";

const DEFAULT_TICK_MS: u64 = 1000;
const MIN_TICK_MS: u64 = 50;

/// Process-wide settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub resources_dir: PathBuf,
    pub tick_interval: Duration,
    pub debug: bool,
    /// Problems met while reading the environment. Logged by the caller once
    /// logging is up.
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            resources_dir: PathBuf::from("resources"),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            debug: false,
            warnings: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source. Unparseable values
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut warnings = Vec::new();

        let data_dir = non_empty(lookup(DATA_DIR_VAR))
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let resources_dir = non_empty(lookup(RESOURCES_DIR_VAR))
            .map(PathBuf::from)
            .unwrap_or(defaults.resources_dir);

        let tick_interval = match non_empty(lookup(TICK_MS_VAR)) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms.max(MIN_TICK_MS)),
                Err(_) => {
                    warnings.push(format!(
                        "Ignoring {TICK_MS_VAR}={raw}: not a number of milliseconds"
                    ));
                    defaults.tick_interval
                }
            },
            None => defaults.tick_interval,
        };

        let debug = lookup(DEBUG_VAR)
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);

        Self {
            data_dir,
            resources_dir,
            tick_interval,
            debug,
            warnings,
        }
    }

    /// Rooted at `data_dir` with default everything else. Handy for tests.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("oratio.sqlite3")
    }

    pub fn highlights_path(&self) -> PathBuf {
        self.data_dir.join("psalm_highlights.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("oratio"))
        .unwrap_or_else(|| PathBuf::from("user_data"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert!(!config.debug);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("ORATIO_DATA_DIR", "/tmp/oratio-test"),
            ("ORATIO_RESOURCES_DIR", "/opt/oratio/resources"),
            ("ORATIO_TICK_MS", "250"),
            ("ORATIO_DEBUG", "TRUE"),
        ]);

        assert_eq!(config.data_dir, PathBuf::from("/tmp/oratio-test"));
        assert_eq!(config.resources_dir, PathBuf::from("/opt/oratio/resources"));
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert!(config.debug);
        assert!(config.warnings.is_empty());
        assert_eq!(
            config.highlights_path(),
            PathBuf::from("/tmp/oratio-test/psalm_highlights.json")
        );
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/oratio-test/oratio.sqlite3")
        );
    }

    #[test]
    fn clamps_and_ignores_bad_tick_values() {
        assert_eq!(
            config_from(&[("ORATIO_TICK_MS", "5")]).tick_interval,
            Duration::from_millis(MIN_TICK_MS)
        );

        let config = config_from(&[("ORATIO_TICK_MS", "soon")]);
        assert_eq!(config.tick_interval, Duration::from_millis(DEFAULT_TICK_MS));
        assert_eq!(config.warnings.len(), 1);
        assert!(config.warnings[0].contains("ORATIO_TICK_MS=soon"));
    }
}
