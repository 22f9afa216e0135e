use std::env;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::warn;

// Tunes the demo scenario and the report surface only; detection rule
// thresholds are fixed constants in the domain layer.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub trader_count: usize,
    pub updates_per_trader: usize,
    pub burst_size: usize,
    pub stats_window_ms: i64,
    pub purge_max_age_ms: i64,
    pub report_min_severity: f64,
    pub export_path: Option<String>,
    pub json_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            trader_count: 4,
            updates_per_trader: 20,
            burst_size: 15,
            stats_window_ms: 60_000,
            purge_max_age_ms: 3_600_000,
            report_min_severity: 50.0,
            export_path: None,
            json_output: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path = env::var("VIGIL_CONFIG").unwrap_or_else(|_| "./vigil.toml".to_string());
        Self::load_from_path(Path::new(&path), |key: &str| env::var(key).ok())
    }

    // `get_var` abstracts the process environment; tests inject a fixed lookup.
    fn load_from_path(file_path: &Path, get_var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("vigil.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides(&get_var);
            config.resolve_paths(base_dir);
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path)?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides(&get_var);
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(export_path) = &self.export_path {
            if export_path.trim().is_empty() {
                self.export_path = None;
            }
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        if let Some(export_path) = &self.export_path {
            self.export_path = Some(resolve_path(base, export_path));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.trader_count == 0 {
            return Err(anyhow!("trader_count must be greater than 0"));
        }
        if self.updates_per_trader == 0 {
            return Err(anyhow!("updates_per_trader must be greater than 0"));
        }
        if self.burst_size == 0 {
            return Err(anyhow!("burst_size must be greater than 0"));
        }
        if self.stats_window_ms < 0 {
            return Err(anyhow!("stats_window_ms must be non-negative"));
        }
        if self.purge_max_age_ms < 0 {
            return Err(anyhow!("purge_max_age_ms must be non-negative"));
        }
        if !self.report_min_severity.is_finite() || self.report_min_severity < 0.0 {
            return Err(anyhow!("report_min_severity out of range"));
        }
        Ok(())
    }

    // Unparsable values keep whatever the field already holds.
    fn apply_env_overrides(&mut self, get_var: &impl Fn(&str) -> Option<String>) {
        if let Some(value) = get_var("VIGIL_TRADER_COUNT") {
            self.trader_count = value.parse().unwrap_or(self.trader_count);
        }
        if let Some(value) = get_var("VIGIL_UPDATES_PER_TRADER") {
            self.updates_per_trader = value.parse().unwrap_or(self.updates_per_trader);
        }
        if let Some(value) = get_var("VIGIL_BURST_SIZE") {
            self.burst_size = value.parse().unwrap_or(self.burst_size);
        }
        if let Some(value) = get_var("VIGIL_STATS_WINDOW_MS") {
            self.stats_window_ms = value.parse().unwrap_or(self.stats_window_ms);
        }
        if let Some(value) = get_var("VIGIL_PURGE_MAX_AGE_MS") {
            self.purge_max_age_ms = value.parse().unwrap_or(self.purge_max_age_ms);
        }
        if let Some(value) = get_var("VIGIL_REPORT_MIN_SEVERITY") {
            self.report_min_severity = value.parse().unwrap_or(self.report_min_severity);
        }
        if let Some(value) = get_var("VIGIL_EXPORT_PATH") {
            self.export_path = Some(value);
        }
        if let Some(value) = get_var("VIGIL_JSON_OUTPUT") {
            self.json_output = value.parse().unwrap_or(self.json_output);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = AppConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.trader_count, 4);
        assert_eq!(config.report_min_severity, 50.0);
        assert!(config.export_path.is_none());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: AppConfig =
            toml::from_str("burst_size = 30\njson_output = true").expect("parse toml");
        assert_eq!(config.burst_size, 30);
        assert!(config.json_output);
        assert_eq!(config.trader_count, 4);
        assert_eq!(config.purge_max_age_ms, 3_600_000);
    }

    #[test]
    fn normalize_drops_blank_export_path() {
        let mut config = AppConfig {
            export_path: Some("   ".to_string()),
            ..AppConfig::default()
        };
        config.normalize();
        assert!(config.export_path.is_none());
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let config = AppConfig {
            trader_count: 0,
            ..AppConfig::default()
        };
        let err = config.validate().expect_err("reject zero traders");
        assert!(err.to_string().contains("trader_count"));

        let config = AppConfig {
            report_min_severity: f64::NAN,
            ..AppConfig::default()
        };
        let err = config.validate().expect_err("reject NaN severity");
        assert!(err.to_string().contains("report_min_severity"));

        let config = AppConfig {
            purge_max_age_ms: -1,
            ..AppConfig::default()
        };
        let err = config.validate().expect_err("reject negative age");
        assert!(err.to_string().contains("purge_max_age_ms"));
    }

    #[test]
    fn relative_export_path_resolves_against_base() {
        let mut config = AppConfig {
            export_path: Some("out/findings.jsonl".to_string()),
            ..AppConfig::default()
        };
        config.resolve_paths(Some(Path::new("/etc/vigil")));
        assert_eq!(
            config.export_path.as_deref(),
            Some("/etc/vigil/out/findings.jsonl")
        );

        let mut config = AppConfig {
            export_path: Some("/var/log/findings.jsonl".to_string()),
            ..AppConfig::default()
        };
        config.resolve_paths(Some(Path::new("/etc/vigil")));
        assert_eq!(
            config.export_path.as_deref(),
            Some("/var/log/findings.jsonl")
        );
    }

    #[test]
    fn env_overrides_apply_and_garbage_keeps_defaults() {
        let get_var = |key: &str| match key {
            "VIGIL_BURST_SIZE" => Some("30".to_string()),
            "VIGIL_TRADER_COUNT" => Some("not-a-number".to_string()),
            "VIGIL_EXPORT_PATH" => Some("/var/log/vigil/findings.jsonl".to_string()),
            "VIGIL_JSON_OUTPUT" => Some("true".to_string()),
            _ => None,
        };
        let mut config = AppConfig::default();
        config.apply_env_overrides(&get_var);
        assert_eq!(config.burst_size, 30);
        assert_eq!(config.trader_count, 4);
        assert_eq!(
            config.export_path.as_deref(),
            Some("/var/log/vigil/findings.jsonl")
        );
        assert!(config.json_output);
        assert_eq!(config.updates_per_trader, 20);
        assert_eq!(config.stats_window_ms, 60_000);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let path = env::temp_dir().join(format!("vigil_absent_{}.toml", std::process::id()));
        let config =
            AppConfig::load_from_path(&path, |_: &str| None).expect("defaults when file absent");
        assert_eq!(config.trader_count, 4);
        assert_eq!(config.burst_size, 15);
        assert!(config.export_path.is_none());
        assert!(!config.json_output);
    }

    #[test]
    fn env_override_wins_over_config_file() {
        let path = env::temp_dir().join(format!("vigil_file_{}.toml", std::process::id()));
        fs::write(&path, "burst_size = 12\ntrader_count = 2\n").expect("write config file");
        let config = AppConfig::load_from_path(&path, |key: &str| {
            (key == "VIGIL_BURST_SIZE").then(|| "40".to_string())
        })
        .expect("load config file");
        fs::remove_file(&path).expect("remove config file");
        assert_eq!(config.burst_size, 40);
        assert_eq!(config.trader_count, 2);
        assert_eq!(config.updates_per_trader, 20);
    }
}
