//! Application configuration.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{UiPickError, UiPickResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Capture manager tuning.
    pub capture: CaptureConfig,

    /// Target contract rules.
    pub contract: ContractConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Capture manager parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// How long a suppression token stays live after the press (ms).
    pub suppression_budget_ms: u64,

    /// Max press/release distance for mouse and unknown pointers (px).
    pub precise_threshold_px: f64,

    /// Max press/release distance for touch and pen pointers (px).
    pub coarse_threshold_px: f64,

    /// Ignore presses from anything but the primary button.
    pub primary_button_only: bool,

    /// Emit every resolution decision at debug level.
    pub debug_decisions: bool,
}

/// Structural rules applied by the target contract validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Role groups a `role`-scoped target may declare.
    pub role_group_allowlist: BTreeSet<String>,

    /// Leading id qualifiers skipped before the role namespace check
    /// (`controls:homeHub:nav` is namespaced under `homeHub`).
    pub id_qualifiers: Vec<String>,

    /// Number of class tokens included in a node locator.
    pub locator_class_tokens: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "uipick_capture_engine=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            suppression_budget_ms: 800,
            precise_threshold_px: 12.0,
            coarse_threshold_px: 32.0,
            primary_button_only: true,
            debug_decisions: false,
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            role_group_allowlist: ["homeHub", "practice", "dailyPractice"]
                .into_iter()
                .map(String::from)
                .collect(),
            id_qualifiers: ["controls", "plates", "card"]
                .into_iter()
                .map(String::from)
                .collect(),
            locator_class_tokens: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl ContractConfig {
    /// Whether `group` is on the role group allow-list.
    pub fn allows_role_group(&self, group: &str) -> bool {
        self.role_group_allowlist.contains(group)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(
                        path = %config_path.display(),
                        error = %e,
                        "Failed to load config"
                    );
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &std::path::Path) -> UiPickResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> UiPickResult<PathBuf> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Reject values the capture manager cannot work with.
    pub fn check(&self) -> UiPickResult<()> {
        let c = &self.capture;
        if !(c.precise_threshold_px.is_finite() && c.precise_threshold_px >= 0.0) {
            return Err(UiPickError::config(
                "precise_threshold_px must be a finite non-negative number",
            ));
        }
        if !(c.coarse_threshold_px.is_finite() && c.coarse_threshold_px >= 0.0) {
            return Err(UiPickError::config(
                "coarse_threshold_px must be a finite non-negative number",
            ));
        }
        if self.contract.id_qualifiers.iter().any(|q| q.trim().is_empty()) {
            return Err(UiPickError::config("id_qualifiers must not contain blank entries"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("uipick").join("config.json")
}
