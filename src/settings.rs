//! Shared settings for the CLI and GUI.
//! Persisted in the platform-specific config directory via `directories::ProjectDirs`.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::detect::{DetectorConfig, DEFAULT_BASE_URL};

/// Default real-world eye distance in centimeters, a common adult average.
pub const DEFAULT_EYE_DISTANCE_CM: f64 = 6.3;

/// Application settings that can be saved and loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Detection API base URL
    pub base_url: String,
    /// Detection API key
    pub api_key: String,
    /// Workflow workspace name
    pub workspace: String,
    /// Workflow id
    pub workflow_id: String,
    /// Default eye distance in centimeters
    pub eye_distance_cm: f64,
    /// Save the processed image after each analysis
    pub save_processed: bool,
    /// File name for the saved processed image
    pub processed_path: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            workspace: String::new(),
            workflow_id: String::new(),
            eye_distance_cm: DEFAULT_EYE_DISTANCE_CM,
            save_processed: true,
            processed_path: "visualization_output.png".to_string(),
        }
    }
}

impl AppSettings {
    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bodymeasure", "body-measure")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path.
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.json"))
    }

    /// Load settings from the config file.
    pub fn load() -> Self {
        let defaults = Self::default();

        let mut loaded: Self = Self::settings_path()
            .and_then(|path| fs::read_to_string(&path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();

        // Backfill fields when loading older or hand-edited config files
        if loaded.base_url.is_empty() {
            loaded.base_url = defaults.base_url;
        }
        if !(loaded.eye_distance_cm.is_finite() && loaded.eye_distance_cm > 0.0) {
            loaded.eye_distance_cm = defaults.eye_distance_cm;
        }
        if loaded.processed_path.is_empty() {
            loaded.processed_path = defaults.processed_path;
        }

        loaded
    }

    /// Overlay `ROBOFLOW_*` / `EYE_DISTANCE_CM` environment variables (usually
    /// from a `.env` file) onto these settings. The environment wins over the
    /// persisted file; unset variables leave the stored value alone.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("ROBOFLOW_BASE_URL") {
            self.base_url = v;
        }
        if let Ok(v) = env::var("ROBOFLOW_API_KEY") {
            self.api_key = v;
        }
        if let Ok(v) = env::var("ROBOFLOW_WORKSPACE") {
            self.workspace = v;
        }
        if let Ok(v) = env::var("ROBOFLOW_WORKFLOW_ID") {
            self.workflow_id = v;
        }
        if let Some(cm) = env::var("EYE_DISTANCE_CM")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|cm| cm.is_finite() && *cm > 0.0)
        {
            self.eye_distance_cm = cm;
        }
    }

    /// Save settings to the config file.
    pub fn save(&self) -> Result<(), String> {
        let dir = Self::config_dir().ok_or("Cannot determine config directory")?;

        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        let path = dir.join("settings.json");
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        fs::write(&path, content).map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }

    /// Get logs directory path.
    pub fn logs_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "bodymeasure", "body-measure")
            .map(|dirs| dirs.data_dir().join("logs"))
    }

    /// Build a detector configuration from these settings.
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig::default()
            .with_base_url(&self.base_url)
            .with_api_key(&self.api_key)
            .with_workspace(&self.workspace)
            .with_workflow_id(&self.workflow_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = AppSettings::default();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.eye_distance_cm, DEFAULT_EYE_DISTANCE_CM);
        assert!(settings.save_processed);
    }

    #[test]
    fn test_detector_config_from_settings() {
        let settings = AppSettings {
            workspace: "ws".to_string(),
            workflow_id: "wf".to_string(),
            api_key: "key".to_string(),
            ..AppSettings::default()
        };
        let config = settings.detector_config();
        assert_eq!(config.workspace, "ws");
        assert_eq!(config.workflow_id, "wf");
        assert_eq!(config.api_key, "key");
    }

    #[test]
    fn test_env_overrides_win_over_stored_values() {
        let mut settings = AppSettings {
            api_key: "stored-key".to_string(),
            workflow_id: "stored-wf".to_string(),
            ..AppSettings::default()
        };

        env::set_var("ROBOFLOW_API_KEY", "env-key");
        env::set_var("ROBOFLOW_WORKSPACE", "env-ws");
        env::set_var("EYE_DISTANCE_CM", "6.1");
        settings.apply_env_overrides();
        env::remove_var("ROBOFLOW_API_KEY");
        env::remove_var("ROBOFLOW_WORKSPACE");
        env::remove_var("EYE_DISTANCE_CM");

        assert_eq!(settings.api_key, "env-key");
        assert_eq!(settings.workspace, "env-ws");
        assert_eq!(settings.eye_distance_cm, 6.1);
        // Not set in the environment, so the stored value survives.
        assert_eq!(settings.workflow_id, "stored-wf");
    }

    #[test]
    fn test_env_override_rejects_bad_eye_distance() {
        let mut settings = AppSettings::default();
        env::set_var("EYE_DISTANCE_CM", "not-a-number");
        settings.apply_env_overrides();
        env::remove_var("EYE_DISTANCE_CM");
        assert_eq!(settings.eye_distance_cm, DEFAULT_EYE_DISTANCE_CM);
    }
}
