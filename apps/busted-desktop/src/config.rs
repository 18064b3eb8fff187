use std::path::Path;

use anyhow::{Context, Result, bail};
use busted_camera::CameraSettings;
use busted_input::KeyBindings;
use serde::{Deserialize, Serialize};

/// Window and start-up parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Initial camera position in world space.
    pub start_position: [f32; 3],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "League of Busted".into(),
            width: 800,
            height: 600,
            vsync: true,
            start_position: [0.0, 0.0, 26.0],
        }
    }
}

/// Everything the desktop app reads from its optional JSON config file.
///
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraSettings,
    pub bindings: KeyBindings,
}

impl AppConfig {
    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            bail!(
                "window size must be non-zero, got {}x{}",
                self.window.width,
                self.window.height
            );
        }
        if !self.window.start_position.iter().all(|c| c.is_finite()) {
            bail!("start_position must be finite");
        }
        self.camera.validate().context("camera settings")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busted_input::{Key, MouseButton};

    #[test]
    fn defaults_match_demo() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.start_position, [0.0, 0.0, 26.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_path_gives_defaults() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = AppConfig::from_json(
            r#"{
                "window": { "width": 1280 },
                "camera": { "sensitivity": 50.0 },
                "bindings": { "look": "Right", "sprint": "RightShift" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera.sensitivity, 50.0);
        assert_eq!(config.camera.speed, CameraSettings::default().speed);
        assert_eq!(config.bindings.look, MouseButton::Right);
        assert_eq!(config.bindings.sprint, Key::RightShift);
        assert_eq!(config.bindings.forward, Key::W);
    }

    #[test]
    fn zero_window_is_invalid() {
        let mut config = AppConfig::default();
        config.window.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_camera_settings_are_invalid() {
        let mut config = AppConfig::default();
        config.camera.fov_degrees = 200.0;
        let err = config.validate().unwrap_err();
        assert!(format!("{err:#}").contains("field of view"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(AppConfig::from_json("{ window: ").is_err());
    }
}
