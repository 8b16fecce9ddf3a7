//! Session configuration.
//!
//! Loaded from YAML or JSON, picked by file extension.

use std::path::Path;
use std::time::Duration;

use common::SerdeFormat;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::landmarks::ColorCycle;
use crate::session::viewport::ZOOM_LEVELS;
use crate::tool::ToolMode;

// =============================================================================
// Gesture timing
// =============================================================================

/// Time windows for composite input gestures, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Two presses in a mask tool within this window close the mask.
    pub double_click_ms: u64,
    /// Two selections of the remove tool within this window clear all landmarks.
    pub clear_all_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 250,
            clear_all_ms: 500,
        }
    }
}

impl GestureConfig {
    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    pub fn clear_all_window(&self) -> Duration {
        Duration::from_millis(self.clear_all_ms)
    }
}

// =============================================================================
// Landmark colours
// =============================================================================

/// Starting point of the golden-angle colour sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Initial hue, in `[0, 1)`.
    pub hue: f32,
    /// Initial saturation, in `[0.5, 1]`.
    pub saturation: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            hue: 0.0,
            saturation: 0.5,
        }
    }
}

impl ColorConfig {
    pub fn cycle(&self) -> ColorCycle {
        ColorCycle::starting_at(self.hue, self.saturation)
    }
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub gestures: GestureConfig,
    pub colors: ColorConfig,
    /// Tool active when a session starts. Must be selectable while idle.
    pub initial_tool: ToolMode,
    /// Initial magnification, one of the viewport zoom levels.
    pub magnification: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gestures: GestureConfig::default(),
            colors: ColorConfig::default(),
            initial_tool: ToolMode::AddPoint,
            magnification: 1.0,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.gestures.double_click_ms == 0 {
            return Err(Error::InvalidConfig(
                "double_click_ms must be positive".to_string(),
            ));
        }
        if self.gestures.clear_all_ms == 0 {
            return Err(Error::InvalidConfig(
                "clear_all_ms must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.colors.hue) {
            return Err(Error::InvalidConfig(format!(
                "hue {} outside [0, 1)",
                self.colors.hue
            )));
        }
        if !(0.5..=1.0).contains(&self.colors.saturation) {
            return Err(Error::InvalidConfig(format!(
                "saturation {} outside [0.5, 1]",
                self.colors.saturation
            )));
        }
        if matches!(self.initial_tool, ToolMode::Stop | ToolMode::FileMenu) {
            return Err(Error::InvalidConfig(format!(
                "{} cannot be the initial tool",
                self.initial_tool
            )));
        }
        if !ZOOM_LEVELS
            .iter()
            .any(|level| (level - self.magnification).abs() < common::EPSILON)
        {
            return Err(Error::InvalidConfig(format!(
                "magnification {} is not a zoom level",
                self.magnification
            )));
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let format = SerdeFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = format.deserialize(&text)?;
        config.validate()?;
        tracing::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    pub fn to_file(&self, path: &Path) -> Result<()> {
        let format = SerdeFormat::from_path(path)?;
        let text = format.serialize(self)?;
        std::fs::write(path, text).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::test_utils::test_output_path;

    #[test]
    fn default_values() {
        let config = SessionConfig::default();
        assert_eq!(config.gestures.double_click_window(), Duration::from_millis(250));
        assert_eq!(config.gestures.clear_all_window(), Duration::from_millis(500));
        assert_eq!(config.initial_tool, ToolMode::AddPoint);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_stop_as_initial_tool() {
        let config = SessionConfig {
            initial_tool: ToolMode::Stop,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_off_ladder_magnification() {
        let config = SessionConfig {
            magnification: 1.7,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            magnification: 0.75,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_uses_defaults() -> anyhow::Result<()> {
        let yaml = "gestures:\n  clear_all_ms: 800\ninitial_tool: MovePoint\n";
        let config: SessionConfig = SerdeFormat::Yaml.deserialize(yaml)?;
        assert_eq!(config.gestures.clear_all_ms, 800);
        assert_eq!(config.gestures.double_click_ms, 250);
        assert_eq!(config.initial_tool, ToolMode::MovePoint);
        Ok(())
    }

    #[test]
    fn file_round_trip() -> anyhow::Result<()> {
        let path = test_output_path("session_config_round_trip.json");
        let config = SessionConfig {
            magnification: 2.0,
            ..Default::default()
        };
        config.to_file(&path)?;
        assert_eq!(SessionConfig::from_file(&path)?, config);
        Ok(())
    }
}
