//! Application settings loaded from TOML
//!
//! Every field has a default so a partial (or missing) file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::animation::Spring;
use crate::catalog::AssetLayout;
use crate::rotation::DEFAULT_SNAP_BACK_SECS;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub assets: AssetSettings,
    #[serde(default)]
    pub transition: TransitionSettings,
    #[serde(default)]
    pub rotation: RotationSettings,
    #[serde(default)]
    pub presentation: PresentationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSettings {
    /// Window title and navigation bar text
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Background colour as sRGB (0.0-1.0)
    #[serde(default = "default_background")]
    pub background: [f32; 3],
    /// Fill colour of grid cells and the detail frame
    #[serde(default = "default_tile_color")]
    pub tile_color: [f32; 3],
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            background: default_background(),
            tile_color: default_tile_color(),
        }
    }
}

fn default_title() -> String {
    "Rotate the 3D models ♻️".to_string()
}

fn default_width() -> u32 {
    480
}

fn default_height() -> u32 {
    860
}

fn default_background() -> [f32; 3] {
    [0.05, 0.05, 0.07]
}

fn default_tile_color() -> [f32; 3] {
    [0.16, 0.17, 0.2]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSettings {
    /// Asset root directory
    #[serde(default = "default_asset_root")]
    pub root: PathBuf,
    /// Directory of model files below the root
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
    /// Model file extension
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            root: default_asset_root(),
            models_dir: default_models_dir(),
            extension: default_extension(),
        }
    }
}

impl AssetSettings {
    pub fn layout(&self) -> AssetLayout {
        AssetLayout {
            root: self.root.clone(),
            models_dir: self.models_dir.clone(),
            extension: self.extension.clone(),
        }
    }
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_models_dir() -> String {
    "models".to_string()
}

fn default_extension() -> String {
    "glb".to_string()
}

/// Spring used for the grid/detail transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSettings {
    #[serde(default = "default_response")]
    pub response: f32,
    #[serde(default = "default_damping_fraction")]
    pub damping_fraction: f32,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            response: default_response(),
            damping_fraction: default_damping_fraction(),
        }
    }
}

impl TransitionSettings {
    pub fn spring(&self) -> Spring {
        Spring::new(self.response, self.damping_fraction)
    }
}

fn default_response() -> f32 {
    0.5
}

fn default_damping_fraction() -> f32 {
    0.7
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationSettings {
    /// Seconds to ease back to zero after a drag
    #[serde(default = "default_snap_back")]
    pub snap_back_secs: f32,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            snap_back_secs: default_snap_back(),
        }
    }
}

fn default_snap_back() -> f32 {
    DEFAULT_SNAP_BACK_SECS
}

/// Default pose of a freshly bound model and the camera framing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationSettings {
    /// Forward tilt about X in radians
    #[serde(default = "default_tilt")]
    pub tilt: f32,
    /// Uniform scale
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_camera_distance")]
    pub camera_distance: f32,
    #[serde(default = "default_camera_height")]
    pub camera_height: f32,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            tilt: default_tilt(),
            scale: default_scale(),
            camera_distance: default_camera_distance(),
            camera_height: default_camera_height(),
        }
    }
}

fn default_tilt() -> f32 {
    0.1 * std::f32::consts::PI
}

fn default_scale() -> f32 {
    1.28
}

fn default_camera_distance() -> f32 {
    3.0
}

fn default_camera_height() -> f32 {
    0.4
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let settings = Self::from_toml(&content)?;
            info!(path = %path.display(), "Loaded settings");
            Ok(settings)
        } else {
            info!(
                path = %path.display(),
                "Settings file not found, using defaults"
            );
            Ok(Self::default())
        }
    }

    /// Write the default settings to a file
    pub fn save_default(path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(&Self::default())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(SettingsError::Invalid {
                field: "window",
                reason: "width and height must be non-zero".to_string(),
            });
        }
        if self.transition.response <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "transition.response",
                reason: format!("must be positive, got {}", self.transition.response),
            });
        }
        if self.rotation.snap_back_secs < 0.0 {
            return Err(SettingsError::Invalid {
                field: "rotation.snap_back_secs",
                reason: format!("must not be negative, got {}", self.rotation.snap_back_secs),
            });
        }
        if self.presentation.scale <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "presentation.scale",
                reason: format!("must be positive, got {}", self.presentation.scale),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.transition.spring(), Spring::new(0.5, 0.7));
        assert_eq!(settings.rotation.snap_back_secs, 0.36);
        assert_eq!(settings.presentation.scale, 1.28);
        assert!((settings.presentation.tilt - 0.314_159).abs() < 1e-4);
        assert_eq!(settings.assets.layout().asset_path("pizza"), "models/pizza.glb");
    }

    #[test]
    fn test_partial_file() {
        let toml = r#"
[window]
title = "Food"

[rotation]
snap_back_secs = 0.5
"#;
        let settings = Settings::from_toml(toml).unwrap();
        assert_eq!(settings.window.title, "Food");
        assert_eq!(settings.window.width, 480);
        assert_eq!(settings.rotation.snap_back_secs, 0.5);
        assert_eq!(settings.assets, AssetSettings::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_toml("[transition]\nresponse = 0.0\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "transition.response", .. }));

        let err = Settings::from_toml("[window]\nwidth = 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "window", .. }));

        let err = Settings::from_toml("[window]\nwidth = \"wide\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::ParseError(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platter.toml");
        Settings::save_default(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, Settings::default());
    }
}
