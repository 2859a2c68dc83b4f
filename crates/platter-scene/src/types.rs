//! Messages and resources shared between the scene plugins and the viewer

use bevy::prelude::*;
use platter_core::settings::PresentationSettings;
use platter_core::{AssetRef, RotationCommand};

/// Attach a model to the scene root, or clear it with `None`
#[derive(Message, Debug, Clone)]
pub struct BindScene {
    pub asset: Option<AssetRef>,
}

/// Rotate the scene root
#[derive(Message, Debug, Clone, Copy)]
pub struct SetRotation(pub RotationCommand);

/// Where the scene is presented, in logical window pixels
///
/// `None` hides the scene camera.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneViewport {
    pub rect: Option<platter_core::Rect>,
}

/// Default pose applied on every bind, and the camera framing
#[derive(Resource, Debug, Clone)]
pub struct Presentation {
    /// Forward tilt about X in radians
    pub tilt: f32,
    pub scale: f32,
    pub camera_distance: f32,
    pub camera_height: f32,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::from(&PresentationSettings::default())
    }
}

impl From<&PresentationSettings> for Presentation {
    fn from(settings: &PresentationSettings) -> Self {
        Self {
            tilt: settings.tilt,
            scale: settings.scale,
            camera_distance: settings.camera_distance,
            camera_height: settings.camera_height,
        }
    }
}

/// Load status of a bundled model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStatus {
    Loading,
    Ready,
    /// Failed to load; shown as an empty scene
    Missing,
}
