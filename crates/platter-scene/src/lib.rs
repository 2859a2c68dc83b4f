//! Platter Scene - embedded 3D scene and shared UI painting
//!
//! This crate owns everything the viewer draws that is not plain layout:
//! the scene camera rendered into the detail view's scene area, lighting,
//! glTF model loading and the rotation of the scene root, plus the egui
//! painting helpers for tiles and the detail frame.

pub mod camera;
pub mod models;
pub mod scene;
pub mod types;
pub mod ui;

use bevy::prelude::*;

/// Plugin that sets up the embedded 3D scene
///
/// Expects a [`Presentation`] resource; the default pose is used if none
/// was inserted before the plugin is added.
pub struct PlatterScenePlugin;

impl Plugin for PlatterScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Presentation>()
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(models::ModelsPlugin);
    }
}

// Re-export commonly used types
pub use types::*;
pub use camera::{SceneCamera, UiCamera};
pub use models::{ModelLibrary, SceneBinding};
pub use scene::ModelPivot;
