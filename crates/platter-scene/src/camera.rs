//! Cameras: a UI camera carrying egui, and a scene camera drawn into a sub-rectangle

use bevy::camera::{ClearColorConfig, Viewport};
use bevy::prelude::*;
use bevy_egui::PrimaryEguiContext;

use crate::types::{Presentation, SceneViewport};

/// Marker component for the camera rendering the embedded model
#[derive(Component)]
pub struct SceneCamera;

/// Marker component for the camera carrying the egui context
#[derive(Component)]
pub struct UiCamera;

/// Plugin for camera setup and viewport tracking
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneViewport>()
            .add_systems(Startup, spawn_cameras)
            .add_systems(PostUpdate, sync_scene_viewport);
    }
}

fn spawn_cameras(mut commands: Commands, presentation: Res<Presentation>) {
    // UI first: clears the window and draws egui
    commands.spawn((
        Camera2d,
        Camera {
            order: 0,
            ..default()
        },
        PrimaryEguiContext,
        UiCamera,
    ));

    // Scene on top, restricted to the detail view's scene area
    commands.spawn((
        Camera3d::default(),
        Camera {
            order: 1,
            is_active: false,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        Transform::from_xyz(0.0, presentation.camera_height, presentation.camera_distance)
            .looking_at(Vec3::ZERO, Vec3::Y),
        SceneCamera,
    ));
}

/// Convert a logical rect to a physical viewport clamped to the window
///
/// Returns `None` when nothing of the rect is visible.
pub fn physical_viewport(
    rect: &platter_core::Rect,
    scale_factor: f32,
    window_size: UVec2,
) -> Option<(UVec2, UVec2)> {
    let to_px = |v: f32| (v * scale_factor).round().max(0.0) as u32;
    let x0 = to_px(rect.min_x()).min(window_size.x);
    let y0 = to_px(rect.min_y()).min(window_size.y);
    let x1 = to_px(rect.max_x()).min(window_size.x);
    let y1 = to_px(rect.max_y()).min(window_size.y);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((UVec2::new(x0, y0), UVec2::new(x1 - x0, y1 - y0)))
}

fn sync_scene_viewport(
    scene_viewport: Res<SceneViewport>,
    windows: Query<&Window>,
    mut cameras: Query<&mut Camera, With<SceneCamera>>,
) {
    let Ok(window) = windows.single() else { return };
    let Ok(mut camera) = cameras.single_mut() else { return };

    let window_size = UVec2::new(window.physical_width(), window.physical_height());
    let physical = scene_viewport
        .rect
        .and_then(|rect| physical_viewport(&rect, window.scale_factor(), window_size));

    match physical {
        Some((position, size)) => {
            let unchanged = camera.is_active
                && camera
                    .viewport
                    .as_ref()
                    .is_some_and(|v| v.physical_position == position && v.physical_size == size);
            if !unchanged {
                camera.viewport = Some(Viewport {
                    physical_position: position,
                    physical_size: size,
                    ..default()
                });
                camera.is_active = true;
            }
        }
        None => {
            if camera.is_active {
                camera.is_active = false;
            }
        }
    }
}
