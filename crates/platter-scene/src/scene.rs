//! Scene setup - default lighting and the pivot every model hangs from

use bevy::prelude::*;
use platter_core::Axis;

use crate::types::Presentation;

/// Marker component for the main directional light
#[derive(Component)]
pub struct MainDirectionalLight;

/// Root of the embedded scene; bound models are spawned as its children
#[derive(Component, Debug, Clone, Default)]
pub struct ModelPivot {
    /// Extra rotation about X, on top of the presentation tilt
    pub pitch: f32,
    /// Rotation about the vertical axis
    pub yaw: f32,
    pub roll: f32,
}

impl ModelPivot {
    pub fn angle(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.pitch,
            Axis::Y => self.yaw,
            Axis::Z => self.roll,
        }
    }

    pub fn set_angle(&mut self, axis: Axis, radians: f32) {
        match axis {
            Axis::X => self.pitch = radians,
            Axis::Y => self.yaw = radians,
            Axis::Z => self.roll = radians,
        }
    }

    /// Local transform for this pivot under a presentation pose
    ///
    /// The tilt is applied outermost so it stays fixed toward the camera
    /// while yaw spins the model about its own vertical axis.
    pub fn transform(&self, presentation: &Presentation) -> Transform {
        let rotation = Quat::from_rotation_x(presentation.tilt + self.pitch)
            * Quat::from_rotation_y(self.yaw)
            * Quat::from_rotation_z(self.roll);
        Transform::from_rotation(rotation).with_scale(Vec3::splat(presentation.scale))
    }
}

/// Plugin for lights and the model pivot
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

fn setup_scene(mut commands: Commands, presentation: Res<Presentation>) {
    // Key light from above and in front of the model
    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(1.5, 3.0, 2.5).looking_at(Vec3::ZERO, Vec3::Y),
        MainDirectionalLight,
    ));

    // Dim light from below-behind so the far side is never black
    commands.spawn((
        DirectionalLight {
            illuminance: 1500.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-1.0, -0.5, -2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Warm fill from the opposite side
    commands.spawn((
        PointLight {
            intensity: 150000.0,
            shadows_enabled: false,
            color: Color::srgb(1.0, 0.95, 0.9),
            ..default()
        },
        Transform::from_xyz(-2.0, 1.0, 2.0),
    ));

    let pivot = ModelPivot::default();
    commands.spawn((
        pivot.transform(&presentation),
        Visibility::default(),
        pivot,
    ));
}

/// Write pivot angles into its transform
pub(crate) fn apply_pivot_pose(
    presentation: Res<Presentation>,
    mut pivots: Query<(&ModelPivot, &mut Transform), Changed<ModelPivot>>,
) {
    for (pivot, mut transform) in &mut pivots {
        *transform = pivot.transform(&presentation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pose_tilts_and_scales() {
        let presentation = Presentation::default();
        let transform = ModelPivot::default().transform(&presentation);
        assert_eq!(transform.scale, Vec3::splat(1.28));

        let (axis, angle) = transform.rotation.to_axis_angle();
        assert!((angle - 0.1 * std::f32::consts::PI).abs() < 1e-4);
        assert!((axis - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_yaw_rotates_about_vertical_axis() {
        let presentation = Presentation {
            tilt: 0.0,
            ..Presentation::default()
        };
        let pivot = ModelPivot {
            yaw: 90f32.to_radians(),
            ..default()
        };
        let transform = pivot.transform(&presentation);
        let forward = transform.rotation * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_tilt_stays_toward_camera_when_yawed() {
        let presentation = Presentation::default();
        for degrees in [0.0f32, 90.0, 180.0, 270.0] {
            let pivot = ModelPivot {
                yaw: degrees.to_radians(),
                ..default()
            };
            let up = pivot.transform(&presentation).rotation * Vec3::Y;
            assert!(up.z > 0.0, "up {:?} leans away at {} degrees", up, degrees);
            assert!((up.z - presentation.tilt.sin()).abs() < 1e-4);
        }
    }
}
