//! glTF model loading, binding to the scene root, and root rotation

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use platter_core::{AssetRef, Axis, Tween};
use std::collections::HashMap;

use crate::scene::{apply_pivot_pose, ModelPivot};
use crate::types::{BindScene, ModelStatus, SetRotation};

/// Component marking the model currently attached to the pivot
#[derive(Component, Debug)]
pub struct BoundModel {
    pub asset: AssetRef,
}

/// In-flight eased rotation of the pivot about one axis
#[derive(Component, Debug, Clone)]
pub struct RotationTween {
    pub axis: Axis,
    pub tween: Tween,
}

impl RotationTween {
    /// Advance and write the new angle into `pivot`; returns true once finished
    pub fn step(&mut self, pivot: &mut ModelPivot, dt: f32) -> bool {
        let angle = self.tween.advance(dt);
        pivot.set_angle(self.axis, angle);
        self.tween.is_finished()
    }
}

struct ModelSlot {
    gltf: Handle<Gltf>,
    scene: Option<Handle<Scene>>,
    status: ModelStatus,
}

/// Cache of requested models and their load status
#[derive(Resource, Default)]
pub struct ModelLibrary {
    slots: HashMap<AssetRef, ModelSlot>,
}

impl ModelLibrary {
    /// Start loading a model unless it was already requested
    pub fn request(&mut self, asset: &AssetRef, asset_server: &AssetServer) {
        if self.slots.contains_key(asset) {
            return;
        }
        tracing::info!("Starting to load model: {}", asset);
        let gltf: Handle<Gltf> = asset_server.load(asset.as_str().to_string());
        self.insert_loading(asset.clone(), gltf);
    }

    fn insert_loading(&mut self, asset: AssetRef, gltf: Handle<Gltf>) {
        self.slots.insert(
            asset,
            ModelSlot {
                gltf,
                scene: None,
                status: ModelStatus::Loading,
            },
        );
    }

    fn mark_ready(&mut self, asset: &AssetRef, scene: Handle<Scene>) {
        if let Some(slot) = self.slots.get_mut(asset) {
            slot.scene = Some(scene);
            slot.status = ModelStatus::Ready;
        }
    }

    fn mark_missing(&mut self, asset: &AssetRef) {
        if let Some(slot) = self.slots.get_mut(asset) {
            slot.scene = None;
            slot.status = ModelStatus::Missing;
        }
    }

    /// Status of a model, `None` if it was never requested
    pub fn status(&self, asset: &AssetRef) -> Option<ModelStatus> {
        self.slots.get(asset).map(|slot| slot.status)
    }

    /// Scene handle of a ready model
    pub fn scene(&self, asset: &AssetRef) -> Option<Handle<Scene>> {
        self.slots.get(asset).and_then(|slot| slot.scene.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.slots.values().any(|slot| slot.status == ModelStatus::Loading)
    }
}

/// What the scene root should currently show
#[derive(Resource, Debug, Default)]
pub struct SceneBinding {
    pub asset: Option<AssetRef>,
    /// Whether the bind has been resolved (model spawned or found missing)
    resolved: bool,
}

impl SceneBinding {
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }
}

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelLibrary>()
            .init_resource::<SceneBinding>()
            .add_message::<BindScene>()
            .add_message::<SetRotation>()
            .add_systems(
                Update,
                (
                    poll_model_loads,
                    handle_bind_requests,
                    attach_bound_model,
                    handle_rotation_requests,
                    tick_rotation_tweens,
                    apply_pivot_pose,
                )
                    .chain(),
            );
    }
}

/// Check loading state and extract scenes from loaded glTFs
fn poll_model_loads(
    mut library: ResMut<ModelLibrary>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
) {
    if !library.is_loading() {
        return;
    }

    let loading: Vec<(AssetRef, Handle<Gltf>)> = library
        .slots
        .iter()
        .filter(|(_, slot)| slot.status == ModelStatus::Loading)
        .map(|(asset, slot)| (asset.clone(), slot.gltf.clone()))
        .collect();

    for (asset, handle) in loading {
        match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => {
                let scene = gltf_assets.get(&handle).and_then(|gltf| {
                    gltf.default_scene
                        .clone()
                        .or_else(|| gltf.scenes.first().cloned())
                });
                match scene {
                    Some(scene) => {
                        tracing::info!("Model loaded: {}", asset);
                        library.mark_ready(&asset, scene);
                    }
                    None => {
                        tracing::warn!("Model {} has no scenes, showing an empty scene", asset);
                        library.mark_missing(&asset);
                    }
                }
            }
            Some(LoadState::Failed(err)) => {
                tracing::warn!("Failed to load model {}: {}", asset, err);
                library.mark_missing(&asset);
            }
            _ => {
                // Still loading
            }
        }
    }
}

/// Apply the latest bind request: clear the pivot and reset its pose
fn handle_bind_requests(
    mut commands: Commands,
    mut requests: MessageReader<BindScene>,
    mut binding: ResMut<SceneBinding>,
    bound: Query<Entity, With<BoundModel>>,
    mut pivots: Query<(Entity, &mut ModelPivot)>,
) {
    // Only the last request of the frame matters
    let Some(request) = requests.read().last().cloned() else {
        return;
    };

    for entity in &bound {
        commands.entity(entity).despawn();
    }

    for (entity, mut pivot) in &mut pivots {
        *pivot = ModelPivot::default();
        commands.entity(entity).remove::<RotationTween>();
    }

    match &request.asset {
        Some(asset) => tracing::debug!("Binding scene: {}", asset),
        None => tracing::debug!("Unbinding scene"),
    }
    binding.asset = request.asset;
    binding.resolved = binding.asset.is_none();
}

/// Spawn the bound model under the pivot once it is ready
fn attach_bound_model(
    mut commands: Commands,
    mut binding: ResMut<SceneBinding>,
    mut library: ResMut<ModelLibrary>,
    asset_server: Res<AssetServer>,
    pivots: Query<Entity, With<ModelPivot>>,
) {
    if binding.resolved {
        return;
    }
    let Some(asset) = binding.asset.clone() else {
        binding.resolved = true;
        return;
    };
    let Ok(pivot) = pivots.single() else { return };

    match library.status(&asset) {
        None => library.request(&asset, &asset_server),
        Some(ModelStatus::Loading) => {
            // Wait for next frame
        }
        Some(ModelStatus::Missing) => {
            tracing::warn!("Model {} unavailable, scene area left empty", asset);
            binding.resolved = true;
        }
        Some(ModelStatus::Ready) => {
            if let Some(scene) = library.scene(&asset) {
                tracing::info!("Attaching model {}", asset);
                let child = commands
                    .spawn((SceneRoot(scene), Transform::default(), BoundModel { asset }))
                    .id();
                commands.entity(pivot).add_child(child);
            }
            binding.resolved = true;
        }
    }
}

fn handle_rotation_requests(
    mut commands: Commands,
    mut requests: MessageReader<SetRotation>,
    mut pivots: Query<(Entity, &mut ModelPivot)>,
) {
    for SetRotation(command) in requests.read() {
        for (entity, mut pivot) in &mut pivots {
            match command.animation {
                Some(animation) => {
                    let from = pivot.angle(command.axis);
                    commands.entity(entity).insert(RotationTween {
                        axis: command.axis,
                        tween: Tween::new(from, command.radians, animation),
                    });
                }
                None => {
                    pivot.set_angle(command.axis, command.radians);
                    commands.entity(entity).remove::<RotationTween>();
                }
            }
        }
    }
}

fn tick_rotation_tweens(
    mut commands: Commands,
    time: Res<Time>,
    mut tweens: Query<(Entity, &mut ModelPivot, &mut RotationTween)>,
) {
    let dt = time.delta_secs();
    for (entity, mut pivot, mut tween) in &mut tweens {
        if tween.step(&mut pivot, dt) {
            commands.entity(entity).remove::<RotationTween>();
        }
    }
}
