//! Bevy application setup

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy::winit::WinitSettings;
use bevy_egui::{EguiGlobalSettings, EguiPlugin};
use bevy_picking::DefaultPickingPlugins;
use platter_core::{Catalog, Settings};
use platter_scene::ui::Palette;
use platter_scene::{ModelLibrary, PlatterScenePlugin, Presentation};

use crate::gallery::Gallery;
use crate::ui::UiPlugin;

/// The catalog shown by the gallery, built once at startup
#[derive(Resource, Debug, Clone)]
pub struct ModelCatalog(pub Catalog);

/// Presentation settings the UI pass paints with
#[derive(Resource, Debug, Clone)]
pub struct ViewSettings {
    /// Navigation bar title
    pub title: String,
    pub palette: Palette,
}

impl ViewSettings {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            title: settings.window.title.clone(),
            palette: Palette::new(settings.window.background, settings.window.tile_color),
        }
    }
}

/// Run the Bevy application
pub fn run(settings: Settings, catalog: Catalog) -> AppExit {
    let [r, g, b] = settings.window.background;
    let asset_root = settings.assets.root.to_string_lossy().into_owned();

    App::new()
        .insert_resource(ClearColor(Color::srgb(r, g, b)))
        .insert_resource(WinitSettings::default())
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: settings.window.title.clone(),
                        resolution: WindowResolution::new(settings.window.width, settings.window.height),
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: asset_root,
                    // Bundled models ship without .meta files
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // Picking must be added before EguiPlugin so egui can detect it
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        // The UI camera carries the egui context explicitly
        .insert_resource(EguiGlobalSettings {
            auto_create_primary_context: false,
            ..default()
        })
        .insert_resource(Presentation::from(&settings.presentation))
        .insert_resource(Gallery::new(
            settings.transition.spring(),
            settings.rotation.snap_back_secs,
        ))
        .insert_resource(ViewSettings::from_settings(&settings))
        .insert_resource(ModelCatalog(catalog))
        .add_plugins(PlatterScenePlugin)
        .add_plugins(UiPlugin)
        .add_systems(Startup, preload_models)
        .add_systems(Update, advance_gallery)
        .run()
}

/// Start loading every bundled model so selection shows it without delay
fn preload_models(
    catalog: Res<ModelCatalog>,
    mut library: ResMut<ModelLibrary>,
    asset_server: Res<AssetServer>,
) {
    for asset in catalog.0.assets() {
        library.request(asset, &asset_server);
    }
    tracing::info!(models = catalog.0.assets().count(), "Preloading models");
}

fn advance_gallery(time: Res<Time>, mut gallery: ResMut<Gallery>) {
    if gallery.is_animating() {
        gallery.tick(time.delta_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_settings_from_defaults() {
        let settings = Settings::default();
        let view = ViewSettings::from_settings(&settings);
        assert_eq!(view.title, "Rotate the 3D models ♻️");
        assert_eq!(view.palette.text, bevy_egui::egui::Color32::WHITE);
    }
}
