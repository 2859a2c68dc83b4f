//! Gallery UI using bevy_egui
//!
//! One pass per frame paints either the settled layout or the in-flight
//! transition frame, then routes taps, drags, wheel scrolling and Escape
//! back into the [`Gallery`].

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use platter_core::{ElementId, ElementRole, FrameElement, Rect, SelectionChange, ViewState};
use platter_scene::ui::{
    from_egui_rect, paint_close_control, paint_rotation_control, paint_scene_notice, paint_shape, paint_title,
    to_egui_rect, Palette,
};
use platter_scene::{BindScene, ModelLibrary, ModelStatus, SceneViewport, SetRotation};

use crate::app::{ModelCatalog, ViewSettings};
use crate::gallery::Gallery;

/// Height of the navigation bar title text
const NAV_TITLE_SIZE: f32 = 22.0;

/// Grouped system parameters for the gallery UI system
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub catalog: Res<'w, ModelCatalog>,
    pub view: Res<'w, ViewSettings>,
    pub gallery: ResMut<'w, Gallery>,
    pub library: Res<'w, ModelLibrary>,
    pub scene_viewport: ResMut<'w, SceneViewport>,
    pub bind_scene: MessageWriter<'w, BindScene>,
    pub set_rotation: MessageWriter<'w, SetRotation>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, gallery_ui);
    }
}

fn gallery_ui(mut params: UiParams) {
    let Ok(ctx) = params.contexts.ctx_mut() else { return };
    let ctx = ctx.clone();

    egui::TopBottomPanel::top("nav_bar")
        .frame(egui::Frame::NONE.inner_margin(egui::Margin::symmetric(12, 10)))
        .show_separator_line(false)
        .show(&ctx, |ui| {
            ui.label(
                egui::RichText::new(&params.view.title)
                    .size(NAV_TITLE_SIZE)
                    .strong()
                    .color(params.view.palette.text),
            );
        });

    // No fill: the scene camera draws into a hole in this panel
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(&ctx, |ui| {
            let area = from_egui_rect(ui.max_rect());
            gallery_area(ui, &mut params, &area);
        });
}

fn gallery_area(ui: &mut egui::Ui, params: &mut UiParams, area: &Rect) {
    let catalog = &params.catalog.0;
    params.gallery.fit(catalog, area);

    // Escape closes the detail view
    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        if let Some(change) = params.gallery.close(catalog, area) {
            apply_selection_change(&change, &mut params.bind_scene);
        }
    }

    let area_response = ui.interact(to_egui_rect(area), ui.id().with("gallery_area"), egui::Sense::click());
    if area_response.hovered() {
        let wheel = ui.input(|i| i.smooth_scroll_delta.y);
        if wheel != 0.0 {
            params.gallery.scroll_by(-wheel, catalog, area);
        }
    }
    if area_response.clicked() {
        if let Some(pos) = area_response.interact_pointer_pos() {
            let tapped = params.gallery.entry_at(catalog, area, pos.x, pos.y).cloned();
            if let Some(entry) = tapped {
                if let Some(change) = params.gallery.select(catalog, &entry, area) {
                    apply_selection_change(&change, &mut params.bind_scene);
                }
            }
        }
    }

    let frame = params.gallery.frame(catalog, area);
    let scene_rect = params.gallery.scene_rect(catalog, area);
    let centering = params.gallery.title_centering();
    let painter = ui.painter_at(to_egui_rect(area));
    let palette = params.view.palette;

    for element in &frame {
        if element.opacity <= 0.0 {
            continue;
        }
        match &element.key {
            ElementId::Correlated(key) => {
                let Some(entry) = catalog.get(key.identifier()) else { continue };
                match key.role() {
                    ElementRole::Shape => {
                        paint_shape(&painter, &element.rect, scene_rect.as_ref(), &palette, element.opacity)
                    }
                    ElementRole::Title => {
                        paint_title(&painter, &element.rect, &entry.name, centering, &palette, element.opacity)
                    }
                }
            }
            ElementId::CloseControl => {
                let close = close_control(ui, &params.gallery, &painter, &palette, element);
                if close {
                    if let Some(change) = params.gallery.close(catalog, area) {
                        apply_selection_change(&change, &mut params.bind_scene);
                    }
                }
            }
            ElementId::SceneArea => {
                if let Some(notice) = scene_notice(&params.gallery, &params.library) {
                    paint_scene_notice(&painter, &element.rect, notice, &palette, element.opacity);
                }
            }
            ElementId::RotationControl => {
                rotation_control(ui, &mut params.gallery, &mut params.set_rotation, &painter, &palette, element)
            }
        }
    }

    params.scene_viewport.rect = scene_rect;
}

/// Paint the close control; returns true when it was tapped
fn close_control(
    ui: &egui::Ui,
    gallery: &Gallery,
    painter: &egui::Painter,
    palette: &Palette,
    element: &FrameElement<ElementId>,
) -> bool {
    let response = ui.interact(to_egui_rect(&element.rect), ui.id().with("close"), egui::Sense::click());
    let interactive = gallery.state().is_expanded() && element.opacity >= 0.5;
    paint_close_control(
        painter,
        &element.rect,
        interactive && response.hovered(),
        palette,
        element.opacity,
    );
    interactive && response.clicked()
}

fn rotation_control(
    ui: &egui::Ui,
    gallery: &mut Gallery,
    set_rotation: &mut MessageWriter<SetRotation>,
    painter: &egui::Painter,
    palette: &Palette,
    element: &FrameElement<ElementId>,
) {
    let rect = element.rect.translate(gallery.control_offset(), 0.0);
    paint_rotation_control(painter, &rect, palette, element.opacity);

    if !gallery.state().is_expanded() {
        return;
    }
    let response = ui.interact(to_egui_rect(&rect), ui.id().with("rotation_control"), egui::Sense::drag());

    if response.drag_started() {
        // Measure from where the press began, not where the drag was recognised
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .or(response.interact_pointer_pos());
        if let Some(origin) = origin {
            gallery.begin_drag(origin.x);
        }
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            if let Some(command) = gallery.drag_to(pos.x) {
                set_rotation.write(SetRotation(command));
            }
        }
    }
    if response.drag_stopped() {
        if let Some(command) = gallery.end_drag() {
            set_rotation.write(SetRotation(command));
        }
    }
}

/// Text for an expanded entry whose model cannot be shown
fn scene_notice(gallery: &Gallery, library: &ModelLibrary) -> Option<&'static str> {
    let ViewState::Expanded(entry) = gallery.state() else {
        return None;
    };
    let Some(asset) = &entry.asset else {
        return Some("Model unavailable");
    };
    match library.status(asset) {
        Some(ModelStatus::Ready) => None,
        Some(ModelStatus::Missing) => Some("Model unavailable"),
        Some(ModelStatus::Loading) | None => Some("Loading…"),
    }
}

/// Rebind the scene after a selection change
fn apply_selection_change(change: &SelectionChange, bind_scene: &mut MessageWriter<BindScene>) {
    bind_scene.write(BindScene {
        asset: change.scene_binding().cloned(),
    });
}
