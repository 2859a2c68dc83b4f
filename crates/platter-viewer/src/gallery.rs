//! Gallery state driven by the UI pass
//!
//! Ties the selection machine, the transition engine and the rotation
//! controller together so the egui pass only has to paint what this hands
//! it and forward input back.

use bevy::prelude::*;
use platter_core::layout::{detail_layout, grid_layout};
use platter_core::{
    Catalog, CatalogEntry, DetailMetrics, ElementId, ElementRole, FrameElement, GridMetrics, LayoutElement,
    Phase, Rect, RotationCommand, RotationController, SelectionChange, SelectionMachine, Spring, Transition,
    Tween, ViewState,
};

/// Minimum opacity at which an element takes input or shows the scene
const VISIBLE_THRESHOLD: f32 = 0.5;

#[derive(Resource, Debug, Clone)]
pub struct Gallery {
    selection: SelectionMachine,
    rotation: RotationController,
    /// Eases the rotation control back to rest after a drag
    control_return: Option<Tween>,
    transition: Option<Transition<ElementId>>,
    /// Area the in-flight transition's destination was laid out for
    transition_area: Option<Rect>,
    /// Title centering when the in-flight transition began
    centering_from: f32,
    spring: Spring,
    scroll: f32,
    grid: GridMetrics,
    detail: DetailMetrics,
}

impl Gallery {
    pub fn new(spring: Spring, snap_back_secs: f32) -> Self {
        Self {
            selection: SelectionMachine::new(),
            rotation: RotationController::new(snap_back_secs),
            control_return: None,
            transition: None,
            transition_area: None,
            centering_from: 0.5,
            spring,
            scroll: 0.0,
            grid: GridMetrics::default(),
            detail: DetailMetrics::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        self.selection.state()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some() || self.control_return.is_some()
    }

    /// Settled layout of the current state
    pub fn layout(&self, catalog: &Catalog, area: &Rect) -> Vec<LayoutElement> {
        match self.selection.state() {
            ViewState::Collapsed => grid_layout(catalog, area, &self.grid, self.scroll),
            ViewState::Expanded(entry) => detail_layout(entry, area, &self.detail),
        }
    }

    /// What to draw this frame: the in-flight transition or the settled layout
    pub fn frame(&self, catalog: &Catalog, area: &Rect) -> Vec<FrameElement<ElementId>> {
        match &self.transition {
            Some(transition) => transition.frame(),
            None => self
                .layout(catalog, area)
                .into_iter()
                .map(|e| FrameElement {
                    key: e.id,
                    rect: e.rect,
                    opacity: 1.0,
                    phase: Phase::Matched,
                })
                .collect(),
        }
    }

    /// Select `entry` and animate into its detail layout
    pub fn select(&mut self, catalog: &Catalog, entry: &CatalogEntry, area: &Rect) -> Option<SelectionChange> {
        let previous = self.layout(catalog, area);
        let centering = self.title_centering();
        let change = self.selection.select(entry)?;
        self.reset_rotation();
        self.retarget(previous, self.layout(catalog, area), centering, area);
        Some(change)
    }

    /// Close the detail view and animate back to the grid
    pub fn close(&mut self, catalog: &Catalog, area: &Rect) -> Option<SelectionChange> {
        let previous = self.layout(catalog, area);
        let centering = self.title_centering();
        let change = self.selection.deselect()?;
        self.reset_rotation();
        self.retarget(previous, self.layout(catalog, area), centering, area);
        Some(change)
    }

    fn retarget(&mut self, previous: Vec<LayoutElement>, next: Vec<LayoutElement>, centering: f32, area: &Rect) {
        let next = keyed(next);
        let transition = match self.transition.take() {
            Some(in_flight) => in_flight.redirect(next),
            None => Transition::new(keyed(previous), next, self.spring),
        };
        self.transition = Some(transition);
        self.transition_area = Some(*area);
        self.centering_from = centering;
    }

    /// Follow a change of the available area, e.g. a window resize
    ///
    /// An in-flight transition keeps its clock and heads for the layout of
    /// the new area; the grid scroll is clamped to the new content bounds.
    pub fn fit(&mut self, catalog: &Catalog, area: &Rect) {
        self.scroll = self.grid.clamp_scroll(self.scroll, area, catalog.len());
        if self.transition.is_none() || self.transition_area.as_ref() == Some(area) {
            return;
        }
        let next = keyed(self.layout(catalog, area));
        if let Some(transition) = &mut self.transition {
            transition.set_target(next);
        }
        self.transition_area = Some(*area);
    }

    fn reset_rotation(&mut self) {
        self.rotation.reset();
        self.control_return = None;
    }

    /// Advance animations by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if let Some(transition) = &mut self.transition {
            transition.advance(dt);
            if transition.is_settled() {
                self.transition = None;
                self.transition_area = None;
            }
        }
        if let Some(tween) = &mut self.control_return {
            tween.advance(dt);
            if tween.is_finished() {
                self.control_return = None;
            }
        }
    }

    /// Scroll the grid; ignored outside the settled grid
    pub fn scroll_by(&mut self, delta: f32, catalog: &Catalog, area: &Rect) {
        if self.selection.state().is_expanded() || self.transition.is_some() {
            return;
        }
        self.scroll = self.grid.clamp_scroll(self.scroll + delta, area, catalog.len());
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Entry whose tile is under `(x, y)`, if the grid is showing
    pub fn entry_at<'a>(&self, catalog: &'a Catalog, area: &Rect, x: f32, y: f32) -> Option<&'a CatalogEntry> {
        if self.selection.state().is_expanded() {
            return None;
        }
        // Topmost tile wins, so search back to front
        self.frame(catalog, area)
            .into_iter()
            .rev()
            .filter(|e| e.opacity >= VISIBLE_THRESHOLD && area.contains(x, y) && e.rect.contains(x, y))
            .find_map(|e| match e.key {
                ElementId::Correlated(key) if key.role() == ElementRole::Shape => catalog.get(key.identifier()),
                _ => None,
            })
    }

    /// Where the embedded scene should be drawn, if anywhere
    pub fn scene_rect(&self, catalog: &Catalog, area: &Rect) -> Option<Rect> {
        self.frame(catalog, area)
            .into_iter()
            .find(|e| e.key == ElementId::SceneArea)
            .filter(|e| e.opacity > VISIBLE_THRESHOLD)
            .map(|e| e.rect)
    }

    /// How far titles are pulled towards the centre of their rect (0 = leading)
    ///
    /// Grid titles are centred and the detail title is leading, so this eases
    /// between the two while a transition runs, starting from wherever the
    /// title was when the transition began.
    pub fn title_centering(&self) -> f32 {
        let target = if self.selection.state().is_expanded() { 0.0 } else { 0.5 };
        match &self.transition {
            Some(transition) => {
                let from = self.centering_from;
                from + (target - from) * transition.progress()
            }
            None => target,
        }
    }

    pub fn begin_drag(&mut self, origin_x: f32) {
        if !self.selection.state().is_expanded() {
            return;
        }
        self.control_return = None;
        self.rotation.begin(origin_x);
    }

    pub fn drag_to(&mut self, pointer_x: f32) -> Option<RotationCommand> {
        self.rotation.update(pointer_x)
    }

    pub fn end_drag(&mut self) -> Option<RotationCommand> {
        let offset = self.rotation.offset();
        let command = self.rotation.end()?;
        self.control_return = Some(Tween::new(offset, 0.0, self.rotation.snap_back()));
        Some(command)
    }

    pub fn is_dragging(&self) -> bool {
        self.rotation.is_dragging()
    }

    /// Horizontal displacement of the rotation control
    pub fn control_offset(&self) -> f32 {
        if self.rotation.is_dragging() {
            return self.rotation.offset();
        }
        self.control_return.as_ref().map_or(0.0, Tween::value)
    }
}

fn keyed(layout: Vec<LayoutElement>) -> Vec<(ElementId, Rect)> {
    layout.into_iter().map(|e| (e.id, e.rect)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use platter_core::layout::find_rect;
    use platter_core::{AssetRef, Axis};

    fn catalog() -> Catalog {
        Catalog::build_with(|id| (id != "gyoza").then(|| AssetRef(format!("models/{}.glb", id))))
    }

    fn area() -> Rect {
        Rect::new(0.0, 40.0, 400.0, 700.0)
    }

    fn gallery() -> Gallery {
        Gallery::new(Spring::default(), 0.36)
    }

    fn settle(gallery: &mut Gallery) {
        for _ in 0..300 {
            gallery.tick(1.0 / 60.0);
        }
        assert!(!gallery.is_animating());
    }

    #[test]
    fn test_select_animates_shared_elements() {
        let catalog = catalog();
        let mut gallery = gallery();
        let burger = catalog.get("burger").unwrap();
        let shape = ElementId::Correlated(burger.shape_key());
        let cell = find_rect(&gallery.layout(&catalog, &area()), &shape).unwrap();

        let change = gallery.select(&catalog, burger, &area()).unwrap();
        assert_eq!(change.scene_binding(), burger.asset.as_ref());
        assert!(gallery.state().is_expanded());

        // First frame still shows the tile where it was
        let frame = gallery.frame(&catalog, &area());
        let start = frame.iter().find(|e| e.key == shape).unwrap();
        assert_eq!(start.rect, cell);
        assert_eq!(start.phase, Phase::Matched);

        settle(&mut gallery);
        let detail = find_rect(&gallery.layout(&catalog, &area()), &shape).unwrap();
        assert_eq!(detail.width, area().width);
        assert!(gallery.scene_rect(&catalog, &area()).is_some());
    }

    #[test]
    fn test_select_while_expanded_is_ignored() {
        let catalog = catalog();
        let mut gallery = gallery();
        gallery.select(&catalog, catalog.get("burger").unwrap(), &area());
        assert!(gallery.select(&catalog, catalog.get("pizza").unwrap(), &area()).is_none());
        assert_eq!(gallery.state().selected().unwrap().identifier, "burger");
    }

    #[test]
    fn test_close_returns_to_grid() {
        let catalog = catalog();
        let mut gallery = gallery();
        gallery.select(&catalog, catalog.get("thai").unwrap(), &area());
        settle(&mut gallery);

        let change = gallery.close(&catalog, &area()).unwrap();
        assert!(change.scene_binding().is_none());
        assert_eq!(gallery.state(), &ViewState::Collapsed);
        assert!(gallery.close(&catalog, &area()).is_none());

        settle(&mut gallery);
        assert!(gallery.scene_rect(&catalog, &area()).is_none());
    }

    #[test]
    fn test_close_mid_flight_starts_from_current_geometry() {
        let catalog = catalog();
        let mut gallery = gallery();
        let pizza = catalog.get("pizza").unwrap();
        let shape = ElementId::Correlated(pizza.shape_key());

        gallery.select(&catalog, pizza, &area());
        gallery.tick(0.1);
        let in_flight = gallery
            .frame(&catalog, &area())
            .into_iter()
            .find(|e| e.key == shape)
            .unwrap()
            .rect;

        gallery.close(&catalog, &area());
        let reversed = gallery
            .frame(&catalog, &area())
            .into_iter()
            .find(|e| e.key == shape)
            .unwrap()
            .rect;
        assert_eq!(reversed, in_flight);
    }

    #[test]
    fn test_missing_asset_still_expands() {
        let catalog = catalog();
        let mut gallery = gallery();
        let gyoza = catalog.get("gyoza").unwrap();
        let change = gallery.select(&catalog, gyoza, &area()).unwrap();
        assert!(change.scene_binding().is_none());
        settle(&mut gallery);
        assert!(gallery.scene_rect(&catalog, &area()).is_some());
    }

    #[test]
    fn test_tap_hits_tile_only_in_grid() {
        let catalog = catalog();
        let mut gallery = gallery();
        let cell = GridMetrics::default().cell_rect(&area(), 2, 0.0);
        let (cx, cy) = cell.center();
        assert_eq!(gallery.entry_at(&catalog, &area(), cx, cy).unwrap().identifier, "burger");
        // Gutter between tiles
        assert!(gallery.entry_at(&catalog, &area(), 200.0, cy).is_none());

        gallery.select(&catalog, catalog.get("burger").unwrap(), &area());
        assert!(gallery.entry_at(&catalog, &area(), cx, cy).is_none());
    }

    #[test]
    fn test_scroll_clamped_and_blocked_when_expanded() {
        let catalog = catalog();
        let mut gallery = gallery();
        let short = Rect::new(0.0, 0.0, 400.0, 300.0);
        gallery.scroll_by(-50.0, &catalog, &short);
        assert_eq!(gallery.scroll(), 0.0);
        gallery.scroll_by(10_000.0, &catalog, &short);
        let max = GridMetrics::default().content_height(400.0, catalog.len()) - 300.0;
        assert_eq!(gallery.scroll(), max);

        gallery.select(&catalog, catalog.get("pancakes").unwrap(), &short);
        gallery.scroll_by(-100.0, &catalog, &short);
        assert_eq!(gallery.scroll(), max);
    }

    #[test]
    fn test_drag_rotates_and_control_eases_back() {
        let catalog = catalog();
        let mut gallery = gallery();
        gallery.select(&catalog, catalog.get("burger").unwrap(), &area());

        gallery.begin_drag(100.0);
        let command = gallery.drag_to(190.0).unwrap();
        assert_eq!(command.axis, Axis::Y);
        assert!((command.degrees() - 90.0).abs() < 1e-4);
        assert_eq!(gallery.control_offset(), 90.0);

        let release = gallery.end_drag().unwrap();
        assert_eq!(release.radians, 0.0);
        assert!(release.animation.is_some());
        assert_eq!(gallery.control_offset(), 90.0);

        gallery.tick(0.18);
        assert!(gallery.control_offset() > 0.0 && gallery.control_offset() < 90.0);
        gallery.tick(0.2);
        assert_eq!(gallery.control_offset(), 0.0);
    }

    #[test]
    fn test_drag_ignored_in_grid() {
        let mut gallery = gallery();
        gallery.begin_drag(10.0);
        assert!(!gallery.is_dragging());
        assert!(gallery.drag_to(50.0).is_none());
        assert!(gallery.end_drag().is_none());
    }

    #[test]
    fn test_zero_drag_emits_nothing() {
        let catalog = catalog();
        let mut gallery = gallery();
        gallery.select(&catalog, catalog.get("burger").unwrap(), &area());
        gallery.begin_drag(50.0);
        gallery.drag_to(50.0);
        assert!(gallery.end_drag().is_none());
        assert_eq!(gallery.control_offset(), 0.0);
    }

    #[test]
    fn test_title_centering_follows_state() {
        let catalog = catalog();
        let mut gallery = gallery();
        assert_eq!(gallery.title_centering(), 0.5);
        gallery.select(&catalog, catalog.get("burger").unwrap(), &area());
        assert_eq!(gallery.title_centering(), 0.5);
        settle(&mut gallery);
        assert_eq!(gallery.title_centering(), 0.0);
    }

    #[test]
    fn test_title_centering_continues_when_closed_mid_flight() {
        let catalog = catalog();
        let mut gallery = gallery();
        gallery.select(&catalog, catalog.get("burger").unwrap(), &area());
        gallery.tick(0.1);
        let in_flight = gallery.title_centering();
        assert!(in_flight > 0.0 && in_flight < 0.5);

        gallery.close(&catalog, &area());
        assert!((gallery.title_centering() - in_flight).abs() < 1e-6);
        settle(&mut gallery);
        assert_eq!(gallery.title_centering(), 0.5);
    }

    #[test]
    fn test_resize_mid_flight_heads_for_new_layout() {
        let catalog = catalog();
        let mut gallery = gallery();
        let thai = catalog.get("thai").unwrap();
        let shape = ElementId::Correlated(thai.shape_key());
        gallery.select(&catalog, thai, &area());
        gallery.tick(0.1);

        let wide = Rect::new(0.0, 40.0, 600.0, 700.0);
        gallery.fit(&catalog, &wide);
        assert!(gallery.is_transitioning());

        settle(&mut gallery);
        let frame = gallery.frame(&catalog, &wide);
        let settled = frame.iter().find(|e| e.key == shape).unwrap().rect;
        assert_eq!(settled, find_rect(&gallery.layout(&catalog, &wide), &shape).unwrap());
        assert_eq!(settled.width, wide.width);
    }

    #[test]
    fn test_resize_clamps_scroll() {
        let catalog = catalog();
        let mut gallery = gallery();
        let short = Rect::new(0.0, 0.0, 400.0, 300.0);
        gallery.scroll_by(10_000.0, &catalog, &short);
        assert!(gallery.scroll() > 0.0);

        let tall = Rect::new(0.0, 0.0, 400.0, 5_000.0);
        gallery.fit(&catalog, &tall);
        assert_eq!(gallery.scroll(), 0.0);
    }
}
