//! Layouts for the two view states
//!
//! Both layouts are pure functions of the catalog and the available content
//! area, so the transition engine can be given the exact geometry of the
//! state being left and the state being entered.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogEntry, CorrelationKey};

/// Axis-aligned rectangle in logical pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f32 {
        self.y
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Interpolate towards `other`; `t` outside [0, 1] extrapolates
    pub fn lerp(&self, other: &Rect, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self::new(
            mix(self.x, other.x),
            mix(self.y, other.y),
            mix(self.width, other.width).max(0.0),
            mix(self.height, other.height).max(0.0),
        )
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.min_x() && px <= self.max_x() && py >= self.min_y() && py <= self.max_y()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }
}

/// Identity of every element either layout can contain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// Title or shape of a catalog entry, present in both layouts
    Correlated(CorrelationKey),
    /// Close control in the detail header
    CloseControl,
    /// Area hosting the embedded 3D scene
    SceneArea,
    /// Drag control driving rotation
    RotationControl,
}

/// A positioned element
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutElement {
    pub id: ElementId,
    pub rect: Rect,
}

/// Grid sizing: square cells in a fixed number of columns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    pub columns: usize,
    /// Padding on the leading and trailing edge
    pub outer_padding: f32,
    /// Horizontal gap between columns
    pub column_spacing: f32,
    /// Vertical gap between rows
    pub row_spacing: f32,
    /// Title text height used to centre the label in its cell
    pub title_height: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            columns: 2,
            outer_padding: 8.0,
            column_spacing: 8.0,
            row_spacing: 8.0,
            title_height: 20.0,
        }
    }
}

impl GridMetrics {
    /// Side of one square cell for a content width
    pub fn cell_size(&self, width: f32) -> f32 {
        let columns = self.columns.max(1) as f32;
        let gaps = self.outer_padding * 2.0 + self.column_spacing * (columns - 1.0);
        ((width - gaps) / columns).max(0.0)
    }

    /// Total scrollable height of the grid for `count` entries
    pub fn content_height(&self, width: f32, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let rows = count.div_ceil(self.columns.max(1)) as f32;
        let cell = self.cell_size(width);
        self.row_spacing + rows * cell + (rows - 1.0) * self.row_spacing + self.row_spacing
    }

    /// Clamp a scroll offset so the grid never scrolls past its content
    pub fn clamp_scroll(&self, offset: f32, area: &Rect, count: usize) -> f32 {
        let max = (self.content_height(area.width, count) - area.height).max(0.0);
        offset.clamp(0.0, max)
    }

    /// Shape rect of the `index`-th cell
    pub fn cell_rect(&self, area: &Rect, index: usize, scroll: f32) -> Rect {
        let columns = self.columns.max(1);
        let cell = self.cell_size(area.width);
        let column = (index % columns) as f32;
        let row = (index / columns) as f32;
        Rect::new(
            area.x + self.outer_padding + column * (cell + self.column_spacing),
            area.y + self.row_spacing + row * (cell + self.row_spacing) - scroll,
            cell,
            cell,
        )
    }

    /// Title rect centred in a cell
    pub fn title_rect(&self, cell: &Rect) -> Rect {
        let (_, cy) = cell.center();
        Rect::new(cell.x, cy - self.title_height * 0.5, cell.width, self.title_height)
    }
}

/// Detail view sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetailMetrics {
    /// Maximum height of the expanded frame
    pub frame_max_height: f32,
    pub header_padding: f32,
    pub title_top_padding: f32,
    pub title_height: f32,
    pub close_width: f32,
    pub scene_height: f32,
    pub content_padding: f32,
    pub control_width: f32,
    pub control_height: f32,
}

impl Default for DetailMetrics {
    fn default() -> Self {
        Self {
            frame_max_height: 400.0,
            header_padding: 8.0,
            title_top_padding: 20.0,
            title_height: 24.0,
            close_width: 88.0,
            scene_height: 280.0,
            content_padding: 16.0,
            control_width: 150.0,
            control_height: 52.0,
        }
    }
}

/// Layout of the grid (`Collapsed` state)
pub fn grid_layout(catalog: &Catalog, area: &Rect, metrics: &GridMetrics, scroll: f32) -> Vec<LayoutElement> {
    let mut elements = Vec::with_capacity(catalog.len() * 2);
    for (index, entry) in catalog.iter().enumerate() {
        let cell = metrics.cell_rect(area, index, scroll);
        elements.push(LayoutElement {
            id: ElementId::Correlated(entry.shape_key()),
            rect: cell,
        });
        elements.push(LayoutElement {
            id: ElementId::Correlated(entry.title_key()),
            rect: metrics.title_rect(&cell),
        });
    }
    elements
}

/// Layout of the detail view (`Expanded` state)
///
/// Elements are listed back to front: frame, title, close, scene, control.
pub fn detail_layout(entry: &CatalogEntry, area: &Rect, metrics: &DetailMetrics) -> Vec<LayoutElement> {
    let frame = Rect::new(
        area.x,
        area.y,
        area.width,
        area.height.min(metrics.frame_max_height),
    );
    let header_top = frame.y + metrics.title_top_padding;
    let title = Rect::new(
        frame.x + metrics.header_padding,
        header_top,
        (frame.width - metrics.header_padding * 3.0 - metrics.close_width).max(0.0),
        metrics.title_height,
    );
    let close = Rect::new(
        frame.max_x() - metrics.header_padding - metrics.close_width,
        header_top,
        metrics.close_width,
        metrics.title_height,
    );

    // Scene and control share what is left below the header
    let body_top = title.max_y();
    let body_bottom = frame.max_y() - metrics.content_padding;
    let scene_height = metrics
        .scene_height
        .min(body_bottom - body_top - metrics.control_height - metrics.content_padding)
        .max(0.0);
    let scene = Rect::new(
        frame.x + metrics.content_padding,
        body_top,
        (frame.width - metrics.content_padding * 2.0).max(0.0),
        scene_height,
    );
    let control = Rect::new(
        frame.center().0 - metrics.control_width * 0.5,
        scene.max_y() + metrics.content_padding,
        metrics.control_width,
        metrics.control_height,
    );

    vec![
        LayoutElement {
            id: ElementId::Correlated(entry.shape_key()),
            rect: frame,
        },
        LayoutElement {
            id: ElementId::Correlated(entry.title_key()),
            rect: title,
        },
        LayoutElement {
            id: ElementId::CloseControl,
            rect: close,
        },
        LayoutElement {
            id: ElementId::SceneArea,
            rect: scene,
        },
        LayoutElement {
            id: ElementId::RotationControl,
            rect: control,
        },
    ]
}

/// Rect of a specific element within a layout
pub fn find_rect(layout: &[LayoutElement], id: &ElementId) -> Option<Rect> {
    layout.iter().find(|e| &e.id == id).map(|e| e.rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AssetRef;

    fn catalog() -> Catalog {
        Catalog::build_with(|id| Some(AssetRef(format!("models/{}.glb", id))))
    }

    #[test]
    fn test_rect_lerp() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(100.0, 50.0, 30.0, 20.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Rect::new(50.0, 25.0, 20.0, 15.0));
        // Overshoot extrapolates position but never produces negative size
        let shrink = b.lerp(&Rect::new(0.0, 0.0, 0.0, 0.0), 1.5);
        assert_eq!(shrink.width, 0.0);
    }

    #[test]
    fn test_cell_size_matches_two_columns() {
        let metrics = GridMetrics::default();
        // (width - 24) / 2 for two columns with 8px padding and gutter
        assert_eq!(metrics.cell_size(400.0), 188.0);
        assert_eq!(metrics.cell_size(10.0), 0.0);
    }

    #[test]
    fn test_grid_layout_positions() {
        let metrics = GridMetrics::default();
        let area = Rect::new(0.0, 40.0, 400.0, 600.0);
        let layout = grid_layout(&catalog(), &area, &metrics, 0.0);
        assert_eq!(layout.len(), 12);

        let first = layout[0].rect;
        assert_eq!(first, Rect::new(8.0, 48.0, 188.0, 188.0));
        let second = layout[2].rect;
        assert_eq!(second.x, 8.0 + 188.0 + 8.0);
        assert_eq!(second.y, first.y);
        let third = layout[4].rect;
        assert_eq!(third.x, first.x);
        assert_eq!(third.y, first.y + 188.0 + 8.0);

        // Titles sit inside their cell
        assert!(first.contains(layout[1].rect.center().0, layout[1].rect.center().1));
    }

    #[test]
    fn test_scroll_shifts_and_clamps() {
        let metrics = GridMetrics::default();
        let area = Rect::new(0.0, 0.0, 400.0, 300.0);
        let count = catalog().len();
        let content = metrics.content_height(area.width, count);
        assert_eq!(content, 8.0 + 3.0 * 188.0 + 2.0 * 8.0 + 8.0);

        assert_eq!(metrics.clamp_scroll(-10.0, &area, count), 0.0);
        assert_eq!(metrics.clamp_scroll(10_000.0, &area, count), content - 300.0);

        let scrolled = metrics.cell_rect(&area, 0, 50.0);
        assert_eq!(scrolled.y, 8.0 - 50.0);

        // Content shorter than the area never scrolls
        let tall = Rect::new(0.0, 0.0, 400.0, 2000.0);
        assert_eq!(metrics.clamp_scroll(100.0, &tall, count), 0.0);
    }

    #[test]
    fn test_detail_layout() {
        let catalog = catalog();
        let burger = catalog.get("burger").unwrap();
        let area = Rect::new(0.0, 40.0, 400.0, 700.0);
        let metrics = DetailMetrics::default();
        let layout = detail_layout(burger, &area, &metrics);

        let frame = find_rect(&layout, &ElementId::Correlated(burger.shape_key())).unwrap();
        assert_eq!(frame, Rect::new(0.0, 40.0, 400.0, 400.0));

        let title = find_rect(&layout, &ElementId::Correlated(burger.title_key())).unwrap();
        assert_eq!(title.x, 8.0);
        assert_eq!(title.y, 60.0);

        let close = find_rect(&layout, &ElementId::CloseControl).unwrap();
        assert_eq!(close.max_x(), 392.0);
        assert!(!close.intersects(&title));

        let scene = find_rect(&layout, &ElementId::SceneArea).unwrap();
        let control = find_rect(&layout, &ElementId::RotationControl).unwrap();
        assert!(scene.max_y() <= control.min_y());
        assert!(control.max_y() <= frame.max_y());
        assert_eq!(control.center().0, frame.center().0);
    }

    #[test]
    fn test_detail_layout_small_window() {
        let catalog = catalog();
        let pizza = catalog.get("pizza").unwrap();
        let area = Rect::new(0.0, 0.0, 300.0, 200.0);
        let layout = detail_layout(pizza, &area, &DetailMetrics::default());

        let frame = find_rect(&layout, &ElementId::Correlated(pizza.shape_key())).unwrap();
        assert_eq!(frame.height, 200.0);
        let scene = find_rect(&layout, &ElementId::SceneArea).unwrap();
        assert!(scene.height >= 0.0);
        assert!(scene.height < 280.0);
    }
}
