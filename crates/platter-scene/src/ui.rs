//! Shared egui painting for grid tiles and the detail view
//!
//! Everything here paints at an explicit rect and opacity so the same code
//! draws settled layouts and in-flight transition frames.

use bevy_egui::egui;
use platter_core::Rect;

/// Label of the close control
pub const CLOSE_LABEL: &str = "× Close";

/// Label of the rotation control
pub const ROTATE_LABEL: &str = "◀  Rotate  ▶";

/// Colours used by tiles and the detail frame
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: egui::Color32,
    pub tile: egui::Color32,
    pub text: egui::Color32,
}

impl Palette {
    pub fn new(background: [f32; 3], tile: [f32; 3]) -> Self {
        Self {
            background: color32(background),
            tile: color32(tile),
            text: egui::Color32::WHITE,
        }
    }
}

/// sRGB floats (0.0-1.0) to an egui colour
pub fn color32(rgb: [f32; 3]) -> egui::Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgb(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
}

pub fn to_egui_rect(rect: &Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x, rect.y),
        egui::vec2(rect.width, rect.height),
    )
}

pub fn from_egui_rect(rect: egui::Rect) -> Rect {
    Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

/// Split `frame` into up to four strips that surround `hole`
///
/// The embedded scene is drawn by its own camera, so the frame must leave
/// the scene area unpainted.
pub fn strips_around(frame: &Rect, hole: &Rect) -> Vec<Rect> {
    if !frame.intersects(hole) {
        return vec![*frame];
    }
    let top = hole.min_y().max(frame.min_y());
    let bottom = hole.max_y().min(frame.max_y());
    let left = hole.min_x().max(frame.min_x());
    let right = hole.max_x().min(frame.max_x());

    let strips = [
        Rect::new(frame.x, frame.y, frame.width, top - frame.y),
        Rect::new(frame.x, bottom, frame.width, frame.max_y() - bottom),
        Rect::new(frame.x, top, left - frame.x, bottom - top),
        Rect::new(right, top, frame.max_x() - right, bottom - top),
    ];
    strips
        .into_iter()
        .filter(|r| r.width > 0.0 && r.height > 0.0)
        .collect()
}

/// Paint a tile or the detail frame, optionally leaving a hole for the scene
pub fn paint_shape(painter: &egui::Painter, rect: &Rect, hole: Option<&Rect>, palette: &Palette, opacity: f32) {
    let fill = palette.tile.gamma_multiply(opacity);
    match hole {
        Some(hole) => {
            for strip in strips_around(rect, hole) {
                painter.rect_filled(to_egui_rect(&strip), 0.0, fill);
            }
        }
        None => {
            painter.rect_filled(to_egui_rect(rect), 6.0, fill);
        }
    }
}

/// Leading x of a line of text inside `rect`
///
/// `centering` 0 puts the text at the leading edge, 0.5 centres it.
pub fn text_origin_x(rect: &Rect, text_width: f32, centering: f32) -> f32 {
    rect.x + (rect.width - text_width).max(0.0) * centering.clamp(0.0, 0.5)
}

/// Paint an entry's display name, sized to the title rect
pub fn paint_title(
    painter: &egui::Painter,
    rect: &Rect,
    text: &str,
    centering: f32,
    palette: &Palette,
    opacity: f32,
) {
    let color = palette.text.gamma_multiply(opacity);
    let size = (rect.height * 0.8).max(1.0);
    let galley = painter.layout_no_wrap(text.to_string(), egui::FontId::proportional(size), color);
    let x = text_origin_x(rect, galley.size().x, centering);
    let y = rect.center().1 - galley.size().y * 0.5;
    painter.galley(egui::pos2(x, y), galley, color);
}

/// Faint notice shown in an empty scene area
pub fn paint_scene_notice(painter: &egui::Painter, rect: &Rect, text: &str, palette: &Palette, opacity: f32) {
    painter.text(
        to_egui_rect(rect).center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(14.0),
        palette.text.gamma_multiply(opacity * 0.5),
    );
}

/// Paint the close control label
pub fn paint_close_control(painter: &egui::Painter, rect: &Rect, hovered: bool, palette: &Palette, opacity: f32) {
    let r = to_egui_rect(rect);
    let color = palette.text.gamma_multiply(opacity);
    let text_rect = painter.text(
        r.right_center(),
        egui::Align2::RIGHT_CENTER,
        CLOSE_LABEL,
        egui::FontId::proportional(16.0),
        color,
    );
    if hovered {
        painter.line_segment(
            [text_rect.left_bottom(), text_rect.right_bottom()],
            egui::Stroke::new(1.0, color),
        );
    }
}

/// Paint the bordered rotation control
pub fn paint_rotation_control(painter: &egui::Painter, rect: &Rect, palette: &Palette, opacity: f32) {
    let r = to_egui_rect(rect);
    let color = palette.text.gamma_multiply(opacity);
    painter.rect_stroke(r, 0.0, egui::Stroke::new(4.0, color), egui::StrokeKind::Inside);
    painter.text(
        r.center(),
        egui::Align2::CENTER_CENTER,
        ROTATE_LABEL,
        egui::FontId::proportional(16.0),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(rects: &[Rect]) -> f32 {
        rects.iter().map(|r| r.width * r.height).sum()
    }

    #[test]
    fn test_strips_cover_frame_minus_hole() {
        let frame = Rect::new(0.0, 0.0, 400.0, 400.0);
        let hole = Rect::new(16.0, 44.0, 368.0, 280.0);
        let strips = strips_around(&frame, &hole);
        assert_eq!(strips.len(), 4);
        assert_eq!(area(&strips), 400.0 * 400.0 - 368.0 * 280.0);
        for strip in &strips {
            assert!(!strip.intersects(&hole));
        }
    }

    #[test]
    fn test_strips_without_overlap() {
        let frame = Rect::new(0.0, 0.0, 100.0, 100.0);
        let hole = Rect::new(200.0, 200.0, 10.0, 10.0);
        assert_eq!(strips_around(&frame, &hole), vec![frame]);
    }

    #[test]
    fn test_strips_hole_touching_edge() {
        let frame = Rect::new(0.0, 0.0, 100.0, 100.0);
        let hole = Rect::new(0.0, 50.0, 100.0, 80.0);
        let strips = strips_around(&frame, &hole);
        assert_eq!(strips, vec![Rect::new(0.0, 0.0, 100.0, 50.0)]);
    }

    #[test]
    fn test_text_origin() {
        let rect = Rect::new(10.0, 0.0, 200.0, 20.0);
        assert_eq!(text_origin_x(&rect, 100.0, 0.0), 10.0);
        assert_eq!(text_origin_x(&rect, 100.0, 0.5), 60.0);
        // Spring overshoot does not push text past centre
        assert_eq!(text_origin_x(&rect, 100.0, 0.7), 60.0);
        // Text wider than its rect stays at the leading edge
        assert_eq!(text_origin_x(&rect, 300.0, 0.5), 10.0);
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(color32([1.0, 0.0, 0.5]), egui::Color32::from_rgb(255, 0, 128));
        assert_eq!(color32([2.0, -1.0, 0.0]), egui::Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_rect_conversion_round_trip() {
        let rect = Rect::new(4.0, 8.0, 120.0, 60.0);
        assert_eq!(from_egui_rect(to_egui_rect(&rect)), rect);
    }
}
