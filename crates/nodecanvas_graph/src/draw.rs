// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drawing surface abstraction and the geometry shared by canvas rendering.
//!
//! The canvas renders through [`Surface`] so the model stays independent
//! of any particular windowing backend. The editor implements it on top of
//! an egui `Painter`.

use egui::{Color32, Pos2, Rect, Stroke, Vec2};

/// Horizontal pull of connection curves
pub const BEZIER_TANGENT: f32 = 50.0;

/// Segments used to flatten a cubic bezier
pub const BEZIER_SEGMENTS: usize = 32;

/// Something the canvas can draw on.
pub trait Surface {
    /// Fill a rectangle
    fn fill_rect(&mut self, rect: Rect, rounding: f32, color: Color32);

    /// Outline a rectangle
    fn stroke_rect(&mut self, rect: Rect, rounding: f32, stroke: Stroke);

    /// Draw a straight line segment
    fn line_segment(&mut self, from: Pos2, to: Pos2, stroke: Stroke);

    /// Draw a centred label
    fn text(&mut self, center: Pos2, text: &str, color: Color32);

    /// Draw a cubic bezier as a polyline
    fn bezier(&mut self, points: [Pos2; 4], stroke: Stroke) {
        let [p0, p1, p2, p3] = points;
        let flattened = bezier_points(p0, p1, p2, p3, BEZIER_SEGMENTS);
        for pair in flattened.windows(2) {
            self.line_segment(pair[0], pair[1], stroke);
        }
    }
}

/// Generate points along a cubic bezier curve
pub fn bezier_points(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, segments: usize) -> Vec<Pos2> {
    let segments = segments.max(1);
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x;
        let y = mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y;

        points.push(Pos2::new(x, y));
    }
    points
}

/// Control points for a curve leaving an out point and entering an in point.
pub fn connection_curve(out_anchor: Pos2, in_anchor: Pos2) -> [Pos2; 4] {
    [
        out_anchor,
        out_anchor + Vec2::new(BEZIER_TANGENT, 0.0),
        in_anchor - Vec2::new(BEZIER_TANGENT, 0.0),
        in_anchor,
    ]
}

/// A grid overlay layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayer {
    /// Distance between lines
    pub spacing: f32,
    /// Line opacity in `0.0..=1.0`
    pub opacity: f32,
    /// Base line colour
    pub color: Color32,
}

impl GridLayer {
    /// Line colour with the layer opacity applied
    pub fn stroke(&self) -> Stroke {
        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let [r, g, b, _] = self.color.to_array();
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(r, g, b, alpha))
    }
}

/// Line segments covering `bounds`, shifted by `offset` modulo the spacing.
///
/// Lines start one spacing before the bounds so a positive offset never
/// leaves a gap along the top and left edges.
pub fn grid_lines(bounds: Rect, spacing: f32, offset: Vec2) -> Vec<[Pos2; 2]> {
    if spacing <= 0.0 || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Vec::new();
    }

    let columns = (bounds.width() / spacing).ceil() as usize;
    let rows = (bounds.height() / spacing).ceil() as usize;
    let shift = Vec2::new(offset.x % spacing, offset.y % spacing);

    let mut lines = Vec::with_capacity(columns + rows);
    for i in 0..columns {
        let x = bounds.left() + spacing * i as f32;
        lines.push([
            Pos2::new(x, bounds.top() - spacing) + shift,
            Pos2::new(x, bounds.bottom()) + shift,
        ]);
    }
    for i in 0..rows {
        let y = bounds.top() + spacing * i as f32;
        lines.push([
            Pos2::new(bounds.left() - spacing, y) + shift,
            Pos2::new(bounds.right(), y) + shift,
        ]);
    }
    lines
}

#[cfg(test)]
pub(crate) mod recording {
    use super::Surface;
    use egui::{Color32, Pos2, Rect, Stroke};

    /// A drawing command captured by [`RecordingSurface`]
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCommand {
        FillRect(Rect, Color32),
        StrokeRect(Rect),
        Line(Pos2, Pos2),
        Text(Pos2, String),
    }

    /// Surface that records what was drawn
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub commands: Vec<DrawCommand>,
    }

    impl RecordingSurface {
        pub fn fills(&self) -> impl Iterator<Item = (&Rect, &Color32)> {
            self.commands.iter().filter_map(|c| match c {
                DrawCommand::FillRect(rect, color) => Some((rect, color)),
                _ => None,
            })
        }

        pub fn lines(&self) -> impl Iterator<Item = (&Pos2, &Pos2)> {
            self.commands.iter().filter_map(|c| match c {
                DrawCommand::Line(a, b) => Some((a, b)),
                _ => None,
            })
        }
    }

    impl Surface for RecordingSurface {
        fn fill_rect(&mut self, rect: Rect, _rounding: f32, color: Color32) {
            self.commands.push(DrawCommand::FillRect(rect, color));
        }

        fn stroke_rect(&mut self, rect: Rect, _rounding: f32, _stroke: Stroke) {
            self.commands.push(DrawCommand::StrokeRect(rect));
        }

        fn line_segment(&mut self, from: Pos2, to: Pos2, _stroke: Stroke) {
            self.commands.push(DrawCommand::Line(from, to));
        }

        fn text(&mut self, center: Pos2, text: &str, _color: Color32) {
            self.commands.push(DrawCommand::Text(center, text.to_string()));
        }
    }
}
