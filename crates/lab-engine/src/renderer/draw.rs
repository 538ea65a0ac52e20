//! Backend-neutral draw commands.
//!
//! Every experiment renders by filling a [`DrawList`]: a flat list of
//! primitives in surface pixel coordinates (origin top-left, y down).
//! Adapters turn the list into DOM nodes, canvas calls or triangles, and
//! tests can inspect it without a live surface.
//!
//! # Usage
//!
//! ```ignore
//! let mut list = DrawList::new(Vec2::new(800.0, 400.0));
//! list.fill_rect(Vec2::new(0.0, 350.0), Vec2::new(800.0, 50.0), Color::hex(0x10b981));
//! list.fill_circle(Vec2::new(400.0, 120.0), 15.0, Color::hex(0xfbbf24));
//! list.text(Vec2::new(400.0, 30.0), "N", 20.0, Color::WHITE, TextAlign::Center);
//! ```

use glam::Vec2;

/// sRGB color with 8-bit channels and a float alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// From a `0xRRGGBB` literal, fully opaque.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS color string: `#rrggbb` when opaque, `rgba(..)` otherwise.
    pub fn to_css(self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }

    /// Normalized RGBA components.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a,
        ]
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Outline style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// Dash pattern `[on, off]` in pixels; solid when `None`.
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width, dash: None }
    }

    pub const fn dashed(self, on: f32, off: f32) -> Self {
        Self {
            dash: Some([on, off]),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// One draw primitive. Coordinates are surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect {
        origin: Vec2,
        size: Vec2,
        color: Color,
        /// Corner radius.
        radius: f32,
    },
    StrokeRect {
        origin: Vec2,
        size: Vec2,
        stroke: Stroke,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Vec2>,
        stroke: Stroke,
    },
    FillPolygon {
        points: Vec<Vec2>,
        color: Color,
    },
    /// Quadratic Bézier from `from` to `to` bent towards `ctrl`.
    QuadCurve {
        from: Vec2,
        ctrl: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    /// Circular arc, angles in radians, clockwise on screen (canvas convention).
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        stroke: Stroke,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// A full frame of draw commands for one surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    size: Vec2,
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            cmds: Vec::with_capacity(64),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCmd> {
        self.cmds.iter()
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.fill_round_rect(origin, size, 0.0, color);
    }

    pub fn fill_round_rect(&mut self, origin: Vec2, size: Vec2, radius: f32, color: Color) {
        self.cmds.push(DrawCmd::FillRect {
            origin,
            size,
            color,
            radius,
        });
    }

    pub fn stroke_rect(&mut self, origin: Vec2, size: Vec2, stroke: Stroke) {
        self.cmds.push(DrawCmd::StrokeRect { origin, size, stroke });
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.cmds.push(DrawCmd::FillCircle {
            center,
            radius,
            color,
        });
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, stroke: Stroke) {
        self.cmds.push(DrawCmd::StrokeCircle {
            center,
            radius,
            stroke,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        self.polyline(vec![from, to], stroke);
    }

    /// Polylines with fewer than two points are dropped.
    pub fn polyline(&mut self, points: Vec<Vec2>, stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        self.cmds.push(DrawCmd::Polyline { points, stroke });
    }

    pub fn polygon(&mut self, points: Vec<Vec2>, color: Color) {
        if points.len() < 3 {
            return;
        }
        self.cmds.push(DrawCmd::FillPolygon { points, color });
    }

    /// Filled arrowhead with its tip at `tip`, pointing along `direction` (radians).
    pub fn arrow_head(&mut self, tip: Vec2, direction: f32, length: f32, color: Color) {
        let spread = std::f32::consts::PI / 6.0;
        let left = tip - Vec2::from_angle(direction - spread) * length;
        let right = tip - Vec2::from_angle(direction + spread) * length;
        self.polygon(vec![left, tip, right], color);
    }

    pub fn quad_curve(&mut self, from: Vec2, ctrl: Vec2, to: Vec2, stroke: Stroke) {
        self.cmds.push(DrawCmd::QuadCurve {
            from,
            ctrl,
            to,
            stroke,
        });
    }

    pub fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, stroke: Stroke) {
        self.cmds.push(DrawCmd::Arc {
            center,
            radius,
            start,
            end,
            stroke,
        });
    }

    pub fn text(
        &mut self,
        pos: Vec2,
        text: impl Into<String>,
        size: f32,
        color: Color,
        align: TextAlign,
    ) {
        self.cmds.push(DrawCmd::Text {
            pos,
            text: text.into(),
            size,
            color,
            align,
        });
    }
}

/// Sample a quadratic Bézier into `segments + 1` points.
pub fn flatten_quad(from: Vec2, ctrl: Vec2, to: Vec2, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let u = 1.0 - t;
            from * (u * u) + ctrl * (2.0 * u * t) + to * (t * t)
        })
        .collect()
}

/// Sample a circular arc into `segments + 1` points.
pub fn flatten_arc(center: Vec2, radius: f32, start: f32, end: f32, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let a = start + (end - start) * i as f32 / segments as f32;
            center + Vec2::from_angle(a) * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_css() {
        let c = Color::hex(0xfbbf24);
        assert_eq!((c.r, c.g, c.b), (0xfb, 0xbf, 0x24));
        assert_eq!(c.to_css(), "#fbbf24");
        assert_eq!(c.with_alpha(0.5).to_css(), "rgba(251, 191, 36, 0.5)");
    }

    #[test]
    fn degenerate_shapes_are_dropped() {
        let mut list = DrawList::new(Vec2::new(100.0, 100.0));
        list.polyline(vec![Vec2::ZERO], Stroke::new(Color::WHITE, 1.0));
        list.polygon(vec![Vec2::ZERO, Vec2::ONE], Color::WHITE);
        assert!(list.is_empty());
        list.line(Vec2::ZERO, Vec2::ONE, Stroke::new(Color::WHITE, 1.0));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn arrow_head_tip_is_second_vertex() {
        let mut list = DrawList::new(Vec2::new(100.0, 100.0));
        let tip = Vec2::new(50.0, 50.0);
        list.arrow_head(tip, 0.0, 8.0, Color::WHITE);
        match list.iter().next() {
            Some(DrawCmd::FillPolygon { points, .. }) => {
                assert_eq!(points[1], tip);
                assert!(points[0].x < tip.x && points[2].x < tip.x);
            }
            other => panic!("expected polygon, got {other:?}"),
        };
    }

    #[test]
    fn flatten_endpoints() {
        let pts = flatten_quad(Vec2::ZERO, Vec2::new(5.0, 10.0), Vec2::new(10.0, 0.0), 8);
        assert_eq!(pts.len(), 9);
        assert_eq!(pts[0], Vec2::ZERO);
        assert!((pts[8] - Vec2::new(10.0, 0.0)).length() < 1e-5);
        assert!((pts[4].y - 5.0).abs() < 1e-4);
    }
}
