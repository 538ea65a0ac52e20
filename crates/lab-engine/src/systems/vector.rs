//! Lyon tessellation of draw lists for a GPU host.
//!
//! Every shape of a [`DrawList`] becomes plain triangles in a flat vertex
//! buffer the host reads through a raw pointer, one list per frame. Text is
//! not tessellated; the host overlays labels itself.

use std::cell::RefCell;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::{point, Box2D};
use lyon::path::builder::BorderRadii;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use crate::api::types::{ModuleId, SurfaceKind};
use crate::renderer::draw::{flatten_arc, Color, DrawCmd, DrawList, Stroke};
use crate::renderer::surface::{Surface, SurfaceProvider};

const TOLERANCE: f32 = 0.5;
const ARC_SEGMENTS: usize = 32;

/// Per-vertex data for vector/polygon rendering.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    /// Number of floats per vertex.
    pub const FLOATS: usize = 6;
    /// Stride in bytes.
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(x: f32, y: f32, color: [f32; 4]) -> Self {
        let [r, g, b, a] = color;
        Self { x, y, r, g, b, a }
    }
}

struct FillCtor([f32; 4]);

impl FillVertexConstructor<VectorVertex> for FillCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::at(vertex.position().x, vertex.position().y, self.0)
    }
}

struct StrokeCtor([f32; 4]);

impl StrokeVertexConstructor<VectorVertex> for StrokeCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::at(vertex.position().x, vertex.position().y, self.0)
    }
}

/// Split a polyline into dash runs of `on` length separated by `off` gaps.
pub fn dash(points: &[Vec2], on: f32, off: f32) -> Vec<Vec<Vec2>> {
    if on <= 0.0 || points.len() < 2 {
        return vec![points.to_vec()];
    }
    let mut runs = Vec::new();
    let mut current = vec![points[0]];
    let mut drawing = true;
    let mut left = on;
    for w in points.windows(2) {
        let (mut from, to) = (w[0], w[1]);
        let mut remaining = from.distance(to);
        while remaining > left {
            let cut = from + (to - from).normalize_or_zero() * left;
            remaining -= left;
            from = cut;
            if drawing {
                current.push(cut);
                runs.push(std::mem::take(&mut current));
            } else {
                current = vec![cut];
            }
            drawing = !drawing;
            left = if drawing { on } else { off };
        }
        left -= remaining;
        if drawing {
            current.push(to);
        }
    }
    if drawing && current.len() > 1 {
        runs.push(current);
    }
    runs
}

fn polyline_path(points: &[Vec2], closed: bool) -> Path {
    let mut builder = Path::builder();
    builder.begin(point(points[0].x, points[0].y));
    for p in &points[1..] {
        builder.line_to(point(p.x, p.y));
    }
    builder.end(closed);
    builder.build()
}

/// Tessellated geometry of the last presented frame.
pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    skipped_text: usize,
}

impl VectorState {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(16384 * VectorVertex::FLOATS),
            skipped_text: 0,
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.skipped_text = 0;
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// Raw pointer to the flat float buffer.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn vertices(&self) -> &[VectorVertex] {
        bytemuck::cast_slice(&self.buffer)
    }

    /// Text commands left to the host in the last frame.
    pub fn skipped_text(&self) -> usize {
        self.skipped_text
    }

    /// Replace the buffer with the tessellation of `list`.
    pub fn tessellate(&mut self, list: &DrawList) {
        self.clear();
        for cmd in list.iter() {
            match cmd {
                DrawCmd::FillRect {
                    origin,
                    size,
                    color,
                    radius,
                } => self.fill_rect(*origin, *size, *radius, *color),
                DrawCmd::StrokeRect {
                    origin,
                    size,
                    stroke,
                } => {
                    let corners = [
                        *origin,
                        *origin + Vec2::new(size.x, 0.0),
                        *origin + *size,
                        *origin + Vec2::new(0.0, size.y),
                        *origin,
                    ];
                    self.stroke_points(&corners, *stroke);
                }
                DrawCmd::FillCircle {
                    center,
                    radius,
                    color,
                } => self.fill_circle(*center, *radius, *color),
                DrawCmd::StrokeCircle {
                    center,
                    radius,
                    stroke,
                } => {
                    let ring = flatten_arc(*center, *radius, 0.0, std::f32::consts::TAU, ARC_SEGMENTS);
                    self.stroke_points(&ring, *stroke);
                }
                DrawCmd::Polyline { points, stroke } => self.stroke_points(points, *stroke),
                DrawCmd::FillPolygon { points, color } => self.fill_polygon(points, *color),
                DrawCmd::QuadCurve {
                    from,
                    ctrl,
                    to,
                    stroke,
                } => {
                    let curve = crate::renderer::draw::flatten_quad(*from, *ctrl, *to, ARC_SEGMENTS);
                    self.stroke_points(&curve, *stroke);
                }
                DrawCmd::Arc {
                    center,
                    radius,
                    start,
                    end,
                    stroke,
                } => {
                    let arc = flatten_arc(*center, *radius, *start, *end, ARC_SEGMENTS);
                    self.stroke_points(&arc, *stroke);
                }
                DrawCmd::Text { .. } => self.skipped_text += 1,
            }
        }
    }

    /// Flush indexed geometry to the flat buffer as a triangle list.
    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, FillCtor(color.to_f32())),
        );
        match result {
            Ok(_) => self.flush_geometry(),
            Err(e) => {
                log::debug!("fill tessellation failed: {e:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: Color) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, StrokeCtor(color.to_f32())),
        );
        match result {
            Ok(_) => self.flush_geometry(),
            Err(e) => {
                log::debug!("stroke tessellation failed: {e:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, radius: f32, color: Color) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        let rect = Box2D::new(point(origin.x, origin.y), point(origin.x + size.x, origin.y + size.y));
        if radius > 0.0 {
            builder.add_rounded_rectangle(&rect, &BorderRadii::new(radius), Winding::Positive);
        } else {
            builder.add_rectangle(&rect, Winding::Positive);
        }
        self.fill_path(&builder.build(), color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        self.fill_path(&builder.build(), color);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        self.fill_path(&polyline_path(points, true), color);
    }

    fn stroke_points(&mut self, points: &[Vec2], stroke: Stroke) {
        if points.len() < 2 || stroke.width <= 0.0 {
            return;
        }
        match stroke.dash {
            Some([on, off]) => {
                for run in dash(points, on, off) {
                    if run.len() >= 2 {
                        self.stroke_path(&polyline_path(&run, false), stroke.width, stroke.color);
                    }
                }
            }
            None => self.stroke_path(&polyline_path(points, false), stroke.width, stroke.color),
        }
    }
}

impl Default for VectorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Surface that tessellates each presented frame into a shared [`VectorState`].
pub struct VectorSurface {
    kind: SurfaceKind,
    size: Vec2,
    state: Rc<RefCell<VectorState>>,
}

impl Surface for VectorSurface {
    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn present(&mut self, frame: &DrawList) {
        self.state.borrow_mut().tessellate(frame);
    }
}

/// Hands out vector surfaces that all write into one buffer.
#[derive(Clone)]
pub struct VectorProvider {
    size: Vec2,
    state: Rc<RefCell<VectorState>>,
}

impl VectorProvider {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            state: Rc::new(RefCell::new(VectorState::new())),
        }
    }

    pub fn state(&self) -> Rc<RefCell<VectorState>> {
        Rc::clone(&self.state)
    }

    /// A surface bound to the shared buffer.
    pub fn surface(&self, kind: SurfaceKind) -> VectorSurface {
        VectorSurface {
            kind,
            size: self.size,
            state: Rc::clone(&self.state),
        }
    }
}

impl SurfaceProvider for VectorProvider {
    fn acquire(&mut self, _module: ModuleId, kind: SurfaceKind) -> Option<Box<dyn Surface>> {
        Some(Box::new(self.surface(kind)))
    }
}
