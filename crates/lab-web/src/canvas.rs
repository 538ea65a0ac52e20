use std::f64::consts::TAU;

use glam::Vec2;
use lab_engine::{Color, DrawCmd, DrawList, Stroke, Surface, SurfaceKind, TextAlign};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// Immediate-mode surface: each frame clears the canvas and replays the
/// draw list through the 2D context.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    size: Vec2,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, size: Vec2) -> Self {
        Self { ctx, size }
    }

    fn apply_stroke(&self, stroke: &Stroke) -> Result<(), JsValue> {
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width as f64);
        let dash = js_sys::Array::new();
        if let Some([on, off]) = stroke.dash {
            dash.push(&JsValue::from_f64(on as f64));
            dash.push(&JsValue::from_f64(off as f64));
        }
        self.ctx.set_line_dash(&dash)
    }

    fn fill(&self, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn trace_points(&self, points: &[Vec2]) {
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.ctx.move_to(first.x as f64, first.y as f64);
        }
        for p in iter {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
    }

    fn trace_round_rect(&self, origin: Vec2, size: Vec2, radius: f32) -> Result<(), JsValue> {
        let (x, y) = (origin.x as f64, origin.y as f64);
        let (w, h) = (size.x as f64, size.y as f64);
        let r = (radius as f64).min(w / 2.0).min(h / 2.0).max(0.0);
        self.ctx.move_to(x + r, y);
        self.ctx.arc_to(x + w, y, x + w, y + h, r)?;
        self.ctx.arc_to(x + w, y + h, x, y + h, r)?;
        self.ctx.arc_to(x, y + h, x, y, r)?;
        self.ctx.arc_to(x, y, x + w, y, r)?;
        self.ctx.close_path();
        Ok(())
    }

    fn draw(&self, cmd: &DrawCmd) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::FillRect {
                origin,
                size,
                color,
                radius,
            } => {
                if *radius > 0.0 {
                    ctx.begin_path();
                    self.trace_round_rect(*origin, *size, *radius)?;
                    self.fill(*color);
                } else {
                    ctx.set_fill_style_str(&color.to_css());
                    ctx.fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
                }
            }
            DrawCmd::StrokeRect { origin, size, stroke } => {
                self.apply_stroke(stroke)?;
                ctx.stroke_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
            }
            DrawCmd::FillCircle { center, radius, color } => {
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                self.fill(*color);
            }
            DrawCmd::StrokeCircle {
                center,
                radius,
                stroke,
            } => {
                self.apply_stroke(stroke)?;
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                ctx.stroke();
            }
            DrawCmd::Polyline { points, stroke } => {
                self.apply_stroke(stroke)?;
                ctx.begin_path();
                self.trace_points(points);
                ctx.stroke();
            }
            DrawCmd::FillPolygon { points, color } => {
                ctx.begin_path();
                self.trace_points(points);
                ctx.close_path();
                self.fill(*color);
            }
            DrawCmd::QuadCurve {
                from,
                ctrl,
                to,
                stroke,
            } => {
                self.apply_stroke(stroke)?;
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.quadratic_curve_to(ctrl.x as f64, ctrl.y as f64, to.x as f64, to.y as f64);
                ctx.stroke();
            }
            DrawCmd::Arc {
                center,
                radius,
                start,
                end,
                stroke,
            } => {
                self.apply_stroke(stroke)?;
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    *start as f64,
                    *end as f64,
                )?;
                ctx.stroke();
            }
            DrawCmd::Text {
                pos,
                text,
                size,
                color,
                align,
            } => {
                ctx.set_font(&format!("{size}px sans-serif"));
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                    TextAlign::Right => "right",
                });
                ctx.set_text_baseline("middle");
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
            }
        }
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Canvas
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn present(&mut self, frame: &DrawList) {
        self.ctx
            .clear_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
        for cmd in frame.iter() {
            if let Err(e) = self.draw(cmd) {
                log::warn!("canvas draw failed: {e:?}");
                return;
            }
        }
    }
}
