//! Retained-DOM layout.
//!
//! Maps a [`DrawList`] onto absolutely positioned elements with inline
//! styles. The browser side clears the container and appends one element per
//! spec, every frame. Shapes the DOM has no primitive for (segments, curves,
//! polygons) become rotated bars or clipped boxes.

use glam::Vec2;

use crate::renderer::draw::{flatten_arc, flatten_quad, Color, DrawCmd, DrawList, Stroke, TextAlign};

const CURVE_SEGMENTS: usize = 16;

/// One element to create inside the container.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    /// Full inline `style` attribute.
    pub style: String,
    pub text: Option<String>,
}

/// Lay out a frame as DOM elements, in draw order.
pub fn layout(list: &DrawList) -> Vec<ElementSpec> {
    let mut out = Vec::with_capacity(list.len());
    for cmd in list.iter() {
        match cmd {
            DrawCmd::FillRect {
                origin,
                size,
                color,
                radius,
            } => {
                let mut style = boxed(*origin, *size);
                style.push_str(&format!("background:{};", color.to_css()));
                if *radius > 0.0 {
                    style.push_str(&format!("border-radius:{}px;", px(*radius)));
                }
                out.push(ElementSpec { style, text: None });
            }
            DrawCmd::StrokeRect { origin, size, stroke } => {
                let mut style = boxed(*origin, *size);
                style.push_str(&border(stroke));
                style.push_str("box-sizing:border-box;");
                out.push(ElementSpec { style, text: None });
            }
            DrawCmd::FillCircle {
                center,
                radius,
                color,
            } => {
                let mut style = boxed(*center - Vec2::splat(*radius), Vec2::splat(radius * 2.0));
                style.push_str(&format!("background:{};border-radius:50%;", color.to_css()));
                out.push(ElementSpec { style, text: None });
            }
            DrawCmd::StrokeCircle {
                center,
                radius,
                stroke,
            } => {
                let mut style = boxed(*center - Vec2::splat(*radius), Vec2::splat(radius * 2.0));
                style.push_str(&border(stroke));
                style.push_str("border-radius:50%;box-sizing:border-box;");
                out.push(ElementSpec { style, text: None });
            }
            DrawCmd::Polyline { points, stroke } => segments(points, stroke, &mut out),
            DrawCmd::FillPolygon { points, color } => out.push(polygon(points, *color)),
            DrawCmd::QuadCurve {
                from,
                ctrl,
                to,
                stroke,
            } => segments(&flatten_quad(*from, *ctrl, *to, CURVE_SEGMENTS), stroke, &mut out),
            DrawCmd::Arc {
                center,
                radius,
                start,
                end,
                stroke,
            } => segments(
                &flatten_arc(*center, *radius, *start, *end, CURVE_SEGMENTS),
                stroke,
                &mut out,
            ),
            DrawCmd::Text {
                pos,
                text,
                size,
                color,
                align,
            } => {
                let shift = match align {
                    TextAlign::Left => "0",
                    TextAlign::Center => "-50%",
                    TextAlign::Right => "-100%",
                };
                let style = format!(
                    "position:absolute;left:{}px;top:{}px;font-size:{}px;color:{};\
                     white-space:nowrap;line-height:1;transform:translate({shift},-50%);",
                    px(pos.x),
                    px(pos.y),
                    px(*size),
                    color.to_css(),
                );
                out.push(ElementSpec {
                    style,
                    text: Some(text.clone()),
                });
            }
        }
    }
    out
}

fn px(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

fn boxed(origin: Vec2, size: Vec2) -> String {
    format!(
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;",
        px(origin.x),
        px(origin.y),
        px(size.x.max(0.0)),
        px(size.y.max(0.0)),
    )
}

fn border(stroke: &Stroke) -> String {
    let line = if stroke.dash.is_some() { "dashed" } else { "solid" };
    format!("border:{}px {line} {};", px(stroke.width), stroke.color.to_css())
}

/// One rotated bar per segment, pivoting on its left-middle edge.
fn segments(points: &[Vec2], stroke: &Stroke, out: &mut Vec<ElementSpec>) {
    for pair in points.windows(2) {
        let delta = pair[1] - pair[0];
        let length = delta.length();
        if length <= f32::EPSILON {
            continue;
        }
        let angle = delta.y.atan2(delta.x);
        let fill = match stroke.dash {
            Some(_) => format!(
                "border-top:{}px dashed {};",
                px(stroke.width),
                stroke.color.to_css()
            ),
            None => format!("background:{};", stroke.color.to_css()),
        };
        let style = format!(
            "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;{fill}\
             transform-origin:0 50%;transform:translateY(-50%) rotate({}rad);",
            px(pair[0].x),
            px(pair[0].y),
            px(length),
            px(stroke.width),
            px(angle),
        );
        out.push(ElementSpec { style, text: None });
    }
}

/// Bounding box clipped to the polygon outline.
fn polygon(points: &[Vec2], color: Color) -> ElementSpec {
    let min = points.iter().fold(Vec2::splat(f32::INFINITY), |a, p| a.min(*p));
    let max = points.iter().fold(Vec2::splat(f32::NEG_INFINITY), |a, p| a.max(*p));
    let size = (max - min).max(Vec2::splat(1.0));
    let clip: Vec<String> = points
        .iter()
        .map(|p| {
            let rel = (*p - min) / size * 100.0;
            format!("{}% {}%", px(rel.x), px(rel.y))
        })
        .collect();
    let mut style = boxed(min, size);
    style.push_str(&format!(
        "background:{};clip-path:polygon({});",
        color.to_css(),
        clip.join(",")
    ));
    ElementSpec { style, text: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> DrawList {
        DrawList::new(Vec2::new(800.0, 400.0))
    }

    #[test]
    fn rect_becomes_absolute_box() {
        let mut list = list();
        list.fill_rect(Vec2::new(0.0, 350.0), Vec2::new(800.0, 50.0), Color::hex(0x10b981));
        let els = layout(&list);
        assert_eq!(els.len(), 1);
        assert_eq!(
            els[0].style,
            "position:absolute;left:0px;top:350px;width:800px;height:50px;background:#10b981;"
        );
    }

    #[test]
    fn circle_is_rounded_box_around_center() {
        let mut list = list();
        list.fill_circle(Vec2::new(100.0, 100.0), 15.0, Color::hex(0x6366f1));
        let style = &layout(&list)[0].style;
        assert!(style.contains("left:85px;top:85px;width:30px;height:30px;"), "{style}");
        assert!(style.contains("border-radius:50%"));
    }

    #[test]
    fn polyline_yields_one_bar_per_segment() {
        let mut list = list();
        list.polyline(
            vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)],
            Stroke::new(Color::WHITE, 2.0),
        );
        let els = layout(&list);
        assert_eq!(els.len(), 2);
        assert!(els[0].style.contains("width:10px;height:2px;"));
        assert!(els[1].style.contains("rotate(1.57rad)"), "{}", els[1].style);
    }

    #[test]
    fn text_carries_content_and_alignment() {
        let mut list = list();
        list.text(Vec2::new(400.0, 20.0), "pH 7", 14.0, Color::WHITE, TextAlign::Center);
        let els = layout(&list);
        assert_eq!(els[0].text.as_deref(), Some("pH 7"));
        assert!(els[0].style.contains("translate(-50%,-50%)"));
    }

    #[test]
    fn polygon_is_clipped() {
        let mut list = list();
        list.polygon(
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(5.0, 10.0)],
            Color::WHITE,
        );
        let style = &layout(&list)[0].style;
        assert!(style.contains("clip-path:polygon(0% 0%,100% 0%,50% 100%)"), "{style}");
    }
}
