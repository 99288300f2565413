use crate::color::Rgba;
use crate::particles::{PathCmd, PetalTransform, Surface, PETAL_PATH};
use glam::Vec2;
use web_sys as web;

/// [`Surface`] backed by a canvas 2D context.
pub struct CanvasSurface<'a> {
    ctx: &'a web::CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a web::CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn trace_petal(&self) {
        let ctx = self.ctx;
        ctx.begin_path();
        for cmd in PETAL_PATH {
            match cmd {
                PathCmd::MoveTo(p) => ctx.move_to(p.x as f64, p.y as f64),
                PathCmd::CubicTo(c1, c2, p) => ctx.bezier_curve_to(
                    c1.x as f64,
                    c1.y as f64,
                    c2.x as f64,
                    c2.y as f64,
                    p.x as f64,
                    p.y as f64,
                ),
                PathCmd::Close => ctx.close_path(),
            }
        }
    }
}

impl Surface for CanvasSurface<'_> {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn draw_petal(&mut self, t: &PetalTransform, fill: Rgba, stroke: Rgba) {
        let ctx = self.ctx;
        ctx.save();
        _ = ctx.translate(t.position.x as f64, t.position.y as f64);
        _ = ctx.rotate(t.rotation as f64);
        _ = ctx.scale(t.scale as f64, t.scale as f64);
        self.trace_petal();
        ctx.set_fill_style_str(&fill.to_string());
        ctx.fill();
        // Line width is in unit space after scale; keep it roughly 1px.
        ctx.set_line_width(1.0 / t.scale.max(0.01) as f64);
        ctx.set_stroke_style_str(&stroke.to_string());
        ctx.stroke();
        ctx.restore();
    }

    fn draw_link(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        let ctx = self.ctx;
        ctx.begin_path();
        ctx.move_to(from.x as f64, from.y as f64);
        ctx.line_to(to.x as f64, to.y as f64);
        ctx.set_line_width(1.0);
        ctx.set_stroke_style_str(&color.to_string());
        ctx.stroke();
    }
}
