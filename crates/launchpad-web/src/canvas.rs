use std::f64::consts::TAU;

use launchpad_fx::renderer::surface::{GradientStop, RenderTier, Surface};
use launchpad_fx::{Color, FxError, FxResult, Viewport};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::js_error;

/// [`Surface`] over a Canvas2D context.
///
/// The backing buffer is sized in device pixels and the context carries a
/// `dpr` scale transform, so effects keep drawing in CSS pixels.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> FxResult<Self> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            viewport: Viewport::default(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

/// The canvas' 2D context, or `ContextUnavailable`.
pub fn context_2d(canvas: &HtmlCanvasElement) -> FxResult<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(|err| FxError::ContextUnavailable(format!("{err:?}")))?
        .ok_or_else(|| FxError::ContextUnavailable("2d context is null".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| FxError::ContextUnavailable("not a CanvasRenderingContext2d".to_string()))
}

impl Surface for CanvasSurface {
    fn backend(&self) -> &'static str {
        "canvas2d"
    }

    fn tier(&self) -> RenderTier {
        RenderTier::Canvas2d
    }

    fn size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.viewport.width, self.viewport.height)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let (w, h) = viewport.buffer_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);

        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.width));
        let _ = style.set_property("height", &format!("{}px", viewport.height));

        // Resizing the buffer resets the context state.
        let dpr = viewport.dpr as f64;
        if let Err(err) = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
            log::warn!("canvas: set_transform failed: {}", js_error(err));
        }
    }

    fn fill_rect(&mut self, origin: glam::Vec2, size: glam::Vec2, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: glam::Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn fill_radial_gradient(&mut self, center: glam::Vec2, radius: f32, stops: &[GradientStop]) {
        if radius <= 0.0 {
            return;
        }
        let (x, y, r) = (center.x as f64, center.y as f64, radius as f64);
        let gradient = match self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) {
            Ok(gradient) => gradient,
            Err(err) => {
                log::debug!("canvas: gradient failed: {}", js_error(err));
                return;
            }
        };
        for stop in stops {
            let _ = gradient.add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_css());
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, r, 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: glam::Vec2, to: glam::Vec2, width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, center: glam::Vec2, size: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.set_font(&label_font(size));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let _ = self.ctx.fill_text(text, center.x as f64, center.y as f64);
    }
}

/// CSS font shorthand for effect labels.
pub fn label_font(size: f32) -> String {
    format!("bold {}px Arial, sans-serif", size.round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_font_rounds_to_whole_pixels() {
        assert_eq!(label_font(10.0), "bold 10px Arial, sans-serif");
        assert_eq!(label_font(15.6), "bold 16px Arial, sans-serif");
    }
}
