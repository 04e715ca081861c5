use launchpad_fx::effects::text_morph::{AlphaMask, GlyphRasterizer};
use launchpad_fx::{FxError, FxResult};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::canvas::{context_2d, label_font};
use crate::js_error;

/// Rasterizes words with the page's fonts on a detached canvas.
pub struct CanvasTextRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextRasterizer {
    pub fn new() -> FxResult<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| FxError::ContextUnavailable("no document".to_string()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(|err| FxError::Host(js_error(err)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| FxError::Host("created element is not a canvas".to_string()))?;
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx })
    }
}

impl GlyphRasterizer for CanvasTextRasterizer {
    fn rasterize(&mut self, text: &str, font_px: f32, width: u32, height: u32) -> FxResult<AlphaMask> {
        if width == 0 || height == 0 {
            return Ok(AlphaMask::new(width, height));
        }
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        let (w, h) = (width as f64, height as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str("white");
        self.ctx.set_font(&label_font(font_px));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx
            .fill_text(text, w / 2.0, h / 2.0)
            .map_err(|err| FxError::Host(js_error(err)))?;

        let image = self
            .ctx
            .get_image_data(0.0, 0.0, w, h)
            .map_err(|err| FxError::Host(js_error(err)))?;
        AlphaMask::from_rgba(width, height, &image.data())
    }
}
