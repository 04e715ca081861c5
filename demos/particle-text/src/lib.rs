use launchpad_fx::TextMorph;
use launchpad_web::CanvasTextRasterizer;
use wasm_bindgen::prelude::*;

// Words are rasterized with the page's fonts, not the bitmap fallback.
launchpad_web::export_effect!(TextMorph<CanvasTextRasterizer>, "particle-text", |config| {
    config.validate()?;
    Ok(TextMorph::with_rasterizer(config, CanvasTextRasterizer::new()?))
});
