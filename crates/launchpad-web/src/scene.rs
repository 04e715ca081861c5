use js_sys::{Float32Array, Function};
use launchpad_fx::scene::{SceneBackend, SceneLease, SceneManager, SceneUniforms, DEFAULT_GRACE_FRAMES};
use launchpad_fx::{FxError, FxResult, Viewport};
use wasm_bindgen::prelude::*;

use crate::js_error;

/// Scene GPU work delegated to page-side callbacks:
/// `allocate(width, height) -> bool`, `dispose()`, `draw(Float32Array)`.
pub struct JsSceneBackend {
    allocate: Function,
    dispose: Function,
    draw: Function,
}

impl SceneBackend for JsSceneBackend {
    fn allocate(&mut self, viewport: Viewport) -> FxResult<()> {
        let result = self
            .allocate
            .call2(
                &JsValue::NULL,
                &JsValue::from_f64(viewport.width as f64),
                &JsValue::from_f64(viewport.height as f64),
            )
            .map_err(|err| FxError::Host(js_error(err)))?;
        if result.as_bool() == Some(false) {
            return Err(FxError::ContextUnavailable("scene allocation declined".to_string()));
        }
        Ok(())
    }

    fn dispose(&mut self) {
        if let Err(err) = self.dispose.call0(&JsValue::NULL) {
            log::warn!("scene: dispose failed: {}", js_error(err));
        }
    }

    fn draw(&mut self, uniforms: &SceneUniforms) {
        let block = Float32Array::from(uniforms.as_floats());
        if let Err(err) = self.draw.call1(&JsValue::NULL, &block) {
            log::warn!("scene: draw failed: {}", js_error(err));
        }
    }
}

/// The shared background scene, held once by the page's app context.
#[wasm_bindgen]
pub struct WebScene {
    manager: SceneManager<JsSceneBackend>,
}

#[wasm_bindgen]
impl WebScene {
    #[wasm_bindgen(constructor)]
    pub fn new(allocate: Function, dispose: Function, draw: Function, grace_frames: Option<u32>) -> WebScene {
        let backend = JsSceneBackend {
            allocate,
            dispose,
            draw,
        };
        WebScene {
            manager: SceneManager::new(backend)
                .with_grace_frames(grace_frames.unwrap_or(DEFAULT_GRACE_FRAMES)),
        }
    }

    /// Lease id, or `undefined` when the backend could not allocate.
    pub fn acquire(&mut self, width: f32, height: f32) -> Option<u32> {
        match self.manager.acquire(Viewport::new(width, height)) {
            Ok(lease) => Some(lease.0 as u32),
            Err(err) => {
                log::warn!("scene: acquire failed: {err}");
                None
            }
        }
    }

    pub fn release(&mut self, lease: u32) {
        self.manager.release(SceneLease(lease as u64));
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.manager.resize(Viewport::new(width, height));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.manager.pointer_move(x, y);
    }

    /// Returns false once the scene has been disposed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.manager.tick(now_ms)
    }
}
