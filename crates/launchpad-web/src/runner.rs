use std::cell::RefCell;
use std::rc::{Rc, Weak};

use launchpad_fx::{DriverState, Effect, FrameDriver, FxError, FxResult, InputEvent, ListenerKind, Viewport};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::canvas::CanvasSurface;
use crate::host::{EventCallback, FrameCallback, WebHost};
use crate::js_error;

/// Button index the DOM reports for a right click.
const SECONDARY_BUTTON: i16 = 2;

/// One effect running on one canvas inside a container element.
///
/// wasm-bindgen cannot export generic structs, so each demo keeps its
/// mounts in a `thread_local!` map generated by
/// [`export_effect!`](crate::export_effect).
pub struct EffectMount<E: Effect + 'static> {
    inner: Rc<RefCell<MountState<E>>>,
}

struct MountState<E: Effect> {
    driver: FrameDriver<E>,
    surface: CanvasSurface,
    host: WebHost,
    container: Element,
}

impl<E: Effect> MountState<E> {
    fn measure(&self) -> Viewport {
        let rect = self.container.get_bounding_client_rect();
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = rect.width() as f32;
        viewport_for(
            width,
            rect.height() as f32,
            self.driver.effect().preferred_height(width),
            dpr as f32,
        )
    }

    fn resize(&mut self) {
        let viewport = self.measure();
        if let Err(err) = self.driver.resize(viewport, &mut self.surface, &mut self.host) {
            log::warn!("{}: resize failed: {err}", self.driver.effect().name());
        }
    }
}

impl<E: Effect + 'static> EffectMount<E> {
    /// Create a canvas inside `#container_id` and start the effect on it.
    pub fn mount(container_id: &str, effect: E, seed: u64) -> FxResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| FxError::ContextUnavailable("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| FxError::ContextUnavailable("no document".to_string()))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| FxError::ContextUnavailable(format!("no element #{container_id}")))?;
        let canvas = document
            .create_element("canvas")
            .map_err(|err| FxError::Host(js_error(err)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| FxError::Host("created element is not a canvas".to_string()))?;
        let surface = CanvasSurface::new(canvas.clone())?;
        container
            .append_child(&canvas)
            .map_err(|err| FxError::Host(js_error(err)))?;

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<MountState<E>>>| {
            let host = WebHost::new(
                window,
                canvas,
                frame_callback(weak.clone()),
                listener_factory(weak.clone()),
            );
            RefCell::new(MountState {
                driver: FrameDriver::new(effect, seed),
                surface,
                host,
                container,
            })
        });
        let mount = Self { inner };

        {
            let mut guard = mount.inner.borrow_mut();
            let state = &mut *guard;
            let viewport = state.measure();
            state.driver.mount(viewport, &mut state.surface, &mut state.host)?;
        }
        Ok(mount)
    }

    pub fn state(&self) -> DriverState {
        self.inner
            .try_borrow()
            .map_or(DriverState::Running, |state| state.driver.state())
    }

    /// Apply a new config. Returns false when it equals the current one.
    pub fn reconfigure(&self, config: E::Config) -> bool {
        let Ok(mut guard) = self.inner.try_borrow_mut() else {
            log::warn!("reconfigure during a frame ignored");
            return false;
        };
        let state = &mut *guard;
        if !state.driver.reconfigure(config) {
            return false;
        }
        // Compact sizing may change the preferred canvas height.
        if state.measure() != state.driver.viewport() {
            state.resize();
        }
        true
    }

    /// Stop the loop, remove the listeners and detach the canvas.
    pub fn unmount(&self) {
        let Ok(mut guard) = self.inner.try_borrow_mut() else {
            log::warn!("unmount during a frame ignored");
            return;
        };
        let state = &mut *guard;
        if state.driver.state() == DriverState::TornDown {
            return;
        }
        state.driver.teardown(&mut state.host);
        state.surface.canvas().remove();
    }
}

impl<E: Effect + 'static> Drop for EffectMount<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn frame_callback<E: Effect + 'static>(weak: Weak<RefCell<MountState<E>>>) -> FrameCallback {
    Closure::new(move |now_ms: f64| {
        let Some(inner) = weak.upgrade() else { return };
        let Ok(mut guard) = inner.try_borrow_mut() else {
            log::warn!("frame callback re-entered, skipping");
            return;
        };
        let state = &mut *guard;
        if let Err(err) = state.driver.frame(now_ms, &mut state.surface, &mut state.host) {
            log::warn!("{}: frame failed: {err}", state.driver.effect().name());
        }
    })
}

fn listener_factory<E: Effect + 'static>(
    weak: Weak<RefCell<MountState<E>>>,
) -> Box<dyn Fn(ListenerKind) -> EventCallback> {
    Box::new(move |kind| {
        let weak = weak.clone();
        Closure::new(move |event: Event| {
            let Some(inner) = weak.upgrade() else { return };
            let Ok(mut guard) = inner.try_borrow_mut() else { return };
            let state = &mut *guard;
            if kind == ListenerKind::Resize {
                state.resize();
                return;
            }
            if let Some(input) = input_event(kind, &event, state.surface.canvas()) {
                state.driver.push_input(input);
            }
        })
    })
}

/// Translate a DOM event into canvas-relative input.
fn input_event(kind: ListenerKind, event: &Event, canvas: &HtmlCanvasElement) -> Option<InputEvent> {
    let rect = canvas.get_bounding_client_rect();
    let local = |client_x: i32, client_y: i32| {
        (
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    };

    if kind.cancels_default() {
        event.prevent_default();
    }

    match kind {
        ListenerKind::ContextMenu => None,
        ListenerKind::PointerDown => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            let (x, y) = local(mouse.client_x(), mouse.client_y());
            Some(InputEvent::PointerDown {
                x,
                y,
                secondary: mouse.button() == SECONDARY_BUTTON,
            })
        }
        ListenerKind::PointerMove => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            let (x, y) = local(mouse.client_x(), mouse.client_y());
            Some(InputEvent::PointerMove { x, y })
        }
        ListenerKind::PointerUp | ListenerKind::TouchEnd => Some(InputEvent::PointerUp),
        ListenerKind::TouchStart | ListenerKind::TouchMove => {
            let touch = event.dyn_ref::<TouchEvent>()?.touches().item(0)?;
            let (x, y) = local(touch.client_x(), touch.client_y());
            if kind == ListenerKind::TouchStart {
                // Touch has no secondary button; a touch is the destroy gesture.
                Some(InputEvent::PointerDown { x, y, secondary: true })
            } else {
                Some(InputEvent::PointerMove { x, y })
            }
        }
        ListenerKind::Resize => None,
    }
}

/// Canvas size for a container: full width, and the effect's preferred
/// height when it has one.
pub fn viewport_for(width: f32, height: f32, preferred_height: Option<f32>, dpr: f32) -> Viewport {
    let height = preferred_height.unwrap_or(height);
    Viewport::new(width.floor(), height.floor()).with_dpr(dpr)
}
