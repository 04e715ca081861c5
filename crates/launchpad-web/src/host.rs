use launchpad_fx::{FrameHandle, FxError, FxResult, Host, ListenerKind};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, Window};

use crate::js_error;

pub type FrameCallback = Closure<dyn FnMut(f64)>;
pub type EventCallback = Closure<dyn FnMut(Event)>;

/// [`Host`] backed by `requestAnimationFrame` and DOM event listeners.
///
/// The callbacks are built by the owner of the mount and only hold weak
/// references back to it, so dropping the mount frees everything.
pub struct WebHost {
    window: Window,
    canvas: HtmlCanvasElement,
    on_frame: FrameCallback,
    make_listener: Box<dyn Fn(ListenerKind) -> EventCallback>,
    listeners: Vec<(ListenerKind, EventCallback)>,
}

impl WebHost {
    pub fn new(
        window: Window,
        canvas: HtmlCanvasElement,
        on_frame: FrameCallback,
        make_listener: Box<dyn Fn(ListenerKind) -> EventCallback>,
    ) -> Self {
        Self {
            window,
            canvas,
            on_frame,
            make_listener,
            listeners: Vec::new(),
        }
    }

    fn target(&self, kind: ListenerKind) -> &EventTarget {
        if kind.is_window_level() {
            AsRef::<EventTarget>::as_ref(&self.window)
        } else {
            AsRef::<EventTarget>::as_ref(&self.canvas)
        }
    }
}

impl Host for WebHost {
    fn request_frame(&mut self) -> FxResult<FrameHandle> {
        self.window
            .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
            .map(|id| FrameHandle(id as u32))
            .map_err(|err| FxError::Host(js_error(err)))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(err) = self.window.cancel_animation_frame(handle.0 as i32) {
            log::warn!("cancelAnimationFrame failed: {}", js_error(err));
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) -> FxResult<()> {
        let callback = (self.make_listener)(kind);
        let options = AddEventListenerOptions::new();
        options.set_passive(!kind.cancels_default());
        self.target(kind)
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind.event_name(),
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|err| FxError::Host(js_error(err)))?;
        self.listeners.push((kind, callback));
        Ok(())
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        let Some(pos) = self.listeners.iter().position(|(k, _)| *k == kind) else {
            return;
        };
        let (kind, callback) = self.listeners.remove(pos);
        if let Err(err) = self
            .target(kind)
            .remove_event_listener_with_callback(kind.event_name(), callback.as_ref().unchecked_ref())
        {
            log::warn!("removeEventListener({}) failed: {}", kind.event_name(), js_error(err));
        }
    }
}
