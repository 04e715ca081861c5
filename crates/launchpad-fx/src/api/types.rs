use glam::Vec2;

/// Size of the drawing area in CSS pixels plus the device pixel ratio.
///
/// Effects simulate and draw in CSS pixels; surfaces scale by `dpr` when
/// they own a backing buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, dpr: 1.0 }
    }

    pub fn with_dpr(mut self, dpr: f32) -> Self {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self
    }

    /// True when there is nothing to draw into.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width >= 1.0 && self.height >= 1.0)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Backing-buffer size in device pixels.
    pub fn buffer_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).round().max(0.0) as u32,
            (self.height * self.dpr).round().max(0.0) as u32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Opaque handle of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// Window/canvas listeners an effect may ask its host to register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Window resize; triggers a viewport remeasure.
    Resize,
    PointerDown,
    PointerUp,
    PointerMove,
    /// Suppresses the context menu so secondary-button drags reach the effect.
    ContextMenu,
    TouchStart,
    TouchEnd,
    TouchMove,
}

impl ListenerKind {
    /// DOM event name.
    pub fn event_name(self) -> &'static str {
        match self {
            ListenerKind::Resize => "resize",
            ListenerKind::PointerDown => "mousedown",
            ListenerKind::PointerUp => "mouseup",
            ListenerKind::PointerMove => "mousemove",
            ListenerKind::ContextMenu => "contextmenu",
            ListenerKind::TouchStart => "touchstart",
            ListenerKind::TouchEnd => "touchend",
            ListenerKind::TouchMove => "touchmove",
        }
    }

    /// Whether the listener goes on the window rather than the canvas.
    pub fn is_window_level(self) -> bool {
        matches!(self, ListenerKind::Resize)
    }

    /// Events whose browser default (context menu, page scroll) is cancelled.
    /// These must be registered as non-passive.
    pub fn cancels_default(self) -> bool {
        matches!(
            self,
            ListenerKind::ContextMenu | ListenerKind::TouchStart | ListenerKind::TouchMove
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_nan_viewports_are_empty() {
        assert!(Viewport::new(0.0, 600.0).is_empty());
        assert!(Viewport::new(800.0, f32::NAN).is_empty());
        assert!(!Viewport::new(800.0, 600.0).is_empty());
    }

    #[test]
    fn buffer_size_scales_by_dpr() {
        let vp = Viewport::new(400.0, 300.0).with_dpr(2.0);
        assert_eq!(vp.buffer_size(), (800, 600));
    }

    #[test]
    fn invalid_dpr_falls_back_to_one() {
        assert_eq!(Viewport::new(1.0, 1.0).with_dpr(0.0).dpr, 1.0);
    }

    #[test]
    fn touch_drags_and_context_menu_cancel_the_default() {
        assert!(ListenerKind::TouchStart.cancels_default());
        assert!(ListenerKind::TouchMove.cancels_default());
        assert!(ListenerKind::ContextMenu.cancels_default());
        assert!(!ListenerKind::TouchEnd.cancels_default());
        assert!(!ListenerKind::PointerMove.cancels_default());
        assert!(!ListenerKind::Resize.cancels_default());
    }
}
