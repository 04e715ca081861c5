/// Input event types the effects understand, in CSS pixels relative to the
/// canvas' top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A press began. `secondary` is set for the right mouse button and for
    /// touches, which the text morph treats as its "destroy" gesture.
    PointerDown { x: f32, y: f32, secondary: bool },
    /// The press ended.
    PointerUp,
    /// The pointer moved (pressed or not).
    PointerMove { x: f32, y: f32 },
}

/// A queue of input events.
/// Listeners push into the queue; the frame driver hands it to the effect
/// and drains it after the update.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from listener callbacks).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Latest pointer state, folded from the event stream.
///
/// Effects keep one of these across frames because a press usually spans
/// many frames while events only arrive on change.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pub pressed: bool,
    pub secondary: bool,
}

impl PointerState {
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { x, y, secondary } => {
                self.x = x;
                self.y = y;
                self.pressed = true;
                self.secondary = secondary;
            }
            InputEvent::PointerUp => {
                self.pressed = false;
                self.secondary = false;
            }
            InputEvent::PointerMove { x, y } => {
                self.x = x;
                self.y = y;
            }
        }
    }

    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a InputEvent>) {
        for event in events {
            self.apply(event);
        }
    }
}
