use bitflags::bitflags;
use keyboard_types::{Key, Modifiers};
use web_time::Instant;

/// An event targeted at a specific node, produced by hit-testing a [`UiEvent`].
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub target: usize,
    /// Which is true if the event bubbles up through the DOM tree.
    pub bubbles: bool,
    /// When the event was generated. Debouncing is measured against this.
    pub timestamp: Instant,
    /// Where true indicates that the default user agent action was prevented,
    /// and false indicates that it was not.
    pub default_prevented: bool,

    pub stop_propagation: bool,
    pub data: DomEventData,
}

impl DomEvent {
    pub fn new(target: usize, data: DomEventData) -> Self {
        Self::with_timestamp(target, data, Instant::now())
    }

    pub fn with_timestamp(target: usize, data: DomEventData, timestamp: Instant) -> Self {
        let bubbles = !matches!(data, DomEventData::SelectionChange);
        Self {
            target,
            bubbles,
            timestamp,
            default_prevented: false,
            stop_propagation: false,
            data,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.stop_propagation = true;
    }

    /// Returns the name of the event ("click", "pointerup", "selectionchange", etc)
    pub fn name(&self) -> &'static str {
        self.data.name()
    }
}

#[derive(Debug, Clone)]
pub enum DomEventData {
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    Click(PointerEvent),
    KeyDown(KeyEvent),
    /// The document's live selection changed. Fires often while dragging.
    SelectionChange,
}

impl DomEventData {
    pub fn name(&self) -> &'static str {
        match self {
            DomEventData::PointerDown { .. } => "pointerdown",
            DomEventData::PointerUp(event) if event.is_touch() => "touchend",
            DomEventData::PointerUp { .. } => "pointerup",
            DomEventData::Click { .. } => "click",
            DomEventData::KeyDown { .. } => "keydown",
            DomEventData::SelectionChange => "selectionchange",
        }
    }
}

/// Untargeted input as delivered by the embedder's windowing layer.
#[derive(Debug, Clone)]
pub enum UiEvent {
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    KeyDown(KeyEvent),
    SelectionChange,
}

#[derive(Debug, Clone, Copy)]
pub struct HitResult {
    /// The node_id of the node identified as the hit target
    pub node_id: usize,
    /// The x coordinate of the hit, relative to the viewport
    pub x: f32,
    /// The y coordinate of the hit, relative to the viewport
    pub y: f32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct PointerButtons: u8 {
        const PRIMARY = 0b0000_0001;
        const SECONDARY = 0b0000_0010;
        const AUXILIARY = 0b0000_0100;
    }
}

#[derive(Clone, Debug)]
pub struct PointerEvent {
    /// Viewport-relative x coordinate
    pub x: f32,
    /// Viewport-relative y coordinate
    pub y: f32,
    pub kind: PointerKind,
    pub buttons: PointerButtons,
    pub mods: Modifiers,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            kind: PointerKind::Mouse,
            buttons: PointerButtons::PRIMARY,
            mods: Modifiers::empty(),
        }
    }

    pub fn touch(x: f32, y: f32) -> Self {
        Self {
            kind: PointerKind::Touch,
            ..Self::new(x, y)
        }
    }

    pub fn is_touch(&self) -> bool {
        self.kind == PointerKind::Touch
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

impl KeyState {
    pub fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

#[derive(Clone, Debug)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyEvent {
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            state: KeyState::Pressed,
        }
    }
}
