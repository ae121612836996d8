//! Shared types for the hilite crates.
//!
//! These are plain data types with no dependency on the document tree, so they can be
//! shared between the DOM, the highlighting engine and whatever embeds them (including
//! a controlling UI that lives in a different frame and only sees [`FrameMessage`]s).

mod events;
pub use events::{
    DomEvent, DomEventData, HitResult, KeyEvent, KeyState, PointerButtons, PointerEvent,
    PointerKind, UiEvent,
};

mod geometry;
pub use geometry::BoundingBox;

pub mod messages;
pub use messages::{FrameMessage, HighlightData};

mod shell;
pub use shell::{DummyShellProvider, ShellProvider};

mod viewport;
pub use viewport::{ColorScheme, Viewport};
