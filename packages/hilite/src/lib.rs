//! Persistent text highlighting for headless documents.
//!
//! A [`Highlighter`] marks the live selection of a document with coloured wrapper
//! elements that all share one id, finds those wrappers again to recolour, annotate or
//! remove them, and tracks the selection for a floating toolbar. It works against any
//! tree implementing [`DocumentTreeAdapter`]; [`hilite_dom::BaseDocument`] is the
//! reference implementation.
//!
//! Applying a highlight tries three strategies in turn:
//!  - the document's native `hiliteColor` command, with the painted elements retrofitted into wrappers,
//!  - wrapping each selected text segment in a new `<span>`,
//!  - the native command again, retrofitted once the host has painted (see [`Highlighter::tick`]).
//!
//! ## Feature flags
//!  - `default`: Enables the features listed below.
//!  - `tracing`: Enables tracing support.

pub mod adapter;
pub mod apply;
mod bridge;
mod config;
mod decompose;
mod error;
mod guard;
mod highlighter;
mod id;
mod observer;
mod palette;
pub mod registry;
mod style_injector;
mod toolbar;
pub mod wrapper;

pub use adapter::{DocumentTreeAdapter, NodeId, WrapError};
pub use apply::{AppliedHighlight, HighlightStrategy, StrategyKind};
pub use bridge::FrameBridge;
pub use config::HighlighterConfig;
pub use decompose::{Segment, decompose};
pub use error::{BridgeError, HighlightError};
pub use guard::InFlightGuard;
pub use highlighter::Highlighter;
pub use id::generate_highlight_id;
pub use observer::{SelectionListener, SelectionObserver, TextSelection};
pub use palette::HighlightColor;
pub use registry::HighlightRecord;
pub use style_injector::{StyleRegistry, ensure_highlight_styles, highlight_css};
pub use toolbar::{ToolbarMetrics, ToolbarPosition, calculate_position};
