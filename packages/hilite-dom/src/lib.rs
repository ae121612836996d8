//! The host document tree for the hilite highlighting engine
//!
//! This crate implements a small headless DOM ([`BaseDocument`]), which is designed to be embedded in and "driven" by
//! external code. Most users will want to build one with
//! [`HtmlDocument`](https://docs.rs/hilite-html/latest/hilite_html/struct.HtmlDocument.html) from the
//! [hilite-html](https://docs.rs/hilite-html) crate, which parses (sanitized) HTML into a [`BaseDocument`].
//!
//! It includes: a DOM tree representation, ranges and a live selection, native editing commands
//! (`hiliteColor`), embedder-supplied node geometry and event handling. There is no style or layout
//! engine: the embedder measures nodes and records their boxes with [`BaseDocument::set_node_layout`].
//!
//! ## Feature flags
//!  - `default`: Enables the features listed below.
//!  - `tracing`: Enables tracing support.

/// The DOM implementation.
///
/// This is the primary entry point for this crate.
mod document;

/// The nodes themsleves, and their data.
pub mod node;

mod config;
mod events;
mod html;
/// Embedder-supplied geometry.
mod layout;
mod mutator;
mod query;
mod traversal;

pub mod editing;
pub mod range;
pub mod selection;
pub mod style;
pub mod util;

pub use config::DocumentConfig;
pub use document::BaseDocument;
pub use editing::{
    CommandOutcome, CommandSupport, CommandTicket, EditingCapabilities, ExecCommand, FlushedCommand,
};
pub use events::{EventDriver, EventHandler, NoopEventHandler};
pub use html::{DummyHtmlParserProvider, HtmlParserProvider};
pub use markup5ever::{
    LocalName, Namespace, NamespaceStaticSet, Prefix, PrefixStaticSet, QualName, local_name,
    namespace_prefix, namespace_url, ns,
};
pub use mutator::{AppendTextErr, DocumentMutator, SplitTextErr};
pub use node::{Attribute, ElementData, Node, NodeData, TextNodeData};
pub use range::{BoundaryPoint, DomRange, TextLeaf};
pub use selection::Selection;
pub use traversal::{AncestorTraverser, TreeTraverser};
