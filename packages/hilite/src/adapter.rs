//! The seam between the highlighting algorithms and a concrete document tree.
//!
//! Everything in the engine talks to the document through [`DocumentTreeAdapter`].
//! [`BaseDocument`] implements it; other hosts (a webview bridge, an XML tree) can
//! implement it against their own node store. Nodes are identified by `usize` ids
//! which stay stable for as long as the node is alive.

use std::cmp::Ordering;

use color::Rgba8;
use hilite_dom::util::attr_name;
use hilite_dom::{
    Attribute, BaseDocument, BoundaryPoint, CommandOutcome, CommandSupport, DomRange, ExecCommand,
    FlushedCommand, qual_name,
};
use hilite_traits::BoundingBox;

use crate::decompose::Segment;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot wrap text node {node}: {reason}")]
pub struct WrapError {
    pub node: NodeId,
    pub reason: String,
}

pub trait DocumentTreeAdapter {
    /// Process-unique id of the document
    fn document_id(&self) -> usize;
    /// The document node
    fn root(&self) -> NodeId;

    /// Every text node under the range's common ancestor, in document order.
    /// Leaves are not clipped or filtered against the range.
    fn find_text_leaves(&self, range: &DomRange) -> Vec<NodeId>;
    /// Every text node under `node` (inclusive), in document order
    fn text_leaves_under(&self, node: NodeId) -> Vec<NodeId>;
    /// Wrap a segment in a new inline element carrying `attrs`
    fn wrap(&mut self, segment: &Segment, attrs: &[(&str, &str)]) -> Result<NodeId, WrapError>;
    /// Replace an element with its children and merge the text nodes this leaves adjacent
    fn unwrap(&mut self, node: NodeId) -> bool;
    /// Elements under `root` (inclusive) carrying attribute `key`, optionally with an exact value
    fn query_by_attribute(&self, root: NodeId, key: &str, value: Option<&str>) -> Vec<NodeId>;

    fn text(&self, node: NodeId) -> Option<&str>;
    fn text_content(&self, node: NodeId) -> String;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn is_connected(&self, node: NodeId) -> bool;
    fn attr(&self, node: NodeId, name: &str) -> Option<&str>;
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attr(&mut self, node: NodeId, name: &str);
    /// Whether the node is an inline element a native command could have produced
    fn is_wrapper_candidate(&self, node: NodeId) -> bool;
    /// The node itself or its nearest ancestor carrying attribute `name`
    fn closest_with_attribute(&self, node: NodeId, name: &str) -> Option<NodeId>;

    fn compare_boundary_points(&self, a: BoundaryPoint, b: BoundaryPoint) -> Ordering;
    fn common_ancestor(&self, range: &DomRange) -> Option<NodeId>;

    fn selection_range(&self) -> Option<DomRange>;
    fn selection_text(&self) -> String;
    fn clear_selection(&mut self);

    /// Viewport-relative box of a node
    fn node_rect(&self, node: NodeId) -> Option<BoundingBox>;
    /// Viewport-relative box of a range
    fn range_rect(&self, range: &DomRange) -> Option<BoundingBox>;

    fn query_command_supported(&self, command: &ExecCommand) -> CommandSupport;
    fn exec_command(&mut self, command: ExecCommand) -> CommandOutcome;
    /// Let the host paint the commands it deferred, reporting on each one
    fn flush_pending_commands(&mut self) -> Vec<FlushedCommand>;

    /// Insert a `<style>` element with the given id unless one already exists.
    /// Returns whether it inserted.
    fn ensure_style_element(&mut self, element_id: &str, css: &str) -> bool;
    /// The inline background colour of an element
    fn background_color(&self, node: NodeId) -> Option<Rgba8>;
    /// Drop inline background declarations from an element
    fn clear_background_color(&mut self, node: NodeId);

    fn request_redraw(&self) {}
    fn show_toast(&self, message: &str) {
        let _ = message;
    }
}

impl DocumentTreeAdapter for BaseDocument {
    fn document_id(&self) -> usize {
        self.id()
    }

    fn root(&self) -> NodeId {
        self.root_node().id
    }

    fn find_text_leaves(&self, range: &DomRange) -> Vec<NodeId> {
        match range.common_ancestor(self) {
            Some(ancestor) => self.text_leaves(ancestor),
            None => Vec::new(),
        }
    }

    fn text_leaves_under(&self, node: NodeId) -> Vec<NodeId> {
        match self.get_node(node) {
            Some(_) => self.text_leaves(node),
            None => Vec::new(),
        }
    }

    fn wrap(&mut self, segment: &Segment, attrs: &[(&str, &str)]) -> Result<NodeId, WrapError> {
        let attrs = attrs
            .iter()
            .map(|(name, value)| Attribute {
                name: attr_name(name),
                value: value.to_string(),
            })
            .collect();
        self.mutate()
            .surround_text(
                segment.node,
                segment.start,
                segment.end,
                qual_name!("span", html),
                attrs,
            )
            .map_err(|err| WrapError {
                node: segment.node,
                reason: format!("{err:?}"),
            })
    }

    fn unwrap(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.get_node(node).and_then(|n| n.parent) else {
            return false;
        };
        let mut mutr = self.mutate();
        if !mutr.unwrap_node(node) {
            return false;
        }
        mutr.normalize(parent);
        true
    }

    fn query_by_attribute(&self, root: NodeId, key: &str, value: Option<&str>) -> Vec<NodeId> {
        self.query_by_attr(root, key, value).into_vec()
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.get_node(node)?
            .text_data()
            .map(|text| text.content.as_str())
    }

    fn text_content(&self, node: NodeId) -> String {
        self.get_node(node)
            .map(|n| n.text_content())
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get_node(node)?.parent
    }

    fn is_connected(&self, node: NodeId) -> bool {
        BaseDocument::is_connected(self, node)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get_node(node)?.attr(name)
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if self.get_node(node).is_some() {
            self.mutate().set_attribute(node, attr_name(name), value);
        }
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        if self.get_node(node).is_some() {
            self.mutate().clear_attribute(node, attr_name(name));
        }
    }

    fn is_wrapper_candidate(&self, node: NodeId) -> bool {
        self.get_node(node)
            .and_then(|n| n.element_data())
            .is_some_and(|el| matches!(el.tag_name(), "span" | "mark" | "font"))
    }

    fn closest_with_attribute(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.closest(node, |n| n.attr(name).is_some())
    }

    fn compare_boundary_points(&self, a: BoundaryPoint, b: BoundaryPoint) -> Ordering {
        BaseDocument::compare_boundary_points(self, a, b)
    }

    fn common_ancestor(&self, range: &DomRange) -> Option<NodeId> {
        range.common_ancestor(self)
    }

    fn selection_range(&self) -> Option<DomRange> {
        BaseDocument::selection_range(self)
    }

    fn selection_text(&self) -> String {
        BaseDocument::selection_text(self)
    }

    fn clear_selection(&mut self) {
        BaseDocument::clear_selection(self)
    }

    fn node_rect(&self, node: NodeId) -> Option<BoundingBox> {
        BaseDocument::node_rect(self, node)
    }

    fn range_rect(&self, range: &DomRange) -> Option<BoundingBox> {
        BaseDocument::range_rect(self, range)
    }

    fn query_command_supported(&self, command: &ExecCommand) -> CommandSupport {
        BaseDocument::query_command_supported(self, command)
    }

    fn exec_command(&mut self, command: ExecCommand) -> CommandOutcome {
        BaseDocument::exec_command(self, command)
    }

    fn flush_pending_commands(&mut self) -> Vec<FlushedCommand> {
        BaseDocument::flush_pending_commands(self)
    }

    fn ensure_style_element(&mut self, element_id: &str, css: &str) -> bool {
        if self.get_element_by_id(element_id).is_some() {
            return false;
        }

        let parent = self
            .head_element()
            .or_else(|| self.try_root_element())
            .map(|node| node.id)
            .unwrap_or(0);

        let mut mutr = self.mutate();
        let style = mutr.create_element(
            qual_name!("style", html),
            vec![Attribute {
                name: qual_name!("id"),
                value: element_id.to_string(),
            }],
        );
        let text = mutr.create_text_node(css);
        mutr.append_children(style, &[text]);
        mutr.append_children(parent, &[style]);
        true
    }

    fn background_color(&self, node: NodeId) -> Option<Rgba8> {
        self.get_node(node)?.element_data()?.inline_background()
    }

    fn clear_background_color(&mut self, node: NodeId) {
        let Some(element) = self.get_node(node).and_then(|n| n.element_data()) else {
            return;
        };
        let mut style = element.style_attribute.clone();
        let removed = style.remove("background-color") | style.remove("background");
        if !removed {
            return;
        }

        let mut mutr = self.mutate();
        if style.is_empty() {
            mutr.clear_attribute(node, qual_name!("style"));
        } else {
            mutr.set_attribute(node, qual_name!("style"), &style.to_css_string());
        }
    }

    fn request_redraw(&self) {
        self.shell_provider.request_redraw();
    }

    fn show_toast(&self, message: &str) {
        self.shell_provider.show_toast(message);
    }
}
