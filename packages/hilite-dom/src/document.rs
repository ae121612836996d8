use crate::editing::{EditingCapabilities, PendingCommand};
use crate::selection::Selection;
use crate::{
    Attribute, DocumentConfig, DocumentMutator, DummyHtmlParserProvider, ElementData,
    HtmlParserProvider, Node, NodeData, QualName, TextNodeData,
};
use hilite_traits::{DummyShellProvider, ShellProvider, Viewport};
use slab::Slab;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct BaseDocument {
    /// ID of the document
    id: usize,

    // Viewport details such as the dimensions, HiDPI scale, and zoom factor,
    pub(crate) viewport: Viewport,
    // Scroll within our viewport
    pub(crate) viewport_scroll: kurbo::Point,

    /// A slab-backed tree of nodes
    ///
    /// We pin the tree to a guarantee to the nodes it creates that the tree is stable in memory.
    /// There is no way to create the tree - publicly or privately - that would invalidate that invariant.
    pub(crate) nodes: Box<Slab<Node>>,

    /// The live (user) selection
    pub(crate) selection: Selection,
    /// Bumped every time the live selection changes
    pub(crate) selection_generation: u64,

    /// The node which is currently hovered (if any)
    pub(crate) hover_node_id: Option<usize>,
    /// The node which recieved a pointerdown event (if any)
    pub(crate) mousedown_node_id: Option<usize>,

    /// Map of node ID's for fast lookups
    pub(crate) nodes_to_id: HashMap<String, usize>,

    /// Native editing commands supported by this host
    pub(crate) capabilities: EditingCapabilities,
    /// Commands accepted but not yet painted into the tree (`DEFERRED_PAINT` hosts)
    pub(crate) pending_commands: Vec<PendingCommand>,
    /// Last ticket handed out for a deferred command
    pub(crate) next_command_ticket: u64,

    // Service providers
    /// Shell provider. Can be used to request a redraw or show a toast
    pub shell_provider: Arc<dyn ShellProvider>,
    /// HTML parser provider. Used to parse HTML for setInnerHTML
    pub html_parser_provider: Arc<dyn HtmlParserProvider>,
}

impl BaseDocument {
    /// Create a new (empty) [`BaseDocument`] with the specified configuration
    pub fn new(config: DocumentConfig) -> Self {
        static ID_GENERATOR: AtomicUsize = AtomicUsize::new(1);

        let id = ID_GENERATOR.fetch_add(1, Ordering::SeqCst);

        let mut doc = Self {
            id,
            viewport: config.viewport.unwrap_or_default(),
            viewport_scroll: kurbo::Point::ZERO,
            nodes: Box::new(Slab::new()),
            selection: Selection::default(),
            selection_generation: 0,
            hover_node_id: None,
            mousedown_node_id: None,
            nodes_to_id: HashMap::new(),
            capabilities: config.capabilities.unwrap_or_default(),
            pending_commands: Vec::new(),
            next_command_ticket: 0,
            shell_provider: config
                .shell_provider
                .unwrap_or_else(|| Arc::new(DummyShellProvider)),
            html_parser_provider: config
                .html_parser_provider
                .unwrap_or_else(|| Arc::new(DummyHtmlParserProvider)),
        };

        // Initialise document with root Document node
        doc.create_node(NodeData::Document);

        doc
    }

    pub fn set_shell_provider(&mut self, shell_provider: Arc<dyn ShellProvider>) {
        self.shell_provider = shell_provider;
    }

    pub fn set_html_parser_provider(&mut self, html_parser_provider: Arc<dyn HtmlParserProvider>) {
        self.html_parser_provider = html_parser_provider;
    }

    pub fn tree(&self) -> &Slab<Node> {
        &self.nodes
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn get_node(&self, node_id: usize) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn get_node_mut(&mut self, node_id: usize) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub fn mutate<'doc>(&'doc mut self) -> DocumentMutator<'doc> {
        DocumentMutator::new(self)
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn root_node_mut(&mut self) -> &mut Node {
        &mut self.nodes[0]
    }

    pub fn try_root_element(&self) -> Option<&Node> {
        self.root_node()
            .children
            .iter()
            .map(|id| &self.nodes[*id])
            .find(|node| node.is_element())
    }

    /// The `<html>` element, or the document node for fragments without one
    pub fn root_element(&self) -> &Node {
        self.try_root_element().unwrap_or_else(|| self.root_node())
    }

    /// The `<head>` element if the document has one
    pub fn head_element(&self) -> Option<&Node> {
        let root = self.try_root_element()?;
        root.children
            .iter()
            .map(|id| &self.nodes[*id])
            .find(|node| node.data.is_element_with_tag_name("head"))
    }

    /// The `<body>` element if the document has one
    pub fn body_element(&self) -> Option<&Node> {
        let root = self.try_root_element()?;
        root.children
            .iter()
            .map(|id| &self.nodes[*id])
            .find(|node| node.data.is_element_with_tag_name("body"))
    }

    pub fn create_node(&mut self, node_data: NodeData) -> usize {
        let slab_ptr = self.nodes.as_mut() as *mut Slab<Node>;

        let entry = self.nodes.vacant_entry();
        let id = entry.key();
        entry.insert(Node::new(slab_ptr, id, node_data));

        id
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        let content = text.to_string();
        let data = NodeData::Text(TextNodeData::new(content));
        self.create_node(data)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> usize {
        let data = ElementData::new(name, attrs);
        self.create_node(NodeData::Element(data))
    }

    /// Detach a node from its parent. The node (and its subtree) stays in the slab.
    pub fn remove_node(&mut self, node_id: usize) -> Option<usize> {
        let parent_id = self.nodes.get_mut(node_id)?.parent.take()?;
        self.nodes[parent_id].children.retain(|id| *id != node_id);
        Some(parent_id)
    }

    /// Detach a node from its parent and drop it and its subtree from the slab
    pub fn remove_and_drop_node(&mut self, node_id: usize) -> Option<Node> {
        fn remove_node_ignoring_parent(doc: &mut BaseDocument, node_id: usize) -> Option<Node> {
            let node = doc.nodes.try_remove(node_id);
            if let Some(node) = &node {
                if let Some(id_attr) = node.id_attr() {
                    if doc.nodes_to_id.get(id_attr) == Some(&node_id) {
                        doc.nodes_to_id.remove(id_attr);
                    }
                }
                for &child in &node.children {
                    remove_node_ignoring_parent(doc, child);
                }
            }
            node
        }

        self.remove_node(node_id);
        remove_node_ignoring_parent(self, node_id)
    }

    /// Insert `new_node_ids` (in order) as siblings directly before `anchor_node_id`
    pub fn insert_before(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        let Some(parent_id) = self.nodes[anchor_node_id].parent else {
            return;
        };

        for &new_id in new_node_ids {
            self.remove_node(new_id);
            let Some(anchor_idx) = self.nodes[parent_id].index_of_child(anchor_node_id) else {
                return;
            };
            self.nodes[parent_id].children.insert(anchor_idx, new_id);
            self.nodes[new_id].parent = Some(parent_id);
        }
    }

    /// Append `child_ids` (in order) as the last children of `parent_id`
    pub fn append(&mut self, parent_id: usize, child_ids: &[usize]) {
        for &child_id in child_ids {
            self.remove_node(child_id);
            self.nodes[parent_id].children.push(child_id);
            self.nodes[child_id].parent = Some(parent_id);
        }
    }

    /// Whether the node is attached (transitively) to the document node
    pub fn is_connected(&self, node_id: usize) -> bool {
        let mut current = node_id;
        loop {
            let Some(node) = self.nodes.get(current) else {
                return false;
            };
            match node.parent {
                Some(parent) => current = parent,
                None => return current == 0,
            }
        }
    }

    pub fn print_tree(&self) {
        crate::util::walk_tree(0, self.root_node());
    }

    pub fn print_subtree(&self, node_id: usize) {
        crate::util::walk_tree(0, &self.nodes[node_id]);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_scroll(&self) -> kurbo::Point {
        self.viewport_scroll
    }

    pub fn set_viewport_scroll(&mut self, scroll: kurbo::Point) {
        self.viewport_scroll = scroll;
    }

    pub fn capabilities(&self) -> EditingCapabilities {
        self.capabilities
    }

    pub fn set_capabilities(&mut self, capabilities: EditingCapabilities) {
        self.capabilities = capabilities;
    }

    pub fn get_hover_node_id(&self) -> Option<usize> {
        self.hover_node_id
    }

    pub fn set_mousedown_node_id(&mut self, node_id: Option<usize>) {
        self.mousedown_node_id = node_id;
    }
}

impl AsRef<BaseDocument> for BaseDocument {
    fn as_ref(&self) -> &BaseDocument {
        self
    }
}

impl AsMut<BaseDocument> for BaseDocument {
    fn as_mut(&mut self) -> &mut BaseDocument {
        self
    }
}
