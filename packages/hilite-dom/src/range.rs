//! DOM ranges: a pair of boundary points, and the queries the engine runs over them.

use std::cmp::Ordering;

use crate::BaseDocument;

/// A position in the tree.
///
/// For text nodes `offset` is a UTF-8 byte offset into the content, for every
/// other node it is an index into the node's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub node: usize,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: usize, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A contiguous span of the document between two boundary points.
///
/// `start` is never after `end` in document order for ranges produced by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomRange {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

/// The part of a single text node covered by a range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextLeaf {
    pub node: usize,
    pub start: usize,
    pub end: usize,
}

impl TextLeaf {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl DomRange {
    pub fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    /// A range covering the whole of a text node's content (or all of an element's children)
    pub fn select_node_contents(doc: &BaseDocument, node_id: usize) -> Option<Self> {
        let len = doc.get_node(node_id)?.len();
        Some(Self::new(
            BoundaryPoint::new(node_id, 0),
            BoundaryPoint::new(node_id, len),
        ))
    }

    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// The deepest node containing both boundary points
    pub fn common_ancestor(&self, doc: &BaseDocument) -> Option<usize> {
        doc.common_ancestor(self.start.node, self.end.node)
    }

    /// Whether the node (and therefore its entire subtree) lies fully inside the range
    pub fn contains_node(&self, doc: &BaseDocument, node_id: usize) -> bool {
        let Some(node) = doc.get_node(node_id) else {
            return false;
        };
        let Some(parent) = node.parent else {
            return false;
        };
        let Some(index) = node.child_index() else {
            return false;
        };
        let before = BoundaryPoint::new(parent, index);
        let after = BoundaryPoint::new(parent, index + 1);
        doc.compare_boundary_points(before, self.start) != Ordering::Less
            && doc.compare_boundary_points(after, self.end) != Ordering::Greater
    }

    /// Whether the range touches any part of the node's content
    pub fn intersects_node(&self, doc: &BaseDocument, node_id: usize) -> bool {
        let Some(node) = doc.get_node(node_id) else {
            return false;
        };
        let Some(parent) = node.parent else {
            return true;
        };
        let Some(index) = node.child_index() else {
            return false;
        };
        let before = BoundaryPoint::new(parent, index);
        let after = BoundaryPoint::new(parent, index + 1);
        doc.compare_boundary_points(before, self.end) == Ordering::Less
            && doc.compare_boundary_points(after, self.start) == Ordering::Greater
    }

    /// The text nodes intersected by the range, each clipped to the covered
    /// byte span. Zero-length portions are skipped.
    pub fn text_leaves(&self, doc: &BaseDocument) -> Vec<TextLeaf> {
        let Some(root) = self.common_ancestor(doc) else {
            return Vec::new();
        };

        doc.text_leaves(root)
            .into_iter()
            .filter_map(|node_id| {
                let len = doc.nodes[node_id].len();
                let node_start = BoundaryPoint::new(node_id, 0);
                let node_end = BoundaryPoint::new(node_id, len);

                if doc.compare_boundary_points(node_end, self.start) != Ordering::Greater
                    || doc.compare_boundary_points(node_start, self.end) != Ordering::Less
                {
                    return None;
                }

                // A boundary point strictly inside a text node's span can only
                // live in that text node itself
                let start = if self.start.node == node_id {
                    self.start.offset
                } else {
                    0
                };
                let end = if self.end.node == node_id {
                    self.end.offset
                } else {
                    len
                };

                let leaf = TextLeaf {
                    node: node_id,
                    start,
                    end,
                };
                (!leaf.is_empty()).then_some(leaf)
            })
            .collect()
    }

    /// The concatenated text content covered by the range
    pub fn text(&self, doc: &BaseDocument) -> String {
        self.text_leaves(doc)
            .iter()
            .filter_map(|leaf| {
                let text = doc.nodes[leaf.node].text_data()?;
                text.content.get(leaf.start..leaf.end)
            })
            .collect()
    }
}

impl BaseDocument {
    /// Compare two boundary points using the DOM boundary point algorithm.
    pub fn compare_boundary_points(&self, a: BoundaryPoint, b: BoundaryPoint) -> Ordering {
        if a.node == b.node {
            return a.offset.cmp(&b.offset);
        }

        if self.compare_document_order(a.node, b.node) == Ordering::Greater {
            return self.compare_boundary_points(b, a).reverse();
        }

        // a.node precedes b.node. If it is also an ancestor, find the child of a.node
        // which contains b.node and compare its index against a's offset
        if self.is_ancestor_of(a.node, b.node) {
            let mut child = b.node;
            while let Some(parent) = self.nodes[child].parent {
                if parent == a.node {
                    break;
                }
                child = parent;
            }
            let child_index = self.nodes[child].child_index().unwrap_or(0);
            if child_index < a.offset {
                return Ordering::Greater;
            }
        }

        Ordering::Less
    }

    /// Whether the point refers to a live node with an in-bounds offset
    /// (on a char boundary for text nodes)
    pub fn is_valid_boundary_point(&self, point: BoundaryPoint) -> bool {
        let Some(node) = self.get_node(point.node) else {
            return false;
        };
        match node.text_data() {
            Some(text) => text.content.is_char_boundary(point.offset),
            None => point.offset <= node.children.len(),
        }
    }

    /// Clamp a point so that it is valid: offsets past the end are moved to the
    /// end and text offsets are moved down to the nearest char boundary
    pub fn clamp_boundary_point(&self, point: BoundaryPoint) -> Option<BoundaryPoint> {
        let node = self.get_node(point.node)?;
        let offset = match node.text_data() {
            Some(text) => {
                let mut offset = point.offset.min(text.content.len());
                while !text.content.is_char_boundary(offset) {
                    offset -= 1;
                }
                offset
            }
            None => point.offset.min(node.children.len()),
        };
        Some(BoundaryPoint::new(point.node, offset))
    }

    /// Build a range from two arbitrary points, ordering them in document order
    pub fn ordered_range(&self, a: BoundaryPoint, b: BoundaryPoint) -> DomRange {
        match self.compare_boundary_points(a, b) {
            Ordering::Greater => DomRange::new(b, a),
            _ => DomRange::new(a, b),
        }
    }
}
