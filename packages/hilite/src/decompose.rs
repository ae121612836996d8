//! Turns a selection range into wrappable text segments.

use std::cmp::Ordering;

use hilite_dom::{BoundaryPoint, DomRange};

use crate::adapter::{DocumentTreeAdapter, NodeId};

/// A byte span of a single text node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn text<'a>(&self, doc: &'a dyn DocumentTreeAdapter) -> Option<&'a str> {
        doc.text(self.node)?.get(self.start..self.end)
    }
}

/// Decompose a range into the segments of text it covers, in document order.
///
/// Each segment lies within one text node. Empty and whitespace-only segments are
/// dropped, so boundaries that sit exactly on element edges do not produce spurious
/// segments.
pub fn decompose(doc: &dyn DocumentTreeAdapter, range: &DomRange) -> Vec<Segment> {
    if range.is_collapsed() {
        return Vec::new();
    }

    // Fast path: the whole selection is inside one text node
    if range.start.node == range.end.node {
        if let Some(text) = doc.text(range.start.node) {
            let segment = Segment {
                node: range.start.node,
                start: range.start.offset.min(range.end.offset),
                end: range.end.offset.max(range.start.offset).min(text.len()),
            };
            return keep_if_visible(doc, segment).into_iter().collect();
        }
    }

    doc.find_text_leaves(range)
        .into_iter()
        .filter_map(|node| clip_leaf(doc, range, node))
        .filter_map(|segment| keep_if_visible(doc, segment))
        .collect()
}

/// Clip a text leaf to the range, or None if they don't intersect
fn clip_leaf(doc: &dyn DocumentTreeAdapter, range: &DomRange, node: NodeId) -> Option<Segment> {
    let len = doc.text(node)?.len();

    // Ends at or before the range start
    if doc.compare_boundary_points(BoundaryPoint::new(node, len), range.start) != Ordering::Greater {
        return None;
    }
    // Starts at or after the range end
    if doc.compare_boundary_points(BoundaryPoint::new(node, 0), range.end) != Ordering::Less {
        return None;
    }

    let start = if range.start.node == node {
        range.start.offset
    } else {
        0
    };
    let end = if range.end.node == node {
        range.end.offset.min(len)
    } else {
        len
    };

    Some(Segment { node, start, end })
}

fn keep_if_visible(doc: &dyn DocumentTreeAdapter, segment: Segment) -> Option<Segment> {
    let text = segment.text(doc)?;
    (!text.trim().is_empty()).then_some(segment)
}
