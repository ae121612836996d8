//! The live (user) selection of a document.
//!
//! The selection is directional: the anchor is where the user started selecting and
//! the focus is where the selection currently ends. Use [`Selection::to_range`] to
//! get the endpoints in document order.

use crate::BaseDocument;
use crate::range::{BoundaryPoint, DomRange};

/// Represents one endpoint (anchor or focus) of a selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionEndpoint {
    pub(crate) node: Option<usize>,
    /// Byte offset for text nodes, child index otherwise
    pub offset: usize,
}

impl SelectionEndpoint {
    fn new(node: usize, offset: usize) -> Self {
        Self {
            node: Some(node),
            offset,
        }
    }

    /// Check if this endpoint is set
    pub fn is_some(&self) -> bool {
        self.node.is_some()
    }

    pub fn node(&self) -> Option<usize> {
        self.node
    }

    /// Clear this endpoint
    pub fn clear(&mut self) {
        self.node = None;
        self.offset = 0;
    }

    pub fn set_node(&mut self, node: usize, offset: usize) {
        self.node = Some(node);
        self.offset = offset;
    }

    pub fn point(&self) -> Option<BoundaryPoint> {
        self.node.map(|node| BoundaryPoint::new(node, self.offset))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// The anchor point (where selection started)
    pub anchor: SelectionEndpoint,
    /// The focus point (where selection currently ends)
    pub focus: SelectionEndpoint,
}

impl Selection {
    /// Create a selection spanning from anchor to focus
    pub fn new(
        anchor_node: usize,
        anchor_offset: usize,
        focus_node: usize,
        focus_offset: usize,
    ) -> Self {
        Self {
            anchor: SelectionEndpoint::new(anchor_node, anchor_offset),
            focus: SelectionEndpoint::new(focus_node, focus_offset),
        }
    }

    /// Check if there is an active (non-collapsed) selection.
    pub fn is_active(&self) -> bool {
        self.anchor.is_some() && self.focus.is_some() && self.anchor != self.focus
    }

    /// Whether both endpoints are set (the selection may still be collapsed)
    pub fn is_some(&self) -> bool {
        self.anchor.is_some() && self.focus.is_some()
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        self.anchor.clear();
        self.focus.clear();
    }

    /// Update the focus endpoint
    pub fn set_focus(&mut self, node: usize, offset: usize) {
        self.focus.set_node(node, offset);
    }

    /// The selection as a range with its endpoints in document order
    pub fn to_range(&self, doc: &BaseDocument) -> Option<DomRange> {
        let anchor = self.anchor.point()?;
        let focus = self.focus.point()?;
        Some(doc.ordered_range(anchor, focus))
    }

    pub(crate) fn endpoints_mut(&mut self) -> [&mut SelectionEndpoint; 2] {
        [&mut self.anchor, &mut self.focus]
    }
}

impl BaseDocument {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Incremented whenever the live selection is changed
    pub fn selection_generation(&self) -> u64 {
        self.selection_generation
    }

    /// Set the live selection. Endpoints are clamped to valid boundary points;
    /// returns false (leaving the selection untouched) if either node does not exist.
    pub fn set_selection(&mut self, anchor: BoundaryPoint, focus: BoundaryPoint) -> bool {
        let (Some(anchor), Some(focus)) = (
            self.clamp_boundary_point(anchor),
            self.clamp_boundary_point(focus),
        ) else {
            return false;
        };

        let selection = Selection::new(anchor.node, anchor.offset, focus.node, focus.offset);
        if selection != self.selection {
            self.selection = selection;
            self.selection_generation += 1;
        }
        true
    }

    /// Select a range (anchor at the start, focus at the end)
    pub fn select(&mut self, range: DomRange) -> bool {
        self.set_selection(range.start, range.end)
    }

    /// Select the whole content of a node
    pub fn select_node_contents(&mut self, node_id: usize) -> bool {
        match DomRange::select_node_contents(self, node_id) {
            Some(range) => self.select(range),
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_some() {
            self.selection.clear();
            self.selection_generation += 1;
        }
    }

    /// The live selection as an ordered range, if any endpoint is set
    pub fn selection_range(&self) -> Option<DomRange> {
        self.selection.to_range(self)
    }

    /// The text covered by the live selection ("" when there is none)
    pub fn selection_text(&self) -> String {
        self.selection_range()
            .map(|range| range.text(self))
            .unwrap_or_default()
    }

    /// Drop selection endpoints which point at nodes that are no longer in the tree
    pub(crate) fn revalidate_selection(&mut self) {
        let stale = [self.selection.anchor.node, self.selection.focus.node]
            .into_iter()
            .flatten()
            .any(|node| !self.is_connected(node));
        if stale {
            self.clear_selection();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentConfig, qual_name};

    #[test]
    fn backwards_selection_is_ordered() {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let p = doc.create_element(qual_name!("p", html), vec![]);
        let t = doc.create_text_node("selection text");
        doc.append(0, &[p]);
        doc.append(p, &[t]);

        assert!(doc.set_selection(BoundaryPoint::new(t, 9), BoundaryPoint::new(t, 0)));
        let range = doc.selection_range().unwrap();
        assert_eq!(range.start, BoundaryPoint::new(t, 0));
        assert_eq!(doc.selection_text(), "selection");
        assert!(doc.selection().is_active());
    }

    #[test]
    fn generation_tracks_changes() {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let t = doc.create_text_node("abc");
        doc.append(0, &[t]);

        let start = doc.selection_generation();
        doc.set_selection(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, 2));
        doc.set_selection(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, 2));
        assert_eq!(doc.selection_generation(), start + 1);

        doc.clear_selection();
        assert_eq!(doc.selection_generation(), start + 2);
        assert!(!doc.selection().is_active());
        assert_eq!(doc.selection_text(), "");
    }
}
