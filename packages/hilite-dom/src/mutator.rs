use std::collections::HashSet;

use crate::range::BoundaryPoint;
use crate::{Attribute, BaseDocument, ElementData, NodeData, QualName, local_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendTextErr {
    /// The node is not a text node
    NotTextNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitTextErr {
    /// The node is not a text node
    NotTextNode,
    /// The offset is past the end of the text
    OffsetOutOfBounds,
    /// The offset falls inside a multi-byte character
    NotCharBoundary,
}

pub struct DocumentMutator<'doc> {
    /// Document is public as an escape hatch, but users of this API should ideally avoid using it
    /// and prefer exposing additional functionality in DocumentMutator.
    pub doc: &'doc mut BaseDocument,

    // Tracked state for deferred processing when mutations have completed
    /// Elements whose id attribute was set, cleared or (dis)connected
    id_nodes: HashSet<usize>,
    /// Whether nodes were detached or dropped since the last flush
    structure_changed: bool,
}

impl Drop for DocumentMutator<'_> {
    fn drop(&mut self) {
        self.flush(); // Defined at bottom of file
    }
}

impl DocumentMutator<'_> {
    pub fn new<'doc>(doc: &'doc mut BaseDocument) -> DocumentMutator<'doc> {
        DocumentMutator {
            doc,
            id_nodes: HashSet::new(),
            structure_changed: false,
        }
    }

    pub fn node_has_parent(&self, node_id: usize) -> bool {
        self.doc.nodes[node_id].parent.is_some()
    }

    pub fn previous_sibling_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].backward(1).map(|node| node.id)
    }

    pub fn next_sibling_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].forward(1).map(|node| node.id)
    }

    pub fn last_child_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].children.last().copied()
    }

    pub fn element_name(&self, node_id: usize) -> Option<&QualName> {
        self.doc.nodes[node_id].element_data().map(|el| &el.name)
    }

    pub fn create_comment_node(&mut self) -> usize {
        self.doc.create_node(NodeData::Comment)
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        self.doc.create_text_node(text)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> usize {
        let data = ElementData::new(name, attrs);
        let has_id = data.id.is_some();
        let id = self.doc.create_node(NodeData::Element(data));
        if has_id {
            self.id_nodes.insert(id);
        }
        id
    }

    /// Remove all of the children from old_parent_id and append them to new_parent_id
    pub fn reparent_children(&mut self, old_parent_id: usize, new_parent_id: usize) {
        let child_ids = std::mem::take(&mut self.doc.nodes[old_parent_id].children);
        for child_id in &child_ids {
            self.doc.nodes[*child_id].parent = None;
        }
        self.append_children(new_parent_id, &child_ids);
    }

    pub fn append_children(&mut self, parent_id: usize, child_ids: &[usize]) {
        self.doc.append(parent_id, child_ids);
    }

    pub fn insert_nodes_after(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        let Some(anchor) = self.doc.get_node(anchor_node_id) else {
            return;
        };
        let Some(parent_id) = anchor.parent else {
            return;
        };

        match anchor.forward(1).map(|node| node.id) {
            Some(next_sibling_id) => self.doc.insert_before(next_sibling_id, new_node_ids),
            None => self.doc.append(parent_id, new_node_ids),
        }
    }

    pub fn insert_nodes_before(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        self.doc.insert_before(anchor_node_id, new_node_ids);
    }

    pub fn replace_node_with(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        self.doc.insert_before(anchor_node_id, new_node_ids);
        self.remove_node(anchor_node_id);
    }

    /// Detach a node (and its subtree) from the tree without dropping it
    pub fn remove_node(&mut self, node_id: usize) {
        self.doc.remove_node(node_id);
        self.structure_changed = true;
    }

    /// Detach a node and drop it (and its subtree) from the document
    pub fn remove_and_drop_node(&mut self, node_id: usize) {
        self.doc.remove_and_drop_node(node_id);
        self.structure_changed = true;
    }

    pub fn remove_node_if_unparented(&mut self, node_id: usize) {
        if let Some(node) = self.doc.get_node(node_id) {
            if node.parent.is_none() {
                self.remove_and_drop_node(node_id);
            }
        }
    }

    pub fn append_text_to_node(&mut self, node_id: usize, text: &str) -> Result<(), AppendTextErr> {
        match self.doc.nodes[node_id].text_data_mut() {
            Some(data) => {
                data.content += text;
                Ok(())
            }
            None => Err(AppendTextErr::NotTextNode),
        }
    }

    pub fn set_node_text(&mut self, node_id: usize, value: &str) {
        let Some(node) = self.doc.get_node_mut(node_id) else {
            return;
        };

        let NodeData::Text(ref mut text) = node.data else {
            return;
        };

        if text.content != value {
            text.content.clear();
            text.content.push_str(value);
        }
    }

    pub fn add_attrs_if_missing(&mut self, node_id: usize, attrs: Vec<Attribute>) {
        let Some(element_data) = self.doc.nodes[node_id].element_data() else {
            return;
        };

        let existing_names = element_data
            .attrs
            .iter()
            .map(|e| e.name.clone())
            .collect::<HashSet<_>>();

        for attr in attrs
            .into_iter()
            .filter(|attr| !existing_names.contains(&attr.name))
        {
            self.set_attribute(node_id, attr.name, &attr.value);
        }
    }

    pub fn set_attribute(&mut self, node_id: usize, name: QualName, value: &str) {
        let node = &mut self.doc.nodes[node_id];
        let NodeData::Element(ref mut element) = node.data else {
            return;
        };

        element.attrs.set(name.clone(), value);

        if name.local == local_name!("style") {
            element.flush_style_attribute();
        } else if name.local == local_name!("id") {
            element.flush_id();
            self.id_nodes.insert(node_id);
        }
    }

    pub fn clear_attribute(&mut self, node_id: usize, name: QualName) {
        let node = &mut self.doc.nodes[node_id];
        let NodeData::Element(ref mut element) = node.data else {
            return;
        };

        // FIXME: check namespace
        element.attrs.retain(|attr| attr.name.local != name.local);

        if name.local == local_name!("style") {
            element.flush_style_attribute();
        } else if name.local == local_name!("id") {
            element.flush_id();
            self.id_nodes.insert(node_id);
        }
    }

    /// Split a text node at a byte offset. The original node keeps `[..offset]`,
    /// a new sibling inserted directly after it receives `[offset..]`.
    ///
    /// Selection endpoints after the split point move to the new node, and the
    /// node's layout box is divided between the halves by character count.
    pub fn split_text_node(&mut self, node_id: usize, offset: usize) -> Result<usize, SplitTextErr> {
        let node = self
            .doc
            .get_node_mut(node_id)
            .ok_or(SplitTextErr::NotTextNode)?;
        let layout = node.final_layout;
        let text = node.text_data_mut().ok_or(SplitTextErr::NotTextNode)?;

        if offset > text.content.len() {
            return Err(SplitTextErr::OffsetOutOfBounds);
        }
        if !text.content.is_char_boundary(offset) {
            return Err(SplitTextErr::NotCharBoundary);
        }

        let tail = text.content.split_off(offset);
        let head_chars = text.content.chars().count();
        let tail_chars = tail.chars().count();

        let new_id = self.doc.create_text_node(&tail);
        self.insert_nodes_after(node_id, &[new_id]);

        let (head_rect, tail_rect) = split_rect(layout, head_chars, tail_chars);
        self.doc.nodes[node_id].final_layout = head_rect;
        self.doc.nodes[new_id].final_layout = tail_rect;

        for endpoint in self.doc.selection.endpoints_mut() {
            if endpoint.node == Some(node_id) && endpoint.offset > offset {
                endpoint.set_node(new_id, endpoint.offset - offset);
            }
        }
        for point in self.doc.pending_command_points_mut() {
            if point.node == node_id && point.offset > offset {
                *point = BoundaryPoint::new(new_id, point.offset - offset);
            }
        }

        Ok(new_id)
    }

    /// Replace an element with its children. Returns false if the node is
    /// detached (there is nowhere to move the children to).
    pub fn unwrap_node(&mut self, node_id: usize) -> bool {
        let Some(node) = self.doc.get_node(node_id) else {
            return false;
        };
        if node.parent.is_none() {
            return false;
        }

        let children = node.children.clone();
        self.doc.insert_before(node_id, &children);
        if self.doc.nodes[node_id].element_data().is_some_and(|el| el.id.is_some()) {
            self.id_nodes.insert(node_id);
        }
        self.remove_and_drop_node(node_id);
        true
    }

    /// Merge adjacent text nodes and drop empty text nodes in the subtree of `node_id`
    pub fn normalize(&mut self, node_id: usize) {
        let Some(node) = self.doc.get_node(node_id) else {
            return;
        };
        let children = node.children.clone();

        let mut previous_text: Option<usize> = None;
        for child_id in children {
            let child = &self.doc.nodes[child_id];
            let Some(text) = child.text_data() else {
                previous_text = None;
                if child.is_element() {
                    self.normalize(child_id);
                }
                continue;
            };

            if text.content.is_empty() {
                self.move_selection_out_of(child_id, previous_text);
                self.remove_and_drop_node(child_id);
                continue;
            }

            match previous_text {
                Some(prev_id) => {
                    let content = text.content.clone();
                    let rect = child.final_layout;
                    let prev = &mut self.doc.nodes[prev_id];
                    let prev_len = prev.len();
                    prev.final_layout = union_rect(prev.final_layout, rect);
                    if let Some(prev_text) = prev.text_data_mut() {
                        prev_text.content.push_str(&content);
                    }
                    for endpoint in self.doc.selection.endpoints_mut() {
                        if endpoint.node == Some(child_id) {
                            endpoint.set_node(prev_id, prev_len + endpoint.offset);
                        }
                    }
                    for point in self.doc.pending_command_points_mut() {
                        if point.node == child_id {
                            *point = BoundaryPoint::new(prev_id, prev_len + point.offset);
                        }
                    }
                    self.remove_and_drop_node(child_id);
                }
                None => previous_text = Some(child_id),
            }
        }
    }

    fn move_selection_out_of(&mut self, node_id: usize, fallback: Option<usize>) {
        let fallback = fallback.map(|id| BoundaryPoint::new(id, self.doc.nodes[id].len()));
        for endpoint in self.doc.selection.endpoints_mut() {
            if endpoint.node == Some(node_id) {
                match fallback {
                    Some(point) => endpoint.set_node(point.node, point.offset),
                    None => endpoint.clear(),
                }
            }
        }
        if let Some(point) = fallback {
            for pending in self.doc.pending_command_points_mut() {
                if pending.node == node_id {
                    *pending = point;
                }
            }
        }
    }

    /// Wrap `[start..end]` of a text node in a new element, splitting the text
    /// node as needed. Returns the new element's id.
    pub fn surround_text(
        &mut self,
        node_id: usize,
        start: usize,
        end: usize,
        name: QualName,
        attrs: Vec<Attribute>,
    ) -> Result<usize, SplitTextErr> {
        let len = self
            .doc
            .get_node(node_id)
            .and_then(|node| node.text_data())
            .map(|text| text.content.len())
            .ok_or(SplitTextErr::NotTextNode)?;
        if start > end || end > len {
            return Err(SplitTextErr::OffsetOutOfBounds);
        }

        if end < len {
            self.split_text_node(node_id, end)?;
        }
        let target_id = if start > 0 {
            self.split_text_node(node_id, start)?
        } else {
            node_id
        };

        let element_id = self.create_element(name, attrs);
        self.doc.nodes[element_id].final_layout = self.doc.nodes[target_id].final_layout;
        self.insert_nodes_before(target_id, &[element_id]);
        self.append_children(element_id, &[target_id]);

        Ok(element_id)
    }

    /// Replace the children of a node with the parsed HTML fragment
    pub fn set_inner_html(&mut self, node_id: usize, html: &str) {
        let children = std::mem::take(&mut self.doc.nodes[node_id].children);
        for child_id in children {
            self.doc.nodes[child_id].parent = None;
            self.remove_and_drop_node(child_id);
        }

        let provider = self.doc.html_parser_provider.clone();
        provider.parse_inner_html(self, node_id, html);
        self.id_nodes.insert(node_id);
    }
}

impl<'doc> DocumentMutator<'doc> {
    pub fn flush(&mut self) {
        if !self.id_nodes.is_empty() || self.structure_changed {
            self.doc.rebuild_id_map();
            self.id_nodes.clear();
        }

        if std::mem::take(&mut self.structure_changed) {
            self.doc.revalidate_selection();
        }
    }
}

impl BaseDocument {
    /// Recompute the id attribute map from the connected tree
    pub(crate) fn rebuild_id_map(&mut self) {
        let mut map = std::collections::HashMap::new();
        for node_id in crate::traversal::TreeTraverser::new(self) {
            if let Some(id_attr) = self.nodes[node_id].element_data().and_then(|el| el.id.as_ref()) {
                map.entry(id_attr.clone()).or_insert(node_id);
            }
        }
        self.nodes_to_id = map;
    }
}

fn split_rect(rect: kurbo::Rect, head_chars: usize, tail_chars: usize) -> (kurbo::Rect, kurbo::Rect) {
    let total = head_chars + tail_chars;
    if rect.area() == 0.0 || total == 0 {
        return (rect, kurbo::Rect::ZERO);
    }
    let split_x = rect.x0 + rect.width() * (head_chars as f64 / total as f64);
    (
        kurbo::Rect::new(rect.x0, rect.y0, split_x, rect.y1),
        kurbo::Rect::new(split_x, rect.y0, rect.x1, rect.y1),
    )
}

fn union_rect(a: kurbo::Rect, b: kurbo::Rect) -> kurbo::Rect {
    match (a.area() == 0.0, b.area() == 0.0) {
        (true, _) => b,
        (_, true) => a,
        _ => a.union(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentConfig, qual_name};

    fn paragraph(text: &str) -> (BaseDocument, usize, usize) {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let p = doc.create_element(qual_name!("p", html), vec![]);
        let t = doc.create_text_node(text);
        doc.append(0, &[p]);
        doc.append(p, &[t]);
        (doc, p, t)
    }

    #[test]
    fn split_moves_selection_and_layout() {
        let (mut doc, p, t) = paragraph("abcdef");
        doc.nodes[t].final_layout = kurbo::Rect::new(0.0, 0.0, 60.0, 10.0);
        doc.set_selection(BoundaryPoint::new(t, 1), BoundaryPoint::new(t, 5));

        let tail = doc.mutate().split_text_node(t, 3).unwrap();

        assert_eq!(doc.nodes[p].children, vec![t, tail]);
        assert_eq!(doc.nodes[t].text_content(), "abc");
        assert_eq!(doc.nodes[tail].text_content(), "def");
        assert_eq!(doc.nodes[t].final_layout.x1, 30.0);
        assert_eq!(doc.nodes[tail].final_layout.x0, 30.0);
        assert_eq!(doc.selection_text(), "bcde");
        assert_eq!(doc.selection().focus.point(), Some(BoundaryPoint::new(tail, 2)));
    }

    #[test]
    fn split_rejects_bad_offsets() {
        let (mut doc, p, t) = paragraph("héllo");
        let mut mutr = doc.mutate();
        assert_eq!(mutr.split_text_node(t, 2), Err(SplitTextErr::NotCharBoundary));
        assert_eq!(mutr.split_text_node(t, 10), Err(SplitTextErr::OffsetOutOfBounds));
        assert_eq!(mutr.split_text_node(p, 0), Err(SplitTextErr::NotTextNode));
    }

    #[test]
    fn surround_then_unwrap_restores_text() {
        let (mut doc, p, t) = paragraph("Hello world");
        let span = doc
            .mutate()
            .surround_text(t, 6, 11, qual_name!("span", html), vec![])
            .unwrap();
        assert_eq!(doc.nodes[p].inner_html(), "Hello <span>world</span>");

        let mut mutr = doc.mutate();
        assert!(mutr.unwrap_node(span));
        mutr.normalize(p);
        drop(mutr);

        assert_eq!(doc.nodes[p].inner_html(), "Hello world");
        assert_eq!(doc.nodes[p].children.len(), 1);
        assert!(doc.get_node(span).is_none());
    }

    #[test]
    fn id_map_is_refreshed_on_flush() {
        let (mut doc, p, _t) = paragraph("x");
        {
            let mut mutr = doc.mutate();
            mutr.set_attribute(p, qual_name!("id"), "intro");
        }
        assert_eq!(doc.get_element_by_id("intro"), Some(p));

        doc.mutate().clear_attribute(p, qual_name!("id"));
        assert_eq!(doc.get_element_by_id("intro"), None);
    }

    #[test]
    fn normalize_merges_and_drops_empty() {
        let (mut doc, p, t) = paragraph("ab");
        let mut mutr = doc.mutate();
        let empty = mutr.create_text_node("");
        let tail = mutr.create_text_node("cd");
        mutr.append_children(p, &[empty, tail]);
        mutr.normalize(p);
        drop(mutr);

        assert_eq!(doc.nodes[p].children, vec![t]);
        assert_eq!(doc.nodes[t].text_content(), "abcd");
    }
}
