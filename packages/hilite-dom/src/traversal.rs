use std::cmp::Ordering;

use crate::{BaseDocument, Node};

#[derive(Clone)]
/// An pre-order tree traverser for a [BaseDocument](crate::document::BaseDocument).
pub struct TreeTraverser<'a> {
    doc: &'a BaseDocument,
    stack: Vec<usize>,
}

impl<'a> TreeTraverser<'a> {
    /// Creates a new tree traverser for the given document which starts at the root node.
    pub fn new(doc: &'a BaseDocument) -> Self {
        Self::new_with_root(doc, 0)
    }

    /// Creates a new tree traverser for the given document which starts at the specified node.
    pub fn new_with_root(doc: &'a BaseDocument, root: usize) -> Self {
        let mut stack = Vec::with_capacity(32);
        stack.push(root);
        TreeTraverser { doc, stack }
    }
}
impl Iterator for TreeTraverser<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.doc.get_node(id)?;
        self.stack.extend(node.children.iter().rev());
        Some(id)
    }
}

#[derive(Clone)]
/// An ancestor traverser for a [BaseDocument](crate::document::BaseDocument).
pub struct AncestorTraverser<'a> {
    doc: &'a BaseDocument,
    current: usize,
}
impl<'a> AncestorTraverser<'a> {
    /// Creates a new ancestor traverser for the given document and node ID.
    pub fn new(doc: &'a BaseDocument, node_id: usize) -> Self {
        AncestorTraverser {
            doc,
            current: node_id,
        }
    }
}
impl Iterator for AncestorTraverser<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let current_node = self.doc.get_node(self.current)?;
        self.current = current_node.parent?;
        Some(self.current)
    }
}

impl BaseDocument {
    /// Collect the nodes into a chain by traversing upwards
    pub fn node_chain(&self, node_id: usize) -> Vec<usize> {
        let mut chain = Vec::with_capacity(16);
        chain.push(node_id);
        chain.extend(
            AncestorTraverser::new(self, node_id).filter(|id| self.nodes[*id].is_element()),
        );
        chain
    }

    pub fn visit<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &Node),
    {
        TreeTraverser::new(self).for_each(|node_id| visit(node_id, &self.nodes[node_id]));
    }

    /// Compare the document order of two nodes.
    /// Returns Ordering::Less if node_a comes before node_b in document order.
    /// Returns Ordering::Greater if node_a comes after node_b.
    /// Returns Ordering::Equal if they are the same node.
    pub fn compare_document_order(&self, node_a: usize, node_b: usize) -> Ordering {
        if node_a == node_b {
            return Ordering::Equal;
        }

        // Build ancestor chains from root to node (inclusive)
        let chain_a = self.ancestor_chain_from_root(node_a);
        let chain_b = self.ancestor_chain_from_root(node_b);

        // Find where the chains diverge
        let common_depth = chain_a
            .iter()
            .zip(chain_b.iter())
            .take_while(|(a, b)| a == b)
            .count();

        // If one is an ancestor of the other
        if common_depth == chain_a.len() {
            return Ordering::Less;
        }
        if common_depth == chain_b.len() {
            return Ordering::Greater;
        }

        // Disconnected subtrees: fall back to a stable (but arbitrary) order
        if common_depth == 0 {
            return chain_a[0].cmp(&chain_b[0]);
        }

        // Compare position among siblings at the divergence point
        let divergent_a = chain_a[common_depth];
        let divergent_b = chain_b[common_depth];
        let parent = &self.nodes[chain_a[common_depth - 1]];

        for &child_id in &parent.children {
            if child_id == divergent_a {
                return Ordering::Less;
            }
            if child_id == divergent_b {
                return Ordering::Greater;
            }
        }

        Ordering::Equal
    }

    /// Build ancestor chain from root to node (inclusive), ordered [root, ..., node].
    fn ancestor_chain_from_root(&self, node_id: usize) -> Vec<usize> {
        let mut ancestors = Vec::with_capacity(16);
        let mut current = Some(node_id);
        while let Some(id) = current {
            ancestors.push(id);
            current = self.nodes.get(id).and_then(|node| node.parent);
        }
        ancestors.reverse();
        ancestors
    }

    /// Check if `ancestor_id` is a (strict) ancestor of `descendant_id`
    pub fn is_ancestor_of(&self, ancestor_id: usize, descendant_id: usize) -> bool {
        AncestorTraverser::new(self, descendant_id).any(|id| id == ancestor_id)
    }

    /// Whether `node_id` is `ancestor_id` or one of its descendants
    pub fn is_inclusive_ancestor_of(&self, ancestor_id: usize, node_id: usize) -> bool {
        ancestor_id == node_id || self.is_ancestor_of(ancestor_id, node_id)
    }

    /// The deepest node which is an inclusive ancestor of both nodes
    pub fn common_ancestor(&self, node_a: usize, node_b: usize) -> Option<usize> {
        let chain_a = self.ancestor_chain_from_root(node_a);
        let chain_b = self.ancestor_chain_from_root(node_b);
        chain_a
            .iter()
            .zip(chain_b.iter())
            .take_while(|(a, b)| a == b)
            .last()
            .map(|(a, _)| *a)
    }

    /// All text nodes in the subtree of `root_id` (inclusive), in document order
    pub fn text_leaves(&self, root_id: usize) -> Vec<usize> {
        TreeTraverser::new_with_root(self, root_id)
            .filter(|id| self.nodes[*id].is_text_node())
            .collect()
    }

    /// The first node after `start` in document order (excluding start's
    /// descendants) that satisfies `filter`
    pub fn next_node(&self, start: &Node, mut filter: impl FnMut(&Node) -> bool) -> Option<usize> {
        let mut current = start;
        loop {
            let next = match current.forward(1) {
                Some(sibling) => sibling,
                None => {
                    let mut ancestor = current.parent_node()?;
                    loop {
                        if let Some(sibling) = ancestor.forward(1) {
                            break sibling;
                        }
                        ancestor = ancestor.parent_node()?;
                    }
                }
            };

            if let Some(found) = TreeTraverser::new_with_root(self, next.id)
                .find(|id| filter(&self.nodes[*id]))
            {
                return Some(found);
            }
            current = next;
        }
    }

    pub fn iter_children_mut(
        &mut self,
        node_id: usize,
        mut cb: impl FnMut(usize, &mut BaseDocument),
    ) {
        let children = std::mem::take(&mut self.nodes[node_id].children);
        for child_id in children.iter().cloned() {
            cb(child_id, self);
        }
        self.nodes[node_id].children = children;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentConfig, qual_name};

    fn build() -> (BaseDocument, [usize; 5]) {
        // <div><p>one</p><p>two</p></div>
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let div = doc.create_element(qual_name!("div", html), vec![]);
        let p1 = doc.create_element(qual_name!("p", html), vec![]);
        let t1 = doc.create_text_node("one");
        let p2 = doc.create_element(qual_name!("p", html), vec![]);
        let t2 = doc.create_text_node("two");
        doc.append(0, &[div]);
        doc.append(div, &[p1, p2]);
        doc.append(p1, &[t1]);
        doc.append(p2, &[t2]);
        (doc, [div, p1, t1, p2, t2])
    }

    #[test]
    fn document_order() {
        let (doc, [div, p1, t1, p2, t2]) = build();
        assert_eq!(doc.compare_document_order(t1, t2), Ordering::Less);
        assert_eq!(doc.compare_document_order(p2, t1), Ordering::Greater);
        assert_eq!(doc.compare_document_order(div, t2), Ordering::Less);
        assert_eq!(doc.compare_document_order(p1, p1), Ordering::Equal);
    }

    #[test]
    fn ancestry() {
        let (doc, [div, p1, t1, p2, t2]) = build();
        assert!(doc.is_ancestor_of(div, t1));
        assert!(!doc.is_ancestor_of(p1, t2));
        assert!(!doc.is_ancestor_of(t1, t1));
        assert_eq!(doc.common_ancestor(t1, t2), Some(div));
        assert_eq!(doc.common_ancestor(t2, p2), Some(p2));
    }

    #[test]
    fn leaves_and_next_node() {
        let (doc, [div, _p1, t1, _p2, t2]) = build();
        assert_eq!(doc.text_leaves(div), vec![t1, t2]);
        let next_text = doc.next_node(&doc.nodes[t1], |node| node.is_text_node());
        assert_eq!(next_text, Some(t2));
        assert_eq!(doc.next_node(&doc.nodes[t2], |_| true), None);
    }
}
