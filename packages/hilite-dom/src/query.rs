use smallvec::SmallVec;

use crate::traversal::{AncestorTraverser, TreeTraverser};
use crate::{BaseDocument, Node};

impl BaseDocument {
    /// Find the node with the specified id attribute (if one exists)
    pub fn get_element_by_id(&self, id: &str) -> Option<usize> {
        self.nodes_to_id.get(id).copied()
    }

    /// Find all elements in the subtree of `root` (inclusive) carrying attribute `name`,
    /// optionally requiring an exact value. Results are in document order.
    pub fn query_by_attr(
        &self,
        root: usize,
        name: &str,
        value: Option<&str>,
    ) -> SmallVec<[usize; 32]> {
        self.query_all(root, |node| match node.attr(name) {
            Some(actual) => value.is_none_or(|expected| actual == expected),
            None => false,
        })
    }

    /// Find all elements in the subtree of `root` (inclusive) with the given class
    pub fn query_by_class(&self, root: usize, class: &str) -> SmallVec<[usize; 32]> {
        self.query_all(root, |node| node.has_class(class))
    }

    /// Find all nodes in the subtree of `root` (inclusive) matching a predicate
    pub fn query_all(
        &self,
        root: usize,
        mut predicate: impl FnMut(&Node) -> bool,
    ) -> SmallVec<[usize; 32]> {
        TreeTraverser::new_with_root(self, root)
            .filter(|id| predicate(&self.nodes[*id]))
            .collect()
    }

    /// The node itself or its nearest ancestor matching a predicate
    pub fn closest(&self, node_id: usize, mut predicate: impl FnMut(&Node) -> bool) -> Option<usize> {
        let node = self.nodes.get(node_id)?;
        if predicate(node) {
            return Some(node_id);
        }
        AncestorTraverser::new(self, node_id).find(|id| predicate(&self.nodes[*id]))
    }
}

#[cfg(test)]
mod tests {
    use crate::util::attr_name;
    use crate::{Attribute, BaseDocument, DocumentConfig, qual_name};

    #[test]
    fn attribute_and_class_queries() {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let outer = doc.create_element(
            qual_name!("div", html),
            vec![Attribute {
                name: attr_name("data-kind"),
                value: "outer".into(),
            }],
        );
        let inner = doc.create_element(
            qual_name!("span", html),
            vec![
                Attribute {
                    name: attr_name("data-kind"),
                    value: "inner".into(),
                },
                Attribute {
                    name: qual_name!("class"),
                    value: "a b".into(),
                },
            ],
        );
        let text = doc.create_text_node("x");
        doc.append(0, &[outer]);
        doc.append(outer, &[inner]);
        doc.append(inner, &[text]);

        assert_eq!(doc.query_by_attr(0, "data-kind", None).as_slice(), &[outer, inner]);
        assert_eq!(doc.query_by_attr(0, "data-kind", Some("inner")).as_slice(), &[inner]);
        assert_eq!(doc.query_by_class(0, "b").as_slice(), &[inner]);
        assert_eq!(doc.closest(text, |node| node.has_class("a")), Some(inner));
        assert_eq!(doc.closest(text, |node| node.is_text_node()), Some(text));
        assert_eq!(doc.closest(text, |node| node.has_class("zzz")), None);
    }
}
