//! An implementation for Html5ever's sink trait, allowing us to parse HTML into a DOM.

use html5ever::ParseOpts;
use html5ever::tokenizer::TokenizerOpts;
use html5ever::tree_builder::TreeBuilderOpts;
use std::borrow::Cow;
use std::cell::{Cell, Ref, RefCell, RefMut};

use hilite_dom::node::Attribute;
use hilite_dom::{BaseDocument, DocumentMutator, NodeData, qual_name};
use html5ever::{
    QualName,
    tendril::{StrTendril, TendrilSink},
    tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink},
};

/// Convert an html5ever Attribute which uses tendril for its value to a hilite Attribute
/// which uses String.
fn html5ever_to_hilite_attr(attr: html5ever::Attribute) -> Attribute {
    Attribute {
        name: attr.name,
        value: attr.value.to_string(),
    }
}

fn parse_opts() -> ParseOpts {
    ParseOpts {
        tokenizer: TokenizerOpts::default(),
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false, // Enables parsing of <noscript> tags
            iframe_srcdoc: false,
            drop_doctype: true,
            quirks_mode: QuirksMode::NoQuirks,
        },
    }
}

pub struct DocumentHtmlParser<'doc> {
    document_mutator: RefCell<DocumentMutator<'doc>>,

    /// The node the parser treats as "the document"
    root: usize,

    /// Errors that occurred during parsing.
    pub errors: RefCell<Vec<Cow<'static, str>>>,

    /// The document's quirks mode.
    pub quirks_mode: Cell<QuirksMode>,
}

impl<'doc> DocumentHtmlParser<'doc> {
    #[track_caller]
    /// Get a mutable borrow of the DocumentMutator
    fn mutr(&self) -> RefMut<'_, DocumentMutator<'doc>> {
        self.document_mutator.borrow_mut()
    }
}

impl DocumentHtmlParser<'_> {
    pub fn new(doc: &mut BaseDocument) -> DocumentHtmlParser<'_> {
        Self::new_with_root(doc, 0)
    }

    fn new_with_root(doc: &mut BaseDocument, root: usize) -> DocumentHtmlParser<'_> {
        DocumentHtmlParser {
            document_mutator: RefCell::new(doc.mutate()),
            root,
            errors: RefCell::new(Vec::new()),
            quirks_mode: Cell::new(QuirksMode::NoQuirks),
        }
    }

    pub fn parse_into_doc<'d>(doc: &'d mut BaseDocument, html: &str) -> &'d mut BaseDocument {
        let sink = Self::new(doc);
        html5ever::parse_document(sink, parse_opts()).one(html);
        doc
    }

    /// Parse an HTML fragment (in the context of `element_id`) and append the
    /// result to the element's children
    pub fn parse_into_element(doc: &mut BaseDocument, element_id: usize, html: &str) {
        let context_name = doc
            .get_node(element_id)
            .and_then(|node| node.element_data())
            .map(|el| el.name.clone())
            .unwrap_or_else(|| qual_name!("body", html));

        // The fragment parser builds `<html>{fragment}</html>` under its document node,
        // so parse into a detached scratch node and move the content across afterwards
        let scratch = doc.create_node(NodeData::Document);
        let sink = Self::new_with_root(doc, scratch);
        html5ever::parse_fragment(sink, parse_opts(), context_name, Vec::new(), false).one(html);

        let mut mutr = doc.mutate();
        if let Some(&html_root) = mutr.doc.get_node(scratch).and_then(|n| n.children.first()) {
            mutr.reparent_children(html_root, element_id);
        }
        mutr.remove_and_drop_node(scratch);
    }
}

impl<'b> TreeSink for DocumentHtmlParser<'b> {
    type Output = ();

    // we use the ID of the nodes in the tree as the handle
    type Handle = usize;

    type ElemName<'a>
        = Ref<'a, QualName>
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        drop(self.document_mutator.into_inner());
        #[cfg(feature = "tracing")]
        for error in self.errors.borrow().iter() {
            tracing::debug!("HTML parse error: {error}");
        }
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.errors.borrow_mut().push(msg);
    }

    fn get_document(&self) -> Self::Handle {
        self.root
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.document_mutator.borrow(), |docm| {
            docm.element_name(*target)
                .expect("TreeSink::elem_name called on a node which is not an element!")
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<html5ever::Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs.into_iter().map(html5ever_to_hilite_attr).collect();
        self.mutr().create_element(name, attrs)
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.mutr().create_comment_node()
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.mutr().create_comment_node()
    }

    fn append(&self, parent_id: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(id) => self.mutr().append_children(*parent_id, &[id]),
            // If content to append is text, first attempt to append it to the last child of parent.
            // Else create a new text node and append it to the parent
            NodeOrText::AppendText(text) => {
                let last_child_id = self.mutr().last_child_id(*parent_id);
                let has_appended = if let Some(id) = last_child_id {
                    self.mutr().append_text_to_node(id, &text).is_ok()
                } else {
                    false
                };
                if !has_appended {
                    let new_child_id = self.mutr().create_text_node(&text);
                    self.mutr().append_children(*parent_id, &[new_child_id]);
                }
            }
        }
    }

    // Note: The tree builder promises we won't have a text node after the insertion point.
    fn append_before_sibling(&self, sibling_id: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        match new_node {
            NodeOrText::AppendNode(id) => self.mutr().insert_nodes_before(*sibling_id, &[id]),
            NodeOrText::AppendText(text) => {
                let previous_sibling_id = self.mutr().previous_sibling_id(*sibling_id);
                let has_appended = if let Some(id) = previous_sibling_id {
                    self.mutr().append_text_to_node(id, &text).is_ok()
                } else {
                    false
                };
                if !has_appended {
                    let new_child_id = self.mutr().create_text_node(&text);
                    self.mutr()
                        .insert_nodes_before(*sibling_id, &[new_child_id]);
                }
            }
        };
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.mutr().node_has_parent(*element) {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Sanitized content never depends on the doctype
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.quirks_mode.set(mode);
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<html5ever::Attribute>) {
        let attrs = attrs.into_iter().map(html5ever_to_hilite_attr).collect();
        self.mutr().add_attrs_if_missing(*target, attrs);
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.mutr().remove_node(*target);
    }

    fn reparent_children(&self, old_parent_id: &Self::Handle, new_parent_id: &Self::Handle) {
        self.mutr()
            .reparent_children(*old_parent_id, *new_parent_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HtmlDocument, HtmlProvider};
    use hilite_dom::DocumentConfig;
    use std::sync::Arc;

    #[test]
    fn parses_some_html() {
        let html = "<!DOCTYPE html><html><body><h1>hello world</h1></body></html>";
        let mut doc = BaseDocument::new(DocumentConfig::default());
        DocumentHtmlParser::parse_into_doc(&mut doc, html);

        let body = doc.body_element().unwrap();
        assert_eq!(body.inner_html(), "<h1>hello world</h1>");
    }

    #[test]
    fn id_map_is_populated() {
        let doc = HtmlDocument::from_html(
            "<p id=\"first\">one</p><p id=\"second\">two</p>",
            DocumentConfig::default(),
        );
        let second = doc.get_element_by_id("second").unwrap();
        assert_eq!(doc.get_node(second).unwrap().text_content(), "two");
    }

    #[test]
    fn inner_html_is_parsed_as_a_fragment() {
        let mut doc = BaseDocument::new(DocumentConfig {
            html_parser_provider: Some(Arc::new(HtmlProvider)),
            ..Default::default()
        });
        let div = doc.create_element(qual_name!("div", html), vec![]);
        doc.append(0, &[div]);

        doc.mutate()
            .set_inner_html(div, "Some <b>bold</b> &amp; <i>italic</i> text");

        let node = doc.get_node(div).unwrap();
        assert_eq!(
            node.inner_html(),
            "Some <b>bold</b> &amp; <i>italic</i> text"
        );
        assert_eq!(node.text_content(), "Some bold & italic text");
    }
}
