//! Makes sure the highlight stylesheet exists exactly once per document.

use std::collections::HashSet;
use std::fmt::Write;

use crate::HighlightColor;
use crate::adapter::DocumentTreeAdapter;
use crate::wrapper::WRAPPER_CLASS;

/// The stylesheet text: a base rule plus one rule per palette colour
pub fn highlight_css() -> String {
    let mut css = format!(
        ".{WRAPPER_CLASS} {{ border-radius: 2px; padding: 0 1px; cursor: pointer; }}\n"
    );
    for color in HighlightColor::ALL {
        let _ = writeln!(
            css,
            ".{} {{ background-color: {}; }}",
            color.class_name(),
            color.background()
        );
    }
    css
}

/// Remembers which documents already had their stylesheet injected.
///
/// Scoped to whoever owns it (normally a [`Highlighter`](crate::Highlighter)), not process-wide.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    injected: HashSet<usize>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the stylesheet exists in `doc`. Returns true if it was inserted by this call.
    pub fn ensure(&mut self, doc: &mut dyn DocumentTreeAdapter, element_id: &str) -> bool {
        if self.injected.contains(&doc.document_id()) {
            return false;
        }
        let inserted = doc.ensure_style_element(element_id, &highlight_css());
        self.injected.insert(doc.document_id());

        #[cfg(feature = "tracing")]
        if inserted {
            tracing::debug!("Injected highlight stylesheet into document {}", doc.document_id());
        }
        inserted
    }

    /// Forget a document (e.g. after it was torn down and its id may be reused)
    pub fn forget(&mut self, document_id: usize) {
        self.injected.remove(&document_id);
    }
}

/// Unguarded variant for callers that don't keep a registry around
pub fn ensure_highlight_styles(doc: &mut dyn DocumentTreeAdapter, element_id: &str) -> bool {
    doc.ensure_style_element(element_id, &highlight_css())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilite_dom::{BaseDocument, DocumentConfig, qual_name};

    fn doc_with_head() -> BaseDocument {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let html = doc.create_element(qual_name!("html", html), vec![]);
        let head = doc.create_element(qual_name!("head", html), vec![]);
        let body = doc.create_element(qual_name!("body", html), vec![]);
        doc.append(0, &[html]);
        doc.append(html, &[head, body]);
        doc
    }

    #[test]
    fn style_element_is_inserted_once() {
        let mut doc = doc_with_head();
        let mut registry = StyleRegistry::new();

        assert!(registry.ensure(&mut doc, "hilite-styles"));
        assert!(!registry.ensure(&mut doc, "hilite-styles"));
        assert!(!ensure_highlight_styles(&mut doc, "hilite-styles"));

        let style = doc.get_element_by_id("hilite-styles").unwrap();
        let head = doc.head_element().unwrap();
        assert_eq!(head.children, vec![style]);
        let css = doc.get_node(style).unwrap().text_content();
        assert!(css.contains(".hilite-peach { background-color: #fed7aa; }"));
        assert_eq!(css.lines().count(), 1 + HighlightColor::ALL.len());
    }
}
