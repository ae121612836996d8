//! Parse sanitized HTML into a [`BaseDocument`](hilite_dom::BaseDocument).

mod html_document;
mod html_sink;

pub use html_document::HtmlDocument;
pub use html_sink::DocumentHtmlParser;

use hilite_dom::{DocumentMutator, HtmlParserProvider};

/// [`HtmlParserProvider`] backed by html5ever. Used for `set_inner_html`.
pub struct HtmlProvider;

impl HtmlParserProvider for HtmlProvider {
    fn parse_inner_html<'m, 'doc>(
        &self,
        mutr: &'m mut DocumentMutator<'doc>,
        element_id: usize,
        html: &str,
    ) {
        DocumentHtmlParser::parse_into_element(mutr.doc, element_id, html);
    }
}
