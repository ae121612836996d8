use crate::DocumentMutator;

pub trait HtmlParserProvider {
    fn parse_inner_html<'m, 'doc>(
        &self,
        mutr: &'m mut DocumentMutator<'doc>,
        element_id: usize,
        html: &str,
    );
}

pub struct DummyHtmlParserProvider;
impl HtmlParserProvider for DummyHtmlParserProvider {
    fn parse_inner_html<'m, 'doc>(
        &self,
        mutr: &'m mut DocumentMutator<'doc>,
        element_id: usize,
        html: &str,
    ) {
        // No parser available: keep the content readable by inserting it as text
        let text_id = mutr.create_text_node(html);
        mutr.append_children(element_id, &[text_id]);
    }
}
