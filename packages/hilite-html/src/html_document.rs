use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::{DocumentHtmlParser, HtmlProvider};

use hilite_dom::{BaseDocument, DocumentConfig, EventDriver, NoopEventHandler};
use hilite_traits::UiEvent;

pub struct HtmlDocument {
    inner: BaseDocument,
}

impl Deref for HtmlDocument {
    type Target = BaseDocument;
    fn deref(&self) -> &BaseDocument {
        &self.inner
    }
}
impl DerefMut for HtmlDocument {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
impl From<HtmlDocument> for BaseDocument {
    fn from(doc: HtmlDocument) -> BaseDocument {
        doc.inner
    }
}

impl HtmlDocument {
    /// Parse HTML into an [`HtmlDocument`]
    ///
    /// Unless the config says otherwise, `set_inner_html` on the resulting document
    /// also parses with html5ever.
    pub fn from_html(html: &str, mut config: DocumentConfig) -> Self {
        if config.html_parser_provider.is_none() {
            config.html_parser_provider = Some(Arc::new(HtmlProvider));
        }
        let mut doc = BaseDocument::new(config);
        DocumentHtmlParser::parse_into_doc(&mut doc, html);
        HtmlDocument { inner: doc }
    }

    /// Run a UI event through the default actions only (no handler)
    pub fn handle_event(&mut self, event: UiEvent) {
        let mut driver = EventDriver::new(&mut self.inner, NoopEventHandler);
        driver.handle_ui_event(event);
    }

    /// Convert the [`HtmlDocument`] into it's inner [`BaseDocument`]
    pub fn into_inner(self) -> BaseDocument {
        self.into()
    }
}
