#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hilite_dom::editing::EditingCapabilities;
use hilite_dom::{BaseDocument, BoundaryPoint, DocumentConfig};
use hilite_html::HtmlDocument;
use hilite_traits::ShellProvider;
use kurbo::Rect;

pub const CHAR_WIDTH: f64 = 8.0;
pub const LINE_TOP: f64 = 100.0;
pub const LINE_HEIGHT: f64 = 20.0;

pub fn parse(html: &str) -> BaseDocument {
    HtmlDocument::from_html(html, DocumentConfig::default()).into_inner()
}

pub fn parse_with(html: &str, capabilities: EditingCapabilities) -> BaseDocument {
    let config = DocumentConfig {
        capabilities: Some(capabilities),
        ..Default::default()
    };
    HtmlDocument::from_html(html, config).into_inner()
}

pub fn body(doc: &BaseDocument) -> usize {
    doc.body_element().expect("fixture has a body").id
}

pub fn body_html(doc: &BaseDocument) -> String {
    doc.get_node(body(doc)).unwrap().inner_html()
}

pub fn body_text(doc: &BaseDocument) -> String {
    doc.get_node(body(doc)).unwrap().text_content()
}

/// Lay every text node out on one line, `CHAR_WIDTH` px per character
pub fn lay_out(doc: &mut BaseDocument) {
    let mut x = 0.0;
    for leaf in doc.text_leaves(body(doc)) {
        let chars = doc.get_node(leaf).unwrap().text_content().chars().count() as f64;
        let width = chars * CHAR_WIDTH;
        doc.set_node_layout(leaf, Rect::new(x, LINE_TOP, x + width, LINE_TOP + LINE_HEIGHT));
        x += width;
    }
}

/// Select the first occurrence of `needle` in the body text, which may span nodes
pub fn select(doc: &mut BaseDocument, needle: &str) {
    let leaves: Vec<(usize, String)> = doc
        .text_leaves(body(doc))
        .into_iter()
        .map(|leaf| (leaf, doc.get_node(leaf).unwrap().text_content()))
        .collect();
    let text: String = leaves.iter().map(|(_, text)| text.as_str()).collect();
    let start = text.find(needle).unwrap_or_else(|| panic!("{needle:?} not in {text:?}"));
    let end = start + needle.len();

    let mut anchor = None;
    let mut focus = None;
    let mut offset = 0;
    for (leaf, text) in &leaves {
        let leaf_end = offset + text.len();
        if anchor.is_none() && start < leaf_end {
            anchor = Some(BoundaryPoint::new(*leaf, start - offset));
        }
        if focus.is_none() && end <= leaf_end {
            focus = Some(BoundaryPoint::new(*leaf, end - offset));
        }
        offset = leaf_end;
    }
    doc.set_selection(anchor.unwrap(), focus.unwrap());
}

/// Select a collapsed point at the start of `needle`
pub fn place_caret(doc: &mut BaseDocument, needle: &str) {
    select(doc, needle);
    let range = doc.selection_range().unwrap();
    doc.set_selection(range.start, range.start);
}

/// Counts shell callbacks
#[derive(Default)]
pub struct RecordingShell {
    pub redraws: AtomicUsize,
    pub toasts: AtomicUsize,
}

impl ShellProvider for RecordingShell {
    fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }

    fn show_toast(&self, _message: &str) {
        self.toasts.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn with_shell(doc: &mut BaseDocument) -> Arc<RecordingShell> {
    let shell = Arc::new(RecordingShell::default());
    doc.set_shell_provider(shell.clone());
    shell
}
