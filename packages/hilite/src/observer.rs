//! Tracks the live selection and publishes a coherent [`TextSelection`] for the toolbar.
//!
//! The observer is a small state machine fed by [`DomEvent`]s and by [`tick`](SelectionObserver::tick).
//! Selection-change notifications are debounced; pointer releases and clicks are handled
//! immediately and cancel any pending debounced read.

use std::fmt;
use std::time::Duration;

use hilite_dom::{BaseDocument, EventHandler};
use hilite_traits::{BoundingBox, DomEvent, DomEventData};
use keyboard_types::Key;
use web_time::Instant;

use crate::adapter::{DocumentTreeAdapter, NodeId};
use crate::wrapper;

/// What the toolbar should render against
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextSelection {
    /// Trimmed selected text, or the clicked highlight's text
    pub text: String,
    /// Viewport-relative box of the selection or of the clicked highlight
    pub rect: Option<BoundingBox>,
    pub is_active: bool,
    /// Set only when the user clicked an existing highlight
    pub highlight_element: Option<NodeId>,
}

impl TextSelection {
    fn highlight(text: String, rect: BoundingBox, element: NodeId) -> Self {
        Self {
            text,
            rect: Some(rect),
            is_active: true,
            highlight_element: Some(element),
        }
    }

    fn free(text: String, rect: BoundingBox) -> Self {
        Self {
            text,
            rect: Some(rect),
            is_active: true,
            highlight_element: None,
        }
    }
}

pub type SelectionListener = Box<dyn FnMut(&TextSelection)>;

pub struct SelectionObserver {
    debounce: Duration,
    rect_epsilon: f64,
    state: TextSelection,
    deadline: Option<Instant>,
    listeners: Vec<SelectionListener>,
    emissions: usize,
}

impl fmt::Debug for SelectionObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionObserver")
            .field("debounce", &self.debounce)
            .field("state", &self.state)
            .field("deadline", &self.deadline)
            .field("listeners", &self.listeners.len())
            .field("emissions", &self.emissions)
            .finish()
    }
}

impl Default for SelectionObserver {
    fn default() -> Self {
        Self::new(Duration::from_millis(50), 0.5)
    }
}

impl SelectionObserver {
    pub fn new(debounce: Duration, rect_epsilon: f64) -> Self {
        Self {
            debounce,
            rect_epsilon,
            state: TextSelection::default(),
            deadline: None,
            listeners: Vec::new(),
            emissions: 0,
        }
    }

    pub fn selection(&self) -> &TextSelection {
        &self.state
    }

    /// Number of states published so far
    pub fn emissions(&self) -> usize {
        self.emissions
    }

    pub fn subscribe(&mut self, listener: SelectionListener) {
        self.listeners.push(listener);
    }

    /// Whether a debounced read is waiting for [`tick`](Self::tick)
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn observe(&mut self, doc: &dyn DocumentTreeAdapter, event: &DomEvent) {
        match &event.data {
            DomEventData::SelectionChange => {
                // Each notification pushes the read further out
                self.deadline = Some(event.timestamp + self.debounce);
            }
            DomEventData::PointerUp(_) | DomEventData::Click(_) => {
                self.deadline = None;
                match self.hit_highlight(doc, event.target) {
                    Some(hit) => self.show_highlight(doc, hit),
                    None => self.read_selection(doc),
                }
            }
            DomEventData::KeyDown(key) if key.state.is_pressed() && key.key == Key::Escape => {
                self.deadline = None;
                self.clear();
            }
            DomEventData::PointerDown(_) | DomEventData::KeyDown(_) => {}
        }
    }

    /// Run the debounced read if it is due
    pub fn tick(&mut self, doc: &dyn DocumentTreeAdapter, now: Instant) {
        if self.deadline.is_some_and(|deadline| now >= deadline) {
            self.deadline = None;
            self.read_selection(doc);
        }
    }

    /// Reset to the inactive state, notifying listeners if anything was showing
    pub fn clear(&mut self) {
        self.deadline = None;
        if self.state.is_active {
            self.emit(TextSelection::default());
        }
    }

    /// The wrapper under `target`, if the pointer landed on a highlight and the user
    /// isn't finishing a free selection
    fn hit_highlight(&self, doc: &dyn DocumentTreeAdapter, target: NodeId) -> Option<NodeId> {
        let has_free_selection = doc
            .selection_range()
            .is_some_and(|range| !range.is_collapsed())
            && !doc.selection_text().trim().is_empty();
        if has_free_selection {
            return None;
        }
        wrapper::wrapper_for(doc, target)
    }

    fn show_highlight(&mut self, doc: &dyn DocumentTreeAdapter, element: NodeId) {
        let Some(rect) = doc.node_rect(element).filter(|rect| !rect.is_empty()) else {
            return;
        };
        let text = doc.text_content(element).trim().to_string();
        self.publish(TextSelection::highlight(text, rect, element));
    }

    fn read_selection(&mut self, doc: &dyn DocumentTreeAdapter) {
        let range = doc.selection_range().filter(|range| !range.is_collapsed());
        let text = doc.selection_text();
        let text = text.trim();

        let Some(range) = range.filter(|_| !text.is_empty()) else {
            self.clear();
            return;
        };

        let Some(rect) = doc.range_rect(&range).filter(|rect| !rect.is_empty()) else {
            #[cfg(feature = "tracing")]
            tracing::trace!("Ignoring selection without a usable bounding box");
            return;
        };

        self.publish(TextSelection::free(text.to_string(), rect));
    }

    fn publish(&mut self, next: TextSelection) {
        if self.is_unchanged(&next) {
            return;
        }
        self.emit(next);
    }

    fn is_unchanged(&self, next: &TextSelection) -> bool {
        let current = &self.state;
        if current.is_active != next.is_active
            || current.highlight_element != next.highlight_element
            || current.text != next.text
        {
            return false;
        }
        match (&current.rect, &next.rect) {
            (Some(a), Some(b)) => a.approx_eq(b, self.rect_epsilon),
            (None, None) => true,
            _ => false,
        }
    }

    fn emit(&mut self, next: TextSelection) {
        self.state = next;
        self.emissions += 1;
        for listener in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }
}

impl EventHandler for SelectionObserver {
    fn handle_event(&mut self, _chain: &[usize], event: &mut DomEvent, doc: &mut BaseDocument) {
        self.observe(&*doc, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilite_dom::{BoundaryPoint, DocumentConfig, qual_name};
    use hilite_traits::{KeyEvent, PointerEvent};
    use kurbo::Rect;

    fn doc() -> (BaseDocument, usize) {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let p = doc.create_element(qual_name!("p", html), vec![]);
        let t = doc.create_text_node("observe this text");
        doc.append(0, &[p]);
        doc.append(p, &[t]);
        doc.set_node_layout(p, Rect::new(0.0, 0.0, 170.0, 20.0));
        doc.set_node_layout(t, Rect::new(0.0, 0.0, 170.0, 20.0));
        (doc, t)
    }

    #[test]
    fn selection_changes_are_debounced() {
        let (mut doc, t) = doc();
        let mut observer = SelectionObserver::default();
        let start = Instant::now();

        for i in 0..5u64 {
            doc.set_selection(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, 8 + i as usize));
            let at = start + Duration::from_millis(i * 5);
            observer.observe(&doc, &DomEvent::with_timestamp(0, DomEventData::SelectionChange, at));
        }

        observer.tick(&doc, start + Duration::from_millis(30));
        assert_eq!(observer.emissions(), 0);

        observer.tick(&doc, start + Duration::from_millis(100));
        assert_eq!(observer.emissions(), 1);
        assert_eq!(observer.selection().text, "observe this");
        assert!(observer.selection().is_active);
    }

    #[test]
    fn pointer_up_reads_immediately_and_skips_duplicates() {
        let (mut doc, t) = doc();
        let mut observer = SelectionObserver::default();
        doc.set_selection(BoundaryPoint::new(t, 8), BoundaryPoint::new(t, 12));

        let up = DomEvent::new(t, DomEventData::PointerUp(PointerEvent::new(90.0, 10.0)));
        observer.observe(&doc, &up);
        observer.observe(&doc, &up);
        assert_eq!(observer.emissions(), 1);
        assert_eq!(observer.selection().text, "this");
        assert!(observer.selection().rect.is_some());
    }

    #[test]
    fn collapsing_the_selection_clears_once() {
        let (mut doc, t) = doc();
        let mut observer = SelectionObserver::default();
        doc.set_selection(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, 7));
        let up = DomEvent::new(t, DomEventData::PointerUp(PointerEvent::new(10.0, 10.0)));
        observer.observe(&doc, &up);

        doc.clear_selection();
        observer.observe(&doc, &up);
        observer.observe(&doc, &up);
        assert_eq!(observer.emissions(), 2);
        assert_eq!(observer.selection(), &TextSelection::default());
    }

    #[test]
    fn zero_area_selection_box_is_ignored() {
        let (mut doc, t) = doc();
        doc.set_node_layout(t, Rect::ZERO);
        doc.set_selection(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, 7));

        let mut observer = SelectionObserver::default();
        observer.observe(&doc, &DomEvent::new(t, DomEventData::PointerUp(PointerEvent::new(0.0, 0.0))));
        assert_eq!(observer.emissions(), 0);
        assert!(!observer.selection().is_active);
    }

    #[test]
    fn click_without_pointer_up_reads_selection() {
        let (mut doc, t) = doc();
        let mut observer = SelectionObserver::default();
        doc.set_selection(BoundaryPoint::new(t, 8), BoundaryPoint::new(t, 12));

        let click = DomEvent::new(t, DomEventData::Click(PointerEvent::new(90.0, 10.0)));
        observer.observe(&doc, &click);
        assert_eq!(observer.emissions(), 1);
        assert_eq!(observer.selection().text, "this");
        assert_eq!(observer.selection().highlight_element, None);

        doc.clear_selection();
        observer.observe(&doc, &click);
        assert_eq!(observer.emissions(), 2);
        assert!(!observer.selection().is_active);
    }

    #[test]
    fn escape_dismisses() {
        let (mut doc, t) = doc();
        let mut observer = SelectionObserver::default();
        doc.set_selection(BoundaryPoint::new(t, 0), BoundaryPoint::new(t, 7));
        observer.observe(&doc, &DomEvent::new(t, DomEventData::PointerUp(PointerEvent::new(10.0, 10.0))));

        let escape = DomEvent::new(0, DomEventData::KeyDown(KeyEvent::pressed(Key::Escape)));
        observer.observe(&doc, &escape);
        assert!(!observer.selection().is_active);
        assert_eq!(observer.emissions(), 2);
    }
}
