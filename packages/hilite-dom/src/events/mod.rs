mod driver;

use hilite_traits::{DomEvent, DomEventData};
pub use driver::{EventDriver, EventHandler, NoopEventHandler};

use crate::BaseDocument;

/// Default actions, run after the handler unless it prevented the default
pub(crate) fn handle_dom_event<F: FnMut(DomEvent)>(
    doc: &mut BaseDocument,
    event: &mut DomEvent,
    mut dispatch_event: F,
) {
    match &event.data {
        DomEventData::PointerDown(_) => {
            doc.set_mousedown_node_id(Some(event.target));
        }
        DomEventData::PointerUp(data) => {
            // A press and release on the same node (or within it) is a click
            let is_click = doc
                .mousedown_node_id
                .is_some_and(|down| doc.is_inclusive_ancestor_of(down, event.target)
                    || doc.is_inclusive_ancestor_of(event.target, down));
            doc.set_mousedown_node_id(None);
            if is_click {
                dispatch_event(DomEvent::with_timestamp(
                    event.target,
                    DomEventData::Click(data.clone()),
                    event.timestamp,
                ));
            }
        }
        DomEventData::Click(_) | DomEventData::KeyDown(_) | DomEventData::SelectionChange => {}
    }
}
