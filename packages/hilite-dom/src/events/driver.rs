use crate::BaseDocument;
use hilite_traits::{DomEvent, DomEventData, UiEvent};
use std::collections::VecDeque;
use web_time::Instant;

pub trait EventHandler {
    fn handle_event(&mut self, chain: &[usize], event: &mut DomEvent, doc: &mut BaseDocument);
}

pub struct NoopEventHandler;
impl EventHandler for NoopEventHandler {
    fn handle_event(&mut self, _chain: &[usize], _event: &mut DomEvent, _doc: &mut BaseDocument) {
        // Do nothing
    }
}

impl<T: EventHandler + ?Sized> EventHandler for &mut T {
    fn handle_event(&mut self, chain: &[usize], event: &mut DomEvent, doc: &mut BaseDocument) {
        (**self).handle_event(chain, event, doc)
    }
}

/// Turns untargeted [`UiEvent`]s into hit-tested [`DomEvent`]s and feeds them to a handler
pub struct EventDriver<'doc, Handler: EventHandler> {
    doc: &'doc mut BaseDocument,
    handler: Handler,
    queue: VecDeque<DomEvent>,
}

impl<'doc, Handler: EventHandler> EventDriver<'doc, Handler> {
    pub fn new(doc: &'doc mut BaseDocument, handler: Handler) -> Self {
        EventDriver {
            doc,
            handler,
            queue: VecDeque::with_capacity(4),
        }
    }

    pub fn handle_ui_event(&mut self, event: UiEvent) {
        self.handle_ui_event_at(event, Instant::now());
    }

    /// Like [`handle_ui_event`](Self::handle_ui_event) with an explicit timestamp
    pub fn handle_ui_event_at(&mut self, event: UiEvent, timestamp: Instant) {
        let root = self.doc.root_element().id;
        let hit_target = |doc: &BaseDocument, x: f32, y: f32| {
            doc.hit(x, y).map(|hit| hit.node_id).unwrap_or(root)
        };

        let event = match event {
            UiEvent::PointerDown(data) => {
                let target = hit_target(&*self.doc, data.x, data.y);
                self.doc.hover_node_id = Some(target);
                DomEvent::with_timestamp(target, DomEventData::PointerDown(data), timestamp)
            }
            UiEvent::PointerUp(data) => {
                let target = hit_target(&*self.doc, data.x, data.y);
                self.doc.hover_node_id = if data.is_touch() { None } else { Some(target) };
                DomEvent::with_timestamp(target, DomEventData::PointerUp(data), timestamp)
            }
            UiEvent::KeyDown(data) => {
                DomEvent::with_timestamp(root, DomEventData::KeyDown(data), timestamp)
            }
            UiEvent::SelectionChange => {
                DomEvent::with_timestamp(0, DomEventData::SelectionChange, timestamp)
            }
        };

        self.handle_dom_event(event);
    }

    pub fn handle_dom_event(&mut self, event: DomEvent) {
        self.queue.push_back(event);
        self.process_queue();
    }

    fn process_queue(&mut self) {
        while let Some(mut event) = self.queue.pop_front() {
            self.run_handler_event(&mut event);
            if !event.default_prevented {
                self.run_default_action(&mut event);
            }
        }
    }

    fn run_handler_event(&mut self, event: &mut DomEvent) {
        let chain = if event.bubbles {
            self.doc.node_chain(event.target)
        } else {
            vec![event.target]
        };

        self.handler.handle_event(&chain, event, self.doc);
    }

    fn run_default_action(&mut self, event: &mut DomEvent) {
        let queue = &mut self.queue;
        super::handle_dom_event(self.doc, event, |new_evt| queue.push_back(new_evt));
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn into_handler(self) -> Handler {
        self.handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DocumentConfig, qual_name};
    use hilite_traits::PointerEvent;

    #[derive(Default)]
    struct Recorder(Vec<(&'static str, usize)>);
    impl EventHandler for Recorder {
        fn handle_event(&mut self, _chain: &[usize], event: &mut DomEvent, _doc: &mut BaseDocument) {
            self.0.push((event.name(), event.target));
        }
    }

    #[test]
    fn pointer_down_up_produces_click() {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let div = doc.create_element(qual_name!("div", html), vec![]);
        doc.append(0, &[div]);
        doc.set_node_layout(div, kurbo::Rect::new(0.0, 0.0, 100.0, 100.0));

        let mut driver = EventDriver::new(&mut doc, Recorder::default());
        driver.handle_ui_event(UiEvent::PointerDown(PointerEvent::new(10.0, 10.0)));
        driver.handle_ui_event(UiEvent::PointerUp(PointerEvent::new(12.0, 10.0)));
        driver.handle_ui_event(UiEvent::SelectionChange);

        let recorded = driver.into_handler().0;
        assert_eq!(
            recorded,
            vec![
                ("pointerdown", div),
                ("pointerup", div),
                ("click", div),
                ("selectionchange", 0)
            ]
        );
    }
}
