mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use common::*;
use hilite::{HighlightColor, Highlighter, TextSelection, ToolbarPosition};
use hilite_dom::EventDriver;
use hilite_traits::{DomEvent, DomEventData, KeyEvent, PointerEvent, UiEvent, Viewport};
use keyboard_types::Key;
use web_time::Instant;

const HTML: &str = "<html><head></head><body><p>Select some of this text, then <em>click</em> around.</p></body></html>";

#[test]
fn rapid_selection_changes_emit_once() {
    let mut doc = parse(HTML);
    lay_out(&mut doc);
    let mut highlighter = Highlighter::default();
    let seen: Rc<RefCell<Vec<TextSelection>>> = Rc::default();
    let sink = seen.clone();
    highlighter.subscribe(Box::new(move |selection| sink.borrow_mut().push(selection.clone())));

    let start = Instant::now();
    for (i, needle) in ["Sel", "Select", "Select so", "Select some"].into_iter().enumerate() {
        select(&mut doc, needle);
        let at = start + Duration::from_millis(3 * i as u64);
        highlighter.observe(&doc, &DomEvent::with_timestamp(0, DomEventData::SelectionChange, at));
        highlighter.tick(&mut doc, at);
    }
    assert!(seen.borrow().is_empty());

    highlighter.tick(&mut doc, start + Duration::from_millis(200));
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].text, "Select some");
    assert!(seen[0].is_active);
    assert_eq!(seen[0].highlight_element, None);

    let rect = seen[0].rect.unwrap();
    assert_eq!(rect.left, 0.0);
    assert!((rect.width - 11.0 * CHAR_WIDTH).abs() < 1e-6);
    assert_eq!(rect.top, LINE_TOP);
}

#[test]
fn pointer_release_preempts_the_debounce() {
    let mut doc = parse(HTML);
    lay_out(&mut doc);
    let mut highlighter = Highlighter::default();

    select(&mut doc, "this text");
    let now = Instant::now();
    highlighter.observe(&doc, &DomEvent::with_timestamp(0, DomEventData::SelectionChange, now));
    assert!(highlighter.observer().is_pending());

    let text = doc.text_leaves(body(&doc))[0];
    let up = DomEvent::with_timestamp(text, DomEventData::PointerUp(PointerEvent::touch(100.0, 110.0)), now);
    highlighter.observe(&doc, &up);
    assert!(!highlighter.observer().is_pending());
    assert_eq!(highlighter.selection().text, "this text");
    assert_eq!(highlighter.observer().emissions(), 1);

    // The debounced read that was cancelled never fires
    highlighter.tick(&mut doc, now + Duration::from_secs(1));
    assert_eq!(highlighter.observer().emissions(), 1);
}

#[test]
fn clicking_a_highlight_selects_it_without_highlighting_again() {
    let mut doc = parse(HTML);
    lay_out(&mut doc);
    let mut highlighter = Highlighter::default();

    select(&mut doc, "some of this");
    assert!(highlighter.apply_highlight(&mut doc, HighlightColor::Yellow, None));
    let wrappers = highlighter.get_all_highlights(&doc, body(&doc));
    assert_eq!(wrappers.len(), 1);
    let wrapper = wrappers[0];

    let rect = doc.node_rect(wrapper).unwrap();
    let (x, y) = ((rect.left + 4.0) as f32, (rect.top + 4.0) as f32);

    let before = body_html(&doc);
    let mut driver = EventDriver::new(&mut doc, &mut highlighter);
    driver.handle_ui_event(UiEvent::PointerDown(PointerEvent::new(x, y)));
    driver.handle_ui_event(UiEvent::PointerUp(PointerEvent::new(x, y)));
    drop(driver);

    let selection = highlighter.selection();
    assert!(selection.is_active);
    assert_eq!(selection.highlight_element, Some(wrapper));
    assert_eq!(selection.text, "some of this");
    assert_eq!(selection.rect, Some(rect));
    // Pointer-up and the click that follows publish one state between them
    assert_eq!(highlighter.observer().emissions(), 1);

    assert_eq!(body_html(&doc), before);
    assert_eq!(highlighter.get_all_highlights(&doc, body(&doc)), vec![wrapper]);

    // Removing the clicked highlight dismisses the toolbar
    assert!(highlighter.remove_highlight(&mut doc, wrapper));
    assert!(!highlighter.selection().is_active);
}

#[test]
fn escape_and_clear_selection_dismiss() {
    let mut doc = parse(HTML);
    lay_out(&mut doc);
    let mut highlighter = Highlighter::default();
    let text = doc.text_leaves(body(&doc))[0];

    select(&mut doc, "Select");
    highlighter.observe(&doc, &DomEvent::new(text, DomEventData::PointerUp(PointerEvent::new(1.0, 101.0))));
    assert!(highlighter.selection().is_active);

    highlighter.observe(&doc, &DomEvent::new(0, DomEventData::KeyDown(KeyEvent::pressed(Key::Escape))));
    assert!(!highlighter.selection().is_active);

    highlighter.observe(&doc, &DomEvent::new(text, DomEventData::PointerUp(PointerEvent::new(1.0, 101.0))));
    assert!(highlighter.selection().is_active);
    highlighter.clear_selection(&mut doc);
    assert!(!highlighter.selection().is_active);
    assert!(doc.selection_range().is_none());
}

#[test]
fn toolbar_follows_the_selection() {
    let mut doc = parse(HTML);
    lay_out(&mut doc);
    let mut highlighter = Highlighter::default();
    let viewport = Viewport::default();

    assert_eq!(highlighter.calculate_position(&viewport), ToolbarPosition { top: 0.0, left: 0.0 });

    select(&mut doc, "this text, then");
    let text = doc.text_leaves(body(&doc))[0];
    highlighter.observe(&doc, &DomEvent::new(text, DomEventData::PointerUp(PointerEvent::new(1.0, 101.0))));

    let rect = highlighter.selection().rect.unwrap();
    let position = highlighter.calculate_position(&viewport);
    assert_eq!(position.top, rect.bottom() + 8.0);
    assert_eq!(position.left, rect.right() - 200.0);
}
