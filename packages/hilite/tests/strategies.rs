mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::*;
use hilite::apply::{
    ApplyContext, DeferredRescanStrategy, NativeCommandStrategy, StructuralWrapStrategy,
    StrategyResult,
};
use hilite::wrapper::{ATTR_COLOR, ATTR_ID};
use hilite::{
    DocumentTreeAdapter, HighlightColor, HighlightError, HighlightStrategy, Highlighter,
    HighlighterConfig, StrategyKind,
};
use hilite_dom::BaseDocument;
use hilite_dom::editing::EditingCapabilities;
use web_time::Instant;

const HTML: &str = "<html><head></head><body><p>alpha <b>beta</b> gamma</p><p>delta</p></body></html>";
const PANGRAM: &str = "<html><head></head><body><p>The quick brown fox jumps over the lazy dog.</p></body></html>";

fn deferred_paint() -> EditingCapabilities {
    EditingCapabilities::HILITE_COLOR | EditingCapabilities::DEFERRED_PAINT
}

#[test]
fn deferred_rescan_retrofits_on_tick() {
    let mut doc = parse_with(HTML, deferred_paint());
    let before = body_html(&doc);
    select(&mut doc, "beta gamma");

    let config = HighlighterConfig {
        deferred_delay: Duration::from_millis(10),
        ..Default::default()
    };
    let mut highlighter = Highlighter::with_strategies(config, vec![Box::new(DeferredRescanStrategy)]);
    let start = Instant::now();
    let applied = highlighter
        .try_apply_highlight(&mut doc, HighlightColor::Cyan, Some("later"), start)
        .unwrap();

    assert!(applied.scheduled);
    assert_eq!(applied.strategy, StrategyKind::DeferredRescan);
    assert!(applied.wrappers.is_empty());
    assert_eq!(body_html(&doc), before);
    assert!(highlighter.engine().has_pending());

    // Not due yet
    assert!(highlighter.tick(&mut doc, start + Duration::from_millis(5)).is_empty());
    assert_eq!(body_html(&doc), before);

    let completed = highlighter.tick(&mut doc, start + Duration::from_millis(10));
    assert_eq!(completed.len(), 1);
    let completed = completed[0].as_ref().unwrap();
    assert_eq!(completed.id, applied.id);
    assert_eq!(completed.wrappers.len(), 2);
    assert!(!highlighter.engine().has_pending());

    let wrappers = highlighter.get_all_highlights(&doc, body(&doc));
    assert_eq!(wrappers, completed.wrappers);
    for &wrapper in &wrappers {
        assert_eq!(doc.attr(wrapper, ATTR_ID), Some(applied.id.as_str()));
        assert_eq!(doc.attr(wrapper, ATTR_COLOR), Some("cyan"));
        assert_eq!(doc.attr(wrapper, "style"), None);
    }

    let container = body(&doc);
    assert_eq!(highlighter.remove_highlight_by_id(&mut doc, container, &applied.id), 2);
    assert_eq!(body_html(&doc), before);
}

fn deferred_only() -> Highlighter {
    Highlighter::with_strategies(HighlighterConfig::default(), vec![Box::new(DeferredRescanStrategy)])
}

/// (id, text) of every wrapper under the body, in document order
fn tagged(doc: &BaseDocument, highlighter: &Highlighter) -> Vec<(String, String)> {
    highlighter
        .get_all_highlights(doc, body(doc))
        .into_iter()
        .map(|wrapper| (doc.attr(wrapper, ATTR_ID).unwrap().to_string(), doc.text_content(wrapper)))
        .collect()
}

#[test]
fn two_deferred_highlights_in_one_paragraph_both_land() {
    let mut doc = parse_with(PANGRAM, deferred_paint());
    let before = body_html(&doc);
    let mut highlighter = deferred_only();
    let start = Instant::now();

    // Same colour, so matching by colour alone could not tell them apart
    select(&mut doc, "quick");
    let quick = highlighter
        .try_apply_highlight(&mut doc, HighlightColor::Yellow, None, start)
        .unwrap();
    select(&mut doc, "lazy");
    let lazy = highlighter
        .try_apply_highlight(&mut doc, HighlightColor::Yellow, None, start)
        .unwrap();
    assert_eq!(highlighter.engine().pending().len(), 2);

    let completed: Vec<_> = highlighter
        .tick(&mut doc, start + Duration::from_millis(50))
        .into_iter()
        .map(Result::unwrap)
        .collect();
    let ids: Vec<&str> = completed.iter().map(|applied| applied.id.as_str()).collect();
    assert_eq!(ids, vec![quick.id.as_str(), lazy.id.as_str()]);
    assert!(!highlighter.engine().has_pending());

    assert_eq!(
        tagged(&doc, &highlighter),
        vec![(quick.id.clone(), "quick".to_string()), (lazy.id.clone(), "lazy".to_string())]
    );

    let container = body(&doc);
    assert_eq!(highlighter.remove_highlight_by_id(&mut doc, container, &quick.id), 1);
    assert_eq!(highlighter.remove_highlight_by_id(&mut doc, container, &lazy.id), 1);
    assert_eq!(body_html(&doc), before);
}

#[test]
fn wrapping_text_before_the_flush_keeps_a_deferred_highlight() {
    let mut doc = parse_with(PANGRAM, deferred_paint());
    let mut deferred = deferred_only();
    let mut structural = Highlighter::with_strategies(
        HighlighterConfig::default(),
        vec![Box::new(StructuralWrapStrategy)],
    );
    let start = Instant::now();

    select(&mut doc, "lazy");
    let lazy = deferred
        .try_apply_highlight(&mut doc, HighlightColor::Cyan, None, start)
        .unwrap();

    // Splits the text node the queued command points into
    select(&mut doc, "quick");
    let quick = structural
        .try_apply_highlight(&mut doc, HighlightColor::Green, None, start)
        .unwrap();

    let completed = deferred.tick(&mut doc, start + Duration::from_millis(1));
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].as_ref().unwrap().id, lazy.id);
    assert_eq!(
        tagged(&doc, &deferred),
        vec![(quick.id.clone(), "quick".to_string()), (lazy.id.clone(), "lazy".to_string())]
    );
}

#[test]
fn a_dropped_command_is_reported_on_tick() {
    let mut doc = parse_with(HTML, deferred_paint());
    let shell = with_shell(&mut doc);
    let config = HighlighterConfig {
        toast_on_failure: true,
        ..Default::default()
    };
    let mut highlighter = Highlighter::with_strategies(config, vec![Box::new(DeferredRescanStrategy)]);
    let start = Instant::now();

    select(&mut doc, "beta gamma");
    let applied = highlighter
        .try_apply_highlight(&mut doc, HighlightColor::Pink, None, start)
        .unwrap();
    assert!(applied.scheduled);

    // The paragraph goes away before the host gets to paint
    let paragraph = doc.get_node(body(&doc)).unwrap().children[0];
    doc.mutate().remove_node(paragraph);

    let completed = highlighter.tick(&mut doc, start + Duration::from_millis(1));
    assert_eq!(completed.len(), 1);
    assert!(matches!(
        &completed[0],
        Err(HighlightError::RetrofitFailed { id, .. }) if *id == applied.id
    ));
    assert_eq!(shell.toasts.load(Ordering::SeqCst), 1);
    assert!(!highlighter.engine().has_pending());
}

#[test]
fn deferred_hosts_fall_through_to_structural_wrap() {
    let mut doc = parse_with(HTML, deferred_paint());
    select(&mut doc, "alpha");
    let mut highlighter = Highlighter::default();
    let applied = highlighter
        .try_apply_highlight(&mut doc, HighlightColor::Yellow, None, Instant::now())
        .unwrap();
    assert_eq!(applied.strategy, StrategyKind::StructuralWrap);
    assert!(!applied.scheduled);

    // The native command was never issued
    assert!(!doc.has_pending_commands());
}

#[test]
fn native_strategy_needs_an_immediate_command() {
    let mut doc = parse_with(HTML, deferred_paint());
    select(&mut doc, "delta");
    let mut highlighter = Highlighter::with_strategies(
        HighlighterConfig::default(),
        vec![Box::new(NativeCommandStrategy)],
    );
    let err = highlighter
        .try_apply_highlight(&mut doc, HighlightColor::Yellow, None, Instant::now())
        .unwrap_err();
    assert!(matches!(err, HighlightError::AllStrategiesFailed));
    assert!(!doc.has_pending_commands());
}

/// Changes the document, then gives up
struct Scribble;

impl HighlightStrategy for Scribble {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Custom("scribble")
    }

    fn apply(&mut self, doc: &mut dyn DocumentTreeAdapter, ctx: &ApplyContext) -> StrategyResult {
        doc.set_attr(ctx.root, "data-scribbled", "yes");
        StrategyResult::Failed {
            reason: "gave up halfway".into(),
            mutated: true,
        }
    }
}

#[test]
fn a_strategy_that_mutated_stops_the_fallback_chain() {
    let mut doc = parse(HTML);
    select(&mut doc, "gamma");
    let mut highlighter = Highlighter::with_strategies(
        HighlighterConfig::default(),
        vec![Box::new(Scribble), Box::new(StructuralWrapStrategy)],
    );

    let err = highlighter
        .try_apply_highlight(&mut doc, HighlightColor::Yellow, None, Instant::now())
        .unwrap_err();
    assert!(matches!(
        err,
        HighlightError::PartialMutation {
            strategy: StrategyKind::Custom("scribble")
        }
    ));
    assert!(highlighter.get_all_highlights(&doc, body(&doc)).is_empty());
    assert!(body_html(&doc).contains("data-scribbled=\"yes\""));
}

#[test]
fn total_failure_can_toast() {
    let mut doc = parse_with(HTML, EditingCapabilities::empty());
    let shell = with_shell(&mut doc);
    select(&mut doc, "delta");
    let before = body_html(&doc);

    let config = HighlighterConfig {
        toast_on_failure: true,
        ..Default::default()
    };
    let mut highlighter = Highlighter::with_strategies(
        config,
        vec![Box::new(NativeCommandStrategy), Box::new(DeferredRescanStrategy)],
    );
    assert!(!highlighter.apply_highlight(&mut doc, HighlightColor::Green, None));
    assert_eq!(shell.toasts.load(Ordering::SeqCst), 1);
    assert_eq!(body_html(&doc), before);
    // No strategy got far enough to need the stylesheet
    assert!(doc.get_element_by_id("hilite-styles").is_none());
    assert!(doc.head_element().unwrap().children.is_empty());
    // The selection survives a failed attempt
    assert!(doc.selection_range().is_some());
}

#[test]
fn stylesheet_is_injected_once() {
    let mut doc = parse(HTML);
    let mut highlighter = Highlighter::default();

    select(&mut doc, "alpha");
    assert!(highlighter.apply_highlight(&mut doc, HighlightColor::Yellow, None));
    select(&mut doc, "delta");
    assert!(highlighter.apply_highlight(&mut doc, HighlightColor::Green, None));

    let head = doc.head_element().unwrap();
    assert_eq!(head.children.len(), 1);
    let style = doc.get_element_by_id("hilite-styles").unwrap();
    assert_eq!(head.children[0], style);
}
