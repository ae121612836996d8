use hilite_dom::{BaseDocument, EventHandler};
use hilite_traits::{DomEvent, Viewport};
use web_time::Instant;

use crate::adapter::{DocumentTreeAdapter, NodeId};
use crate::apply::{AppliedHighlight, ApplicationEngine, ApplyContext, HighlightStrategy};
use crate::guard::InFlightGuard;
use crate::id::generate_highlight_id;
use crate::observer::{SelectionListener, SelectionObserver, TextSelection};
use crate::registry::{self, HighlightRecord};
use crate::style_injector::StyleRegistry;
use crate::toolbar::{ToolbarPosition, calculate_position};
use crate::wrapper::normalize_note;
use crate::{HighlightColor, HighlightError, HighlighterConfig};

/// The public face of the engine: applies highlights to the live selection, manages
/// existing highlights and tracks selection state for a toolbar.
///
/// A `Highlighter` holds no reference to a document. Every operation takes the
/// document it should act on, so one highlighter can serve several documents.
pub struct Highlighter {
    config: HighlighterConfig,
    engine: ApplicationEngine,
    styles: StyleRegistry,
    observer: SelectionObserver,
    removals: InFlightGuard,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(HighlighterConfig::default())
    }
}

impl Highlighter {
    pub fn new(config: HighlighterConfig) -> Self {
        Self::with_strategies(config, crate::apply::default_strategies())
    }

    /// Use a custom strategy list instead of native → structural → deferred
    pub fn with_strategies(config: HighlighterConfig, strategies: Vec<Box<dyn HighlightStrategy>>) -> Self {
        Self {
            engine: ApplicationEngine::new(strategies),
            styles: StyleRegistry::new(),
            observer: SelectionObserver::new(config.debounce, config.rect_epsilon),
            removals: InFlightGuard::new(config.removal_guard),
            config,
        }
    }

    pub fn config(&self) -> &HighlighterConfig {
        &self.config
    }

    pub fn engine(&self) -> &ApplicationEngine {
        &self.engine
    }

    /// The last published selection state
    pub fn selection(&self) -> &TextSelection {
        self.observer.selection()
    }

    pub fn observer(&self) -> &SelectionObserver {
        &self.observer
    }

    pub fn subscribe(&mut self, listener: SelectionListener) {
        self.observer.subscribe(listener);
    }

    /// Highlight the live selection. Returns false, leaving the tree untouched, when
    /// nothing usable is selected or no strategy succeeds.
    pub fn apply_highlight(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        color: HighlightColor,
        note: Option<&str>,
    ) -> bool {
        self.apply_highlight_at(doc, color, note, Instant::now())
    }

    pub fn apply_highlight_at(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        color: HighlightColor,
        note: Option<&str>,
        now: Instant,
    ) -> bool {
        match self.try_apply_highlight(doc, color, note, now) {
            Ok(_) => true,
            Err(HighlightError::InvalidSelection) => false,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Could not apply highlight: {_err}");
                if self.config.toast_on_failure {
                    doc.show_toast("Could not highlight the selection");
                }
                false
            }
        }
    }

    pub fn try_apply_highlight(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        color: HighlightColor,
        note: Option<&str>,
        now: Instant,
    ) -> Result<AppliedHighlight, HighlightError> {
        let range = doc
            .selection_range()
            .filter(|range| !range.is_collapsed())
            .ok_or(HighlightError::InvalidSelection)?;
        if doc.selection_text().trim().is_empty() {
            return Err(HighlightError::InvalidSelection);
        }

        // Painting replaces text nodes, so the rescan root has to be an element
        let root = doc
            .common_ancestor(&range)
            .map(|ancestor| match doc.text(ancestor) {
                Some(_) => doc.parent(ancestor).unwrap_or(ancestor),
                None => ancestor,
            })
            .unwrap_or_else(|| doc.root());
        let ctx = ApplyContext {
            id: generate_highlight_id(),
            color,
            note: normalize_note(note).map(str::to_string),
            range,
            root,
            now,
            deferred_delay: self.config.deferred_delay,
        };

        let styles = &mut self.styles;
        let style_element_id = self.config.style_element_id.as_str();
        let applied = self.engine.apply(doc, &ctx, |doc| {
            styles.ensure(doc, style_element_id);
        })?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Highlighted {:?} as {} ({}, {})",
            doc.selection_text().trim(),
            applied.id,
            color,
            applied.strategy
        );

        doc.clear_selection();
        self.observer.clear();
        doc.request_redraw();
        Ok(applied)
    }

    /// Unwrap one wrapper. False (and no change) if `node` is not a wrapper.
    pub fn remove_highlight(&mut self, doc: &mut dyn DocumentTreeAdapter, node: NodeId) -> bool {
        match registry::remove_highlight(doc, node) {
            Ok(()) => {
                self.forget_clicked(node);
                doc.request_redraw();
                true
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Not removing: {_err}");
                false
            }
        }
    }

    /// Remove every wrapper of highlight `id` under `container`
    pub fn remove_highlight_by_id(&mut self, doc: &mut dyn DocumentTreeAdapter, container: NodeId, id: &str) -> usize {
        self.remove_highlight_by_id_at(doc, container, id, Instant::now())
    }

    pub fn remove_highlight_by_id_at(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        container: NodeId,
        id: &str,
        now: Instant,
    ) -> usize {
        self.try_remove_highlight_by_id(doc, container, id, now).unwrap_or(0)
    }

    /// Like [`remove_highlight_by_id`](Self::remove_highlight_by_id), reporting a
    /// duplicate request as [`HighlightError::DuplicateOperation`]
    pub fn try_remove_highlight_by_id(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        container: NodeId,
        id: &str,
        now: Instant,
    ) -> Result<usize, HighlightError> {
        if !self.removals.try_acquire(id, now) {
            #[cfg(feature = "tracing")]
            tracing::debug!("Ignoring duplicate removal of {id}");
            return Err(HighlightError::DuplicateOperation { id: id.to_string() });
        }

        let clicked = self.observer.selection().highlight_element;
        let removed = registry::remove_highlight_by_id(doc, container, id);
        if removed > 0 {
            #[cfg(feature = "tracing")]
            tracing::info!("Removed highlight {id} ({removed} wrappers)");
            if clicked.is_some_and(|node| !doc.is_connected(node)) {
                self.observer.clear();
            }
            doc.request_redraw();
        }
        Ok(removed)
    }

    /// Recolour the highlight `node` belongs to (every wrapper sharing its id)
    pub fn change_highlight_color(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        node: NodeId,
        color: HighlightColor,
    ) -> bool {
        self.styles.ensure(doc, &self.config.style_element_id);
        let changed = registry::change_highlight_color(doc, node, color);
        self.finish_update(doc, changed)
    }

    /// Set the note of the highlight `node` belongs to. A blank note removes it.
    pub fn update_highlight_note(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        node: NodeId,
        note: Option<&str>,
    ) -> bool {
        let changed = registry::update_highlight_note(doc, node, note);
        self.finish_update(doc, changed)
    }

    fn finish_update(&self, doc: &mut dyn DocumentTreeAdapter, changed: Result<usize, HighlightError>) -> bool {
        match changed {
            Ok(_) => {
                doc.request_redraw();
                true
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Not updating: {_err}");
                false
            }
        }
    }

    pub fn get_all_highlights(&self, doc: &dyn DocumentTreeAdapter, container: NodeId) -> Vec<NodeId> {
        registry::get_all_highlights(doc, container)
    }

    pub fn highlight_groups(&self, doc: &dyn DocumentTreeAdapter, container: NodeId) -> Vec<HighlightRecord> {
        registry::highlight_groups(doc, container)
    }

    pub fn enclosing_highlight(&self, doc: &dyn DocumentTreeAdapter, node: NodeId) -> Option<NodeId> {
        registry::enclosing_highlight(doc, node)
    }

    /// Drop the live selection and the published state
    pub fn clear_selection(&mut self, doc: &mut dyn DocumentTreeAdapter) {
        doc.clear_selection();
        self.observer.clear();
    }

    /// Where the toolbar should go for the current selection state
    pub fn calculate_position(&self, viewport: &Viewport) -> ToolbarPosition {
        let selection = self.observer.selection();
        let rect = selection.rect.as_ref().filter(|_| selection.is_active);
        calculate_position(rect, viewport, &self.config.toolbar)
    }

    /// Feed a DOM event to the selection observer
    pub fn observe(&mut self, doc: &dyn DocumentTreeAdapter, event: &DomEvent) {
        self.observer.observe(doc, event);
    }

    /// Advance timers: the debounced selection read, removal guards and due
    /// retrofits. Returns one result per deferred highlight that came due.
    pub fn tick(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        now: Instant,
    ) -> Vec<Result<AppliedHighlight, HighlightError>> {
        self.observer.tick(doc, now);
        self.removals.expire(now);

        let completed = self.engine.run_due(doc, now);
        for _failure in completed.iter().filter_map(|result| result.as_ref().err()) {
            #[cfg(feature = "tracing")]
            tracing::warn!("{_failure}");
            if self.config.toast_on_failure {
                doc.show_toast("Could not highlight the selection");
            }
        }
        if completed.iter().any(Result::is_ok) {
            doc.request_redraw();
        }
        completed
    }

    fn forget_clicked(&mut self, node: NodeId) {
        if self.observer.selection().highlight_element == Some(node) {
            self.observer.clear();
        }
    }
}

impl EventHandler for Highlighter {
    fn handle_event(&mut self, _chain: &[usize], event: &mut DomEvent, doc: &mut BaseDocument) {
        self.observer.observe(&*doc, event);
    }
}
