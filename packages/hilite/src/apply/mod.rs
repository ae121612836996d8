//! The highlight application engine.
//!
//! A highlight is applied by the first strategy (in [`ApplicationEngine`] order) that
//! succeeds. Strategies that fail without touching the tree fall through to the next
//! one; a strategy that fails after mutating the tree stops the engine.

mod deferred;
mod native;
mod retrofit;
mod structural;

use std::fmt;
use std::time::Duration;

use hilite_dom::DomRange;
use web_time::Instant;

use crate::{HighlightColor, HighlightError};
use crate::adapter::{DocumentTreeAdapter, NodeId};

pub use deferred::{DeferredRescanStrategy, PaintState, PendingRetrofit};
pub use native::NativeCommandStrategy;
pub use retrofit::{retrofit_created_elements, retrofit_painted_elements};
pub use structural::StructuralWrapStrategy;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    NativeCommand,
    StructuralWrap,
    DeferredRescan,
    /// A strategy supplied by the embedder
    Custom(&'static str),
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::NativeCommand => f.write_str("native-command"),
            StrategyKind::StructuralWrap => f.write_str("structural-wrap"),
            StrategyKind::DeferredRescan => f.write_str("deferred-rescan"),
            StrategyKind::Custom(name) => f.write_str(name),
        }
    }
}

/// Everything a strategy needs to know about one highlight action
#[derive(Clone, Debug)]
pub struct ApplyContext {
    /// The id shared by every wrapper of this highlight
    pub id: String,
    pub color: HighlightColor,
    pub note: Option<String>,
    /// The (non-collapsed) selection being highlighted
    pub range: DomRange,
    /// Subtree to rescan for natively painted elements
    pub root: NodeId,
    pub now: Instant,
    pub deferred_delay: Duration,
}

#[derive(Debug)]
pub enum StrategyResult {
    /// The highlight is in the tree, materialized by these wrappers (document order)
    Applied(Vec<NodeId>),
    /// The highlight will be materialized when the retrofit comes due
    Scheduled(PendingRetrofit),
    Failed { reason: String, mutated: bool },
}

impl StrategyResult {
    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        StrategyResult::Failed {
            reason: reason.into(),
            mutated: false,
        }
    }
}

pub trait HighlightStrategy {
    fn kind(&self) -> StrategyKind;

    /// Whether the strategy can run here, checked without touching the tree
    fn preflight(&self, doc: &dyn DocumentTreeAdapter, ctx: &ApplyContext) -> Result<(), String> {
        let _ = (doc, ctx);
        Ok(())
    }

    fn apply(&mut self, doc: &mut dyn DocumentTreeAdapter, ctx: &ApplyContext) -> StrategyResult;
}

/// The default strategy order: native command, structural wrap, deferred rescan
pub fn default_strategies() -> Vec<Box<dyn HighlightStrategy>> {
    vec![
        Box::new(NativeCommandStrategy),
        Box::new(StructuralWrapStrategy),
        Box::new(DeferredRescanStrategy),
    ]
}

/// The outcome of a successful highlight action
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedHighlight {
    pub id: String,
    pub strategy: StrategyKind,
    /// Wrappers in document order. Empty while the highlight is scheduled.
    pub wrappers: Vec<NodeId>,
    /// Whether the wrappers will only appear once a pending retrofit runs
    pub scheduled: bool,
}

/// Runs strategies in order and keeps track of scheduled retrofits
pub struct ApplicationEngine {
    strategies: Vec<Box<dyn HighlightStrategy>>,
    pending: Vec<PendingRetrofit>,
}

impl Default for ApplicationEngine {
    fn default() -> Self {
        Self::new(default_strategies())
    }
}

impl ApplicationEngine {
    pub fn new(strategies: Vec<Box<dyn HighlightStrategy>>) -> Self {
        Self {
            strategies,
            pending: Vec::new(),
        }
    }

    pub fn strategies(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        self.strategies.iter().map(|strategy| strategy.kind())
    }

    pub fn pending(&self) -> &[PendingRetrofit] {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Try each strategy in turn. `before_mutate` runs once a strategy has passed its
    /// preflight, right before it is allowed to change the tree (the highlighter uses
    /// it to make sure the stylesheet is present).
    pub fn apply(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        ctx: &ApplyContext,
        mut before_mutate: impl FnMut(&mut dyn DocumentTreeAdapter),
    ) -> Result<AppliedHighlight, HighlightError> {
        for strategy in self.strategies.iter_mut() {
            let kind = strategy.kind();
            if let Err(_reason) = strategy.preflight(&*doc, ctx) {
                #[cfg(feature = "tracing")]
                tracing::debug!("Skipping {kind} strategy: {_reason}");
                continue;
            }

            before_mutate(&mut *doc);
            match strategy.apply(doc, ctx) {
                StrategyResult::Applied(wrappers) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        "Applied highlight {} with {kind} ({} wrappers)",
                        ctx.id,
                        wrappers.len()
                    );
                    return Ok(AppliedHighlight {
                        id: ctx.id.clone(),
                        strategy: kind,
                        wrappers,
                        scheduled: false,
                    });
                }
                StrategyResult::Scheduled(retrofit) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("Scheduled highlight {} with {kind}", ctx.id);
                    self.pending.push(retrofit);
                    return Ok(AppliedHighlight {
                        id: ctx.id.clone(),
                        strategy: kind,
                        wrappers: Vec::new(),
                        scheduled: true,
                    });
                }
                StrategyResult::Failed { reason, mutated } => {
                    let _failure = HighlightError::StrategyFailure {
                        strategy: kind,
                        reason,
                    };
                    if mutated {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("{_failure}; not trying further strategies");
                        return Err(HighlightError::PartialMutation { strategy: kind });
                    }
                    #[cfg(feature = "tracing")]
                    tracing::debug!("{_failure}");
                }
            }
        }
        Err(HighlightError::AllStrategiesFailed)
    }

    /// Flush the host's pending paint and tag the wrappers of every retrofit that is due.
    ///
    /// Each due retrofit yields one result, in the order the highlights were scheduled.
    /// A highlight whose command was dropped or painted nothing comes back as
    /// [`HighlightError::RetrofitFailed`].
    pub fn run_due(
        &mut self,
        doc: &mut dyn DocumentTreeAdapter,
        now: Instant,
    ) -> Vec<Result<AppliedHighlight, HighlightError>> {
        if !self.pending.iter().any(|retrofit| retrofit.is_due(now)) {
            return Vec::new();
        }

        // The flush paints every queued command, including ones not due yet
        for flushed in doc.flush_pending_commands() {
            if !self.pending.iter_mut().any(|retrofit| retrofit.record_flush(&flushed)) {
                #[cfg(feature = "tracing")]
                tracing::debug!("Flushed command {:?} belongs to no scheduled highlight", flushed.ticket());
            }
        }

        let (due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|retrofit| retrofit.is_due(now));
        self.pending = waiting;

        due.into_iter().map(|retrofit| retrofit.complete(doc)).collect()
    }
}
