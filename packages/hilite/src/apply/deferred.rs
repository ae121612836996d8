use web_time::Instant;

use hilite_dom::{CommandOutcome, CommandSupport, CommandTicket, ExecCommand, FlushedCommand};

use super::{
    AppliedHighlight, ApplyContext, HighlightStrategy, StrategyKind, StrategyResult,
    retrofit_created_elements, retrofit_painted_elements,
};
use crate::adapter::{DocumentTreeAdapter, NodeId};
use crate::{HighlightColor, HighlightError};

/// Issue the native command and come back for the painted elements later.
///
/// Hosts with `DEFERRED_PAINT` only paint on their next flush, so the wrappers can't
/// be tagged in the same call. The returned [`PendingRetrofit`] is run by
/// [`ApplicationEngine::run_due`](super::ApplicationEngine::run_due).
#[derive(Debug, Default, Clone, Copy)]
pub struct DeferredRescanStrategy;

/// Where a scheduled highlight's painted elements stand
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaintState {
    /// Queued in the host under this ticket
    Queued(CommandTicket),
    /// Painted. These are the elements the command created.
    Painted(Vec<NodeId>),
    /// The host dropped the command without painting anything
    Dropped,
}

/// A highlight whose wrappers will be tagged once the host has painted them
#[derive(Clone, Debug, PartialEq)]
pub struct PendingRetrofit {
    pub id: String,
    pub color: HighlightColor,
    pub note: Option<String>,
    pub root: NodeId,
    pub due: Instant,
    pub paint: PaintState,
}

impl PendingRetrofit {
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    /// Record what the host did with this retrofit's command, if the flush covered it
    pub(crate) fn record_flush(&mut self, flushed: &FlushedCommand) -> bool {
        if self.paint != PaintState::Queued(flushed.ticket()) {
            return false;
        }
        self.paint = match flushed {
            FlushedCommand::Painted { created, .. } => PaintState::Painted(created.clone()),
            FlushedCommand::Dropped { .. } => PaintState::Dropped,
        };
        true
    }

    /// Tag the painted elements. A command that painted nothing usable is an error,
    /// even though the highlight was reported as scheduled.
    pub(crate) fn complete(
        self,
        doc: &mut dyn DocumentTreeAdapter,
    ) -> Result<AppliedHighlight, HighlightError> {
        let note = self.note.as_deref();
        let wrappers = match &self.paint {
            PaintState::Painted(created) => retrofit_created_elements(doc, created, self.color, &self.id, note),
            // Flushed by someone else, so only the colour is left to go on
            PaintState::Queued(_) => retrofit_painted_elements(doc, self.root, self.color, &self.id, note),
            PaintState::Dropped => {
                return Err(HighlightError::RetrofitFailed {
                    id: self.id,
                    reason: "the host dropped the command".to_string(),
                });
            }
        };

        if wrappers.is_empty() {
            return Err(HighlightError::RetrofitFailed {
                id: self.id,
                reason: "no painted elements matched the highlight colour".to_string(),
            });
        }
        Ok(AppliedHighlight {
            id: self.id,
            strategy: StrategyKind::DeferredRescan,
            wrappers,
            scheduled: false,
        })
    }
}

fn hilite_command(ctx: &ApplyContext) -> ExecCommand {
    ExecCommand::HiliteColor(ctx.color.background().to_string())
}

impl HighlightStrategy for DeferredRescanStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DeferredRescan
    }

    fn preflight(&self, doc: &dyn DocumentTreeAdapter, ctx: &ApplyContext) -> Result<(), String> {
        match doc.query_command_supported(&hilite_command(ctx)) {
            CommandSupport::Unsupported => Err("hiliteColor is not supported".to_string()),
            CommandSupport::Immediate | CommandSupport::Deferred => Ok(()),
        }
    }

    fn apply(&mut self, doc: &mut dyn DocumentTreeAdapter, ctx: &ApplyContext) -> StrategyResult {
        if let Err(reason) = self.preflight(&*doc, ctx) {
            return StrategyResult::failed(reason);
        }

        let paint = match doc.exec_command(hilite_command(ctx)) {
            CommandOutcome::Deferred { ticket } => PaintState::Queued(ticket),
            CommandOutcome::Applied { created } if !created.is_empty() => PaintState::Painted(created),
            other => return StrategyResult::failed(format!("hiliteColor returned {other:?}")),
        };

        StrategyResult::Scheduled(PendingRetrofit {
            id: ctx.id.clone(),
            color: ctx.color,
            note: ctx.note.clone(),
            root: ctx.root,
            due: ctx.now + ctx.deferred_delay,
            paint,
        })
    }
}
