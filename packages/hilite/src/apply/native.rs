use hilite_dom::{CommandOutcome, CommandSupport, ExecCommand};

use super::{ApplyContext, HighlightStrategy, StrategyKind, StrategyResult, retrofit_created_elements};
use crate::adapter::DocumentTreeAdapter;

/// Paint the selection with the document's `hiliteColor` command, then retrofit the
/// painted elements into wrappers.
///
/// Only used when the document executes the command immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCommandStrategy;

fn hilite_command(ctx: &ApplyContext) -> ExecCommand {
    ExecCommand::HiliteColor(ctx.color.background().to_string())
}

impl HighlightStrategy for NativeCommandStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NativeCommand
    }

    fn preflight(&self, doc: &dyn DocumentTreeAdapter, ctx: &ApplyContext) -> Result<(), String> {
        match doc.query_command_supported(&hilite_command(ctx)) {
            CommandSupport::Immediate => Ok(()),
            _ => Err("hiliteColor is not executed immediately".to_string()),
        }
    }

    fn apply(&mut self, doc: &mut dyn DocumentTreeAdapter, ctx: &ApplyContext) -> StrategyResult {
        if let Err(reason) = self.preflight(&*doc, ctx) {
            return StrategyResult::failed(reason);
        }
        let created = match doc.exec_command(hilite_command(ctx)) {
            CommandOutcome::Applied { created } => created,
            other => return StrategyResult::failed(format!("hiliteColor returned {other:?}")),
        };

        let wrappers = retrofit_created_elements(doc, &created, ctx.color, &ctx.id, ctx.note.as_deref());
        if wrappers.is_empty() {
            return StrategyResult::Failed {
                reason: "no painted elements matched the highlight colour".to_string(),
                mutated: !created.is_empty(),
            };
        }
        StrategyResult::Applied(wrappers)
    }
}
