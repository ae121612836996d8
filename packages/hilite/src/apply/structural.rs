use super::{ApplyContext, HighlightStrategy, StrategyKind, StrategyResult};
use crate::adapter::DocumentTreeAdapter;
use crate::decompose::decompose;
use crate::wrapper::{self, Overlaps, wrapper_attrs};

/// Split the selection into per-text-node segments and wrap each one in its own
/// `<span>`. Older wrappers a segment sits in are split around the new wrapper, so
/// the older highlight keeps the text outside the selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralWrapStrategy;

impl HighlightStrategy for StructuralWrapStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::StructuralWrap
    }

    fn preflight(&self, doc: &dyn DocumentTreeAdapter, ctx: &ApplyContext) -> Result<(), String> {
        if decompose(doc, &ctx.range).is_empty() {
            return Err("the selection covers no visible text".to_string());
        }
        Ok(())
    }

    fn apply(&mut self, doc: &mut dyn DocumentTreeAdapter, ctx: &ApplyContext) -> StrategyResult {
        let segments = decompose(doc, &ctx.range);
        if segments.is_empty() {
            return StrategyResult::failed("the selection covers no visible text");
        }

        let attrs = wrapper_attrs(&ctx.id, ctx.color, ctx.note.as_deref());
        let attrs: Vec<(&str, &str)> = attrs.iter().map(|(name, value)| (*name, value.as_str())).collect();

        // Each segment lives in its own text node, so wrapping one never moves another
        let mut wrappers = Vec::with_capacity(segments.len());
        let mut overlaps = Overlaps::default();
        for segment in segments {
            let outer = wrapper::enclosing_wrapper(doc, segment.node);
            match doc.wrap(&segment, &attrs) {
                Ok(node) => {
                    wrappers.push(node);
                    if let Some(outer) = outer {
                        overlaps.push(outer, node);
                    }
                }
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Skipping segment: {_err}");
                }
            }
        }
        overlaps.split_all(doc);

        if wrappers.is_empty() {
            return StrategyResult::failed("no segment could be wrapped");
        }
        StrategyResult::Applied(wrappers)
    }
}
