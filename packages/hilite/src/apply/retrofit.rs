use crate::HighlightColor;
use crate::adapter::{DocumentTreeAdapter, NodeId};
use crate::wrapper::{self, ATTR_ID, Overlaps};

/// Find elements under `root` painted with `color` by a native command and turn them
/// into wrappers for highlight `id`.
///
/// Matching is by inline background colour, compared after parsing so `#fef08a` and
/// `rgb(254, 240, 138)` are the same. Whitespace-only matches are unpainted instead of
/// tagged, and an older wrapper a match sits in is split around it. Returns the
/// wrappers in document order.
pub fn retrofit_painted_elements(
    doc: &mut dyn DocumentTreeAdapter,
    root: NodeId,
    color: HighlightColor,
    id: &str,
    note: Option<&str>,
) -> Vec<NodeId> {
    let root = if doc.is_connected(root) { root } else { doc.root() };
    let candidates = doc.query_by_attribute(root, "style", None);
    retrofit_candidates(doc, candidates, color, id, note)
}

/// Like [`retrofit_painted_elements`], but only considers the elements a command
/// reported creating, so spans painted for another highlight are left alone
pub fn retrofit_created_elements(
    doc: &mut dyn DocumentTreeAdapter,
    created: &[NodeId],
    color: HighlightColor,
    id: &str,
    note: Option<&str>,
) -> Vec<NodeId> {
    retrofit_candidates(doc, created.to_vec(), color, id, note)
}

fn retrofit_candidates(
    doc: &mut dyn DocumentTreeAdapter,
    candidates: Vec<NodeId>,
    color: HighlightColor,
    id: &str,
    note: Option<&str>,
) -> Vec<NodeId> {
    let target = color.rgba8();
    let painted: Vec<NodeId> = candidates
        .into_iter()
        .filter(|&node| {
            doc.is_connected(node)
                && doc.is_wrapper_candidate(node)
                && doc.attr(node, ATTR_ID).is_none()
                && doc.background_color(node) == Some(target)
        })
        .collect();

    let mut wrappers: Vec<NodeId> = Vec::with_capacity(painted.len());
    let mut overlaps = Overlaps::default();
    for node in painted {
        if !doc.is_connected(node) {
            continue;
        }

        if doc.text_content(node).trim().is_empty() {
            doc.unwrap(node);
            continue;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!("Retrofitting painted element {node} into highlight {id}");
        let outer = wrapper::enclosing_wrapper(doc, node);
        doc.clear_background_color(node);
        wrapper::write_wrapper_attrs(doc, node, id, color, note);
        wrappers.push(node);
        if let Some(outer) = outer {
            overlaps.push(outer, node);
        }
    }
    overlaps.split_all(doc);

    wrappers
}
