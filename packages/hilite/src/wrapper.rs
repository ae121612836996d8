//! The attribute set that turns an inline element into a highlight wrapper.

use hilite_traits::HighlightData;

use crate::HighlightColor;
use crate::adapter::{DocumentTreeAdapter, NodeId};
use crate::decompose::Segment;

pub const WRAPPER_CLASS: &str = "hilite";
pub const ATTR_ID: &str = "data-highlight-id";
pub const ATTR_COLOR: &str = "data-color";
pub const ATTR_NOTE: &str = "data-note";
pub const ATTR_TITLE: &str = "title";

/// Whether a node is a highlight wrapper (rather than any element that happens to
/// carry one of our attributes)
pub fn is_wrapper(doc: &dyn DocumentTreeAdapter, node: NodeId) -> bool {
    doc.attr(node, ATTR_ID).is_some_and(|id| !id.is_empty())
        && doc
            .attr(node, "class")
            .is_some_and(|class| class.split_ascii_whitespace().any(|c| c == WRAPPER_CLASS))
}

/// The nearest wrapper strictly above `node`
pub fn enclosing_wrapper(doc: &dyn DocumentTreeAdapter, node: NodeId) -> Option<NodeId> {
    let mut current = doc.parent(node)?;
    loop {
        let candidate = doc.closest_with_attribute(current, ATTR_ID)?;
        if is_wrapper(doc, candidate) {
            return Some(candidate);
        }
        current = doc.parent(candidate)?;
    }
}

/// The wrapper at or above `node`
pub fn wrapper_for(doc: &dyn DocumentTreeAdapter, node: NodeId) -> Option<NodeId> {
    if is_wrapper(doc, node) {
        return Some(node);
    }
    enclosing_wrapper(doc, node)
}

/// Attributes a wrapper keeps when it is split around a newer highlight
const CARRIED_ATTRS: [&str; 5] = ["class", ATTR_ID, ATTR_COLOR, ATTR_NOTE, ATTR_TITLE];

/// Older wrappers that new wrappers were created inside, with those new wrappers
#[derive(Debug, Default)]
pub(crate) struct Overlaps(Vec<(NodeId, Vec<NodeId>)>);

impl Overlaps {
    pub(crate) fn push(&mut self, outer: NodeId, inner: NodeId) {
        match self.0.iter_mut().find(|(node, _)| *node == outer) {
            Some((_, inners)) => inners.push(inner),
            None => self.0.push((outer, vec![inner])),
        }
    }

    /// Split every recorded wrapper around the new wrappers inside it. Runs once all
    /// new wrappers exist, since unwrapping merges the text nodes left behind.
    pub(crate) fn split_all(self, doc: &mut dyn DocumentTreeAdapter) {
        for (outer, inners) in self.0 {
            split_wrapper(doc, outer, &inners);
        }
    }
}

/// Take the newer wrappers `inners` out of the older wrapper `outer`.
///
/// Text of `outer` outside `inners` is wrapped again under `outer`'s own id, colour
/// and note, then `outer` is unwrapped, so no wrapper is left inside another and the
/// older highlight only loses the text the newer one covers. Returns how many
/// wrappers the older highlight keeps from `outer`.
pub fn split_wrapper(doc: &mut dyn DocumentTreeAdapter, outer: NodeId, inners: &[NodeId]) -> usize {
    if !is_wrapper(doc, outer) {
        return 0;
    }
    let attrs: Vec<(&str, String)> = CARRIED_ATTRS
        .iter()
        .filter_map(|&name| Some((name, doc.attr(outer, name)?.to_string())))
        .collect();
    let attrs: Vec<(&str, &str)> = attrs.iter().map(|(name, value)| (*name, value.as_str())).collect();

    let mut kept = 0;
    for leaf in doc.text_leaves_under(outer) {
        if inners.iter().any(|&inner| is_inclusive_ancestor(doc, inner, leaf)) {
            continue;
        }
        let Some(len) = doc.text(leaf).filter(|text| !text.trim().is_empty()).map(str::len) else {
            continue;
        };
        let segment = Segment {
            node: leaf,
            start: 0,
            end: len,
        };
        match doc.wrap(&segment, &attrs) {
            Ok(_) => kept += 1,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Dropping part of wrapper {outer}: {_err}");
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!("Split wrapper {outer} around {} newer wrappers", inners.len());
    doc.unwrap(outer);
    kept
}

fn is_inclusive_ancestor(doc: &dyn DocumentTreeAdapter, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = doc.parent(id);
    }
    false
}

/// Blank notes are treated as no note
pub(crate) fn normalize_note(note: Option<&str>) -> Option<&str> {
    note.map(str::trim).filter(|note| !note.is_empty())
}

/// Attributes for a freshly created wrapper
pub fn wrapper_attrs(id: &str, color: HighlightColor, note: Option<&str>) -> Vec<(&'static str, String)> {
    let mut attrs = vec![
        ("class", format!("{WRAPPER_CLASS} {}", color.class_name())),
        (ATTR_ID, id.to_string()),
        (ATTR_COLOR, color.as_str().to_string()),
    ];
    if let Some(note) = normalize_note(note) {
        attrs.push((ATTR_NOTE, note.to_string()));
        attrs.push((ATTR_TITLE, note.to_string()));
    }
    attrs
}

/// Turn an existing element into a wrapper (or re-tag an existing wrapper)
pub fn write_wrapper_attrs(
    doc: &mut dyn DocumentTreeAdapter,
    node: NodeId,
    id: &str,
    color: HighlightColor,
    note: Option<&str>,
) {
    doc.set_attr(node, ATTR_ID, id);
    write_color(doc, node, color);
    write_note(doc, node, note);
}

pub(crate) fn write_color(doc: &mut dyn DocumentTreeAdapter, node: NodeId, color: HighlightColor) {
    // Keep any classes that aren't ours
    let mut classes: Vec<String> = doc
        .attr(node, "class")
        .unwrap_or("")
        .split_ascii_whitespace()
        .filter(|class| *class != WRAPPER_CLASS && !class.starts_with("hilite-"))
        .map(str::to_string)
        .collect();
    classes.insert(0, color.class_name());
    classes.insert(0, WRAPPER_CLASS.to_string());

    doc.set_attr(node, "class", &classes.join(" "));
    doc.set_attr(node, ATTR_COLOR, color.as_str());
}

pub(crate) fn write_note(doc: &mut dyn DocumentTreeAdapter, node: NodeId, note: Option<&str>) {
    match normalize_note(note) {
        Some(note) => {
            doc.set_attr(node, ATTR_NOTE, note);
            doc.set_attr(node, ATTR_TITLE, note);
        }
        None => {
            doc.remove_attr(node, ATTR_NOTE);
            doc.remove_attr(node, ATTR_TITLE);
        }
    }
}

/// Read a wrapper's identity back out of the tree
pub fn highlight_data(doc: &dyn DocumentTreeAdapter, node: NodeId) -> Option<HighlightData> {
    if !is_wrapper(doc, node) {
        return None;
    }
    Some(HighlightData {
        id: doc.attr(node, ATTR_ID)?.to_string(),
        color: doc.attr(node, ATTR_COLOR).unwrap_or_default().to_string(),
        note: doc.attr(node, ATTR_NOTE).map(str::to_string),
        text: doc.text_content(node),
    })
}

/// The palette colour recorded on a wrapper
pub fn wrapper_color(doc: &dyn DocumentTreeAdapter, node: NodeId) -> Option<HighlightColor> {
    doc.attr(node, ATTR_COLOR)?.parse().ok()
}
