//! Finding, recolouring, annotating and removing highlights that are already in the tree.
//!
//! Colour and note changes apply to every wrapper sharing the target's id, so a
//! highlight that spans several paragraphs never ends up half recoloured.

use serde::Serialize;

use crate::adapter::{DocumentTreeAdapter, NodeId};
use crate::wrapper::{self, ATTR_ID, ATTR_NOTE};
use crate::{HighlightColor, HighlightError};

/// One highlight as a whole: every wrapper sharing an id
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRecord {
    pub id: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// The highlighted text, concatenated across wrappers
    pub text: String,
    pub wrappers: Vec<NodeId>,
}

/// Every wrapper under `container` (inclusive), in document order
pub fn get_all_highlights(doc: &dyn DocumentTreeAdapter, container: NodeId) -> Vec<NodeId> {
    doc.query_by_attribute(container, ATTR_ID, None)
        .into_iter()
        .filter(|&node| wrapper::is_wrapper(doc, node))
        .collect()
}

/// The wrappers carrying highlight `id` under `container`, in document order
pub fn wrappers_with_id(doc: &dyn DocumentTreeAdapter, container: NodeId, id: &str) -> Vec<NodeId> {
    doc.query_by_attribute(container, ATTR_ID, Some(id))
        .into_iter()
        .filter(|&node| wrapper::is_wrapper(doc, node))
        .collect()
}

/// Group the wrappers under `container` by id, ordered by each highlight's first wrapper
pub fn highlight_groups(doc: &dyn DocumentTreeAdapter, container: NodeId) -> Vec<HighlightRecord> {
    let mut groups: Vec<HighlightRecord> = Vec::new();
    for node in get_all_highlights(doc, container) {
        let Some(data) = wrapper::highlight_data(doc, node) else {
            continue;
        };
        match groups.iter_mut().find(|group| group.id == data.id) {
            Some(group) => {
                group.text.push_str(&data.text);
                group.wrappers.push(node);
            }
            None => groups.push(HighlightRecord {
                id: data.id,
                color: data.color,
                note: data.note,
                text: data.text,
                wrappers: vec![node],
            }),
        }
    }
    groups
}

/// The highlight wrapper at or above `node`
pub fn enclosing_highlight(doc: &dyn DocumentTreeAdapter, node: NodeId) -> Option<NodeId> {
    wrapper::wrapper_for(doc, node)
}

/// Unwrap a single wrapper in place. Split text nodes are merged back.
pub fn remove_highlight(doc: &mut dyn DocumentTreeAdapter, node: NodeId) -> Result<(), HighlightError> {
    if !wrapper::is_wrapper(doc, node) || doc.parent(node).is_none() {
        return Err(HighlightError::MalformedHighlight { node });
    }
    if !doc.unwrap(node) {
        return Err(HighlightError::MalformedHighlight { node });
    }
    let root = doc.root();
    prune_empty_wrappers(doc, root);
    Ok(())
}

/// Unwrap every wrapper of highlight `id` under `container`. Returns how many were removed.
pub fn remove_highlight_by_id(doc: &mut dyn DocumentTreeAdapter, container: NodeId, id: &str) -> usize {
    let mut removed = 0;
    for node in wrappers_with_id(doc, container, id) {
        if doc.is_connected(node) && doc.unwrap(node) {
            removed += 1;
        }
    }
    if removed > 0 {
        let root = doc.root();
        prune_empty_wrappers(doc, root);
    }
    removed
}

/// Recolour the highlight `node` belongs to. Returns the number of wrappers changed.
pub fn change_highlight_color(
    doc: &mut dyn DocumentTreeAdapter,
    node: NodeId,
    color: HighlightColor,
) -> Result<usize, HighlightError> {
    let siblings = highlight_siblings(doc, node)?;
    for &wrapper in &siblings {
        wrapper::write_color(doc, wrapper, color);
    }
    let root = doc.root();
    prune_empty_wrappers(doc, root);
    Ok(siblings.len())
}

/// Set or (for blank notes) clear the note of the highlight `node` belongs to
pub fn update_highlight_note(
    doc: &mut dyn DocumentTreeAdapter,
    node: NodeId,
    note: Option<&str>,
) -> Result<usize, HighlightError> {
    let siblings = highlight_siblings(doc, node)?;
    for &wrapper in &siblings {
        wrapper::write_note(doc, wrapper, note);
    }
    let root = doc.root();
    prune_empty_wrappers(doc, root);
    Ok(siblings.len())
}

/// Unwrap wrappers under `container` that no longer contain any text
pub fn prune_empty_wrappers(doc: &mut dyn DocumentTreeAdapter, container: NodeId) -> usize {
    let empty: Vec<NodeId> = get_all_highlights(doc, container)
        .into_iter()
        .filter(|&node| doc.text_content(node).is_empty())
        .collect();

    let mut pruned = 0;
    for node in empty {
        if doc.is_connected(node) && doc.unwrap(node) {
            pruned += 1;
        }
    }

    #[cfg(feature = "tracing")]
    if pruned > 0 {
        tracing::debug!("Pruned {pruned} empty highlight wrappers");
    }
    pruned
}

/// All wrappers in the document sharing the id of the wrapper at `node`
fn highlight_siblings(doc: &dyn DocumentTreeAdapter, node: NodeId) -> Result<Vec<NodeId>, HighlightError> {
    if !wrapper::is_wrapper(doc, node) {
        return Err(HighlightError::MalformedHighlight { node });
    }
    let id = doc
        .attr(node, ATTR_ID)
        .ok_or(HighlightError::MalformedHighlight { node })?
        .to_string();
    let mut siblings = wrappers_with_id(doc, doc.root(), &id);
    if !siblings.contains(&node) {
        // Detached from the document, but still a wrapper
        siblings.push(node);
    }
    Ok(siblings)
}

/// The note of a wrapper, if any
pub fn highlight_note(doc: &dyn DocumentTreeAdapter, node: NodeId) -> Option<&str> {
    doc.attr(node, ATTR_NOTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::{ATTR_COLOR, ATTR_TITLE, wrapper_attrs};
    use crate::decompose::Segment;
    use hilite_dom::{BaseDocument, DocumentConfig, qual_name};

    /// `<p>one two three</p>` with "one" and "three" wrapped as one highlight
    fn highlighted() -> (BaseDocument, usize, Vec<usize>) {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let p = doc.create_element(qual_name!("p", html), vec![]);
        let t = doc.create_text_node("one two three");
        doc.append(0, &[p]);
        doc.append(p, &[t]);

        let attrs = wrapper_attrs("highlight-1-abc", HighlightColor::Yellow, None);
        let attrs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        // Wrap the tail first so the head's offsets stay valid
        let second = doc.wrap(&Segment { node: t, start: 8, end: 13 }, &attrs).unwrap();
        let first = doc.wrap(&Segment { node: t, start: 0, end: 3 }, &attrs).unwrap();
        (doc, p, vec![first, second])
    }

    #[test]
    fn lists_wrappers_in_document_order() {
        let (doc, p, wrappers) = highlighted();
        assert_eq!(get_all_highlights(&doc, p), wrappers);

        let groups = highlight_groups(&doc, p);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].text, "onethree");
        assert_eq!(groups[0].color, "yellow");
    }

    #[test]
    fn recolour_and_note_reach_every_wrapper() {
        let (mut doc, _p, wrappers) = highlighted();
        assert_eq!(change_highlight_color(&mut doc, wrappers[1], HighlightColor::Peach).unwrap(), 2);
        assert_eq!(update_highlight_note(&mut doc, wrappers[0], Some("remember")).unwrap(), 2);

        for &wrapper in &wrappers {
            assert_eq!(doc.attr(wrapper, ATTR_COLOR), Some("peach"));
            assert_eq!(doc.attr(wrapper, ATTR_TITLE), Some("remember"));
            assert!(doc.get_node(wrapper).unwrap().has_class("hilite-peach"));
            assert!(!doc.get_node(wrapper).unwrap().has_class("hilite-yellow"));
        }

        update_highlight_note(&mut doc, wrappers[0], Some("   ")).unwrap();
        assert_eq!(highlight_note(&doc, wrappers[1]), None);
        assert_eq!(doc.attr(wrappers[1], ATTR_TITLE), None);
    }

    #[test]
    fn removal_restores_the_text_node() {
        let (mut doc, p, wrappers) = highlighted();
        assert_eq!(remove_highlight_by_id(&mut doc, p, "highlight-1-abc"), 2);
        let node = doc.get_node(p).unwrap();
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.inner_html(), "one two three");
        assert!(!doc.is_connected(wrappers[0]));

        assert_eq!(remove_highlight_by_id(&mut doc, p, "highlight-1-abc"), 0);
    }

    #[test]
    fn non_wrappers_are_rejected() {
        let (mut doc, p, _) = highlighted();
        let before = doc.get_node(p).unwrap().outer_html();
        assert!(matches!(
            remove_highlight(&mut doc, p),
            Err(HighlightError::MalformedHighlight { .. })
        ));
        assert!(change_highlight_color(&mut doc, p, HighlightColor::Cyan).is_err());
        assert_eq!(doc.get_node(p).unwrap().outer_html(), before);
    }

    #[test]
    fn empty_wrappers_are_pruned() {
        let (mut doc, p, wrappers) = highlighted();
        let text = doc.get_node(wrappers[0]).unwrap().children[0];
        doc.mutate().set_node_text(text, "");
        assert_eq!(prune_empty_wrappers(&mut doc, p), 1);
        assert_eq!(get_all_highlights(&doc, p), vec![wrappers[1]]);
    }
}
