//! Node geometry.
//!
//! There is no layout engine in this crate. The embedder measures nodes however it
//! likes and records document-relative border boxes with [`BaseDocument::set_node_layout`].
//! Everything here is derived from those boxes.

use hilite_traits::{BoundingBox, HitResult};
use kurbo::{Point, Rect};

use crate::BaseDocument;
use crate::range::DomRange;

impl BaseDocument {
    /// Record the document-relative border box of a node
    pub fn set_node_layout(&mut self, node_id: usize, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.final_layout = rect;
        }
    }

    /// The document-relative box of a node. Nodes without a box of their own
    /// (e.g. elements inserted after the embedder measured the page) use the union
    /// of their descendants' boxes.
    pub fn absolute_rect(&self, node_id: usize) -> Option<Rect> {
        let node = self.nodes.get(node_id)?;
        if node.final_layout.area() > 0.0 {
            return Some(node.final_layout);
        }
        node.children
            .iter()
            .filter_map(|child_id| self.absolute_rect(*child_id))
            .reduce(|acc, rect| acc.union(rect))
    }

    /// The viewport-relative box of a node
    pub fn node_rect(&self, node_id: usize) -> Option<BoundingBox> {
        self.absolute_rect(node_id)
            .map(|rect| self.to_viewport_box(rect))
    }

    /// The viewport-relative box enclosing everything the range covers.
    ///
    /// Partially covered text nodes are sliced horizontally in proportion to the
    /// number of characters covered.
    pub fn range_rect(&self, range: &DomRange) -> Option<BoundingBox> {
        range
            .text_leaves(self)
            .into_iter()
            .filter_map(|leaf| {
                let node = &self.nodes[leaf.node];
                let rect = node.final_layout;
                if rect.area() <= 0.0 {
                    return None;
                }
                let text = &node.text_data()?.content;
                let total = text.chars().count().max(1) as f64;
                let before = text[..leaf.start].chars().count() as f64;
                let covered = text[leaf.start..leaf.end].chars().count() as f64;
                let x0 = rect.x0 + rect.width() * (before / total);
                let x1 = x0 + rect.width() * (covered / total);
                Some(Rect::new(x0, rect.y0, x1, rect.y1))
            })
            .reduce(|acc, rect| acc.union(rect))
            .map(|rect| self.to_viewport_box(rect))
    }

    /// Find the deepest node under a viewport-relative point
    pub fn hit(&self, x: f32, y: f32) -> Option<HitResult> {
        let point = Point::new(
            x as f64 + self.viewport_scroll.x,
            y as f64 + self.viewport_scroll.y,
        );
        self.hit_inner(0, point)
            .map(|node_id| HitResult { node_id, x, y })
    }

    fn hit_inner(&self, node_id: usize, point: Point) -> Option<usize> {
        let node = self.nodes.get(node_id)?;

        // Later siblings paint on top
        for &child_id in node.children.iter().rev() {
            if let Some(hit) = self.hit_inner(child_id, point) {
                return Some(hit);
            }
        }

        let rect = node.final_layout;
        (rect.area() > 0.0 && rect.contains(point)).then_some(node_id)
    }

    fn to_viewport_box(&self, rect: Rect) -> BoundingBox {
        BoundingBox::new(
            rect.x0 - self.viewport_scroll.x,
            rect.y0 - self.viewport_scroll.y,
            rect.width(),
            rect.height(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::BoundaryPoint;
    use crate::{DocumentConfig, qual_name};

    #[test]
    fn range_rect_slices_partial_leaves() {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let p = doc.create_element(qual_name!("p", html), vec![]);
        let t = doc.create_text_node("0123456789");
        doc.append(0, &[p]);
        doc.append(p, &[t]);
        doc.set_node_layout(t, Rect::new(100.0, 50.0, 200.0, 70.0));
        doc.set_viewport_scroll(Point::new(0.0, 20.0));

        let range = DomRange::new(BoundaryPoint::new(t, 2), BoundaryPoint::new(t, 5));
        let rect = doc.range_rect(&range).unwrap();
        assert!(rect.approx_eq(&BoundingBox::new(120.0, 30.0, 30.0, 20.0), 1e-9));

        // The paragraph has no box of its own and falls back to its text
        assert_eq!(
            doc.node_rect(p),
            Some(BoundingBox::new(100.0, 30.0, 100.0, 20.0))
        );
    }

    #[test]
    fn hit_finds_deepest_node() {
        let mut doc = BaseDocument::new(DocumentConfig::default());
        let div = doc.create_element(qual_name!("div", html), vec![]);
        let t = doc.create_text_node("text");
        doc.append(0, &[div]);
        doc.append(div, &[t]);
        doc.set_node_layout(div, Rect::new(0.0, 0.0, 500.0, 500.0));
        doc.set_node_layout(t, Rect::new(10.0, 10.0, 50.0, 30.0));

        assert_eq!(doc.hit(20.0, 20.0).map(|hit| hit.node_id), Some(t));
        assert_eq!(doc.hit(200.0, 200.0).map(|hit| hit.node_id), Some(div));
        assert!(doc.hit(900.0, 900.0).is_none());
    }
}
