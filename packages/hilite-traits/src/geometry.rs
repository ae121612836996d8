use serde::{Deserialize, Serialize};

/// A viewport-relative box, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const ZERO: Self = BoundingBox {
        top: 0.0,
        left: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// A box with no width or no height can't anchor anything.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(left, top, right - left, bottom - top)
    }

    /// Whether every edge is within `epsilon` of the other box's edge
    pub fn approx_eq(&self, other: &BoundingBox, epsilon: f64) -> bool {
        (self.top - other.top).abs() <= epsilon
            && (self.left - other.left).abs() <= epsilon
            && (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::BoundingBox;

    #[test]
    fn union_covers_both_boxes() {
        let a = BoundingBox::new(10.0, 10.0, 20.0, 10.0);
        let b = BoundingBox::new(5.0, 30.0, 10.0, 5.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(5.0, 10.0, 25.0, 25.0));
    }

    #[test]
    fn zero_area_is_empty() {
        assert!(BoundingBox::ZERO.is_empty());
        assert!(BoundingBox::new(3.0, 3.0, 10.0, 0.0).is_empty());
        assert!(!BoundingBox::new(3.0, 3.0, 10.0, 1.0).is_empty());
    }
}
