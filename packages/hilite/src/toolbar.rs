//! Where to float the highlight toolbar relative to the current selection.

use hilite_traits::{BoundingBox, Viewport};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolbarMetrics {
    pub width: f64,
    pub height: f64,
    /// Gap between the toolbar and the selection, and the minimum margin to the viewport edges
    pub spacing: f64,
}

impl Default for ToolbarMetrics {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 44.0,
            spacing: 8.0,
        }
    }
}

/// Viewport-relative position of the toolbar's top-left corner, in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolbarPosition {
    pub top: f64,
    pub left: f64,
}

/// Place the toolbar below the selection, right-aligned with it. Flips above the
/// selection when there is no room below, then clamps into the viewport.
///
/// Without a selection box the toolbar sits at the origin.
pub fn calculate_position(
    rect: Option<&BoundingBox>,
    viewport: &Viewport,
    metrics: &ToolbarMetrics,
) -> ToolbarPosition {
    let Some(rect) = rect else {
        return ToolbarPosition::default();
    };

    let viewport_width = viewport.css_width();
    let viewport_height = viewport.css_height();
    let ToolbarMetrics {
        width,
        height,
        spacing,
    } = *metrics;

    let mut top = rect.bottom() + spacing;
    let mut left = rect.right() - width;

    if top + height > viewport_height {
        top = rect.top - height - spacing;
    }

    // The lower bound wins when the viewport is smaller than the toolbar
    left = left.min(viewport_width - width - spacing).max(spacing);
    top = top.min(viewport_height - height - spacing).max(spacing);

    ToolbarPosition { top, left }
}
