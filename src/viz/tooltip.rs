use crate::models::Point;
use glam::Vec2;

/// Pixel offset of the tooltip box from the pointer.
pub const TOOLTIP_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// Hover overlay state; derived from the latest pointer event only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tooltip {
    pub visible: bool,
    /// Pointer position in surface pixels.
    pub anchor: Vec2,
    pub content: String,
}

impl Tooltip {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn shown(anchor: Vec2, content: String) -> Self {
        Self {
            visible: true,
            anchor,
            content,
        }
    }

    /// Top-left corner of the tooltip box in surface pixels.
    pub fn box_origin(&self) -> Vec2 {
        self.anchor + TOOLTIP_OFFSET
    }
}

/// `"<x name>: 10.00, <y name>: 100.00, <z name>: 0.25"` from the point's source values.
pub fn format_tooltip(axis_names: &[String; 3], point: &Point) -> String {
    format!(
        "{}: {:.2}, {}: {:.2}, {}: {:.2}",
        axis_names[0], point.original_x, axis_names[1], point.original_y, axis_names[2], point.original_z
    )
}
