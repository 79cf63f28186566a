use crate::render::{TextAnchor, TextBounds};

use super::AnchorSide;

/// Font size of the hover label.
pub const TOOLTIP_FONT_SIZE_PX: f64 = 13.0;
pub const FOCUS_DOT_RADIUS_PX: f64 = 4.0;
pub const LABEL_CORNER_RADIUS_PX: f64 = 4.0;

/// Vertical distance between the date line and the value line.
#[must_use]
pub fn value_line_offset_px() -> f64 {
    (TOOLTIP_FONT_SIZE_PX * 1.25).round()
}

/// Final geometry of a hover label, in plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipBox {
    pub box_x: f64,
    pub box_y: f64,
    pub box_width: f64,
    pub box_height: f64,
    pub text_x: f64,
    pub text_y: f64,
    pub text_anchor: TextAnchor,
}

impl TooltipBox {
    /// Sizes the box around already measured text and places it next to the
    /// focus point `(x, y)` on the given side.
    #[must_use]
    pub fn place(x: f64, y: f64, text: TextBounds, side: AnchorSide) -> Self {
        let font = TOOLTIP_FONT_SIZE_PX;
        let box_width = (text.width + font).ceil();
        let box_height = (text.height + font).ceil();
        let gap = font / 2.0;
        let (box_dx, text_dx) = match side {
            AnchorSide::Start => (gap, font),
            AnchorSide::End => (-(gap + box_width), -font),
        };

        Self {
            box_x: x + box_dx,
            box_y: y + font / 2.5,
            box_width,
            box_height,
            text_x: x + text_dx,
            text_y: y + box_height / 2.0,
            text_anchor: side.text_anchor(),
        }
    }
}
