// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box geometry handed over by the external layout solver.

use kurbo::{Insets, Rect, Size};

/// An element's box as produced by layout.
///
/// `bounds` is the border box, positioned relative to the parent's border box
/// origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutBox {
    /// Border box.
    pub bounds: Rect,
    /// Padding widths.
    pub padding: Insets,
    /// Border widths.
    pub border: Insets,
}

impl LayoutBox {
    /// A box of `size` at `(x, y)` with no padding or border.
    #[must_use]
    pub fn new(x: f64, y: f64, size: Size) -> Self {
        Self {
            bounds: Rect::from_origin_size((x, y), size),
            ..Self::default()
        }
    }

    /// Border box size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.bounds.size()
    }

    /// The border box in the element's own coordinates.
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.size().to_rect()
    }

    /// The padding box in the element's own coordinates.
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.border_box() - self.border
    }

    /// The content box in the element's own coordinates.
    #[must_use]
    pub fn content_box(&self) -> Rect {
        self.padding_box() - self.padding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_boxes_shrink_inward() {
        let layout = LayoutBox {
            bounds: Rect::new(5.0, 5.0, 105.0, 55.0),
            padding: Insets::uniform(4.0),
            border: Insets::uniform(1.0),
        };
        assert_eq!(layout.border_box(), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(layout.padding_box(), Rect::new(1.0, 1.0, 99.0, 49.0));
        assert_eq!(layout.content_box(), Rect::new(5.0, 5.0, 95.0, 45.0));
    }
}
