// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint batches produced by the Background axis.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Insets, Rect, RoundedRect};

use super::layout::LayoutBox;
use crate::property::Color;

/// One drawing command for an element's box, in the element's own
/// coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintBatch {
    /// The background fill over the border box.
    Fill {
        /// Shape to fill.
        shape: RoundedRect,
        /// Fill color with effective opacity applied.
        color: Color,
    },
    /// One border edge.
    Border {
        /// The edge rectangle.
        rect: Rect,
        /// Edge color with effective opacity applied.
        color: Color,
    },
    /// A background image stretched over the padding box.
    Image {
        /// Image source as given in `background-image`.
        source: String,
        /// Destination rectangle.
        rect: Rect,
        /// Effective opacity.
        opacity: f32,
    },
}

/// The resolved inputs of the Background axis.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BackgroundStyle {
    pub(crate) background: Color,
    pub(crate) image: Option<String>,
    pub(crate) border: Insets,
    pub(crate) border_color: Color,
    pub(crate) radius: f64,
    pub(crate) opacity: f32,
}

impl BackgroundStyle {
    /// Builds the batches for `layout`.
    pub(crate) fn build(&self, layout: &LayoutBox) -> Vec<PaintBatch> {
        let mut batches = Vec::new();
        if self.opacity <= 0.0 {
            return batches;
        }
        let outer = layout.border_box();
        if outer.is_zero_area() {
            return batches;
        }

        let fill = self.background.with_opacity(self.opacity);
        if !fill.is_transparent() {
            batches.push(PaintBatch::Fill {
                shape: RoundedRect::from_rect(outer, self.radius),
                color: fill,
            });
        }

        if let Some(source) = &self.image {
            batches.push(PaintBatch::Image {
                source: source.clone(),
                rect: outer - self.border,
                opacity: self.opacity,
            });
        }

        let color = self.border_color.with_opacity(self.opacity);
        if !color.is_transparent() {
            let b = self.border;
            let edges = [
                Rect::new(outer.x0, outer.y0, outer.x1, outer.y0 + b.y0),
                Rect::new(outer.x1 - b.x1, outer.y0, outer.x1, outer.y1),
                Rect::new(outer.x0, outer.y1 - b.y1, outer.x1, outer.y1),
                Rect::new(outer.x0, outer.y0, outer.x0 + b.x0, outer.y1),
            ];
            batches.extend(
                edges
                    .into_iter()
                    .filter(|r| !r.is_zero_area())
                    .map(|rect| PaintBatch::Border { rect, color }),
            );
        }
        batches
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    fn style() -> BackgroundStyle {
        BackgroundStyle {
            background: Color::rgb(255, 0, 0),
            image: None,
            border: Insets::ZERO,
            border_color: Color::BLACK,
            radius: 0.0,
            opacity: 1.0,
        }
    }

    fn layout() -> LayoutBox {
        LayoutBox {
            bounds: Rect::new(0.0, 0.0, 20.0, 10.0),
            ..LayoutBox::default()
        }
    }

    #[test]
    fn fill_only_without_borders() {
        let batches = style().build(&layout());
        assert_eq!(batches.len(), 1);
        assert!(
            matches!(batches[0], PaintBatch::Fill { color, .. } if color == Color::rgb(255, 0, 0)),
            "unexpected batch: {:?}",
            batches[0]
        );
    }

    #[test]
    fn borders_emit_one_batch_per_edge() {
        let s = BackgroundStyle {
            border: Insets::new(1.0, 0.0, 1.0, 2.0),
            background: Color::TRANSPARENT,
            ..style()
        };
        let batches = s.build(&layout());
        // Top edge is zero width.
        assert_eq!(batches.len(), 3);
        assert!(batches.contains(&PaintBatch::Border {
            rect: Rect::new(0.0, 8.0, 20.0, 10.0),
            color: Color::BLACK,
        }));
    }

    #[test]
    fn opacity_scales_alpha() {
        let s = BackgroundStyle {
            opacity: 0.5,
            image: Some("a.png".to_string()),
            ..style()
        };
        let batches = s.build(&layout());
        let PaintBatch::Fill { color, .. } = &batches[0] else {
            panic!("expected a fill first, got {batches:?}");
        };
        assert_eq!(color.a, 128);
        assert!(matches!(&batches[1], PaintBatch::Image { opacity, .. } if *opacity == 0.5));
    }

    #[test]
    fn fully_transparent_builds_nothing() {
        let s = BackgroundStyle {
            opacity: 0.0,
            ..style()
        };
        assert!(s.build(&layout()).is_empty());
    }
}
