// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip regions produced by the Clip axis.

use kurbo::{Point, Rect};

use crate::transform::Transform3d;

/// The region an element and its descendants are clipped to, in document
/// coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ElementClip {
    /// Unclipped.
    #[default]
    None,
    /// An axis-aligned rectangle, suitable for a GPU scissor.
    Scissor(Rect),
    /// A transformed quad that needs a stencil or shader clip. `bounds` is a
    /// conservative scissor that also folds in every axis-aligned ancestor
    /// clip.
    Shader {
        /// Corners in clockwise order from the local top-left.
        quad: [Point; 4],
        /// Axis-aligned bounds of the clipped area.
        bounds: Rect,
    },
}

impl ElementClip {
    /// Clips to `local` (in the element's own coordinates) mapped through
    /// `transform`.
    #[must_use]
    pub fn from_local_rect(local: Rect, transform: &Transform3d) -> Self {
        let quad = [
            transform.transform_point(Point::new(local.x0, local.y0)),
            transform.transform_point(Point::new(local.x1, local.y0)),
            transform.transform_point(Point::new(local.x1, local.y1)),
            transform.transform_point(Point::new(local.x0, local.y1)),
        ];
        if transform.is_axis_aligned_2d() {
            Self::Scissor(Rect::from_points(quad[0], quad[2]))
        } else {
            Self::Shader {
                quad,
                bounds: quad_bounds(&quad),
            }
        }
    }

    /// Intersects this clip with the clip inherited from the parent.
    #[must_use]
    pub fn intersect(self, parent: Self) -> Self {
        match (self, parent) {
            (clip, Self::None) | (Self::None, clip) => clip,
            (Self::Scissor(a), Self::Scissor(b)) => Self::Scissor(a.intersect(b)),
            (Self::Shader { quad, bounds }, other) => Self::Shader {
                quad,
                bounds: bounds.intersect(other.bounds().unwrap_or(bounds)),
            },
            (Self::Scissor(rect), Self::Shader { quad, bounds }) => Self::Shader {
                quad,
                bounds: rect.intersect(bounds),
            },
        }
    }

    /// The axis-aligned bounds of the clip, or `None` if unclipped.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::None => None,
            Self::Scissor(rect) => Some(*rect),
            Self::Shader { bounds, .. } => Some(*bounds),
        }
    }

    /// Whether `p` (document coordinates) survives the clip.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::None => true,
            Self::Scissor(rect) => rect.contains(p),
            Self::Shader { quad, bounds } => bounds.contains(p) && quad_contains(quad, p),
        }
    }

    /// Whether nothing survives the clip.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds().is_some_and(|r| r.is_zero_area())
    }
}

fn quad_bounds(quad: &[Point; 4]) -> Rect {
    quad[1..]
        .iter()
        .fold(Rect::from_points(quad[0], quad[0]), |r, p| r.union_pt(*p))
}

/// Point in a convex quad of either winding.
fn quad_contains(quad: &[Point; 4], p: Point) -> bool {
    let mut sign = 0.0_f64;
    for i in 0..4 {
        let (a, b) = (quad[i], quad[(i + 1) % 4]);
        let cross = (b - a).cross(p - a);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}
