// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty axes and their tracking channels.
//!
//! Each element carries a [`DirtyAxes`] bitset saying which pieces of derived
//! state are stale. The recompute axes also map onto
//! [`understory_dirty`] channels, which the update pass drains to visit
//! dirty elements parent-before-child.
//!
//! # Processing order
//!
//! [`Axis::ORDERED`] is the fixed order in which
//! [`Document::update`](crate::element::Document::update) recomputes axes:
//!
//! ```text
//! Definition → Structure → Perspective → Transform → Clip → StackingContext → Background
//! ```
//!
//! A recompute may re-dirty an axis *later* in this order; that work happens
//! in the same pass. Re-dirtying an axis that was already processed in the
//! current pass is left for the next call, so one pass always terminates.
//!
//! [`Axis::Animation`] and [`Axis::Transition`] are not recomputed by the
//! update pass. They flag elements that need a time advance in
//! [`Document::update_render`](crate::element::Document::update_render).

use core::fmt;

use understory_dirty::Channel;

/// One category of derived element state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Matched definition layer is stale (class, id, pseudo class, tree).
    Definition,
    /// Child lists and the child index cache are stale.
    Structure,
    /// Perspective matrix is stale.
    Perspective,
    /// Cached transform matrix is stale.
    Transform,
    /// Clip region is stale.
    Clip,
    /// Render-order child list is stale.
    StackingContext,
    /// Paint batches are stale.
    Background,
    /// The animation list needs reconciling or an animation is running.
    Animation,
    /// A transition is running.
    Transition,
}

impl Axis {
    /// Recompute axes in processing order.
    pub const ORDERED: [Self; 7] = [
        Self::Definition,
        Self::Structure,
        Self::Perspective,
        Self::Transform,
        Self::Clip,
        Self::StackingContext,
        Self::Background,
    ];

    /// Every axis.
    pub const ALL: [Self; 9] = [
        Self::Definition,
        Self::Structure,
        Self::Perspective,
        Self::Transform,
        Self::Clip,
        Self::StackingContext,
        Self::Background,
        Self::Animation,
        Self::Transition,
    ];

    /// The tracking channel for this axis.
    #[must_use]
    pub const fn channel(self) -> Channel {
        match self {
            Self::Definition => Channel::new(0),
            Self::Structure => Channel::new(1),
            Self::Perspective => Channel::new(2),
            Self::Transform => Channel::new(3),
            Self::Clip => Channel::new(4),
            Self::StackingContext => Channel::new(5),
            Self::Background => Channel::new(6),
            Self::Animation => Channel::new(7),
            Self::Transition => Channel::new(8),
        }
    }

    /// Position in [`Axis::ORDERED`], or `None` for time axes.
    #[must_use]
    pub const fn order(self) -> Option<usize> {
        match self {
            Self::Animation | Self::Transition => None,
            _ => Some(self as usize),
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Structure => "structure",
            Self::Perspective => "perspective",
            Self::Transform => "transform",
            Self::Clip => "clip",
            Self::StackingContext => "stacking-context",
            Self::Background => "background",
            Self::Animation => "animation",
            Self::Transition => "transition",
        }
    }

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`Axis`] values.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirtyAxes(u16);

impl DirtyAxes {
    /// No axes.
    pub const EMPTY: Self = Self(0);
    /// See [`Axis::Definition`].
    pub const DEFINITION: Self = Self(Axis::Definition.bit());
    /// See [`Axis::Structure`].
    pub const STRUCTURE: Self = Self(Axis::Structure.bit());
    /// See [`Axis::Perspective`].
    pub const PERSPECTIVE: Self = Self(Axis::Perspective.bit());
    /// See [`Axis::Transform`].
    pub const TRANSFORM: Self = Self(Axis::Transform.bit());
    /// See [`Axis::Clip`].
    pub const CLIP: Self = Self(Axis::Clip.bit());
    /// See [`Axis::StackingContext`].
    pub const STACKING_CONTEXT: Self = Self(Axis::StackingContext.bit());
    /// See [`Axis::Background`].
    pub const BACKGROUND: Self = Self(Axis::Background.bit());
    /// See [`Axis::Animation`].
    pub const ANIMATION: Self = Self(Axis::Animation.bit());
    /// See [`Axis::Transition`].
    pub const TRANSITION: Self = Self(Axis::Transition.bit());
    /// Every recompute axis.
    pub const RECOMPUTE: Self = Self(0b111_1111);

    /// Union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether every axis of `other` is in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether `axis` is in the set.
    #[must_use]
    pub const fn has(self, axis: Axis) -> bool {
        self.0 & axis.bit() != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Adds an axis.
    pub fn insert(&mut self, axis: Axis) {
        self.0 |= axis.bit();
    }

    /// Removes an axis.
    pub fn remove(&mut self, axis: Axis) {
        self.0 &= !axis.bit();
    }

    /// Iterates the axes in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Axis> {
        Axis::ALL.into_iter().filter(move |a| self.has(*a))
    }
}

impl From<Axis> for DirtyAxes {
    fn from(axis: Axis) -> Self {
        Self(axis.bit())
    }
}

impl core::ops::BitOr for DirtyAxes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl core::ops::BitOrAssign for DirtyAxes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for DirtyAxes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_axes_match_their_order_index() {
        for (i, axis) in Axis::ORDERED.into_iter().enumerate() {
            assert_eq!(axis.order(), Some(i), "{axis}");
        }
        assert_eq!(Axis::Animation.order(), None);
    }

    #[test]
    fn recompute_covers_exactly_the_ordered_axes() {
        let mut all = DirtyAxes::EMPTY;
        for axis in Axis::ORDERED {
            all.insert(axis);
        }
        assert_eq!(all, DirtyAxes::RECOMPUTE);
        assert!(!DirtyAxes::RECOMPUTE.has(Axis::Transition));
    }

    #[test]
    fn insert_remove_and_iterate() {
        let mut set = DirtyAxes::TRANSFORM | DirtyAxes::BACKGROUND;
        assert!(set.has(Axis::Transform));
        set.remove(Axis::Transform);
        assert_eq!(set.iter().collect::<alloc::vec::Vec<_>>(), [Axis::Background]);
        assert!(set.contains(DirtyAxes::BACKGROUND));
        assert!(!set.contains(DirtyAxes::BACKGROUND | DirtyAxes::CLIP));
    }
}
