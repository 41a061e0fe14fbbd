// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity types.

use core::fmt;

/// Sentinel value indicating "no node" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a node in a [`Document`](super::Document).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a node is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    /// Slot index into the document's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the document's generation for this slot.
    pub(crate) generation: u32,
}

impl ElementId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}@gen{})", self.idx, self.generation)
    }
}

/// What a slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A styled element.
    Element,
    /// A text run. Text nodes carry no style of their own.
    Text,
}

/// A dynamic pseudo class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    /// `:hover`
    Hover,
    /// `:active`
    Active,
    /// `:focus`
    Focus,
    /// `:disabled`
    Disabled,
    /// `:checked`
    Checked,
}

impl PseudoClass {
    /// Every pseudo class.
    pub const ALL: [Self; 5] = [
        Self::Hover,
        Self::Active,
        Self::Focus,
        Self::Disabled,
        Self::Checked,
    ];

    /// Name without the leading colon.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Active => "active",
            Self::Focus => "focus",
            Self::Disabled => "disabled",
            Self::Checked => "checked",
        }
    }
}

/// A set of [`PseudoClass`]es.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PseudoClassSet(u8);

impl PseudoClassSet {
    /// Whether `pc` is set.
    #[must_use]
    pub const fn contains(self, pc: PseudoClass) -> bool {
        self.0 & (1 << pc as u8) != 0
    }

    /// Sets or clears `pc`; returns whether the set changed.
    pub fn set(&mut self, pc: PseudoClass, on: bool) -> bool {
        let before = self.0;
        if on {
            self.0 |= 1 << pc as u8;
        } else {
            self.0 &= !(1 << pc as u8);
        }
        before != self.0
    }

    /// Iterates the active pseudo classes.
    pub fn iter(self) -> impl Iterator<Item = PseudoClass> {
        PseudoClass::ALL
            .into_iter()
            .filter(move |pc| self.contains(*pc))
    }
}

impl fmt::Debug for PseudoClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
