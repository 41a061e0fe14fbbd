// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fixed property identifier table.

use alloc::string::ToString;
use core::fmt;

use super::color::Color;
use super::float::{PropertyFloat, Unit};
use super::keyword::Keyword;
use super::lists::{AnimationList, TransitionList};
use super::transform::Transform;
use super::{Category, PropertyValue};
use crate::dirty::DirtyAxes;
use crate::error::StyleError;

/// Static metadata for one [`PropertyId`].
#[derive(Clone, Copy, Debug)]
pub struct PropertyInfo {
    /// CSS name.
    pub name: &'static str,
    /// Declared value category.
    pub category: Category,
    /// Whether an unset value inherits from the parent.
    pub inherited: bool,
    /// Axes dirtied on the element when the resolved value changes.
    pub axes: DirtyAxes,
    /// Whether a change needs the external layout solver.
    pub affects_layout: bool,
    /// Keywords accepted. For keyword ids this is the whole value space;
    /// for other categories it lists extra keywords such as `auto`.
    pub keywords: &'static [Keyword],
}

const NO_KEYWORDS: &[Keyword] = &[];
const AUTO: &[Keyword] = &[Keyword::Auto];
const NONE: &[Keyword] = &[Keyword::None];
const DISPLAY: &[Keyword] = &[Keyword::None, Keyword::Block, Keyword::Inline, Keyword::Flex];
const POSITION: &[Keyword] = &[Keyword::Static, Keyword::Relative, Keyword::Absolute];
const VISIBILITY: &[Keyword] = &[Keyword::Visible, Keyword::Hidden];
const OVERFLOW: &[Keyword] = &[
    Keyword::Visible,
    Keyword::Hidden,
    Keyword::Scroll,
    Keyword::Auto,
];
const TEXT_ALIGN: &[Keyword] = &[
    Keyword::Left,
    Keyword::Center,
    Keyword::Right,
    Keyword::Justify,
];
const POINTER_EVENTS: &[Keyword] = &[Keyword::Auto, Keyword::None];

macro_rules! property_ids {
    ($($(#[$doc:meta])* $variant:ident = $name:literal,)*) => {
        /// A style property identifier.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum PropertyId {
            $($(#[$doc])* $variant,)*
        }

        impl PropertyId {
            /// Every id, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// The CSS name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }
    };
}

property_ids! {
    /// `display`
    Display = "display",
    /// `position`
    Position = "position",
    /// `left`
    Left = "left",
    /// `top`
    Top = "top",
    /// `width`
    Width = "width",
    /// `height`
    Height = "height",
    /// `z-index`
    ZIndex = "z-index",
    /// `opacity`
    Opacity = "opacity",
    /// `visibility`
    Visibility = "visibility",
    /// `color`
    Color = "color",
    /// `background-color`
    BackgroundColor = "background-color",
    /// `background-image`
    BackgroundImage = "background-image",
    /// `border-top-width`
    BorderTopWidth = "border-top-width",
    /// `border-right-width`
    BorderRightWidth = "border-right-width",
    /// `border-bottom-width`
    BorderBottomWidth = "border-bottom-width",
    /// `border-left-width`
    BorderLeftWidth = "border-left-width",
    /// `border-color`
    BorderColor = "border-color",
    /// `border-radius`
    BorderRadius = "border-radius",
    /// `overflow`
    Overflow = "overflow",
    /// `transform`
    Transform = "transform",
    /// `transform-origin-x`
    TransformOriginX = "transform-origin-x",
    /// `transform-origin-y`
    TransformOriginY = "transform-origin-y",
    /// `transform-origin-z`
    TransformOriginZ = "transform-origin-z",
    /// `perspective`
    Perspective = "perspective",
    /// `perspective-origin-x`
    PerspectiveOriginX = "perspective-origin-x",
    /// `perspective-origin-y`
    PerspectiveOriginY = "perspective-origin-y",
    /// `font-size`
    FontSize = "font-size",
    /// `font-family`
    FontFamily = "font-family",
    /// `line-height`
    LineHeight = "line-height",
    /// `text-align`
    TextAlign = "text-align",
    /// `pointer-events`
    PointerEvents = "pointer-events",
    /// `transition`
    Transition = "transition",
    /// `animation`
    Animation = "animation",
}

impl PropertyId {
    /// Looks up an id by CSS name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(name))
    }

    /// Static metadata for this id.
    #[must_use]
    pub const fn info(self) -> PropertyInfo {
        use Category as C;
        const T: DirtyAxes = DirtyAxes::TRANSFORM;
        const S: DirtyAxes = DirtyAxes::STRUCTURE;
        const P: DirtyAxes = DirtyAxes::PERSPECTIVE;
        const K: DirtyAxes = DirtyAxes::CLIP;
        const B: DirtyAxes = DirtyAxes::BACKGROUND;
        const X: DirtyAxes = DirtyAxes::EMPTY;
        let (category, inherited, axes, affects_layout, keywords) = match self {
            Self::Display => (C::Keyword, false, S, true, DISPLAY),
            Self::Position => (C::Keyword, false, T, true, POSITION),
            Self::Left | Self::Top => (C::Float, false, T.union(S), true, AUTO),
            Self::Width | Self::Height => (C::Float, false, K.union(B), true, AUTO),
            Self::ZIndex => (C::Float, false, X, false, AUTO),
            Self::Opacity => (C::Float, false, B, false, NO_KEYWORDS),
            Self::Visibility => (C::Keyword, true, B, false, VISIBILITY),
            Self::Color => (C::Color, true, B, false, NO_KEYWORDS),
            Self::BackgroundColor | Self::BorderColor => (C::Color, false, B, false, NO_KEYWORDS),
            Self::BackgroundImage => (C::String, false, B, false, NONE),
            Self::BorderTopWidth
            | Self::BorderRightWidth
            | Self::BorderBottomWidth
            | Self::BorderLeftWidth => (C::Float, false, B.union(K), true, NO_KEYWORDS),
            Self::BorderRadius => (C::Float, false, B.union(K), false, NO_KEYWORDS),
            Self::Overflow => (C::Keyword, false, K, true, OVERFLOW),
            Self::Transform
            | Self::TransformOriginX
            | Self::TransformOriginY
            | Self::TransformOriginZ => {
                let category = if matches!(self, Self::Transform) {
                    C::Transform
                } else {
                    C::Float
                };
                (category, false, T, false, NO_KEYWORDS)
            }
            Self::Perspective => (C::Float, false, P, false, NONE),
            Self::PerspectiveOriginX | Self::PerspectiveOriginY => {
                (C::Float, false, P, false, NO_KEYWORDS)
            }
            Self::FontSize | Self::LineHeight => (C::Float, true, B, true, NO_KEYWORDS),
            Self::FontFamily => (C::String, true, B, true, NO_KEYWORDS),
            Self::TextAlign => (C::Keyword, true, X, true, TEXT_ALIGN),
            Self::PointerEvents => (C::Keyword, true, X, false, POINTER_EVENTS),
            Self::Transition => (C::Transitions, false, X, false, NO_KEYWORDS),
            Self::Animation => (C::Animations, false, DirtyAxes::ANIMATION, false, NO_KEYWORDS),
        };
        PropertyInfo {
            name: self.name(),
            category,
            inherited,
            axes,
            affects_layout,
            keywords,
        }
    }

    /// Declared value category.
    #[must_use]
    pub const fn category(self) -> Category {
        self.info().category
    }

    /// Whether an unset value inherits.
    #[must_use]
    pub const fn inherited(self) -> bool {
        self.info().inherited
    }

    /// Axes dirtied on the element itself.
    #[must_use]
    pub const fn axes(self) -> DirtyAxes {
        self.info().axes
    }

    /// Whether a change needs layout.
    #[must_use]
    pub const fn affects_layout(self) -> bool {
        self.info().affects_layout
    }

    /// Accepted keywords; see [`PropertyInfo::keywords`].
    #[must_use]
    pub const fn keywords(self) -> &'static [Keyword] {
        self.info().keywords
    }

    /// Whether `value` belongs to this id's value space.
    #[must_use]
    pub fn accepts(self, value: &PropertyValue) -> bool {
        match value {
            PropertyValue::Keyword(k) => self.keywords().contains(k),
            other => other.category() == self.category(),
        }
    }

    /// Like [`accepts`](Self::accepts), naming the reason on rejection.
    ///
    /// # Errors
    ///
    /// [`StyleError::CategoryMismatch`] when `value` has the wrong category,
    /// [`StyleError::InvalidValue`] when it has the right category but is
    /// outside the value space.
    pub fn check(self, value: &PropertyValue) -> Result<(), StyleError> {
        if self.accepts(value) {
            return Ok(());
        }
        let keyword_space = matches!(value, PropertyValue::Keyword(_)) && !self.keywords().is_empty();
        if value.category() == self.category() || keyword_space {
            Err(StyleError::InvalidValue {
                property: self,
                value: value.to_string(),
            })
        } else {
            Err(StyleError::CategoryMismatch {
                property: self,
                expected: self.category(),
                found: value.category(),
            })
        }
    }

    /// The value used when no layer and no ancestor supplies one.
    #[must_use]
    pub fn initial_value(self) -> PropertyValue {
        use PropertyValue as V;
        match self {
            Self::Display => V::Keyword(Keyword::Block),
            Self::Position => V::Keyword(Keyword::Static),
            Self::Left | Self::Top | Self::Width | Self::Height | Self::ZIndex => {
                V::Keyword(Keyword::Auto)
            }
            Self::Opacity => V::Float(PropertyFloat::number(1.0)),
            Self::Visibility | Self::Overflow => V::Keyword(Keyword::Visible),
            Self::Color | Self::BorderColor => V::Color(Color::BLACK),
            Self::BackgroundColor => V::Color(Color::TRANSPARENT),
            Self::BackgroundImage | Self::Perspective => V::Keyword(Keyword::None),
            Self::BorderTopWidth
            | Self::BorderRightWidth
            | Self::BorderBottomWidth
            | Self::BorderLeftWidth
            | Self::BorderRadius
            | Self::TransformOriginZ => V::Float(PropertyFloat::px(0.0)),
            Self::Transform => V::Transform(Transform::none()),
            Self::TransformOriginX
            | Self::TransformOriginY
            | Self::PerspectiveOriginX
            | Self::PerspectiveOriginY => V::Float(PropertyFloat::percent(50.0)),
            Self::FontSize => V::Float(PropertyFloat::px(16.0)),
            Self::LineHeight => V::Float(PropertyFloat::new(1.2, Unit::Number)),
            Self::FontFamily => V::String(alloc::string::String::new()),
            Self::TextAlign => V::Keyword(Keyword::Left),
            Self::PointerEvents => V::Keyword(Keyword::Auto),
            Self::Transition => V::Transitions(TransitionList::None),
            Self::Animation => V::Animations(AnimationList::default()),
        }
    }

    const fn bit(self) -> u64 {
        1 << self as u8
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`PropertyId`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PropertyIdSet(u64);

impl PropertyIdSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Every id.
    #[must_use]
    pub fn all() -> Self {
        PropertyId::ALL.iter().copied().collect()
    }

    /// Returns a copy with `id` added.
    #[must_use]
    pub const fn with(self, id: PropertyId) -> Self {
        Self(self.0 | id.bit())
    }

    /// Adds an id; returns whether it was newly inserted.
    pub fn insert(&mut self, id: PropertyId) -> bool {
        let fresh = !self.contains(id);
        self.0 |= id.bit();
        fresh
    }

    /// Removes an id.
    pub fn remove(&mut self, id: PropertyId) {
        self.0 &= !id.bit();
    }

    /// Whether `id` is present.
    #[must_use]
    pub const fn contains(self, id: PropertyId) -> bool {
        self.0 & id.bit() != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of ids in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Iterates in declaration order.
    pub fn iter(self) -> impl Iterator<Item = PropertyId> {
        PropertyId::ALL
            .iter()
            .copied()
            .filter(move |id| self.contains(*id))
    }
}

impl FromIterator<PropertyId> for PropertyIdSet {
    fn from_iter<I: IntoIterator<Item = PropertyId>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        set.extend(iter);
        set
    }
}

impl Extend<PropertyId> for PropertyIdSet {
    fn extend<I: IntoIterator<Item = PropertyId>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl fmt::Debug for PropertyIdSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
