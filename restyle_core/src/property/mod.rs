// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The property value model.
//!
//! A [`PropertyValue`] is a closed tagged union over the value
//! [`Category`]s. Every operation on values (rendering, interpolation,
//! interpolability) is an exhaustive `match`, so adding a category is a
//! compile error everywhere it needs handling.
//!
//! # Interpolation
//!
//! [`PropertyValue::interpolate`] never fails. Continuous categories
//! ([`Float`](Category::Float), [`Color`](Category::Color) and
//! [`Transform`](Category::Transform)) blend when their payloads are
//! compatible. Everything else uses the *discrete fallback*: the start value
//! below `alpha = 0.5`, the end value from `0.5` on.

mod color;
mod easing;
mod float;
mod id;
mod keyword;
mod lists;
pub(crate) mod parse;
mod transform;

use alloc::string::String;
use core::fmt;

use kurbo::Size;

pub use color::Color;
pub use easing::{Easing, StepPosition};
pub use float::{PropertyFloat, ResolveContext, Unit};
pub use id::{PropertyId, PropertyIdSet, PropertyInfo};
pub use keyword::Keyword;
pub use lists::{AnimationList, AnimationSpec, Iterations, TransitionList, TransitionSpec};
pub use parse::parse_value;
pub use transform::{Transform, TransformFunction};

/// The category of a [`PropertyValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// An enumerated token.
    Keyword,
    /// A number with a unit.
    Float,
    /// An RGBA color.
    Color,
    /// Free text.
    String,
    /// A transform function list.
    Transform,
    /// A `transition` list.
    Transitions,
    /// An `animation` list.
    Animations,
}

impl Category {
    /// Every category.
    pub const ALL: [Self; 7] = [
        Self::Keyword,
        Self::Float,
        Self::Color,
        Self::String,
        Self::Transform,
        Self::Transitions,
        Self::Animations,
    ];

    /// Whether values of this category can blend.
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        match self {
            Self::Float | Self::Color | Self::Transform => true,
            Self::Keyword | Self::String | Self::Transitions | Self::Animations => false,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Float => "float",
            Self::Color => "color",
            Self::String => "string",
            Self::Transform => "transform",
            Self::Transitions => "transition list",
            Self::Animations => "animation list",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element state that decides whether a value may interpolate.
#[derive(Clone, Copy, Debug, Default)]
pub struct InterpolateContext<'a> {
    /// The element's border box size, the reference for percentages.
    pub reference_box: Size,
    /// The element's currently resolved transform, if any.
    pub current_transform: Option<&'a Transform>,
}

/// A style property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// See [`Category::Keyword`].
    Keyword(Keyword),
    /// See [`Category::Float`].
    Float(PropertyFloat),
    /// See [`Category::Color`].
    Color(Color),
    /// See [`Category::String`].
    String(String),
    /// See [`Category::Transform`].
    Transform(Transform),
    /// See [`Category::Transitions`].
    Transitions(TransitionList),
    /// See [`Category::Animations`].
    Animations(AnimationList),
}

impl PropertyValue {
    /// The value's category.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Keyword(_) => Category::Keyword,
            Self::Float(_) => Category::Float,
            Self::Color(_) => Category::Color,
            Self::String(_) => Category::String,
            Self::Transform(_) => Category::Transform,
            Self::Transitions(_) => Category::Transitions,
            Self::Animations(_) => Category::Animations,
        }
    }

    /// Blends `self → other` at `alpha`.
    ///
    /// Falls back to a discrete pick when the categories differ, the category
    /// is not continuous, or the payloads are incompatible (mismatched units or
    /// transform layouts).
    #[must_use]
    pub fn interpolate(&self, other: &Self, alpha: f32) -> Self {
        if self == other {
            return self.clone();
        }
        let blended = match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.interpolate(*b, alpha).map(Self::Float),
            (Self::Color(a), Self::Color(b)) => Some(Self::Color(a.interpolate(*b, alpha))),
            (Self::Transform(a), Self::Transform(b)) => {
                a.interpolate(b, alpha).map(Self::Transform)
            }
            (Self::Keyword(_), _)
            | (Self::Float(_), _)
            | (Self::Color(_), _)
            | (Self::String(_), _)
            | (Self::Transform(_), _)
            | (Self::Transitions(_), _)
            | (Self::Animations(_), _) => None,
        };
        blended.unwrap_or_else(|| self.discrete(other, alpha).clone())
    }

    /// The discrete fallback pick.
    #[must_use]
    pub fn discrete<'a>(&'a self, other: &'a Self, alpha: f32) -> &'a Self {
        if alpha < 0.5 { self } else { other }
    }

    /// Whether this value can be the target of a blended animation or
    /// transition on an element in state `ctx`.
    #[must_use]
    pub fn allow_interpolate(&self, ctx: &InterpolateContext<'_>) -> bool {
        match self {
            Self::Keyword(_) | Self::String(_) | Self::Transitions(_) | Self::Animations(_) => {
                false
            }
            Self::Float(_) | Self::Color(_) => true,
            Self::Transform(t) => {
                t.is_resolvable(ctx.reference_box)
                    && ctx
                        .current_transform
                        .is_none_or(|current| current.is_compatible(t))
            }
        }
    }

    /// Whether `self → other` produces intermediate values on an element in
    /// state `ctx`, rather than a discrete pick.
    #[must_use]
    pub fn blends_with(&self, other: &Self, ctx: &InterpolateContext<'_>) -> bool {
        let compatible = match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.unit == b.unit,
            (Self::Color(_), Self::Color(_)) => true,
            (Self::Transform(a), Self::Transform(b)) => a.is_compatible(b),
            _ => false,
        };
        compatible && self.allow_interpolate(ctx) && other.allow_interpolate(ctx)
    }

    /// The keyword payload, if any.
    #[must_use]
    pub fn as_keyword(&self) -> Option<Keyword> {
        match self {
            Self::Keyword(k) => Some(*k),
            _ => None,
        }
    }

    /// The float payload, if any.
    #[must_use]
    pub fn as_float(&self) -> Option<PropertyFloat> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The color payload, if any.
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// The string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The transform payload, if any.
    #[must_use]
    pub fn as_transform(&self) -> Option<&Transform> {
        match self {
            Self::Transform(t) => Some(t),
            _ => None,
        }
    }

    /// The transition list payload, if any.
    #[must_use]
    pub fn as_transitions(&self) -> Option<&TransitionList> {
        match self {
            Self::Transitions(t) => Some(t),
            _ => None,
        }
    }

    /// The animation list payload, if any.
    #[must_use]
    pub fn as_animations(&self) -> Option<&AnimationList> {
        match self {
            Self::Animations(a) => Some(a),
            _ => None,
        }
    }

    /// Whether this is a float in `em`.
    #[must_use]
    pub fn is_em_relative(&self) -> bool {
        matches!(self, Self::Float(f) if f.unit == Unit::Em)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(k) => write!(f, "{k}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Color(c) => write!(f, "{c}"),
            Self::String(s) => f.write_str(s),
            Self::Transform(t) => write!(f, "{t}"),
            Self::Transitions(t) => write!(f, "{t}"),
            Self::Animations(a) => write!(f, "{a}"),
        }
    }
}

impl From<Keyword> for PropertyValue {
    fn from(k: Keyword) -> Self {
        Self::Keyword(k)
    }
}

impl From<PropertyFloat> for PropertyValue {
    fn from(v: PropertyFloat) -> Self {
        Self::Float(v)
    }
}

impl From<Color> for PropertyValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

impl From<Transform> for PropertyValue {
    fn from(t: Transform) -> Self {
        Self::Transform(t)
    }
}

impl From<TransitionList> for PropertyValue {
    fn from(t: TransitionList) -> Self {
        Self::Transitions(t)
    }
}

impl From<AnimationList> for PropertyValue {
    fn from(a: AnimationList) -> Self {
        Self::Animations(a)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    /// Two distinct sample values per category. The `match` keeps this list
    /// in step with [`Category`].
    fn samples(category: Category) -> (PropertyValue, PropertyValue) {
        match category {
            Category::Keyword => (Keyword::Visible.into(), Keyword::Hidden.into()),
            Category::Float => (PropertyFloat::px(0.0).into(), PropertyFloat::px(10.0).into()),
            Category::Color => (Color::BLACK.into(), Color::WHITE.into()),
            Category::String => (
                PropertyValue::String("a.png".to_string()),
                PropertyValue::String("b.png".to_string()),
            ),
            Category::Transform => (
                Transform::new(vec![TransformFunction::Rotate(PropertyFloat::deg(0.0))]).into(),
                Transform::new(vec![TransformFunction::Rotate(PropertyFloat::deg(90.0))]).into(),
            ),
            Category::Transitions => (
                TransitionList::None.into(),
                TransitionList::All(TransitionSpec::new(None, 1.0, Easing::Linear)).into(),
            ),
            Category::Animations => (
                AnimationList::default().into(),
                AnimationList(vec![AnimationSpec::new("pulse", 1.0)]).into(),
            ),
        }
    }

    const ALPHAS: [f32; 7] = [0.0, 0.1, 0.49, 0.5, 0.51, 0.9, 1.0];

    #[test]
    fn interpolating_a_value_with_itself_is_identity() {
        for category in Category::ALL {
            let (a, b) = samples(category);
            for alpha in ALPHAS {
                assert_eq!(a.interpolate(&a, alpha), a, "{category} at {alpha}");
                assert_eq!(b.interpolate(&b, alpha), b, "{category} at {alpha}");
            }
        }
    }

    #[test]
    fn continuous_categories_hit_both_endpoints() {
        for category in Category::ALL.into_iter().filter(|c| c.is_continuous()) {
            let (a, b) = samples(category);
            assert_eq!(a.interpolate(&b, 0.0), a, "{category}");
            assert_eq!(a.interpolate(&b, 1.0), b, "{category}");
        }
    }

    #[test]
    fn discrete_categories_switch_at_one_half() {
        for category in Category::ALL.into_iter().filter(|c| !c.is_continuous()) {
            let (a, b) = samples(category);
            for alpha in ALPHAS {
                let expected = if alpha < 0.5 { &a } else { &b };
                assert_eq!(&a.interpolate(&b, alpha), expected, "{category} at {alpha}");
            }
        }
    }

    #[test]
    fn mismatched_categories_use_discrete_fallback() {
        let all: Vec<_> = Category::ALL.into_iter().map(|c| samples(c).0).collect();
        for a in &all {
            for b in all.iter().filter(|b| b.category() != a.category()) {
                assert_eq!(&a.interpolate(b, 0.3), a);
                assert_eq!(&a.interpolate(b, 0.5), b);
            }
        }
    }

    #[test]
    fn mismatched_units_use_discrete_fallback() {
        let a = PropertyValue::Float(PropertyFloat::px(10.0));
        let b = PropertyValue::Float(PropertyFloat::percent(50.0));
        assert_eq!(a.interpolate(&b, 0.25), a);
        assert_eq!(a.interpolate(&b, 0.75), b);
    }

    #[test]
    fn float_and_color_blend() {
        let (a, b) = samples(Category::Float);
        assert_eq!(a.interpolate(&b, 0.5), PropertyValue::from(PropertyFloat::px(5.0)));
        let (a, b) = samples(Category::Color);
        assert_eq!(
            a.interpolate(&b, 0.5),
            PropertyValue::from(Color::rgba(128, 128, 128, 255))
        );
    }

    #[test]
    fn allow_interpolate_by_category() {
        let ctx = InterpolateContext::default();
        for category in Category::ALL {
            let (a, _) = samples(category);
            let expected = category.is_continuous();
            assert_eq!(a.allow_interpolate(&ctx), expected, "{category}");
        }
    }

    #[test]
    fn transform_interpolability_depends_on_context() {
        let percent: PropertyValue = Transform::new(vec![TransformFunction::TranslateX(
            PropertyFloat::percent(50.0),
        )])
        .into();
        assert!(!percent.allow_interpolate(&InterpolateContext::default()));
        let sized = InterpolateContext {
            reference_box: Size::new(100.0, 100.0),
            current_transform: None,
        };
        assert!(percent.allow_interpolate(&sized));

        let current = Transform::new(vec![TransformFunction::ScaleX(PropertyFloat::number(2.0))]);
        let incompatible = InterpolateContext {
            current_transform: Some(&current),
            ..sized
        };
        assert!(!percent.allow_interpolate(&incompatible));
    }

    #[test]
    fn blending_needs_both_sides() {
        let ctx = InterpolateContext::default();
        let auto = PropertyValue::from(Keyword::Auto);
        let px = PropertyValue::from(PropertyFloat::px(100.0));
        assert!(!auto.blends_with(&px, &ctx));
        assert!(!px.blends_with(&auto, &ctx));
        assert!(!px.blends_with(&PropertyFloat::percent(50.0).into(), &ctx));
        assert!(px.blends_with(&PropertyFloat::px(0.0).into(), &ctx));
        assert!(PropertyValue::from(Color::WHITE).blends_with(&Color::BLACK.into(), &ctx));
    }

    #[test]
    fn display_is_category_specific() {
        assert_eq!(PropertyValue::from(Keyword::Hidden).to_string(), "hidden");
        assert_eq!(PropertyValue::from(PropertyFloat::px(3.0)).to_string(), "3px");
        assert_eq!(PropertyValue::from(Color::WHITE).to_string(), "#ffffff");
        assert_eq!(PropertyValue::from(Transform::none()).to_string(), "none");
    }
}
