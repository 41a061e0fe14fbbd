// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform function lists.
//!
//! A [`Transform`] is an ordered list of [`TransformFunction`]s. Two lists
//! interpolate argument-by-argument when their *layouts* match: the same
//! function kinds in the same order, with pairwise-equal units. An empty list
//! (`none`) matches any layout by standing in for the identity list of the
//! other side's layout.

use alloc::vec::Vec;
use core::fmt;
use core::mem;

use kurbo::Size;

use super::float::{PropertyFloat, ResolveContext, Unit, lerp};
use crate::transform::Transform3d;

/// One function in a transform list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformFunction {
    /// `translate3d(x, y, z)`; percentages refer to the reference box.
    Translate(PropertyFloat, PropertyFloat, PropertyFloat),
    /// `translateX(x)`.
    TranslateX(PropertyFloat),
    /// `translateY(y)`.
    TranslateY(PropertyFloat),
    /// `translateZ(z)`.
    TranslateZ(PropertyFloat),
    /// `scale3d(x, y, z)`.
    Scale(PropertyFloat, PropertyFloat, PropertyFloat),
    /// `scaleX(x)`.
    ScaleX(PropertyFloat),
    /// `scaleY(y)`.
    ScaleY(PropertyFloat),
    /// `rotate(angle)` about the z axis.
    Rotate(PropertyFloat),
    /// `rotateX(angle)`.
    RotateX(PropertyFloat),
    /// `rotateY(angle)`.
    RotateY(PropertyFloat),
    /// `skew(ax, ay)`.
    Skew(PropertyFloat, PropertyFloat),
    /// `perspective(d)`; a non-positive distance is the identity.
    Perspective(PropertyFloat),
    /// `matrix(a, b, c, d, e, f)`.
    Matrix([f32; 6]),
    /// `matrix3d(...)` in column-major order.
    Matrix3d([f32; 16]),
}

impl TransformFunction {
    /// The CSS function name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Translate(..) => "translate3d",
            Self::TranslateX(_) => "translateX",
            Self::TranslateY(_) => "translateY",
            Self::TranslateZ(_) => "translateZ",
            Self::Scale(..) => "scale3d",
            Self::ScaleX(_) => "scaleX",
            Self::ScaleY(_) => "scaleY",
            Self::Rotate(_) => "rotate",
            Self::RotateX(_) => "rotateX",
            Self::RotateY(_) => "rotateY",
            Self::Skew(..) => "skew",
            Self::Perspective(_) => "perspective",
            Self::Matrix(_) => "matrix",
            Self::Matrix3d(_) => "matrix3d",
        }
    }

    /// The unit-carrying arguments, in order. Matrix entries are not listed.
    fn args(&self) -> Vec<PropertyFloat> {
        match *self {
            Self::Translate(x, y, z) | Self::Scale(x, y, z) => alloc::vec![x, y, z],
            Self::Skew(x, y) => alloc::vec![x, y],
            Self::TranslateX(v)
            | Self::TranslateY(v)
            | Self::TranslateZ(v)
            | Self::ScaleX(v)
            | Self::ScaleY(v)
            | Self::Rotate(v)
            | Self::RotateX(v)
            | Self::RotateY(v)
            | Self::Perspective(v) => alloc::vec![v],
            Self::Matrix(_) | Self::Matrix3d(_) => Vec::new(),
        }
    }

    /// Whether `self` and `other` are the same kind with matching units.
    #[must_use]
    pub fn same_layout(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
            && self
                .args()
                .iter()
                .zip(other.args())
                .all(|(a, b)| a.unit == b.unit)
    }

    /// The identity function with this function's layout.
    #[must_use]
    pub fn identity(&self) -> Self {
        let zero = |v: PropertyFloat| PropertyFloat::new(0.0, v.unit);
        let one = |v: PropertyFloat| PropertyFloat::new(1.0, v.unit);
        match *self {
            Self::Translate(x, y, z) => Self::Translate(zero(x), zero(y), zero(z)),
            Self::TranslateX(v) => Self::TranslateX(zero(v)),
            Self::TranslateY(v) => Self::TranslateY(zero(v)),
            Self::TranslateZ(v) => Self::TranslateZ(zero(v)),
            Self::Scale(x, y, z) => Self::Scale(one(x), one(y), one(z)),
            Self::ScaleX(v) => Self::ScaleX(one(v)),
            Self::ScaleY(v) => Self::ScaleY(one(v)),
            Self::Rotate(v) => Self::Rotate(zero(v)),
            Self::RotateX(v) => Self::RotateX(zero(v)),
            Self::RotateY(v) => Self::RotateY(zero(v)),
            Self::Skew(x, y) => Self::Skew(zero(x), zero(y)),
            Self::Perspective(v) => Self::Perspective(zero(v)),
            Self::Matrix(_) => Self::Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
            Self::Matrix3d(_) => {
                let mut m = [0.0; 16];
                for i in 0..4 {
                    m[i * 5] = 1.0;
                }
                Self::Matrix3d(m)
            }
        }
    }

    /// Argument-wise interpolation; `None` unless the layouts match.
    #[must_use]
    pub fn interpolate(&self, other: &Self, alpha: f32) -> Option<Self> {
        if !self.same_layout(other) {
            return None;
        }
        let f = |a: PropertyFloat, b: PropertyFloat| a.interpolate(b, alpha);
        let out = match (*self, *other) {
            (Self::Translate(ax, ay, az), Self::Translate(bx, by, bz)) => {
                Self::Translate(f(ax, bx)?, f(ay, by)?, f(az, bz)?)
            }
            (Self::Scale(ax, ay, az), Self::Scale(bx, by, bz)) => {
                Self::Scale(f(ax, bx)?, f(ay, by)?, f(az, bz)?)
            }
            (Self::Skew(ax, ay), Self::Skew(bx, by)) => Self::Skew(f(ax, bx)?, f(ay, by)?),
            (Self::TranslateX(a), Self::TranslateX(b)) => Self::TranslateX(f(a, b)?),
            (Self::TranslateY(a), Self::TranslateY(b)) => Self::TranslateY(f(a, b)?),
            (Self::TranslateZ(a), Self::TranslateZ(b)) => Self::TranslateZ(f(a, b)?),
            (Self::ScaleX(a), Self::ScaleX(b)) => Self::ScaleX(f(a, b)?),
            (Self::ScaleY(a), Self::ScaleY(b)) => Self::ScaleY(f(a, b)?),
            (Self::Rotate(a), Self::Rotate(b)) => Self::Rotate(f(a, b)?),
            (Self::RotateX(a), Self::RotateX(b)) => Self::RotateX(f(a, b)?),
            (Self::RotateY(a), Self::RotateY(b)) => Self::RotateY(f(a, b)?),
            (Self::Perspective(a), Self::Perspective(b)) => Self::Perspective(f(a, b)?),
            (Self::Matrix(a), Self::Matrix(b)) => {
                Self::Matrix(core::array::from_fn(|i| lerp(a[i], b[i], alpha)))
            }
            (Self::Matrix3d(a), Self::Matrix3d(b)) => {
                Self::Matrix3d(core::array::from_fn(|i| lerp(a[i], b[i], alpha)))
            }
            _ => return None,
        };
        Some(out)
    }

    /// Whether every argument can be resolved against `reference_box`.
    ///
    /// Percentages need a non-empty box; percentage depth never resolves.
    #[must_use]
    pub fn is_resolvable(&self, reference_box: Size) -> bool {
        let fits = |v: PropertyFloat, extent: f64| !v.needs_percent_base() || extent > 0.0;
        match *self {
            Self::Translate(x, y, z) => {
                fits(x, reference_box.width)
                    && fits(y, reference_box.height)
                    && !z.needs_percent_base()
            }
            Self::TranslateX(v) => fits(v, reference_box.width),
            Self::TranslateY(v) => fits(v, reference_box.height),
            Self::TranslateZ(v) | Self::Perspective(v) => !v.needs_percent_base(),
            Self::Matrix(m) => m.iter().all(|v| v.is_finite()),
            Self::Matrix3d(m) => m.iter().all(|v| v.is_finite()),
            _ => self.args().iter().all(|v| v.value.is_finite()),
        }
    }

    /// Resolves the function to a matrix.
    #[must_use]
    pub fn to_matrix(&self, ctx: &ResolveContext, reference_box: Size) -> Transform3d {
        let w = reference_box.width as f32;
        let h = reference_box.height as f32;
        let len = |v: PropertyFloat, base: f32| f64::from(v.resolve(ctx, base));
        // Scale factors are unitless; a percentage reads as a fraction.
        let factor = |v: PropertyFloat| {
            if v.unit == Unit::Percent {
                f64::from(v.value) / 100.0
            } else {
                f64::from(v.value)
            }
        };
        let angle = |v: PropertyFloat| {
            if v.unit.is_angle() {
                f64::from(v.resolve(ctx, 0.0))
            } else {
                f64::from(v.value).to_radians()
            }
        };
        match *self {
            Self::Translate(x, y, z) => {
                Transform3d::from_translation(len(x, w), len(y, h), len(z, 0.0))
            }
            Self::TranslateX(v) => Transform3d::from_translation(len(v, w), 0.0, 0.0),
            Self::TranslateY(v) => Transform3d::from_translation(0.0, len(v, h), 0.0),
            Self::TranslateZ(v) => Transform3d::from_translation(0.0, 0.0, len(v, 0.0)),
            Self::Scale(x, y, z) => Transform3d::from_scale(factor(x), factor(y), factor(z)),
            Self::ScaleX(v) => Transform3d::from_scale(factor(v), 1.0, 1.0),
            Self::ScaleY(v) => Transform3d::from_scale(1.0, factor(v), 1.0),
            Self::Rotate(v) => Transform3d::from_rotation_z(angle(v)),
            Self::RotateX(v) => Transform3d::from_rotation_x(angle(v)),
            Self::RotateY(v) => Transform3d::from_rotation_y(angle(v)),
            Self::Skew(x, y) => Transform3d::from_skew(angle(x), angle(y)),
            Self::Perspective(v) => Transform3d::from_perspective(len(v, 0.0)),
            Self::Matrix(m) => Transform3d::from_affine_2d(m.map(f64::from)),
            Self::Matrix3d(m) => Transform3d::from_cols_slice(&m.map(f64::from)),
        }
    }
}

impl fmt::Display for TransformFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        f.write_str("(")?;
        match self {
            Self::Matrix(m) => write_list(f, m.iter())?,
            Self::Matrix3d(m) => write_list(f, m.iter())?,
            _ => write_list(f, self.args().iter())?,
        }
        f.write_str(")")
    }
}

fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// An ordered transform function list. Empty means `none`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transform {
    functions: Vec<TransformFunction>,
}

impl Transform {
    /// The `none` transform.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            functions: Vec::new(),
        }
    }

    /// Creates a transform from a function list.
    #[must_use]
    pub fn new(functions: Vec<TransformFunction>) -> Self {
        Self { functions }
    }

    /// Whether this is `none`.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.functions.is_empty()
    }

    /// The function list.
    #[must_use]
    pub fn functions(&self) -> &[TransformFunction] {
        &self.functions
    }

    /// Whether the two lists can interpolate structurally.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        if self.is_none() || other.is_none() {
            return true;
        }
        self.functions.len() == other.functions.len()
            && self
                .functions
                .iter()
                .zip(&other.functions)
                .all(|(a, b)| a.same_layout(b))
    }

    /// Structural interpolation; `None` when the layouts differ.
    #[must_use]
    pub fn interpolate(&self, other: &Self, alpha: f32) -> Option<Self> {
        if !self.is_compatible(other) {
            return None;
        }
        // Endpoints are exact, even against `none`.
        if alpha <= 0.0 {
            return Some(self.clone());
        }
        if alpha >= 1.0 {
            return Some(other.clone());
        }
        let identity = |t: &Self| Self::new(t.functions.iter().map(|f| f.identity()).collect());
        let from;
        let to;
        let (a, b) = match (self.is_none(), other.is_none()) {
            (true, true) => return Some(Self::none()),
            (true, false) => {
                from = identity(other);
                (&from, other)
            }
            (false, true) => {
                to = identity(self);
                (self, &to)
            }
            (false, false) => (self, other),
        };
        let functions = a
            .functions
            .iter()
            .zip(&b.functions)
            .map(|(x, y)| x.interpolate(y, alpha))
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(functions))
    }

    /// Whether every function resolves against `reference_box`.
    #[must_use]
    pub fn is_resolvable(&self, reference_box: Size) -> bool {
        self.functions
            .iter()
            .all(|f| f.is_resolvable(reference_box))
    }

    /// Composes the list left to right into one matrix.
    #[must_use]
    pub fn to_matrix(&self, ctx: &ResolveContext, reference_box: Size) -> Transform3d {
        self.functions
            .iter()
            .fold(Transform3d::IDENTITY, |acc, f| {
                acc * f.to_matrix(ctx, reference_box)
            })
    }
}

impl From<Vec<TransformFunction>> for Transform {
    fn from(functions: Vec<TransformFunction>) -> Self {
        Self::new(functions)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("none");
        }
        for (i, func) in self.functions.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{func}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;
    use crate::property::PropertyValue;

    fn tx(v: f32) -> TransformFunction {
        TransformFunction::TranslateX(PropertyFloat::px(v))
    }

    #[test]
    fn display_lists_functions() {
        let t = Transform::new(vec![tx(10.0), TransformFunction::Rotate(PropertyFloat::deg(45.0))]);
        assert_eq!(t.to_string(), "translateX(10px) rotate(45deg)");
        assert_eq!(Transform::none().to_string(), "none");
    }

    #[test]
    fn same_layout_interpolates_per_argument() {
        let a = Transform::new(vec![tx(0.0)]);
        let b = Transform::new(vec![tx(100.0)]);
        let mid = a.interpolate(&b, 0.25).unwrap();
        assert_eq!(mid, Transform::new(vec![tx(25.0)]));
    }

    #[test]
    fn none_interpolates_against_identity_layout() {
        let b = Transform::new(vec![TransformFunction::ScaleX(PropertyFloat::number(3.0))]);
        let mid = Transform::none().interpolate(&b, 0.5).unwrap();
        assert_eq!(
            mid,
            Transform::new(vec![TransformFunction::ScaleX(PropertyFloat::number(2.0))])
        );
    }

    #[test]
    fn none_endpoints_are_exact() {
        let rotate = Transform::new(vec![TransformFunction::Rotate(PropertyFloat::deg(90.0))]);
        let none = Transform::none();
        assert_eq!(none.interpolate(&rotate, 0.0), Some(Transform::none()));
        assert_eq!(none.interpolate(&rotate, 1.0), Some(rotate.clone()));
        assert_eq!(rotate.interpolate(&none, 0.0), Some(rotate.clone()));
        assert_eq!(rotate.interpolate(&none, 1.0), Some(Transform::none()));

        let value = PropertyValue::from(Transform::none());
        assert_eq!(value.interpolate(&rotate.clone().into(), 0.0), value);
        assert_eq!(PropertyValue::from(rotate).interpolate(&value, 1.0), value);
    }

    #[test]
    fn mismatched_kinds_or_units_are_incompatible() {
        let a = Transform::new(vec![tx(0.0)]);
        let b = Transform::new(vec![TransformFunction::TranslateY(PropertyFloat::px(1.0))]);
        assert!(a.interpolate(&b, 0.5).is_none());

        let c = Transform::new(vec![TransformFunction::TranslateX(PropertyFloat::percent(
            10.0,
        ))]);
        assert!(!a.is_compatible(&c));
        assert!(a.interpolate(&c, 0.5).is_none());

        let d = Transform::new(vec![tx(0.0), tx(1.0)]);
        assert!(!a.is_compatible(&d));
    }

    #[test]
    fn percent_needs_reference_box() {
        let t = Transform::new(vec![TransformFunction::TranslateX(PropertyFloat::percent(
            50.0,
        ))]);
        assert!(!t.is_resolvable(Size::ZERO));
        assert!(t.is_resolvable(Size::new(200.0, 0.0)));

        let ctx = ResolveContext::default();
        let m = t.to_matrix(&ctx, Size::new(200.0, 100.0));
        assert_eq!(m.translation_2d(), (100.0, 0.0));
    }

    #[test]
    fn to_matrix_composes_left_to_right() {
        let ctx = ResolveContext::default();
        let t = Transform::new(vec![
            tx(10.0),
            TransformFunction::Scale(
                PropertyFloat::number(2.0),
                PropertyFloat::number(2.0),
                PropertyFloat::number(1.0),
            ),
        ]);
        let m = t.to_matrix(&ctx, Size::ZERO);
        let p = m.transform_point(kurbo::Point::new(1.0, 1.0));
        assert!((p.x - 12.0).abs() < 1e-9, "x = {}", p.x);
        assert!((p.y - 2.0).abs() < 1e-9, "y = {}", p.y);
    }

    #[test]
    fn identity_has_no_effect() {
        let ctx = ResolveContext::default();
        let f = TransformFunction::Skew(PropertyFloat::deg(20.0), PropertyFloat::deg(5.0));
        assert_eq!(f.identity().to_matrix(&ctx, Size::ZERO), Transform3d::IDENTITY);
        let m = TransformFunction::Matrix3d([2.0; 16]).identity();
        assert_eq!(m.to_matrix(&ctx, Size::ZERO), Transform3d::IDENTITY);
    }
}
