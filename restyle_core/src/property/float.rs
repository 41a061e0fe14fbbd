// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric property values and their units.

use core::fmt;

use kurbo::Size;

/// The unit attached to a [`PropertyFloat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    /// A bare number.
    Number,
    /// CSS pixels.
    Px,
    /// Percentage of a property-specific base.
    Percent,
    /// Multiple of the element's font size.
    Em,
    /// Multiple of the root font size.
    Rem,
    /// Percentage of the viewport width.
    Vw,
    /// Percentage of the viewport height.
    Vh,
    /// Density-independent pixels.
    Dp,
    /// Angle in degrees.
    Deg,
    /// Angle in radians.
    Rad,
}

impl Unit {
    /// Returns the CSS suffix for this unit (empty for numbers).
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Number => "",
            Self::Px => "px",
            Self::Percent => "%",
            Self::Em => "em",
            Self::Rem => "rem",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Dp => "dp",
            Self::Deg => "deg",
            Self::Rad => "rad",
        }
    }

    /// Looks up a dimension suffix, case-insensitively.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let unit = match suffix.to_ascii_lowercase().as_str() {
            "px" => Self::Px,
            "em" => Self::Em,
            "rem" => Self::Rem,
            "vw" => Self::Vw,
            "vh" => Self::Vh,
            "dp" => Self::Dp,
            "deg" => Self::Deg,
            "rad" => Self::Rad,
            _ => return None,
        };
        Some(unit)
    }

    /// Whether values in this unit are angles.
    #[must_use]
    pub const fn is_angle(self) -> bool {
        matches!(self, Self::Deg | Self::Rad)
    }

    /// Whether values in this unit are lengths (percentages included).
    #[must_use]
    pub const fn is_length(self) -> bool {
        matches!(
            self,
            Self::Px | Self::Percent | Self::Em | Self::Rem | Self::Vw | Self::Vh | Self::Dp
        )
    }
}

/// Element-dependent inputs needed to turn relative units into pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolveContext {
    /// The element's computed font size in pixels.
    pub font_size: f32,
    /// The root font size in pixels.
    pub root_font_size: f32,
    /// Viewport size for `vw`/`vh`.
    pub viewport: Size,
    /// Scale factor for `dp`.
    pub dp_ratio: f32,
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            root_font_size: 16.0,
            viewport: Size::ZERO,
            dp_ratio: 1.0,
        }
    }
}

/// A number with a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyFloat {
    /// The numeric part.
    pub value: f32,
    /// The unit.
    pub unit: Unit,
}

impl PropertyFloat {
    /// Creates a value with an explicit unit.
    #[must_use]
    pub const fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// A bare number.
    #[must_use]
    pub const fn number(value: f32) -> Self {
        Self::new(value, Unit::Number)
    }

    /// A pixel length.
    #[must_use]
    pub const fn px(value: f32) -> Self {
        Self::new(value, Unit::Px)
    }

    /// A percentage.
    #[must_use]
    pub const fn percent(value: f32) -> Self {
        Self::new(value, Unit::Percent)
    }

    /// An angle in degrees.
    #[must_use]
    pub const fn deg(value: f32) -> Self {
        Self::new(value, Unit::Deg)
    }

    /// Linear interpolation that preserves the unit.
    ///
    /// Returns `None` when the units differ; callers fall back to a discrete
    /// pick.
    #[must_use]
    pub fn interpolate(self, other: Self, alpha: f32) -> Option<Self> {
        if self.unit != other.unit {
            return None;
        }
        Some(Self::new(lerp(self.value, other.value, alpha), self.unit))
    }

    /// Resolves to pixels (or radians for angles).
    ///
    /// `percent_base` is the length a percentage refers to.
    #[must_use]
    pub fn resolve(self, ctx: &ResolveContext, percent_base: f32) -> f32 {
        match self.unit {
            Unit::Number | Unit::Px | Unit::Rad => self.value,
            Unit::Percent => self.value * percent_base / 100.0,
            Unit::Em => self.value * ctx.font_size,
            Unit::Rem => self.value * ctx.root_font_size,
            Unit::Vw => self.value * ctx.viewport.width as f32 / 100.0,
            Unit::Vh => self.value * ctx.viewport.height as f32 / 100.0,
            Unit::Dp => self.value * ctx.dp_ratio,
            Unit::Deg => self.value.to_radians(),
        }
    }

    /// Whether resolving this value needs a non-empty percentage base.
    #[must_use]
    pub fn needs_percent_base(self) -> bool {
        self.unit == Unit::Percent && self.value != 0.0
    }
}

impl fmt::Display for PropertyFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Interpolates `a → b`, exact at both endpoints.
pub(crate) fn lerp(a: f32, b: f32, alpha: f32) -> f32 {
    a * (1.0 - alpha) + b * alpha
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_suffix() {
        assert_eq!(PropertyFloat::px(10.0).to_string(), "10px");
        assert_eq!(PropertyFloat::percent(50.0).to_string(), "50%");
        assert_eq!(PropertyFloat::number(1.5).to_string(), "1.5");
        assert_eq!(PropertyFloat::deg(45.0).to_string(), "45deg");
    }

    #[test]
    fn interpolation_requires_matching_units() {
        let a = PropertyFloat::px(0.0);
        let b = PropertyFloat::px(10.0);
        assert_eq!(a.interpolate(b, 0.25), Some(PropertyFloat::px(2.5)));
        assert_eq!(a.interpolate(PropertyFloat::percent(10.0), 0.5), None);
    }

    #[test]
    fn interpolation_is_exact_at_endpoints() {
        let a = PropertyFloat::px(0.1);
        let b = PropertyFloat::px(0.7);
        assert_eq!(a.interpolate(b, 0.0), Some(a));
        assert_eq!(a.interpolate(b, 1.0), Some(b));
    }

    #[test]
    fn resolve_relative_units() {
        let ctx = ResolveContext {
            font_size: 20.0,
            root_font_size: 10.0,
            viewport: Size::new(800.0, 600.0),
            dp_ratio: 2.0,
        };
        assert_eq!(PropertyFloat::new(2.0, Unit::Em).resolve(&ctx, 0.0), 40.0);
        assert_eq!(PropertyFloat::new(2.0, Unit::Rem).resolve(&ctx, 0.0), 20.0);
        assert_eq!(PropertyFloat::percent(50.0).resolve(&ctx, 300.0), 150.0);
        assert_eq!(PropertyFloat::new(10.0, Unit::Vw).resolve(&ctx, 0.0), 80.0);
        assert_eq!(PropertyFloat::new(10.0, Unit::Vh).resolve(&ctx, 0.0), 60.0);
        assert_eq!(PropertyFloat::new(3.0, Unit::Dp).resolve(&ctx, 0.0), 6.0);
        let rad = PropertyFloat::deg(180.0).resolve(&ctx, 0.0);
        assert!((rad - core::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn suffix_lookup_is_case_insensitive() {
        assert_eq!(Unit::from_suffix("PX"), Some(Unit::Px));
        assert_eq!(Unit::from_suffix("furlong"), None);
    }
}
