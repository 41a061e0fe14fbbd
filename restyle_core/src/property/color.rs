// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 8-bit RGBA colors.

use core::fmt;

/// A non-premultiplied 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Creates a color from four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Per-channel linear interpolation.
    #[must_use]
    pub fn interpolate(self, other: Self, alpha: f32) -> Self {
        Self {
            r: lerp_channel(self.r, other.r, alpha),
            g: lerp_channel(self.g, other.g, alpha),
            b: lerp_channel(self.b, other.b, alpha),
            a: lerp_channel(self.a, other.a, alpha),
        }
    }

    /// Returns the color with its alpha multiplied by `opacity`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (f32::from(self.a) * opacity.clamp(0.0, 1.0)).round();
        Self { a: a as u8, ..self }
    }

    /// Whether the color contributes nothing when painted.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

fn lerp_channel(a: u8, b: u8, alpha: f32) -> u8 {
    let v = f32::from(a) * (1.0 - alpha) + f32::from(b) * alpha;
    v.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let a = f32::from(self.a) / 255.0;
            write!(f, "rgba({}, {}, {}, {a:.3})", self.r, self.g, self.b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
        assert_eq!(Color::rgba(1, 2, 3, 0).to_string(), "rgba(1, 2, 3, 0.000)");
    }

    #[test]
    fn interpolate_endpoints_and_midpoint() {
        let a = Color::rgba(0, 0, 0, 255);
        let b = Color::rgba(200, 100, 50, 255);
        assert_eq!(a.interpolate(b, 0.0), a);
        assert_eq!(a.interpolate(b, 1.0), b);
        assert_eq!(a.interpolate(b, 0.5), Color::rgba(100, 50, 25, 255));
    }

    #[test]
    fn interpolate_identity() {
        let c = Color::rgba(13, 77, 201, 90);
        for alpha in [0.0, 0.3, 0.5, 0.99, 1.0] {
            assert_eq!(c.interpolate(c, alpha), c);
        }
    }

    #[test]
    fn opacity_scales_alpha() {
        assert_eq!(Color::WHITE.with_opacity(0.5).a, 128);
        assert_eq!(Color::WHITE.with_opacity(2.0).a, 255);
    }
}
