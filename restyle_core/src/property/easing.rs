// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves for transitions and keyframe animations.

use core::fmt;

/// Where the jump happens for [`Easing::Steps`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StepPosition {
    /// Jump at the start of each interval.
    Start,
    /// Jump at the end of each interval.
    #[default]
    End,
}

/// A timing function mapping linear progress to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    /// Identity.
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1)`.
    #[default]
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// An explicit bezier with control points `(x1, y1)` and `(x2, y2)`.
    CubicBezier(f32, f32, f32, f32),
    /// A staircase with `n` steps.
    Steps(u32, StepPosition),
}

impl Easing {
    /// Parses a keyword easing name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let easing = match name.to_ascii_lowercase().as_str() {
            "linear" => Self::Linear,
            "ease" => Self::Ease,
            "ease-in" => Self::EaseIn,
            "ease-out" => Self::EaseOut,
            "ease-in-out" => Self::EaseInOut,
            "step-start" => Self::Steps(1, StepPosition::Start),
            "step-end" => Self::Steps(1, StepPosition::End),
            _ => return None,
        };
        Some(easing)
    }

    /// Evaluates the curve at `t`, clamped to `[0, 1]`.
    ///
    /// The endpoints are exact: `apply(0) == 0` and `apply(1) == 1`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(t, 0.25, 0.1, 0.25, 1.0),
            Self::EaseIn => cubic_bezier(t, 0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => cubic_bezier(t, 0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => cubic_bezier(t, 0.42, 0.0, 0.58, 1.0),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, x1, y1, x2, y2),
            Self::Steps(0, _) => t,
            Self::Steps(steps, position) => {
                let n = steps as f32;
                match position {
                    StepPosition::Start => (t * n).ceil() / n,
                    StepPosition::End => (t * n).floor() / n,
                }
            }
        }
    }
}

/// Samples a CSS cubic bezier at input progress `t`.
///
/// Inverts the x-curve with Newton–Raphson, then samples y.
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let sample = |s: f32, p1: f32, p2: f32| -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    };
    let sample_dx = |s: f32| -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * x1 + 6.0 * inv * s * (x2 - x1) + 3.0 * s * s * (1.0 - x2)
    };

    let mut s = t;
    for _ in 0..8 {
        let x = sample(s, x1, x2) - t;
        if x.abs() < 1e-6 {
            break;
        }
        let dx = sample_dx(s);
        if dx.abs() < 1e-7 {
            break;
        }
        s = (s - x / dx).clamp(0.0, 1.0);
    }
    sample(s, y1, y2)
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Self::Steps(n, StepPosition::Start) => write!(f, "steps({n}, start)"),
            Self::Steps(n, StepPosition::End) => write!(f, "steps({n}, end)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for e in [
            Easing::Linear,
            Easing::Ease,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicBezier(0.1, 0.7, 0.9, 0.2),
            Easing::Steps(3, StepPosition::Start),
        ] {
            assert_eq!(e.apply(0.0), 0.0, "{e}");
            assert_eq!(e.apply(1.0), 1.0, "{e}");
        }
    }

    #[test]
    fn linear_bezier_is_identity() {
        for t in [0.1_f32, 0.25, 0.5, 0.75, 0.9] {
            let y = Easing::CubicBezier(0.0, 0.0, 1.0, 1.0).apply(t);
            assert!((y - t).abs() < 1e-3, "t={t} y={y}");
        }
    }

    #[test]
    fn ease_in_starts_slow() {
        assert!(Easing::EaseIn.apply(0.25) < 0.25);
        assert!(Easing::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn steps_quantize() {
        let v = Easing::Steps(4, StepPosition::End).apply(0.3);
        assert!((v - 0.25).abs() < 1e-6, "steps(4, end) at 0.3 = {v}");
        let v = Easing::Steps(4, StepPosition::Start).apply(0.3);
        assert!((v - 0.5).abs() < 1e-6, "steps(4, start) at 0.3 = {v}");
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(3.0), 1.0);
    }
}
