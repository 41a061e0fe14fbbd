// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Implicit transitions between two resolved values.

use crate::property::{Easing, InterpolateContext, PropertyValue, TransitionSpec};

/// A transition of one property of one element.
///
/// Holds `from` until the delay has elapsed, then eases toward `to`.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementTransition {
    pub(crate) from: PropertyValue,
    pub(crate) to: PropertyValue,
    pub(crate) start_time: f64,
    pub(crate) duration: f64,
    pub(crate) delay: f64,
    pub(crate) easing: Easing,
}

impl ElementTransition {
    pub(crate) fn new(
        from: PropertyValue,
        to: PropertyValue,
        start_time: f64,
        spec: &TransitionSpec,
    ) -> Self {
        Self {
            from,
            to,
            start_time,
            duration: spec.duration.max(0.0),
            delay: spec.delay.max(0.0),
            easing: spec.easing,
        }
    }

    /// The value transitioned away from.
    #[must_use]
    pub fn from(&self) -> &PropertyValue {
        &self.from
    }

    /// The value transitioned toward.
    #[must_use]
    pub fn to(&self) -> &PropertyValue {
        &self.to
    }

    /// Document time the transition began, in seconds.
    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Eased progress at document time `now`, in `[0, 1]`.
    #[must_use]
    pub fn alpha(&self, now: f64) -> f32 {
        let active = now - self.start_time - self.delay;
        if active <= 0.0 {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        self.easing.apply((active / self.duration) as f32).clamp(0.0, 1.0)
    }

    /// Whether less than `epsilon` seconds remain at `now`.
    pub(crate) fn is_finished(&self, now: f64, epsilon: f64) -> bool {
        now - self.start_time >= self.delay + self.duration - epsilon
    }

    /// The value at document time `now`.
    pub(crate) fn value_at(&self, now: f64, ctx: &InterpolateContext<'_>) -> PropertyValue {
        let alpha = self.alpha(now);
        if self.to.allow_interpolate(ctx) {
            self.from.interpolate(&self.to, alpha)
        } else {
            self.from.discrete(&self.to, alpha).clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyFloat;

    fn opacity_transition(delay: f64) -> ElementTransition {
        let mut spec = TransitionSpec::new(None, 0.2, Easing::Linear);
        spec.delay = delay;
        ElementTransition::new(
            PropertyFloat::number(1.0).into(),
            PropertyFloat::number(0.0).into(),
            1.0,
            &spec,
        )
    }

    fn value(t: &ElementTransition, now: f64) -> f32 {
        t.value_at(now, &InterpolateContext::default())
            .as_float()
            .map_or(f32::NAN, |f| f.value)
    }

    #[test]
    fn linear_midpoint_and_end() {
        let t = opacity_transition(0.0);
        assert!((value(&t, 1.1) - 0.5).abs() < 1e-3);
        assert!(!t.is_finished(1.1, 1e-6));
        assert!(t.is_finished(1.2, 1e-6));
        assert_eq!(value(&t, 1.2), 0.0);
    }

    #[test]
    fn delay_holds_start_value() {
        let t = opacity_transition(0.5);
        assert_eq!(value(&t, 1.3), 1.0);
        assert!((value(&t, 1.6) - 0.5).abs() < 1e-3);
        assert!(!t.is_finished(1.6, 1e-6));
        assert!(t.is_finished(1.7, 1e-6));
    }

    #[test]
    fn zero_duration_jumps() {
        let spec = TransitionSpec::new(None, 0.0, Easing::Linear);
        let t = ElementTransition::new(
            PropertyFloat::number(1.0).into(),
            PropertyFloat::number(0.0).into(),
            0.0,
            &spec,
        );
        assert_eq!(t.alpha(0.0), 0.0);
        assert_eq!(t.alpha(0.1), 1.0);
        assert!(t.is_finished(0.0, 1e-6));
    }
}
