// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-property keyframe animation state.

use alloc::vec::Vec;

use super::keyframes::Keyframe;
use crate::property::{AnimationSpec, InterpolateContext, Iterations, PropertyValue};

/// Lifecycle of an [`ElementAnimation`].
///
/// ```text
/// Pending ──► Running ──► Completed
///    │           │
///    └───────────┴──────► Canceled
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationState {
    /// Waiting out the delay.
    Pending,
    /// Writing values into the animation layer.
    Running,
    /// Ran its last iteration.
    Completed,
    /// Removed before completing.
    Canceled,
}

/// What one [`ElementAnimation::advance`] call crossed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Advance {
    /// Left `Pending`.
    pub(crate) started: bool,
    /// Iteration boundaries crossed without completing.
    pub(crate) iterations: u32,
    /// Reached `Completed`.
    pub(crate) completed: bool,
}

/// One running keyframe track on one property of one element.
#[derive(Clone, Debug)]
pub struct ElementAnimation {
    pub(crate) spec: AnimationSpec,
    pub(crate) keys: Vec<Keyframe>,
    pub(crate) elapsed: f64,
    pub(crate) iteration: u32,
    pub(crate) state: AnimationState,
    /// Whether this track reports lifecycle events for its animation.
    pub(crate) lead: bool,
}

impl ElementAnimation {
    /// Starts `spec` over `keys`. Missing 0% and 100% keys take `base`.
    pub(crate) fn new(
        spec: AnimationSpec,
        track: &[Keyframe],
        base: &PropertyValue,
        lead: bool,
    ) -> Self {
        let mut keys = Vec::with_capacity(track.len() + 2);
        if track.first().is_none_or(|k| k.time > 0.0) {
            keys.push(Keyframe {
                time: 0.0,
                value: base.clone(),
                easing: None,
            });
        }
        keys.extend_from_slice(track);
        if track.last().is_none_or(|k| k.time < 1.0) {
            keys.push(Keyframe {
                time: 1.0,
                value: base.clone(),
                easing: None,
            });
        }
        Self {
            spec,
            keys,
            elapsed: 0.0,
            iteration: 0,
            state: AnimationState::Pending,
            lead,
        }
    }

    /// The spec this track was started from.
    #[must_use]
    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Seconds since the animation started, including the delay.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Zero-based iteration currently running.
    #[must_use]
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Advances time by `delta` seconds.
    pub(crate) fn advance(&mut self, delta: f64) -> Advance {
        let mut out = Advance::default();
        if matches!(
            self.state,
            AnimationState::Completed | AnimationState::Canceled
        ) || self.spec.paused
        {
            return out;
        }
        self.elapsed += delta.max(0.0);
        let active = self.elapsed - self.spec.delay;
        if active < 0.0 {
            return out;
        }
        if self.state == AnimationState::Pending {
            self.state = AnimationState::Running;
            out.started = true;
        }

        let count = match self.spec.iterations {
            Iterations::Finite(n) => Some(n),
            Iterations::Infinite => None,
        };
        if self.spec.duration <= 0.0 {
            // A zero-length animation finishes as soon as it starts; an
            // infinite one would never make progress.
            self.state = AnimationState::Completed;
            out.completed = true;
            return out;
        }

        let cycles = active / self.spec.duration;
        if count.is_some_and(|n| cycles >= f64::from(n)) {
            self.state = AnimationState::Completed;
            out.completed = true;
            return out;
        }
        let iteration = cycles.floor().min(f64::from(u32::MAX)) as u32;
        out.iterations = iteration.saturating_sub(self.iteration);
        self.iteration = iteration;
        out
    }

    /// Normalized position within the current iteration, direction applied.
    pub(crate) fn progress(&self) -> f32 {
        if self.spec.duration <= 0.0 {
            return 1.0;
        }
        let active = (self.elapsed - self.spec.delay).max(0.0);
        let p = (active / self.spec.duration - f64::from(self.iteration)).clamp(0.0, 1.0) as f32;
        if self.spec.alternate && self.iteration % 2 == 1 {
            1.0 - p
        } else {
            p
        }
    }

    /// Samples the track at the current position, or `None` while pending.
    pub(crate) fn sample(&self, ctx: &InterpolateContext<'_>) -> Option<PropertyValue> {
        if self.state != AnimationState::Running {
            return None;
        }
        Some(sample_keys(&self.keys, self.progress(), &self.spec, ctx))
    }
}

fn sample_keys(
    keys: &[Keyframe],
    p: f32,
    spec: &AnimationSpec,
    ctx: &InterpolateContext<'_>,
) -> PropertyValue {
    // `keys` always starts at 0 and ends at 1, so a bracketing pair exists.
    let next = keys.iter().position(|k| k.time >= p).unwrap_or(keys.len() - 1);
    if next == 0 {
        return keys[0].value.clone();
    }
    let (a, b) = (&keys[next - 1], &keys[next]);
    let span = b.time - a.time;
    let local = if span > 0.0 { (p - a.time) / span } else { 1.0 };
    let alpha = a.easing.unwrap_or(spec.easing).apply(local);
    if b.value.allow_interpolate(ctx) {
        a.value.interpolate(&b.value, alpha)
    } else {
        a.value.discrete(&b.value, alpha).clone()
    }
}
