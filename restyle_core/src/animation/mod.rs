// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyframe animations and implicit transitions.
//!
//! Both kinds are time-driven and write their current value into the
//! element's *animation* origin layer, so they dominate inline and definition
//! values. [`Document::update_render`](crate::Document::update_render)
//! advances them once per frame.
//!
//! # Animations
//!
//! Listing a spec in the `animation` property starts one
//! [`ElementAnimation`] per property its [`Keyframes`] touch. At most one
//! animation drives a given property of an element; a later spec in the list
//! takes the property over. Lifecycle changes are reported as
//! [`AnimationEvent`]s, collected with
//! [`Document::take_events`](crate::Document::take_events).
//!
//! # Transitions
//!
//! When an inline or definition edit changes a property's resolved base value
//! and the `transition` property covers that id, an [`ElementTransition`]
//! starts from the value that was on screen. A second change mid-flight
//! restarts from the current interpolated value.

mod element_animation;
mod keyframes;
mod transition;

use alloc::string::String;

pub use element_animation::{AnimationState, ElementAnimation};
pub(crate) use element_animation::Advance;
pub use keyframes::{Keyframe, Keyframes};
pub use transition::ElementTransition;

use crate::element::ElementId;

/// Kind of an [`AnimationEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationEventKind {
    /// The delay elapsed and the first iteration began.
    Start,
    /// An iteration boundary was crossed.
    Iteration,
    /// The last iteration completed.
    End,
    /// The animation was removed before completing.
    Cancel,
}

impl AnimationEventKind {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Iteration => "iteration",
            Self::End => "end",
            Self::Cancel => "cancel",
        }
    }
}

/// A lifecycle notification for one animation on one element.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationEvent {
    /// The animated element.
    pub element: ElementId,
    /// What happened.
    pub kind: AnimationEventKind,
    /// The keyframes name.
    pub name: String,
    /// Seconds since the animation started, including the delay.
    pub elapsed: f64,
}
