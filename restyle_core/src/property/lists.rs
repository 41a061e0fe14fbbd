// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `transition` and `animation` list values.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::easing::Easing;
use super::id::PropertyId;

/// One entry of a `transition` list.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionSpec {
    /// The transitioned property, or `None` for `all`.
    pub property: Option<PropertyId>,
    /// Duration in seconds.
    pub duration: f64,
    /// Delay in seconds before the value starts moving.
    pub delay: f64,
    /// Timing function.
    pub easing: Easing,
}

impl TransitionSpec {
    /// A transition with no delay.
    #[must_use]
    pub fn new(property: Option<PropertyId>, duration: f64, easing: Easing) -> Self {
        Self {
            property,
            duration,
            delay: 0.0,
            easing,
        }
    }

    /// Whether this entry applies to `id`.
    #[must_use]
    pub fn applies_to(&self, id: PropertyId) -> bool {
        self.property.is_none_or(|p| p == id)
    }
}

impl fmt::Display for TransitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.property {
            Some(id) => f.write_str(id.name())?,
            None => f.write_str("all")?,
        }
        write!(f, " {}s {} {}s", self.duration, self.easing, self.delay)
    }
}

/// The value of the `transition` property.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TransitionList {
    /// No transitions.
    #[default]
    None,
    /// One spec for every property.
    All(TransitionSpec),
    /// Per-property specs; later entries win.
    List(Vec<TransitionSpec>),
}

impl TransitionList {
    /// Returns the spec governing `id`, if any.
    #[must_use]
    pub fn find(&self, id: PropertyId) -> Option<&TransitionSpec> {
        match self {
            Self::None => None,
            Self::All(spec) => Some(spec),
            Self::List(specs) => specs.iter().rev().find(|s| s.applies_to(id)),
        }
    }

    /// Whether some entry would transition `id` over a non-zero span.
    #[must_use]
    pub fn transitions(&self, id: PropertyId) -> bool {
        self.find(id)
            .is_some_and(|s| s.duration > 0.0 || s.delay > 0.0)
    }
}

impl fmt::Display for TransitionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::All(spec) => write!(f, "{spec}"),
            Self::List(specs) => {
                for (i, spec) in specs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{spec}")?;
                }
                Ok(())
            }
        }
    }
}

/// How many times an animation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Iterations {
    /// A fixed count; zero behaves like one.
    Finite(u32),
    /// Loops until canceled.
    Infinite,
}

impl Default for Iterations {
    fn default() -> Self {
        Self::Finite(1)
    }
}

impl fmt::Display for Iterations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => write!(f, "{n}"),
            Self::Infinite => f.write_str("infinite"),
        }
    }
}

/// One entry of an `animation` list.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSpec {
    /// Name of the registered keyframes.
    pub name: String,
    /// Duration of one iteration in seconds.
    pub duration: f64,
    /// Delay in seconds before the first iteration.
    pub delay: f64,
    /// Timing function applied between keys.
    pub easing: Easing,
    /// Iteration count.
    pub iterations: Iterations,
    /// Reverse direction on odd iterations.
    pub alternate: bool,
    /// Hold the current position.
    pub paused: bool,
}

impl AnimationSpec {
    /// A single forward run with the default easing.
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            delay: 0.0,
            easing: Easing::default(),
            iterations: Iterations::default(),
            alternate: false,
            paused: false,
        }
    }

    /// Same spec, looping forever.
    #[must_use]
    pub fn infinite(mut self) -> Self {
        self.iterations = Iterations::Infinite;
        self
    }

    /// Same spec with a different easing.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

impl fmt::Display for AnimationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}s {} {}s {}",
            self.name, self.duration, self.easing, self.delay, self.iterations
        )?;
        if self.alternate {
            f.write_str(" alternate")?;
        }
        if self.paused {
            f.write_str(" paused")?;
        }
        Ok(())
    }
}

/// The value of the `animation` property. Empty means `none`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationList(pub Vec<AnimationSpec>);

impl AnimationList {
    /// Whether the list is `none`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the specs.
    pub fn iter(&self) -> core::slice::Iter<'_, AnimationSpec> {
        self.0.iter()
    }
}

impl fmt::Display for AnimationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        for (i, spec) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{spec}")?;
        }
        Ok(())
    }
}
