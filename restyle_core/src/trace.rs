// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the update and render passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`Document::update`](crate::Document::update) and
//! [`Document::update_render`](crate::Document::update_render) call as they
//! work. All method bodies default to no-ops, so implementing only the events
//! you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`PropertyChange`] records and the
//!   corresponding `TraceSink` method.

use crate::animation::AnimationEvent;
use crate::dirty::{Axis, DirtyAxes};
use crate::property::PropertyId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What happened to a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionEventKind {
    /// A resolved value changed and a transition began.
    Started,
    /// The transition reached its end value.
    Finished,
    /// The transition was superseded or dropped before finishing.
    Canceled,
}

impl TransitionEventKind {
    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Finished => "finished",
            Self::Canceled => "canceled",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of [`Document::update`](crate::Document::update).
#[derive(Clone, Copy, Debug)]
pub struct UpdateBeginEvent {
    /// Monotonic update counter.
    pub pass_index: u64,
    /// Document time in seconds.
    pub time: f64,
}

/// Emitted each time an element's derived state is recomputed for an axis.
#[derive(Clone, Copy, Debug)]
pub struct AxisRecomputedEvent {
    /// Update counter.
    pub pass_index: u64,
    /// The axis being recomputed.
    pub axis: Axis,
    /// Slot index of the element.
    pub element_index: u32,
    /// Whether the derived state actually changed.
    pub changed: bool,
}

/// Emitted at the end of [`Document::update`](crate::Document::update).
#[derive(Clone, Copy, Debug)]
pub struct UpdateEndEvent {
    /// Update counter.
    pub pass_index: u64,
    /// Elements recomputed per axis, in [`Axis::ORDERED`] order.
    pub recomputed: [usize; 7],
    /// Axes that were re-dirtied behind the pass and wait for the next call.
    pub deferred: DirtyAxes,
}

impl UpdateEndEvent {
    /// Total recomputations across all axes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.recomputed.iter().sum()
    }
}

/// Emitted when a transition starts, finishes, or is canceled.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// Slot index of the element.
    pub element_index: u32,
    /// The transitioning property.
    pub property: PropertyId,
    /// What happened.
    pub kind: TransitionEventKind,
    /// Document time in seconds.
    pub time: f64,
}

/// A resolved-value change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyChange {
    /// Slot index of the element.
    pub element_index: u32,
    /// Which property's resolved value changed.
    pub property: PropertyId,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the update and render passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when an update pass begins.
    fn on_update_begin(&mut self, e: &UpdateBeginEvent) {
        _ = e;
    }

    /// Called after an element is recomputed for one axis.
    fn on_axis_recomputed(&mut self, e: &AxisRecomputedEvent) {
        _ = e;
    }

    /// Called when an update pass ends.
    fn on_update_end(&mut self, e: &UpdateEndEvent) {
        _ = e;
    }

    /// Called for transition lifecycle events.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called for animation lifecycle events.
    fn on_animation(&mut self, e: &AnimationEvent) {
        _ = e;
    }

    /// Called with the resolved-value changes since the previous update
    /// (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_property_changes(&mut self, pass_index: u64, changes: &[PropertyChange]) {
        _ = (pass_index, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`UpdateBeginEvent`].
    #[inline]
    pub fn update_begin(&mut self, e: &UpdateBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_update_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AxisRecomputedEvent`].
    #[inline]
    pub fn axis_recomputed(&mut self, e: &AxisRecomputedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_axis_recomputed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UpdateEndEvent`].
    #[inline]
    pub fn update_end(&mut self, e: &UpdateEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_update_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AnimationEvent`].
    #[inline]
    pub fn animation(&mut self, e: &AnimationEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_animation(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits property changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn property_changes(&mut self, pass_index: u64, changes: &[PropertyChange]) {
        if let Some(s) = &mut self.sink {
            s.on_property_changes(pass_index, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_end() -> UpdateEndEvent {
        UpdateEndEvent {
            pass_index: 3,
            recomputed: [1, 0, 0, 2, 2, 0, 1],
            deferred: DirtyAxes::EMPTY,
        }
    }

    #[test]
    fn update_end_total_sums_axes() {
        assert_eq!(sample_end().total(), 6);
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_update_begin(&UpdateBeginEvent {
            pass_index: 0,
            time: 0.0,
        });
        sink.on_update_end(&sample_end());
        sink.on_transition(&TransitionEvent {
            element_index: 0,
            property: PropertyId::Opacity,
            kind: TransitionEventKind::Started,
            time: 0.0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.update_begin(&UpdateBeginEvent {
            pass_index: 0,
            time: 0.0,
        });
        tracer.update_end(&sample_end());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            axes: Vec<(Axis, u32)>,
        }
        impl TraceSink for RecordingSink {
            fn on_axis_recomputed(&mut self, e: &AxisRecomputedEvent) {
                self.axes.push((e.axis, e.element_index));
            }
        }

        let mut sink = RecordingSink { axes: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.axis_recomputed(&AxisRecomputedEvent {
            pass_index: 1,
            axis: Axis::Clip,
            element_index: 4,
            changed: true,
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.axes, &[(Axis::Clip, 4)]);
    }
}
