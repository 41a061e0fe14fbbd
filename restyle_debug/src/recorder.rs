// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Property ids and axes are stored as their position in
//! [`PropertyId::ALL`] and [`Axis::ALL`]. Property-change batches
//! ([`on_property_changes`](TraceSink::on_property_changes)) store only the
//! count.

use restyle_core::animation::{AnimationEvent, AnimationEventKind};
use restyle_core::dirty::{Axis, DirtyAxes};
use restyle_core::property::PropertyId;
use restyle_core::trace::{
    AxisRecomputedEvent, PropertyChange, TraceSink, TransitionEvent, TransitionEventKind,
    UpdateBeginEvent, UpdateEndEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_UPDATE_BEGIN: u8 = 1;
const TAG_AXIS_RECOMPUTED: u8 = 2;
const TAG_UPDATE_END: u8 = 3;
const TAG_TRANSITION: u8 = 4;
const TAG_ANIMATION: u8 = 5;
const TAG_PROPERTY_CHANGES_COUNT: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_count(&mut self, n: usize) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "counts capped at u32::MAX for recording"
        )]
        self.write_u32(n.min(u32::MAX as usize) as u32);
    }

    fn write_axis(&mut self, axis: Axis) {
        self.write_u8(axis_code(axis));
    }

    fn write_axes(&mut self, axes: DirtyAxes) {
        let bits = axes
            .iter()
            .fold(0_u16, |bits, axis| bits | 1 << axis_code(axis));
        self.write_u16(bits);
    }

    fn write_property(&mut self, property: PropertyId) {
        let code = PropertyId::ALL
            .iter()
            .position(|&p| p == property)
            .unwrap_or(usize::MAX);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "the property table fits in a byte"
        )]
        self.write_u8(code.min(usize::from(u8::MAX)) as u8);
    }

    fn write_str(&mut self, s: &str) {
        self.write_count(s.len());
        self.buf.extend_from_slice(s.as_bytes());
    }
}

fn axis_code(axis: Axis) -> u8 {
    let code = Axis::ALL.iter().position(|&a| a == axis).unwrap_or(0);
    #[expect(clippy::cast_possible_truncation, reason = "nine axes")]
    let code = code as u8;
    code
}

fn transition_code(kind: TransitionEventKind) -> u8 {
    match kind {
        TransitionEventKind::Started => 0,
        TransitionEventKind::Finished => 1,
        TransitionEventKind::Canceled => 2,
    }
}

fn animation_code(kind: AnimationEventKind) -> u8 {
    match kind {
        AnimationEventKind::Start => 0,
        AnimationEventKind::Iteration => 1,
        AnimationEventKind::End => 2,
        AnimationEventKind::Cancel => 3,
    }
}

impl TraceSink for RecorderSink {
    fn on_update_begin(&mut self, e: &UpdateBeginEvent) {
        self.write_u8(TAG_UPDATE_BEGIN);
        self.write_u64(e.pass_index);
        self.write_f64(e.time);
    }

    fn on_axis_recomputed(&mut self, e: &AxisRecomputedEvent) {
        self.write_u8(TAG_AXIS_RECOMPUTED);
        self.write_u64(e.pass_index);
        self.write_axis(e.axis);
        self.write_u32(e.element_index);
        self.write_u8(u8::from(e.changed));
    }

    fn on_update_end(&mut self, e: &UpdateEndEvent) {
        self.write_u8(TAG_UPDATE_END);
        self.write_u64(e.pass_index);
        for n in e.recomputed {
            self.write_count(n);
        }
        self.write_axes(e.deferred);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.write_u8(TAG_TRANSITION);
        self.write_u32(e.element_index);
        self.write_property(e.property);
        self.write_u8(transition_code(e.kind));
        self.write_f64(e.time);
    }

    fn on_animation(&mut self, e: &AnimationEvent) {
        self.write_u8(TAG_ANIMATION);
        self.write_u32(e.element.index());
        self.write_u32(e.element.generation());
        self.write_u8(animation_code(e.kind));
        self.write_f64(e.elapsed);
        self.write_str(&e.name);
    }

    fn on_property_changes(&mut self, pass_index: u64, changes: &[PropertyChange]) {
        self.write_u8(TAG_PROPERTY_CHANGES_COUNT);
        self.write_u64(pass_index);
        self.write_count(changes.len());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// An [`UpdateBeginEvent`].
    UpdateBegin(UpdateBeginEvent),
    /// An [`AxisRecomputedEvent`].
    AxisRecomputed(AxisRecomputedEvent),
    /// An [`UpdateEndEvent`].
    UpdateEnd(UpdateEndEvent),
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// An [`AnimationEvent`], with the element handle split into raw parts.
    Animation {
        /// Slot index of the element.
        element_index: u32,
        /// Generation of the element handle.
        generation: u32,
        /// What happened.
        kind: AnimationEventKind,
        /// The keyframes name.
        name: String,
        /// Seconds since the animation started.
        elapsed: f64,
    },
    /// Property-change count for an update pass.
    PropertyChangesCount {
        /// Update counter.
        pass_index: u64,
        /// Number of resolved-value changes.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the first truncated or unknown record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take(&mut self, n: usize) -> Option<&[u8]> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    fn read_u16(&mut self) -> Option<u16> {
        Some(u16::from_le_bytes(self.take(2)?.try_into().ok()?))
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_axis(&mut self) -> Option<Axis> {
        Axis::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn read_axes(&mut self) -> Option<DirtyAxes> {
        let bits = self.read_u16()?;
        let mut axes = DirtyAxes::EMPTY;
        for (i, axis) in Axis::ALL.into_iter().enumerate() {
            if bits & (1 << i) != 0 {
                axes.insert(axis);
            }
        }
        Some(axes)
    }

    fn read_property(&mut self) -> Option<PropertyId> {
        PropertyId::ALL.get(usize::from(self.read_u8()?)).copied()
    }

    fn read_str(&mut self) -> Option<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).ok()
    }

    fn decode_update_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::UpdateBegin(UpdateBeginEvent {
            pass_index: self.read_u64()?,
            time: self.read_f64()?,
        }))
    }

    fn decode_axis_recomputed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::AxisRecomputed(AxisRecomputedEvent {
            pass_index: self.read_u64()?,
            axis: self.read_axis()?,
            element_index: self.read_u32()?,
            changed: self.read_u8()? != 0,
        }))
    }

    fn decode_update_end(&mut self) -> Option<RecordedEvent> {
        let pass_index = self.read_u64()?;
        let mut recomputed = [0; 7];
        for n in &mut recomputed {
            *n = self.read_u32()? as usize;
        }
        Some(RecordedEvent::UpdateEnd(UpdateEndEvent {
            pass_index,
            recomputed,
            deferred: self.read_axes()?,
        }))
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transition(TransitionEvent {
            element_index: self.read_u32()?,
            property: self.read_property()?,
            kind: match self.read_u8()? {
                0 => TransitionEventKind::Started,
                1 => TransitionEventKind::Finished,
                _ => TransitionEventKind::Canceled,
            },
            time: self.read_f64()?,
        }))
    }

    fn decode_animation(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Animation {
            element_index: self.read_u32()?,
            generation: self.read_u32()?,
            kind: match self.read_u8()? {
                0 => AnimationEventKind::Start,
                1 => AnimationEventKind::Iteration,
                2 => AnimationEventKind::End,
                _ => AnimationEventKind::Cancel,
            },
            elapsed: self.read_f64()?,
            name: self.read_str()?,
        })
    }

    fn decode_property_changes_count(&mut self) -> Option<RecordedEvent> {
        let pass_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::PropertyChangesCount { pass_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_UPDATE_BEGIN => self.decode_update_begin(),
            TAG_AXIS_RECOMPUTED => self.decode_axis_recomputed(),
            TAG_UPDATE_END => self.decode_update_end(),
            TAG_TRANSITION => self.decode_transition(),
            TAG_ANIMATION => self.decode_animation(),
            TAG_PROPERTY_CHANGES_COUNT => self.decode_property_changes_count(),
            _ => None,
        }
    }
}
