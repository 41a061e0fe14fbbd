// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Document time
//! is printed in milliseconds.

use std::io::Write;

use restyle_core::animation::AnimationEvent;
use restyle_core::dirty::Axis;
use restyle_core::trace::{
    AxisRecomputedEvent, PropertyChange, TraceSink, TransitionEvent, UpdateBeginEvent,
    UpdateEndEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }

    /// Also print one line per element recomputation.
    ///
    /// Off by default; a full-tree pass emits one line per element and axis.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(seconds: f64) -> f64 {
    seconds * 1000.0
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_update_begin(&mut self, e: &UpdateBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[update:begin] pass={} t={:.1}ms",
            e.pass_index,
            ms(e.time),
        );
    }

    fn on_axis_recomputed(&mut self, e: &AxisRecomputedEvent) {
        if !self.verbose {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[axis] pass={} {} el={}{}",
            e.pass_index,
            e.axis,
            e.element_index,
            if e.changed { "" } else { " (unchanged)" },
        );
    }

    fn on_update_end(&mut self, e: &UpdateEndEvent) {
        let mut counts = String::new();
        for (axis, n) in Axis::ORDERED.iter().zip(e.recomputed) {
            if n > 0 {
                if !counts.is_empty() {
                    counts.push(' ');
                }
                counts.push_str(&format!("{axis}={n}"));
            }
        }
        let _ = writeln!(
            self.writer,
            "[update:end] pass={} total={} {counts}{}",
            e.pass_index,
            e.total(),
            if e.deferred.is_empty() {
                String::new()
            } else {
                format!(" deferred={:?}", e.deferred)
            },
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[transition] el={} {} {} at {:.1}ms",
            e.element_index,
            e.property,
            e.kind.name(),
            ms(e.time),
        );
    }

    fn on_animation(&mut self, e: &AnimationEvent) {
        let _ = writeln!(
            self.writer,
            "[animation] el={} {} {} elapsed={:.1}ms",
            e.element.index(),
            e.name,
            e.kind.name(),
            ms(e.elapsed),
        );
    }

    fn on_property_changes(&mut self, pass_index: u64, changes: &[PropertyChange]) {
        let _ = writeln!(
            self.writer,
            "[changes] pass={pass_index} count={}",
            changes.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restyle_core::Document;
    use restyle_core::dirty::DirtyAxes;
    use restyle_core::matcher::NullMatcher;
    use restyle_core::property::PropertyId;
    use restyle_core::trace::{Tracer, TransitionEventKind};

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn update_end_lists_nonzero_axes() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_update_end(&UpdateEndEvent {
            pass_index: 4,
            recomputed: [1, 0, 0, 3, 0, 0, 2],
            deferred: DirtyAxes::EMPTY,
        });
        let out = output(sink);
        assert!(out.starts_with("[update:end] pass=4 total=6"), "got: {out}");
        assert!(out.contains("definition=1 transform=3 background=2"), "got: {out}");
        assert!(!out.contains("deferred"), "got: {out}");
    }

    #[test]
    fn transition_line_names_the_property() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_transition(&TransitionEvent {
            element_index: 2,
            property: PropertyId::Opacity,
            kind: TransitionEventKind::Started,
            time: 0.25,
        });
        let out = output(sink);
        assert_eq!(out, "[transition] el=2 opacity started at 250.0ms\n");
    }

    #[test]
    fn axis_lines_only_when_verbose() {
        let event = AxisRecomputedEvent {
            pass_index: 1,
            axis: Axis::Clip,
            element_index: 7,
            changed: false,
        };
        let mut quiet = PrettyPrintSink::with_writer(Vec::<u8>::new());
        quiet.on_axis_recomputed(&event);
        assert!(output(quiet).is_empty());

        let mut loud = PrettyPrintSink::with_writer(Vec::<u8>::new()).verbose(true);
        loud.on_axis_recomputed(&event);
        assert_eq!(output(loud), "[axis] pass=1 clip el=7 (unchanged)\n");
    }

    #[test]
    fn traces_a_real_update_pass() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_element("p");
        doc.append_child(root, child);

        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        doc.update(&NullMatcher, &mut Tracer::new(&mut sink));
        let out = output(sink);
        assert!(out.contains("[update:begin] pass="), "got: {out}");
        assert!(out.contains("[update:end]"), "got: {out}");
    }
}
