// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, recording, and JSON snapshots for restyle diagnostics.
//!
//! This crate provides [`TraceSink`](restyle_core::trace::TraceSink)
//! implementations and inspection helpers for development:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`snapshot`]: JSON dumps of an element tree's computed styles and
//!   derived state.

pub mod pretty;
pub mod recorder;
pub mod snapshot;
