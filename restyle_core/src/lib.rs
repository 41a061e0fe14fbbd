// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style cascade and dirty invalidation for retained-mode element trees.
//!
//! `restyle_core` resolves style properties for a tree of elements from three
//! origin layers, tracks which pieces of derived state went stale, and
//! recomputes them incrementally in a fixed order. Animations and transitions
//! are time-driven writers into the highest-priority layer.
//!
//! # Architecture
//!
//! ```text
//!   StyleMatcher ──► definition layer ┐
//!   set_property ──► inline layer     ├─► Combination (cascade) ──► dirty axes
//!   update_render ─► animation layer  ┘                                 │
//!                                                                       ▼
//!   LayoutBox (solver) ──────────────────────────────────────► Document::update()
//!                                                                       │
//!                                                                       ▼
//!                                       transform, clip, render order, paint batches
//! ```
//!
//! **[`property`]**: the closed [`PropertyValue`](property::PropertyValue)
//! union, the fixed [`PropertyId`](property::PropertyId) table, interpolation
//! and the text boundary.
//!
//! **[`style`]**: copy-on-write [`PropertySet`](style::PropertySet) layers and
//! read-only [`Combination`](style::Combination) cascade views.
//!
//! **[`element`]**: the [`Document`] arena, its topology, layer edits, the
//! update pass and the render pass.
//!
//! **[`dirty`]**: dirty axes and their `understory_dirty` channels.
//!
//! **[`animation`]**: keyframe animations and implicit transitions.
//!
//! **[`matcher`]**: the [`StyleMatcher`](matcher::StyleMatcher) seam selector
//! matching plugs into.
//!
//! **[`transform`]**: the 4×4 matrix type derived transforms are stored in.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) and the zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Example
//!
//! ```
//! use restyle_core::Document;
//! use restyle_core::matcher::NullMatcher;
//! use restyle_core::trace::Tracer;
//!
//! let mut doc = Document::new();
//! let root = doc.create_element("div");
//! let child = doc.create_element("span");
//! doc.append_child(root, child);
//! doc.set_property(root, "color", Some("#336699")).unwrap();
//!
//! doc.update(&NullMatcher, &mut Tracer::none());
//! assert_eq!(doc.property(child, "color").unwrap(), "#336699");
//! ```
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-property
//!   change records.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod config;
pub mod dirty;
pub mod element;
pub mod error;
pub mod matcher;
pub mod property;
pub mod style;
pub mod trace;
pub mod transform;

pub use config::StyleConfig;
pub use element::{Document, ElementId};
pub use error::StyleError;
