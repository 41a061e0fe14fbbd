// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element tree and its derived state.
//!
//! A [`Document`] owns every node in struct-of-arrays storage. Each element
//! has:
//!
//! - An identity ([`ElementId`]), a generational handle that becomes stale
//!   when the node is destroyed.
//! - Topology: parent, first and last child, and sibling links forming an
//!   ordered tree. Text nodes are leaves without style.
//! - Matchable identity: tag, attributes, class list, and pseudo classes.
//! - Three origin layers (definition, inline, animation) resolved through
//!   [`Combination`](crate::style::Combination) views.
//! - **Derived state** produced by [`Document::update`]: child lists, the
//!   perspective and transform matrices, the clip region, render order, and
//!   paint batches. Hit testing ([`Document::element_from_point`]) and
//!   [`Document::project`] read these caches.
//!
//! # Dirty tracking
//!
//! Mutations mark [`Axis`](crate::dirty::Axis) bits on the elements whose
//! derived state they invalidate:
//!
//! - Attribute, class and pseudo class edits mark **Definition** on the
//!   subtree, since matching depends on ancestors.
//! - Insertion and removal mark **Structure** on the parent only.
//! - Resolved-value changes mark the axes each [`PropertyId`] declares, and
//!   inherited ids ripple to descendants that do not override them.
//!
//! [`Document::update_render`] advances time for elements flagged with the
//! Animation or Transition axes.
//!
//! [`PropertyId`]: crate::property::PropertyId

mod background;
mod cascade;
mod clip;
mod hit;
mod id;
mod layout;
mod render;
mod store;
mod traverse;
mod update;

pub use background::PaintBatch;
pub use clip::ElementClip;
pub use id::{ElementId, INVALID, NodeKind, PseudoClass, PseudoClassSet};
pub use layout::LayoutBox;
pub use store::Document;
pub use traverse::ChildNodes;
pub use update::UpdateReport;
