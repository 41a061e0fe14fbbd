// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Origin layers and the cascade.
//!
//! Every element owns three [`PropertySet`] origin layers: *definition*
//! (selector-matched), *inline* (direct edits) and *animation* (written by
//! running animations and transitions). A [`Combination`] resolves a value
//! by probing the layers in fixed priority order:
//!
//! ```text
//! animation > inline > definition > parent (inherited ids only) > initial value
//! ```
//!
//! Resolution is total: an id absent from every layer resolves to
//! [`PropertyId::initial_value`](crate::property::PropertyId::initial_value).

mod combination;
mod set;

pub use combination::{CascadeMode, Combination};
pub use set::PropertySet;
