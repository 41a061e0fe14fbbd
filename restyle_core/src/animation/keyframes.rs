// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named keyframe tracks.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::property::{Easing, PropertyId, PropertyIdSet, PropertyValue};
use crate::style::PropertySet;

/// One key on a property track.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Normalized position in `[0, 1]`.
    pub time: f32,
    /// Value at this key.
    pub value: PropertyValue,
    /// Easing from this key to the next; the animation's easing if `None`.
    pub easing: Option<Easing>,
}

/// A named set of keyframe tracks, one per property.
///
/// Keyframes are produced outside the engine (typically by a stylesheet
/// parser) and registered on the document with
/// [`Document::register_keyframes`](crate::Document::register_keyframes).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keyframes {
    name: String,
    tracks: BTreeMap<PropertyId, Vec<Keyframe>>,
}

impl Keyframes {
    /// Creates an empty set named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: BTreeMap::new(),
        }
    }

    /// Adds a key for `id` at `time` (clamped to `[0, 1]`). A key already at
    /// that time is replaced.
    #[must_use]
    pub fn with_key(self, time: f32, id: PropertyId, value: impl Into<PropertyValue>) -> Self {
        self.with_eased_key(time, id, value, None)
    }

    /// Like [`with_key`](Self::with_key) with a per-key easing.
    #[must_use]
    pub fn with_eased_key(
        mut self,
        time: f32,
        id: PropertyId,
        value: impl Into<PropertyValue>,
        easing: Option<Easing>,
    ) -> Self {
        let key = Keyframe {
            time: time.clamp(0.0, 1.0),
            value: value.into(),
            easing,
        };
        let track = self.tracks.entry(id).or_default();
        match track.binary_search_by(|k| k.time.total_cmp(&key.time)) {
            Ok(i) => track[i] = key,
            Err(i) => track.insert(i, key),
        }
        self
    }

    /// Adds every value of `block` at `time`.
    #[must_use]
    pub fn with_block(self, time: f32, block: &PropertySet) -> Self {
        block
            .iter()
            .fold(self, |kf, (id, value)| kf.with_key(time, id, value.clone()))
    }

    /// The name animations refer to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ids with at least one key.
    #[must_use]
    pub fn properties(&self) -> PropertyIdSet {
        self.tracks.keys().copied().collect()
    }

    /// The keys for `id`, sorted by time.
    #[must_use]
    pub fn track(&self, id: PropertyId) -> &[Keyframe] {
        self.tracks.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Whether no track has keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
