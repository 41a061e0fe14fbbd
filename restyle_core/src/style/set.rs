// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Copy-on-write property maps.

use alloc::collections::BTreeMap;
use alloc::sync::Arc;

use crate::property::{PropertyId, PropertyIdSet, PropertyValue};

/// An origin layer: a mapping from [`PropertyId`] to [`PropertyValue`].
///
/// Clones share storage until one side is written, so handing a matched
/// definition vector to many elements is cheap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertySet {
    values: Arc<BTreeMap<PropertyId, PropertyValue>>,
}

impl PropertySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `id`, if present.
    #[must_use]
    pub fn get(&self, id: PropertyId) -> Option<&PropertyValue> {
        self.values.get(&id)
    }

    /// Whether `id` has a value.
    #[must_use]
    pub fn contains(&self, id: PropertyId) -> bool {
        self.values.contains_key(&id)
    }

    /// Sets `id`; returns whether the stored value changed.
    pub fn set(&mut self, id: PropertyId, value: PropertyValue) -> bool {
        if self.values.get(&id) == Some(&value) {
            return false;
        }
        Arc::make_mut(&mut self.values).insert(id, value);
        true
    }

    /// Removes `id`, returning the old value.
    pub fn remove(&mut self, id: PropertyId) -> Option<PropertyValue> {
        if !self.values.contains_key(&id) {
            return None;
        }
        Arc::make_mut(&mut self.values).remove(&id)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        if !self.values.is_empty() {
            self.values = Arc::default();
        }
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The ids that have values.
    #[must_use]
    pub fn ids(&self) -> PropertyIdSet {
        self.values.keys().copied().collect()
    }

    /// Iterates in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &PropertyValue)> {
        self.values.iter().map(|(id, v)| (*id, v))
    }

    /// Whether both sets share the same storage.
    #[must_use]
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

impl FromIterator<(PropertyId, PropertyValue)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (PropertyId, PropertyValue)>>(iter: I) -> Self {
        Self {
            values: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<const N: usize> From<[(PropertyId, PropertyValue); N]> for PropertySet {
    fn from(entries: [(PropertyId, PropertyValue); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{Keyword, PropertyFloat};

    #[test]
    fn set_reports_changes() {
        let mut set = PropertySet::new();
        assert!(set.set(PropertyId::Opacity, PropertyFloat::number(0.5).into()));
        assert!(!set.set(PropertyId::Opacity, PropertyFloat::number(0.5).into()));
        assert!(set.set(PropertyId::Opacity, PropertyFloat::number(0.7).into()));
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.remove(PropertyId::Opacity),
            Some(PropertyValue::from(PropertyFloat::number(0.7)))
        );
        assert_eq!(set.remove(PropertyId::Opacity), None);
    }

    #[test]
    fn clones_share_until_written() {
        let flex = PropertyValue::from(Keyword::Flex);
        let a = PropertySet::from([(PropertyId::Display, flex.clone())]);
        let mut b = a.clone();
        assert!(a.shares_storage_with(&b));
        // A no-op write keeps sharing.
        b.set(PropertyId::Display, flex.clone());
        assert!(a.shares_storage_with(&b));
        b.set(PropertyId::Display, PropertyValue::from(Keyword::None));
        assert!(!a.shares_storage_with(&b));
        assert_eq!(a.get(PropertyId::Display), Some(&flex));
    }

    #[test]
    fn ids_lists_present_values() {
        let set = PropertySet::from([
            (PropertyId::Opacity, PropertyValue::from(PropertyFloat::number(1.0))),
            (PropertyId::Left, PropertyValue::from(PropertyFloat::px(3.0))),
        ]);
        let ids = set.ids();
        assert!(ids.contains(PropertyId::Opacity));
        assert!(ids.contains(PropertyId::Left));
        assert_eq!(ids.len(), 2);
    }
}
