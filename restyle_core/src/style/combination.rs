// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only cascade views.

use alloc::borrow::Cow;

use crate::element::{Document, INVALID};
use crate::property::{PropertyId, PropertyValue};

/// Which layers a [`Combination`] consults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CascadeMode {
    /// Priority merge of the element's own layers: animation, inline,
    /// definition.
    Local,
    /// [`Local`](Self::Local), then inheritance from the parent's global view
    /// for inherited ids.
    Global,
    /// Like [`Global`](Self::Global) but skipping this element's animation
    /// layer. This is the value transitions and animations yield back to.
    Base,
}

/// A view resolving property values for one element.
///
/// Combinations hold no state of their own: every lookup reads the current
/// layers, so there is nothing to invalidate.
#[derive(Clone, Copy, Debug)]
pub struct Combination<'a> {
    doc: &'a Document,
    idx: u32,
    mode: CascadeMode,
}

impl<'a> Combination<'a> {
    pub(crate) fn new(doc: &'a Document, idx: u32, mode: CascadeMode) -> Self {
        Self { doc, idx, mode }
    }

    /// The layering mode of this view.
    #[must_use]
    pub fn mode(&self) -> CascadeMode {
        self.mode
    }

    /// Returns the first value present for `id`, or `None` if no layer in
    /// scope has one.
    #[must_use]
    pub fn get(&self, id: PropertyId) -> Option<&'a PropertyValue> {
        let i = self.idx as usize;
        let doc = self.doc;
        if self.mode != CascadeMode::Base {
            if let Some(v) = doc.animation[i].get(id) {
                return Some(v);
            }
        }
        if let Some(v) = doc.inline[i].get(id).or_else(|| doc.definition[i].get(id)) {
            return Some(v);
        }
        if self.mode == CascadeMode::Local || !id.inherited() {
            return None;
        }
        // Ancestors always contribute their full cascade, animations included.
        let mut p = doc.parent[i];
        while p != INVALID {
            let pi = p as usize;
            if let Some(v) = doc.animation[pi]
                .get(id)
                .or_else(|| doc.inline[pi].get(id))
                .or_else(|| doc.definition[pi].get(id))
            {
                return Some(v);
            }
            p = doc.parent[pi];
        }
        None
    }

    /// Resolves `id`, falling back to its initial value.
    #[must_use]
    pub fn resolve(&self, id: PropertyId) -> Cow<'a, PropertyValue> {
        match self.get(id) {
            Some(v) => Cow::Borrowed(v),
            None => Cow::Owned(id.initial_value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{Color, PropertyFloat};

    fn opacity(v: f32) -> PropertyValue {
        PropertyValue::from(PropertyFloat::number(v))
    }

    #[test]
    fn local_priority_is_animation_inline_definition() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        let i = el.idx as usize;
        doc.definition[i].set(PropertyId::Opacity, opacity(0.1));
        doc.inline[i].set(PropertyId::Opacity, opacity(0.2));
        doc.animation[i].set(PropertyId::Opacity, opacity(0.3));

        let local = Combination::new(&doc, el.idx, CascadeMode::Local);
        assert_eq!(local.get(PropertyId::Opacity), Some(&opacity(0.3)));
        let base = Combination::new(&doc, el.idx, CascadeMode::Base);
        assert_eq!(base.get(PropertyId::Opacity), Some(&opacity(0.2)));
    }

    #[test]
    fn global_inherits_only_inherited_ids() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(parent, child);
        let p = parent.idx as usize;
        doc.definition[p].set(PropertyId::Color, Color::WHITE.into());
        doc.definition[p].set(PropertyId::Opacity, opacity(0.5));

        let local = Combination::new(&doc, child.idx, CascadeMode::Local);
        assert_eq!(local.get(PropertyId::Color), None);

        let global = Combination::new(&doc, child.idx, CascadeMode::Global);
        assert_eq!(
            global.get(PropertyId::Color),
            Some(&PropertyValue::from(Color::WHITE))
        );
        // Opacity is not inherited.
        assert_eq!(global.get(PropertyId::Opacity), None);
        assert_eq!(*global.resolve(PropertyId::Opacity), opacity(1.0));
    }

    #[test]
    fn base_view_inherits_ancestor_animation() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(parent, child);
        doc.animation[parent.idx as usize].set(PropertyId::Color, Color::BLACK.into());

        let base = Combination::new(&doc, child.idx, CascadeMode::Base);
        assert_eq!(
            base.get(PropertyId::Color),
            Some(&PropertyValue::from(Color::BLACK))
        );
    }

    #[test]
    fn resolve_falls_back_to_initial_value() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        let view = Combination::new(&doc, el.idx, CascadeMode::Global);
        for id in PropertyId::ALL.iter().copied() {
            assert_eq!(*view.resolve(id), id.initial_value(), "{id}");
        }
    }
}
