// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer edits and cascade queries.
//!
//! Every edit to an origin layer goes through one path: snapshot the resolved
//! values the edit can touch, apply it, then diff. Base-value changes on ids
//! covered by the `transition` property start an [`ElementTransition`]; every
//! resolved-value change marks the id's dirty axes and ripples inherited ids
//! down the tree.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::id::{ElementId, INVALID, NodeKind};
use super::store::Document;
use crate::animation::{AnimationState, ElementTransition};
use crate::dirty::DirtyAxes;
use crate::error::StyleError;
use crate::property::parse::parse_declarations;
use crate::property::{
    InterpolateContext, Keyword, PropertyId, PropertyIdSet, PropertyValue, ResolveContext,
    parse_value,
};
use crate::style::{CascadeMode, Combination, PropertySet};

impl Document {
    // -- Cascade queries --

    /// The inheriting cascade view of an element: its own layers, then
    /// ancestors for inherited ids.
    #[must_use]
    pub fn computed(&self, id: ElementId) -> Combination<'_> {
        self.validate(id);
        Combination::new(self, id.idx, CascadeMode::Global)
    }

    /// The element's own layers only.
    #[must_use]
    pub fn local(&self, id: ElementId) -> Combination<'_> {
        self.validate(id);
        Combination::new(self, id.idx, CascadeMode::Local)
    }

    /// The resolved value of one property.
    #[must_use]
    pub fn computed_property(&self, id: ElementId, property: PropertyId) -> Cow<'_, PropertyValue> {
        self.computed(id).resolve(property)
    }

    /// The definition layer last produced by the matcher.
    #[must_use]
    pub fn definition(&self, id: ElementId) -> &PropertySet {
        self.validate(id);
        &self.definition[id.idx as usize]
    }

    /// The inline layer.
    #[must_use]
    pub fn inline_style(&self, id: ElementId) -> &PropertySet {
        self.validate(id);
        &self.inline[id.idx as usize]
    }

    /// The animation layer, written by running animations and transitions.
    #[must_use]
    pub fn animation_layer(&self, id: ElementId) -> &PropertySet {
        self.validate(id);
        &self.animation[id.idx as usize]
    }

    /// Font size in pixels, with `em` and percentages resolved against the
    /// parent.
    #[must_use]
    pub fn font_size(&self, id: ElementId) -> f32 {
        self.validate(id);
        self.font_size_px(id.idx)
    }

    // -- Layer edits --

    /// Sets an inline value and returns the ids whose resolved value changed.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `value` is outside `property`'s value
    /// space. Use [`set_property`](Self::set_property) for unchecked text.
    pub fn set_inline(
        &mut self,
        id: ElementId,
        property: PropertyId,
        value: PropertyValue,
    ) -> PropertyIdSet {
        self.validate(id);
        assert!(
            property.accepts(&value),
            "{property} does not accept {value}"
        );
        let i = id.idx as usize;
        if self.inline[i].get(property) == Some(&value) {
            return PropertyIdSet::EMPTY;
        }
        let candidates = PropertyIdSet::EMPTY.with(property);
        self.edit_base(id.idx, candidates, |doc| {
            doc.inline[i].set(property, value);
        })
    }

    /// Deletes an inline value.
    pub fn remove_inline(&mut self, id: ElementId, property: PropertyId) -> PropertyIdSet {
        self.validate(id);
        let i = id.idx as usize;
        if !self.inline[i].contains(property) {
            return PropertyIdSet::EMPTY;
        }
        self.edit_base(id.idx, PropertyIdSet::EMPTY.with(property), |doc| {
            doc.inline[i].remove(property);
        })
    }

    /// Replaces the definition layer with a matched property vector.
    ///
    /// The vector is validated as a whole; on error nothing changes.
    ///
    /// # Errors
    ///
    /// [`StyleError::CategoryMismatch`] if a value has the wrong category for
    /// its id, [`StyleError::InvalidValue`] if it has the right category but
    /// is outside the id's value space.
    pub fn update_definition(
        &mut self,
        id: ElementId,
        set: PropertySet,
    ) -> Result<PropertyIdSet, StyleError> {
        self.validate(id);
        self.update_definition_at(id.idx, set)
    }

    /// Writes an animation-layer value directly.
    ///
    /// This is the hook running animations and transitions use; values set
    /// here are overwritten on the next
    /// [`update_render`](Self::update_render) for ids that are animating.
    ///
    /// # Errors
    ///
    /// The [`PropertyId::check`] errors; on error the layer is unchanged.
    pub fn set_animation_property(
        &mut self,
        id: ElementId,
        property: PropertyId,
        value: PropertyValue,
    ) -> Result<PropertyIdSet, StyleError> {
        self.validate(id);
        property.check(&value)?;
        Ok(self.set_animation_at(id.idx, property, value))
    }

    /// Deletes an animation-layer value.
    pub fn remove_animation_property(&mut self, id: ElementId, property: PropertyId) -> PropertyIdSet {
        self.validate(id);
        self.remove_animation_at(id.idx, property)
    }

    // -- String boundary --

    /// Sets (`Some`) or deletes (`None`) an inline value by CSS name.
    ///
    /// # Errors
    ///
    /// [`StyleError::UnknownProperty`] for an unknown name,
    /// [`StyleError::InvalidValue`] when the text does not parse.
    pub fn set_property(
        &mut self,
        id: ElementId,
        name: &str,
        value: Option<&str>,
    ) -> Result<PropertyIdSet, StyleError> {
        let property = lookup(name)?;
        match value {
            Some(text) => {
                let value = parse_value(property, text)?;
                Ok(self.set_inline(id, property, value))
            }
            None => Ok(self.remove_inline(id, property)),
        }
    }

    /// The resolved value of a property as text.
    ///
    /// # Errors
    ///
    /// [`StyleError::UnknownProperty`] for an unknown name.
    pub fn property(&self, id: ElementId, name: &str) -> Result<String, StyleError> {
        let property = lookup(name)?;
        Ok(self.computed_property(id, property).to_string())
    }

    /// Replaces the whole inline layer with the declarations in `text`.
    ///
    /// Unknown or unparsable declarations are skipped with a warning.
    pub fn set_style_attribute(&mut self, id: ElementId, text: &str) -> PropertyIdSet {
        self.validate(id);
        let mut set = PropertySet::new();
        for (name, value) in parse_declarations(text) {
            let parsed = lookup(&name).and_then(|property| {
                parse_value(property, &value).map(|value| (property, value))
            });
            match parsed {
                Ok((property, value)) => {
                    set.set(property, value);
                }
                Err(err) => log::warn!("{}: {err}", self.address_at(id.idx)),
            }
        }
        self.attributes[id.idx as usize].insert("style".to_string(), text.to_string());
        self.replace_inline(id.idx, set)
    }

    // -- Slot-level edits --

    pub(crate) fn update_definition_at(
        &mut self,
        idx: u32,
        set: PropertySet,
    ) -> Result<PropertyIdSet, StyleError> {
        for (property, value) in set.iter() {
            property.check(value)?;
        }
        let i = idx as usize;
        if self.definition[i].shares_storage_with(&set) || self.definition[i] == set {
            return Ok(PropertyIdSet::EMPTY);
        }
        let candidates = self.definition[i].ids().union(set.ids());
        Ok(self.edit_base(idx, candidates, |doc| doc.definition[i] = set))
    }

    pub(crate) fn replace_inline(&mut self, idx: u32, set: PropertySet) -> PropertyIdSet {
        let i = idx as usize;
        if self.inline[i] == set {
            return PropertyIdSet::EMPTY;
        }
        let candidates = self.inline[i].ids().union(set.ids());
        self.edit_base(idx, candidates, |doc| doc.inline[i] = set)
    }

    pub(crate) fn set_animation_at(
        &mut self,
        idx: u32,
        property: PropertyId,
        value: PropertyValue,
    ) -> PropertyIdSet {
        debug_assert!(property.accepts(&value), "{property} does not accept {value}");
        let before = self.resolve(idx, property).into_owned();
        self.animation[idx as usize].set(property, value);
        self.diff_one(idx, property, &before)
    }

    pub(crate) fn remove_animation_at(&mut self, idx: u32, property: PropertyId) -> PropertyIdSet {
        if !self.animation[idx as usize].contains(property) {
            return PropertyIdSet::EMPTY;
        }
        let before = self.resolve(idx, property).into_owned();
        self.animation[idx as usize].remove(property);
        self.diff_one(idx, property, &before)
    }

    fn diff_one(&mut self, idx: u32, property: PropertyId, before: &PropertyValue) -> PropertyIdSet {
        if *self.resolve(idx, property) == *before {
            return PropertyIdSet::EMPTY;
        }
        let changed = PropertyIdSet::EMPTY.with(property);
        self.changed_properties(idx, changed);
        changed
    }

    /// Applies an edit to the definition or inline layer.
    fn edit_base(
        &mut self,
        idx: u32,
        candidates: PropertyIdSet,
        edit: impl FnOnce(&mut Self),
    ) -> PropertyIdSet {
        let before: Vec<(PropertyId, PropertyValue, PropertyValue)> = candidates
            .iter()
            .map(|p| {
                (
                    p,
                    self.resolve(idx, p).into_owned(),
                    self.resolve_base(idx, p).into_owned(),
                )
            })
            .collect();
        edit(self);

        for (property, shown, base) in &before {
            let new_base = self.resolve_base(idx, *property).into_owned();
            if new_base != *base {
                self.on_base_changed(idx, *property, shown, new_base);
            }
        }

        let mut changed = PropertyIdSet::EMPTY;
        for (property, shown, _) in &before {
            if *self.resolve(idx, *property) != *shown {
                changed.insert(*property);
            }
        }
        self.changed_properties(idx, changed);
        changed
    }

    /// Starts, restarts or cancels the transition on `property` after its
    /// base value moved to `to`. `shown` is what was on screen before.
    fn on_base_changed(&mut self, idx: u32, property: PropertyId, shown: &PropertyValue, to: PropertyValue) {
        let i = idx as usize;
        // A delayed animation does not own the id until it starts.
        if self.animations[i]
            .get(&property)
            .is_some_and(|anim| anim.state() != AnimationState::Pending)
        {
            return;
        }
        let spec = self
            .resolve(idx, PropertyId::Transition)
            .as_transitions()
            .and_then(|list| list.find(property))
            .filter(|spec| spec.duration > 0.0 || spec.delay > 0.0)
            .cloned();

        match spec {
            Some(spec) if *shown != to && self.can_blend(idx, shown, &to) => {
                log::trace!("{}: transition {property} {shown} -> {to}", self.address_at(idx));
                let transition = ElementTransition::new(shown.clone(), to, self.time, &spec);
                let replaced = self.transitions[i].insert(property, transition).is_some();
                self.animation[i].set(property, shown.clone());
                self.mark(idx, DirtyAxes::TRANSITION);
                #[cfg(feature = "trace")]
                {
                    use crate::trace::TransitionEventKind;
                    if replaced {
                        self.queue_transition_event(idx, property, TransitionEventKind::Canceled);
                    }
                    self.queue_transition_event(idx, property, TransitionEventKind::Started);
                }
                #[cfg(not(feature = "trace"))]
                {
                    _ = replaced;
                }
            }
            _ => {
                self.cancel_transition(idx, property);
            }
        }
    }

    /// Drops a running transition and its animation-layer value without
    /// reporting the resolved change.
    pub(crate) fn cancel_transition(&mut self, idx: u32, property: PropertyId) -> bool {
        let i = idx as usize;
        if self.transitions[i].remove(&property).is_none() {
            return false;
        }
        self.animation[i].remove(property);
        #[cfg(feature = "trace")]
        self.queue_transition_event(idx, property, crate::trace::TransitionEventKind::Canceled);
        true
    }

    /// Buffers a transition event until the next render pass hands it to the
    /// tracer.
    #[cfg(feature = "trace")]
    pub(crate) fn queue_transition_event(
        &mut self,
        idx: u32,
        property: PropertyId,
        kind: crate::trace::TransitionEventKind,
    ) {
        self.pending_transitions.push(crate::trace::TransitionEvent {
            element_index: idx,
            property,
            kind,
            time: self.time,
        });
    }

    /// Reacts to resolved-value changes on one element.
    pub(crate) fn changed_properties(&mut self, idx: u32, changed: PropertyIdSet) {
        let i = idx as usize;
        if changed.is_empty() || self.kind[i] != NodeKind::Element {
            return;
        }
        let mut axes = DirtyAxes::EMPTY;
        for property in changed.iter() {
            axes |= property.axes();
            if property.affects_layout() {
                self.needs_layout[i] = true;
            }
            #[cfg(feature = "trace-rich")]
            self.pending_changes.push(crate::trace::PropertyChange {
                element_index: idx,
                property,
            });
        }
        self.mark(idx, axes);

        let parent = self.parent[i];
        if parent != INVALID {
            if changed.contains(PropertyId::ZIndex) || changed.contains(PropertyId::Display) {
                self.mark(parent, DirtyAxes::STACKING_CONTEXT);
            }
            if changed.contains(PropertyId::Display) {
                self.needs_layout[parent as usize] = true;
                self.mark(parent, DirtyAxes::STRUCTURE);
            }
        }
        if changed.contains(PropertyId::Opacity) {
            self.mark_subtree(idx, DirtyAxes::BACKGROUND);
        }
        if changed.contains(PropertyId::FontSize) {
            self.refresh_em_relative(idx);
        }
        if changed.contains(PropertyId::Transition) {
            self.prune_transitions(idx);
        }

        let inherited: PropertyIdSet = changed.iter().filter(|p| p.inherited()).collect();
        if inherited.is_empty() {
            return;
        }
        let mut c = self.first_child[i];
        while c != INVALID {
            if self.kind[c as usize] == NodeKind::Element {
                let mut down = PropertyIdSet::EMPTY;
                for property in inherited.iter() {
                    // A local font size may still be relative to ours.
                    if property == PropertyId::FontSize
                        || self.local_value(c, property).is_none()
                    {
                        down.insert(property);
                    }
                }
                self.changed_properties(c, down);
            }
            c = self.next_sibling[c as usize];
        }
    }

    /// Marks the axes of every id whose value is in `em`.
    fn refresh_em_relative(&mut self, idx: u32) {
        let mut axes = DirtyAxes::EMPTY;
        for &property in PropertyId::ALL {
            if property != PropertyId::FontSize && self.resolve(idx, property).is_em_relative() {
                axes |= property.axes();
                if property.affects_layout() {
                    self.needs_layout[idx as usize] = true;
                }
            }
        }
        self.mark(idx, axes);
    }

    /// Cancels transitions the `transition` list no longer covers.
    fn prune_transitions(&mut self, idx: u32) {
        let list = self.resolve(idx, PropertyId::Transition).into_owned();
        let list = list.as_transitions();
        let stale: Vec<PropertyId> = self.transitions[idx as usize]
            .keys()
            .copied()
            .filter(|&p| !list.is_some_and(|l| l.transitions(p)))
            .collect();
        if stale.is_empty() {
            return;
        }
        let mut changed = PropertyIdSet::EMPTY;
        for property in stale {
            self.cancel_transition(idx, property);
            changed.insert(property);
        }
        self.changed_properties(idx, changed);
    }

    // -- Resolution helpers --

    pub(crate) fn resolve(&self, idx: u32, property: PropertyId) -> Cow<'_, PropertyValue> {
        Combination::new(self, idx, CascadeMode::Global).resolve(property)
    }

    pub(crate) fn resolve_base(&self, idx: u32, property: PropertyId) -> Cow<'_, PropertyValue> {
        Combination::new(self, idx, CascadeMode::Base).resolve(property)
    }

    fn local_value(&self, idx: u32, property: PropertyId) -> Option<&PropertyValue> {
        Combination::new(self, idx, CascadeMode::Local).get(property)
    }

    pub(crate) fn font_size_px(&self, idx: u32) -> f32 {
        let parent = self.parent[idx as usize];
        let inherited = if parent == INVALID {
            self.config.root_font_size
        } else {
            self.font_size_px(parent)
        };
        match self
            .local_value(idx, PropertyId::FontSize)
            .and_then(PropertyValue::as_float)
        {
            Some(size) => {
                let ctx = ResolveContext {
                    font_size: inherited,
                    ..self.base_resolve_context()
                };
                size.resolve(&ctx, inherited)
            }
            None => inherited,
        }
    }

    pub(crate) fn resolve_context(&self, idx: u32) -> ResolveContext {
        ResolveContext {
            font_size: self.font_size_px(idx),
            ..self.base_resolve_context()
        }
    }

    fn base_resolve_context(&self) -> ResolveContext {
        ResolveContext {
            font_size: self.config.root_font_size,
            root_font_size: self.config.root_font_size,
            viewport: self.config.viewport,
            dp_ratio: self.config.dp_ratio,
        }
    }

    /// Runs `f` with the element state interpolation decisions depend on.
    pub(crate) fn with_interpolate_context<R>(
        &self,
        idx: u32,
        f: impl FnOnce(&InterpolateContext<'_>) -> R,
    ) -> R {
        let current = self.resolve(idx, PropertyId::Transform);
        let ctx = InterpolateContext {
            reference_box: self.layout[idx as usize].size(),
            current_transform: current.as_transform(),
        };
        f(&ctx)
    }

    /// Whether `from → to` blends on this element. Pairs that would only
    /// switch discretely apply at once instead of transitioning.
    fn can_blend(&self, idx: u32, from: &PropertyValue, to: &PropertyValue) -> bool {
        self.with_interpolate_context(idx, |ctx| from.blends_with(to, ctx))
    }

    /// Resolved keyword, or `None` for non-keyword values.
    pub(crate) fn keyword(&self, idx: u32, property: PropertyId) -> Option<Keyword> {
        self.resolve(idx, property).as_keyword()
    }
}

fn lookup(name: &str) -> Result<PropertyId, StyleError> {
    PropertyId::from_name(name).ok_or_else(|| StyleError::UnknownProperty(name.to_string()))
}
