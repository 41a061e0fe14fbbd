// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render pass: advancing animations and transitions in time.

use alloc::string::String;
use alloc::vec::Vec;

use super::id::ElementId;
use super::store::Document;
use crate::animation::{
    AnimationEvent, AnimationEventKind, ElementAnimation, ElementTransition, Keyframes,
};
use crate::dirty::Axis;
use crate::error::StyleError;
use crate::property::{AnimationList, PropertyId, PropertyIdSet};
use crate::trace::Tracer;

impl Document {
    /// Registers a keyframe set under its name, replacing any earlier set.
    ///
    /// Elements already listing the name start it on the next
    /// [`update_render`](Self::update_render).
    ///
    /// # Errors
    ///
    /// The [`PropertyId::check`] error of the first key whose value is
    /// outside its property's value space. Nothing is registered then.
    pub fn register_keyframes(&mut self, keyframes: Keyframes) -> Result<(), StyleError> {
        for property in keyframes.properties().iter() {
            for key in keyframes.track(property) {
                property.check(&key.value)?;
            }
        }
        let name = String::from(keyframes.name());
        for idx in 0..self.len {
            if !self.is_live_element(idx) {
                continue;
            }
            let applied = &mut self.applied_animations[idx as usize].0;
            let before = applied.len();
            applied.retain(|spec| spec.name != name);
            if applied.len() != before {
                self.axes[idx as usize].insert(Axis::Animation);
            }
        }
        self.keyframes.insert(name, keyframes);
        Ok(())
    }

    /// Looks up registered keyframes.
    #[must_use]
    pub fn keyframes(&self, name: &str) -> Option<&Keyframes> {
        self.keyframes.get(name)
    }

    /// Advances document time by `delta` seconds and steps every running
    /// animation and transition.
    ///
    /// Values land in the animation layer, so the resolved-value changes they
    /// cause are picked up by the next [`update`](Self::update).
    pub fn update_render(&mut self, delta: f64, tracer: &mut Tracer<'_>) {
        let delta = delta.max(0.0);
        self.time += delta;
        for idx in 0..self.len {
            if !self.is_live_element(idx) {
                continue;
            }
            let axes = self.axes[idx as usize];
            if axes.has(Axis::Animation) {
                self.advance_animations(idx, delta, tracer);
            }
            if axes.has(Axis::Transition) {
                self.advance_transitions(idx);
            }
        }
        #[cfg(feature = "trace")]
        for e in core::mem::take(&mut self.pending_transitions) {
            tracer.transition(&e);
        }
    }

    /// Returns and clears the queued animation events.
    pub fn take_events(&mut self) -> Vec<AnimationEvent> {
        core::mem::take(&mut self.events)
    }

    /// Whether any animation or transition still needs frames.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        (0..self.len).any(|idx| {
            self.is_live_element(idx)
                && (self.axes[idx as usize].has(Axis::Animation)
                    || self.axes[idx as usize].has(Axis::Transition))
        })
    }

    /// The animation driving `property`, if any.
    #[must_use]
    pub fn animation(&self, id: ElementId, property: PropertyId) -> Option<&ElementAnimation> {
        self.validate(id);
        self.animations[id.idx as usize].get(&property)
    }

    /// The transition running on `property`, if any.
    #[must_use]
    pub fn transition(&self, id: ElementId, property: PropertyId) -> Option<&ElementTransition> {
        self.validate(id);
        self.transitions[id.idx as usize].get(&property)
    }

    fn advance_animations(&mut self, idx: u32, delta: f64, tracer: &mut Tracer<'_>) {
        let i = idx as usize;
        let list = self
            .resolve(idx, PropertyId::Animation)
            .as_animations()
            .cloned()
            .unwrap_or_default();
        let fresh = if list == self.applied_animations[i] {
            PropertyIdSet::EMPTY
        } else {
            let fresh = self.reconcile_animations(idx, &list, tracer);
            self.applied_animations[i] = list;
            fresh
        };

        let ids: Vec<PropertyId> = self.animations[i].keys().copied().collect();
        for property in ids {
            let step = {
                let Some(anim) = self.animations[i].get_mut(&property) else {
                    continue;
                };
                // Tracks started this frame begin at zero.
                let step = anim.advance(if fresh.contains(property) { 0.0 } else { delta });
                if anim.lead {
                    let (name, elapsed) = (anim.spec.name.clone(), anim.elapsed);
                    let mut kinds = Vec::new();
                    if step.started {
                        kinds.push(AnimationEventKind::Start);
                    }
                    kinds.extend((0..step.iterations).map(|_| AnimationEventKind::Iteration));
                    if step.completed {
                        kinds.push(AnimationEventKind::End);
                    }
                    for kind in kinds {
                        self.emit(idx, kind, name.clone(), elapsed, tracer);
                    }
                }
                step
            };
            if step.started && self.cancel_transition(idx, property) {
                // Taking over from a transition that ran during the delay.
                self.changed_properties(idx, PropertyIdSet::EMPTY.with(property));
            }
            if step.completed {
                self.animations[i].remove(&property);
                self.remove_animation_at(idx, property);
                continue;
            }
            let value = match self.animations[i].get(&property) {
                Some(anim) => self.with_interpolate_context(idx, |ctx| anim.sample(ctx)),
                None => None,
            };
            if let Some(value) = value {
                self.set_animation_at(idx, property, value);
            }
        }
        if self.animations[i].is_empty() {
            self.axes[i].remove(Axis::Animation);
        }
    }

    /// Brings the running tracks in line with `list`; returns the ids of
    /// tracks started.
    fn reconcile_animations(
        &mut self,
        idx: u32,
        list: &AnimationList,
        tracer: &mut Tracer<'_>,
    ) -> PropertyIdSet {
        let i = idx as usize;
        let listed = |name: &str| list.iter().any(|spec| spec.name == name);

        let dropped: Vec<PropertyId> = self.animations[i]
            .iter()
            .filter(|(_, anim)| !listed(&anim.spec.name))
            .map(|(&p, _)| p)
            .collect();
        for property in dropped {
            if let Some(anim) = self.animations[i].remove(&property) {
                if anim.lead {
                    self.emit(idx, AnimationEventKind::Cancel, anim.spec.name, anim.elapsed, tracer);
                }
            }
            self.remove_animation_at(idx, property);
        }

        for anim in self.animations[i].values_mut() {
            if let Some(spec) = list.iter().rev().find(|s| s.name == anim.spec.name) {
                anim.spec = spec.clone();
            }
        }

        let mut fresh = PropertyIdSet::EMPTY;
        let mut retargeted = PropertyIdSet::EMPTY;
        for spec in list.iter() {
            if self.applied_animations[i]
                .iter()
                .any(|s| s.name == spec.name)
            {
                continue;
            }
            let Some(keyframes) = self.keyframes.get(&spec.name).cloned() else {
                log::warn!(
                    "{}: {}",
                    self.address_at(idx),
                    StyleError::UnknownKeyframes(spec.name.clone())
                );
                continue;
            };
            for property in keyframes.properties().iter() {
                if self.cancel_transition(idx, property) {
                    retargeted.insert(property);
                }
                let base = self.resolve_base(idx, property).into_owned();
                let anim = ElementAnimation::new(spec.clone(), keyframes.track(property), &base, false);
                self.animations[i].insert(property, anim);
                fresh.insert(property);
            }
            log::debug!("{}: animation {} started", self.address_at(idx), spec.name);
        }

        // The first remaining track of each animation reports its events.
        let mut leads: Vec<String> = Vec::new();
        for anim in self.animations[i].values_mut() {
            anim.lead = !leads.contains(&anim.spec.name);
            if anim.lead {
                leads.push(anim.spec.name.clone());
            }
        }
        self.changed_properties(idx, retargeted);
        fresh
    }

    fn advance_transitions(&mut self, idx: u32) {
        let i = idx as usize;
        let now = self.time;
        let epsilon = self.config.transition_epsilon;
        let ids: Vec<PropertyId> = self.transitions[i].keys().copied().collect();
        for property in ids {
            let value = match self.transitions[i].get(&property) {
                Some(t) if t.is_finished(now, epsilon) => None,
                Some(t) => Some(self.with_interpolate_context(idx, |ctx| t.value_at(now, ctx))),
                None => continue,
            };
            match value {
                Some(value) => {
                    self.set_animation_at(idx, property, value);
                }
                None => {
                    self.transitions[i].remove(&property);
                    self.remove_animation_at(idx, property);
                    #[cfg(feature = "trace")]
                    self.queue_transition_event(
                        idx,
                        property,
                        crate::trace::TransitionEventKind::Finished,
                    );
                }
            }
        }
        if self.transitions[i].is_empty() {
            self.axes[i].remove(Axis::Transition);
        }
    }

    fn emit(
        &mut self,
        idx: u32,
        kind: AnimationEventKind,
        name: String,
        elapsed: f64,
        tracer: &mut Tracer<'_>,
    ) {
        let event = AnimationEvent {
            element: self.handle(idx),
            kind,
            name,
            elapsed,
        };
        tracer.animation(&event);
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationState;
    use crate::matcher::NullMatcher;
    use crate::property::{AnimationSpec, Easing, PropertyFloat, PropertyValue};

    fn number(v: f32) -> PropertyValue {
        PropertyValue::from(PropertyFloat::number(v))
    }

    fn fade() -> Keyframes {
        Keyframes::new("fade")
            .with_key(0.0, PropertyId::Opacity, PropertyFloat::number(0.0))
            .with_key(1.0, PropertyId::Opacity, PropertyFloat::number(1.0))
    }

    fn start(doc: &mut Document, el: ElementId, spec: AnimationSpec) {
        doc.set_inline(el, PropertyId::Animation, AnimationList(alloc::vec![spec]).into());
    }

    fn opacity(doc: &Document, el: ElementId) -> f32 {
        doc.computed_property(el, PropertyId::Opacity)
            .as_float()
            .map_or(f32::NAN, |f| f.value)
    }

    #[test]
    fn animation_runs_and_reports_lifecycle() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.register_keyframes(fade()).unwrap();
        start(&mut doc, el, AnimationSpec::new("fade", 1.0).with_easing(Easing::Linear));

        doc.update_render(0.016, &mut Tracer::none());
        assert_eq!(opacity(&doc, el), 0.0);
        doc.update_render(0.5, &mut Tracer::none());
        assert!((opacity(&doc, el) - 0.5).abs() < 1e-6);
        doc.update_render(0.5, &mut Tracer::none());
        assert_eq!(opacity(&doc, el), 1.0, "back to the initial value");
        assert!(doc.animation(el, PropertyId::Opacity).is_none());
        assert!(!doc.is_animating());

        let kinds: Vec<_> = doc.take_events().into_iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [AnimationEventKind::Start, AnimationEventKind::End]);
    }

    #[test]
    fn removing_the_animation_cancels_it() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.register_keyframes(fade()).unwrap();
        start(&mut doc, el, AnimationSpec::new("fade", 1.0).infinite());
        doc.update_render(0.0, &mut Tracer::none());
        doc.update_render(0.25, &mut Tracer::none());
        assert!(doc.animation_layer(el).contains(PropertyId::Opacity));

        doc.remove_inline(el, PropertyId::Animation);
        doc.update_render(0.1, &mut Tracer::none());
        assert!(doc.animation_layer(el).is_empty());
        let events = doc.take_events();
        assert_eq!(events.last().map(|e| e.kind), Some(AnimationEventKind::Cancel));
        assert_eq!(events.last().map(|e| e.name.as_str()), Some("fade"));
    }

    #[test]
    fn unknown_keyframes_start_once_registered() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        start(&mut doc, el, AnimationSpec::new("fade", 1.0).with_easing(Easing::Linear));
        doc.update_render(0.1, &mut Tracer::none());
        assert!(doc.animation(el, PropertyId::Opacity).is_none());

        doc.register_keyframes(fade()).unwrap();
        doc.update_render(0.1, &mut Tracer::none());
        let anim = doc.animation(el, PropertyId::Opacity).unwrap();
        assert_eq!(anim.state(), AnimationState::Running);
        assert_eq!(anim.elapsed(), 0.0);
    }

    #[test]
    fn transition_steps_and_finishes() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.set_property(el, "transition", Some("opacity 1s linear")).unwrap();
        doc.set_inline(el, PropertyId::Opacity, number(0.0));
        doc.update(&NullMatcher, &mut Tracer::none());

        doc.update_render(0.25, &mut Tracer::none());
        assert!((opacity(&doc, el) - 0.75).abs() < 1e-3);
        assert!(doc.is_animating());

        // Retarget mid-flight: restarts from the value on screen.
        doc.set_inline(el, PropertyId::Opacity, number(1.0));
        let t = doc.transition(el, PropertyId::Opacity).unwrap();
        assert!((t.from().as_float().unwrap().value - 0.75).abs() < 1e-3);
        assert_eq!(t.start_time(), 0.25);

        doc.update_render(1.0, &mut Tracer::none());
        assert_eq!(opacity(&doc, el), 1.0);
        assert!(doc.transition(el, PropertyId::Opacity).is_none());
        assert!(!doc.is_animating());
    }

    #[test]
    fn animation_start_cancels_transition_on_the_same_id() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.register_keyframes(fade()).unwrap();
        doc.set_property(el, "transition", Some("opacity 1s linear")).unwrap();
        doc.set_inline(el, PropertyId::Opacity, number(0.0));
        assert!(doc.transition(el, PropertyId::Opacity).is_some());

        start(&mut doc, el, AnimationSpec::new("fade", 1.0).with_easing(Easing::Linear));
        doc.update_render(0.0, &mut Tracer::none());
        assert!(doc.transition(el, PropertyId::Opacity).is_none());
        assert!(doc.animation(el, PropertyId::Opacity).is_some());
    }
}
