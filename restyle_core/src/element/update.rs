// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The update pass: ordered, idempotent recomputation of derived state.
//!
//! [`Document::update`] drains one axis at a time in [`Axis::ORDERED`] order.
//! Within an axis, dirty elements are visited parent-before-child, and the
//! axis is drained repeatedly until it stays empty, so work a recompute pushes
//! onto its own descendants lands in the same pass:
//!
//! ```text
//! for axis in ORDERED:
//!     loop:
//!         batch = drain(axis), sorted by depth
//!         if batch is empty: break
//!         for idx in batch: clear bit, recompute, maybe mark others
//! ```
//!
//! Marks on later axes are picked up when the loop reaches them. Marks on
//! axes already drained stay in the tracker and are reported as
//! [`UpdateReport::deferred`].

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Insets, Vec2};

use super::background::BackgroundStyle;
use super::clip::ElementClip;
use super::id::{ElementId, INVALID, NodeKind};
use super::store::Document;
use crate::dirty::{Axis, DirtyAxes};
use crate::matcher::{AncestorInfo, MatchQuery, StyleMatcher};
use crate::property::{Color, Keyword, PropertyId, ResolveContext};
use crate::trace::{AxisRecomputedEvent, Tracer, UpdateBeginEvent, UpdateEndEvent};
use crate::transform::Transform3d;

/// The elements one [`Document::update`] call recomputed, per axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateReport {
    /// Elements re-matched.
    pub definition: Vec<ElementId>,
    /// Elements whose child lists were rebuilt.
    pub structure: Vec<ElementId>,
    /// Elements whose perspective matrix was recomputed.
    pub perspective: Vec<ElementId>,
    /// Elements whose transform was recomputed.
    pub transform: Vec<ElementId>,
    /// Elements whose clip was recomputed.
    pub clip: Vec<ElementId>,
    /// Elements whose render order was recomputed.
    pub stacking_context: Vec<ElementId>,
    /// Elements whose paint batches were rebuilt.
    pub background: Vec<ElementId>,
    /// Axes re-dirtied behind the pass, left for the next call.
    pub deferred: DirtyAxes,
}

impl UpdateReport {
    /// The elements recomputed for `axis`. Always empty for the time axes.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &[ElementId] {
        match axis {
            Axis::Definition => &self.definition,
            Axis::Structure => &self.structure,
            Axis::Perspective => &self.perspective,
            Axis::Transform => &self.transform,
            Axis::Clip => &self.clip,
            Axis::StackingContext => &self.stacking_context,
            Axis::Background => &self.background,
            Axis::Animation | Axis::Transition => &[],
        }
    }

    /// Whether nothing was recomputed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Total recomputations across all axes.
    #[must_use]
    pub fn total(&self) -> usize {
        Axis::ORDERED.iter().map(|&a| self.axis(a).len()).sum()
    }

    fn counts(&self) -> [usize; 7] {
        Axis::ORDERED.map(|a| self.axis(a).len())
    }

    fn push(&mut self, axis: Axis, id: ElementId) {
        let list = match axis {
            Axis::Definition => &mut self.definition,
            Axis::Structure => &mut self.structure,
            Axis::Perspective => &mut self.perspective,
            Axis::Transform => &mut self.transform,
            Axis::Clip => &mut self.clip,
            Axis::StackingContext => &mut self.stacking_context,
            Axis::Background => &mut self.background,
            Axis::Animation | Axis::Transition => return,
        };
        list.push(id);
    }
}

impl Document {
    /// Recomputes every stale axis, in order, across the whole tree.
    ///
    /// Calling this twice with no mutation in between does no work the second
    /// time.
    pub fn update(&mut self, matcher: &dyn StyleMatcher, tracer: &mut Tracer<'_>) -> UpdateReport {
        self.pass_index += 1;
        let pass_index = self.pass_index;
        tracer.update_begin(&UpdateBeginEvent {
            pass_index,
            time: self.time,
        });
        #[cfg(feature = "trace-rich")]
        {
            let changes = core::mem::take(&mut self.pending_changes);
            if !changes.is_empty() {
                tracer.property_changes(pass_index, &changes);
            }
        }

        let mut report = UpdateReport::default();
        for axis in Axis::ORDERED {
            loop {
                let mut batch: Vec<u32> = self
                    .dirty
                    .drain(axis.channel())
                    .deterministic()
                    .run()
                    .collect();
                // Entries already handled earlier in this loop come back from
                // the tracker with their bit cleared.
                batch.retain(|&idx| self.is_live_element(idx) && self.axes[idx as usize].has(axis));
                if batch.is_empty() {
                    break;
                }
                batch.sort_by_key(|&idx| self.depth(idx));
                for idx in batch {
                    if !self.axes[idx as usize].has(axis) {
                        continue;
                    }
                    self.axes[idx as usize].remove(axis);
                    let changed = match axis {
                        Axis::Definition => self.recompute_definition(idx, matcher),
                        Axis::Structure => self.recompute_structure(idx),
                        Axis::Perspective => self.recompute_perspective(idx),
                        Axis::Transform => self.recompute_transform(idx),
                        Axis::Clip => self.recompute_clip(idx),
                        Axis::StackingContext => self.recompute_stacking_context(idx),
                        Axis::Background => self.recompute_background(idx),
                        Axis::Animation | Axis::Transition => false,
                    };
                    tracer.axis_recomputed(&AxisRecomputedEvent {
                        pass_index,
                        axis,
                        element_index: idx,
                        changed,
                    });
                    report.push(axis, self.handle(idx));
                }
            }
        }

        let mut deferred = DirtyAxes::EMPTY;
        for idx in 0..self.len {
            if self.is_live_element(idx) {
                for axis in Axis::ORDERED {
                    if self.axes[idx as usize].has(axis) {
                        deferred.insert(axis);
                    }
                }
            }
        }
        report.deferred = deferred;
        if report.total() > 0 {
            log::debug!(
                "update #{pass_index}: {} recomputations, deferred {deferred:?}",
                report.total()
            );
        }
        tracer.update_end(&UpdateEndEvent {
            pass_index,
            recomputed: report.counts(),
            deferred,
        });
        report
    }

    /// Runs [`update`](Self::update) until nothing is deferred, at most
    /// [`max_update_passes`](crate::StyleConfig::max_update_passes) times.
    pub fn update_until_clean(
        &mut self,
        matcher: &dyn StyleMatcher,
        tracer: &mut Tracer<'_>,
    ) -> Vec<UpdateReport> {
        let mut reports = Vec::new();
        for _ in 0..self.config.max_update_passes.max(1) {
            let report = self.update(matcher, tracer);
            let done = report.deferred.is_empty();
            reports.push(report);
            if done {
                break;
            }
        }
        reports
    }

    /// Product of the element's and its ancestors' opacity.
    #[must_use]
    pub fn effective_opacity(&self, id: ElementId) -> f32 {
        self.validate(id);
        self.effective_opacity_at(id.idx)
    }

    /// Describes an element to a [`StyleMatcher`].
    pub(crate) fn match_query(&self, idx: u32) -> MatchQuery<'_> {
        let i = idx as usize;
        let mut ancestors = Vec::new();
        let mut p = self.parent[i];
        while p != INVALID {
            let pi = p as usize;
            ancestors.push(AncestorInfo {
                tag: &self.tag[pi],
                id: self.id_attribute(p),
                classes: &self.classes[pi],
                pseudo_classes: self.pseudo[pi],
            });
            p = self.parent[pi];
        }
        MatchQuery {
            element: self.handle(idx),
            tag: &self.tag[i],
            id: self.id_attribute(idx),
            classes: &self.classes[i],
            pseudo_classes: self.pseudo[i],
            ancestors,
        }
    }

    fn recompute_definition(&mut self, idx: u32, matcher: &dyn StyleMatcher) -> bool {
        let matched = matcher.match_element(&self.match_query(idx));
        match self.update_definition_at(idx, matched) {
            Ok(changed) => !changed.is_empty(),
            Err(err) => {
                log::warn!("{}: matcher output rejected: {err}", self.address_at(idx));
                false
            }
        }
    }

    fn recompute_structure(&mut self, idx: u32) -> bool {
        let i = idx as usize;
        let mut children = Vec::new();
        let mut c = self.first_child[i];
        while c != INVALID {
            if self.kind[c as usize] == NodeKind::Element {
                children.push(c);
            }
            c = self.next_sibling[c as usize];
        }
        let changed = self.element_children[i] != children;
        self.element_children[i] = children;
        self.child_index[i].take();
        self.mark(idx, DirtyAxes::STACKING_CONTEXT);
        changed
    }

    fn recompute_perspective(&mut self, idx: u32) -> bool {
        let i = idx as usize;
        let ctx = self.resolve_context(idx);
        let size = self.layout[i].size();
        let distance = self
            .resolve(idx, PropertyId::Perspective)
            .as_float()
            .map_or(0.0, |d| f64::from(d.resolve(&ctx, 0.0)));
        let matrix = if distance > 0.0 {
            let ox = self.length(idx, PropertyId::PerspectiveOriginX, size.width, &ctx);
            let oy = self.length(idx, PropertyId::PerspectiveOriginY, size.height, &ctx);
            Transform3d::from_translation(ox, oy, 0.0)
                * Transform3d::from_perspective(distance)
                * Transform3d::from_translation(-ox, -oy, 0.0)
        } else {
            Transform3d::IDENTITY
        };
        if self.perspective[i] == matrix {
            return false;
        }
        self.perspective[i] = matrix;
        self.mark_children(idx, DirtyAxes::TRANSFORM);
        true
    }

    fn recompute_transform(&mut self, idx: u32) -> bool {
        let i = idx as usize;
        let p = self.parent[i];
        let (parent_transform, parent_perspective, scroll, parent_size) = if p == INVALID {
            (
                Transform3d::IDENTITY,
                Transform3d::IDENTITY,
                Vec2::ZERO,
                self.config.viewport,
            )
        } else {
            let pi = p as usize;
            (
                self.transform[pi],
                self.perspective[pi],
                self.scroll_offset[pi],
                self.layout[pi].size(),
            )
        };
        let ctx = self.resolve_context(idx);
        let layout = self.layout[i];
        let size = layout.size();

        let left = self.length(idx, PropertyId::Left, parent_size.width, &ctx);
        let top = self.length(idx, PropertyId::Top, parent_size.height, &ctx);
        let origin = Vec2::new(
            layout.bounds.x0 + left - scroll.x,
            layout.bounds.y0 + top - scroll.y,
        );

        let local = match self.resolve(idx, PropertyId::Transform).as_transform() {
            Some(t) if !t.is_none() => {
                let tx = self.length(idx, PropertyId::TransformOriginX, size.width, &ctx);
                let ty = self.length(idx, PropertyId::TransformOriginY, size.height, &ctx);
                let tz = self.length(idx, PropertyId::TransformOriginZ, 0.0, &ctx);
                Transform3d::from_translation(tx, ty, tz)
                    * t.to_matrix(&ctx, size)
                    * Transform3d::from_translation(-tx, -ty, -tz)
            }
            _ => Transform3d::IDENTITY,
        };
        let transform = parent_transform
            * parent_perspective
            * Transform3d::from_translation(origin.x, origin.y, 0.0)
            * local;

        if self.transform[i] == transform {
            return false;
        }
        self.transform[i] = transform;
        self.inverse[i].take();
        self.mark(idx, DirtyAxes::CLIP);
        self.mark_children(idx, DirtyAxes::TRANSFORM);
        true
    }

    fn recompute_clip(&mut self, idx: u32) -> bool {
        let i = idx as usize;
        let own = match self.keyword(idx, PropertyId::Overflow) {
            Some(Keyword::Visible) | None => ElementClip::None,
            Some(_) => {
                ElementClip::from_local_rect(self.layout[i].padding_box(), &self.transform[i])
            }
        };
        let p = self.parent[i];
        let inherited = if p == INVALID {
            ElementClip::None
        } else {
            self.clip[p as usize]
        };
        let clip = own.intersect(inherited);
        if self.clip[i] == clip {
            return false;
        }
        self.clip[i] = clip;
        self.mark_children(idx, DirtyAxes::CLIP);
        true
    }

    fn recompute_stacking_context(&mut self, idx: u32) -> bool {
        let i = idx as usize;
        let mut order: Vec<(u32, f32)> = self.element_children[i]
            .iter()
            .copied()
            .filter(|&c| self.keyword(c, PropertyId::Display) != Some(Keyword::None))
            .map(|c| (c, self.z_index(c)))
            .collect();
        // `sort_by` is stable, so equal z-index keeps document order.
        order.sort_by(|a, b| a.1.total_cmp(&b.1));
        let order: Vec<u32> = order.into_iter().map(|(c, _)| c).collect();
        if self.render_children[i] == order {
            return false;
        }
        self.render_children[i] = order;
        true
    }

    fn recompute_background(&mut self, idx: u32) -> bool {
        let i = idx as usize;
        let hidden = self.keyword(idx, PropertyId::Visibility) == Some(Keyword::Hidden)
            || self.keyword(idx, PropertyId::Display) == Some(Keyword::None);
        let batches = if hidden {
            Vec::new()
        } else {
            let ctx = self.resolve_context(idx);
            let width = self.layout[i].size().width;
            let edge = |p| self.length(idx, p, width, &ctx);
            let color = |p| {
                self.resolve(idx, p)
                    .as_color()
                    .unwrap_or(Color::TRANSPARENT)
            };
            let style = BackgroundStyle {
                background: color(PropertyId::BackgroundColor),
                image: self
                    .resolve(idx, PropertyId::BackgroundImage)
                    .as_str()
                    .map(String::from),
                border: Insets::new(
                    edge(PropertyId::BorderLeftWidth),
                    edge(PropertyId::BorderTopWidth),
                    edge(PropertyId::BorderRightWidth),
                    edge(PropertyId::BorderBottomWidth),
                ),
                border_color: color(PropertyId::BorderColor),
                radius: edge(PropertyId::BorderRadius),
                opacity: self.effective_opacity_at(idx),
            };
            style.build(&self.layout[i])
        };
        if self.background[i] == batches {
            return false;
        }
        self.background[i] = batches;
        true
    }

    /// A length-valued property in pixels; `auto` and other keywords are 0.
    fn length(&self, idx: u32, property: PropertyId, percent_base: f64, ctx: &ResolveContext) -> f64 {
        self.resolve(idx, property)
            .as_float()
            .map_or(0.0, |f| f64::from(f.resolve(ctx, percent_base as f32)))
    }

    fn z_index(&self, idx: u32) -> f32 {
        self.resolve(idx, PropertyId::ZIndex)
            .as_float()
            .map_or(0.0, |f| f.value)
    }

    pub(crate) fn effective_opacity_at(&self, idx: u32) -> f32 {
        let mut opacity = 1.0;
        let mut n = idx;
        while n != INVALID {
            let own = self
                .resolve(n, PropertyId::Opacity)
                .as_float()
                .map_or(1.0, |f| f.value.clamp(0.0, 1.0));
            opacity *= own;
            n = self.parent[n as usize];
        }
        opacity
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Size};

    use super::*;
    use crate::element::{LayoutBox, PaintBatch};
    use crate::matcher::NullMatcher;
    use crate::property::{PropertyFloat, PropertyValue, Transform, TransformFunction};
    use crate::style::PropertySet;

    fn run(doc: &mut Document) -> UpdateReport {
        doc.update(&NullMatcher, &mut Tracer::none())
    }

    fn sized(doc: &mut Document, id: ElementId, x: f64, y: f64, w: f64, h: f64) {
        doc.set_layout_box(id, LayoutBox::new(x, y, Size::new(w, h)));
    }

    #[test]
    fn second_update_does_nothing() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_element("div");
        doc.append_child(root, child);
        let first = run(&mut doc);
        assert!(!first.is_empty());
        assert!(first.deferred.is_empty());
        assert!(doc.is_clean());

        let second = run(&mut doc);
        assert!(second.is_empty(), "{second:?}");
    }

    #[test]
    fn transforms_compose_parent_first() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_element("div");
        doc.append_child(root, child);
        sized(&mut doc, root, 10.0, 20.0, 100.0, 100.0);
        sized(&mut doc, child, 5.0, 5.0, 10.0, 10.0);
        run(&mut doc);

        assert_eq!(
            doc.transform(child),
            Transform3d::from_translation(15.0, 25.0, 0.0)
        );
        let inverse = doc.inverse_transform(child).unwrap();
        let origin = inverse.transform_point(kurbo::Point::new(15.0, 25.0));
        assert!(origin.x.abs() < 1e-9 && origin.y.abs() < 1e-9, "{origin:?}");

        // Scrolling the parent moves only the child.
        doc.set_scroll_offset(root, Vec2::new(0.0, 5.0));
        let report = run(&mut doc);
        assert_eq!(report.transform, [child]);
        assert_eq!(
            doc.transform(child),
            Transform3d::from_translation(15.0, 20.0, 0.0)
        );
    }

    #[test]
    fn transform_property_applies_about_origin() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        sized(&mut doc, el, 0.0, 0.0, 20.0, 20.0);
        let scale = Transform::new(alloc::vec![TransformFunction::Scale(
            PropertyFloat::number(2.0),
            PropertyFloat::number(2.0),
            PropertyFloat::number(1.0),
        )]);
        doc.set_inline(el, PropertyId::Transform, scale.into());
        run(&mut doc);
        // Scaling by 2 about the center (10, 10) maps the center to itself.
        let center = doc.transform(el).transform_point(kurbo::Point::new(10.0, 10.0));
        assert!((center.x - 10.0).abs() < 1e-9 && (center.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn overflow_clip_is_inherited_and_intersected() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_element("div");
        doc.append_child(root, child);
        sized(&mut doc, root, 0.0, 0.0, 50.0, 50.0);
        sized(&mut doc, child, 25.0, 25.0, 100.0, 100.0);
        doc.set_property(root, "overflow", Some("hidden")).unwrap();
        run(&mut doc);
        assert_eq!(doc.clip(root), ElementClip::Scissor(Rect::new(0.0, 0.0, 50.0, 50.0)));
        // The child is visible-overflow and inherits the parent's region.
        assert_eq!(doc.clip(child), ElementClip::Scissor(Rect::new(0.0, 0.0, 50.0, 50.0)));

        doc.set_property(child, "overflow", Some("scroll")).unwrap();
        run(&mut doc);
        assert_eq!(
            doc.clip(child),
            ElementClip::Scissor(Rect::new(25.0, 25.0, 50.0, 50.0))
        );
    }

    #[test]
    fn render_children_sort_by_z_index_and_skip_hidden() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        let c = doc.create_element("c");
        let text = doc.create_text("t");
        for n in [a, text, b, c] {
            doc.append_child(root, n);
        }
        doc.set_property(a, "z-index", Some("2")).unwrap();
        doc.set_property(c, "display", Some("none")).unwrap();
        run(&mut doc);
        assert_eq!(doc.render_children(root).collect::<Vec<_>>(), [b, a]);

        doc.set_property(c, "display", Some("block")).unwrap();
        let report = run(&mut doc);
        assert!(report.stacking_context.contains(&root));
        assert_eq!(doc.render_children(root).collect::<Vec<_>>(), [b, c, a]);
    }

    #[test]
    fn structure_change_resolves_stacking_in_the_same_pass() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(root, a);
        run(&mut doc);

        doc.append_child(root, b);
        assert!(doc.dirty_axes(root).has(Axis::Structure));
        assert!(!doc.dirty_axes(a).has(Axis::Structure));
        let report = run(&mut doc);
        assert_eq!(report.structure, [root]);
        assert_eq!(report.stacking_context, [root]);
        assert!(report.deferred.is_empty());
        assert_eq!(doc.render_children(root).count(), 2);
    }

    #[test]
    fn background_batches_multiply_ancestor_opacity() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_element("div");
        doc.append_child(root, child);
        sized(&mut doc, child, 0.0, 0.0, 10.0, 10.0);
        doc.set_property(root, "opacity", Some("0.5")).unwrap();
        doc.set_property(child, "background-color", Some("#ff0000")).unwrap();
        run(&mut doc);
        assert!((doc.effective_opacity(child) - 0.5).abs() < 1e-6);
        match doc.background(child) {
            [PaintBatch::Fill { color, .. }] => assert_eq!(color.a, 128),
            other => panic!("unexpected batches {other:?}"),
        }

        doc.set_property(child, "visibility", Some("hidden")).unwrap();
        run(&mut doc);
        assert!(doc.background(child).is_empty());
    }

    #[test]
    fn matcher_feeds_the_definition_layer() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let item = doc.create_element("span");
        doc.append_child(root, item);
        doc.set_attribute(item, "class", "warn");
        let matcher = |q: &MatchQuery<'_>| {
            if q.has_class("warn") && q.ancestors.first().is_some_and(|a| a.tag == "div") {
                PropertySet::from([(PropertyId::Color, Color::rgb(255, 0, 0).into())])
            } else {
                PropertySet::new()
            }
        };
        let report = doc.update(&matcher, &mut Tracer::none());
        assert!(report.definition.contains(&item));
        assert_eq!(
            *doc.computed_property(item, PropertyId::Color),
            PropertyValue::from(Color::rgb(255, 0, 0))
        );

        doc.set_class(item, "warn", false);
        doc.update(&matcher, &mut Tracer::none());
        assert_eq!(
            *doc.computed_property(item, PropertyId::Color),
            PropertyValue::from(Color::BLACK)
        );
    }

    #[test]
    fn rejected_matcher_output_keeps_previous_layer() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        let matcher = |_: &MatchQuery<'_>| {
            PropertySet::from([(PropertyId::Opacity, Color::WHITE.into())])
        };
        let report = doc.update(&matcher, &mut Tracer::none());
        assert_eq!(report.definition, [el]);
        assert!(doc.definition(el).is_empty());
    }

    #[test]
    fn update_until_clean_stops_after_one_clean_pass() {
        let mut doc = Document::new();
        let _root = doc.create_element("div");
        let reports = doc.update_until_clean(&NullMatcher, &mut Tracer::none());
        assert_eq!(reports.len(), 1);
        assert!(doc.is_clean());
    }
}
