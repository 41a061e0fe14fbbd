// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point projection and hit testing.
//!
//! Both read the caches the update pass maintains (transform, clip and render
//! order), so results reflect the last [`Document::update`].

use kurbo::Point;

use super::id::{ElementId, NodeKind};
use super::store::Document;
use crate::property::{Keyword, PropertyId};

impl Document {
    /// Maps a document-space point into the element's local space, where the
    /// border box spans `(0, 0)` to its size.
    ///
    /// Returns `None` when the element's transform is singular or its plane
    /// is seen edge-on.
    #[must_use]
    pub fn project(&self, id: ElementId, point: Point) -> Option<Point> {
        self.inverse_transform(id)?.unproject_point(point)
    }

    /// The topmost element under `point`, searching every root.
    ///
    /// Later roots paint over earlier ones. Within a tree, children are
    /// searched in reverse render order before their parent.
    #[must_use]
    pub fn element_from_point(&self, point: Point) -> Option<ElementId> {
        self.roots()
            .into_iter()
            .rev()
            .filter(|root| self.kind[root.idx as usize] == NodeKind::Element)
            .find_map(|root| self.hit(root.idx, point))
    }

    /// The topmost descendant of `id` under `point`, not counting `id`.
    #[must_use]
    pub fn child_from_point(&self, id: ElementId, point: Point) -> Option<ElementId> {
        self.validate(id);
        self.hit_children(id.idx, point)
    }

    fn hit(&self, idx: u32, point: Point) -> Option<ElementId> {
        let i = idx as usize;
        if self.keyword(idx, PropertyId::Display) == Some(Keyword::None)
            || !self.clip[i].contains(point)
        {
            return None;
        }
        if let Some(hit) = self.hit_children(idx, point) {
            return Some(hit);
        }
        let id = self.handle(idx);
        let targetable = self.keyword(idx, PropertyId::Visibility) != Some(Keyword::Hidden)
            && self.keyword(idx, PropertyId::PointerEvents) != Some(Keyword::None);
        let inside = self
            .project(id, point)
            .is_some_and(|local| self.layout[i].border_box().contains(local));
        (targetable && inside).then_some(id)
    }

    fn hit_children(&self, idx: u32, point: Point) -> Option<ElementId> {
        self.render_children[idx as usize]
            .iter()
            .rev()
            .find_map(|&c| self.hit(c, point))
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;
    use crate::element::LayoutBox;
    use crate::matcher::NullMatcher;
    use crate::trace::Tracer;

    fn sized(doc: &mut Document, id: ElementId, x: f64, y: f64, w: f64, h: f64) {
        doc.set_layout_box(id, LayoutBox::new(x, y, Size::new(w, h)));
    }

    fn run(doc: &mut Document) {
        doc.update(&NullMatcher, &mut Tracer::none());
    }

    /// A 100×100 root holding two overlapping 50×50 children.
    fn scene() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(root, a);
        doc.append_child(root, b);
        sized(&mut doc, root, 0.0, 0.0, 100.0, 100.0);
        sized(&mut doc, a, 10.0, 10.0, 50.0, 50.0);
        sized(&mut doc, b, 40.0, 40.0, 50.0, 50.0);
        run(&mut doc);
        (doc, root, a, b)
    }

    #[test]
    fn project_maps_into_local_space() {
        let (mut doc, _, a, _) = scene();
        assert_eq!(doc.project(a, Point::new(15.0, 20.0)), Some(Point::new(5.0, 10.0)));

        doc.set_property(a, "transform", Some("scale(0)")).unwrap();
        run(&mut doc);
        assert_eq!(doc.project(a, Point::new(15.0, 20.0)), None);
    }

    #[test]
    fn later_siblings_and_z_index_win() {
        let (mut doc, root, a, b) = scene();
        assert_eq!(doc.element_from_point(Point::new(45.0, 45.0)), Some(b));
        assert_eq!(doc.element_from_point(Point::new(20.0, 20.0)), Some(a));
        assert_eq!(doc.element_from_point(Point::new(95.0, 5.0)), Some(root));
        assert_eq!(doc.element_from_point(Point::new(150.0, 5.0)), None);

        doc.set_property(a, "z-index", Some("1")).unwrap();
        run(&mut doc);
        assert_eq!(doc.element_from_point(Point::new(45.0, 45.0)), Some(a));
        assert_eq!(doc.child_from_point(root, Point::new(95.0, 5.0)), None);
    }

    #[test]
    fn pointer_events_and_visibility_pass_through() {
        let (mut doc, root, a, b) = scene();
        doc.set_property(b, "pointer-events", Some("none")).unwrap();
        run(&mut doc);
        assert_eq!(doc.element_from_point(Point::new(45.0, 45.0)), Some(a));

        doc.set_property(a, "visibility", Some("hidden")).unwrap();
        run(&mut doc);
        assert_eq!(doc.element_from_point(Point::new(45.0, 45.0)), Some(root));

        doc.set_property(root, "display", Some("none")).unwrap();
        run(&mut doc);
        assert_eq!(doc.element_from_point(Point::new(45.0, 45.0)), None);
    }

    #[test]
    fn overflow_clip_hides_children_outside_the_parent() {
        let (mut doc, root, _, b) = scene();
        sized(&mut doc, b, 80.0, 80.0, 50.0, 50.0);
        run(&mut doc);
        assert_eq!(doc.element_from_point(Point::new(110.0, 110.0)), Some(b));

        doc.set_property(root, "overflow", Some("hidden")).unwrap();
        run(&mut doc);
        assert_eq!(doc.element_from_point(Point::new(110.0, 110.0)), None);
        assert_eq!(doc.element_from_point(Point::new(90.0, 90.0)), Some(b));
    }

    #[test]
    fn rotated_elements_hit_in_their_own_space() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        sized(&mut doc, el, 0.0, 0.0, 10.0, 10.0);
        doc.set_property(el, "transform", Some("rotate(45deg)")).unwrap();
        run(&mut doc);
        // The square's corner is rotated away from (0.5, 0.5); its center is fixed.
        assert_eq!(doc.element_from_point(Point::new(5.0, 5.0)), Some(el));
        assert_eq!(doc.element_from_point(Point::new(0.5, 0.5)), None);
    }
}
