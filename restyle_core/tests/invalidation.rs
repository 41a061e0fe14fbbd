// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-axis propagation and the ordered update pass.

use kurbo::{Point, Size};
use restyle_core::dirty::Axis;
use restyle_core::element::LayoutBox;
use restyle_core::matcher::NullMatcher;
use restyle_core::trace::Tracer;
use restyle_core::Document;

#[test]
fn append_child_dirties_the_parent_structure_only() {
    let mut doc = Document::new();
    let root = doc.create_element("div");
    let first = doc.create_element("span");
    let second = doc.create_element("span");
    doc.append_child(root, first);
    doc.update(&NullMatcher, &mut Tracer::none());
    doc.update(&NullMatcher, &mut Tracer::none());
    assert!(doc.is_clean());

    doc.append_child(root, second);
    assert!(doc.dirty_axes(root).has(Axis::Structure));
    assert!(!doc.dirty_axes(first).has(Axis::Structure), "siblings stay clean");
    assert!(!doc.dirty_axes(second).has(Axis::Structure));

    let report = doc.update(&NullMatcher, &mut Tracer::none());
    assert_eq!(report.structure, [root]);
    assert!(
        report.stacking_context.contains(&root),
        "the structure recompute re-dirties a later axis, handled in the same pass"
    );
    assert!(report.deferred.is_empty());
    assert!(doc.dirty_axes(root).is_empty());
    assert_eq!(doc.render_children(root).collect::<Vec<_>>(), [first, second]);
}

#[test]
fn second_update_does_no_work() {
    let mut doc = Document::new();
    let root = doc.create_element("div");
    for tag in ["p", "p", "img"] {
        let child = doc.create_element(tag);
        doc.append_child(root, child);
    }
    doc.set_property(root, "transform", Some("rotate(45deg)")).unwrap();
    doc.set_property(root, "overflow", Some("hidden")).unwrap();

    let first = doc.update(&NullMatcher, &mut Tracer::none());
    assert!(!first.is_empty());
    let second = doc.update(&NullMatcher, &mut Tracer::none());
    assert!(second.is_empty(), "nothing changed: {second:?}");
    assert!(doc.is_clean());
}

#[test]
fn layout_box_moves_descendant_transforms() {
    let mut doc = Document::new();
    let root = doc.create_element("div");
    let child = doc.create_element("div");
    doc.append_child(root, child);
    doc.set_layout_box(root, LayoutBox::new(10.0, 20.0, Size::new(100.0, 100.0)));
    doc.set_layout_box(child, LayoutBox::new(5.0, 5.0, Size::new(10.0, 10.0)));
    doc.update(&NullMatcher, &mut Tracer::none());
    let before = doc.transform(child).transform_point(Point::ZERO);
    assert!((before.x - 15.0).abs() < 1e-9 && (before.y - 25.0).abs() < 1e-9);

    doc.set_layout_box(root, LayoutBox::new(0.0, 0.0, Size::new(100.0, 100.0)));
    let report = doc.update(&NullMatcher, &mut Tracer::none());
    assert!(report.transform.contains(&child), "children follow their parent");
    let after = doc.transform(child).transform_point(Point::ZERO);
    assert!((after.x - 5.0).abs() < 1e-9 && (after.y - 5.0).abs() < 1e-9);
}

#[test]
fn layout_affecting_changes_request_layout() {
    let mut doc = Document::new();
    let root = doc.create_element("div");
    doc.take_needs_layout();

    doc.set_property(root, "color", Some("red")).unwrap();
    assert!(!doc.needs_layout(root));
    doc.set_property(root, "width", Some("50px")).unwrap();
    assert_eq!(doc.take_needs_layout(), [root]);
    assert!(!doc.needs_layout(root));
}
