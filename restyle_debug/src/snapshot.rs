// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of computed styles and derived state.
//!
//! [`element`] walks a subtree and produces a [`serde_json::Value`] with each
//! element's identity, its computed properties, and optionally the cached
//! transform, clip and render order. [`write`] dumps a whole document.

use std::io::{self, Write};

use serde_json::{Map, Value, json};

use restyle_core::element::{ElementClip, NodeKind};
use restyle_core::property::PropertyId;
use restyle_core::{Document, ElementId};

/// What a snapshot includes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapshotOptions {
    /// Also list properties whose computed value equals the initial value.
    pub include_initial: bool,
    /// Include the cached transform, clip and render order.
    pub derived: bool,
}

/// Snapshots the subtree rooted at `id`.
pub fn element(doc: &Document, id: ElementId, options: SnapshotOptions) -> Value {
    if doc.kind(id) == NodeKind::Text {
        return json!({ "text": doc.text(id).unwrap_or_default() });
    }

    let mut computed = Map::new();
    for &property in PropertyId::ALL {
        let value = doc.computed_property(id, property);
        if options.include_initial || *value != property.initial_value() {
            computed.insert(property.name().to_string(), Value::String(value.to_string()));
        }
    }

    let mut out = Map::new();
    out.insert("tag".into(), json!(doc.tag(id)));
    out.insert("address".into(), json!(doc.address(id)));
    if let Some(value) = doc.attribute(id, "id") {
        out.insert("id".into(), json!(value));
    }
    if !doc.classes(id).is_empty() {
        out.insert("classes".into(), json!(doc.classes(id)));
    }
    let pseudo: Vec<&str> = doc.pseudo_classes(id).iter().map(|pc| pc.name()).collect();
    if !pseudo.is_empty() {
        out.insert("pseudo".into(), json!(pseudo));
    }
    out.insert("computed".into(), Value::Object(computed));

    if options.derived {
        let cols = doc.transform(id).cols;
        out.insert("transform".into(), json!(cols.as_flattened()));
        out.insert("clip".into(), clip(doc.clip(id)));
        let order: Vec<u32> = doc.render_children(id).map(ElementId::index).collect();
        out.insert("render_order".into(), json!(order));
    }

    let children: Vec<Value> = doc
        .child_nodes(id)
        .map(|child| element(doc, child, options))
        .collect();
    if !children.is_empty() {
        out.insert("children".into(), Value::Array(children));
    }
    Value::Object(out)
}

/// Snapshots every root of `doc`.
pub fn document(doc: &Document, options: SnapshotOptions) -> Value {
    let roots: Vec<Value> = doc
        .roots()
        .into_iter()
        .map(|root| element(doc, root, options))
        .collect();
    json!({
        "time": doc.time(),
        "roots": roots,
    })
}

/// Writes [`document`] as pretty-printed JSON.
pub fn write(doc: &Document, options: SnapshotOptions, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &document(doc, options))?;
    writeln!(writer)
}

fn clip(clip: ElementClip) -> Value {
    match clip {
        ElementClip::None => Value::Null,
        ElementClip::Scissor(r) => json!({ "scissor": [r.x0, r.y0, r.x1, r.y1] }),
        ElementClip::Shader { quad, bounds } => json!({
            "shader": quad.map(|p| [p.x, p.y]),
            "bounds": [bounds.x0, bounds.y0, bounds.x1, bounds.y1],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use restyle_core::element::LayoutBox;
    use restyle_core::matcher::NullMatcher;
    use restyle_core::trace::Tracer;

    fn sample() -> (Document, ElementId, ElementId) {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_element("p");
        let text = doc.create_text("hello");
        doc.append_child(root, child);
        doc.append_child(child, text);
        doc.set_attribute(root, "id", "main");
        doc.set_attribute(child, "class", "note big");
        doc.set_property(root, "color", Some("#ff0000")).unwrap();
        doc.set_property(child, "opacity", Some("0.5")).unwrap();
        (doc, root, child)
    }

    #[test]
    fn lists_only_non_initial_values_by_default() {
        let (doc, root, _) = sample();
        let snap = element(&doc, root, SnapshotOptions::default());
        assert_eq!(snap["tag"], "div");
        assert_eq!(snap["id"], "main");
        assert_eq!(snap["computed"]["color"], "#ff0000");
        assert!(snap["computed"].get("opacity").is_none());

        let child = &snap["children"][0];
        assert_eq!(child["classes"], json!(["note", "big"]));
        assert_eq!(child["computed"]["opacity"], "0.5");
        assert_eq!(child["computed"]["color"], "#ff0000", "inherited");
        assert_eq!(child["children"][0]["text"], "hello");
    }

    #[test]
    fn include_initial_lists_every_property() {
        let (doc, root, _) = sample();
        let options = SnapshotOptions {
            include_initial: true,
            ..SnapshotOptions::default()
        };
        let snap = element(&doc, root, options);
        let computed = snap["computed"].as_object().unwrap();
        assert_eq!(computed.len(), PropertyId::ALL.len());
    }

    #[test]
    fn derived_state_after_update() {
        let (mut doc, root, child) = sample();
        doc.set_layout_box(root, LayoutBox::new(0.0, 0.0, Size::new(100.0, 50.0)));
        doc.set_layout_box(child, LayoutBox::new(10.0, 10.0, Size::new(20.0, 20.0)));
        doc.set_property(root, "overflow", Some("hidden")).unwrap();
        doc.update(&NullMatcher, &mut Tracer::none());

        let options = SnapshotOptions {
            derived: true,
            ..SnapshotOptions::default()
        };
        let snap = element(&doc, root, options);
        assert_eq!(snap["clip"]["scissor"], json!([0.0, 0.0, 100.0, 50.0]));
        assert_eq!(snap["render_order"], json!([child.index()]));
        let transform = snap["children"][0]["transform"].as_array().unwrap();
        assert_eq!(transform.len(), 16);
        assert_eq!(transform[12], 10.0);
        assert_eq!(transform[13], 10.0);
    }

    #[test]
    fn write_produces_parsable_json() {
        let (doc, _, _) = sample();
        let mut out = Vec::new();
        write(&doc, SnapshotOptions::default(), &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["roots"].as_array().map(Vec::len), Some(1));
        assert_eq!(parsed["time"], 0.0);
    }
}
