// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and attributes.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::OnceCell;
use std::collections::HashMap;

use kurbo::{Insets, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker};

use super::background::PaintBatch;
use super::clip::ElementClip;
use super::id::{ElementId, INVALID, NodeKind, PseudoClass, PseudoClassSet};
use super::layout::LayoutBox;
use super::traverse::{ChildNodes, Descendants};
use crate::animation::{AnimationEvent, ElementAnimation, ElementTransition, Keyframes};
use crate::config::StyleConfig;
use crate::dirty::{Axis, DirtyAxes};
use crate::property::{AnimationList, PropertyId};
use crate::style::PropertySet;
use crate::transform::Transform3d;

/// Axes a node picks up when it moves to a new place in the tree.
const REATTACH: DirtyAxes = DirtyAxes::DEFINITION
    .union(DirtyAxes::PERSPECTIVE)
    .union(DirtyAxes::TRANSFORM)
    .union(DirtyAxes::CLIP)
    .union(DirtyAxes::BACKGROUND);

/// Struct-of-arrays storage for an element tree and its style state.
///
/// Nodes are addressed by [`ElementId`] handles. Internally, each node
/// occupies a slot in parallel arrays. Destroyed nodes are recycled via a free
/// list, and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct Document {
    // -- Topology --
    pub(crate) kind: Vec<NodeKind>,
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) last_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Identity --
    pub(crate) tag: Vec<String>,
    pub(crate) text: Vec<String>,
    pub(crate) attributes: Vec<BTreeMap<String, String>>,
    pub(crate) classes: Vec<Vec<String>>,
    pub(crate) pseudo: Vec<PseudoClassSet>,

    // -- Origin layers --
    pub(crate) definition: Vec<PropertySet>,
    pub(crate) inline: Vec<PropertySet>,
    pub(crate) animation: Vec<PropertySet>,

    // -- Time-driven state --
    pub(crate) animations: Vec<BTreeMap<PropertyId, ElementAnimation>>,
    pub(crate) transitions: Vec<BTreeMap<PropertyId, ElementTransition>>,
    /// The `animation` list the running animations were reconciled against.
    pub(crate) applied_animations: Vec<AnimationList>,

    // -- Layout handoff --
    pub(crate) layout: Vec<LayoutBox>,
    pub(crate) scroll_offset: Vec<Vec2>,
    pub(crate) scroll_insets: Vec<Insets>,
    pub(crate) needs_layout: Vec<bool>,

    // -- Derived state (written by update) --
    pub(crate) element_children: Vec<Vec<u32>>,
    pub(crate) render_children: Vec<Vec<u32>>,
    pub(crate) child_index: Vec<OnceCell<HashMap<u32, usize>>>,
    pub(crate) perspective: Vec<Transform3d>,
    pub(crate) transform: Vec<Transform3d>,
    pub(crate) inverse: Vec<OnceCell<Option<Transform3d>>>,
    pub(crate) clip: Vec<ElementClip>,
    pub(crate) background: Vec<Vec<PaintBatch>>,
    pub(crate) axes: Vec<DirtyAxes>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Document-wide --
    pub(crate) config: StyleConfig,
    pub(crate) keyframes: HashMap<String, Keyframes>,
    pub(crate) events: Vec<AnimationEvent>,
    pub(crate) time: f64,
    pub(crate) pass_index: u64,
    #[cfg(feature = "trace")]
    pub(crate) pending_transitions: Vec<crate::trace::TransitionEvent>,
    #[cfg(feature = "trace-rich")]
    pub(crate) pending_changes: Vec<crate::trace::PropertyChange>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with the default [`StyleConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StyleConfig::default())
    }

    /// Creates an empty document.
    #[must_use]
    pub fn with_config(config: StyleConfig) -> Self {
        Self {
            kind: Vec::new(),
            parent: Vec::new(),
            first_child: Vec::new(),
            last_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            tag: Vec::new(),
            text: Vec::new(),
            attributes: Vec::new(),
            classes: Vec::new(),
            pseudo: Vec::new(),
            definition: Vec::new(),
            inline: Vec::new(),
            animation: Vec::new(),
            animations: Vec::new(),
            transitions: Vec::new(),
            applied_animations: Vec::new(),
            layout: Vec::new(),
            scroll_offset: Vec::new(),
            scroll_insets: Vec::new(),
            needs_layout: Vec::new(),
            element_children: Vec::new(),
            render_children: Vec::new(),
            child_index: Vec::new(),
            perspective: Vec::new(),
            transform: Vec::new(),
            inverse: Vec::new(),
            clip: Vec::new(),
            background: Vec::new(),
            axes: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            config,
            keyframes: HashMap::new(),
            events: Vec::new(),
            time: 0.0,
            pass_index: 0,
            #[cfg(feature = "trace")]
            pending_transitions: Vec::new(),
            #[cfg(feature = "trace-rich")]
            pending_changes: Vec::new(),
        }
    }

    /// The document configuration.
    #[must_use]
    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Changes the viewport `vw`/`vh` resolve against.
    ///
    /// Every element's geometry-dependent axes are marked dirty.
    pub fn set_viewport(&mut self, viewport: Size) {
        if self.config.viewport == viewport {
            return;
        }
        self.config.viewport = viewport;
        for idx in 0..self.len {
            if self.is_live_element(idx) {
                self.needs_layout[idx as usize] = true;
                self.mark(
                    idx,
                    DirtyAxes::PERSPECTIVE | DirtyAxes::TRANSFORM | DirtyAxes::BACKGROUND,
                );
            }
        }
    }

    /// Document time in seconds, advanced by
    /// [`update_render`](Self::update_render).
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    // -- Allocation API --

    /// Creates a detached element with tag `tag`.
    ///
    /// New elements start with every recompute axis dirty.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let idx = self.alloc_slot(NodeKind::Element);
        self.tag[idx as usize] = tag.to_ascii_lowercase();
        self.needs_layout[idx as usize] = true;
        self.mark(idx, DirtyAxes::RECOMPUTE);
        self.handle(idx)
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> ElementId {
        let idx = self.alloc_slot(NodeKind::Text);
        self.text[idx as usize] = text.to_string();
        self.handle(idx)
    }

    /// Destroys a node and its whole subtree, freeing their slots for reuse.
    ///
    /// Running animations and transitions in the subtree are dropped without
    /// events.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy(&mut self, id: ElementId) {
        self.validate(id);
        let idx = id.idx;
        if self.parent[idx as usize] != INVALID {
            let p = self.parent[idx as usize];
            self.unlink_from_parent(idx);
            self.structure_changed(p);
        }
        let mut doomed: Vec<u32> = Descendants::new(self, idx).collect();
        doomed.push(idx);
        for n in doomed {
            self.dirty.remove_key(n);
            self.release_slot(n);
            // Bump generation so old handles immediately fail validation.
            self.generation[n as usize] += 1;
            self.free_list.push(n);
        }
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Whether the node is an element or a text node.
    #[must_use]
    pub fn kind(&self, id: ElementId) -> NodeKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    // -- Topology API --

    /// Adds `child` as the last child node of `parent`.
    ///
    /// Marks Structure dirty on `parent` only. The moved subtree re-matches and
    /// recomputes its geometry under the new ancestry.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, `parent` is a text node, `child`
    /// already has a parent, or `child` is an ancestor of `parent`.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.insert_before(parent, child, None);
    }

    /// Inserts `child` into `parent` before `reference`, or last if
    /// `reference` is `None`.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as
    /// [`append_child`](Self::append_child), or if `reference` is not a child
    /// of `parent`.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.kind[p as usize] == NodeKind::Element,
            "text nodes cannot have children"
        );
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(
            c != p && !self.is_ancestor(c, p),
            "cannot insert a node into its own subtree"
        );
        let next = match reference {
            Some(r) => {
                self.validate(r);
                assert!(
                    self.parent[r.idx as usize] == p,
                    "reference node is not a child of parent"
                );
                r.idx
            }
            None => INVALID,
        };

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = next;
        let prev = if next == INVALID {
            self.last_child[p as usize]
        } else {
            self.prev_sibling[next as usize]
        };
        self.prev_sibling[c as usize] = prev;
        if prev == INVALID {
            self.first_child[p as usize] = c;
        } else {
            self.next_sibling[prev as usize] = c;
        }
        if next == INVALID {
            self.last_child[p as usize] = c;
        } else {
            self.prev_sibling[next as usize] = c;
        }

        self.structure_changed(p);
        self.mark_subtree(c, REATTACH);
    }

    /// Removes `child` from `parent`, leaving it detached but alive.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] == parent.idx,
            "node is not a child of parent"
        );
        self.unlink_from_parent(child.idx);
        self.structure_changed(parent.idx);
        self.mark_subtree(child.idx, REATTACH);
    }

    /// Detaches every child node of `parent`.
    pub fn remove_all_children(&mut self, parent: ElementId) {
        self.validate(parent);
        let p = parent.idx;
        if self.first_child[p as usize] == INVALID {
            return;
        }
        while self.first_child[p as usize] != INVALID {
            let c = self.first_child[p as usize];
            self.unlink_from_parent(c);
            self.mark_subtree(c, REATTACH);
        }
        self.structure_changed(p);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.handle(p))
    }

    /// Returns an iterator over the child nodes of a node, text included.
    #[must_use]
    pub fn child_nodes(&self, id: ElementId) -> ChildNodes<'_> {
        self.validate(id);
        ChildNodes::new(self, self.first_child[id.idx as usize])
    }

    /// Returns an iterator over the element children of a node.
    pub fn children(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.child_nodes(id)
            .filter(|c| self.kind[c.idx as usize] == NodeKind::Element)
    }

    /// The element children in paint order: `display: none` skipped, stably
    /// sorted by `z-index`.
    ///
    /// Only valid after [`update`](Self::update) has cleared StackingContext.
    pub fn render_children(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.validate(id);
        self.render_children[id.idx as usize]
            .iter()
            .map(|&c| self.handle(c))
    }

    /// Position of `child` among its parent's child nodes.
    ///
    /// Backed by a per-parent lookup table that is built on first use and
    /// dropped on every structural change.
    #[must_use]
    pub fn child_node_index(&self, child: ElementId) -> Option<usize> {
        self.validate(child);
        let p = self.parent[child.idx as usize];
        if p == INVALID {
            return None;
        }
        let table = self.child_index[p as usize].get_or_init(|| {
            ChildNodes::new(self, self.first_child[p as usize])
                .enumerate()
                .map(|(i, c)| (c.idx, i))
                .collect()
        });
        table.get(&child.idx).copied()
    }

    /// The node before `id` among its parent's child nodes.
    #[must_use]
    pub fn previous_sibling(&self, id: ElementId) -> Option<ElementId> {
        self.validate(id);
        let prev = self.prev_sibling[id.idx as usize];
        (prev != INVALID).then(|| self.handle(prev))
    }

    /// The node after `id` among its parent's child nodes.
    #[must_use]
    pub fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        self.validate(id);
        let next = self.next_sibling[id.idx as usize];
        (next != INVALID).then(|| self.handle(next))
    }

    /// Live nodes without a parent, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<ElementId> {
        (0..self.len)
            .filter(|&idx| self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx))
            .map(|idx| self.handle(idx))
            .collect()
    }

    /// The strict descendants of `id` in document order.
    pub fn descendants(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.validate(id);
        Descendants::new(self, id.idx).map(|idx| self.handle(idx))
    }

    /// The first element, in document order, whose `id` attribute is `value`.
    #[must_use]
    pub fn element_by_id(&self, value: &str) -> Option<ElementId> {
        self.roots().into_iter().find_map(|root| {
            core::iter::once(root.idx)
                .chain(Descendants::new(self, root.idx))
                .find(|&idx| self.id_attribute(idx) == Some(value))
                .map(|idx| self.handle(idx))
        })
    }

    /// Descendant elements of `root` with tag `tag` (`*` matches all).
    #[must_use]
    pub fn elements_by_tag_name(&self, root: ElementId, tag: &str) -> Vec<ElementId> {
        self.validate(root);
        Descendants::new(self, root.idx)
            .filter(|&idx| {
                self.kind[idx as usize] == NodeKind::Element
                    && (tag == "*" || self.tag[idx as usize].eq_ignore_ascii_case(tag))
            })
            .map(|idx| self.handle(idx))
            .collect()
    }

    /// Descendant elements of `root` carrying class `class`.
    #[must_use]
    pub fn elements_by_class_name(&self, root: ElementId, class: &str) -> Vec<ElementId> {
        self.validate(root);
        Descendants::new(self, root.idx)
            .filter(|&idx| self.classes[idx as usize].iter().any(|c| c == class))
            .map(|idx| self.handle(idx))
            .collect()
    }

    /// A readable `tag#id.class` chain from the root down to `id`.
    #[must_use]
    pub fn address(&self, id: ElementId) -> String {
        self.validate(id);
        self.address_at(id.idx)
    }

    // -- Identity and attributes --

    /// The tag name (lowercase), empty for text nodes.
    #[must_use]
    pub fn tag(&self, id: ElementId) -> &str {
        self.validate(id);
        &self.tag[id.idx as usize]
    }

    /// The text of a text node.
    #[must_use]
    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.validate(id);
        (self.kind[id.idx as usize] == NodeKind::Text).then(|| self.text[id.idx as usize].as_str())
    }

    /// Replaces the text of a text node and flags its parent for layout.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or not a text node.
    pub fn set_text(&mut self, id: ElementId, text: &str) {
        self.validate(id);
        let idx = id.idx as usize;
        assert!(self.kind[idx] == NodeKind::Text, "not a text node");
        if self.text[idx] != text {
            self.text[idx] = text.to_string();
            let p = self.parent[idx];
            if p != INVALID {
                self.needs_layout[p as usize] = true;
            }
        }
    }

    /// Sets an attribute.
    ///
    /// `id` and `class` re-match the element and its subtree. `style`
    /// replaces the inline layer (see
    /// [`set_style_attribute`](Self::set_style_attribute)).
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        self.validate(id);
        let idx = id.idx;
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => {
                let classes: Vec<String> = value.split_whitespace().map(String::from).collect();
                if self.classes[idx as usize] != classes {
                    self.classes[idx as usize] = classes;
                    self.mark_subtree(idx, DirtyAxes::DEFINITION);
                }
            }
            "style" => {
                self.set_style_attribute(id, value);
            }
            "id" => {
                if self.id_attribute(idx) != Some(value) {
                    self.mark_subtree(idx, DirtyAxes::DEFINITION);
                }
            }
            _ => {}
        }
        self.attributes[idx as usize].insert(name, value.to_string());
    }

    /// Removes an attribute, undoing its effect on matching or inline style.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        self.validate(id);
        let idx = id.idx;
        let name = name.to_ascii_lowercase();
        if self.attributes[idx as usize].remove(&name).is_none() {
            return;
        }
        match name.as_str() {
            "class" => {
                self.classes[idx as usize].clear();
                self.mark_subtree(idx, DirtyAxes::DEFINITION);
            }
            "id" => self.mark_subtree(idx, DirtyAxes::DEFINITION),
            "style" => {
                self.replace_inline(idx, PropertySet::new());
            }
            _ => {}
        }
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.validate(id);
        self.attributes[id.idx as usize]
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The class list.
    #[must_use]
    pub fn classes(&self, id: ElementId) -> &[String] {
        self.validate(id);
        &self.classes[id.idx as usize]
    }

    /// Whether the element carries `class`.
    #[must_use]
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    /// Adds or removes one class.
    pub fn set_class(&mut self, id: ElementId, class: &str, on: bool) {
        self.validate(id);
        let idx = id.idx as usize;
        let present = self.classes[idx].iter().position(|c| c == class);
        match (present, on) {
            (None, true) => self.classes[idx].push(class.to_string()),
            (Some(i), false) => {
                self.classes[idx].remove(i);
            }
            _ => return,
        }
        let joined = self.classes[idx].join(" ");
        self.attributes[idx].insert("class".to_string(), joined);
        self.mark_subtree(id.idx, DirtyAxes::DEFINITION);
    }

    /// Sets or clears a pseudo class; a change re-matches the subtree.
    pub fn set_pseudo_class(&mut self, id: ElementId, pc: PseudoClass, on: bool) {
        self.validate(id);
        if self.pseudo[id.idx as usize].set(pc, on) {
            self.mark_subtree(id.idx, DirtyAxes::DEFINITION);
        }
    }

    /// The active pseudo classes.
    #[must_use]
    pub fn pseudo_classes(&self, id: ElementId) -> PseudoClassSet {
        self.validate(id);
        self.pseudo[id.idx as usize]
    }

    // -- Layout handoff --

    /// Stores the box computed by the layout solver.
    ///
    /// A changed box marks Perspective, Transform, Clip and Background dirty.
    pub fn set_layout_box(&mut self, id: ElementId, layout: LayoutBox) {
        self.validate(id);
        let idx = id.idx;
        if self.layout[idx as usize] == layout {
            return;
        }
        self.layout[idx as usize] = layout;
        self.mark(
            idx,
            DirtyAxes::PERSPECTIVE | DirtyAxes::TRANSFORM | DirtyAxes::CLIP | DirtyAxes::BACKGROUND,
        );
    }

    /// The last box handed over by the layout solver.
    #[must_use]
    pub fn layout_box(&self, id: ElementId) -> LayoutBox {
        self.validate(id);
        self.layout[id.idx as usize]
    }

    /// Scrolls the element's content; children move on the next update.
    pub fn set_scroll_offset(&mut self, id: ElementId, offset: Vec2) {
        self.validate(id);
        let idx = id.idx;
        if self.scroll_offset[idx as usize] == offset {
            return;
        }
        self.scroll_offset[idx as usize] = offset;
        self.mark_children(idx, DirtyAxes::TRANSFORM);
    }

    /// The scroll offset.
    #[must_use]
    pub fn scroll_offset(&self, id: ElementId) -> Vec2 {
        self.validate(id);
        self.scroll_offset[id.idx as usize]
    }

    /// Stores the scrollbar insets reported by the layout solver.
    pub fn set_scroll_insets(&mut self, id: ElementId, insets: Insets) {
        self.validate(id);
        self.scroll_insets[id.idx as usize] = insets;
    }

    /// The scrollbar insets.
    #[must_use]
    pub fn scroll_insets(&self, id: ElementId) -> Insets {
        self.validate(id);
        self.scroll_insets[id.idx as usize]
    }

    /// Whether a layout-affecting property changed since the flag was last
    /// taken.
    #[must_use]
    pub fn needs_layout(&self, id: ElementId) -> bool {
        self.validate(id);
        self.needs_layout[id.idx as usize]
    }

    /// Returns and clears every needs-layout flag, in slot order.
    pub fn take_needs_layout(&mut self) -> Vec<ElementId> {
        let mut out = Vec::new();
        for idx in 0..self.len {
            if self.needs_layout[idx as usize] && self.is_live_element(idx) {
                out.push(self.handle(idx));
            }
            self.needs_layout[idx as usize] = false;
        }
        out
    }

    // -- Derived state getters --

    /// The cached transform from the element's local space to document space.
    ///
    /// Only valid after [`update`](Self::update) has cleared Transform.
    #[must_use]
    pub fn transform(&self, id: ElementId) -> Transform3d {
        self.validate(id);
        self.transform[id.idx as usize]
    }

    /// The inverse of [`transform`](Self::transform), computed on first use
    /// after each change. `None` when singular.
    #[must_use]
    pub fn inverse_transform(&self, id: ElementId) -> Option<Transform3d> {
        self.validate(id);
        let idx = id.idx as usize;
        *self.inverse[idx].get_or_init(|| self.transform[idx].inverse())
    }

    /// The perspective applied to the element's children.
    #[must_use]
    pub fn perspective(&self, id: ElementId) -> Transform3d {
        self.validate(id);
        self.perspective[id.idx as usize]
    }

    /// The cached clip region.
    #[must_use]
    pub fn clip(&self, id: ElementId) -> ElementClip {
        self.validate(id);
        self.clip[id.idx as usize]
    }

    /// The cached paint batches.
    #[must_use]
    pub fn background(&self, id: ElementId) -> &[PaintBatch] {
        self.validate(id);
        &self.background[id.idx as usize]
    }

    /// Axes currently flagged stale.
    #[must_use]
    pub fn dirty_axes(&self, id: ElementId) -> DirtyAxes {
        self.validate(id);
        self.axes[id.idx as usize]
    }

    /// Whether no live element has a stale recompute axis.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        (0..self.len).all(|idx| !self.is_live_element(idx) || !self.has_recompute_axis(idx))
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: ElementId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale ElementId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// The current handle for a live slot.
    pub(crate) fn handle(&self, idx: u32) -> ElementId {
        ElementId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn is_live_element(&self, idx: u32) -> bool {
        idx < self.len
            && self.kind[idx as usize] == NodeKind::Element
            && !self.free_list.contains(&idx)
    }

    pub(crate) fn has_recompute_axis(&self, idx: u32) -> bool {
        Axis::ORDERED
            .into_iter()
            .any(|axis| self.axes[idx as usize].has(axis))
    }

    /// Flags `axes` stale on an element. Text nodes carry no derived state.
    pub(crate) fn mark(&mut self, idx: u32, axes: DirtyAxes) {
        if self.kind[idx as usize] != NodeKind::Element {
            return;
        }
        for axis in axes.iter() {
            if axis.order().is_some() {
                self.dirty.mark(idx, axis.channel());
            }
        }
        self.axes[idx as usize] |= axes;
    }

    /// Flags `axes` on `idx` and every descendant element.
    pub(crate) fn mark_subtree(&mut self, idx: u32, axes: DirtyAxes) {
        let nodes: Vec<u32> = Descendants::new(self, idx).collect();
        self.mark(idx, axes);
        for n in nodes {
            self.mark(n, axes);
        }
    }

    /// Flags `axes` on the element children of `idx`.
    pub(crate) fn mark_children(&mut self, idx: u32, axes: DirtyAxes) {
        let mut c = self.first_child[idx as usize];
        while c != INVALID {
            self.mark(c, axes);
            c = self.next_sibling[c as usize];
        }
    }

    pub(crate) fn id_attribute(&self, idx: u32) -> Option<&str> {
        self.attributes[idx as usize].get("id").map(String::as_str)
    }

    pub(crate) fn address_at(&self, idx: u32) -> String {
        let mut chain = Vec::new();
        let mut n = idx;
        while n != INVALID {
            let i = n as usize;
            let mut part = match self.kind[i] {
                NodeKind::Text => "#text".to_string(),
                NodeKind::Element => self.tag[i].clone(),
            };
            if let Some(id) = self.id_attribute(n) {
                part.push('#');
                part.push_str(id);
            }
            for class in &self.classes[i] {
                part.push('.');
                part.push_str(class);
            }
            chain.push(part);
            n = self.parent[i];
        }
        chain.reverse();
        chain.join(" > ")
    }

    /// Number of ancestors.
    pub(crate) fn depth(&self, idx: u32) -> usize {
        let mut depth = 0;
        let mut p = self.parent[idx as usize];
        while p != INVALID {
            depth += 1;
            p = self.parent[p as usize];
        }
        depth
    }

    fn is_ancestor(&self, ancestor: u32, idx: u32) -> bool {
        let mut p = self.parent[idx as usize];
        while p != INVALID {
            if p == ancestor {
                return true;
            }
            p = self.parent[p as usize];
        }
        false
    }

    /// Marks Structure on `p` and drops its child index table.
    fn structure_changed(&mut self, p: u32) {
        self.child_index[p as usize].take();
        self.needs_layout[p as usize] = true;
        self.mark(p, DirtyAxes::STRUCTURE);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let i = idx as usize;
        let p = self.parent[i] as usize;
        let prev = self.prev_sibling[i];
        let next = self.next_sibling[i];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p] = next;
        }
        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        } else {
            self.last_child[p] = prev;
        }

        self.parent[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.next_sibling[i] = INVALID;
    }

    fn alloc_slot(&mut self, kind: NodeKind) -> u32 {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; `release_slot` already reset it.
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.kind.push(kind);
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.last_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.tag.push(String::new());
            self.text.push(String::new());
            self.attributes.push(BTreeMap::new());
            self.classes.push(Vec::new());
            self.pseudo.push(PseudoClassSet::default());
            self.definition.push(PropertySet::new());
            self.inline.push(PropertySet::new());
            self.animation.push(PropertySet::new());
            self.animations.push(BTreeMap::new());
            self.transitions.push(BTreeMap::new());
            self.applied_animations.push(AnimationList::default());
            self.layout.push(LayoutBox::default());
            self.scroll_offset.push(Vec2::ZERO);
            self.scroll_insets.push(Insets::ZERO);
            self.needs_layout.push(false);
            self.element_children.push(Vec::new());
            self.render_children.push(Vec::new());
            self.child_index.push(OnceCell::new());
            self.perspective.push(Transform3d::IDENTITY);
            self.transform.push(Transform3d::IDENTITY);
            self.inverse.push(OnceCell::new());
            self.clip.push(ElementClip::None);
            self.background.push(Vec::new());
            self.axes.push(DirtyAxes::EMPTY);
            self.generation.push(0);
            idx
        };
        self.kind[idx as usize] = kind;
        idx
    }

    /// Resets a slot to its freshly-allocated state.
    fn release_slot(&mut self, idx: u32) {
        let i = idx as usize;
        self.parent[i] = INVALID;
        self.first_child[i] = INVALID;
        self.last_child[i] = INVALID;
        self.next_sibling[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.tag[i].clear();
        self.text[i].clear();
        self.attributes[i].clear();
        self.classes[i].clear();
        self.pseudo[i] = PseudoClassSet::default();
        self.definition[i].clear();
        self.inline[i].clear();
        self.animation[i].clear();
        self.animations[i].clear();
        self.transitions[i].clear();
        self.applied_animations[i] = AnimationList::default();
        self.layout[i] = LayoutBox::default();
        self.scroll_offset[i] = Vec2::ZERO;
        self.scroll_insets[i] = Insets::ZERO;
        self.needs_layout[i] = false;
        self.element_children[i].clear();
        self.render_children[i].clear();
        self.child_index[i].take();
        self.perspective[i] = Transform3d::IDENTITY;
        self.transform[i] = Transform3d::IDENTITY;
        self.inverse[i].take();
        self.clip[i] = ElementClip::None;
        self.background[i].clear();
        self.axes[i] = DirtyAxes::EMPTY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut doc = Document::new();
        let id = doc.create_element("div");
        assert!(doc.is_alive(id));
        doc.destroy(id);
        assert!(!doc.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut doc = Document::new();
        let id1 = doc.create_element("div");
        doc.destroy(id1);
        let id2 = doc.create_element("p");
        // id2 reuses the same slot but has a different generation.
        assert!(!doc.is_alive(id1));
        assert!(doc.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(doc.tag(id2), "p");
    }

    #[test]
    fn append_insert_and_query() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let a = doc.create_element("span");
        let b = doc.create_text("hello");
        let c = doc.create_element("span");
        doc.append_child(parent, a);
        doc.append_child(parent, c);
        doc.insert_before(parent, b, Some(c));

        let nodes: Vec<_> = doc.child_nodes(parent).collect();
        assert_eq!(nodes, [a, b, c]);
        let elements: Vec<_> = doc.children(parent).collect();
        assert_eq!(elements, [a, c]);
        assert_eq!(doc.parent(b), Some(parent));
        assert_eq!(doc.previous_sibling(c), Some(b));
        assert_eq!(doc.previous_sibling(a), None);
        assert_eq!(doc.child_node_index(c), Some(2));
        assert_eq!(doc.text(b), Some("hello"));
    }

    #[test]
    fn child_index_cache_is_dropped_on_structure_change() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let a = doc.create_element("a");
        let b = doc.create_element("b");
        doc.append_child(parent, a);
        doc.append_child(parent, b);
        assert_eq!(doc.child_node_index(b), Some(1));
        doc.remove_child(parent, a);
        assert_eq!(doc.child_node_index(b), Some(0));
        assert_eq!(doc.child_node_index(a), None);
    }

    #[test]
    fn remove_all_children_detaches_everything() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let kids: Vec<_> = (0..3).map(|_| doc.create_element("i")).collect();
        for &k in &kids {
            doc.append_child(parent, k);
        }
        doc.remove_all_children(parent);
        assert_eq!(doc.child_nodes(parent).count(), 0);
        for k in kids {
            assert_eq!(doc.parent(k), None);
        }
    }

    #[test]
    fn destroy_frees_the_subtree() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let mid = doc.create_element("div");
        let leaf = doc.create_element("div");
        doc.append_child(root, mid);
        doc.append_child(mid, leaf);
        doc.destroy(mid);
        assert!(doc.is_alive(root));
        assert!(!doc.is_alive(mid));
        assert!(!doc.is_alive(leaf));
        assert_eq!(doc.child_nodes(root).count(), 0);
    }

    #[test]
    fn queries_walk_document_order() {
        let mut doc = Document::new();
        let root = doc.create_element("body");
        let a = doc.create_element("div");
        let b = doc.create_element("p");
        let c = doc.create_element("div");
        doc.append_child(root, a);
        doc.append_child(a, b);
        doc.append_child(root, c);
        doc.set_attribute(b, "id", "target");
        doc.set_attribute(c, "class", "x y");

        assert_eq!(doc.element_by_id("target"), Some(b));
        assert_eq!(doc.element_by_id("missing"), None);
        assert_eq!(doc.elements_by_tag_name(root, "div"), [a, c]);
        assert_eq!(doc.elements_by_tag_name(root, "*"), [a, b, c]);
        assert_eq!(doc.elements_by_class_name(root, "y"), [c]);
        assert_eq!(doc.descendants(root).collect::<Vec<_>>(), [a, b, c]);
        assert_eq!(doc.address(b), "body > div > p#target");
    }

    #[test]
    fn class_and_pseudo_class_edits_dirty_definition() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(parent, child);
        doc.axes[parent.idx as usize] = DirtyAxes::EMPTY;
        doc.axes[child.idx as usize] = DirtyAxes::EMPTY;

        doc.set_class(parent, "active", true);
        assert!(doc.dirty_axes(parent).has(Axis::Definition));
        assert!(doc.dirty_axes(child).has(Axis::Definition));
        assert_eq!(doc.attribute(parent, "class"), Some("active"));

        doc.axes[parent.idx as usize] = DirtyAxes::EMPTY;
        doc.set_pseudo_class(parent, PseudoClass::Hover, true);
        assert!(doc.dirty_axes(parent).has(Axis::Definition));
        assert!(doc.pseudo_classes(parent).contains(PseudoClass::Hover));

        // A no-op edit marks nothing.
        doc.axes[parent.idx as usize] = DirtyAxes::EMPTY;
        doc.set_pseudo_class(parent, PseudoClass::Hover, true);
        assert!(doc.dirty_axes(parent).is_empty());
    }

    #[test]
    fn take_needs_layout_clears_flags() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let _text = doc.create_text("t");
        assert_eq!(doc.take_needs_layout(), [a]);
        assert!(doc.take_needs_layout().is_empty());
        assert!(!doc.needs_layout(a));
    }

    #[test]
    #[should_panic(expected = "cannot insert a node into its own subtree")]
    fn appending_an_ancestor_panics() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(a, b);
        doc.remove_child(a, b);
        doc.append_child(b, a);
        doc.remove_child(b, a);
        doc.append_child(a, b);
        let c = doc.create_element("div");
        doc.append_child(b, c);
        doc.remove_child(a, b);
        doc.append_child(c, b);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_append_panics() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(a, b);
        doc.append_child(a, b);
    }

    #[test]
    #[should_panic(expected = "text nodes cannot have children")]
    fn text_nodes_have_no_children() {
        let mut doc = Document::new();
        let t = doc.create_text("x");
        let a = doc.create_element("div");
        doc.append_child(t, a);
    }

    #[test]
    #[should_panic(expected = "stale ElementId")]
    fn destroyed_handle_panics_on_parent() {
        let mut doc = Document::new();
        let id = doc.create_element("div");
        doc.destroy(id);
        let _ = doc.parent(id);
    }

    #[test]
    #[should_panic(expected = "stale ElementId")]
    fn destroyed_handle_panics_on_append() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let child = doc.create_element("div");
        doc.destroy(child);
        doc.append_child(parent, child);
    }
}
