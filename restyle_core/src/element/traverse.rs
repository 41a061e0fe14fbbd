// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{ElementId, INVALID};
use super::store::Document;

/// An iterator over the direct child nodes of a node, text included.
///
/// Created by [`Document::child_nodes`].
#[derive(Debug)]
pub struct ChildNodes<'a> {
    doc: &'a Document,
    current: u32,
}

impl<'a> ChildNodes<'a> {
    pub(crate) fn new(doc: &'a Document, first: u32) -> Self {
        Self {
            doc,
            current: first,
        }
    }
}

impl Iterator for ChildNodes<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.doc.next_sibling[idx as usize];
        Some(self.doc.handle(idx))
    }
}

/// A depth-first pre-order walk over the strict descendants of a node,
/// yielding raw slot indices.
#[derive(Debug)]
pub(crate) struct Descendants<'a> {
    doc: &'a Document,
    root: u32,
    current: u32,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(doc: &'a Document, root: u32) -> Self {
        Self {
            doc,
            root,
            current: doc.first_child[root as usize],
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        let doc = self.doc;
        let first = doc.first_child[idx as usize];
        self.current = if first != INVALID {
            first
        } else {
            // Climb until a node with a next sibling, stopping at the root.
            let mut n = idx;
            loop {
                if n == self.root {
                    break INVALID;
                }
                let next = doc.next_sibling[n as usize];
                if next != INVALID {
                    break next;
                }
                n = doc.parent[n as usize];
                if n == INVALID {
                    break INVALID;
                }
            }
        };
        Some(idx)
    }
}
