// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selector-matcher seam.
//!
//! Selector matching lives outside this crate. During the Definition axis the
//! update pass describes each dirty element with a [`MatchQuery`] and asks a
//! [`StyleMatcher`] for the element's matched property vector, which replaces
//! the definition layer wholesale.

use alloc::string::String;
use alloc::vec::Vec;

use crate::element::{ElementId, PseudoClassSet};
use crate::style::PropertySet;

/// The matchable identity of one ancestor.
#[derive(Clone, Copy, Debug)]
pub struct AncestorInfo<'a> {
    /// Tag name.
    pub tag: &'a str,
    /// `id` attribute.
    pub id: Option<&'a str>,
    /// Class list.
    pub classes: &'a [String],
    /// Active pseudo classes.
    pub pseudo_classes: PseudoClassSet,
}

/// Everything a matcher may consult for one element.
#[derive(Clone, Debug)]
pub struct MatchQuery<'a> {
    /// The element being matched.
    pub element: ElementId,
    /// Tag name.
    pub tag: &'a str,
    /// `id` attribute.
    pub id: Option<&'a str>,
    /// Class list.
    pub classes: &'a [String],
    /// Active pseudo classes.
    pub pseudo_classes: PseudoClassSet,
    /// Ancestors, nearest first.
    pub ancestors: Vec<AncestorInfo<'a>>,
}

impl MatchQuery<'_> {
    /// Whether the element carries `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Produces the definition layer for an element.
pub trait StyleMatcher {
    /// Returns the matched property vector for `query`.
    fn match_element(&self, query: &MatchQuery<'_>) -> PropertySet;
}

impl<F> StyleMatcher for F
where
    F: Fn(&MatchQuery<'_>) -> PropertySet,
{
    fn match_element(&self, query: &MatchQuery<'_>) -> PropertySet {
        self(query)
    }
}

/// A matcher that matches nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullMatcher;

impl StyleMatcher for NullMatcher {
    fn match_element(&self, query: &MatchQuery<'_>) -> PropertySet {
        _ = query;
        PropertySet::new()
    }
}
