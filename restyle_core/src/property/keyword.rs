// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enumerated keyword tokens.

use core::fmt;

/// A discrete keyword value.
///
/// Each keyword-valued [`PropertyId`](super::PropertyId) accepts a subset of
/// these; see [`PropertyId::keywords`](super::PropertyId::keywords).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyword {
    /// `auto`
    Auto,
    /// `none`
    None,
    /// `visible`
    Visible,
    /// `hidden`
    Hidden,
    /// `scroll`
    Scroll,
    /// `flex`
    Flex,
    /// `block`
    Block,
    /// `inline`
    Inline,
    /// `static`
    Static,
    /// `relative`
    Relative,
    /// `absolute`
    Absolute,
    /// `left`
    Left,
    /// `center`
    Center,
    /// `right`
    Right,
    /// `justify`
    Justify,
}

impl Keyword {
    /// Every keyword, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Auto,
        Self::None,
        Self::Visible,
        Self::Hidden,
        Self::Scroll,
        Self::Flex,
        Self::Block,
        Self::Inline,
        Self::Static,
        Self::Relative,
        Self::Absolute,
        Self::Left,
        Self::Center,
        Self::Right,
        Self::Justify,
    ];

    /// Returns the CSS spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Scroll => "scroll",
            Self::Flex => "flex",
            Self::Block => "block",
            Self::Inline => "inline",
            Self::Static => "static",
            Self::Relative => "relative",
            Self::Absolute => "absolute",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }

    /// Parses a keyword, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for k in Keyword::ALL {
            assert_eq!(Keyword::from_name(k.as_str()), Some(k));
        }
        assert_eq!(Keyword::from_name("HIDDEN"), Some(Keyword::Hidden));
        assert_eq!(Keyword::from_name("sideways"), None);
    }
}
