// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported at the string and collaborator boundaries.
//!
//! Nothing inside cascade resolution, interpolation, or the update passes
//! produces these; they are only returned where text or matcher output enters
//! the engine.

use alloc::string::String;

use thiserror::Error;

use crate::property::{Category, PropertyId};

/// A value rejected at the engine boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// No property has this name.
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// The text does not parse as a value of the property.
    #[error("invalid value for {property}: {value:?}")]
    InvalidValue {
        /// The property being set.
        property: PropertyId,
        /// The rejected text.
        value: String,
    },

    /// A matcher supplied a value of the wrong category.
    #[error("{property} expects a {expected} value, got {found}")]
    CategoryMismatch {
        /// The offending property.
        property: PropertyId,
        /// Declared category.
        expected: Category,
        /// Category of the supplied value.
        found: Category,
    },

    /// An animation names keyframes that were never registered.
    #[error("unknown keyframes: {0}")]
    UnknownKeyframes(String),
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages_name_the_property() {
        let err = StyleError::CategoryMismatch {
            property: PropertyId::Opacity,
            expected: Category::Float,
            found: Category::Color,
        };
        assert_eq!(err.to_string(), "opacity expects a float value, got color");

        let err = StyleError::InvalidValue {
            property: PropertyId::Width,
            value: "wide".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value for width: \"wide\"");
    }
}
