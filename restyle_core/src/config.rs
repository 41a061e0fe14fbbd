// Copyright 2026 the Restyle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document-wide configuration.

use kurbo::Size;

/// Configuration for a [`Document`](crate::Document).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleConfig {
    /// Font size `rem` resolves against, in pixels.
    pub root_font_size: f32,
    /// Viewport size `vw`/`vh` resolve against.
    pub viewport: Size,
    /// Pixels per `dp`.
    pub dp_ratio: f32,
    /// Remaining transition time, in seconds, below which a transition counts
    /// as finished.
    pub transition_epsilon: f64,
    /// Upper bound on passes run by
    /// [`update_until_clean`](crate::Document::update_until_clean).
    pub max_update_passes: usize,
}

impl StyleConfig {
    /// Desktop defaults: 16px root font, no viewport, 1px per dp.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            root_font_size: 16.0,
            viewport: Size::ZERO,
            dp_ratio: 1.0,
            transition_epsilon: 1e-6,
            max_update_passes: 4,
        }
    }

    /// Returns a copy with the given viewport.
    #[must_use]
    pub const fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    /// Returns a copy with the given dp ratio.
    #[must_use]
    pub const fn with_dp_ratio(mut self, dp_ratio: f32) -> Self {
        self.dp_ratio = dp_ratio;
        self
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_desktop() {
        let config = StyleConfig::default();
        assert_eq!(config, StyleConfig::desktop());
        assert_eq!(config.root_font_size, 16.0);
        assert_eq!(config.max_update_passes, 4);
    }

    #[test]
    fn builders_override_fields() {
        let config = StyleConfig::desktop()
            .with_viewport(Size::new(800.0, 600.0))
            .with_dp_ratio(2.0);
        assert_eq!(config.viewport, Size::new(800.0, 600.0));
        assert_eq!(config.dp_ratio, 2.0);
        assert_eq!(config.transition_epsilon, 1e-6);
    }
}
