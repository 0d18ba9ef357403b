// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS-style filter chains applied to a render pass.

use alloc::vec::Vec;

use crate::pass::quad::Color;

/// One filter in a chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOperation {
    /// Desaturate by `amount` (0 to 1).
    Grayscale(f32),
    /// Sepia tone by `amount` (0 to 1).
    Sepia(f32),
    /// Scale saturation.
    Saturate(f32),
    /// Rotate hue by degrees.
    HueRotate(f32),
    /// Invert by `amount` (0 to 1).
    Invert(f32),
    /// Scale brightness.
    Brightness(f32),
    /// Scale contrast.
    Contrast(f32),
    /// Multiply alpha.
    Opacity(f32),
    /// Gaussian blur with the given standard deviation in pixels.
    Blur(f32),
    /// Offset blurred shadow.
    DropShadow {
        /// Horizontal offset in pixels.
        offset_x: i32,
        /// Vertical offset in pixels.
        offset_y: i32,
        /// Blur standard deviation.
        std_deviation: f32,
        /// Shadow color.
        color: Color,
    },
    /// Magnify around the pass center with an inset falloff.
    Zoom {
        /// Magnification factor.
        amount: f32,
        /// Falloff inset in pixels.
        inset: i32,
    },
}

impl FilterOperation {
    /// Returns `true` if the filter samples outside each output pixel.
    #[must_use]
    pub fn moves_pixels(&self) -> bool {
        matches!(self, Self::Blur(_) | Self::DropShadow { .. } | Self::Zoom { .. })
    }

    /// Returns `true` if the filter can change alpha.
    #[must_use]
    pub fn affects_opacity(&self) -> bool {
        match self {
            Self::Opacity(amount) => *amount != 1.0,
            Self::Blur(_) | Self::DropShadow { .. } | Self::Zoom { .. } => true,
            _ => false,
        }
    }
}

/// An ordered filter chain. Empty means "no filter".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOperations {
    ops: Vec<FilterOperation>,
}

impl FilterOperations {
    /// An empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Appends a filter.
    pub fn append(&mut self, op: FilterOperation) {
        self.ops.push(op);
    }

    /// Returns `true` if there are no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// The filters in application order.
    #[must_use]
    pub fn as_slice(&self) -> &[FilterOperation] {
        &self.ops
    }

    /// Returns `true` if any filter samples outside each output pixel.
    #[must_use]
    pub fn has_filter_that_moves_pixels(&self) -> bool {
        self.ops.iter().any(FilterOperation::moves_pixels)
    }

    /// Returns `true` if any filter can change alpha.
    #[must_use]
    pub fn has_filter_that_affects_opacity(&self) -> bool {
        self.ops.iter().any(FilterOperation::affects_opacity)
    }
}

impl FromIterator<FilterOperation> for FilterOperations {
    fn from_iter<I: IntoIterator<Item = FilterOperation>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_filters_keep_pixels_in_place() {
        let chain: FilterOperations = [
            FilterOperation::Grayscale(1.0),
            FilterOperation::HueRotate(90.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(chain.len(), 2);
        assert!(!chain.has_filter_that_moves_pixels());
        assert!(!chain.has_filter_that_affects_opacity());
    }

    #[test]
    fn blur_moves_pixels_and_alpha() {
        let mut chain = FilterOperations::new();
        assert!(chain.is_empty());
        chain.append(FilterOperation::Blur(4.0));
        assert!(chain.has_filter_that_moves_pixels());
        assert!(chain.has_filter_that_affects_opacity());
    }

    #[test]
    fn full_opacity_is_neutral() {
        assert!(!FilterOperation::Opacity(1.0).affects_opacity());
        assert!(FilterOperation::Opacity(0.5).affects_opacity());
    }
}
