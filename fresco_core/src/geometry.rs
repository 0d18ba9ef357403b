// Copyright 2026 the Fresco Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel rects, damage accumulation, and clipped rect mapping.
//!
//! Output and content rects are integer pixel rects ([`IntRect`]). Damage is
//! accumulated as float rects ([`kurbo::Rect`]) because it is carried through
//! transforms without rounding.

use core::fmt;

use kurbo::{Point, Rect};
#[cfg(not(any(test, feature = "std")))]
use kurbo::common::FloatFuncs as _;

use crate::transform::Transform3d;

/// Homogeneous `w` below which a mapped point is treated as behind the viewer.
const W_EPSILON: f64 = 1e-8;

/// Width and height in pixels.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl IntSize {
    /// Zero by zero.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Debug for IntSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned pixel rect with its origin at `(x, y)`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl IntRect {
    /// Creates a rect.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rect of the given size at the origin.
    #[inline]
    #[must_use]
    pub const fn from_size(size: IntSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// The rect's size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> IntSize {
        IntSize::new(self.width, self.height)
    }

    /// Returns `true` if the rect covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    ///
    /// An empty rect is contained by nothing.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The overlap of two rects, or an empty rect if they do not overlap.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return Self::default();
        }
        Self::new(left, top, right.abs_diff(left), bottom.abs_diff(top))
    }

    /// The smallest rect covering both. Empty operands are ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right.abs_diff(left), bottom.abs_diff(top))
    }

    /// Converts to a float rect.
    #[inline]
    #[must_use]
    pub fn to_kurbo(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }

    /// The smallest pixel rect that covers `rect`.
    #[must_use]
    pub fn enclosing(rect: Rect) -> Self {
        if is_empty_rect(rect) {
            return Self::default();
        }
        let left = saturating_i32(rect.x0.floor());
        let top = saturating_i32(rect.y0.floor());
        let right = saturating_i32(rect.x1.ceil());
        let bottom = saturating_i32(rect.y1.ceil());
        Self::new(left, top, right.abs_diff(left), bottom.abs_diff(top))
    }
}

impl fmt::Debug for IntRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IntRect({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "float to int casts saturate; out-of-range edges clamp to the i32 range"
)]
fn saturating_i32(v: f64) -> i32 {
    v as i32
}

/// Returns `true` if `rect` has no area (including inverted rects).
#[inline]
#[must_use]
pub fn is_empty_rect(rect: Rect) -> bool {
    !(rect.x1 > rect.x0 && rect.y1 > rect.y0)
}

/// Unions two damage rects. An empty operand contributes nothing.
#[must_use]
pub fn union_rects(a: Rect, b: Rect) -> Rect {
    match (is_empty_rect(a), is_empty_rect(b)) {
        (true, _) => b,
        (_, true) => a,
        _ => a.union(b),
    }
}

/// Maps `rect` through `transform` and returns the bounding box of the
/// visible part of the result.
///
/// Corners are mapped in homogeneous coordinates. With perspective, the
/// mapped quad is clipped against the `w > 0` half space before the
/// perspective divide, so geometry behind the viewer never flips onto the
/// screen. A rect that is entirely behind the viewer maps to an empty rect.
#[must_use]
pub fn map_clipped_rect(transform: &Transform3d, rect: Rect) -> Rect {
    if transform.is_identity() {
        return rect;
    }
    let corners = [
        transform.map_point(rect.x0, rect.y0),
        transform.map_point(rect.x1, rect.y0),
        transform.map_point(rect.x1, rect.y1),
        transform.map_point(rect.x0, rect.y1),
    ];

    if !transform.has_perspective() {
        let points = corners.map(|c| Point::new(c[0], c[1]));
        return bounds(&points);
    }

    // One plane cuts a quad into at most five vertices.
    let mut clipped = [Point::ZERO; 8];
    let mut count = 0;
    for i in 0..corners.len() {
        let cur = corners[i];
        let next = corners[(i + 1) % corners.len()];
        let cur_visible = cur[3] > W_EPSILON;
        let next_visible = next[3] > W_EPSILON;
        if cur_visible {
            clipped[count] = project(cur);
            count += 1;
        }
        if cur_visible != next_visible {
            let t = (W_EPSILON - cur[3]) / (next[3] - cur[3]);
            let mut edge = [0.0; 4];
            for (k, v) in edge.iter_mut().enumerate() {
                *v = cur[k] + (next[k] - cur[k]) * t;
            }
            clipped[count] = project(edge);
            count += 1;
        }
    }
    if count == 0 {
        return Rect::ZERO;
    }
    bounds(&clipped[..count])
}

/// [`map_clipped_rect`] for pixel rects, rounding outward.
#[must_use]
pub fn map_clipped_int_rect(transform: &Transform3d, rect: IntRect) -> IntRect {
    if transform.is_identity() {
        return rect;
    }
    IntRect::enclosing(map_clipped_rect(transform, rect.to_kurbo()))
}

fn project(h: [f64; 4]) -> Point {
    Point::new(h[0] / h[3], h[1] / h[3])
}

fn bounds(points: &[Point]) -> Rect {
    let mut out = Rect::from_points(points[0], points[0]);
    for p in &points[1..] {
        out = out.union_pt(*p);
    }
    out
}
