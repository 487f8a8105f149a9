// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-path tessellation state.

use core::ops::{BitOr, BitOrAssign, Range};

use bytemuck::{Pod, Zeroable};

use crate::GrowableBuffer;

/// Classification bits of a flattened [`Point`].
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct PointFlags(u8);

impl PointFlags {
    /// The point is the end of a line or of a whole curve and must stay sharp.
    pub const CORNER: Self = Self(0x1);
    /// The contour turns left at this point.
    pub const LEFT: Self = Self(0x2);
    /// The outer side of the join is beveled.
    pub const BEVEL: Self = Self(0x4);
    /// The inner side of the join is too short for a miter.
    pub const INNER_BEVEL: Self = Self(0x8);

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any bit of `other` is set in `self`.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Sets the bits of `other`.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub const fn is_corner(self) -> bool {
        self.contains(Self::CORNER)
    }

    #[inline]
    pub const fn is_left(self) -> bool {
        self.contains(Self::LEFT)
    }

    #[inline]
    pub const fn is_bevel(self) -> bool {
        self.contains(Self::BEVEL)
    }

    #[inline]
    pub const fn is_inner_bevel(self) -> bool {
        self.contains(Self::INNER_BEVEL)
    }

    /// Returns `true` if either side of the join is beveled.
    #[inline]
    pub const fn needs_bevel(self) -> bool {
        self.intersects(Self(Self::BEVEL.0 | Self::INNER_BEVEL.0))
    }
}

impl BitOr for PointFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PointFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl core::fmt::Debug for PointFlags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut set = f.debug_set();
        for (flag, name) in [
            (Self::CORNER, "CORNER"),
            (Self::LEFT, "LEFT"),
            (Self::BEVEL, "BEVEL"),
            (Self::INNER_BEVEL, "INNER_BEVEL"),
        ] {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// A vertex of a flattened contour.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Normalized direction to the next point of the contour.
    pub dx: f32,
    pub dy: f32,
    /// Distance to the next point.
    pub len: f32,
    /// Miter direction, scaled so that `dm * w` reaches the offset corner.
    pub dmx: f32,
    pub dmy: f32,
    pub flags: PointFlags,
}

/// Orientation of a contour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Winding {
    /// Solid shapes.
    #[default]
    CounterClockwise,
    /// Holes.
    Clockwise,
}

impl Winding {
    pub const SOLID: Self = Self::CounterClockwise;
    pub const HOLE: Self = Self::Clockwise;

    /// Encodes the winding as a command operand.
    pub const fn to_operand(self) -> f32 {
        match self {
            Self::CounterClockwise => 1.0,
            Self::Clockwise => 2.0,
        }
    }

    /// Decodes a command operand. Unknown values are treated as solid.
    pub fn from_operand(value: f32) -> Self {
        if value == 2.0 {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }
}

/// One polyline of a flattened path.
///
/// Produced by [`PathCache::flatten`]; the join and vertex fields are filled in by the
/// later stages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    pub(crate) first: usize,
    pub(crate) count: usize,
    pub(crate) closed: bool,
    pub(crate) winding: Winding,
    pub(crate) convex: bool,
    pub(crate) bevel_count: usize,
    pub(crate) fill: Range<usize>,
    pub(crate) stroke: Range<usize>,
}

impl Contour {
    /// Index of the first point in [`PathCache::points`].
    pub fn first_point(&self) -> usize {
        self.first
    }

    pub fn point_count(&self) -> usize {
        self.count
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn winding(&self) -> Winding {
        self.winding
    }

    /// Whether every join turns left and the outline winds around exactly once.
    ///
    /// Only meaningful after [`PathCache::calculate_joins`].
    pub fn is_convex(&self) -> bool {
        self.convex
    }

    /// Number of points flagged as bevel or inner bevel.
    pub fn bevel_count(&self) -> usize {
        self.bevel_count
    }

    /// Range of the fill span in [`PathCache::vertices`].
    pub fn fill_range(&self) -> Range<usize> {
        self.fill.clone()
    }

    /// Range of the stroke or fringe span in [`PathCache::vertices`].
    pub fn stroke_range(&self) -> Range<usize> {
        self.stroke.clone()
    }
}

/// Output vertex, uploaded as is by backends.
///
/// `u` is the coverage ramp across a stroke or fringe, `v` is 0 on the anti-aliased
/// outer edge of a butt or square cap and 1 everywhere else.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

static_assertions::const_assert_eq!(core::mem::size_of::<Vertex>(), 16);

impl Vertex {
    #[inline]
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self { x, y, u, v }
    }
}

/// Axis-aligned bounding box of the flattened points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// The inverted box that every point extends.
    pub const EMPTY: Self = Self {
        min_x: f32::INFINITY,
        min_y: f32::INFINITY,
        max_x: f32::NEG_INFINITY,
        max_y: f32::NEG_INFINITY,
    };

    /// Returns `true` if no point has been added.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Extends the box to contain `(x, y)`.
    #[inline]
    pub fn add_point(&mut self, x: f32, y: f32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// `[min_x, min_y, max_x, max_y]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Flattened contours and generated geometry of the current path.
///
/// The three buffers are kept across paths and frames; [`clear`](Self::clear) only
/// resets their lengths.
#[derive(Clone, Debug, Default)]
pub struct PathCache {
    pub(crate) points: GrowableBuffer<Point>,
    pub(crate) contours: GrowableBuffer<Contour>,
    pub(crate) vertices: GrowableBuffer<Vertex>,
    pub(crate) bounds: Bounds,
    pub(crate) vertex_budget: usize,
    pub(crate) is_flattened: bool,
}

impl PathCache {
    pub fn new() -> Self {
        Self {
            points: GrowableBuffer::with_capacity(128),
            contours: GrowableBuffer::with_capacity(16),
            vertices: GrowableBuffer::with_capacity(256),
            bounds: Bounds::EMPTY,
            vertex_budget: 0,
            is_flattened: false,
        }
    }

    /// Forgets the current path, keeping the storage.
    pub fn clear(&mut self) {
        self.points.clear();
        self.contours.clear();
        self.vertices.clear();
        self.bounds = Bounds::EMPTY;
        self.vertex_budget = 0;
        self.is_flattened = false;
    }

    /// Whether [`flatten`](Self::flatten) has run since the last clear.
    pub fn is_flattened(&self) -> bool {
        self.is_flattened
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// The points of `contour`.
    pub fn points(&self, contour: &Contour) -> &[Point] {
        &self.points[contour.first..contour.first + contour.count]
    }

    /// Every vertex generated by the last expansion.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The fill span of `contour`, empty after a stroke expansion.
    pub fn fill_vertices(&self, contour: &Contour) -> &[Vertex] {
        &self.vertices[contour.fill.clone()]
    }

    /// The stroke span of `contour`, or its fringe after a fill expansion.
    pub fn stroke_vertices(&self, contour: &Contour) -> &[Vertex] {
        &self.vertices[contour.stroke.clone()]
    }

    /// Bounding box over all flattened points.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Upper bound on the vertex count computed before the last expansion.
    pub fn vertex_budget(&self) -> usize {
        self.vertex_budget
    }

    /// Number of vertices the cache can hold without growing.
    pub fn vertex_capacity(&self) -> usize {
        self.vertices.capacity()
    }

    /// Reserves room for `budget` vertices before an expansion.
    pub(crate) fn reserve_vertices(&mut self, budget: usize) {
        self.vertices.clear();
        self.vertices.ensure_capacity(budget);
        self.vertex_budget = budget;
    }
}
