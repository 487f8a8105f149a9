// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paints and image handles.

use core::ops::{BitOr, BitOrAssign};

use peniko::kurbo::{Affine, Point, Rect, Size, Vec2};
use peniko::Color;

/// Handle of a texture owned by the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u32);

impl ImageId {
    /// Wraps a backend specific texture id.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

/// Pixel layout of a texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// One coverage byte per pixel.
    Alpha,
    /// Four bytes per pixel, RGBA order.
    Rgba,
}

impl TextureKind {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Alpha => 1,
            Self::Rgba => 4,
        }
    }
}

/// Sampling and storage options of an image.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageFlags(u32);

impl ImageFlags {
    pub const GENERATE_MIPMAPS: Self = Self(1 << 0);
    pub const REPEAT_X: Self = Self(1 << 1);
    pub const REPEAT_Y: Self = Self(1 << 2);
    /// Flip the image vertically when rendering.
    pub const FLIP_Y: Self = Self(1 << 3);
    /// The pixel data is premultiplied by alpha.
    pub const PREMULTIPLIED: Self = Self(1 << 4);
    /// Nearest neighbor filtering instead of linear.
    pub const NEAREST: Self = Self(1 << 5);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ImageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ImageFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// How fills and strokes are colored.
///
/// All paints are evaluated the same way by backends: the fragment position is
/// mapped through the inverse of `transform`, the signed distance to a rounded box
/// of half size `extent` and corner `radius` is computed, and the color ramps from
/// `inner_color` to `outer_color` over `feather`. Image paints sample `image` instead
/// and tint it with `inner_color`.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    pub transform: Affine,
    pub extent: [f32; 2],
    pub radius: f32,
    pub feather: f32,
    pub inner_color: Color,
    pub outer_color: Color,
    pub image: Option<ImageId>,
}

const LARGE: f64 = 1e5;

impl Paint {
    /// A solid color.
    pub fn color(color: Color) -> Self {
        Self {
            transform: Affine::IDENTITY,
            extent: [0.0; 2],
            radius: 0.0,
            feather: 1.0,
            inner_color: color,
            outer_color: color,
            image: None,
        }
    }

    /// A linear gradient from `inner` at `start` to `outer` at `end`.
    pub fn linear_gradient(
        start: impl Into<Point>,
        end: impl Into<Point>,
        inner: Color,
        outer: Color,
    ) -> Self {
        let start = start.into();
        let delta = end.into() - start;
        let d = delta.hypot();
        let dir = if d > 1e-4 {
            delta / d
        } else {
            Vec2::new(0.0, 1.0)
        };
        let origin = start - dir * LARGE;
        Self {
            transform: Affine::new([dir.y, -dir.x, dir.x, dir.y, origin.x, origin.y]),
            extent: [LARGE as f32, (LARGE + d * 0.5) as f32],
            radius: 0.0,
            feather: d.max(1.0) as f32,
            ..Self::color(inner).with_outer(outer)
        }
    }

    /// A radial gradient around `center`, `inner` inside `inner_radius` and `outer`
    /// beyond `outer_radius`.
    pub fn radial_gradient(
        center: impl Into<Point>,
        inner_radius: f32,
        outer_radius: f32,
        inner: Color,
        outer: Color,
    ) -> Self {
        let r = (inner_radius + outer_radius) * 0.5;
        Self {
            transform: Affine::translate(center.into().to_vec2()),
            extent: [r, r],
            radius: r,
            feather: (outer_radius - inner_radius).max(1.0),
            ..Self::color(inner).with_outer(outer)
        }
    }

    /// A feathered rounded rectangle, useful for drop shadows.
    pub fn box_gradient(rect: Rect, radius: f32, feather: f32, inner: Color, outer: Color) -> Self {
        Self {
            transform: Affine::translate(rect.center().to_vec2()),
            extent: [(rect.width() * 0.5) as f32, (rect.height() * 0.5) as f32],
            radius,
            feather: feather.max(1.0),
            ..Self::color(inner).with_outer(outer)
        }
    }

    /// An image pattern with its top left corner at `origin`, each repetition being
    /// `size` large and rotated by `angle` radians.
    pub fn image_pattern(
        origin: impl Into<Point>,
        size: Size,
        angle: f64,
        image: ImageId,
        alpha: f32,
    ) -> Self {
        let tint = Color::new([1.0, 1.0, 1.0, alpha]);
        Self {
            transform: Affine::translate(origin.into().to_vec2()) * Affine::rotate(angle),
            extent: [size.width as f32, size.height as f32],
            radius: 0.0,
            feather: 0.0,
            inner_color: tint,
            outer_color: tint,
            image: Some(image),
        }
    }

    fn with_outer(mut self, outer: Color) -> Self {
        self.outer_color = outer;
        self
    }

    /// Multiplies the alpha of both colors by `alpha`.
    pub(crate) fn multiply_alpha(&mut self, alpha: f32) {
        self.inner_color = self.inner_color.multiply_alpha(alpha);
        self.outer_color = self.outer_color.multiply_alpha(alpha);
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::color(color)
    }
}
