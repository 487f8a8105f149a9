// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use nvg_geometry::{Bounds, PathCache};

use crate::{CompositeState, Error, ImageFlags, ImageId, Paint, Scissor, TextureKind};

/// The GPU side of a [`Context`](crate::Context).
///
/// A backend receives the tessellated geometry of each `fill` and `stroke` call
/// through the [`PathCache`]: every [`Contour`](nvg_geometry::Contour) carries a fill
/// span and a stroke span of [`Vertex`](nvg_geometry::Vertex) triangle strips.
///
/// ## Fills
///
/// If [`PathCache::is_convex_fill`] holds, the fill span of the single contour is a
/// triangle fan that can be drawn directly, followed by its fringe strip.
///
/// Otherwise overlapping areas have to be resolved with the stencil buffer. The
/// expected technique is:
///
/// 1. Draw every fill fan into the stencil only, incrementing on front faces and
///    decrementing on back faces (wrapping), with color writes off.
/// 2. Draw the fringe strips where the stencil is zero, to anti-alias the outline.
/// 3. Draw a quad covering `bounds` where the stencil is non-zero, clearing it to
///    zero as it goes.
///
/// ## Strokes
///
/// The stroke span of every contour is a triangle strip, with the coverage ramp in
/// the `u` coordinate. When
/// [`ContextOptions::stencil_strokes`](crate::ContextOptions::stencil_strokes) is set,
/// overlapping parts of a translucent stroke should be drawn only once.
pub trait RenderBackend {
    /// Called at the start of every frame.
    fn viewport(&mut self, width: f32, height: f32, device_pixel_ratio: f32);

    /// Drops every draw call recorded since the last [`viewport`](Self::viewport).
    fn cancel(&mut self);

    /// Submits the draw calls of the frame.
    fn flush(&mut self);

    /// Draws the fill geometry of `paths`.
    fn render_fill(
        &mut self,
        paint: &Paint,
        composite: CompositeState,
        scissor: &Scissor,
        fringe: f32,
        bounds: Bounds,
        paths: &PathCache,
    );

    /// Draws the stroke geometry of `paths`.
    fn render_stroke(
        &mut self,
        paint: &Paint,
        composite: CompositeState,
        scissor: &Scissor,
        fringe: f32,
        stroke_width: f32,
        paths: &PathCache,
    );

    /// Creates a texture, optionally initialized from tightly packed `data`.
    fn create_texture(
        &mut self,
        kind: TextureKind,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: Option<&[u8]>,
    ) -> Result<ImageId, Error>;

    /// Replaces a region of a texture with tightly packed `data`.
    fn update_texture(
        &mut self,
        image: ImageId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<(), Error>;

    fn delete_texture(&mut self, image: ImageId) -> Result<(), Error>;

    /// Width and height of a texture, in pixels.
    fn texture_size(&self, image: ImageId) -> Result<(u32, u32), Error>;
}
