// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! nvg tests.
//!
//! [`RecordingBackend`] keeps a copy of everything a [`Context`] hands to its backend,
//! so that tests can inspect the tessellated geometry without a GPU.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![allow(missing_docs, clippy::missing_assert_message)]

use std::collections::HashMap;

use anyhow::{ensure, Result};
use nvg::nvg_geometry::math::triarea2;
use nvg::{
    Bounds, CompositeState, Context, ContextOptions, Error, ImageFlags, ImageId, Paint,
    PathCache, RenderBackend, Scissor, TextureKind, Vertex,
};

/// Geometry of one contour, as received by the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedContour {
    pub closed: bool,
    pub convex: bool,
    pub fill: Vec<Vertex>,
    pub stroke: Vec<Vertex>,
}

/// State shared by fill and stroke calls.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    pub paint: Paint,
    pub composite: CompositeState,
    pub scissor: Scissor,
    pub fringe: f32,
    pub contours: Vec<RecordedContour>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Fill {
        state: DrawState,
        bounds: Bounds,
        convex: bool,
    },
    Stroke {
        state: DrawState,
        stroke_width: f32,
    },
}

impl DrawCall {
    pub fn state(&self) -> &DrawState {
        match self {
            Self::Fill { state, .. } | Self::Stroke { state, .. } => state,
        }
    }

    pub fn contours(&self) -> &[RecordedContour] {
        &self.state().contours
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub kind: TextureKind,
    pub width: u32,
    pub height: u32,
    pub flags: ImageFlags,
    pub data: Vec<u8>,
}

/// A backend that stores draw calls and textures in memory.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub viewport: Option<(f32, f32, f32)>,
    /// Calls of the frame in progress.
    pub calls: Vec<DrawCall>,
    /// Calls of the last flushed frame.
    pub flushed: Vec<DrawCall>,
    pub frames: usize,
    pub textures: HashMap<ImageId, Texture>,
    next_texture: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_call(&self) -> Option<&DrawCall> {
        self.calls.last()
    }
}

fn record(
    paint: &Paint,
    composite: CompositeState,
    scissor: &Scissor,
    fringe: f32,
    paths: &PathCache,
) -> DrawState {
    let contours = paths
        .contours()
        .iter()
        .map(|contour| RecordedContour {
            closed: contour.is_closed(),
            convex: contour.is_convex(),
            fill: paths.fill_vertices(contour).to_vec(),
            stroke: paths.stroke_vertices(contour).to_vec(),
        })
        .collect();
    DrawState {
        paint: paint.clone(),
        composite,
        scissor: *scissor,
        fringe,
        contours,
    }
}

impl RenderBackend for RecordingBackend {
    fn viewport(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport = Some((width, height, device_pixel_ratio));
        self.calls.clear();
    }

    fn cancel(&mut self) {
        self.calls.clear();
    }

    fn flush(&mut self) {
        log::debug!("flushing {} draw calls", self.calls.len());
        self.flushed = std::mem::take(&mut self.calls);
        self.frames += 1;
    }

    fn render_fill(
        &mut self,
        paint: &Paint,
        composite: CompositeState,
        scissor: &Scissor,
        fringe: f32,
        bounds: Bounds,
        paths: &PathCache,
    ) {
        self.calls.push(DrawCall::Fill {
            state: record(paint, composite, scissor, fringe, paths),
            bounds,
            convex: paths.is_convex_fill(),
        });
    }

    fn render_stroke(
        &mut self,
        paint: &Paint,
        composite: CompositeState,
        scissor: &Scissor,
        fringe: f32,
        stroke_width: f32,
        paths: &PathCache,
    ) {
        self.calls.push(DrawCall::Stroke {
            state: record(paint, composite, scissor, fringe, paths),
            stroke_width,
        });
    }

    fn create_texture(
        &mut self,
        kind: TextureKind,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: Option<&[u8]>,
    ) -> Result<ImageId, Error> {
        let len = width as usize * height as usize * kind.bytes_per_pixel();
        let data = match data {
            Some(data) => data.to_vec(),
            None => vec![0; len],
        };
        self.next_texture += 1;
        let image = ImageId::new(self.next_texture);
        self.textures.insert(
            image,
            Texture {
                kind,
                width,
                height,
                flags,
                data,
            },
        );
        Ok(image)
    }

    fn update_texture(
        &mut self,
        image: ImageId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        data: &[u8],
    ) -> Result<(), Error> {
        let texture = self
            .textures
            .get_mut(&image)
            .ok_or(Error::UnknownImage(image))?;
        if x.saturating_add(width) > texture.width || y.saturating_add(height) > texture.height {
            return Err(Error::Backend(format!(
                "region {width}x{height} at ({x}, {y}) is outside the texture"
            )));
        }
        let bpp = texture.kind.bytes_per_pixel();
        let row = width as usize * bpp;
        for (i, src) in data.chunks_exact(row).take(height as usize).enumerate() {
            let offset = ((y as usize + i) * texture.width as usize + x as usize) * bpp;
            texture.data[offset..offset + row].copy_from_slice(src);
        }
        Ok(())
    }

    fn delete_texture(&mut self, image: ImageId) -> Result<(), Error> {
        self.textures
            .remove(&image)
            .map(|_| ())
            .ok_or(Error::UnknownImage(image))
    }

    fn texture_size(&self, image: ImageId) -> Result<(u32, u32), Error> {
        self.textures
            .get(&image)
            .map(|t| (t.width, t.height))
            .ok_or(Error::UnknownImage(image))
    }
}

/// A context drawing into a [`RecordingBackend`], with a frame already begun.
pub fn recording_context(
    width: f32,
    height: f32,
    device_pixel_ratio: f32,
    options: ContextOptions,
) -> Result<Context<RecordingBackend>> {
    let mut ctx = Context::new(RecordingBackend::new(), options);
    ctx.begin_frame(width, height, device_pixel_ratio)?;
    Ok(ctx)
}

/// Half the signed area of a closed polygon, using the same orientation as the
/// tessellator: positive for solid contours.
pub fn signed_area(points: &[(f32, f32)]) -> f32 {
    let Some(&(ax, ay)) = points.first() else {
        return 0.0;
    };
    points
        .windows(2)
        .skip(1)
        .map(|w| triarea2(ax, ay, w[0].0, w[0].1, w[1].0, w[1].1))
        .sum::<f32>()
        * 0.5
}

/// Axis aligned bounds of `vertices` as `[min_x, min_y, max_x, max_y]`.
pub fn vertex_bounds(vertices: &[Vertex]) -> [f32; 4] {
    vertices.iter().fold(
        [f32::MAX, f32::MAX, f32::MIN, f32::MIN],
        |[x0, y0, x1, y1], v| [x0.min(v.x), y0.min(v.y), x1.max(v.x), y1.max(v.y)],
    )
}

/// Checks the invariants every path cache must hold after an expansion.
pub fn check_cache(cache: &PathCache) -> Result<()> {
    let total = cache.vertices().len();
    ensure!(
        total <= cache.vertex_budget(),
        "{total} vertices exceed the budget of {}",
        cache.vertex_budget()
    );
    let mut spans: Vec<_> = cache
        .contours()
        .iter()
        .flat_map(|c| [c.fill_range(), c.stroke_range()])
        .filter(|r| !r.is_empty())
        .collect();
    spans.sort_by_key(|r| r.start);
    for pair in spans.windows(2) {
        ensure!(pair[0].end <= pair[1].start, "overlapping spans {pair:?}");
    }
    for span in &spans {
        ensure!(span.end <= total, "span {span:?} past {total} vertices");
    }
    for v in cache.vertices() {
        ensure!(v.x.is_finite() && v.y.is_finite(), "non-finite vertex {v:?}");
        ensure!((0.0..=1.0).contains(&v.u), "coverage out of range {v:?}");
    }
    Ok(())
}
