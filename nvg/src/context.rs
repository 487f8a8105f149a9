// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::HashMap;

use nvg_geometry::{CommandBuffer, PathCache, Tolerances, Transform, Winding};
use peniko::kurbo::{Affine, Cap, Join};
use peniko::{Color, Compose};

use crate::state::StateStack;
use crate::{
    BlendFactor, CompositeState, ContextOptions, Error, FrameStats, ImageFlags, ImageId, Paint,
    RenderBackend, Scissor, TextureKind, MAX_STROKE_WIDTH,
};

/// Miter limit used when generating the anti-aliasing fringe of fills.
const FILL_MITER_LIMIT: f32 = 2.4;

/// Mean of the scale factors of `transform` along the two axes.
pub fn average_scale(transform: &Affine) -> f32 {
    Transform::from_kurbo(transform).average_scale()
}

/// An immediate mode drawing context.
///
/// Paths are built with the path methods and drawn with [`fill`](Self::fill) or
/// [`stroke`](Self::stroke), which tessellate them and hand the geometry to the
/// [`RenderBackend`]. Coordinates are transformed by the current transform as they are
/// added, so the transform may change in the middle of a path.
///
/// All buffers are kept from frame to frame.
#[derive(Debug)]
pub struct Context<B> {
    backend: B,
    options: ContextOptions,
    commands: CommandBuffer,
    cache: PathCache,
    states: StateStack,
    tolerances: Tolerances,
    device_pixel_ratio: f32,
    images: HashMap<ImageId, TextureKind>,
    stats: FrameStats,
}

impl<B: RenderBackend> Context<B> {
    /// Creates a context drawing through `backend`.
    pub fn new(backend: B, options: ContextOptions) -> Self {
        Self {
            backend,
            options,
            commands: CommandBuffer::new(),
            cache: PathCache::new(),
            states: StateStack::new(),
            tolerances: Tolerances::default(),
            device_pixel_ratio: 1.0,
            images: HashMap::new(),
            stats: FrameStats::default(),
        }
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the context, returning its backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// The commands of the current path, in device space.
    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    /// The geometry generated by the last [`fill`](Self::fill) or
    /// [`stroke`](Self::stroke).
    pub fn path_cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    // --- Frame lifecycle ---

    /// Starts drawing a new frame.
    ///
    /// Resets the state stack to a single default state and derives the tessellation
    /// tolerances from `device_pixel_ratio`, which must be finite and positive.
    pub fn begin_frame(
        &mut self,
        window_width: f32,
        window_height: f32,
        device_pixel_ratio: f32,
    ) -> Result<(), Error> {
        if !(device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0) {
            return Err(Error::InvalidDevicePixelRatio(device_pixel_ratio));
        }
        self.states.clear();
        self.device_pixel_ratio = device_pixel_ratio;
        self.tolerances = Tolerances::from_device_pixel_ratio(device_pixel_ratio);
        self.commands.set_tolerances(&self.tolerances);
        self.backend
            .viewport(window_width, window_height, device_pixel_ratio);
        self.stats = FrameStats::default();
        Ok(())
    }

    /// Discards the draw calls of the current frame.
    pub fn cancel_frame(&mut self) {
        self.backend.cancel();
    }

    /// Submits the draw calls of the current frame.
    pub fn end_frame(&mut self) {
        let depth = self.states.depth();
        if depth > 1 {
            log::warn!("end_frame with {} unbalanced save(s)", depth - 1);
            self.states.clear();
        }
        self.backend.flush();
    }

    /// Counters accumulated since [`begin_frame`](Self::begin_frame).
    pub fn frame_stats(&self) -> FrameStats {
        self.stats
    }

    // --- State handling ---

    /// Pushes a copy of the current state.
    pub fn save(&mut self) -> Result<(), Error> {
        self.states
            .save()
            .inspect_err(|err| log::debug!("save rejected: {err}"))
    }

    /// Pops the state pushed by the matching [`save`](Self::save).
    pub fn restore(&mut self) -> Result<(), Error> {
        self.states
            .restore()
            .inspect_err(|err| log::debug!("restore rejected: {err}"))
    }

    /// Resets the current state to its defaults.
    pub fn reset(&mut self) {
        self.states.reset();
    }

    /// Number of states on the stack, including the base state.
    pub fn state_depth(&self) -> usize {
        self.states.depth()
    }

    pub fn set_shape_anti_alias(&mut self, enabled: bool) {
        self.states.current_mut().shape_anti_alias = enabled;
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.states.current_mut().stroke_width = width;
    }

    /// Sets the limit above which sharp corners are beveled instead of mitered.
    pub fn set_miter_limit(&mut self, limit: f32) {
        self.states.current_mut().miter_limit = limit;
    }

    pub fn set_line_cap(&mut self, cap: Cap) {
        self.states.current_mut().line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: Join) {
        self.states.current_mut().line_join = join;
    }

    /// Sets the transparency applied to everything drawn afterwards.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.states.current_mut().alpha = alpha;
    }

    pub fn set_global_composite_operation(&mut self, op: Compose) {
        self.states.current_mut().composite = op.into();
    }

    pub fn set_global_composite_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.states.current_mut().composite = CompositeState::new(src, dst);
    }

    pub fn set_global_composite_blend_func_separate(
        &mut self,
        src_rgb: BlendFactor,
        dst_rgb: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) {
        self.states.current_mut().composite =
            CompositeState::separate(src_rgb, dst_rgb, src_alpha, dst_alpha);
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.states.current_mut().stroke = Paint::color(color);
    }

    /// Sets the stroke paint. Its transform is relative to the current transform.
    pub fn set_stroke_paint(&mut self, paint: Paint) {
        let state = self.states.current_mut();
        state.stroke = Paint {
            transform: state.transform * paint.transform,
            ..paint
        };
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.states.current_mut().fill = Paint::color(color);
    }

    /// Sets the fill paint. Its transform is relative to the current transform.
    pub fn set_fill_paint(&mut self, paint: Paint) {
        let state = self.states.current_mut();
        state.fill = Paint {
            transform: state.transform * paint.transform,
            ..paint
        };
    }

    // --- Transforms ---

    pub fn current_transform(&self) -> Affine {
        self.states.current().transform
    }

    /// Applies `transform` before the current transform.
    pub fn transform(&mut self, transform: Affine) {
        let state = self.states.current_mut();
        state.transform *= transform;
    }

    pub fn reset_transform(&mut self) {
        self.states.current_mut().transform = Affine::IDENTITY;
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.transform(Affine::translate((f64::from(x), f64::from(y))));
    }

    /// Rotates by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        self.transform(Affine::rotate(f64::from(angle)));
    }

    /// Skews along the x axis by `angle` radians.
    pub fn skew_x(&mut self, angle: f32) {
        self.transform(Affine::skew(f64::from(angle).tan(), 0.0));
    }

    /// Skews along the y axis by `angle` radians.
    pub fn skew_y(&mut self, angle: f32) {
        self.transform(Affine::skew(0.0, f64::from(angle).tan()));
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.transform(Affine::scale_non_uniform(f64::from(x), f64::from(y)));
    }

    // --- Scissoring ---

    /// Clips drawing to the rectangle, in the current coordinate space.
    pub fn set_scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let state = self.states.current_mut();
        let w = w.max(0.0);
        let h = h.max(0.0);
        let center = Affine::translate((f64::from(x + w * 0.5), f64::from(y + h * 0.5)));
        state.scissor = Scissor {
            transform: state.transform * center,
            extent: [w * 0.5, h * 0.5],
        };
    }

    /// Intersects the current scissor with the rectangle.
    ///
    /// When the two are not aligned the current scissor is approximated by its
    /// bounding box in the current coordinate space.
    pub fn intersect_scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let state = self.states.current();
        if !state.scissor.is_active() {
            self.set_scissor(x, y, w, h);
            return;
        }

        let [ex, ey] = state.scissor.extent.map(f64::from);
        let local = state.transform.inverse() * state.scissor.transform;
        let [a, b, c, d, e, f] = local.as_coeffs();
        let tex = ex * a.abs() + ey * c.abs();
        let tey = ex * b.abs() + ey * d.abs();

        let min_x = (e - tex).max(f64::from(x));
        let min_y = (f - tey).max(f64::from(y));
        let max_x = (e + tex).min(f64::from(x + w));
        let max_y = (f + tey).min(f64::from(y + h));
        self.set_scissor(
            min_x as f32,
            min_y as f32,
            (max_x - min_x).max(0.0) as f32,
            (max_y - min_y).max(0.0) as f32,
        );
    }

    pub fn scissor(&self) -> Scissor {
        self.states.current().scissor
    }

    pub fn reset_scissor(&mut self) {
        self.states.current_mut().scissor = Scissor::NONE;
    }

    // --- Images ---

    /// Creates an RGBA image from tightly packed pixel data.
    pub fn create_image_rgba(
        &mut self,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: &[u8],
    ) -> Result<ImageId, Error> {
        self.create_image(TextureKind::Rgba, width, height, flags, data)
    }

    /// Creates a single channel image from tightly packed coverage data.
    pub fn create_image_alpha(
        &mut self,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: &[u8],
    ) -> Result<ImageId, Error> {
        self.create_image(TextureKind::Alpha, width, height, flags, data)
    }

    fn create_image(
        &mut self,
        kind: TextureKind,
        width: u32,
        height: u32,
        flags: ImageFlags,
        data: &[u8],
    ) -> Result<ImageId, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageSize { width, height });
        }
        check_data_size(kind, width, height, data)?;
        let image = self
            .backend
            .create_texture(kind, width, height, flags, Some(data))?;
        self.images.insert(image, kind);
        Ok(image)
    }

    /// Replaces the whole content of an image.
    pub fn update_image(&mut self, image: ImageId, data: &[u8]) -> Result<(), Error> {
        let kind = *self.images.get(&image).ok_or(Error::UnknownImage(image))?;
        let (width, height) = self.backend.texture_size(image)?;
        check_data_size(kind, width, height, data)?;
        self.backend
            .update_texture(image, 0, 0, width, height, data)
    }

    /// Width and height of an image, in pixels.
    pub fn image_size(&self, image: ImageId) -> Result<(u32, u32), Error> {
        if !self.images.contains_key(&image) {
            return Err(Error::UnknownImage(image));
        }
        self.backend.texture_size(image)
    }

    pub fn delete_image(&mut self, image: ImageId) -> Result<(), Error> {
        if self.images.remove(&image).is_none() {
            return Err(Error::UnknownImage(image));
        }
        self.backend.delete_texture(image)
    }

    // --- Paths ---

    /// Clears the current path.
    pub fn begin_path(&mut self) {
        self.commands.clear();
        self.cache.clear();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.path().move_to(x, y);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.path().line_to(x, y);
    }

    pub fn bezier_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.path().bezier_to(c1x, c1y, c2x, c2y, x, y);
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.path().quad_to(cx, cy, x, y);
    }

    /// Adds an arc of radius `radius` tangent to the lines from the last point to
    /// `(x1, y1)` and from there to `(x2, y2)`.
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        self.path().arc_to(x1, y1, x2, y2, radius);
    }

    pub fn close_path(&mut self) {
        self.path().close_path();
    }

    /// Sets whether the current sub-path is a solid shape or a hole.
    pub fn path_winding(&mut self, winding: Winding) {
        self.path().path_winding(winding);
    }

    pub fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, dir: Winding) {
        self.path().arc(cx, cy, r, a0, a1, dir);
    }

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.path().rect(x, y, w, h);
    }

    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        self.path().rounded_rect(x, y, w, h, r);
    }

    #[expect(clippy::too_many_arguments, reason = "One radius per corner.")]
    pub fn rounded_rect_varying(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top_left: f32,
        top_right: f32,
        bottom_right: f32,
        bottom_left: f32,
    ) {
        self.path().rounded_rect_varying(
            x,
            y,
            w,
            h,
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        );
    }

    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        self.path().ellipse(cx, cy, rx, ry);
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.path().circle(cx, cy, r);
    }

    /// The command buffer, synced with the current transform.
    ///
    /// Appending invalidates the geometry of earlier `fill` and `stroke` calls.
    fn path(&mut self) -> &mut CommandBuffer {
        self.cache.clear();
        let transform = Transform::from_kurbo(&self.states.current().transform);
        self.commands.set_transform(transform);
        &mut self.commands
    }

    // --- Drawing ---

    /// Fills the current path with the fill paint.
    pub fn fill(&mut self) {
        let state = self.states.current();
        let fringe = self.tolerances.fringe_width;

        self.cache.flatten(&self.commands, &self.tolerances);
        let w = if self.options.edge_antialias && state.shape_anti_alias {
            fringe
        } else {
            0.0
        };
        self.cache.expand_fill(w, Join::Miter, FILL_MITER_LIMIT);

        let mut paint = state.fill.clone();
        paint.multiply_alpha(state.alpha);

        self.backend.render_fill(
            &paint,
            state.composite,
            &state.scissor,
            fringe,
            self.cache.bounds(),
            &self.cache,
        );

        for contour in self.cache.contours() {
            self.stats.fill_triangles += contour.fill_range().len().saturating_sub(2);
            self.stats.fill_triangles += contour.stroke_range().len().saturating_sub(2);
            self.stats.draw_calls += 2;
        }
    }

    /// Strokes the current path with the stroke paint.
    ///
    /// Strokes thinner than a device pixel are drawn one pixel wide with reduced
    /// alpha.
    pub fn stroke(&mut self) {
        let state = self.states.current();
        let fringe = self.tolerances.fringe_width;
        let scale = average_scale(&state.transform);
        let mut stroke_width = (state.stroke_width * scale).clamp(0.0, MAX_STROKE_WIDTH);
        let mut paint = state.stroke.clone();

        if stroke_width < fringe {
            // Approximate the coverage of a hairline by its alpha.
            let alpha = (stroke_width / fringe).clamp(0.0, 1.0);
            paint.multiply_alpha(alpha * alpha);
            stroke_width = fringe;
        }
        paint.multiply_alpha(state.alpha);

        self.cache.flatten(&self.commands, &self.tolerances);
        let aa = if self.options.edge_antialias && state.shape_anti_alias {
            fringe
        } else {
            0.0
        };
        self.cache.expand_stroke(
            stroke_width * 0.5,
            aa,
            state.line_cap,
            state.line_join,
            state.miter_limit,
            self.tolerances.tess_tol,
        );

        self.backend.render_stroke(
            &paint,
            state.composite,
            &state.scissor,
            fringe,
            stroke_width,
            &self.cache,
        );

        for contour in self.cache.contours() {
            self.stats.stroke_triangles += contour.stroke_range().len().saturating_sub(2);
            self.stats.draw_calls += 1;
        }
    }
}

fn check_data_size(kind: TextureKind, width: u32, height: u32, data: &[u8]) -> Result<(), Error> {
    let expected = width as usize * height as usize * kind.bytes_per_pixel();
    if data.len() != expected {
        return Err(Error::ImageDataSize {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}
