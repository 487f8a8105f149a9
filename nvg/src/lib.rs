// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An immediate mode 2D vector renderer.
//!
//! nvg builds paths with a canvas-like API, tessellates them into anti-aliased
//! triangle geometry on the CPU and hands the result to a [`RenderBackend`], which
//! only has to draw triangle fans and strips with a simple fragment shader.
//!
//! ```ignore
//! let mut ctx = nvg::Context::new(backend, nvg::ContextOptions::default());
//! ctx.begin_frame(800.0, 600.0, 2.0)?;
//! ctx.begin_path();
//! ctx.rounded_rect(10.0, 10.0, 200.0, 100.0, 8.0);
//! ctx.set_fill_color(nvg::Color::from_rgba8(40, 120, 200, 255));
//! ctx.fill();
//! ctx.end_frame();
//! ```
//!
//! The tessellator itself lives in [`nvg_geometry`].

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![allow(
    clippy::cast_possible_truncation,
    reason = "Paint and scissor geometry is stored in f32 while kurbo works in f64."
)]

mod backend;
mod composite;
mod context;
mod paint;
mod state;

use thiserror::Error;

pub use backend::RenderBackend;
pub use composite::{BlendFactor, CompositeState};
pub use context::{average_scale, Context};
pub use paint::{ImageFlags, ImageId, Paint, TextureKind};
pub use state::Scissor;

pub use nvg_geometry;
pub use nvg_geometry::{Bounds, Contour, PathCache, Vertex, Winding};
pub use peniko;
pub use peniko::kurbo;
pub use peniko::kurbo::{Affine, Cap, Join};
pub use peniko::{Color, Compose};

/// Maximum depth of the state stack, including the base state.
pub const MAX_STATES: usize = 32;

/// Strokes are clamped to this width in device pixels.
pub const MAX_STROKE_WIDTH: f32 = 200.0;

/// Errors that can occur in nvg.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// [`Context::save`] was called with a full state stack.
    #[error("State stack is full ({depth} states).")]
    StateStackOverflow { depth: usize },
    /// [`Context::restore`] was called without a matching save.
    #[error("No saved state to restore.")]
    StateStackUnderflow,
    #[error("Invalid device pixel ratio {0}.")]
    InvalidDevicePixelRatio(f32),
    /// The image was never created or has been deleted.
    #[error("Unknown image {0:?}.")]
    UnknownImage(ImageId),
    #[error("Invalid image size {width}x{height}.")]
    InvalidImageSize { width: u32, height: u32 },
    /// Pixel data does not match the image size.
    #[error("Expected {expected} bytes of pixel data, got {actual}.")]
    ImageDataSize { expected: usize, actual: usize },
    /// Error reported by a [`RenderBackend`].
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Options fixed at context creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContextOptions {
    /// Generate anti-aliasing fringes around fills and strokes.
    pub edge_antialias: bool,
    /// Ask the backend to resolve stroke overlaps with the stencil buffer.
    pub stencil_strokes: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            edge_antialias: true,
            stencil_strokes: false,
        }
    }
}

/// Per-frame counters, reset by [`Context::begin_frame`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub fill_triangles: usize,
    pub stroke_triangles: usize,
}

static_assertions::assert_impl_all!(Paint: Send, Sync);
static_assertions::assert_impl_all!(PathCache: Send, Sync);
static_assertions::assert_impl_all!(Error: Send, Sync);
