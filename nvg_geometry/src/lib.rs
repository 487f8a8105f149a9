// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path geometry for the nvg vector renderer.
//!
//! This crate turns a stream of path construction commands into anti-aliased triangle
//! strips that a GPU backend can draw directly. It is split into stages which run once
//! per `fill` or `stroke` call:
//!
//! - [`CommandBuffer`]: accumulates path commands, already transformed into device space.
//! - [`PathCache::flatten`]: subdivides curves and builds the per-contour point lists,
//!   normalizing winding and computing the bounding box.
//! - [`PathCache::calculate_joins`]: classifies every point as a miter, bevel or inner bevel
//!   join and counts bevels so that the expanders can size their output up front.
//! - [`PathCache::expand_stroke`] and [`PathCache::expand_fill`]: emit the vertex spans
//!   referenced by each [`Contour`].
//!
//! All buffers are owned by long-lived values and reused from frame to frame; see
//! [`GrowableBuffer`].
//!
//! The output [`Vertex`] carries a coverage ramp in its `u` coordinate rather than a texture
//! coordinate: 0 on the outer edge of the anti-aliasing fringe, 1 on the solid core and 0.5
//! on the path itself. Backends evaluate it in their fragment shader.

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
    reason = "Geometry is computed in f32; conversions from the f64 kurbo types are intentional."
)]

mod buffer;
mod cache;
mod commands;
mod fill;
mod flatten;
mod joins;
pub mod math;
mod stroke;
mod tolerance;

pub use buffer::GrowableBuffer;
pub use cache::{Bounds, Contour, PathCache, Point, PointFlags, Vertex, Winding};
pub use commands::{
    ARC_TO_MAX_TANGENT, Command, CommandBuffer, Commands, ROUNDED_RECT_MIN_RADIUS, Verb,
};
pub use math::Transform;
pub use stroke::curve_divisions;
pub use tolerance::Tolerances;

pub use peniko;
pub use peniko::kurbo;
pub use peniko::kurbo::{Cap, Join};

/// Maximum recursion depth of the adaptive Bézier subdivision.
pub const MAX_BEZIER_DEPTH: u32 = 10;

/// Control point distance for approximating a quarter circle with a cubic Bézier.
pub const KAPPA90: f32 = 0.552_284_8;
