// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Resolution dependent tolerances used throughout tessellation.
///
/// All three values are expressed in device units and scale with the inverse of the
/// device pixel ratio, so that the output looks the same on high density displays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    /// Maximum allowed deviation of a flattened curve, used by the subdivision test and
    /// for the number of segments in round caps and joins.
    pub tess_tol: f32,
    /// Points closer than this are considered coincident.
    pub dist_tol: f32,
    /// Width of the anti-aliasing fringe.
    pub fringe_width: f32,
}

impl Tolerances {
    /// Derives the tolerances for the given device pixel ratio.
    ///
    /// The ratio must be finite and positive.
    pub fn from_device_pixel_ratio(ratio: f32) -> Self {
        Self {
            tess_tol: 0.25 / ratio,
            dist_tol: 0.01 / ratio,
            fringe_width: 1.0 / ratio,
        }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self::from_device_pixel_ratio(1.0)
    }
}
