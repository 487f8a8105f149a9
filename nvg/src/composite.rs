// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blend state handed to backends.

use peniko::Compose;

/// A blend factor, as understood by fixed function GPU blending.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

/// Source and destination factors for the color and alpha channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompositeState {
    pub src_rgb: BlendFactor,
    pub dst_rgb: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
}

impl CompositeState {
    /// Uses the same factors for color and alpha.
    pub const fn new(src: BlendFactor, dst: BlendFactor) -> Self {
        Self::separate(src, dst, src, dst)
    }

    pub const fn separate(
        src_rgb: BlendFactor,
        dst_rgb: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) -> Self {
        Self {
            src_rgb,
            dst_rgb,
            src_alpha,
            dst_alpha,
        }
    }
}

impl Default for CompositeState {
    fn default() -> Self {
        Compose::SrcOver.into()
    }
}

impl From<Compose> for CompositeState {
    /// Porter-Duff factors for premultiplied colors.
    fn from(op: Compose) -> Self {
        use BlendFactor::*;
        let (src, dst) = match op {
            Compose::Clear => (Zero, Zero),
            Compose::Copy => (One, Zero),
            Compose::Dest => (Zero, One),
            Compose::SrcOver => (One, OneMinusSrcAlpha),
            Compose::DestOver => (OneMinusDstAlpha, One),
            Compose::SrcIn => (DstAlpha, Zero),
            Compose::DestIn => (Zero, SrcAlpha),
            Compose::SrcOut => (OneMinusDstAlpha, Zero),
            Compose::DestOut => (Zero, OneMinusSrcAlpha),
            Compose::SrcAtop => (DstAlpha, OneMinusSrcAlpha),
            Compose::DestAtop => (OneMinusDstAlpha, SrcAlpha),
            Compose::Xor => (OneMinusDstAlpha, OneMinusSrcAlpha),
            Compose::Plus | Compose::PlusLighter => (One, One),
            #[allow(
                unreachable_patterns,
                reason = "Compose may gain variants; fall back to source over."
            )]
            _ => (One, OneMinusSrcAlpha),
        };
        Self::new(src, dst)
    }
}
