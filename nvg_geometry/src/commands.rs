// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The path command stream.

use core::f32::consts::{FRAC_PI_2, TAU};

use smallvec::SmallVec;

use crate::math::{dist_pt_seg_sq, normalize, pt_equals};
use crate::{GrowableBuffer, KAPPA90, Tolerances, Transform, Winding};

/// Tangent length above which [`CommandBuffer::arc_to`] falls back to a straight line.
pub const ARC_TO_MAX_TANGENT: f32 = 10000.0;

/// Corner radius below which [`CommandBuffer::rounded_rect_varying`] emits a plain rectangle.
pub const ROUNDED_RECT_MIN_RADIUS: f32 = 0.1;

/// Opcode of a record in the command stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Verb {
    /// Starts a new contour. Two operands.
    MoveTo = 0,
    /// Straight segment. Two operands.
    LineTo = 1,
    /// Cubic Bézier segment: two control points and the end point. Six operands.
    BezierTo = 2,
    /// Closes the current contour. No operands.
    Close = 3,
    /// Winding hint for the current contour. One operand.
    Winding = 4,
}

impl Verb {
    /// The value stored in the stream for this opcode.
    pub const fn tag(self) -> f32 {
        self as u8 as f32
    }

    /// Decodes an opcode tag.
    pub fn from_tag(tag: f32) -> Option<Self> {
        if tag == 0.0 {
            Some(Self::MoveTo)
        } else if tag == 1.0 {
            Some(Self::LineTo)
        } else if tag == 2.0 {
            Some(Self::BezierTo)
        } else if tag == 3.0 {
            Some(Self::Close)
        } else if tag == 4.0 {
            Some(Self::Winding)
        } else {
            None
        }
    }

    /// Number of operands following the tag.
    pub const fn operand_count(self) -> usize {
        match self {
            Self::MoveTo | Self::LineTo => 2,
            Self::BezierTo => 6,
            Self::Close => 0,
            Self::Winding => 1,
        }
    }
}

/// A decoded record of the command stream, in device space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    MoveTo([f32; 2]),
    LineTo([f32; 2]),
    BezierTo([f32; 2], [f32; 2], [f32; 2]),
    Close,
    Winding(Winding),
}

/// Accumulates path construction commands for one path.
///
/// Coordinates are mapped through the transform that is current when they are appended,
/// so changing the transform later does not affect segments that are already recorded.
/// The pen position used by relative constructs ([`quad_to`](Self::quad_to),
/// [`arc_to`](Self::arc_to)) is kept in user space.
#[derive(Clone, Debug)]
pub struct CommandBuffer {
    data: GrowableBuffer<f32>,
    transform: Transform,
    dist_tol: f32,
    pen: [f32; 2],
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuffer {
    /// Creates an empty command buffer with the identity transform.
    pub fn new() -> Self {
        Self {
            data: GrowableBuffer::with_capacity(256),
            transform: Transform::IDENTITY,
            dist_tol: Tolerances::default().dist_tol,
            pen: [0.0; 2],
        }
    }

    /// Drops all recorded commands, keeping the storage.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Returns `true` if no command has been recorded since the last clear.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sets the transform applied to subsequently appended coordinates.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// The transform applied to appended coordinates.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Updates the distance tolerance used to detect degenerate arcs.
    pub fn set_tolerances(&mut self, tolerances: &Tolerances) {
        self.dist_tol = tolerances.dist_tol;
    }

    /// The last pen position, in user space.
    pub fn current_point(&self) -> (f32, f32) {
        (self.pen[0], self.pen[1])
    }

    /// The raw stream: opcode tags followed by their transformed operands.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Iterates over the decoded commands.
    pub fn iter(&self) -> Commands<'_> {
        Commands { data: &self.data }
    }

    /// Starts a new contour at `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.append(&[Verb::MoveTo.tag(), x, y]);
    }

    /// Adds a line segment from the pen to `(x, y)`.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.append(&[Verb::LineTo.tag(), x, y]);
    }

    /// Adds a cubic Bézier segment from the pen to `(x, y)`.
    pub fn bezier_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.append(&[Verb::BezierTo.tag(), c1x, c1y, c2x, c2y, x, y]);
    }

    /// Adds a quadratic Bézier segment, elevated to a cubic.
    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let [x0, y0] = self.pen;
        self.append(&[
            Verb::BezierTo.tag(),
            x0 + 2.0 / 3.0 * (cx - x0),
            y0 + 2.0 / 3.0 * (cy - y0),
            x + 2.0 / 3.0 * (cx - x),
            y + 2.0 / 3.0 * (cy - y),
            x,
            y,
        ]);
    }

    /// Closes the current contour.
    pub fn close_path(&mut self) {
        self.append(&[Verb::Close.tag()]);
    }

    /// Sets the winding of the current contour.
    pub fn path_winding(&mut self, winding: Winding) {
        self.append(&[Verb::Winding.tag(), winding.to_operand()]);
    }

    /// Adds a circular arc around `(cx, cy)` from angle `a0` to `a1`, in radians.
    ///
    /// The arc is split into at most five cubic segments of up to 90 degrees each. If the
    /// buffer already holds commands, a line connects the pen to the start of the arc.
    pub fn arc(&mut self, cx: f32, cy: f32, r: f32, a0: f32, a1: f32, dir: Winding) {
        let first = if self.data.is_empty() {
            Verb::MoveTo
        } else {
            Verb::LineTo
        };

        let mut da = a1 - a0;
        match dir {
            Winding::Clockwise => {
                if da.abs() >= TAU {
                    da = TAU;
                } else {
                    while da < 0.0 {
                        da += TAU;
                    }
                }
            }
            Winding::CounterClockwise => {
                if da.abs() >= TAU {
                    da = -TAU;
                } else {
                    while da > 0.0 {
                        da -= TAU;
                    }
                }
            }
        }

        let ndivs = ((da.abs() / FRAC_PI_2 + 0.5) as i32).clamp(1, 5);
        let hda = (da / ndivs as f32) / 2.0;
        let mut kappa = if hda.sin().abs() > 1e-6 {
            (4.0 / 3.0 * (1.0 - hda.cos()) / hda.sin()).abs()
        } else {
            0.0
        };
        if dir == Winding::CounterClockwise {
            kappa = -kappa;
        }

        // One move or line plus up to five cubics: 38 values.
        let mut vals: SmallVec<[f32; 64]> = SmallVec::new();
        let (mut px, mut py, mut ptanx, mut ptany) = (0.0, 0.0, 0.0, 0.0);
        for i in 0..=ndivs {
            let a = a0 + da * (i as f32 / ndivs as f32);
            let dx = a.cos();
            let dy = a.sin();
            let x = cx + dx * r;
            let y = cy + dy * r;
            let tanx = -dy * r * kappa;
            let tany = dx * r * kappa;

            if i == 0 {
                vals.extend_from_slice(&[first.tag(), x, y]);
            } else {
                vals.extend_from_slice(&[
                    Verb::BezierTo.tag(),
                    px + ptanx,
                    py + ptany,
                    x - tanx,
                    y - tany,
                    x,
                    y,
                ]);
            }
            px = x;
            py = y;
            ptanx = tanx;
            ptany = tany;
        }

        self.append(&vals);
    }

    /// Adds an arc tangent to the lines pen–`(x1, y1)` and `(x1, y1)`–`(x2, y2)`.
    ///
    /// Falls back to a straight line to `(x1, y1)` when the points coincide or are
    /// colinear, when the radius is below the distance tolerance, or when the tangent
    /// distance would exceed [`ARC_TO_MAX_TANGENT`]. Does nothing on an empty buffer.
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        if self.data.is_empty() {
            return;
        }
        let [x0, y0] = self.pen;
        let tol = self.dist_tol;

        if pt_equals(x0, y0, x1, y1, tol)
            || pt_equals(x1, y1, x2, y2, tol)
            || dist_pt_seg_sq(x1, y1, x0, y0, x2, y2) < tol * tol
            || radius < tol
        {
            log::debug!("degenerate arc_to replaced by a line to ({x1}, {y1})");
            self.line_to(x1, y1);
            return;
        }

        let (mut dx0, mut dy0) = (x0 - x1, y0 - y1);
        let (mut dx1, mut dy1) = (x2 - x1, y2 - y1);
        normalize(&mut dx0, &mut dy0);
        normalize(&mut dx1, &mut dy1);
        let a = (dx0 * dx1 + dy0 * dy1).clamp(-1.0, 1.0).acos();
        let d = radius / (a / 2.0).tan();

        if !(d <= ARC_TO_MAX_TANGENT) {
            log::debug!("arc_to tangent length {d} out of range, using a line");
            self.line_to(x1, y1);
            return;
        }

        if crate::math::cross(dx0, dy0, dx1, dy1) > 0.0 {
            let cx = x1 + dx0 * d + dy0 * radius;
            let cy = y1 + dy0 * d - dx0 * radius;
            let a0 = dx0.atan2(-dy0);
            let a1 = (-dx1).atan2(dy1);
            self.arc(cx, cy, radius, a0, a1, Winding::Clockwise);
        } else {
            let cx = x1 + dx0 * d - dy0 * radius;
            let cy = y1 + dy0 * d + dx0 * radius;
            let a0 = (-dx0).atan2(dy0);
            let a1 = dx1.atan2(-dy1);
            self.arc(cx, cy, radius, a0, a1, Winding::CounterClockwise);
        }
    }

    /// Adds a closed rectangle.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.append(&[
            Verb::MoveTo.tag(),
            x,
            y,
            Verb::LineTo.tag(),
            x,
            y + h,
            Verb::LineTo.tag(),
            x + w,
            y + h,
            Verb::LineTo.tag(),
            x + w,
            y,
            Verb::Close.tag(),
        ]);
    }

    /// Adds a closed rectangle with all corners rounded by `r`.
    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        self.rounded_rect_varying(x, y, w, h, r, r, r, r);
    }

    /// Adds a closed rectangle with an individual radius for each corner.
    ///
    /// Radii are clamped to half the width and height. When every radius is below
    /// [`ROUNDED_RECT_MIN_RADIUS`] this is exactly [`rect`](Self::rect).
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
        if top_left < ROUNDED_RECT_MIN_RADIUS
            && top_right < ROUNDED_RECT_MIN_RADIUS
            && bottom_right < ROUNDED_RECT_MIN_RADIUS
            && bottom_left < ROUNDED_RECT_MIN_RADIUS
        {
            self.rect(x, y, w, h);
            return;
        }

        let halfw = w.abs() * 0.5;
        let halfh = h.abs() * 0.5;
        let (sw, sh) = (sign(w), sign(h));
        let (rx_bl, ry_bl) = (bottom_left.min(halfw) * sw, bottom_left.min(halfh) * sh);
        let (rx_br, ry_br) = (bottom_right.min(halfw) * sw, bottom_right.min(halfh) * sh);
        let (rx_tr, ry_tr) = (top_right.min(halfw) * sw, top_right.min(halfh) * sh);
        let (rx_tl, ry_tl) = (top_left.min(halfw) * sw, top_left.min(halfh) * sh);
        let k = 1.0 - KAPPA90;

        let move_to = Verb::MoveTo.tag();
        let line_to = Verb::LineTo.tag();
        let bezier_to = Verb::BezierTo.tag();
        #[rustfmt::skip]
        let vals = [
            move_to, x, y + ry_tl,
            line_to, x, y + h - ry_bl,
            bezier_to, x, y + h - ry_bl * k, x + rx_bl * k, y + h, x + rx_bl, y + h,
            line_to, x + w - rx_br, y + h,
            bezier_to, x + w - rx_br * k, y + h, x + w, y + h - ry_br * k, x + w, y + h - ry_br,
            line_to, x + w, y + ry_tr,
            bezier_to, x + w, y + ry_tr * k, x + w - rx_tr * k, y, x + w - rx_tr, y,
            line_to, x + rx_tl, y,
            bezier_to, x + rx_tl * k, y, x, y + ry_tl * k, x, y + ry_tl,
            Verb::Close.tag(),
        ];
        self.append(&vals);
    }

    /// Adds a closed ellipse built from four cubic segments.
    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let move_to = Verb::MoveTo.tag();
        let bezier_to = Verb::BezierTo.tag();
        #[rustfmt::skip]
        let vals = [
            move_to, cx - rx, cy,
            bezier_to, cx - rx, cy + ry * KAPPA90, cx - rx * KAPPA90, cy + ry, cx, cy + ry,
            bezier_to, cx + rx * KAPPA90, cy + ry, cx + rx, cy + ry * KAPPA90, cx + rx, cy,
            bezier_to, cx + rx, cy - ry * KAPPA90, cx + rx * KAPPA90, cy - ry, cx, cy - ry,
            bezier_to, cx - rx * KAPPA90, cy - ry, cx - rx, cy - ry * KAPPA90, cx - rx, cy,
            Verb::Close.tag(),
        ];
        self.append(&vals);
    }

    /// Adds a closed circle.
    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.ellipse(cx, cy, r, r);
    }

    /// Appends one or more complete records given in user space.
    fn append(&mut self, vals: &[f32]) {
        let Some(verb) = vals.first().copied().and_then(Verb::from_tag) else {
            return;
        };
        if !matches!(verb, Verb::Close | Verb::Winding) && vals.len() >= 3 {
            self.pen = [vals[vals.len() - 2], vals[vals.len() - 1]];
        }

        self.data.ensure_capacity(self.data.len() + vals.len());
        let mut rest = vals;
        while let Some((&tag, tail)) = rest.split_first() {
            let Some(verb) = Verb::from_tag(tag) else {
                debug_assert!(false, "invalid opcode {tag} in path record");
                return;
            };
            let Some((operands, next)) = tail.split_at_checked(verb.operand_count()) else {
                debug_assert!(false, "truncated path record");
                return;
            };
            self.data.push(tag);
            match verb {
                Verb::MoveTo | Verb::LineTo | Verb::BezierTo => {
                    for pair in operands.chunks_exact(2) {
                        let (x, y) = self.transform.apply(pair[0], pair[1]);
                        self.data.push(x);
                        self.data.push(y);
                    }
                }
                Verb::Close => {}
                Verb::Winding => self.data.extend_from_slice(operands),
            }
            rest = next;
        }
    }
}

fn sign(x: f32) -> f32 {
    if x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Iterator over the records of a [`CommandBuffer`].
#[derive(Clone, Debug)]
pub struct Commands<'a> {
    data: &'a [f32],
}

impl Iterator for Commands<'_> {
    type Item = Command;

    fn next(&mut self) -> Option<Command> {
        let (&tag, tail) = self.data.split_first()?;
        let verb = Verb::from_tag(tag)?;
        let (ops, rest) = tail.split_at_checked(verb.operand_count())?;
        self.data = rest;
        Some(match verb {
            Verb::MoveTo => Command::MoveTo([ops[0], ops[1]]),
            Verb::LineTo => Command::LineTo([ops[0], ops[1]]),
            Verb::BezierTo => {
                Command::BezierTo([ops[0], ops[1]], [ops[2], ops[3]], [ops[4], ops[5]])
            }
            Verb::Close => Command::Close,
            Verb::Winding => Command::Winding(Winding::from_operand(ops[0])),
        })
    }
}
