// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke expansion.

use core::f32::consts::PI;

use peniko::kurbo::{Cap, Join};

use crate::cache::{PathCache, Point, Vertex};
use crate::math::normalize;
use crate::GrowableBuffer;

/// Number of segments needed to approximate an arc of angle `arc` and radius `r`
/// within `tol`. Never less than two.
pub fn curve_divisions(r: f32, arc: f32, tol: f32) -> usize {
    let da = (r / (r + tol)).acos() * 2.0;
    let n = (arc / da).ceil();
    if n.is_finite() && n > 2.0 {
        n as usize
    } else {
        2
    }
}

/// Offsets and coverage values of the two sides of a strip.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Sides {
    /// Offset of the left side.
    pub lw: f32,
    /// Offset of the right side.
    pub rw: f32,
    /// Coverage on the left side.
    pub lu: f32,
    /// Coverage on the right side.
    pub ru: f32,
}

impl Sides {
    fn symmetric(w: f32, u0: f32, u1: f32) -> Self {
        Self {
            lw: w,
            rw: w,
            lu: u0,
            ru: u1,
        }
    }
}

impl PathCache {
    /// Generates the stroke spans of every contour for half-width `w` and
    /// anti-aliasing fringe `aa`.
    ///
    /// Expects the path to be flattened. Closed contours wrap the strip back to its
    /// first vertex pair and ignore `cap`. The output buffer is sized once for all
    /// contours before emission starts.
    pub fn expand_stroke(
        &mut self,
        w: f32,
        aa: f32,
        cap: Cap,
        join: Join,
        miter_limit: f32,
        tess_tol: f32,
    ) {
        let ncap = curve_divisions(w, PI, tess_tol);
        let w = w + aa * 0.5;
        let (u0, u1) = if aa == 0.0 { (0.5, 0.5) } else { (0.0, 1.0) };
        let sides = Sides::symmetric(w, u0, u1);

        self.calculate_joins(w, join, miter_limit);

        let budget: usize = self
            .contours
            .iter()
            .map(|c| stroke_budget(c.count, c.bevel_count, c.closed, cap, join, ncap))
            .sum();
        self.reserve_vertices(budget);

        for contour in self.contours.iter_mut() {
            let points = &self.points[contour.first..contour.first + contour.count];
            let out = &mut self.vertices;
            let start = out.len();
            contour.fill = start..start;

            let body = |out: &mut GrowableBuffer<Vertex>, p0: &Point, p1: &Point| {
                if p1.flags.needs_bevel() {
                    if join == Join::Round {
                        round_join(out, p0, p1, sides, ncap);
                    } else {
                        bevel_join(out, p0, p1, sides);
                    }
                } else {
                    push_pair(out, p1, sides);
                }
            };

            if contour.closed {
                let count = points.len();
                for i in 0..count {
                    body(out, &points[(i + count - 1) % count], &points[i]);
                }
                wrap(out, start, u0, u1);
            } else {
                let count = points.len();
                let (first, second) = (&points[0], &points[1]);
                let d = direction(first, second);
                match cap {
                    Cap::Butt => butt_cap_start(out, first, d, -aa * 0.5, aa, sides),
                    Cap::Square => butt_cap_start(out, first, d, w - aa, aa, sides),
                    Cap::Round => round_cap_start(out, first, d, ncap, sides),
                }

                for j in 1..count - 1 {
                    body(out, &points[j - 1], &points[j]);
                }

                let (prev, last) = (&points[count - 2], &points[count - 1]);
                let d = direction(prev, last);
                match cap {
                    Cap::Butt => butt_cap_end(out, last, d, -aa * 0.5, aa, sides),
                    Cap::Square => butt_cap_end(out, last, d, w - aa, aa, sides),
                    Cap::Round => round_cap_end(out, last, d, ncap, sides),
                }
            }

            contour.stroke = start..out.len();
        }

        debug_assert!(self.vertices.len() <= budget, "stroke exceeded its vertex budget");
        log::trace!(
            "stroke: {} contours, {} vertices of {budget} reserved",
            self.contours.len(),
            self.vertices.len()
        );
    }
}

/// Vertex count reserved for stroking one contour.
fn stroke_budget(
    count: usize,
    bevel_count: usize,
    closed: bool,
    cap: Cap,
    join: Join,
    ncap: usize,
) -> usize {
    let mut n = if join == Join::Round {
        (count + bevel_count * (ncap + 2) + 1) * 2
    } else {
        (count + bevel_count * 5 + 1) * 2
    };
    if !closed {
        n += if cap == Cap::Round {
            (ncap * 2 + 2) * 2
        } else {
            (3 + 3) * 2
        };
    }
    n
}

fn direction(from: &Point, to: &Point) -> [f32; 2] {
    let mut dx = to.x - from.x;
    let mut dy = to.y - from.y;
    normalize(&mut dx, &mut dy);
    [dx, dy]
}

#[inline]
fn push(out: &mut GrowableBuffer<Vertex>, x: f32, y: f32, u: f32, v: f32) {
    out.push(Vertex::new(x, y, u, v));
}

/// Offset pair along the miter direction.
#[inline]
pub(crate) fn push_pair(out: &mut GrowableBuffer<Vertex>, p1: &Point, s: Sides) {
    push(out, p1.x + p1.dmx * s.lw, p1.y + p1.dmy * s.lw, s.lu, 1.0);
    push(out, p1.x - p1.dmx * s.rw, p1.y - p1.dmy * s.rw, s.ru, 1.0);
}

/// Repeats the first vertex pair of the span starting at `start`.
pub(crate) fn wrap(out: &mut GrowableBuffer<Vertex>, start: usize, lu: f32, ru: f32) {
    if out.len() < start + 2 {
        return;
    }
    let (a, b) = (out[start], out[start + 1]);
    push(out, a.x, a.y, lu, 1.0);
    push(out, b.x, b.y, ru, 1.0);
}

fn butt_cap_start(
    out: &mut GrowableBuffer<Vertex>,
    p: &Point,
    [dx, dy]: [f32; 2],
    d: f32,
    aa: f32,
    s: Sides,
) {
    let px = p.x - dx * d;
    let py = p.y - dy * d;
    let (dlx, dly) = (dy, -dx);
    let w = s.lw;
    push(out, px + dlx * w - dx * aa, py + dly * w - dy * aa, s.lu, 0.0);
    push(out, px - dlx * w - dx * aa, py - dly * w - dy * aa, s.ru, 0.0);
    push(out, px + dlx * w, py + dly * w, s.lu, 1.0);
    push(out, px - dlx * w, py - dly * w, s.ru, 1.0);
}

fn butt_cap_end(
    out: &mut GrowableBuffer<Vertex>,
    p: &Point,
    [dx, dy]: [f32; 2],
    d: f32,
    aa: f32,
    s: Sides,
) {
    let px = p.x + dx * d;
    let py = p.y + dy * d;
    let (dlx, dly) = (dy, -dx);
    let w = s.lw;
    push(out, px + dlx * w, py + dly * w, s.lu, 1.0);
    push(out, px - dlx * w, py - dly * w, s.ru, 1.0);
    push(out, px + dlx * w + dx * aa, py + dly * w + dy * aa, s.lu, 0.0);
    push(out, px - dlx * w + dx * aa, py - dly * w + dy * aa, s.ru, 0.0);
}

fn round_cap_start(
    out: &mut GrowableBuffer<Vertex>,
    p: &Point,
    [dx, dy]: [f32; 2],
    ncap: usize,
    s: Sides,
) {
    let (dlx, dly) = (dy, -dx);
    let w = s.lw;
    for i in 0..ncap {
        let a = i as f32 / (ncap - 1) as f32 * PI;
        let ax = a.cos() * w;
        let ay = a.sin() * w;
        push(out, p.x - dlx * ax - dx * ay, p.y - dly * ax - dy * ay, s.lu, 1.0);
        push(out, p.x, p.y, 0.5, 1.0);
    }
    push(out, p.x + dlx * w, p.y + dly * w, s.lu, 1.0);
    push(out, p.x - dlx * w, p.y - dly * w, s.ru, 1.0);
}

fn round_cap_end(
    out: &mut GrowableBuffer<Vertex>,
    p: &Point,
    [dx, dy]: [f32; 2],
    ncap: usize,
    s: Sides,
) {
    let (dlx, dly) = (dy, -dx);
    let w = s.lw;
    push(out, p.x + dlx * w, p.y + dly * w, s.lu, 1.0);
    push(out, p.x - dlx * w, p.y - dly * w, s.ru, 1.0);
    for i in 0..ncap {
        let a = i as f32 / (ncap - 1) as f32 * PI;
        let ax = a.cos() * w;
        let ay = a.sin() * w;
        push(out, p.x, p.y, 0.5, 1.0);
        push(out, p.x - dlx * ax + dx * ay, p.y - dly * ax + dy * ay, s.lu, 1.0);
    }
}

/// The two offset points at `p1` on the side at distance `w`: either the ends of
/// both edge normals or twice the miter point.
fn choose_bevel(bevel: bool, p0: &Point, p1: &Point, w: f32) -> [f32; 4] {
    if bevel {
        [
            p1.x + p0.dy * w,
            p1.y - p0.dx * w,
            p1.x + p1.dy * w,
            p1.y - p1.dx * w,
        ]
    } else {
        let (x, y) = (p1.x + p1.dmx * w, p1.y + p1.dmy * w);
        [x, y, x, y]
    }
}

pub(crate) fn round_join(
    out: &mut GrowableBuffer<Vertex>,
    p0: &Point,
    p1: &Point,
    s: Sides,
    ncap: usize,
) {
    let (dlx0, dly0) = (p0.dy, -p0.dx);
    let (dlx1, dly1) = (p1.dy, -p1.dx);

    if p1.flags.is_left() {
        let [lx0, ly0, lx1, ly1] = choose_bevel(p1.flags.is_inner_bevel(), p0, p1, s.lw);
        let a0 = (-dly0).atan2(-dlx0);
        let mut a1 = (-dly1).atan2(-dlx1);
        if a1 > a0 {
            a1 -= PI * 2.0;
        }

        push(out, lx0, ly0, s.lu, 1.0);
        push(out, p1.x - dlx0 * s.rw, p1.y - dly0 * s.rw, s.ru, 1.0);

        let n = arc_segments(a0 - a1, ncap);
        for i in 0..n {
            let t = i as f32 / (n - 1) as f32;
            let a = a0 + t * (a1 - a0);
            push(out, p1.x, p1.y, 0.5, 1.0);
            push(out, p1.x + a.cos() * s.rw, p1.y + a.sin() * s.rw, s.ru, 1.0);
        }

        push(out, lx1, ly1, s.lu, 1.0);
        push(out, p1.x - dlx1 * s.rw, p1.y - dly1 * s.rw, s.ru, 1.0);
    } else {
        let [rx0, ry0, rx1, ry1] = choose_bevel(p1.flags.is_inner_bevel(), p0, p1, -s.rw);
        let a0 = dly0.atan2(dlx0);
        let mut a1 = dly1.atan2(dlx1);
        if a1 < a0 {
            a1 += PI * 2.0;
        }

        push(out, p1.x + dlx0 * s.rw, p1.y + dly0 * s.rw, s.lu, 1.0);
        push(out, rx0, ry0, s.ru, 1.0);

        let n = arc_segments(a1 - a0, ncap);
        for i in 0..n {
            let t = i as f32 / (n - 1) as f32;
            let a = a0 + t * (a1 - a0);
            push(out, p1.x + a.cos() * s.lw, p1.y + a.sin() * s.lw, s.lu, 1.0);
            push(out, p1.x, p1.y, 0.5, 1.0);
        }

        push(out, p1.x + dlx1 * s.rw, p1.y + dly1 * s.rw, s.lu, 1.0);
        push(out, rx1, ry1, s.ru, 1.0);
    }
}

/// Segments for a round join sweeping `da` radians, between 2 and `ncap`.
fn arc_segments(da: f32, ncap: usize) -> usize {
    let n = (da / PI * ncap as f32).ceil();
    if n.is_finite() && n > 2.0 {
        (n as usize).min(ncap)
    } else {
        2
    }
}

pub(crate) fn bevel_join(out: &mut GrowableBuffer<Vertex>, p0: &Point, p1: &Point, s: Sides) {
    let (dlx0, dly0) = (p0.dy, -p0.dx);
    let (dlx1, dly1) = (p1.dy, -p1.dx);

    if p1.flags.is_left() {
        let [lx0, ly0, lx1, ly1] = choose_bevel(p1.flags.is_inner_bevel(), p0, p1, s.lw);
        let (rx0, ry0) = (p1.x - dlx0 * s.rw, p1.y - dly0 * s.rw);
        let (rx1, ry1) = (p1.x - dlx1 * s.rw, p1.y - dly1 * s.rw);

        push(out, lx0, ly0, s.lu, 1.0);
        push(out, rx0, ry0, s.ru, 1.0);

        if p1.flags.is_bevel() {
            push(out, lx0, ly0, s.lu, 1.0);
            push(out, rx0, ry0, s.ru, 1.0);
            push(out, lx1, ly1, s.lu, 1.0);
            push(out, rx1, ry1, s.ru, 1.0);
        } else {
            let (mx, my) = (p1.x - p1.dmx * s.rw, p1.y - p1.dmy * s.rw);
            push(out, p1.x, p1.y, 0.5, 1.0);
            push(out, rx0, ry0, s.ru, 1.0);
            push(out, mx, my, s.ru, 1.0);
            push(out, mx, my, s.ru, 1.0);
            push(out, p1.x, p1.y, 0.5, 1.0);
            push(out, rx1, ry1, s.ru, 1.0);
        }

        push(out, lx1, ly1, s.lu, 1.0);
        push(out, rx1, ry1, s.ru, 1.0);
    } else {
        let [rx0, ry0, rx1, ry1] = choose_bevel(p1.flags.is_inner_bevel(), p0, p1, -s.rw);
        let (lx0, ly0) = (p1.x + dlx0 * s.lw, p1.y + dly0 * s.lw);
        let (lx1, ly1) = (p1.x + dlx1 * s.lw, p1.y + dly1 * s.lw);

        push(out, lx0, ly0, s.lu, 1.0);
        push(out, rx0, ry0, s.ru, 1.0);

        if p1.flags.is_bevel() {
            push(out, lx0, ly0, s.lu, 1.0);
            push(out, rx0, ry0, s.ru, 1.0);
            push(out, lx1, ly1, s.lu, 1.0);
            push(out, rx1, ry1, s.ru, 1.0);
        } else {
            let (mx, my) = (p1.x + p1.dmx * s.lw, p1.y + p1.dmy * s.lw);
            push(out, lx0, ly0, s.lu, 1.0);
            push(out, p1.x, p1.y, 0.5, 1.0);
            push(out, mx, my, s.lu, 1.0);
            push(out, mx, my, s.lu, 1.0);
            push(out, lx1, ly1, s.lu, 1.0);
            push(out, p1.x, p1.y, 0.5, 1.0);
        }

        push(out, lx1, ly1, s.lu, 1.0);
        push(out, rx1, ry1, s.ru, 1.0);
    }
}
