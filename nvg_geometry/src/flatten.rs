// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening of path commands into contours.

use crate::cache::{Contour, PathCache, Point, PointFlags, Winding};
use crate::math::{normalize, pt_equals, triarea2};
use crate::{Command, CommandBuffer, MAX_BEZIER_DEPTH, Tolerances};

type Pt = [f32; 2];

impl PathCache {
    /// Builds the contours of the path recorded in `commands`.
    ///
    /// Curves are subdivided until they are within `tolerances.tess_tol` of the
    /// polyline, coincident points are merged, contours whose end point repeats the
    /// start are closed, and the point order of every contour with more than two
    /// points, open or closed, is reversed if it disagrees with the requested
    /// [`Winding`]. Contours with fewer than two points are
    /// dropped.
    ///
    /// Runs once per path: later calls are no-ops until [`clear`](Self::clear).
    pub fn flatten(&mut self, commands: &CommandBuffer, tolerances: &Tolerances) {
        if self.is_flattened {
            return;
        }
        self.is_flattened = true;
        self.points.clear();
        self.contours.clear();
        self.vertices.clear();
        self.bounds = crate::Bounds::EMPTY;

        if commands.as_slice().iter().any(|v| !v.is_finite()) {
            log::warn!("A path contains NaN or infinite coordinates, ignoring it.");
            return;
        }

        let dist_tol = tolerances.dist_tol;
        for command in commands.iter() {
            match command {
                Command::MoveTo(p) => {
                    self.add_contour();
                    self.add_point(p, PointFlags::CORNER, dist_tol);
                }
                Command::LineTo(p) => self.add_point(p, PointFlags::CORNER, dist_tol),
                Command::BezierTo(c1, c2, p) => {
                    if let Some(last) = self.last_point() {
                        self.tessellate_bezier(
                            [last, c1, c2, p],
                            0,
                            PointFlags::CORNER,
                            tolerances,
                        );
                    }
                }
                Command::Close => {
                    if let Some(contour) = self.contours.last_mut() {
                        contour.closed = true;
                    }
                }
                Command::Winding(winding) => {
                    if let Some(contour) = self.contours.last_mut() {
                        contour.winding = winding;
                    }
                }
            }
        }

        let mut kept = 0;
        for i in 0..self.contours.len() {
            let mut contour = self.contours[i].clone();
            let points = &self.points[contour.first..contour.first + contour.count];

            if let (Some(first), Some(last)) = (points.first(), points.last()) {
                if points.len() > 1 && pt_equals(last.x, last.y, first.x, first.y, dist_tol) {
                    contour.count -= 1;
                    contour.closed = true;
                }
            }
            if contour.count < 2 {
                continue;
            }
            let points = &mut self.points[contour.first..contour.first + contour.count];

            if points.len() > 2 {
                let area = polygon_area(points);
                let reverse = match contour.winding {
                    Winding::CounterClockwise => area < 0.0,
                    Winding::Clockwise => area > 0.0,
                };
                if reverse {
                    points.reverse();
                }
            }

            let count = points.len();
            for j in 0..count {
                let next = points[(j + 1) % count];
                let p = &mut points[j];
                p.dx = next.x - p.x;
                p.dy = next.y - p.y;
                p.len = normalize(&mut p.dx, &mut p.dy);
                self.bounds.add_point(p.x, p.y);
            }

            self.contours[kept] = contour;
            kept += 1;
        }
        self.contours.truncate(kept);

        log::trace!(
            "flattened {} contours, {} points",
            self.contours.len(),
            self.points.len()
        );
    }

    fn add_contour(&mut self) {
        self.contours.push(Contour {
            first: self.points.len(),
            ..Contour::default()
        });
    }

    fn last_point(&self) -> Option<Pt> {
        let contour = self.contours.last()?;
        if contour.count == 0 {
            return None;
        }
        let p = self.points.last()?;
        Some([p.x, p.y])
    }

    fn add_point(&mut self, [x, y]: Pt, flags: PointFlags, dist_tol: f32) {
        let Some(contour) = self.contours.last_mut() else {
            return;
        };

        if contour.count > 0 {
            if let Some(last) = self.points.last_mut() {
                if pt_equals(last.x, last.y, x, y, dist_tol) {
                    last.flags |= flags;
                    return;
                }
            }
        }

        self.points.push(Point {
            x,
            y,
            flags,
            ..Point::default()
        });
        contour.count += 1;
    }

    /// Adaptive de Casteljau subdivision. Only the end point of each flat piece is
    /// added; the start is the previous point of the contour.
    fn tessellate_bezier(
        &mut self,
        [p1, p2, p3, p4]: [Pt; 4],
        level: u32,
        flags: PointFlags,
        tolerances: &Tolerances,
    ) {
        let dx = p4[0] - p1[0];
        let dy = p4[1] - p1[1];
        let d2 = ((p2[0] - p4[0]) * dy - (p2[1] - p4[1]) * dx).abs();
        let d3 = ((p3[0] - p4[0]) * dy - (p3[1] - p4[1]) * dx).abs();

        if level >= MAX_BEZIER_DEPTH
            || (d2 + d3) * (d2 + d3) < tolerances.tess_tol * (dx * dx + dy * dy)
        {
            self.add_point(p4, flags, tolerances.dist_tol);
            return;
        }

        let p12 = mid(p1, p2);
        let p23 = mid(p2, p3);
        let p34 = mid(p3, p4);
        let p123 = mid(p12, p23);
        let p234 = mid(p23, p34);
        let p1234 = mid(p123, p234);

        self.tessellate_bezier(
            [p1, p12, p123, p1234],
            level + 1,
            PointFlags::empty(),
            tolerances,
        );
        self.tessellate_bezier([p1234, p234, p34, p4], level + 1, flags, tolerances);
    }
}

#[inline]
fn mid(a: Pt, b: Pt) -> Pt {
    [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5]
}

/// Signed area of the polygon, as a fan around the first point.
fn polygon_area(points: &[Point]) -> f32 {
    let Some(p0) = points.first() else {
        return 0.0;
    };
    let area: f32 = points
        .windows(2)
        .skip(1)
        .map(|w| triarea2(p0.x, p0.y, w[0].x, w[0].y, w[1].x, w[1].y))
        .sum();
    area * 0.5
}
