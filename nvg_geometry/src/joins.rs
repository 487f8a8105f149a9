// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Join classification.

use peniko::kurbo::Join;

use crate::cache::{PathCache, PointFlags};
use crate::math::cross;

/// Upper bound on the miter scale, reached at very sharp corners.
const MAX_MITER_SCALE: f32 = 600.0;

impl PathCache {
    /// Computes miter directions and join flags for half-width `w`.
    ///
    /// Every contour is treated as cyclic here; open contours simply ignore the
    /// results at their end points. Also counts the beveled points of each contour,
    /// which the expanders use to size their output, and determines convexity.
    pub fn calculate_joins(&mut self, w: f32, join: Join, miter_limit: f32) {
        let iw = if w > 0.0 { 1.0 / w } else { 0.0 };

        for contour in self.contours.iter_mut() {
            let points = &mut self.points[contour.first..contour.first + contour.count];
            let count = points.len();
            let mut nleft = 0;
            contour.bevel_count = 0;

            for i in 0..count {
                let p0 = points[(i + count - 1) % count];
                let p1 = &mut points[i];

                let (dlx0, dly0) = (p0.dy, -p0.dx);
                let (dlx1, dly1) = (p1.dy, -p1.dx);
                p1.dmx = (dlx0 + dlx1) * 0.5;
                p1.dmy = (dly0 + dly1) * 0.5;
                let dmr2 = p1.dmx * p1.dmx + p1.dmy * p1.dmy;
                if dmr2 > 1e-6 {
                    let scale = (1.0 / dmr2).min(MAX_MITER_SCALE);
                    p1.dmx *= scale;
                    p1.dmy *= scale;
                }

                // Keep only the corner bit from flattening.
                p1.flags = if p1.flags.is_corner() {
                    PointFlags::CORNER
                } else {
                    PointFlags::empty()
                };

                if cross(p0.dx, p0.dy, p1.dx, p1.dy) > 0.0 {
                    nleft += 1;
                    p1.flags.insert(PointFlags::LEFT);
                }

                let limit = (p0.len.min(p1.len) * iw).max(1.01);
                if dmr2 * limit * limit < 1.0 {
                    p1.flags.insert(PointFlags::INNER_BEVEL);
                }

                if p1.flags.is_corner()
                    && (dmr2 * miter_limit * miter_limit < 1.0
                        || matches!(join, Join::Bevel | Join::Round))
                {
                    p1.flags.insert(PointFlags::BEVEL);
                }

                if p1.flags.needs_bevel() {
                    contour.bevel_count += 1;
                }
            }

            // Every turn goes the same way. Self-intersecting outlines such as a
            // pentagram pass this test as well.
            contour.convex = count > 0 && (nleft == count || nleft == 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandBuffer, Contour, Tolerances, Winding};

    fn joined(commands: &CommandBuffer, w: f32, join: Join, miter_limit: f32) -> PathCache {
        let mut cache = PathCache::new();
        cache.flatten(commands, &Tolerances::default());
        cache.calculate_joins(w, join, miter_limit);
        cache
    }

    #[test]
    fn square_is_convex() {
        let mut commands = CommandBuffer::new();
        commands.rect(0.0, 0.0, 10.0, 10.0);
        let cache = joined(&commands, 1.0, Join::Miter, 10.0);
        let contour = &cache.contours()[0];
        assert!(contour.is_convex());
        assert_eq!(contour.bevel_count(), 0);
        assert!(cache.points(contour).iter().all(|p| p.flags.is_left()));
    }

    #[test]
    fn square_miter_points_at_corners() {
        let mut commands = CommandBuffer::new();
        commands.rect(0.0, 0.0, 10.0, 10.0);
        let cache = joined(&commands, 1.0, Join::Miter, 10.0);
        let p = cache.points(&cache.contours()[0])[0];
        // The miter of a right angle has length sqrt(2); the left side of a solid
        // contour is its interior.
        assert!((p.dmx - 1.0).abs() < 1e-5 && (p.dmy - 1.0).abs() < 1e-5);
    }

    #[test]
    fn hole_square_is_convex() {
        let mut commands = CommandBuffer::new();
        commands.rect(0.0, 0.0, 10.0, 10.0);
        commands.path_winding(Winding::HOLE);
        let cache = joined(&commands, 1.0, Join::Miter, 10.0);
        let contour = &cache.contours()[0];
        assert!(cache.points(contour).iter().all(|p| !p.flags.is_left()));
        assert!(contour.is_convex());
    }

    #[test]
    fn notched_outline_is_concave() {
        let mut commands = CommandBuffer::new();
        commands.move_to(0.0, 0.0);
        commands.line_to(0.0, 10.0);
        commands.line_to(10.0, 10.0);
        commands.line_to(5.0, 5.0);
        commands.line_to(10.0, 0.0);
        commands.close_path();
        let cache = joined(&commands, 1.0, Join::Miter, 10.0);
        let contour = &cache.contours()[0];
        let left = cache.points(contour).iter().filter(|p| p.flags.is_left()).count();
        assert_eq!(left, 4);
        assert!(!contour.is_convex());
    }

    #[test]
    fn pentagram_turns_one_way() {
        let mut commands = CommandBuffer::new();
        commands.move_to(50.0, 0.0);
        commands.line_to(21.0, 90.0);
        commands.line_to(98.0, 35.0);
        commands.line_to(2.0, 35.0);
        commands.line_to(79.0, 90.0);
        commands.close_path();
        let cache = joined(&commands, 1.0, Join::Miter, 10.0);
        let contour = &cache.contours()[0];
        assert!(cache.points(contour).iter().all(|p| p.flags.is_left()));
        assert!(contour.is_convex());
    }

    #[test]
    fn bevel_and_round_joins_bevel_every_corner() {
        let mut commands = CommandBuffer::new();
        commands.rect(0.0, 0.0, 10.0, 10.0);
        for join in [Join::Bevel, Join::Round] {
            let cache = joined(&commands, 1.0, join, 10.0);
            let contour = &cache.contours()[0];
            assert_eq!(contour.bevel_count(), 4);
            assert!(cache.points(contour).iter().all(|p| p.flags.is_bevel()));
        }
    }

    #[test]
    fn miter_limit_bevels_sharp_corners() {
        let mut commands = CommandBuffer::new();
        commands.move_to(0.0, 0.0);
        commands.line_to(100.0, 5.0);
        commands.line_to(0.0, 10.0);
        let sharp = |limit: f32| {
            let cache = joined(&commands, 1.0, Join::Miter, limit);
            cache.points(&cache.contours()[0])[1].flags.is_bevel()
        };
        assert!(sharp(4.0));
        assert!(!sharp(100.0));
    }

    #[test]
    fn short_edges_get_inner_bevels() {
        let mut commands = CommandBuffer::new();
        commands.move_to(0.0, 0.0);
        commands.line_to(2.0, 0.0);
        commands.line_to(0.0, 0.5);
        let cache = joined(&commands, 10.0, Join::Miter, 10.0);
        let contour: &Contour = &cache.contours()[0];
        let points = cache.points(contour);
        assert!(points[1].flags.is_inner_bevel());
        assert!(contour.bevel_count() >= 1);
    }

    #[test]
    fn curve_interior_points_are_not_beveled() {
        let mut commands = CommandBuffer::new();
        commands.move_to(0.0, 0.0);
        commands.bezier_to(0.0, 50.0, 50.0, 100.0, 100.0, 100.0);
        let cache = joined(&commands, 1.0, Join::Bevel, 10.0);
        let points = cache.points(&cache.contours()[0]);
        let interior = &points[1..points.len() - 1];
        assert!(!interior.is_empty());
        assert!(interior.iter().all(|p| !p.flags.is_corner() && !p.flags.is_bevel()));
    }
}
