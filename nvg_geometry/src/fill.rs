// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill expansion.

use peniko::kurbo::Join;

use crate::cache::{PathCache, Vertex};
use crate::stroke::{bevel_join, push_pair, wrap, Sides};

impl PathCache {
    /// Generates the fill spans of every contour and, when `w > 0`, an
    /// anti-aliasing fringe of width `w` in the stroke spans.
    ///
    /// Fill vertices are inset by half the fringe so the fringe straddles the exact
    /// outline. A single convex contour only gets the outer half of the fringe and
    /// can be drawn without stencil; anything else is expected to go through a
    /// stencil pass in the backend.
    pub fn expand_fill(&mut self, w: f32, join: Join, miter_limit: f32) {
        let fringe = w > 0.0;
        let woff = 0.5 * w;

        self.calculate_joins(w, join, miter_limit);

        let budget: usize = self
            .contours
            .iter()
            .map(|c| {
                let mut n = c.count + c.bevel_count + 1;
                if fringe {
                    n += (c.count + c.bevel_count * 5 + 1) * 2;
                }
                n
            })
            .sum();
        self.reserve_vertices(budget);

        let convex = self.contours.len() == 1 && self.contours[0].convex;

        for contour in self.contours.iter_mut() {
            let points = &self.points[contour.first..contour.first + contour.count];
            let out = &mut self.vertices;
            let count = points.len();

            let start = out.len();
            if fringe {
                for i in 0..count {
                    let p0 = &points[(i + count - 1) % count];
                    let p1 = &points[i];
                    if p1.flags.is_bevel() {
                        if p1.flags.is_left() {
                            out.push(Vertex::new(
                                p1.x + p1.dmx * woff,
                                p1.y + p1.dmy * woff,
                                0.5,
                                1.0,
                            ));
                        } else {
                            out.push(Vertex::new(
                                p1.x + p0.dy * woff,
                                p1.y - p0.dx * woff,
                                0.5,
                                1.0,
                            ));
                            out.push(Vertex::new(
                                p1.x + p1.dy * woff,
                                p1.y - p1.dx * woff,
                                0.5,
                                1.0,
                            ));
                        }
                    } else {
                        out.push(Vertex::new(
                            p1.x + p1.dmx * woff,
                            p1.y + p1.dmy * woff,
                            0.5,
                            1.0,
                        ));
                    }
                }
            } else {
                for p in points {
                    out.push(Vertex::new(p.x, p.y, 0.5, 1.0));
                }
            }
            contour.fill = start..out.len();

            let start = out.len();
            if fringe {
                let sides = if convex {
                    // Only the outer half, starting at the inset fill edge.
                    Sides {
                        lw: woff,
                        rw: w - woff,
                        lu: 0.5,
                        ru: 1.0,
                    }
                } else {
                    Sides {
                        lw: w + woff,
                        rw: w - woff,
                        lu: 0.0,
                        ru: 1.0,
                    }
                };

                for i in 0..count {
                    let p0 = &points[(i + count - 1) % count];
                    let p1 = &points[i];
                    if p1.flags.needs_bevel() {
                        bevel_join(out, p0, p1, sides);
                    } else {
                        push_pair(out, p1, sides);
                    }
                }
                wrap(out, start, sides.lu, sides.ru);
            }
            contour.stroke = start..out.len();
        }

        debug_assert!(self.vertices.len() <= budget, "fill exceeded its vertex budget");
        log::trace!(
            "fill: {} contours, convex: {convex}, {} vertices of {budget} reserved",
            self.contours.len(),
            self.vertices.len()
        );
    }

    /// Whether the last fill expansion produced a single convex contour, which
    /// backends may draw without a stencil pass.
    pub fn is_convex_fill(&self) -> bool {
        self.contours.len() == 1 && self.contours[0].convex
    }
}
