// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized checks of the tessellator invariants.

use nvg::{Cap, Context, ContextOptions, Join, Winding};
use nvg_tests::{check_cache, recording_context, RecordingBackend};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CAPS: [Cap; 3] = [Cap::Butt, Cap::Square, Cap::Round];
const JOINS: [Join; 3] = [Join::Miter, Join::Bevel, Join::Round];

fn coord(rng: &mut StdRng) -> f32 {
    rng.gen_range(-50.0..250.0)
}

/// Adds a few random sub-paths mixing every kind of segment.
fn random_path(ctx: &mut Context<RecordingBackend>, rng: &mut StdRng) {
    ctx.begin_path();
    for _ in 0..rng.gen_range(1..4) {
        let (x, y) = (coord(rng), coord(rng));
        ctx.move_to(x, y);
        for _ in 0..rng.gen_range(1..8) {
            match rng.gen_range(0..5) {
                0 | 1 => ctx.line_to(coord(rng), coord(rng)),
                2 => ctx.bezier_to(
                    coord(rng),
                    coord(rng),
                    coord(rng),
                    coord(rng),
                    coord(rng),
                    coord(rng),
                ),
                3 => ctx.quad_to(coord(rng), coord(rng), coord(rng), coord(rng)),
                _ => ctx.arc_to(
                    coord(rng),
                    coord(rng),
                    coord(rng),
                    coord(rng),
                    rng.gen_range(0.0..40.0),
                ),
            }
        }
        if rng.gen_bool(0.5) {
            ctx.close_path();
        }
        if rng.gen_bool(0.2) {
            ctx.path_winding(Winding::HOLE);
        }
    }
}

#[test]
fn strokes_respect_their_budget() {
    let mut rng = StdRng::seed_from_u64(0x6e76_6701);
    let mut ctx = recording_context(200.0, 200.0, 1.0, ContextOptions::default()).unwrap();
    for _ in 0..200 {
        random_path(&mut ctx, &mut rng);
        ctx.set_stroke_width(rng.gen_range(0.1..30.0));
        ctx.set_miter_limit(rng.gen_range(1.0..12.0));
        ctx.set_line_cap(CAPS[rng.gen_range(0..3)]);
        ctx.set_line_join(JOINS[rng.gen_range(0..3)]);
        ctx.stroke();
        check_cache(ctx.path_cache()).unwrap();

        // Closed strips end where they started.
        let cache = ctx.path_cache();
        for contour in cache.contours().iter().filter(|c| c.is_closed()) {
            let strip = cache.stroke_vertices(contour);
            let n = strip.len();
            assert!(n >= 4);
            assert_eq!((strip[0].x, strip[0].y), (strip[n - 2].x, strip[n - 2].y));
            assert_eq!((strip[1].x, strip[1].y), (strip[n - 1].x, strip[n - 1].y));
        }
    }
}

#[test]
fn fills_respect_their_budget() {
    let mut rng = StdRng::seed_from_u64(0x6e76_6702);
    for edge_antialias in [true, false] {
        let options = ContextOptions {
            edge_antialias,
            ..ContextOptions::default()
        };
        let mut ctx = recording_context(200.0, 200.0, 1.25, options).unwrap();
        for _ in 0..200 {
            random_path(&mut ctx, &mut rng);
            ctx.fill();
            check_cache(ctx.path_cache()).unwrap();

            let cache = ctx.path_cache();
            for contour in cache.contours() {
                assert!(contour.fill_range().len() >= contour.point_count());
                assert_eq!(contour.stroke_range().is_empty(), !edge_antialias);
            }
        }
    }
}

#[test]
fn repeated_paths_do_not_grow_the_buffers() {
    let mut ctx = recording_context(200.0, 200.0, 1.0, ContextOptions::default()).unwrap();
    ctx.set_stroke_width(6.0);
    ctx.set_line_join(Join::Round);
    ctx.set_line_cap(Cap::Round);

    let mut capacity = None;
    for _ in 0..3 {
        // Same seed every time: the same path.
        let mut rng = StdRng::seed_from_u64(7);
        random_path(&mut ctx, &mut rng);
        ctx.stroke();
        ctx.fill();
        ctx.stroke();
        let now = ctx.path_cache().vertex_capacity();
        if let Some(before) = capacity {
            assert_eq!(before, now);
        }
        capacity = Some(now);
    }
}

#[test]
fn bounds_contain_every_point() {
    let mut rng = StdRng::seed_from_u64(0x6e76_6703);
    let mut ctx = recording_context(200.0, 200.0, 1.0, ContextOptions::default()).unwrap();
    for _ in 0..100 {
        random_path(&mut ctx, &mut rng);
        ctx.fill();
        let cache = ctx.path_cache();
        let [x0, y0, x1, y1] = cache.bounds().to_array();
        for contour in cache.contours() {
            for p in cache.points(contour) {
                assert!(p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1);
            }
        }
    }
}
