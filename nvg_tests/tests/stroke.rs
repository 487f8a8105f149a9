// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke geometry as seen by a backend.

use nvg::{Cap, ContextOptions, Join, MAX_STROKE_WIDTH};
use nvg_tests::{check_cache, recording_context, vertex_bounds, DrawCall, RecordingBackend};

fn line(ctx: &mut nvg::Context<RecordingBackend>) {
    ctx.begin_path();
    ctx.move_to(10.0, 10.0);
    ctx.line_to(50.0, 10.0);
}

fn stroke_width(ctx: &nvg::Context<RecordingBackend>) -> f32 {
    match ctx.backend().last_call() {
        Some(DrawCall::Stroke { stroke_width, .. }) => *stroke_width,
        other => panic!("expected a stroke call, got {other:?}"),
    }
}

#[test]
fn butt_caps_straddle_the_end_points() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.set_stroke_width(4.0);
    line(&mut ctx);
    ctx.stroke();
    check_cache(ctx.path_cache()).unwrap();

    assert_eq!(stroke_width(&ctx), 4.0);
    let contour = &ctx.backend().last_call().unwrap().contours()[0];
    assert!(!contour.closed);
    assert!(contour.fill.is_empty());
    assert_eq!(contour.stroke.len(), 8);
    assert_eq!(vertex_bounds(&contour.stroke), [9.5, 7.5, 50.5, 12.5]);
}

#[test]
fn square_caps_extend_by_half_the_width() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.set_stroke_width(4.0);
    ctx.set_line_cap(Cap::Square);
    line(&mut ctx);
    ctx.stroke();

    let contour = &ctx.backend().last_call().unwrap().contours()[0];
    assert_eq!(contour.stroke.len(), 8);
    assert_eq!(vertex_bounds(&contour.stroke), [7.5, 7.5, 52.5, 12.5]);
}

#[test]
fn round_caps_fan_around_the_end_points() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.set_stroke_width(4.0);
    ctx.set_line_cap(Cap::Round);
    line(&mut ctx);
    ctx.stroke();
    check_cache(ctx.path_cache()).unwrap();

    let contour = &ctx.backend().last_call().unwrap().contours()[0];
    // Four divisions per cap at this radius.
    assert_eq!(contour.stroke.len(), 20);
    let [x0, _, x1, _] = vertex_bounds(&contour.stroke);
    assert!(x0 < 8.0 && x0 >= 7.5);
    assert!(x1 > 52.0 && x1 <= 52.5);
}

#[test]
fn closed_strokes_wrap_around() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.set_stroke_width(2.0);
    ctx.set_line_cap(Cap::Round);
    ctx.begin_path();
    ctx.rect(10.0, 10.0, 20.0, 20.0);
    ctx.stroke();

    let contour = &ctx.backend().last_call().unwrap().contours()[0];
    assert!(contour.closed);
    // One miter pair per corner plus the repeated first pair; the cap is ignored.
    assert_eq!(contour.stroke.len(), 10);
    let n = contour.stroke.len();
    assert_eq!(
        (contour.stroke[0].x, contour.stroke[0].y),
        (contour.stroke[n - 2].x, contour.stroke[n - 2].y)
    );
    assert_eq!(
        (contour.stroke[1].x, contour.stroke[1].y),
        (contour.stroke[n - 1].x, contour.stroke[n - 1].y)
    );
    assert_eq!(vertex_bounds(&contour.stroke), [8.5, 8.5, 31.5, 31.5]);
}

#[test]
fn joins_change_the_vertex_count() {
    let mut counts = Vec::new();
    for join in [Join::Miter, Join::Bevel, Join::Round] {
        let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
        ctx.set_stroke_width(40.0);
        ctx.set_line_join(join);
        ctx.begin_path();
        ctx.move_to(10.0, 10.0);
        ctx.line_to(50.0, 10.0);
        ctx.line_to(50.0, 50.0);
        ctx.stroke();
        check_cache(ctx.path_cache()).unwrap();
        counts.push(ctx.backend().last_call().unwrap().contours()[0].stroke.len());
    }
    assert!(counts[0] < counts[1], "{counts:?}");
    assert!(counts[1] < counts[2], "{counts:?}");
}

#[test]
fn miter_limit_bevels_sharp_corners() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.set_stroke_width(4.0);
    ctx.begin_path();
    ctx.move_to(10.0, 10.0);
    ctx.line_to(90.0, 40.0);
    ctx.line_to(10.0, 70.0);
    ctx.stroke();
    let mitered = vertex_bounds(&ctx.backend().last_call().unwrap().contours()[0].stroke);

    ctx.set_miter_limit(1.0);
    ctx.stroke();
    let beveled = vertex_bounds(&ctx.backend().last_call().unwrap().contours()[0].stroke);
    assert!(beveled[2] < mitered[2]);
    assert!(ctx.path_cache().contours()[0].bevel_count() > 0);
}

#[test]
fn thin_strokes_fade_instead_of_thinning() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.set_stroke_width(0.25);
    line(&mut ctx);
    ctx.stroke();

    assert_eq!(stroke_width(&ctx), 1.0);
    let paint = &ctx.backend().last_call().unwrap().state().paint;
    assert_eq!(paint.inner_color.components[3], 0.0625);

    ctx.set_global_alpha(0.5);
    ctx.set_stroke_width(0.5);
    ctx.stroke();
    let paint = &ctx.backend().last_call().unwrap().state().paint;
    assert_eq!(paint.inner_color.components[3], 0.125);
}

#[test]
fn stroke_width_follows_the_transform() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.set_stroke_width(3.0);
    ctx.scale(2.0, 2.0);
    line(&mut ctx);
    ctx.stroke();
    assert_eq!(stroke_width(&ctx), 6.0);

    ctx.set_stroke_width(1000.0);
    ctx.stroke();
    assert_eq!(stroke_width(&ctx), MAX_STROKE_WIDTH);
}

#[test]
fn crisp_strokes_use_flat_coverage() {
    let options = ContextOptions {
        edge_antialias: false,
        ..ContextOptions::default()
    };
    let mut ctx = recording_context(100.0, 100.0, 1.0, options).unwrap();
    ctx.set_stroke_width(4.0);
    line(&mut ctx);
    ctx.stroke();

    let contour = &ctx.backend().last_call().unwrap().contours()[0];
    assert!(contour.stroke.iter().all(|v| v.u == 0.5));
    assert_eq!(vertex_bounds(&contour.stroke), [10.0, 8.0, 50.0, 12.0]);
}

#[test]
fn stroke_stats_count_triangles() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    line(&mut ctx);
    ctx.stroke();
    let stats = ctx.frame_stats();
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.stroke_triangles, 6);
    assert_eq!(stats.fill_triangles, 0);

    ctx.begin_path();
    ctx.stroke();
    assert_eq!(ctx.frame_stats(), stats);
}

#[test]
fn arcs_and_curves_stay_within_budget() {
    let mut ctx = recording_context(200.0, 200.0, 1.5, ContextOptions::default()).unwrap();
    ctx.set_stroke_width(7.0);
    ctx.set_line_join(Join::Round);
    ctx.set_line_cap(Cap::Round);
    ctx.begin_path();
    ctx.move_to(20.0, 20.0);
    ctx.arc_to(120.0, 20.0, 120.0, 120.0, 30.0);
    ctx.bezier_to(120.0, 180.0, 20.0, 10.0, 20.0, 150.0);
    ctx.quad_to(60.0, 190.0, 100.0, 150.0);
    ctx.arc(100.0, 100.0, 50.0, 0.0, 3.0, nvg::Winding::Clockwise);
    ctx.stroke();
    check_cache(ctx.path_cache()).unwrap();
    assert!(ctx.path_cache().contours()[0].point_count() > 20);
}
