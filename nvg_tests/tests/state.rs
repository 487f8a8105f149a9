// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render state handling of the context.

use core::f32::consts::FRAC_PI_4;

use nvg::kurbo::{Affine, Point};
use nvg::peniko::color::palette::css::{BLUE, WHITE};
use nvg::{Cap, ContextOptions, Error, Paint, MAX_STATES};
use nvg_tests::{recording_context, DrawCall};

fn close(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-4
}

#[test]
fn state_stack_is_bounded() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    for _ in 1..MAX_STATES {
        ctx.save().unwrap();
    }
    assert_eq!(ctx.state_depth(), MAX_STATES);
    assert!(matches!(
        ctx.save(),
        Err(Error::StateStackOverflow { depth: MAX_STATES })
    ));
    for _ in 1..MAX_STATES {
        ctx.restore().unwrap();
    }
    assert!(matches!(ctx.restore(), Err(Error::StateStackUnderflow)));
    assert_eq!(ctx.state_depth(), 1);
}

#[test]
fn restore_undoes_paint_and_transform() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.save().unwrap();
    ctx.translate(30.0, 0.0);
    ctx.set_fill_paint(Paint::color(BLUE));
    ctx.restore().unwrap();

    ctx.begin_path();
    ctx.rect(0.0, 0.0, 10.0, 10.0);
    ctx.fill();
    let Some(DrawCall::Fill { state, bounds, .. }) = ctx.backend().last_call() else {
        panic!("expected a fill call");
    };
    assert_eq!(state.paint, Paint::color(WHITE));
    assert_eq!(bounds.to_array(), [0.0, 0.0, 10.0, 10.0]);
}

#[test]
fn unbalanced_frames_are_reset() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.save().unwrap();
    ctx.save().unwrap();
    ctx.end_frame();
    assert_eq!(ctx.state_depth(), 1);

    ctx.set_stroke_width(8.0);
    ctx.begin_frame(100.0, 100.0, 1.0).unwrap();
    ctx.begin_path();
    ctx.move_to(0.0, 0.0);
    ctx.line_to(10.0, 0.0);
    ctx.stroke();
    let Some(DrawCall::Stroke { stroke_width, .. }) = ctx.backend().last_call() else {
        panic!("expected a stroke call");
    };
    assert_eq!(*stroke_width, 1.0);
}

#[test]
fn reset_keeps_saved_states() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.set_line_cap(Cap::Round);
    ctx.save().unwrap();
    ctx.rotate(1.0);
    ctx.reset();
    assert_eq!(ctx.current_transform(), Affine::IDENTITY);
    assert_eq!(ctx.state_depth(), 2);
    ctx.restore().unwrap();
}

#[test]
fn skews_shear_the_axes() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.skew_x(FRAC_PI_4);
    assert!(close(
        ctx.current_transform() * Point::new(0.0, 1.0),
        Point::new(1.0, 1.0)
    ));
    ctx.reset_transform();
    ctx.skew_y(FRAC_PI_4);
    assert!(close(
        ctx.current_transform() * Point::new(1.0, 0.0),
        Point::new(1.0, 1.0)
    ));
}

#[test]
fn transforms_apply_in_call_order() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.translate(50.0, 50.0);
    ctx.rotate(core::f32::consts::FRAC_PI_2);
    ctx.transform(Affine::translate((10.0, 0.0)));
    assert!(close(
        ctx.current_transform() * Point::ORIGIN,
        Point::new(50.0, 60.0)
    ));
    assert!((nvg::average_scale(&ctx.current_transform()) - 1.0).abs() < 1e-6);
}

#[test]
fn scissor_follows_the_transform() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.translate(10.0, 10.0);
    ctx.set_scissor(0.0, 0.0, 20.0, -5.0);
    let scissor = ctx.scissor();
    assert_eq!(scissor.extent, [10.0, 0.0]);
    assert_eq!(scissor.transform.translation(), (20.0, 10.0).into());
}

#[test]
fn rotated_scissor_intersects_its_bounding_box() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.set_scissor(0.0, 0.0, 20.0, 20.0);
    ctx.rotate(FRAC_PI_4);
    ctx.intersect_scissor(-100.0, -100.0, 200.0, 200.0);

    let scissor = ctx.scissor();
    let half_diagonal = 10.0 * 2.0f32.sqrt();
    assert!((scissor.extent[0] - half_diagonal).abs() < 1e-3);
    assert!((scissor.extent[1] - half_diagonal).abs() < 1e-3);
    // The center of the original scissor does not move.
    let center = scissor.transform * Point::ORIGIN;
    assert!((center - Point::new(10.0, 10.0)).hypot() < 1e-3);
}

#[test]
fn intersect_without_scissor_sets_it() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    ctx.intersect_scissor(5.0, 5.0, 10.0, 10.0);
    let scissor = ctx.scissor();
    assert!(scissor.is_active());
    assert_eq!(scissor.extent, [5.0, 5.0]);
    ctx.reset_scissor();
    assert!(!ctx.scissor().is_active());
}

#[test]
fn invalid_pixel_ratio_keeps_the_previous_frame() {
    let mut ctx = recording_context(100.0, 100.0, 2.0, ContextOptions::default()).unwrap();
    assert!(matches!(
        ctx.begin_frame(100.0, 100.0, -1.0),
        Err(Error::InvalidDevicePixelRatio(_))
    ));
    assert_eq!(ctx.device_pixel_ratio(), 2.0);
    assert_eq!(ctx.backend().viewport, Some((100.0, 100.0, 2.0)));
}
