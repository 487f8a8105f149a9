// Copyright 2025 the nvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image management through the context.

use nvg::kurbo::Size;
use nvg::{ContextOptions, Error, ImageFlags, Paint, TextureKind};
use nvg_tests::recording_context;

#[test]
fn images_reach_the_backend() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    let pixels: Vec<u8> = (0..16).collect();
    let image = ctx
        .create_image_rgba(2, 2, ImageFlags::REPEAT_X | ImageFlags::PREMULTIPLIED, &pixels)
        .unwrap();

    let texture = &ctx.backend().textures[&image];
    assert_eq!(texture.kind, TextureKind::Rgba);
    assert_eq!((texture.width, texture.height), (2, 2));
    assert!(texture.flags.contains(ImageFlags::PREMULTIPLIED));
    assert_eq!(texture.data, pixels);
    assert_eq!(ctx.image_size(image).unwrap(), (2, 2));
}

#[test]
fn update_replaces_the_pixels() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    let image = ctx
        .create_image_alpha(3, 2, ImageFlags::empty(), &[0; 6])
        .unwrap();
    ctx.update_image(image, &[1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(ctx.backend().textures[&image].data, [1, 2, 3, 4, 5, 6]);

    assert!(matches!(
        ctx.update_image(image, &[0; 24]),
        Err(Error::ImageDataSize {
            expected: 6,
            actual: 24
        })
    ));
    assert_eq!(ctx.backend().textures[&image].data, [1, 2, 3, 4, 5, 6]);
}

#[test]
fn invalid_images_are_rejected() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    assert!(matches!(
        ctx.create_image_rgba(0, 1, ImageFlags::empty(), &[]),
        Err(Error::InvalidImageSize {
            width: 0,
            height: 1
        })
    ));
    assert!(matches!(
        ctx.create_image_alpha(4, 4, ImageFlags::empty(), &[0; 15]),
        Err(Error::ImageDataSize { .. })
    ));
    assert!(ctx.backend().textures.is_empty());
}

#[test]
fn deleted_images_are_unknown() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    let image = ctx
        .create_image_alpha(1, 1, ImageFlags::empty(), &[255])
        .unwrap();
    ctx.delete_image(image).unwrap();
    assert!(ctx.backend().textures.is_empty());
    assert!(matches!(ctx.delete_image(image), Err(Error::UnknownImage(_))));
    assert!(matches!(ctx.image_size(image), Err(Error::UnknownImage(_))));
    assert!(matches!(
        ctx.update_image(image, &[0]),
        Err(Error::UnknownImage(_))
    ));
}

#[test]
fn image_patterns_reference_the_texture() {
    let mut ctx = recording_context(100.0, 100.0, 1.0, ContextOptions::default()).unwrap();
    let image = ctx
        .create_image_rgba(1, 1, ImageFlags::NEAREST, &[255; 4])
        .unwrap();
    ctx.set_fill_paint(Paint::image_pattern(
        (0.0, 0.0),
        Size::new(8.0, 8.0),
        0.0,
        image,
        0.5,
    ));
    ctx.set_global_alpha(0.5);
    ctx.begin_path();
    ctx.rect(0.0, 0.0, 16.0, 16.0);
    ctx.fill();

    let paint = &ctx.backend().last_call().unwrap().state().paint;
    assert_eq!(paint.image, Some(image));
    assert_eq!(paint.extent, [8.0, 8.0]);
    assert_eq!(paint.inner_color.components[3], 0.25);
}
