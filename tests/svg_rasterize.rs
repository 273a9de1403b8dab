/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use rasterload::errors::ImageErrors;
use rasterload::svg::{ResvgRasterizer, SvgRasterizer};
use rasterload::Rgb;

const RED_RECT: &[u8] = br##"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="10" height="20"><rect width="10" height="20" fill="#ff0000"/></svg>"##;

const CIRCLE: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><circle cx="5" cy="5" r="4.5" fill="#000000"/></svg>"##;

#[test]
fn zoom_200_doubles_both_axes() {
    let images = ResvgRasterizer::new()
        .rasterize_at_zoom(RED_RECT, 200)
        .unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].zoom(), 200);
    assert_eq!(images[0].element().dimensions(), (20, 40));
}

#[test]
fn dimensions_follow_round_of_intrinsic_times_scale() {
    let rasterizer = ResvgRasterizer::new();

    for (zoom, expected) in [(50, (5, 10)), (100, (10, 20)), (200, (20, 40))] {
        let images = rasterizer.rasterize_at_zoom(RED_RECT, zoom).unwrap();
        assert_eq!(images[0].element().dimensions(), expected, "zoom {zoom}");
    }
}

#[test]
fn widths_grow_with_zoom() {
    let rasterizer = ResvgRasterizer::new();
    let widths: Vec<usize> = [50, 100, 200]
        .iter()
        .map(|zoom| {
            rasterizer.rasterize_at_zoom(RED_RECT, *zoom).unwrap()[0]
                .element()
                .width()
        })
        .collect();

    assert!(widths[0] < widths[1] && widths[1] < widths[2]);
}

#[test]
fn tiny_documents_are_clamped_to_one_pixel() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="0.2" height="0.2"/>"#;
    let images = ResvgRasterizer::new().rasterize_at_zoom(svg, 100).unwrap();

    assert_eq!(images[0].element().dimensions(), (1, 1));
}

#[test]
fn rasterization_is_deterministic() {
    let rasterizer = ResvgRasterizer::new();

    let first = rasterizer.rasterize_at_zoom(CIRCLE, 100).unwrap();
    let second = rasterizer.rasterize_at_zoom(CIRCLE, 100).unwrap();

    let (a, b) = (first[0].element(), second[0].element());
    assert_eq!(a.dimensions(), b.dimensions());
    assert_eq!(a.pixels(), b.pixels());
    assert_eq!(a.alpha(), b.alpha());
}

#[test]
fn full_coverage_fill_is_opaque_and_keeps_its_color() {
    let images = ResvgRasterizer::new()
        .rasterize_at_zoom(RED_RECT, 100)
        .unwrap();
    let image = images[0].element();

    // an interior pixel of a solid fill decodes back to pure red
    let pixel = image.pixel_at(5, 10);
    assert_eq!(image.palette().rgb_for(pixel), Some(Rgb::new(255, 0, 0)));
    assert_eq!(image.alpha_at(5, 10), Some(255));
}

#[test]
fn curved_edges_come_out_antialiased() {
    let images = ResvgRasterizer::new().rasterize_at_zoom(CIRCLE, 100).unwrap();
    let image = images[0].element();

    let alpha = image.alpha().expect("rendered surface carries alpha");
    // some edge pixels must be partially covered, fully binary coverage
    // would mean aliased output
    assert!(alpha.iter().any(|a| *a > 0 && *a < 255));
    // and the background stays untouched
    assert_eq!(image.alpha_at(0, 0), Some(0));
}

#[test]
fn single_scale_entry_point_matches_the_zoom_one() {
    let rasterizer = ResvgRasterizer::new();

    let at_zoom = rasterizer.rasterize_at_zoom(RED_RECT, 150).unwrap();
    let at_scale = rasterizer.rasterize(RED_RECT, 1.5).unwrap();

    assert_eq!(at_zoom[0].element().dimensions(), at_scale.dimensions());
    assert_eq!(at_zoom[0].element().pixels(), at_scale.pixels());
}

#[test]
fn corrupt_body_behind_a_valid_header_is_an_invalid_image() {
    // well formed looking header, broken XML body
    let corrupt = br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="10" height="20"><rect</svg>"#;

    let err = ResvgRasterizer::new()
        .rasterize_at_zoom(corrupt, 100)
        .unwrap_err();
    assert!(matches!(err, ImageErrors::InvalidImage(_)));
}

#[test]
fn garbage_that_is_not_xml_is_an_invalid_image() {
    let err = ResvgRasterizer::new()
        .rasterize_at_zoom(b"<not really svg at all", 100)
        .unwrap_err();
    assert!(matches!(err, ImageErrors::InvalidImage(_)));
}

#[test]
#[should_panic(expected = "zoom 0")]
fn zoom_zero_is_a_caller_bug() {
    let _ = ResvgRasterizer::new().rasterize_at_zoom(RED_RECT, 0);
}
