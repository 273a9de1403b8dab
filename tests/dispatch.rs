/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{Cursor, Read};

use rasterload::errors::ImageErrors;
use rasterload::raster::{ElementAtZoom, Palette, RasterImage};
use rasterload::stream::PeekReader;
use rasterload::svg::SvgRasterizer;
use rasterload::{ImageFormat, ImageLoader, Rgb, DEFAULT_ZOOM};

const SVG: &[u8] = br##"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="10" height="20"><rect width="10" height="20" fill="#00ff00"/></svg>"##;

#[cfg(feature = "png")]
fn encoded_png() -> Vec<u8> {
    let mut img = image::RgbaImage::new(3, 2);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));

    let mut buf = vec![];
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn vector_streams_are_rasterized_at_the_requested_zoom() {
    let images = ImageLoader::new().decode(SVG, 200).unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].zoom(), 200);
    assert_eq!(images[0].element().dimensions(), (20, 40));
}

#[test]
fn zoom_zero_means_do_not_rasterize() {
    // with rasterization off the vector bytes fall through to the binary
    // candidates, and none of them claims markup
    let err = ImageLoader::new().decode(SVG, 0).unwrap_err();

    assert!(matches!(err, ImageErrors::UnsupportedFormat));
}

#[test]
fn truncated_stream_is_unsupported_not_an_io_error() {
    let err = ImageLoader::new().decode(&[0xDE, 0xAD][..], 100).unwrap_err();

    assert!(matches!(err, ImageErrors::UnsupportedFormat));
}

#[test]
fn empty_stream_is_unsupported() {
    let err = ImageLoader::new().decode(&[][..], 100).unwrap_err();

    assert!(matches!(err, ImageErrors::UnsupportedFormat));
}

#[test]
fn unreadable_streams_surface_io_errors() {
    struct Broken;
    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "pulled the plug"))
        }
    }

    let err = ImageLoader::new().decode(Broken, 100).unwrap_err();
    assert!(matches!(err, ImageErrors::IoErrors(_)));
}

#[test]
#[cfg(feature = "png")]
fn binary_formats_decode_at_native_zoom() {
    let png = encoded_png();
    let images = ImageLoader::new().decode(png.as_slice(), 200).unwrap();

    assert_eq!(images.len(), 1);
    // raster content ignores the zoom request and reports its native size
    assert_eq!(images[0].zoom(), DEFAULT_ZOOM);

    let image = images[0].element();
    assert_eq!(image.dimensions(), (3, 2));
    assert_eq!(
        image.palette().rgb_for(image.pixel_at(0, 0)),
        Some(Rgb::new(255, 0, 0))
    );
    assert_eq!(image.alpha_at(0, 0), Some(255));
}

#[test]
#[cfg(feature = "png")]
fn truncated_content_of_a_recognized_format_is_an_invalid_image() {
    // the signature matches, so classification succeeds; the cut-off body
    // is a content defect, not a stream failure
    let png = encoded_png();
    let err = ImageLoader::new().decode(&png[..40], 100).unwrap_err();

    assert!(matches!(err, ImageErrors::InvalidImage(_)));
}

#[test]
#[cfg(feature = "png")]
fn garbage_behind_a_valid_signature_is_an_invalid_image() {
    let mut data = vec![137, 80, 78, 71, 13, 10, 26, 10];
    data.extend_from_slice(&[0xAB; 64]);

    let err = ImageLoader::new().decode(data.as_slice(), 100).unwrap_err();
    assert!(matches!(err, ImageErrors::InvalidImage(_)));
}

#[test]
#[cfg(feature = "png")]
fn sniffing_leaves_the_stream_replayable() {
    let png = encoded_png();
    let mut reader = PeekReader::new(png.as_slice());

    let guessed = {
        let header = reader.peek(64).unwrap();
        ImageFormat::guess_format(header)
    };
    assert_eq!(guessed, Some(ImageFormat::Png));

    // after sniffing the stream still reads byte for byte from the start
    let mut replay = vec![];
    reader.read_to_end(&mut replay).unwrap();
    assert_eq!(replay, png);
}

#[test]
#[cfg(feature = "gif")]
fn multi_frame_sources_keep_every_frame() {
    let mut buf = vec![];
    {
        let mut encoder = image::codecs::gif::GifEncoder::new(&mut buf);
        for shade in [64_u8, 192] {
            let frame = image::RgbaImage::from_pixel(2, 2, image::Rgba([shade, 0, 0, 255]));
            encoder.encode_frame(image::Frame::new(frame)).unwrap();
        }
    }

    let images = ImageLoader::new().decode(buf.as_slice(), 100).unwrap();

    assert_eq!(images.len(), 2);
    for image in &images {
        assert_eq!(image.zoom(), DEFAULT_ZOOM);
        assert_eq!(image.element().dimensions(), (2, 2));
    }
}

#[test]
fn buffer_entry_point_scales_vector_content() {
    let images = ImageLoader::new().decode_bytes(SVG, 2.0).unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].zoom(), 200);
    assert_eq!(images[0].element().dimensions(), (20, 40));
}

#[test]
#[cfg(feature = "png")]
fn buffer_entry_point_with_scale_zero_decodes_natively() {
    let png = encoded_png();
    let images = ImageLoader::new().decode_bytes(&png, 0.0).unwrap();

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].zoom(), DEFAULT_ZOOM);
}

#[test]
fn an_injected_rasterizer_handles_all_vector_content() {
    struct FixedRasterizer;

    fn one_by_one() -> RasterImage {
        RasterImage::new(1, 1, 32, Palette::direct(0xFF0000, 0xFF00, 0xFF))
    }

    impl SvgRasterizer for FixedRasterizer {
        fn rasterize_at_zoom(
            &self, _data: &[u8], zoom: u32
        ) -> Result<Vec<ElementAtZoom<RasterImage>>, ImageErrors> {
            Ok(vec![ElementAtZoom::new(one_by_one(), zoom)])
        }

        fn rasterize(&self, _data: &[u8], _scale: f32) -> Result<RasterImage, ImageErrors> {
            Ok(one_by_one())
        }
    }

    let loader = ImageLoader::with_rasterizer(Box::new(FixedRasterizer));
    let images = loader.decode(SVG, 400).unwrap();

    assert_eq!(images[0].zoom(), 400);
    assert_eq!(images[0].element().dimensions(), (1, 1));
}
