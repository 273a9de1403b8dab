/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Normalization of native pixel surfaces
//!
//! Renderers and platform decoders produce pixels in one of three structurally
//! different models; [`normalize`] converts any of them into the one device
//! independent [`RasterImage`] the rest of the pipeline works with.
//!
//! The three models differ in how they express color and transparency:
//!
//! - [`DirectSurface`]: one 32-bit word per pixel, channels packed by
//!   bitmask, optional per pixel alpha
//! - [`IndexedSurface`]: one table position per pixel, transparency is a
//!   single transparent table position
//! - [`PackedComponentSurface`]: three interleaved one byte samples per
//!   pixel, no transparency representable
//!
//! The input type is a closed enum, so a surface the normalizer cannot handle
//! is unrepresentable rather than a silent empty result.

use crate::raster::{channel_into_mask, Palette, RasterImage, Rgb};

/// A direct/truecolor surface, one packed 32-bit word per pixel
///
/// The masks describe how the *destination* raster should pack its channels.
/// The `pixels` buffer itself always uses `0xAARRGGBB` words, which is the
/// layout every native truecolor surface hands out when asked for a pixel.
pub struct DirectSurface {
    pub width:      usize,
    pub height:     usize,
    /// Bits per pixel, 32 with alpha and 24 without.
    pub depth:      u8,
    pub red_mask:   u32,
    pub green_mask: u32,
    pub blue_mask:  u32,
    pub has_alpha:  bool,
    /// Row major `0xAARRGGBB` words, one per pixel.
    pub pixels:     Vec<u32>
}

impl DirectSurface {
    /// A 32-bit ARGB surface with alpha, the layout the SVG engine renders
    /// into.
    pub fn argb32(width: usize, height: usize, pixels: Vec<u32>) -> DirectSurface {
        assert_eq!(pixels.len(), width * height, "pixel buffer does not match dimensions");

        DirectSurface {
            width,
            height,
            depth: 32,
            red_mask: 0xFF0000,
            green_mask: 0x00FF00,
            blue_mask: 0x0000FF,
            has_alpha: true,
            pixels
        }
    }
}

/// An indexed/palette surface, one color table position per pixel
pub struct IndexedSurface {
    pub width:       usize,
    pub height:      usize,
    pub depth:       u8,
    /// The color table as three parallel byte arrays, one entry per
    /// position.
    pub reds:        Vec<u8>,
    pub greens:      Vec<u8>,
    pub blues:       Vec<u8>,
    /// The single fully transparent table position, if any.
    pub transparent: Option<usize>,
    /// Row major raw table positions, one per pixel.
    pub pixels:      Vec<u32>
}

/// A packed multi component surface, three one byte samples per pixel
///
/// Samples are interleaved in red, green, blue order. No alpha or
/// transparency is representable in this model.
pub struct PackedComponentSurface {
    pub width:   usize,
    pub height:  usize,
    pub depth:   u8,
    /// Row major interleaved `r, g, b` samples, three per pixel.
    pub samples: Vec<u8>
}

/// The closed set of native surface variants the normalizer understands.
pub enum NativeSurface {
    Direct(DirectSurface),
    Indexed(IndexedSurface),
    PackedComponent(PackedComponentSurface)
}

/// Convert a native surface into the device independent raster.
///
/// Never mutates the surface and has no side effects beyond building the
/// returned image.
pub fn normalize(surface: &NativeSurface) -> RasterImage {
    match surface {
        NativeSurface::Direct(direct) => normalize_direct(direct),
        NativeSurface::Indexed(indexed) => normalize_indexed(indexed),
        NativeSurface::PackedComponent(packed) => normalize_packed(packed)
    }
}

/// Direct surfaces keep their channel masks; each pixel is re-packed from
/// its 8-bit channels through those masks, alpha carried per pixel when the
/// model has it.
fn normalize_direct(surface: &DirectSurface) -> RasterImage {
    let palette = Palette::direct(surface.red_mask, surface.green_mask, surface.blue_mask);
    let mut image = RasterImage::new(surface.width, surface.height, surface.depth, palette);

    for y in 0..surface.height {
        for x in 0..surface.width {
            let argb = surface.pixels[y * surface.width + x];

            let r = ((argb >> 16) & 0xFF) as u8;
            let g = ((argb >> 8) & 0xFF) as u8;
            let b = (argb & 0xFF) as u8;

            let pixel = channel_into_mask(r, surface.red_mask)
                | channel_into_mask(g, surface.green_mask)
                | channel_into_mask(b, surface.blue_mask);

            image.set_pixel(x, y, pixel);

            if surface.has_alpha {
                image.set_alpha(x, y, ((argb >> 24) & 0xFF) as u8);
            }
        }
    }
    image
}

/// Indexed surfaces rebuild the color table in order and copy raw table
/// positions untouched; the transparent position is carried over verbatim.
fn normalize_indexed(surface: &IndexedSurface) -> RasterImage {
    let size = surface.reds.len();
    debug_assert!(size == surface.greens.len() && size == surface.blues.len());

    let colors = (0..size)
        .map(|i| Rgb::new(surface.reds[i], surface.greens[i], surface.blues[i]))
        .collect();

    let mut image = RasterImage::new(
        surface.width,
        surface.height,
        surface.depth,
        Palette::indexed(colors)
    );
    image.set_transparent_index(surface.transparent);

    for y in 0..surface.height {
        for x in 0..surface.width {
            image.set_pixel(x, y, surface.pixels[y * surface.width + x]);
        }
    }
    image
}

/// Packed component surfaces get a fixed destination convention: red in the
/// low byte, green in the middle, blue in the high byte.
///
/// This assumes the source holds exactly three interleaved samples per pixel
/// and does not verify channel order or count against the surface, a
/// simplifying assumption kept from the reference conversion. Behavior for
/// other layouts is unspecified upstream. No transparency is representable,
/// the transparent index is always absent.
fn normalize_packed(surface: &PackedComponentSurface) -> RasterImage {
    let palette = Palette::direct(0x0000FF, 0x00FF00, 0xFF0000);
    let mut image = RasterImage::new(surface.width, surface.height, surface.depth, palette);

    for y in 0..surface.height {
        for x in 0..surface.width {
            let sample = (y * surface.width + x) * 3;
            let r = surface.samples[sample];
            let g = surface.samples[sample + 1];
            let b = surface.samples[sample + 2];

            let pixel = channel_into_mask(r, 0x0000FF)
                | channel_into_mask(g, 0x00FF00)
                | channel_into_mask(b, 0xFF0000);

            image.set_pixel(x, y, pixel);
        }
    }
    image
}
