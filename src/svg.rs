/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! SVG rasterization
//!
//! [`ResvgRasterizer`] parses a vector document, computes target pixel
//! dimensions from the requested zoom and renders into a fresh transparent
//! surface, which is then handed to the normalizer like any other native
//! surface.
//!
//! Rendering quality is policy, not configuration: edges are antialiased,
//! alpha blending and geometry are exact, there is no dithering and nothing
//! is tunable per call. Callers that care should assert smooth output rather
//! than any particular renderer setting.

use log::trace;

use crate::errors::ImageErrors;
use crate::raster::{ElementAtZoom, RasterImage};
use crate::surface::{normalize, DirectSurface, NativeSurface};

/// Converts vector document bytes into rasterized images.
///
/// Exactly one implementation is bound to an
/// [`ImageLoader`](crate::loader::ImageLoader) at construction and never
/// swapped afterwards.
pub trait SvgRasterizer {
    /// Rasterize at an integer zoom percentage, 100 being native size.
    ///
    /// Every produced image is tagged with the zoom that produced it.
    ///
    /// # Panics
    /// If `zoom` is zero; zoom 0 selects the plain decode path in the
    /// dispatcher and must never reach a rasterizer.
    fn rasterize_at_zoom(
        &self, data: &[u8], zoom: u32
    ) -> Result<Vec<ElementAtZoom<RasterImage>>, ImageErrors>;

    /// Rasterize at a floating point scale, 1.0 being native size.
    ///
    /// # Panics
    /// If `scale` is not a positive finite number.
    fn rasterize(&self, data: &[u8], scale: f32) -> Result<RasterImage, ImageErrors>;
}

/// The [`SvgRasterizer`] backed by `usvg`/`resvg`.
#[derive(Copy, Clone, Default)]
pub struct ResvgRasterizer;

impl ResvgRasterizer {
    pub fn new() -> ResvgRasterizer {
        ResvgRasterizer
    }
}

impl SvgRasterizer for ResvgRasterizer {
    fn rasterize_at_zoom(
        &self, data: &[u8], zoom: u32
    ) -> Result<Vec<ElementAtZoom<RasterImage>>, ImageErrors> {
        assert!(zoom != 0, "zoom 0 selects the plain decode path, it must not reach the rasterizer");

        let image = render_at_scale(data, zoom as f32 / 100.0)?;

        Ok(vec![ElementAtZoom::new(image, zoom)])
    }

    fn rasterize(&self, data: &[u8], scale: f32) -> Result<RasterImage, ImageErrors> {
        assert!(
            scale.is_finite() && scale > 0.0,
            "scale must be a positive finite number"
        );
        render_at_scale(data, scale)
    }
}

/// Parse, size and render one document at a uniform scale.
///
/// Both axes are rounded independently and clamped to at least one pixel.
fn render_at_scale(data: &[u8], scale: f32) -> Result<RasterImage, ImageErrors> {
    // a document that does not parse is an invalid image, never a silent
    // empty result
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(data, &options)?;

    let size = tree.size();
    let width = scaled_dimension(size.width(), scale);
    let height = scaled_dimension(size.height(), scale);

    trace!(
        "rendering svg of intrinsic size {}x{} at scale {} into {}x{}",
        size.width(),
        size.height(),
        scale,
        width,
        height
    );

    // surface starts out fully transparent; the scale is applied once, as a
    // transform, not per element
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or(ImageErrors::InvalidImageStatic("cannot allocate target pixel surface"))?;

    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut()
    );

    let surface = DirectSurface::argb32(width as usize, height as usize, argb_pixels(&pixmap));

    Ok(normalize(&NativeSurface::Direct(surface)))
}

fn scaled_dimension(value: f32, scale: f32) -> u32 {
    let scaled = (f64::from(value) * f64::from(scale)).round();

    (scaled as u32).max(1)
}

/// Un-premultiply the rendered surface into plain `0xAARRGGBB` words.
fn argb_pixels(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u32> {
    pixmap
        .pixels()
        .iter()
        .map(|premultiplied| {
            let color = premultiplied.demultiply();

            u32::from(color.alpha()) << 24
                | u32::from(color.red()) << 16
                | u32::from(color.green()) << 8
                | u32::from(color.blue())
        })
        .collect()
}
