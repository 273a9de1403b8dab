/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The device independent raster representation
//!
//! Whatever a decoder or the SVG rasterizer produced natively ends up as a
//! [`RasterImage`], so callers handle one pixel layout regardless of the
//! source format.
//!
//! A raster is either *direct* (the pixel word encodes the channels through
//! non overlapping bitmasks) or *indexed* (the pixel word is a position in an
//! ordered color table), see [`Palette`].

use std::fmt::{Debug, Formatter};

/// A single 8-bit-per-channel color.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

/// Shift an 8-bit channel value into the bit range selected by `mask`.
///
/// e.g. a red value of `0xFF` under a mask of `0xFF0000` becomes `0xFF0000`.
pub(crate) fn channel_into_mask(value: u8, mask: u32) -> u32 {
    (u32::from(value) << mask.trailing_zeros()) & mask
}

/// Extract the 8-bit channel value selected by `mask` out of a pixel word.
pub(crate) fn channel_from_mask(pixel: u32, mask: u32) -> u8 {
    ((pixel & mask) >> mask.trailing_zeros()) as u8
}

/// How pixel words of a [`RasterImage`] map to colors
///
/// `Direct` palettes carry one bitmask per channel, the masks must not
/// overlap. `Indexed` palettes carry an ordered color table, the pixel word
/// is the position in that table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Palette {
    Direct {
        red_mask:   u32,
        green_mask: u32,
        blue_mask:  u32
    },
    Indexed(Vec<Rgb>)
}

impl Palette {
    /// Create a direct palette from three non overlapping channel masks.
    ///
    /// Each mask must select a contiguous run of exactly eight bits; the
    /// mask arithmetic assumes 8-bit channels and narrower or empty masks
    /// would drop channel bits.
    pub fn direct(red_mask: u32, green_mask: u32, blue_mask: u32) -> Palette {
        debug_assert!(
            [red_mask, green_mask, blue_mask]
                .iter()
                .all(|mask| *mask != 0 && mask >> mask.trailing_zeros() == 0xFF),
            "channel masks must each select a contiguous 8-bit range"
        );
        debug_assert_eq!(
            red_mask & green_mask | red_mask & blue_mask | green_mask & blue_mask,
            0,
            "channel masks overlap"
        );
        Palette::Direct {
            red_mask,
            green_mask,
            blue_mask
        }
    }

    /// Create an indexed palette from an ordered color table.
    pub fn indexed(colors: Vec<Rgb>) -> Palette {
        Palette::Indexed(colors)
    }

    /// Whether this is a direct, bitmask based palette.
    pub fn is_direct(&self) -> bool {
        matches!(self, Palette::Direct { .. })
    }

    /// Map a color to the pixel word it is stored as.
    ///
    /// For direct palettes this always succeeds. For indexed palettes the
    /// color must be present in the table, the word is its position.
    pub fn pixel_for(&self, color: Rgb) -> Option<u32> {
        match self {
            Palette::Direct {
                red_mask,
                green_mask,
                blue_mask
            } => Some(
                channel_into_mask(color.r, *red_mask)
                    | channel_into_mask(color.g, *green_mask)
                    | channel_into_mask(color.b, *blue_mask)
            ),
            Palette::Indexed(colors) => colors
                .iter()
                .position(|c| *c == color)
                .map(|position| position as u32)
        }
    }

    /// Map a stored pixel word back to its color.
    ///
    /// Indexed palettes return `None` for out of range positions.
    pub fn rgb_for(&self, pixel: u32) -> Option<Rgb> {
        match self {
            Palette::Direct {
                red_mask,
                green_mask,
                blue_mask
            } => Some(Rgb::new(
                channel_from_mask(pixel, *red_mask),
                channel_from_mask(pixel, *green_mask),
                channel_from_mask(pixel, *blue_mask)
            )),
            Palette::Indexed(colors) => colors.get(pixel as usize).copied()
        }
    }
}

/// A decoded image in the device independent representation
///
/// The pixel buffer is row major with exactly `width * height` words, each
/// word interpreted through the palette. Indexed rasters can carry one
/// transparent table position, direct rasters can carry one alpha byte per
/// pixel; the two never mix.
#[derive(Clone)]
pub struct RasterImage {
    width:             usize,
    height:            usize,
    depth:             u8,
    palette:           Palette,
    pixels:            Vec<u32>,
    transparent_index: Option<usize>,
    alpha:             Option<Vec<u8>>
}

impl RasterImage {
    /// Create a zero filled raster.
    ///
    /// # Panics
    /// If `width` or `height` is zero, callers must never construct an empty
    /// raster.
    pub fn new(width: usize, height: usize, depth: u8, palette: Palette) -> RasterImage {
        assert!(width > 0, "raster width must be greater than zero");
        assert!(height > 0, "raster height must be greater than zero");

        RasterImage {
            width,
            height,
            depth,
            palette,
            pixels: vec![0; width * height],
            transparent_index: None,
            alpha: None
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Width and height as one pair.
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Bits per pixel of the source representation.
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Row major pixel words, one per pixel.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel_at(&self, x: usize, y: usize) -> u32 {
        self.pixels[self.offset(x, y)]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: u32) {
        let offset = self.offset(x, y);
        self.pixels[offset] = pixel;
    }

    /// The per pixel alpha plane, present only for direct rasters that
    /// carried alpha.
    pub fn alpha(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }

    pub fn alpha_at(&self, x: usize, y: usize) -> Option<u8> {
        let offset = self.offset(x, y);
        self.alpha.as_ref().map(|plane| plane[offset])
    }

    /// Store one alpha byte, allocating the plane on first use.
    ///
    /// Indexed rasters express transparency only through
    /// [`set_transparent_index`](Self::set_transparent_index).
    pub fn set_alpha(&mut self, x: usize, y: usize, alpha: u8) {
        debug_assert!(
            self.palette.is_direct(),
            "per pixel alpha is unused for indexed palettes"
        );
        let len = self.width * self.height;
        let offset = self.offset(x, y);
        self.alpha.get_or_insert_with(|| vec![0; len])[offset] = alpha;
    }

    /// The single transparent table position, if any.
    pub const fn transparent_index(&self) -> Option<usize> {
        self.transparent_index
    }

    /// Mark one palette position as fully transparent.
    ///
    /// Unused for direct palettes, those express transparency per pixel.
    pub fn set_transparent_index(&mut self, index: Option<usize>) {
        debug_assert!(
            index.is_none() || !self.palette.is_direct(),
            "transparent index is unused for direct palettes"
        );
        self.transparent_index = index;
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        y * self.width + x
    }
}

impl Debug for RasterImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .field("palette", &self.palette)
            .field("transparent_index", &self.transparent_index)
            .field("has_alpha", &self.alpha.is_some())
            .finish_non_exhaustive()
    }
}

/// An artifact paired with the zoom level it was produced at
///
/// A zoom of 100 is native size. Dispatchers hand back every artifact
/// together with the zoom that produced it, so several resolutions of the
/// same logical image can coexist without losing provenance.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ElementAtZoom<T> {
    element: T,
    zoom:    u32
}

impl<T> ElementAtZoom<T> {
    pub const fn new(element: T, zoom: u32) -> ElementAtZoom<T> {
        ElementAtZoom { element, zoom }
    }

    pub const fn element(&self) -> &T {
        &self.element
    }

    pub const fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn into_element(self) -> T {
        self.element
    }
}
