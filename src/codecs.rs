/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Format identification and the decoder registry
//!
//! Every binary format is represented by a [`FormatCandidate`]: a pure
//! signature probe plus a decode entry point. Candidates are assembled once
//! per process, in registration order, and the first probe that matches wins;
//! there is no best-match scoring. A format compiled out through cargo
//! features is simply absent from the registry, never a runtime failure.
//!
//! Probes only ever look at an in-memory signature window, so a failing
//! candidate cannot perform I/O; the only I/O failure possible happens once,
//! when the window itself is read.
#![allow(unused_variables)]

use std::sync::OnceLock;

use crate::errors::ImageErrors;
use crate::raster::RasterImage;

/// The number of leading bytes sniffing looks at for binary signatures.
///
/// Large enough for a Win-BMP or OS2-BMP style header plus a safety margin.
pub const MAX_SIGNATURE_BYTES: usize = 18 + 2;

/// How many leading bytes the vector document check considers.
pub(crate) const SVG_SNIFF_WINDOW: usize = 512;

/// All supported image formats
///
/// This enum contains the formats the pipeline can classify, whether or not
/// a decoder for them was compiled in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ImageFormat {
    /// Scalable Vector Graphics, rasterized rather than decoded
    Svg,
    /// Windows Bitmap files
    Bmp,
    /// Graphics Interchange Format, possibly multi frame
    Gif,
    /// Windows Icon files
    Ico,
    /// Joint Photographic Experts Group
    Jpeg,
    /// Portable Network Graphics
    Png,
    /// Tagged Image File Format
    Tiff,
    /// Any unknown format
    Unknown
}

impl ImageFormat {
    /// Guess the format of an image based on its leading bytes.
    ///
    /// Returns `None` when nothing matched; candidates are tried in
    /// registration order and the first match wins.
    pub fn guess_format(bytes: &[u8]) -> Option<ImageFormat> {
        if is_svg(bytes) {
            return Some(ImageFormat::Svg);
        }
        candidates()
            .iter()
            .find(|candidate| (candidate.probe)(bytes))
            .map(|candidate| candidate.format)
    }

    /// Return true if this format has a decoder compiled in.
    pub fn has_decoder(self) -> bool {
        // if the feature is included, means we have a decoder
        #[allow(clippy::match_like_matches_macro)]
        match self {
            ImageFormat::Svg => true,
            ImageFormat::Bmp => cfg!(feature = "bmp"),
            ImageFormat::Gif => cfg!(feature = "gif"),
            ImageFormat::Ico => cfg!(feature = "ico"),
            ImageFormat::Jpeg => cfg!(feature = "jpeg"),
            ImageFormat::Png => cfg!(feature = "png"),
            ImageFormat::Tiff => cfg!(feature = "tiff"),
            _ => false
        }
    }

    /// Decode an in-memory image of this format into device independent
    /// rasters, one per frame.
    ///
    /// Vector content cannot be decoded standalone, it needs a zoom and a
    /// rasterizer; [`ImageLoader`](crate::loader::ImageLoader) handles it.
    pub fn decode(self, data: &[u8]) -> Result<Vec<RasterImage>, ImageErrors> {
        match self {
            ImageFormat::Bmp => {
                #[cfg(feature = "bmp")]
                {
                    decode_single(image::ImageFormat::Bmp, data)
                }
                #[cfg(not(feature = "bmp"))]
                {
                    Err(ImageErrors::NoDecoderForFormat(self))
                }
            }
            ImageFormat::Gif => {
                #[cfg(feature = "gif")]
                {
                    decode_gif(data)
                }
                #[cfg(not(feature = "gif"))]
                {
                    Err(ImageErrors::NoDecoderForFormat(self))
                }
            }
            ImageFormat::Ico => {
                #[cfg(feature = "ico")]
                {
                    decode_single(image::ImageFormat::Ico, data)
                }
                #[cfg(not(feature = "ico"))]
                {
                    Err(ImageErrors::NoDecoderForFormat(self))
                }
            }
            ImageFormat::Jpeg => {
                #[cfg(feature = "jpeg")]
                {
                    decode_single(image::ImageFormat::Jpeg, data)
                }
                #[cfg(not(feature = "jpeg"))]
                {
                    Err(ImageErrors::NoDecoderForFormat(self))
                }
            }
            ImageFormat::Png => {
                #[cfg(feature = "png")]
                {
                    decode_single(image::ImageFormat::Png, data)
                }
                #[cfg(not(feature = "png"))]
                {
                    Err(ImageErrors::NoDecoderForFormat(self))
                }
            }
            ImageFormat::Tiff => {
                #[cfg(feature = "tiff")]
                {
                    decode_single(image::ImageFormat::Tiff, data)
                }
                #[cfg(not(feature = "tiff"))]
                {
                    Err(ImageErrors::NoDecoderForFormat(self))
                }
            }
            ImageFormat::Svg | ImageFormat::Unknown => Err(ImageErrors::NoDecoderForFormat(self))
        }
    }
}

/// Whether the bytes look like the start of an SVG document.
///
/// Trims leading whitespace in the first 512 bytes and accepts an XML
/// declaration prologue or the document root opening tag.
pub fn is_svg(data: &[u8]) -> bool {
    let window = &data[..data.len().min(SVG_SNIFF_WINDOW)];
    let header = String::from_utf8_lossy(window);
    let header = header.trim_start();

    header.starts_with("<?xml") || header.starts_with("<svg")
}

/// One registered binary format: a pure signature probe plus its decode
/// entry point.
#[derive(Copy, Clone)]
pub(crate) struct FormatCandidate {
    pub format: ImageFormat,
    pub probe:  fn(&[u8]) -> bool,
    pub decode: fn(&[u8]) -> Result<Vec<RasterImage>, ImageErrors>
}

/// The process wide candidate registry, populated once, read only
/// thereafter.
pub(crate) fn candidates() -> &'static [FormatCandidate] {
    static CANDIDATES: OnceLock<Vec<FormatCandidate>> = OnceLock::new();

    CANDIDATES.get_or_init(|| {
        #[allow(unused_mut)]
        let mut list: Vec<FormatCandidate> = vec![];

        // registration order is match order, first match wins
        #[cfg(feature = "bmp")]
        list.push(FormatCandidate {
            format: ImageFormat::Bmp,
            probe:  probe_bmp,
            decode: |data| ImageFormat::Bmp.decode(data)
        });
        #[cfg(feature = "gif")]
        list.push(FormatCandidate {
            format: ImageFormat::Gif,
            probe:  probe_gif,
            decode: |data| ImageFormat::Gif.decode(data)
        });
        #[cfg(feature = "ico")]
        list.push(FormatCandidate {
            format: ImageFormat::Ico,
            probe:  probe_ico,
            decode: |data| ImageFormat::Ico.decode(data)
        });
        #[cfg(feature = "jpeg")]
        list.push(FormatCandidate {
            format: ImageFormat::Jpeg,
            probe:  probe_jpeg,
            decode: |data| ImageFormat::Jpeg.decode(data)
        });
        #[cfg(feature = "png")]
        list.push(FormatCandidate {
            format: ImageFormat::Png,
            probe:  probe_png,
            decode: |data| ImageFormat::Png.decode(data)
        });
        #[cfg(feature = "tiff")]
        list.push(FormatCandidate {
            format: ImageFormat::Tiff,
            probe:  probe_tiff,
            decode: |data| ImageFormat::Tiff.decode(data)
        });
        list
    })
}

/// Probe some bytes to see if they consist of a BMP image.
fn probe_bmp(bytes: &[u8]) -> bool {
    if let Some(magic_bytes) = bytes.get(0..2) {
        if magic_bytes == b"BM" {
            // skip file_size   -> 4
            // skip reserved    -> 4
            // skip data offset -> 4
            // read info header size
            if let Some(sz) = bytes.get(14) {
                let sz = *sz;

                return sz == 12
                    || sz == 16 /*os-v2*/
                    || sz == 40
                    || sz == 52
                    || sz == 56
                    || sz == 64 /*os-v2*/
                    || sz == 108
                    || sz == 124;
            }
        }
    }
    false
}

fn probe_gif(bytes: &[u8]) -> bool {
    bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a")
}

fn probe_ico(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0x00, 0x00, 0x01, 0x00])
}

fn probe_jpeg(bytes: &[u8]) -> bool {
    // a relaxed definition of what is a jpeg; the full 0xFF,0xD8,0xFF
    // signature is missing from some images in the wild
    bytes.starts_with(&[0xFF, 0xD8])
}

fn probe_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&[137, 80, 78, 71, 13, 10, 26, 10])
}

fn probe_tiff(bytes: &[u8]) -> bool {
    bytes.starts_with(b"II\x2A\x00") || bytes.starts_with(b"MM\x00\x2A")
}

/// Decode a single frame format through the raster decode collaborator.
#[cfg(any(
    feature = "bmp",
    feature = "ico",
    feature = "jpeg",
    feature = "png",
    feature = "tiff"
))]
fn decode_single(
    format: image::ImageFormat, data: &[u8]
) -> Result<Vec<RasterImage>, ImageErrors> {
    let decoded = image::load_from_memory_with_format(data, format)?;

    Ok(vec![rgba_to_raster(&decoded.into_rgba8())])
}

/// Decode a GIF keeping every frame, one raster per frame.
#[cfg(feature = "gif")]
fn decode_gif(data: &[u8]) -> Result<Vec<RasterImage>, ImageErrors> {
    use image::AnimationDecoder;

    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(data))?;
    let frames = decoder.into_frames().collect_frames()?;

    if frames.is_empty() {
        return Err(ImageErrors::InvalidImageStatic("gif stream contains no frames"));
    }
    Ok(frames
        .iter()
        .map(|frame| rgba_to_raster(frame.buffer()))
        .collect())
}

/// Funnel a decoded RGBA buffer through the same normalization path every
/// other native surface takes.
#[cfg(any(
    feature = "bmp",
    feature = "gif",
    feature = "ico",
    feature = "jpeg",
    feature = "png",
    feature = "tiff"
))]
fn rgba_to_raster(rgba: &image::RgbaImage) -> RasterImage {
    use crate::surface::{normalize, DirectSurface, NativeSurface};

    let (width, height) = rgba.dimensions();
    let pixels = rgba
        .as_raw()
        .chunks_exact(4)
        .map(|px| {
            u32::from(px[3]) << 24 | u32::from(px[0]) << 16 | u32::from(px[1]) << 8
                | u32::from(px[2])
        })
        .collect();

    let surface = DirectSurface::argb32(width as usize, height as usize, pixels);

    normalize(&NativeSurface::Direct(surface))
}
