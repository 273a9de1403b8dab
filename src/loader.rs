/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The format dispatcher
//!
//! [`ImageLoader`] ties the pipeline together: sniff the leading bytes,
//! select a decode branch (the SVG rasterizer for vector content, the first
//! matching registered candidate otherwise) and hand back device independent
//! rasters, each tagged with the zoom it was produced at.
//!
//! The loader owns its rasterizer binding. Exactly one implementation is
//! chosen at construction and never swapped for the lifetime of the loader,
//! there is no process global registry to race on.

use std::io::Read;

use log::trace;

use crate::codecs::{candidates, is_svg, FormatCandidate, MAX_SIGNATURE_BYTES, SVG_SNIFF_WINDOW};
use crate::errors::ImageErrors;
use crate::raster::{ElementAtZoom, RasterImage};
use crate::stream::PeekReader;
use crate::svg::{ResvgRasterizer, SvgRasterizer};

/// The zoom every natively decoded raster is tagged with.
pub const DEFAULT_ZOOM: u32 = 100;

/// Sniffs, selects and decodes.
pub struct ImageLoader {
    rasterizer: Box<dyn SvgRasterizer>
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    /// A loader bound to the built in `resvg` rasterizer.
    pub fn new() -> ImageLoader {
        ImageLoader {
            rasterizer: Box::new(ResvgRasterizer::new())
        }
    }

    /// A loader bound to a caller provided rasterizer.
    ///
    /// The binding is immutable for the lifetime of the loader.
    pub fn with_rasterizer(rasterizer: Box<dyn SvgRasterizer>) -> ImageLoader {
        ImageLoader { rasterizer }
    }

    /// Decode every image in `stream`, rasterizing vector content at `zoom`.
    ///
    /// The stream only needs to implement [`Read`]; buffering for non
    /// destructive sniffing happens here, not at the call site. A `zoom` of
    /// zero means "do not rasterize", vector content then falls through to
    /// the plain candidate list and comes back as
    /// [`UnsupportedFormat`](ImageErrors::UnsupportedFormat).
    ///
    /// Natively decoded rasters are tagged with [`DEFAULT_ZOOM`]; more than
    /// one element is returned only for multi frame sources.
    pub fn decode<R: Read>(
        &self, stream: R, zoom: u32
    ) -> Result<Vec<ElementAtZoom<RasterImage>>, ImageErrors> {
        let mut stream = PeekReader::new(stream);

        // the sniff window never moves the stream, a failure here is an I/O
        // error, not a classification result
        let route = {
            let header = stream.peek(MAX_SIGNATURE_BYTES)?;

            // single byte fast path: the only registered formats starting
            // with '<' are vector documents
            if zoom != 0 && header.first() == Some(&b'<') {
                None
            } else {
                let candidate = candidates()
                    .iter()
                    .find(|candidate| (candidate.probe)(header))
                    .ok_or(ImageErrors::UnsupportedFormat)?;
                Some(*candidate)
            }
        };

        let mut data = vec![];
        stream.read_to_end(&mut data)?;

        match route {
            None => {
                trace!("vector content detected, rasterizing at zoom {zoom}");
                self.rasterizer.rasterize_at_zoom(&data, zoom)
            }
            Some(candidate) => self.decode_candidate(candidate, &data)
        }
    }

    /// Decode an in-memory buffer, rasterizing vector content at a floating
    /// point `scale` (1.0 = native size, 0.0 = do not rasterize).
    ///
    /// Equivalent to [`decode`](Self::decode) with `zoom = scale * 100`,
    /// with the full prologue/root-tag vector check instead of the single
    /// byte fast path.
    pub fn decode_bytes(
        &self, data: &[u8], scale: f32
    ) -> Result<Vec<ElementAtZoom<RasterImage>>, ImageErrors> {
        if scale != 0.0 && is_svg(&data[..data.len().min(SVG_SNIFF_WINDOW)]) {
            let zoom = (f64::from(scale) * 100.0).round() as u32;

            trace!("vector content detected, rasterizing at scale {scale}");
            let image = self.rasterizer.rasterize(data, scale)?;

            return Ok(vec![ElementAtZoom::new(image, zoom)]);
        }
        let candidate = candidates()
            .iter()
            .find(|candidate| (candidate.probe)(data))
            .ok_or(ImageErrors::UnsupportedFormat)?;

        self.decode_candidate(*candidate, data)
    }

    fn decode_candidate(
        &self, candidate: FormatCandidate, data: &[u8]
    ) -> Result<Vec<ElementAtZoom<RasterImage>>, ImageErrors> {
        trace!("decoding {:?} content", candidate.format);

        let images = (candidate.decode)(data)?;

        Ok(images
            .into_iter()
            .map(|image| ElementAtZoom::new(image, DEFAULT_ZOOM))
            .collect())
    }
}
