/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during loading
//!
//! The taxonomy keeps three failure classes apart so callers can message them
//! differently:
//!
//! - [`IoErrors`](ImageErrors::IoErrors): the stream could not be read at all
//! - [`InvalidImage`](ImageErrors::InvalidImage): a recognized format whose
//!   content failed to parse, e.g. a corrupt SVG body behind a valid header
//! - [`UnsupportedFormat`](ImageErrors::UnsupportedFormat): no registered
//!   candidate recognized the leading bytes
//!
//! Per candidate sniffing problems are swallowed and treated as a non match,
//! the final "nothing matched" outcome never is.

use std::fmt::{Debug, Display, Formatter};

use crate::codecs::ImageFormat;

/// All errors possible while loading an image
#[non_exhaustive]
pub enum ImageErrors {
    /// The underlying stream could not be read.
    ///
    /// Distinct from a classification failure, a readable stream that matches
    /// no candidate is [`UnsupportedFormat`](Self::UnsupportedFormat).
    IoErrors(std::io::Error),
    /// Recognized format whose content failed to parse or decode.
    InvalidImage(String),
    /// Same as [`InvalidImage`](Self::InvalidImage) with a static message.
    InvalidImageStatic(&'static str),
    /// No registered format candidate recognized the content.
    UnsupportedFormat,
    /// The format is known but its decoder was not compiled in, or the
    /// format cannot be decoded standalone.
    NoDecoderForFormat(ImageFormat)
}

impl Debug for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoErrors(err) => {
                writeln!(f, "underlying I/O error: {err}")
            }
            Self::InvalidImage(message) => {
                writeln!(f, "invalid image: {message}")
            }
            Self::InvalidImageStatic(message) => {
                writeln!(f, "invalid image: {message}")
            }
            Self::UnsupportedFormat => {
                writeln!(f, "no candidate recognized the content")
            }
            Self::NoDecoderForFormat(format) => {
                writeln!(f, "no decoder is available for {format:?}")
            }
        }
    }
}

impl Display for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ImageErrors {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoErrors(err) => Some(err),
            _ => None
        }
    }
}

impl From<std::io::Error> for ImageErrors {
    fn from(value: std::io::Error) -> Self {
        ImageErrors::IoErrors(value)
    }
}

impl From<usvg::Error> for ImageErrors {
    fn from(value: usvg::Error) -> Self {
        ImageErrors::InvalidImage(value.to_string())
    }
}

#[cfg(any(
    feature = "bmp",
    feature = "gif",
    feature = "ico",
    feature = "jpeg",
    feature = "png",
    feature = "tiff"
))]
impl From<image::ImageError> for ImageErrors {
    fn from(value: image::ImageError) -> Self {
        // candidates only ever decode a fully buffered stream, so whatever
        // the decoder reports is a content defect: a truncated file surfaces
        // as an end-of-file "I/O" error and a file using an unsupported
        // feature still matched its signature, neither is an unreadable
        // stream or an unknown format
        ImageErrors::InvalidImage(value.to_string())
    }
}
