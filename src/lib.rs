/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! An image loading pipeline with vector rasterization
//!
//! The pipeline identifies the encoding of an opaque byte stream, rasterizes
//! SVG documents at an arbitrary zoom and normalizes whatever pixel layout a
//! decoder or renderer produced into one device independent raster.
//!
//! # Features
//! - Non destructive format sniffing over any [`Read`](std::io::Read) source
//! - SVG rasterization via `resvg` with deterministic size rounding
//! - Normalization of direct, indexed and packed component pixel models
//! - Binary raster decoders selectable per format through cargo features
//!
//! # Example
//! Decode whatever a stream holds, doubling vector content:
//! ```no_run
//! use rasterload::ImageLoader;
//!
//! fn main() -> Result<(), rasterload::ImageErrors> {
//!     let file = std::fs::File::open("logo.svg")?;
//!     let images = ImageLoader::new().decode(file, 200)?;
//!
//!     for image in &images {
//!         println!("{}x{} at zoom {}", image.element().width(), image.element().height(), image.zoom());
//!     }
//!     Ok(())
//! }
//! ```

pub mod codecs;
pub mod errors;
pub mod loader;
pub mod raster;
pub mod stream;
pub mod surface;
pub mod svg;

pub use crate::codecs::ImageFormat;
pub use crate::errors::ImageErrors;
pub use crate::loader::{ImageLoader, DEFAULT_ZOOM};
pub use crate::raster::{ElementAtZoom, Palette, RasterImage, Rgb};
pub use crate::svg::{ResvgRasterizer, SvgRasterizer};
