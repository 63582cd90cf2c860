//! Thin layer over the `image` crate.
//!
//! Decoding, PNG encoding, resampling and the multiply blend live here so
//! the pipeline stages only ever deal with in-memory buffers.

use std::fs;
use std::io;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::error::{Result, TransferError};
use crate::types::Colour;

/// Resampling filter used for every resize.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// Decode an image file, keeping its native colour type.
pub fn open(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| TransferError::Image {
        path: path.to_path_buf(),
        message: format!("Failed to open image: {}", e),
    })
}

/// Resize an image to exactly `(width, height)`.
pub fn resize(image: &RgbaImage, (width, height): (u32, u32)) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, RESAMPLE_FILTER)
}

/// A solid image filled with one colour.
pub fn solid(width: u32, height: u32, colour: Colour) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(colour.to_rgba()))
}

/// Channel-wise multiply of `image` with `mask`: `out = image * mask / 255`.
///
/// The mask's alpha is treated as opaque, so the result keeps `image`'s
/// alpha. Both buffers must have the same dimensions.
pub fn multiply(image: &RgbaImage, mask: &RgbaImage) -> RgbaImage {
    debug_assert_eq!(image.dimensions(), mask.dimensions());

    let mut out = image.clone();
    for (dst, m) in out.pixels_mut().zip(mask.pixels()) {
        for c in 0..3 {
            dst[c] = ((dst[c] as u32 * m[c] as u32) / 255) as u8;
        }
    }
    out
}

/// Create a directory and its parents, accepting one that already exists.
///
/// Any other failure, including an existing non-directory at `path`, is an
/// error.
pub fn create_dirs(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(TransferError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        }),
    }
}

/// Write an image as PNG, creating the parent directory on first use.
/// Existing files are replaced.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dirs(parent)?;
        }
    }

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| TransferError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })
}
