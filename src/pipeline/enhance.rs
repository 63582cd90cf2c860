//! Brightness, contrast and sharpness adjustment.
//!
//! Each adjustment interpolates between a degenerate version of the image
//! and the image itself: `out = degenerate + factor * (image - degenerate)`.
//! A factor of 0.0 yields the degenerate image, 1.0 the unchanged image and
//! anything above extrapolates away from the degenerate. Alpha is never
//! touched.

use image::{Rgba, RgbaImage};

use crate::imaging;

/// Weights of the 3x3 smoothing kernel used as the sharpness baseline.
const SMOOTH_KERNEL: [u32; 9] = [1, 1, 1, 1, 5, 1, 1, 1, 1];
const SMOOTH_DIVISOR: u32 = 13;

/// Enhancement factors and final size for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enhancement {
    pub brightness: f64,
    pub contrast: f64,
    pub sharpness: f64,
    pub size: Option<(u32, u32)>,
}

impl Default for Enhancement {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            sharpness: 1.0,
            size: None,
        }
    }
}

impl Enhancement {
    /// Apply brightness, then contrast, then sharpness, then the final resize.
    pub fn apply(&self, image: &RgbaImage) -> RgbaImage {
        let out = brightness(image, self.brightness);
        let out = contrast(&out, self.contrast);
        let out = sharpness(&out, self.sharpness);
        match self.size {
            Some(size) => imaging::resize(&out, size),
            None => out,
        }
    }
}

/// Scale brightness. 0.0 is black.
pub fn brightness(image: &RgbaImage, factor: f64) -> RgbaImage {
    if factor == 1.0 {
        return image.clone();
    }
    let black = RgbaImage::new(image.width(), image.height());
    blend(&black, image, factor)
}

/// Scale contrast around the mean luminance. 0.0 is a flat grey.
pub fn contrast(image: &RgbaImage, factor: f64) -> RgbaImage {
    if factor == 1.0 {
        return image.clone();
    }
    let mean = mean_luma(image);
    let grey = RgbaImage::from_pixel(image.width(), image.height(), Rgba([mean, mean, mean, 255]));
    blend(&grey, image, factor)
}

/// Scale sharpness. 0.0 is the smoothed image.
pub fn sharpness(image: &RgbaImage, factor: f64) -> RgbaImage {
    if factor == 1.0 {
        return image.clone();
    }
    blend(&smooth(image), image, factor)
}

/// Interpolate RGB channels from `degenerate` toward `image`, keeping the
/// alpha of `image`. Results are clamped to `0..=255` and truncated.
fn blend(degenerate: &RgbaImage, image: &RgbaImage, factor: f64) -> RgbaImage {
    let factor = factor as f32;
    let mut out = image.clone();

    for (dst, deg) in out.pixels_mut().zip(degenerate.pixels()) {
        for c in 0..3 {
            let d = deg[c] as f32;
            let v = d + factor * (dst[c] as f32 - d);
            dst[c] = v.clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Rounded mean of ITU-R 601 luma over every pixel.
fn mean_luma(image: &RgbaImage) -> u8 {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return 0;
    }

    let sum: u64 = image
        .pixels()
        .map(|p| {
            let l = (u32::from(p[0]) * 19595 + u32::from(p[1]) * 38470 + u32::from(p[2]) * 7471 + 0x8000) >> 16;
            u64::from(l)
        })
        .sum();

    ((sum as f64 / count as f64) + 0.5) as u8
}

/// 3x3 smoothing filter. Border pixels are copied unchanged.
fn smooth(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut out = image.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sums = [0u32; 3];
            for (i, weight) in SMOOTH_KERNEL.iter().enumerate() {
                let sx = x + (i as u32 % 3) - 1;
                let sy = y + (i as u32 / 3) - 1;
                let p = image.get_pixel(sx, sy);
                for c in 0..3 {
                    sums[c] += u32::from(p[c]) * weight;
                }
            }

            let dst = out.get_pixel_mut(x, y);
            for c in 0..3 {
                dst[c] = ((sums[c] + SMOOTH_DIVISOR / 2) / SMOOTH_DIVISOR) as u8;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(5, 5, |x, y| {
            Rgba([x as u8 * 50, y as u8 * 40, ((x + y) % 2) as u8 * 200, 100 + x as u8])
        })
    }

    #[test]
    fn test_identity_factors() {
        let image = sample();
        assert_eq!(Enhancement::default().apply(&image), image);
    }

    #[test]
    fn test_brightness_zero_is_black() {
        let out = brightness(&sample(), 0.0);
        for (p, src) in out.pixels().zip(sample().pixels()) {
            assert_eq!(p.0, [0, 0, 0, src[3]]);
        }
    }

    #[test]
    fn test_brightness_scales_and_clamps() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([100, 200, 3, 40]));
        assert_eq!(brightness(&image, 2.0).get_pixel(0, 0).0, [200, 255, 6, 40]);
        assert_eq!(brightness(&image, 0.5).get_pixel(0, 0).0, [50, 100, 1, 40]);
    }

    #[test]
    fn test_contrast_zero_is_flat_grey() {
        let out = contrast(&sample(), 0.0);
        let first = out.get_pixel(0, 0).0;
        assert_eq!(first[0], first[1]);
        assert_eq!(first[1], first[2]);
        assert!(out.pixels().all(|p| p[0] == first[0] && p[1] == first[0] && p[2] == first[0]));
    }

    #[test]
    fn test_contrast_mean_of_uniform_image() {
        let image = RgbaImage::from_pixel(3, 3, Rgba([90, 90, 90, 255]));
        // A uniform image has nothing to stretch.
        assert_eq!(contrast(&image, 3.0), image);
    }

    #[test]
    fn test_sharpness_zero_is_smoothed() {
        let mut image = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 1, Rgba([130, 26, 13, 255]));

        let out = sharpness(&image, 0.0);

        // Centre: 130 * 5 / 13 = 50, 26 * 5 / 13 = 10, 13 * 5 / 13 = 5
        assert_eq!(out.get_pixel(1, 1).0, [50, 10, 5, 255]);
        // Border untouched
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_order_matters() {
        let image = sample();
        let forward = Enhancement {
            brightness: 1.8,
            contrast: 0.4,
            sharpness: 1.0,
            size: None,
        }
        .apply(&image);
        let reversed = brightness(&contrast(&image, 0.4), 1.8);

        assert_eq!(forward, contrast(&brightness(&image, 1.8), 0.4));
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_resize_is_last() {
        let out = Enhancement {
            size: Some((10, 2)),
            ..Default::default()
        }
        .apply(&sample());
        assert_eq!(out.dimensions(), (10, 2));
    }

    #[test]
    fn test_tiny_images() {
        let image = RgbaImage::from_pixel(2, 1, Rgba([10, 10, 10, 10]));
        assert_eq!(sharpness(&image, 0.0), image);
        assert_eq!(contrast(&RgbaImage::new(0, 0), 0.0).dimensions(), (0, 0));
    }
}
