//! Tinting with an explicit or majority colour.

use std::collections::HashMap;

use image::RgbaImage;

use crate::error::{Result, TransferError};
use crate::imaging;
use crate::types::Colour;

/// Count how often each pixel value occurs among pixels whose alpha is at
/// least `threshold`, most frequent first.
///
/// Equally frequent colours are ordered by first appearance in a
/// column-by-column scan. Callers should not rely on that order.
pub fn colours_by_frequency(reference: &RgbaImage, threshold: u8) -> Vec<(Colour, usize)> {
    let mut counts: HashMap<[u8; 4], (usize, usize)> = HashMap::new();
    let (width, height) = reference.dimensions();

    for x in 0..width {
        for y in 0..height {
            let rgba = reference.get_pixel(x, y).0;
            if rgba[3] < threshold {
                continue;
            }
            let seen = counts.len();
            counts.entry(rgba).or_insert((0, seen)).0 += 1;
        }
    }

    let mut colours: Vec<([u8; 4], (usize, usize))> = counts.into_iter().collect();
    colours.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    colours
        .into_iter()
        .map(|(rgba, (count, _))| (Colour::from(rgba), count))
        .collect()
}

/// The most frequent colour among pixels with alpha >= `threshold`.
pub fn majority_colour(reference: &RgbaImage, threshold: u8) -> Result<Colour> {
    colours_by_frequency(reference, threshold)
        .into_iter()
        .next()
        .map(|(colour, _)| colour)
        .ok_or(TransferError::NoMajorityColour { threshold })
}

/// Multiply `image` by a solid fill of `explicit`, or of the majority colour
/// of `reference` when no colour is given.
pub fn tint(
    image: &RgbaImage,
    reference: &RgbaImage,
    explicit: Option<Colour>,
    threshold: u8,
) -> Result<RgbaImage> {
    let colour = match explicit {
        Some(colour) => colour,
        None => majority_colour(reference, threshold)?,
    };

    let (width, height) = image.dimensions();
    Ok(imaging::multiply(image, &imaging::solid(width, height, colour)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 10x10 image: 90 pixels of (10,20,30,200), the last row (0,0,0,50).
    fn mostly_blue() -> RgbaImage {
        RgbaImage::from_fn(10, 10, |_, y| {
            if y == 9 {
                Rgba([0, 0, 0, 50])
            } else {
                Rgba([10, 20, 30, 200])
            }
        })
    }

    #[test]
    fn test_majority_ignores_low_alpha() {
        let colour = majority_colour(&mostly_blue(), 100).unwrap();
        assert_eq!(colour, Colour::new(10, 20, 30, 200));
    }

    #[test]
    fn test_low_alpha_wins_when_admitted() {
        // Every pixel admitted; the low-alpha row is still the minority.
        let colours = colours_by_frequency(&mostly_blue(), 0);
        assert_eq!(colours[0], (Colour::new(10, 20, 30, 200), 90));
        assert_eq!(colours[1], (Colour::new(0, 0, 0, 50), 10));
    }

    #[test]
    fn test_no_pixel_meets_threshold() {
        let err = majority_colour(&mostly_blue(), 201).unwrap_err();
        assert!(matches!(err, TransferError::NoMajorityColour { threshold: 201 }));
    }

    #[test]
    fn test_tie_does_not_crash() {
        let image = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([1, 1, 1, 255])
            } else {
                Rgba([2, 2, 2, 255])
            }
        });
        let colour = majority_colour(&image, 0).unwrap();
        assert!(colour == Colour::rgb(1, 1, 1) || colour == Colour::rgb(2, 2, 2));
    }

    #[test]
    fn test_explicit_matches_detected() {
        let image = RgbaImage::from_fn(4, 4, |x, y| Rgba([x as u8 * 60, y as u8 * 60, 128, 255]));
        let reference = mostly_blue();

        let detected = tint(&image, &reference, None, 100).unwrap();
        let majority = majority_colour(&reference, 100).unwrap();
        let explicit = tint(&image, &reference, Some(majority), 100).unwrap();

        assert_eq!(detected, explicit);
    }

    #[test]
    fn test_tint_multiplies_rgb_only() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([255, 128, 10, 99]));
        let out = tint(&image, &image, Some(Colour::rgb(255, 0, 128)), 0).unwrap();

        // 10 * 128 / 255 = 5.02 -> 5
        assert!(out.pixels().all(|p| p.0 == [255, 0, 5, 99]));
    }

    #[test]
    fn test_explicit_colour_skips_threshold() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([100, 100, 100, 0]));
        let out = tint(&image, &image, Some(Colour::WHITE), 255).unwrap();
        assert_eq!(out, image);
    }
}
