//! Alpha transfer between a base and a goal image.
//!
//! Every output pixel takes its colour from the base and its alpha from the
//! goal. With a non-zero merge the result is then blended toward the goal
//! pixel, alpha included, using integer arithmetic only.

use std::borrow::Cow;

use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::{ImageRole, Result, TransferError};
use crate::imaging;
use crate::types::{mode_name, PixelMode};

/// Compose `base` and `goal` into a new RGBA image the size of `base`.
///
/// `base` must be RGB or RGBA and `goal` must be RGBA. A goal whose
/// dimensions differ from the base is resampled to match first.
/// `merge` is a percentage in `0..=100`.
pub fn compose(base: &DynamicImage, goal: &DynamicImage, merge: u8) -> Result<RgbaImage> {
    if PixelMode::of(base).is_none() {
        return Err(unsupported(ImageRole::Base, base));
    }
    let Some(goal_rgba) = goal.as_rgba8() else {
        return Err(unsupported(ImageRole::Goal, goal));
    };

    let (width, height) = (base.width(), base.height());
    let goal: Cow<'_, RgbaImage> = if goal_rgba.dimensions() == (width, height) {
        Cow::Borrowed(goal_rgba)
    } else {
        Cow::Owned(imaging::resize(goal_rgba, (width, height)))
    };

    Ok(match base {
        DynamicImage::ImageRgb8(rgb) => RgbaImage::from_fn(width, height, |x, y| {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            transfer_pixel([r, g, b], goal.get_pixel(x, y).0, merge)
        }),
        DynamicImage::ImageRgba8(rgba) => RgbaImage::from_fn(width, height, |x, y| {
            let [r, g, b, _] = rgba.get_pixel(x, y).0;
            transfer_pixel([r, g, b], goal.get_pixel(x, y).0, merge)
        }),
        other => return Err(unsupported(ImageRole::Base, other)),
    })
}

/// Combine one base colour with one goal pixel.
pub fn transfer_pixel(base_rgb: [u8; 3], goal: [u8; 4], merge: u8) -> Rgba<u8> {
    let composed = [base_rgb[0], base_rgb[1], base_rgb[2], goal[3]];
    if merge == 0 {
        return Rgba(composed);
    }

    let merge = u32::from(merge.min(100));
    let mut out = [0u8; 4];
    for k in 0..4 {
        out[k] = ((u32::from(goal[k]) * merge + u32::from(composed[k]) * (100 - merge)) / 100) as u8;
    }
    Rgba(out)
}

pub(crate) fn unsupported(role: ImageRole, image: &DynamicImage) -> TransferError {
    TransferError::UnsupportedMode {
        role,
        mode: mode_name(image.color()),
        path: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};
    use pretty_assertions::assert_eq;

    fn red_base() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, image::Rgb([255, 0, 0])))
    }

    fn green_goal() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 128])))
    }

    fn gradient_base() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(6, 4, |x, y| {
            Rgba([x as u8 * 40, y as u8 * 60, (x * y) as u8 * 10, 200 - x as u8 * 20])
        }))
    }

    fn gradient_goal() -> RgbaImage {
        RgbaImage::from_fn(6, 4, |x, y| Rgba([250 - x as u8 * 30, 17, y as u8 * 50, x as u8 * 50]))
    }

    #[test]
    fn test_merge_zero_takes_goal_alpha() {
        let out = compose(&red_base(), &green_goal(), 0).unwrap();

        assert_eq!(out.dimensions(), (10, 10));
        assert!(out.pixels().all(|p| p.0 == [255, 0, 0, 128]));
    }

    #[test]
    fn test_merge_fifty() {
        let out = compose(&red_base(), &green_goal(), 50).unwrap();
        assert!(out.pixels().all(|p| p.0 == [127, 127, 0, 128]));
    }

    #[test]
    fn test_rgba_base_alpha_is_replaced() {
        let base = gradient_base();
        let goal = gradient_goal();
        let out = compose(&base, &DynamicImage::ImageRgba8(goal.clone()), 0).unwrap();

        let base = base.to_rgba8();
        for (x, y, p) in out.enumerate_pixels() {
            let b = base.get_pixel(x, y).0;
            assert_eq!(p.0, [b[0], b[1], b[2], goal.get_pixel(x, y)[3]]);
        }
    }

    #[test]
    fn test_merge_hundred_is_goal() {
        let goal = gradient_goal();
        let out = compose(&gradient_base(), &DynamicImage::ImageRgba8(goal.clone()), 100).unwrap();
        assert_eq!(out, goal);
    }

    #[test]
    fn test_merge_truncates_exact_halves() {
        // (255 * 50 + 0 * 50) / 100 = 127.5 -> 127
        assert_eq!(transfer_pixel([0, 0, 0], [255, 255, 255, 255], 50).0, [127, 127, 127, 255]);
        // (1 * 50 + 0 * 50) / 100 = 0.5 -> 0
        assert_eq!(transfer_pixel([0, 0, 0], [1, 1, 1, 1], 50).0, [0, 0, 0, 1]);
        // (3 * 50 + 4 * 50) / 100 = 3.5 -> 3
        assert_eq!(transfer_pixel([4, 4, 4], [3, 3, 3, 9], 50).0, [3, 3, 3, 9]);
    }

    #[test]
    fn test_goal_is_resized_to_base() {
        let base = gradient_base();
        let small_goal = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8 * 80, y as u8 * 100, 5, 255 - x as u8]));

        let internal = compose(&base, &DynamicImage::ImageRgba8(small_goal.clone()), 30).unwrap();
        let resized = imaging::resize(&small_goal, (6, 4));
        let external = compose(&base, &DynamicImage::ImageRgba8(resized), 30).unwrap();

        assert_eq!(internal.dimensions(), (6, 4));
        assert_eq!(internal, external);
    }

    #[test]
    fn test_inputs_untouched() {
        let base = red_base();
        let goal = green_goal();
        let before = (base.clone(), goal.clone());

        compose(&base, &goal, 40).unwrap();

        assert_eq!(before.0, base);
        assert_eq!(before.1, goal);
    }

    #[test]
    fn test_rejects_greyscale_base() {
        let base = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        let err = compose(&base, &green_goal(), 0).unwrap_err();

        match err {
            TransferError::UnsupportedMode { role, mode, .. } => {
                assert_eq!(role, ImageRole::Base);
                assert_eq!(mode, "L");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_rgb_goal() {
        let goal = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
        let err = compose(&red_base(), &goal, 0).unwrap_err();

        assert!(matches!(
            err,
            TransferError::UnsupportedMode { role: ImageRole::Goal, .. }
        ));
    }
}
