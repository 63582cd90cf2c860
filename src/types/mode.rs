//! Pixel layouts accepted by the transfer pipeline.

use std::fmt;

use image::{ColorType, DynamicImage};

/// Channel layout of an 8-bit image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
    Rgb,
    Rgba,
}

impl PixelMode {
    /// Detect the mode of a decoded image, or `None` for anything that is
    /// not 8-bit RGB/RGBA.
    pub fn of(image: &DynamicImage) -> Option<Self> {
        match image.color() {
            ColorType::Rgb8 => Some(PixelMode::Rgb),
            ColorType::Rgba8 => Some(PixelMode::Rgba),
            _ => None,
        }
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelMode::Rgb => write!(f, "RGB"),
            PixelMode::Rgba => write!(f, "RGBA"),
        }
    }
}

/// Human-readable name for any decoded colour type.
pub fn mode_name(color: ColorType) -> String {
    match color {
        ColorType::L8 => "L".to_string(),
        ColorType::La8 => "LA".to_string(),
        ColorType::Rgb8 => PixelMode::Rgb.to_string(),
        ColorType::Rgba8 => PixelMode::Rgba.to_string(),
        ColorType::L16 => "L;16".to_string(),
        ColorType::La16 => "LA;16".to_string(),
        ColorType::Rgb16 => "RGB;16".to_string(),
        ColorType::Rgba16 => "RGBA;16".to_string(),
        ColorType::Rgb32F => "RGB;32F".to_string(),
        ColorType::Rgba32F => "RGBA;32F".to_string(),
        other => format!("{:?}", other),
    }
}
