//! Core value types for pixel-transfer.
//!
//! - `Colour` - RGBA colour values parsed from names, hex or CSS functions
//! - `PixelMode` - the RGB/RGBA layouts the pipeline accepts

mod colour;
mod mode;

pub use colour::Colour;
pub use mode::{mode_name, PixelMode};
