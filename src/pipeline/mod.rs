//! Per-pair processing.
//!
//! A pair moves through a fixed chain: compose, optional tint, enhance,
//! name, save. Nothing is shared between pairs except the read-only
//! `TransferConfig`.

mod compose;
mod enhance;
pub mod naming;
mod tint;

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};

pub use compose::{compose, transfer_pixel};
pub use enhance::{brightness, contrast, sharpness, Enhancement};
pub use tint::{colours_by_frequency, majority_colour, tint};

use crate::config::TransferConfig;
use crate::error::{ImageRole, Result};
use crate::imaging;
use crate::output::{display_path, Printer};

/// Transient state for one base/goal pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairContext {
    /// Directory results for this base image are written to.
    pub out_dir: PathBuf,
    /// Width of the written image.
    pub width: u32,
    /// Height of the written image.
    pub height: u32,
}

impl PairContext {
    /// Output file for `goal` within this pair's directory.
    pub fn output_file(&self, goal: &Path) -> PathBuf {
        naming::output_file(goal, &self.out_dir, self.width, self.height)
    }
}

/// Run the full chain on two decoded images.
///
/// The goal is matched to the base size once and serves as the reference
/// for majority-colour tinting.
pub fn transform(config: &TransferConfig, base: &DynamicImage, goal: &DynamicImage) -> Result<RgbaImage> {
    let size = (base.width(), base.height());
    let goal: Cow<'_, DynamicImage> = match goal {
        DynamicImage::ImageRgba8(rgba) if rgba.dimensions() != size => {
            Cow::Owned(DynamicImage::ImageRgba8(imaging::resize(rgba, size)))
        }
        _ => Cow::Borrowed(goal),
    };

    let mut image = compose(base, &goal, config.merge())?;

    if config.tint() {
        let reference = goal
            .as_rgba8()
            .ok_or_else(|| compose::unsupported(ImageRole::Goal, &goal))?;
        let explicit = config.colour().map(|c| c.colour);
        image = tint(&image, reference, explicit, config.tint_threshold())?;
    }

    let enhancement = Enhancement {
        brightness: config.brightness(),
        contrast: config.contrast(),
        sharpness: config.sharpness(),
        size: config.size(),
    };
    Ok(enhancement.apply(&image))
}

/// Decode, transform and save one pair. Returns the written path.
pub fn process_pair(
    config: &TransferConfig,
    base_path: &Path,
    goal_path: &Path,
    out_dir: &Path,
    printer: &Printer,
) -> Result<PathBuf> {
    let base = imaging::open(base_path)?;
    let goal = imaging::open(goal_path)?;

    let image = transform(config, &base, &goal).map_err(|e| e.with_paths(base_path, goal_path))?;

    let (width, height) = config.size().unwrap_or((base.width(), base.height()));
    let context = PairContext {
        out_dir: out_dir.to_path_buf(),
        width,
        height,
    };
    let out = context.output_file(goal_path);

    if config.verbose() {
        printer.status("Saving", &display_path(&out));
    }
    imaging::save_png(&image, &out)?;

    Ok(out)
}
