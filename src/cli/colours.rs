use std::path::PathBuf;

use clap::Args;
use image::RgbaImage;
use serde::Serialize;

use crate::config::DEFAULT_TINT_THRESHOLD;
use crate::error::{Result, TransferError};
use crate::imaging;
use crate::output::{display_path, plural, Printer};
use crate::pipeline::colours_by_frequency;

/// List the colours of an image by frequency
#[derive(Args, Debug)]
pub struct ColoursArgs {
    /// Image to sample
    #[arg(required = true)]
    pub file: PathBuf,

    /// Maximum number of colours to output
    #[arg(long)]
    pub max: Option<usize>,

    /// Only count pixels with at least this alpha
    #[arg(long, default_value_t = DEFAULT_TINT_THRESHOLD)]
    pub threshold: u8,

    /// Print JSON instead of one colour per line
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ColourCount {
    colour: String,
    count: usize,
}

/// Colours of `image` by frequency, at most `max` of them.
fn colour_counts(image: &RgbaImage, threshold: u8, max: Option<usize>) -> Vec<ColourCount> {
    // The first entry is the colour `--tint` would pick.
    let mut colours = colours_by_frequency(image, threshold);
    if let Some(max) = max {
        colours.truncate(max);
    }

    colours
        .into_iter()
        .map(|(colour, count)| ColourCount {
            colour: colour.to_string(),
            count,
        })
        .collect()
}

pub fn run(args: ColoursArgs, printer: &Printer) -> Result<()> {
    let image = imaging::open(&args.file)?.to_rgba8();
    let counts = colour_counts(&image, args.threshold, args.max);

    printer.status(
        "Sampled",
        &format!(
            "{} from {}",
            plural(counts.len(), "colour", "colours"),
            display_path(&args.file)
        ),
    );

    if args.json {
        let json = serde_json::to_string_pretty(&counts)
            .map_err(|e| TransferError::IoError(e.into()))?;
        println!("{}", json);
    } else {
        for entry in &counts {
            println!("{} {}", entry.colour, entry.count);
        }
    }

    Ok(())
}
