//! pixel-transfer - Alpha and colour transfer between images
//!
//! A library for carrying the alpha channel of goal images onto the RGB of
//! base images, with optional tinting, enhancement and resizing, over whole
//! directory trees.

pub mod batch;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod types;

pub use batch::{BatchWalker, CancelToken, Failure, RunSummary};
pub use config::{ConfigFile, TintColour, TransferConfig, TransferConfigBuilder};
pub use discovery::{Filter, MatchSet, Pair};
pub use error::{ImageRole, Result, TransferError};
pub use pipeline::{
    brightness, colours_by_frequency, compose, contrast, majority_colour, process_pair, sharpness,
    tint, transfer_pixel, transform, Enhancement, PairContext,
};
pub use types::{Colour, PixelMode};
