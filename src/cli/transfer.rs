//! The default command: transfer alpha from goal images onto base images.

use std::path::PathBuf;

use clap::Args;

use crate::batch::BatchWalker;
use crate::config::{ConfigFile, TransferConfig};
use crate::error::{Result, TransferError};
use crate::output::{display_path, Printer};
use crate::pipeline::naming;

/// Options for a transfer run.
///
/// Everything but the paths is optional so values from `--config` apply
/// unless given on the command line.
#[derive(Args, Debug, Default)]
pub struct TransferArgs {
    /// Base image or directory providing RGB
    #[arg(required = true)]
    pub base: Option<PathBuf>,

    /// Goal image or directory providing alpha
    #[arg(required = true)]
    pub goal: Option<PathBuf>,

    /// Filename pattern for base images
    #[arg(long = "base_filter", visible_alias = "bf", value_name = "PATTERN")]
    pub base_filter: Option<String>,

    /// Filename pattern for goal images
    #[arg(long = "goal_filter", visible_alias = "gf", value_name = "PATTERN")]
    pub goal_filter: Option<String>,

    /// Skip paths containing any of these tokens
    #[arg(short, long, num_args = 1.., value_name = "TOKEN", conflicts_with = "include")]
    pub exclude: Vec<String>,

    /// Only use paths containing one of these tokens
    #[arg(short, long, num_args = 1.., value_name = "TOKEN")]
    pub include: Vec<String>,

    /// Output root directory [default: out]
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Resize results to WIDTH HEIGHT
    #[arg(short, long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub size: Option<Vec<u32>>,

    /// Blend the result toward the goal image, in percent
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..=100))]
    pub merge: Option<i64>,

    /// Print each image as it is processed
    #[arg(short, long)]
    pub verbose: bool,

    /// Brightness factor (1.0 leaves the image unchanged)
    #[arg(short, long)]
    pub brightness: Option<f64>,

    /// Contrast factor (1.0 leaves the image unchanged)
    #[arg(long, visible_alias = "ct")]
    pub contrast: Option<f64>,

    /// Sharpness factor (1.0 leaves the image unchanged)
    #[arg(long, visible_alias = "sh")]
    pub sharpness: Option<f64>,

    /// Tint with the goal's majority colour
    #[arg(short, long)]
    pub tint: bool,

    /// Tint with this colour instead (needs --tint)
    #[arg(short, long)]
    pub colour: Option<String>,

    /// Minimum alpha for a pixel to count toward the majority colour [default: 100]
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=255))]
    pub threshold: Option<i64>,

    /// Keep processing after a pair fails and report failures at the end
    #[arg(long)]
    pub keep_going: bool,

    /// Number of pairs to process in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// YAML file with default options
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl TransferArgs {
    /// Resolve options: command line over settings file over defaults.
    pub fn to_config(&self) -> Result<TransferConfig> {
        let (Some(base), Some(goal)) = (&self.base, &self.goal) else {
            return Err(TransferError::config(
                "both a base and a goal path are required",
                "Usage: pixel-transfer <BASE> <GOAL> [OPTIONS]",
            ));
        };

        let mut builder = TransferConfig::builder(base, goal);

        if let Some(path) = &self.config {
            builder = builder.apply_file(&ConfigFile::load(path)?);
        }

        if let Some(pattern) = &self.base_filter {
            builder = builder.base_filter(pattern);
        }
        if let Some(pattern) = &self.goal_filter {
            builder = builder.goal_filter(pattern);
        }
        if !self.exclude.is_empty() {
            builder = builder.exclude(self.exclude.clone());
        }
        if !self.include.is_empty() {
            builder = builder.include(self.include.clone());
        }
        if let Some(out) = &self.out {
            builder = builder.out_root(out);
        }
        if let Some(size) = &self.size {
            builder = builder.size(size.clone());
        }
        if let Some(merge) = self.merge {
            builder = builder.merge(merge);
        }
        if let Some(factor) = self.brightness {
            builder = builder.brightness(factor);
        }
        if let Some(factor) = self.contrast {
            builder = builder.contrast(factor);
        }
        if let Some(factor) = self.sharpness {
            builder = builder.sharpness(factor);
        }
        if let Some(colour) = &self.colour {
            builder = builder.colour(colour);
        }
        if let Some(threshold) = self.threshold {
            builder = builder.tint_threshold(threshold);
        }
        if let Some(jobs) = self.jobs {
            builder = builder.jobs(jobs);
        }

        // Switches can only turn behaviour on.
        if self.verbose {
            builder = builder.verbose(true);
        }
        if self.tint {
            builder = builder.tint(true);
        }
        if self.keep_going {
            builder = builder.keep_going(true);
        }

        builder.build()
    }
}

pub fn run(args: TransferArgs, printer: &Printer) -> Result<()> {
    let config = args.to_config()?;

    let summary = BatchWalker::new(&config, *printer).run()?;

    printer.status(
        "Finished",
        &format!(
            "{} to {}",
            summary.describe(),
            display_path(&naming::run_dir(&config))
        ),
    );

    summary.into_result().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_command_line_overrides_config_file() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("settings.yaml");
        fs::write(&settings, "merge: 20\nbrightness: 2.0\nout: from-file\n").unwrap();

        let args = TransferArgs {
            base: Some("b".into()),
            goal: Some("g".into()),
            merge: Some(60),
            config: Some(settings),
            ..Default::default()
        };
        let config = args.to_config().unwrap();

        assert_eq!(config.merge(), 60);
        assert_eq!(config.brightness(), 2.0);
        assert_eq!(config.out_root(), std::path::Path::new("from-file"));
    }

    #[test]
    fn test_missing_config_file() {
        let args = TransferArgs {
            base: Some("b".into()),
            goal: Some("g".into()),
            config: Some("/nonexistent/settings.yaml".into()),
            ..Default::default()
        };
        assert!(matches!(args.to_config().unwrap_err(), TransferError::Io { .. }));
    }

    #[test]
    fn test_run_writes_into_option_directory() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("hero.png");
        let goal = dir.path().join("mask.v2.png");
        RgbImage::from_pixel(6, 6, Rgb([10, 20, 30])).save(&base).unwrap();
        RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 77])).save(&goal).unwrap();

        let out = dir.path().join("out");
        let args = TransferArgs {
            base: Some(base),
            goal: Some(goal),
            out: Some(out.clone()),
            merge: Some(0),
            brightness: Some(2.0),
            ..Default::default()
        };
        run(args, &Printer::new()).unwrap();

        assert!(out.join("b2.0/hero/mask_6x6.png").is_file());
    }

    #[test]
    fn test_run_reports_failed_pairs() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("base.png");
        let goal = dir.path().join("goal.png");
        RgbImage::new(2, 2).save(&base).unwrap();
        RgbImage::new(2, 2).save(&goal).unwrap();

        let args = TransferArgs {
            base: Some(base),
            goal: Some(goal),
            out: Some(dir.path().join("out")),
            keep_going: true,
            ..Default::default()
        };
        let err = run(args, &Printer::new()).unwrap_err();

        assert!(matches!(err, TransferError::Batch { failed: 1, total: 1 }));
    }
}
