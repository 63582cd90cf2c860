//! Run configuration.
//!
//! A `TransferConfig` is assembled once per run through
//! `TransferConfigBuilder`, which rejects invalid option combinations before
//! any file is touched. Options can also come from a YAML settings file
//! (`ConfigFile`); values set on the builder afterwards take precedence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::compile_pattern;
use crate::error::{Result, TransferError};
use crate::types::Colour;

/// Default alpha threshold for majority colour detection.
pub const DEFAULT_TINT_THRESHOLD: u8 = 100;

/// Default output root.
pub const DEFAULT_OUT: &str = "out";

/// Default filename filter.
pub const DEFAULT_FILTER: &str = "*";

/// An explicit tint colour, kept with the text it was parsed from so the
/// output directory can name it the way the user wrote it.
#[derive(Debug, Clone, PartialEq)]
pub struct TintColour {
    pub spec: String,
    pub colour: Colour,
}

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    base: PathBuf,
    goal: PathBuf,
    base_filter: String,
    goal_filter: String,
    exclude: Vec<String>,
    include: Vec<String>,
    out_root: PathBuf,
    size: Option<(u32, u32)>,
    verbose: bool,
    tint: bool,
    colour: Option<TintColour>,
    merge: u8,
    brightness: f64,
    contrast: f64,
    sharpness: f64,
    tint_threshold: u8,
    keep_going: bool,
    jobs: usize,
}

impl TransferConfig {
    /// Start building a configuration for the given base and goal paths.
    pub fn builder(base: impl Into<PathBuf>, goal: impl Into<PathBuf>) -> TransferConfigBuilder {
        TransferConfigBuilder::new(base, goal)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn goal(&self) -> &Path {
        &self.goal
    }

    pub fn base_filter(&self) -> &str {
        &self.base_filter
    }

    pub fn goal_filter(&self) -> &str {
        &self.goal_filter
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn out_root(&self) -> &Path {
        &self.out_root
    }

    /// Final output size `(width, height)`, if results are resized.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn tint(&self) -> bool {
        self.tint
    }

    /// Explicit tint colour. Only ever set when tinting is enabled.
    pub fn colour(&self) -> Option<&TintColour> {
        self.colour.as_ref()
    }

    /// Merge strength toward the goal image, 0-100.
    pub fn merge(&self) -> u8 {
        self.merge
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    pub fn sharpness(&self) -> f64 {
        self.sharpness
    }

    pub fn tint_threshold(&self) -> u8 {
        self.tint_threshold
    }

    /// Continue past failing pairs and report them at the end.
    pub fn keep_going(&self) -> bool {
        self.keep_going
    }

    /// Number of worker threads; 1 processes pairs sequentially.
    pub fn jobs(&self) -> usize {
        self.jobs
    }
}

/// Collects options and validates them into a `TransferConfig`.
#[derive(Debug, Clone)]
pub struct TransferConfigBuilder {
    base: PathBuf,
    goal: PathBuf,
    base_filter: String,
    goal_filter: String,
    exclude: Vec<String>,
    include: Vec<String>,
    out_root: PathBuf,
    size: Option<Vec<u32>>,
    verbose: bool,
    tint: bool,
    colour: Option<String>,
    merge: i64,
    brightness: f64,
    contrast: f64,
    sharpness: f64,
    tint_threshold: i64,
    keep_going: bool,
    jobs: usize,
}

impl TransferConfigBuilder {
    pub fn new(base: impl Into<PathBuf>, goal: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            goal: goal.into(),
            base_filter: DEFAULT_FILTER.to_string(),
            goal_filter: DEFAULT_FILTER.to_string(),
            exclude: Vec::new(),
            include: Vec::new(),
            out_root: PathBuf::from(DEFAULT_OUT),
            size: None,
            verbose: false,
            tint: false,
            colour: None,
            merge: 0,
            brightness: 1.0,
            contrast: 1.0,
            sharpness: 1.0,
            tint_threshold: i64::from(DEFAULT_TINT_THRESHOLD),
            keep_going: false,
            jobs: 1,
        }
    }

    pub fn base_filter(mut self, pattern: impl Into<String>) -> Self {
        self.base_filter = pattern.into();
        self
    }

    pub fn goal_filter(mut self, pattern: impl Into<String>) -> Self {
        self.goal_filter = pattern.into();
        self
    }

    pub fn exclude(mut self, tokens: Vec<String>) -> Self {
        self.exclude = tokens;
        self
    }

    pub fn include(mut self, tokens: Vec<String>) -> Self {
        self.include = tokens;
        self
    }

    pub fn out_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_root = path.into();
        self
    }

    /// Target size as given on the command line; must be exactly `[w, h]`.
    pub fn size(mut self, size: Vec<u32>) -> Self {
        self.size = Some(size);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn tint(mut self, tint: bool) -> Self {
        self.tint = tint;
        self
    }

    pub fn colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = Some(colour.into());
        self
    }

    pub fn merge(mut self, merge: i64) -> Self {
        self.merge = merge;
        self
    }

    pub fn brightness(mut self, factor: f64) -> Self {
        self.brightness = factor;
        self
    }

    pub fn contrast(mut self, factor: f64) -> Self {
        self.contrast = factor;
        self
    }

    pub fn sharpness(mut self, factor: f64) -> Self {
        self.sharpness = factor;
        self
    }

    pub fn tint_threshold(mut self, threshold: i64) -> Self {
        self.tint_threshold = threshold;
        self
    }

    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Apply every value present in a settings file.
    pub fn apply_file(mut self, file: &ConfigFile) -> Self {
        if let Some(pattern) = &file.base_filter {
            self.base_filter = pattern.clone();
        }
        if let Some(pattern) = &file.goal_filter {
            self.goal_filter = pattern.clone();
        }
        if let Some(tokens) = &file.exclude {
            self.exclude = tokens.clone();
        }
        if let Some(tokens) = &file.include {
            self.include = tokens.clone();
        }
        if let Some(out) = &file.out {
            self.out_root = out.clone();
        }
        if let Some(size) = &file.size {
            self.size = Some(size.clone());
        }
        if let Some(verbose) = file.verbose {
            self.verbose = verbose;
        }
        if let Some(tint) = file.tint {
            self.tint = tint;
        }
        if let Some(colour) = &file.colour {
            self.colour = Some(colour.clone());
        }
        if let Some(merge) = file.merge {
            self.merge = merge;
        }
        if let Some(factor) = file.brightness {
            self.brightness = factor;
        }
        if let Some(factor) = file.contrast {
            self.contrast = factor;
        }
        if let Some(factor) = file.sharpness {
            self.sharpness = factor;
        }
        if let Some(threshold) = file.tint_threshold {
            self.tint_threshold = threshold;
        }
        if let Some(keep_going) = file.keep_going {
            self.keep_going = keep_going;
        }
        if let Some(jobs) = file.jobs {
            self.jobs = jobs;
        }
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<TransferConfig> {
        if !(0..=100).contains(&self.merge) {
            return Err(TransferError::config(
                format!("merge must be between 0 and 100, got {}", self.merge),
                "Use a percentage such as --merge 50",
            ));
        }

        if !(0..=255).contains(&self.tint_threshold) {
            return Err(TransferError::config(
                format!(
                    "tint threshold must be between 0 and 255, got {}",
                    self.tint_threshold
                ),
                "The threshold is compared against 8-bit alpha values",
            ));
        }

        for (name, factor) in [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("sharpness", self.sharpness),
        ] {
            if !factor.is_finite() || factor < 0.0 {
                return Err(TransferError::config(
                    format!("{} must be a finite value >= 0.0, got {}", name, factor),
                    "0.0 removes the effect entirely, 1.0 leaves the image unchanged",
                ));
            }
        }

        let size = match self.size {
            None => None,
            Some(dims) => match dims.as_slice() {
                &[w, h] if w > 0 && h > 0 => Some((w, h)),
                _ => {
                    return Err(TransferError::config(
                        format!("size needs exactly two positive values (width, height), got {:?}", dims),
                        "Use --size 64 64",
                    ))
                }
            },
        };

        let colour = match self.colour {
            Some(_) if !self.tint => {
                return Err(TransferError::config(
                    "a colour only works when tinting is enabled",
                    "Add --tint or drop --colour",
                ))
            }
            Some(spec) => {
                let colour = Colour::parse(&spec)?;
                Some(TintColour { spec, colour })
            }
            None => None,
        };

        if !self.exclude.is_empty() && !self.include.is_empty() {
            return Err(TransferError::config(
                "exclude and include cannot be combined",
                "Pass either --exclude or --include",
            ));
        }

        compile_pattern(&self.base_filter)?;
        compile_pattern(&self.goal_filter)?;

        if self.jobs == 0 {
            return Err(TransferError::config(
                "jobs must be at least 1",
                "Use --jobs 1 to process pairs one at a time",
            ));
        }

        Ok(TransferConfig {
            base: self.base,
            goal: self.goal,
            base_filter: self.base_filter,
            goal_filter: self.goal_filter,
            exclude: self.exclude,
            include: self.include,
            out_root: self.out_root,
            size,
            verbose: self.verbose,
            tint: self.tint,
            colour,
            merge: self.merge as u8,
            brightness: self.brightness,
            contrast: self.contrast,
            sharpness: self.sharpness,
            tint_threshold: self.tint_threshold as u8,
            keep_going: self.keep_going,
            jobs: self.jobs,
        })
    }
}

/// Settings loaded from a YAML file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub base_filter: Option<String>,
    pub goal_filter: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub out: Option<PathBuf>,
    pub size: Option<Vec<u32>>,
    pub verbose: Option<bool>,
    pub tint: Option<bool>,
    pub colour: Option<String>,
    pub merge: Option<i64>,
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
    pub sharpness: Option<f64>,
    pub tint_threshold: Option<i64>,
    pub keep_going: Option<bool>,
    pub jobs: Option<usize>,
}

impl ConfigFile {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TransferError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse settings from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| TransferError::Config {
            message: format!("Invalid config file: {}", e),
            help: Some("Check the YAML syntax and option names".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> TransferConfigBuilder {
        TransferConfig::builder("base", "goal")
    }

    #[test]
    fn test_defaults() {
        let config = builder().build().unwrap();

        assert_eq!(config.base_filter(), "*");
        assert_eq!(config.goal_filter(), "*");
        assert_eq!(config.out_root(), Path::new("out"));
        assert_eq!(config.merge(), 0);
        assert_eq!(config.brightness(), 1.0);
        assert_eq!(config.tint_threshold(), 100);
        assert_eq!(config.jobs(), 1);
        assert!(config.size().is_none());
        assert!(!config.tint());
        assert!(!config.keep_going());
    }

    #[test]
    fn test_merge_out_of_range() {
        assert!(builder().merge(101).build().is_err());
        assert!(builder().merge(-1).build().is_err());
        assert_eq!(builder().merge(100).build().unwrap().merge(), 100);
    }

    #[test]
    fn test_negative_brightness_rejected() {
        let err = builder().brightness(-0.5).build().unwrap_err();
        assert!(matches!(err, TransferError::Config { .. }));
        assert!(builder().contrast(f64::NAN).build().is_err());
        assert!(builder().brightness(0.0).build().is_ok());
    }

    #[test]
    fn test_threshold_range() {
        assert!(builder().tint_threshold(256).build().is_err());
        assert_eq!(builder().tint_threshold(255).build().unwrap().tint_threshold(), 255);
    }

    #[test]
    fn test_size_needs_two_positive_values() {
        assert!(builder().size(vec![10]).build().is_err());
        assert!(builder().size(vec![10, 20, 30]).build().is_err());
        assert!(builder().size(vec![0, 20]).build().is_err());
        assert_eq!(builder().size(vec![10, 20]).build().unwrap().size(), Some((10, 20)));
    }

    #[test]
    fn test_colour_requires_tint() {
        assert!(builder().colour("red").build().is_err());

        let config = builder().tint(true).colour("red").build().unwrap();
        let tint = config.colour().unwrap();
        assert_eq!(tint.spec, "red");
        assert_eq!(tint.colour, Colour::rgb(255, 0, 0));
    }

    #[test]
    fn test_invalid_colour_rejected() {
        let err = builder().tint(true).colour("nope").build().unwrap_err();
        assert!(matches!(err, TransferError::Colour { .. }));
    }

    #[test]
    fn test_exclude_and_include_conflict() {
        let result = builder()
            .exclude(vec!["a".to_string()])
            .include(vec!["b".to_string()])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_filter_pattern() {
        assert!(builder().base_filter("[").build().is_err());
        assert!(builder().goal_filter("*.png").build().is_ok());
    }

    #[test]
    fn test_parse_config_file() {
        let yaml = r##"
out: results
merge: 25
tint: true
colour: "#336699"
size: [32, 16]
exclude:
  - backup
"##;
        let file = ConfigFile::parse(yaml).unwrap();
        let config = builder().apply_file(&file).build().unwrap();

        assert_eq!(config.out_root(), Path::new("results"));
        assert_eq!(config.merge(), 25);
        assert_eq!(config.size(), Some((32, 16)));
        assert_eq!(config.exclude(), ["backup".to_string()]);
        assert_eq!(config.colour().unwrap().colour, Colour::rgb(0x33, 0x66, 0x99));
    }

    #[test]
    fn test_builder_overrides_file() {
        let file = ConfigFile::parse("merge: 25\nout: results").unwrap();
        let config = builder().apply_file(&file).merge(75).build().unwrap();

        assert_eq!(config.merge(), 75);
        assert_eq!(config.out_root(), Path::new("results"));
    }

    #[test]
    fn test_config_file_unknown_key() {
        assert!(ConfigFile::parse("sizes: [1, 2]").is_err());
        assert_eq!(ConfigFile::parse("").unwrap(), ConfigFile::default());
    }
}
