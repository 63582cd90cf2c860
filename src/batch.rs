//! Batch driver.
//!
//! `BatchWalker` pairs every admitted base with every admitted goal and
//! pushes each pair through the pipeline. Pairs are independent, so with
//! more than one job they are spread over a rayon thread pool. By default
//! the first failing pair stops the run; with `keep_going` failures are
//! collected and reported once every pair has been tried.
//!
//! Pairs that can land on the same output file (same base directory and
//! same goal stem) always run one after another in match order, so the
//! last of them wins no matter how many jobs are used.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::TransferConfig;
use crate::discovery::{MatchSet, Pair};
use crate::error::{Result, TransferError};
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{naming, process_pair};

/// Cooperative cancellation flag, checked between pairs.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop before starting another pair.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A pair that could not be processed.
#[derive(Debug)]
pub struct Failure {
    pub pair: Pair,
    pub error: TransferError,
}

/// Outcome of a completed run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of pairs matched.
    pub matched: usize,
    /// Files written, in match order.
    pub written: Vec<PathBuf>,
    /// Pairs that failed (only populated when continuing on error).
    pub failed: Vec<Failure>,
}

impl RunSummary {
    /// One-line description for the final status message.
    pub fn describe(&self) -> String {
        let mut message = plural(self.written.len(), "image", "images");
        if !self.failed.is_empty() {
            message.push_str(&format!(", {} failed", self.failed.len()));
        }
        message
    }

    /// Record a written file once, keeping its first position.
    fn push_written(&mut self, seen: &mut HashSet<PathBuf>, path: PathBuf) {
        if seen.insert(path.clone()) {
            self.written.push(path);
        }
    }

    /// Turn collected failures into a single error.
    pub fn into_result(self) -> Result<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(TransferError::Batch {
                failed: self.failed.len(),
                total: self.matched,
            })
        }
    }
}

/// Called after each pair is written, from whichever thread wrote it.
type WrittenHook<'a> = Box<dyn Fn(&Pair, &Path) + Send + Sync + 'a>;

/// Drives one run over the cross product of base and goal images.
pub struct BatchWalker<'a> {
    config: &'a TransferConfig,
    printer: Printer,
    cancel: CancelToken,
    on_written: Option<WrittenHook<'a>>,
}

impl<'a> BatchWalker<'a> {
    pub fn new(config: &'a TransferConfig, printer: Printer) -> Self {
        Self {
            config,
            printer,
            cancel: CancelToken::new(),
            on_written: None,
        }
    }

    /// Use an externally controlled cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Report each written file, e.g. to drive progress output.
    pub fn on_written(mut self, hook: impl Fn(&Pair, &Path) + Send + Sync + 'a) -> Self {
        self.on_written = Some(Box::new(hook));
        self
    }

    /// Discover pairs and process them all.
    pub fn run(&self) -> Result<RunSummary> {
        if self.config.verbose() {
            self.printer
                .info("Output", &display_path(&naming::run_dir(self.config)));
        }

        let matches = MatchSet::collect(self.config)?;

        if self.config.jobs() > 1 {
            self.run_parallel(&matches)
        } else {
            self.run_sequential(&matches)
        }
    }

    fn run_sequential(&self, matches: &MatchSet) -> Result<RunSummary> {
        let mut summary = RunSummary {
            matched: matches.len(),
            ..Default::default()
        };
        let mut seen = HashSet::new();
        let mut current_base: Option<&PathBuf> = None;

        for pair in matches {
            if self.cancel.is_cancelled() {
                return Err(TransferError::Cancelled);
            }

            if self.config.verbose() {
                if current_base != Some(&pair.base) {
                    self.printer.info("Base", &display_path(&pair.base));
                    current_base = Some(&pair.base);
                }
                self.printer.info("Goal", &display_path(&pair.goal));
            }

            match self.process(pair) {
                Ok(path) => summary.push_written(&mut seen, path),
                Err(error) => self.record_failure(&mut summary, pair, error)?,
            }
        }

        Ok(summary)
    }

    fn run_parallel(&self, matches: &MatchSet) -> Result<RunSummary> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs())
            .build()
            .map_err(|e| TransferError::Config {
                message: format!("Failed to start {} worker threads: {}", self.config.jobs(), e),
                help: Some("Try a smaller --jobs value".to_string()),
            })?;

        let pairs = matches.pairs();
        let stop = AtomicBool::new(false);

        // Groups run in parallel; pairs within a group run in order.
        let mut results: Vec<(usize, Option<Result<PathBuf>>)> = pool.install(|| {
            output_groups(pairs)
                .par_iter()
                .flat_map_iter(|group| {
                    group
                        .iter()
                        .map(|&index| (index, self.attempt(&pairs[index], &stop)))
                        .collect::<Vec<_>>()
                })
                .collect()
        });
        results.sort_by_key(|(index, _)| *index);

        let mut summary = RunSummary {
            matched: matches.len(),
            ..Default::default()
        };
        let mut seen = HashSet::new();
        let mut skipped = false;

        for (index, result) in results {
            match result {
                Some(Ok(path)) => summary.push_written(&mut seen, path),
                Some(Err(error)) => self.record_failure(&mut summary, &pairs[index], error)?,
                None => skipped = true,
            }
        }

        if skipped && self.cancel.is_cancelled() {
            return Err(TransferError::Cancelled);
        }
        Ok(summary)
    }

    /// Process one pair on a worker, unless the run is cancelled or a
    /// failure has already stopped it.
    fn attempt(&self, pair: &Pair, stop: &AtomicBool) -> Option<Result<PathBuf>> {
        if self.cancel.is_cancelled() || stop.load(Ordering::SeqCst) {
            return None;
        }
        if self.config.verbose() {
            self.printer.info(
                "Pair",
                &format!("{} + {}", display_path(&pair.base), display_path(&pair.goal)),
            );
        }
        let result = self.process(pair);
        if result.is_err() && !self.config.keep_going() {
            stop.store(true, Ordering::SeqCst);
        }
        Some(result)
    }

    fn process(&self, pair: &Pair) -> Result<PathBuf> {
        let path = process_pair(self.config, &pair.base, &pair.goal, &pair.out_dir, &self.printer)?;
        if let Some(hook) = &self.on_written {
            hook(pair, &path);
        }
        Ok(path)
    }

    /// Fail fast, or note the failure and carry on when continuing on error.
    fn record_failure(&self, summary: &mut RunSummary, pair: &Pair, error: TransferError) -> Result<()> {
        if !self.config.keep_going() {
            return Err(error);
        }

        self.printer.error(
            "error",
            &format!(
                "{} + {}: {}",
                display_path(&pair.base),
                display_path(&pair.goal),
                error
            ),
        );
        summary.failed.push(Failure {
            pair: pair.clone(),
            error,
        });
        Ok(())
    }
}

/// Indices of pairs that may write the same file, grouped in match order.
///
/// The file name also carries the output size, which is only known after
/// decoding, so pairs are grouped on everything else: the base output
/// directory and the goal stem.
fn output_groups(pairs: &[Pair]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut by_target: HashMap<(&Path, String), usize> = HashMap::new();

    for (index, pair) in pairs.iter().enumerate() {
        let key = (pair.out_dir.as_path(), naming::stem(&pair.goal));
        let group = *by_target.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(index);
    }
    groups
}
