//! Discovery of base/goal pairs.
//!
//! Base and goal paths may each be a single image or a directory searched
//! recursively. Every admitted base is paired with every admitted goal.
//!
//! # Example
//!
//! ```ignore
//! use pixel_transfer::{MatchSet, TransferConfig};
//!
//! let config = TransferConfig::builder("bases/", "goals/").build()?;
//! let matches = MatchSet::collect(&config)?;
//! println!("{} pairs", matches.len());
//! ```

mod filter;
mod scanner;

use std::path::{Path, PathBuf};

use crate::config::TransferConfig;
use crate::error::Result;
use crate::pipeline::naming;

pub use filter::Filter;
pub use scanner::{compile_pattern, matches_pattern, scan};

/// One base/goal combination and where its result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub base: PathBuf,
    pub goal: PathBuf,
    /// `{out}/{options}/{base stem}`
    pub out_dir: PathBuf,
}

/// Every pair a run will process, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    pairs: Vec<Pair>,
}

impl MatchSet {
    /// Scan the configured base and goal paths and pair them up.
    ///
    /// Pairs are ordered by base, then goal, both sorted by path.
    pub fn collect(config: &TransferConfig) -> Result<Self> {
        let filter = Filter::new(config.exclude().to_vec(), config.include().to_vec());
        let bases = scan(config.base(), config.base_filter(), &filter)?;
        let goals = if bases.is_empty() {
            Vec::new()
        } else {
            scan(config.goal(), config.goal_filter(), &filter)?
        };

        let run_dir = naming::run_dir(config);
        let pairs = bases
            .iter()
            .flat_map(|base| {
                let out_dir = base_dir(base, &run_dir);
                goals.iter().map(move |goal| Pair {
                    base: base.clone(),
                    goal: goal.clone(),
                    out_dir: out_dir.clone(),
                })
            })
            .collect();

        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pair> {
        self.pairs.iter()
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a Pair;
    type IntoIter = std::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Output directory for everything produced from one base image.
fn base_dir(base: &Path, run_dir: &Path) -> PathBuf {
    naming::out_name(base, run_dir, None, None)
}
