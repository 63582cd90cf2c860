//! Include/exclude filtering of discovered images.

use std::path::Path;

/// Substring filter applied to the full path of every discovered image.
///
/// An image is skipped when any exclude token occurs in its path. When
/// include tokens are given, an image is also skipped unless at least one
/// of them occurs in its path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    exclude: Vec<String>,
    include: Vec<String>,
}

impl Filter {
    pub fn new(exclude: Vec<String>, include: Vec<String>) -> Self {
        Self { exclude, include }
    }

    /// Check whether `path` should be left out.
    pub fn skips(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        if self.exclude.iter().any(|token| path_str.contains(token.as_str())) {
            return true;
        }

        !self.include.is_empty() && !self.include.iter().any(|token| path_str.contains(token.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_admits_everything() {
        let filter = Filter::default();
        assert!(!filter.skips(Path::new("images/foo.png")));
    }

    #[test]
    fn test_exclude_substring() {
        let filter = Filter::new(tokens(&["foo"]), vec![]);
        assert!(filter.skips(Path::new("images/foo.png")));
        assert!(filter.skips(Path::new("images/foobar/a.png")));
        assert!(!filter.skips(Path::new("images/bar.png")));
    }

    #[test]
    fn test_include_requires_a_match() {
        let filter = Filter::new(vec![], tokens(&["hero", "tile"]));
        assert!(!filter.skips(Path::new("sprites/hero_idle.png")));
        assert!(!filter.skips(Path::new("tiles/grass.png")));
        assert!(filter.skips(Path::new("sprites/enemy.png")));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = Filter::new(tokens(&["old"]), tokens(&["hero"]));
        assert!(filter.skips(Path::new("old/hero.png")));
    }
}
