use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::LaunchError;
use crate::spawner::Strategy;

/// Problem categories, in the order the Server reads its arguments.
pub const CATEGORIES: [&str; 6] = ["maze", "sudoku", "array", "password", "tree", "RLE"];

pub const DEFAULT_PORT: u16 = 22022;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Test,
    Eval,
}

impl Mode {
    pub fn suffix(self) -> &'static str {
        match self {
            Mode::Test => "small",
            Mode::Eval => "test",
        }
    }
}

impl FromStr for Mode {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Test" => Ok(Mode::Test),
            "Eval" => Ok(Mode::Eval),
            other => Err(LaunchError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Test => f.write_str("Test"),
            Mode::Eval => f.write_str("Eval"),
        }
    }
}

/// One data file per category for a given mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetGroup {
    paths: Vec<PathBuf>,
}

impl DatasetGroup {
    pub fn for_mode(data_dir: &Path, mode: Mode) -> Self {
        let paths = CATEGORIES
            .iter()
            .map(|category| data_dir.join(format!("{}_{}.bin", category, mode.suffix())))
            .collect();
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Everything a launch needs, fixed once at startup.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub data_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub min_delay: Duration,
    pub ready_timeout: Duration,
    pub strategy: Strategy,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            bin_dir: PathBuf::from("src"),
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            min_delay: Duration::from_secs(2),
            ready_timeout: Duration::from_secs(10),
            strategy: Strategy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes_exactly() {
        assert_eq!("Test".parse::<Mode>().unwrap(), Mode::Test);
        assert_eq!("Eval".parse::<Mode>().unwrap(), Mode::Eval);
    }

    #[test]
    fn rejects_unknown_modes() {
        for bad in ["Bogus", "", "test", "EVAL", "Prod"] {
            match bad.parse::<Mode>() {
                Err(LaunchError::InvalidMode(m)) => assert_eq!(m, bad),
                other => panic!("expected InvalidMode for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_group_uses_small_suffix() {
        let group = DatasetGroup::for_mode(Path::new("data"), Mode::Test);
        let paths: Vec<_> = group
            .paths()
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(
            paths,
            [
                "data/maze_small.bin",
                "data/sudoku_small.bin",
                "data/array_small.bin",
                "data/password_small.bin",
                "data/tree_small.bin",
                "data/RLE_small.bin",
            ]
        );
    }

    #[test]
    fn eval_group_uses_test_suffix() {
        let group = DatasetGroup::for_mode(Path::new("data"), Mode::Eval);
        assert_eq!(group.paths().len(), 6);
        for (path, category) in group.paths().iter().zip(CATEGORIES) {
            assert!(path.starts_with("data"));
            assert_eq!(
                path.file_name().unwrap().to_string_lossy(),
                format!("{category}_test.bin")
            );
        }
    }
}
